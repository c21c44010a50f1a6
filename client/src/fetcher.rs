use std::sync::Arc;

use crate::builder::RequestBuilder;
use crate::config::FetcherConfig;
use crate::data::form::{FormDataFactory, FormFactory};
use crate::data::host::HostEnvironment;
use crate::data::transport::{ReqwestTransport, Transport};
use crate::error::FetchError;
use crate::method::HttpMethod;

// one factory per verb
macro_rules! verb_factories {
    ($($name:ident => $method:ident),+ $(,)?) => {
        $(
            pub fn $name(&self, url: &str) -> RequestBuilder {
                self.builder(HttpMethod::$method, url)
            }
        )+
    };
}

/// Holds the injected capabilities and hands out builders that share them.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    host: Arc<dyn HostEnvironment>,
    forms: Arc<dyn FormFactory>,
}

impl Fetcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        host: Arc<dyn HostEnvironment>,
        forms: Arc<dyn FormFactory>
    ) -> Self {
        Fetcher { transport, host, forms }
    }

    /// reqwest transport, built-in multipart encoder, host picked by config.
    pub fn from_config(config: &FetcherConfig) -> Self {
        Fetcher::new(
            Arc::new(ReqwestTransport::new()),
            config.host_env.host(),
            Arc::new(FormDataFactory)
        )
    }

    pub fn host_name(&self) -> &'static str {
        self.host.name()
    }

    /// Builder for a verb given as text, matched case-insensitively.
    pub fn request(&self, method: &str, url: &str) -> Result<RequestBuilder, FetchError> {
        Ok(self.builder(method.parse()?, url))
    }

    pub fn builder(&self, method: HttpMethod, url: &str) -> RequestBuilder {
        RequestBuilder::new(
            method,
            url,
            Arc::clone(&self.transport),
            Arc::clone(&self.host),
            Arc::clone(&self.forms)
        )
    }

    verb_factories! {
        get => Get,
        head => Head,
        post => Post,
        put => Put,
        delete => Delete,
        connect => Connect,
        options => Options,
        trace => Trace,
        patch => Patch,
    }
}
