use std::collections::HashMap;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

use common::{_debug, _error};

use crate::data::form::{FormFactory, MultipartForm};
use crate::data::host::HostEnvironment;
use crate::data::transport::{Transport, TransportRequest, TransportResponse};
use crate::error::FetchError;
use crate::method::HttpMethod;
use crate::payload::Payload;
use crate::response::{is_error_status, NormalizedResponse, ResponseBody};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const JSON_CONTENT_TYPE: &str = "application/json";

enum RequestBody {
    Bytes(Vec<u8>),
    Text(String),
    Json(String),
    // the builder's form handle
    Form,
}

/// Accumulates one request and performs it exactly once.
///
/// Configuration calls consume and return the builder so they chain. The
/// body follows last-write-wins: `attach` replaces an earlier `send` and
/// vice versa. A JSON `send` after `attach` also rewrites `Content-Type`,
/// a raw `send` leaves the multipart `Content-Type` in place.
///
/// The terminal operations (`end`, `then`, `catch`, `.await`) take the
/// builder by value, so a builder can never hit the transport twice.
pub struct RequestBuilder {
    method: HttpMethod,
    url: String,
    headers: HashMap<String, String>,
    body: Option<RequestBody>,
    form: Option<Box<dyn MultipartForm>>,
    transport: Arc<dyn Transport>,
    host: Arc<dyn HostEnvironment>,
    forms: Arc<dyn FormFactory>,
}

impl RequestBuilder {
    pub fn new(
        method: HttpMethod,
        url: &str,
        transport: Arc<dyn Transport>,
        host: Arc<dyn HostEnvironment>,
        forms: Arc<dyn FormFactory>
    ) -> Self {
        RequestBuilder {
            method,
            url: url.to_string(),
            headers: HashMap::new(),
            body: None,
            form: None,
            transport,
            host,
            forms,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Set or overwrite one header, names are kept exactly as given.
    pub fn set(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Add a part to the builder's multipart form and make the form the body.
    ///
    /// The form is created on the first call and reused afterwards.
    pub fn attach(mut self, field: &str, data: impl Into<Vec<u8>>, filename: Option<&str>) -> Self {
        let forms = Arc::clone(&self.forms);
        let form = self.form.get_or_insert_with(|| forms.create());
        let content_type = format!("multipart/form-data; boundary={}", form.boundary());
        form.append(field, data.into(), filename);
        self.headers.insert(CONTENT_TYPE.to_string(), content_type);
        self.body = Some(RequestBody::Form);
        self
    }

    pub fn send(mut self, payload: impl Into<Payload>) -> Self {
        self.body = Some(match payload.into() {
            Payload::Json(value) => {
                self.headers.insert(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string());
                RequestBody::Json(value.to_string())
            }
            Payload::Text(text) => RequestBody::Text(text),
            Payload::Bytes(bytes) => RequestBody::Bytes(bytes),
        });
        self
    }

    /// Perform the request and hand the outcome to `callback`.
    ///
    /// The callback runs exactly once. A 4xx/5xx response arrives as
    /// `Err(FetchError::Status(..))` carrying the full response. Whatever the
    /// callback returns is returned from here.
    pub async fn end<C, R>(self, callback: C) -> R
    where
        C: FnOnce(Result<NormalizedResponse, FetchError>) -> R,
    {
        let method = self.method;
        let url = self.url.clone();
        let outcome = self.perform().await;
        match &outcome {
            Ok(response) => _debug!("{} {} completed with {}", method, url, response.status()),
            Err(FetchError::Status(response)) => _error!("{} {} returned {}", method, url, response.status()),
            Err(e) => _error!("{} {} failed: {}", method, url, e),
        }
        callback(outcome)
    }

    /// Run the request once; success maps through `on_success`, failure
    /// through `on_failure`, whose return value becomes the error.
    pub async fn then<T, E, S, F>(self, on_success: S, on_failure: F) -> Result<T, E>
    where
        S: FnOnce(NormalizedResponse) -> T,
        F: FnOnce(FetchError) -> E,
    {
        self.end(|outcome| match outcome {
            Ok(response) => Ok(on_success(response)),
            Err(err) => Err(on_failure(err)),
        }).await
    }

    pub async fn catch<E, F>(self, on_failure: F) -> Result<NormalizedResponse, E>
    where
        F: FnOnce(FetchError) -> E,
    {
        self.then(|response| response, on_failure).await
    }

    async fn perform(self) -> Result<NormalizedResponse, FetchError> {
        let RequestBuilder { method, url, headers, body, form, transport, host, .. } = self;

        let body = match body {
            None => None,
            Some(RequestBody::Bytes(bytes)) => Some(bytes),
            Some(RequestBody::Text(text)) => Some(text.into_bytes()),
            Some(RequestBody::Json(json)) => Some(json.into_bytes()),
            Some(RequestBody::Form) => form.map(|form| form.end()),
        };

        _debug!(
            "Dispatching {} {} with {} header(s) and {} body byte(s)",
            method, url, headers.len(), body.as_ref().map_or(0, Vec::len)
        );
        let mut res = transport.request(&url, TransportRequest { method, headers, body }).await?;

        let (body, text) = if res.header(CONTENT_TYPE).as_deref() == Some(JSON_CONTENT_TYPE) {
            let text = host.read_text(res.as_mut()).await?;
            let value = serde_json::from_str(&text).map_err(FetchError::Decode)?;
            (ResponseBody::Json(value), text)
        } else {
            let (bytes, text) = host.read_body(res.as_mut()).await?.into_parts();
            (ResponseBody::Bytes(bytes), text)
        };

        let response = NormalizedResponse::new(res.status(), normalize_headers(res.as_ref()), body, text);
        if is_error_status(response.status()) {
            return Err(FetchError::Status(response));
        }

        Ok(response)
    }
}

// first value of every multi-valued header, names untouched
fn normalize_headers(res: &dyn TransportResponse) -> HashMap<String, String> {
    match res.raw_headers() {
        Some(raw) => raw
            .into_iter()
            .filter_map(|(name, values)| values.into_iter().next().map(|value| (name, value)))
            .collect(),
        None => res.entries().into_iter().collect(),
    }
}

impl IntoFuture for RequestBuilder {
    type Output = Result<NormalizedResponse, FetchError>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.end(|outcome| outcome))
    }
}
