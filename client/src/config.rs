use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::Arc;

use common::config::{get_configs_from_proc_env, keys, ConfigHandler};
use common::convert::parse_header_list;
use common::_info;

use crate::data::host::{HostEnvironment, NativeHost, TextHost};
use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostKind {
    #[default]
    Native,
    Text,
}

impl HostKind {
    pub fn host(&self) -> Arc<dyn HostEnvironment> {
        match self {
            HostKind::Native => Arc::new(NativeHost),
            HostKind::Text => Arc::new(TextHost),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HostKind::Native => "native",
            HostKind::Text => "text",
        }
    }
}

impl FromStr for HostKind {
    type Err = FetchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "native" => Ok(HostKind::Native),
            "text" => Ok(HostKind::Text),
            other => Err(FetchError::Config(format!(
                "{} must be `native` or `text`, got `{}`", keys::CONFIG_KEY_HOST_ENV, other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetcherConfig {
    pub host_env: HostKind,
    pub user_agent: Option<String>,
    pub default_headers: Vec<(String, String)>,
}

impl FetcherConfig {
    pub fn from_env() -> Result<Self, FetchError> {
        Self::from_map(&get_configs_from_proc_env())
    }

    pub fn from_map(configs: &BTreeMap<String, String>) -> Result<Self, FetchError> {
        let host_env = match configs.get(keys::CONFIG_KEY_HOST_ENV) {
            Some(value) => value.parse()?,
            None => HostKind::default(),
        };
        let user_agent = configs.get(keys::CONFIG_KEY_USER_AGENT)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let default_headers = configs.get(keys::CONFIG_KEY_DEFAULT_HEADERS)
            .map(|value| parse_header_list(value))
            .unwrap_or_default();

        Ok(FetcherConfig { host_env, user_agent, default_headers })
    }

    /// Headers every request starts with, `User-Agent` last so it wins.
    pub fn base_headers(&self) -> Vec<(String, String)> {
        let mut headers = self.default_headers.clone();
        if let Some(user_agent) = &self.user_agent {
            headers.push((String::from("User-Agent"), user_agent.clone()));
        }
        headers
    }
}

// persist a single key, skipped when already set unless forced
async fn set_config_value(
    handler: &dyn ConfigHandler,
    key: &str,
    value: String,
    label: &str,
    force: bool
) -> Result<bool, FetchError> {
    let configs = handler.get_configs().await;
    if configs.contains_key(key) && !force {
        _info!("{} is already set, consider using --force option to force resetting", label);
        return Ok(false);
    }

    handler.set_configs(HashMap::from([(key.to_string(), value.clone())])).await
        .map_err(|e| FetchError::Config(e.to_string()))?;
    _info!("{} has been set to: {}", label, value);
    Ok(true)
}

pub async fn set_host_env(handler: &dyn ConfigHandler, value: HostKind, force: bool) -> Result<bool, FetchError> {
    set_config_value(handler, keys::CONFIG_KEY_HOST_ENV, value.as_str().to_string(), "Host environment", force).await
}

pub async fn set_user_agent(handler: &dyn ConfigHandler, value: String, force: bool) -> Result<bool, FetchError> {
    set_config_value(handler, keys::CONFIG_KEY_USER_AGENT, value, "User agent", force).await
}

pub async fn set_default_headers(handler: &dyn ConfigHandler, value: String, force: bool) -> Result<bool, FetchError> {
    if parse_header_list(&value).is_empty() {
        return Err(FetchError::Config(format!("no valid `Name: value` header in `{}`", value)));
    }
    set_config_value(handler, keys::CONFIG_KEY_DEFAULT_HEADERS, value, "Default headers", force).await
}
