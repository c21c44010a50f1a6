use async_trait::async_trait;
use common::convert::{str_to_utf16_bytes, utf16_bytes_to_string};

use crate::data::transport::TransportResponse;
use crate::error::FetchError;

/// A response body in the form the host environment reads it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    Buffer(Vec<u8>),
    Text(String),
}

impl RawBody {
    /// Canonical bytes plus their string form.
    ///
    /// Buffers are kept as they are and read back as UTF-8. Text goes
    /// through the legacy conversion, one little-endian 16-bit element per
    /// UTF-16 code unit, and is read back from that same layout, so the
    /// string survives unchanged.
    pub fn into_parts(self) -> (Vec<u8>, String) {
        match self {
            RawBody::Buffer(bytes) => {
                let text = String::from_utf8_lossy(&bytes).to_string();
                (bytes, text)
            }
            RawBody::Text(value) => {
                let bytes = str_to_utf16_bytes(&value);
                let text = utf16_bytes_to_string(&bytes);
                (bytes, text)
            }
        }
    }
}

/// How the running environment reads response bodies. Chosen once at
/// start-up, the builder never branches on the environment itself.
#[async_trait]
pub trait HostEnvironment: Send + Sync {
    fn name(&self) -> &'static str;

    async fn read_body(&self, response: &mut dyn TransportResponse) -> Result<RawBody, FetchError>;

    async fn read_text(&self, response: &mut dyn TransportResponse) -> Result<String, FetchError> {
        response.text().await
    }
}

/// Reads bodies as binary buffers.
pub struct NativeHost;

#[async_trait]
impl HostEnvironment for NativeHost {
    fn name(&self) -> &'static str {
        "native"
    }

    async fn read_body(&self, response: &mut dyn TransportResponse) -> Result<RawBody, FetchError> {
        response.bytes().await.map(RawBody::Buffer)
    }
}

/// Reads bodies as text.
pub struct TextHost;

#[async_trait]
impl HostEnvironment for TextHost {
    fn name(&self) -> &'static str {
        "text"
    }

    async fn read_body(&self, response: &mut dyn TransportResponse) -> Result<RawBody, FetchError> {
        response.text().await.map(RawBody::Text)
    }
}
