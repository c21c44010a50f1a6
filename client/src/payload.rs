use serde::Serialize;

use crate::error::FetchError;

/// A request body as handed to `RequestBuilder::send`.
///
/// The variant decides how the body is transmitted: `Json` values are
/// serialized and labelled `application/json`, the other variants go out
/// verbatim without touching `Content-Type`.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Bytes(Vec<u8>),
    Text(String),
    Json(serde_json::Value),
}

impl Payload {
    /// Build a `Json` payload from any serializable value.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, FetchError> {
        serde_json::to_value(value)
            .map(Payload::Json)
            .map_err(FetchError::Encode)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Text(value.to_string())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::Text(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Payload::Bytes(value)
    }
}

impl From<&[u8]> for Payload {
    fn from(value: &[u8]) -> Self {
        Payload::Bytes(value.to_vec())
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Json(value)
    }
}
