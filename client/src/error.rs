use thiserror::Error;

use crate::response::NormalizedResponse;

/// Every failure a request can end with. All of them reach the caller
/// through the single completion of `RequestBuilder::end`.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The transport could not complete the exchange (connection refused,
    /// DNS failure, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response was labelled `application/json` but its text is not JSON.
    #[error("response decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("request encode error: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("body read error: {0}")]
    BodyRead(String),

    #[error("invalid method: {0}")]
    InvalidMethod(String),

    #[error("invalid config: {0}")]
    Config(String),

    /// A 4xx/5xx response. The exchange itself succeeded, the full response
    /// is carried for inspection.
    #[error("HTTP {}", .0.status())]
    Status(NormalizedResponse),
}

impl FetchError {
    /// The response behind a `Status` error.
    pub fn response(&self) -> Option<&NormalizedResponse> {
        match self {
            FetchError::Status(response) => Some(response),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response().map(NormalizedResponse::status)
    }
}
