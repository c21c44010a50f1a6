use std::collections::HashMap;

/// Decoded body of a `NormalizedResponse`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Parsed from an `application/json` response.
    Json(serde_json::Value),
    /// Any other content type, in canonical byte form.
    Bytes(Vec<u8>),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ResponseBody::Bytes(bytes) => Some(bytes),
            ResponseBody::Json(_) => None,
        }
    }
}

/// The environment-independent result of a completed request.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResponse {
    status: u16,
    headers: HashMap<String, String>,
    body: ResponseBody,
    text: String,
}

impl NormalizedResponse {
    pub fn new(status: u16, headers: HashMap<String, String>, body: ResponseBody, text: String) -> Self {
        NormalizedResponse { status, headers, body, text }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Exact-name lookup, names are kept as the transport reported them.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_error(&self) -> bool {
        is_error_status(self.status)
    }
}

// 4xx/5xx, decided on the first digit of the decimal status
pub fn is_error_status(status: u16) -> bool {
    matches!(status.to_string().chars().next(), Some('4') | Some('5'))
}
