use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::error::FetchError;
use crate::method::HttpMethod;

/// What the builder hands to the transport, the url travels separately.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
}

/// A response as the transport delivers it, before normalization.
///
/// Headers stay readable after the body has been consumed.
#[async_trait]
pub trait TransportResponse: Send {
    fn status(&self) -> u16;

    fn header(&self, name: &str) -> Option<String>;

    /// Every header with all of its values. Transports that only know
    /// single-valued headers return `None` and answer `entries` instead.
    fn raw_headers(&self) -> Option<Vec<(String, Vec<String>)>> {
        None
    }

    fn entries(&self) -> Vec<(String, String)>;

    async fn text(&mut self) -> Result<String, FetchError>;

    async fn bytes(&mut self) -> Result<Vec<u8>, FetchError>;
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, url: &str, request: TransportRequest) -> Result<Box<dyn TransportResponse>, FetchError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        ReqwestTransport { client: reqwest::Client::new() }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        ReqwestTransport { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(&self, url: &str, request: TransportRequest) -> Result<Box<dyn TransportResponse>, FetchError> {
        let mut builder = self.client.request(request.method.into(), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Box::new(ReqwestResponse::new(response)))
    }
}

struct ReqwestResponse {
    status: u16,
    headers: HeaderMap,
    // taken by the first body read
    inner: Option<reqwest::Response>,
}

impl ReqwestResponse {
    fn new(response: reqwest::Response) -> Self {
        ReqwestResponse {
            status: response.status().as_u16(),
            headers: response.headers().clone(),
            inner: Some(response),
        }
    }

    fn take(&mut self) -> Result<reqwest::Response, FetchError> {
        self.inner.take()
            .ok_or_else(|| FetchError::BodyRead(String::from("body already consumed")))
    }
}

#[async_trait]
impl TransportResponse for ReqwestResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers.get(name).map(|v| String::from_utf8_lossy(v.as_bytes()).to_string())
    }

    fn raw_headers(&self) -> Option<Vec<(String, Vec<String>)>> {
        let raw = self.headers.keys()
            .map(|name| {
                let values = self.headers.get_all(name)
                    .iter()
                    .map(|v| String::from_utf8_lossy(v.as_bytes()).to_string())
                    .collect();
                (name.as_str().to_string(), values)
            })
            .collect();
        Some(raw)
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.headers.iter()
            .map(|(name, v)| (name.as_str().to_string(), String::from_utf8_lossy(v.as_bytes()).to_string()))
            .collect()
    }

    async fn text(&mut self) -> Result<String, FetchError> {
        self.take()?.text().await
            .map_err(|e| FetchError::BodyRead(e.to_string()))
    }

    async fn bytes(&mut self) -> Result<Vec<u8>, FetchError> {
        self.take()?.bytes().await
            .map(|b| b.to_vec())
            .map_err(|e| FetchError::BodyRead(e.to_string()))
    }
}
