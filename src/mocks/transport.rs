use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use client::{FetchError, Transport, TransportRequest, TransportResponse};
use http::StatusCode;

#[derive(Clone)]
pub struct MockResponse {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    // expose headers through `raw_headers` instead of `entries`
    raw: bool,
}

impl MockResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        MockResponse {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            headers: Vec::new(),
            body: body.into(),
            raw: false,
        }
    }

    pub fn json(status: u16, body: &str) -> Self {
        MockResponse::new(status, body).with_header("Content-Type", "application/json")
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_raw_headers(mut self) -> Self {
        self.raw = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub url: String,
    pub request: TransportRequest,
}

/// Replays one scripted response (or failure) for every call and records
/// what it was asked to send.
pub struct MockTransport {
    response: Result<MockResponse, String>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockTransport {
    pub fn new(response: MockResponse) -> Self {
        MockTransport {
            response: Ok(response),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: &str) -> Self {
        MockTransport {
            response: Err(message.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(&self, url: &str, request: TransportRequest) -> Result<Box<dyn TransportResponse>, FetchError> {
        // a panicking test thread must not hide later calls
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall { url: url.to_string(), request });
        log::debug!("mock transport answering {}", url);

        match &self.response {
            Ok(response) => Ok(Box::new(MockTransportResponse {
                response: response.clone(),
                consumed: false,
            })),
            Err(message) => Err(FetchError::Transport(message.clone())),
        }
    }
}

struct MockTransportResponse {
    response: MockResponse,
    consumed: bool,
}

impl MockTransportResponse {
    // header names in first-seen order with every value
    fn grouped(&self) -> Vec<(String, Vec<String>)> {
        let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
        for (name, value) in &self.response.headers {
            match grouped.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
                Some((_, values)) => values.push(value.clone()),
                None => grouped.push((name.clone(), vec![value.clone()])),
            }
        }
        grouped
    }

    fn take_body(&mut self) -> Result<Vec<u8>, FetchError> {
        if self.consumed {
            return Err(FetchError::BodyRead(String::from("body already consumed")));
        }
        self.consumed = true;
        Ok(self.response.body.clone())
    }
}

#[async_trait]
impl TransportResponse for MockTransportResponse {
    fn status(&self) -> u16 {
        self.response.status.as_u16()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.grouped()
            .into_iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.join(", "))
    }

    fn raw_headers(&self) -> Option<Vec<(String, Vec<String>)>> {
        if self.response.raw {
            Some(self.grouped())
        } else {
            None
        }
    }

    // single-valued view: repeated headers are joined
    fn entries(&self) -> Vec<(String, String)> {
        self.grouped()
            .into_iter()
            .map(|(name, values)| (name, values.join(", ")))
            .collect()
    }

    async fn text(&mut self) -> Result<String, FetchError> {
        let body = self.take_body()?;
        String::from_utf8(body).map_err(|e| FetchError::BodyRead(e.to_string()))
    }

    async fn bytes(&mut self) -> Result<Vec<u8>, FetchError> {
        self.take_body()
    }
}
