//! Single-shot HTTP request builder.
//!
//! A [`Fetcher`] holds the injected capabilities (transport, host
//! environment, multipart form factory) and hands out one
//! [`RequestBuilder`] per request. The builder is configured fluently and
//! finished either with a completion callback ([`RequestBuilder::end`]) or
//! by awaiting it.

pub mod builder;
pub mod config;
pub mod data;
pub mod error;
pub mod fetcher;
pub mod method;
pub mod payload;
pub mod response;

pub use builder::{RequestBuilder, CONTENT_TYPE, JSON_CONTENT_TYPE};
pub use config::{FetcherConfig, HostKind};
pub use data::form::{FormData, FormDataFactory, FormFactory, MultipartForm};
pub use data::host::{HostEnvironment, NativeHost, RawBody, TextHost};
pub use data::transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};
pub use error::FetchError;
pub use fetcher::Fetcher;
pub use method::HttpMethod;
pub use payload::Payload;
pub use response::{NormalizedResponse, ResponseBody};
