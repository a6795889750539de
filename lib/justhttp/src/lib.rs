//! Typed JSON requests over HTTP.
//!
//! Send a serializable payload, get a deserialized response back, with a
//! per-call policy: deadline, response size limit, basic auth and query
//! parameters.
//!
//! # Example
//!
//! ```ignore
//! use justhttp::RequestArguments;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! struct Ping {
//!     cluster_name: String,
//! }
//!
//! #[derive(Deserialize)]
//! struct Pong {
//!     pings: u32,
//! }
//!
//! let pong: Pong = justhttp::post(
//!     "https://api.example.com/ping",
//!     &Ping { cluster_name: "cl1".into() },
//!     &[RequestArguments::new().timeout_ms(500).size_limit(4096)],
//! )
//! .await?;
//! ```
//!
//! Failures are classified in [`Error`]: a deadline expiry is
//! [`Error::Timeout`], an oversized body is [`Error::SizeLimit`], a `401` is
//! [`Error::Auth`], and so on.

mod api;
mod client;
mod config;
mod connector;
pub mod middleware;
mod pipeline;
pub mod prelude;
mod raw;

pub use api::{JustHttp, delete, get, post, put};
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use pipeline::JsonRequest;
pub use raw::{get_raw, get_string};

// Re-export core types
pub use justhttp_core::{
    BasicAuthCredentials, Body, BodyStream, DEFAULT_SIZE_LIMIT, Error, HttpClient, Method,
    Policy, Request, RequestArguments, RequestBuilder, Response, Result, from_json, parse_url,
    resolve, to_json,
};

pub use tower;
pub use url;
