//! Core types and traits for the justhttp JSON request pipeline.
//!
//! This crate provides the foundational types used by justhttp:
//! - [`Method`] - HTTP method enum
//! - [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`Response`] and [`Body`] - HTTP response with a streamed body
//! - [`Error`] and [`Result`] - Error handling
//! - [`HttpClient`] - Transport trait for HTTP execution
//! - [`RequestArguments`], [`Policy`] and [`resolve`] - Per-call options

mod body;
mod client;
mod error;
mod method;
mod options;
pub mod prelude;
mod request;
mod response;

pub use body::{from_json, to_json};
pub use client::HttpClient;
pub use error::{Error, Result};
pub use method::Method;
pub use options::{BasicAuthCredentials, DEFAULT_SIZE_LIMIT, Policy, RequestArguments, resolve};
pub use request::{Request, RequestBuilder, parse_url};
pub use response::{Body, BodyStream, Response};
