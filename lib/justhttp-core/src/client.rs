//! Transport trait.
//!
//! [`HttpClient`] is the seam between the JSON pipeline and the network. The
//! pipeline builds a [`Request`], hands it to the transport, and reads the
//! returned [`Response`] body under its own size bound. Connection reuse and
//! pooling are the transport's business.
//!
//! Implement it directly for custom transports or for testing.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Body, Request, Response, Result};

/// Core HTTP client trait.
///
/// Implementations return as soon as the status and headers are known; the
/// body is streamed through [`Body`].
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Transport`] for network, connection and TLS
    /// failures.
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Body>>> + Send;
}

impl<T: HttpClient> HttpClient for &T {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Body>>> + Send {
        (**self).execute(request)
    }
}

impl<T: HttpClient> HttpClient for Arc<T> {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Body>>> + Send {
        (**self).execute(request)
    }
}
