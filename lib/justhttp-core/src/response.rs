//! HTTP response handling.
//!
//! A transport hands back a [`Response<Body>`]: status and headers are available
//! right away while the [`Body`] is still a stream of chunks. The body is either
//! read whole with [`Body::collect`] or with an upper bound with
//! [`Body::read_limited`]. Dropping a [`Body`] releases the underlying connection.

use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures_core::Stream;
use futures_util::{StreamExt, stream};

use crate::{Error, Result};

/// A streaming body: chunks of bytes arriving over time.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Response body, consumed as a stream of chunks.
pub struct Body {
    stream: BodyStream,
}

impl Body {
    /// Wrap a stream of chunks.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self {
            stream: Box::pin(stream),
        }
    }

    /// A body without any bytes.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(stream::empty())
    }

    /// Read the whole body into memory.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded by the underlying stream.
    pub async fn collect(self) -> Result<Bytes> {
        let mut stream = self.stream;
        let mut collected = BytesMut::new();

        while let Some(chunk) = stream.next().await {
            collected.extend_from_slice(&chunk?);
        }

        Ok(collected.freeze())
    }

    /// Read at most `limit` bytes.
    ///
    /// Reading stops as soon as the body is known to hold more than `limit`
    /// bytes; the rest is never buffered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeLimit`] if the body is larger than `limit`, or the
    /// first error yielded by the underlying stream.
    pub async fn read_limited(self, limit: u64) -> Result<Bytes> {
        let mut stream = self.stream;
        let mut collected = BytesMut::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            let read = len_u64(collected.len()).saturating_add(len_u64(chunk.len()));
            if read > limit {
                return Err(Error::SizeLimit { limit });
            }
            collected.extend_from_slice(&chunk);
        }

        Ok(collected.freeze())
    }
}

fn len_u64(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body").finish_non_exhaustive()
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        if bytes.is_empty() {
            Self::empty()
        } else {
            Self::new(stream::iter([Ok(bytes)]))
        }
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Self::from(Bytes::from_static(text.as_bytes()))
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::from(Bytes::from(text))
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from(Bytes::from(bytes))
    }
}

/// HTTP response with status, headers, and body.
#[derive(Debug)]
pub struct Response<B = Body> {
    status: u16,
    headers: HashMap<String, String>,
    body: B,
}

impl<B> Response<B> {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Declared `Content-Length`, if present and valid.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.header("content-length")?.trim().parse().ok()
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> B {
        self.body
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 401.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}
