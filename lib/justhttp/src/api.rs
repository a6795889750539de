//! Typed `get`/`post`/`put`/`delete` calls.
//!
//! [`JustHttp`] binds the JSON pipeline to one transport; clone it to share the
//! transport's connection pool between calls and tasks. The free functions
//! build a default [`HyperClient`] for each call.

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{HttpClient, HyperClient, JsonRequest, Method, RequestArguments, Result, raw};

/// JSON client over an [`HttpClient`] transport.
///
/// # Example
///
/// ```ignore
/// use justhttp::{JustHttp, RequestArguments};
///
/// let http = JustHttp::new();
/// let stats: ClusterStats = http
///     .get("https://api.example.com/stats", &[RequestArguments::new().timeout_ms(500)])
///     .await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct JustHttp<C = HyperClient> {
    client: C,
}

impl JustHttp<HyperClient> {
    /// Create a client over a default [`HyperClient`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(HyperClient::new())
    }
}

impl<C: HttpClient> JustHttp<C> {
    /// Create a client over the given transport.
    pub const fn with_client(client: C) -> Self {
        Self { client }
    }

    /// The underlying transport.
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Send `payload` as JSON with `method` and decode the JSON response.
    ///
    /// A `None` payload sends an empty body.
    pub async fn send<D, R>(
        &self,
        method: Method,
        url: &str,
        payload: Option<&D>,
        args: &[RequestArguments],
    ) -> Result<R>
    where
        D: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        JsonRequest::new(&self.client, method, url, payload, args)
            .process()
            .await
    }

    /// `GET` `url` and decode the JSON response.
    pub async fn get<R: DeserializeOwned>(&self, url: &str, args: &[RequestArguments]) -> Result<R> {
        self.send::<(), R>(Method::Get, url, None, args).await
    }

    /// `POST` `data` as JSON and decode the JSON response.
    pub async fn post<D, R>(&self, url: &str, data: &D, args: &[RequestArguments]) -> Result<R>
    where
        D: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(Method::Post, url, Some(data), args).await
    }

    /// `PUT` `data` as JSON and decode the JSON response.
    pub async fn put<D, R>(&self, url: &str, data: &D, args: &[RequestArguments]) -> Result<R>
    where
        D: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(Method::Put, url, Some(data), args).await
    }

    /// `DELETE` with `data` as JSON body and decode the JSON response.
    pub async fn delete<D, R>(&self, url: &str, data: &D, args: &[RequestArguments]) -> Result<R>
    where
        D: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(Method::Delete, url, Some(data), args).await
    }

    /// `GET` `url` and return the body bytes, without any policy.
    pub async fn get_raw(&self, url: &str) -> Result<Bytes> {
        raw::fetch_raw(&self.client, url).await
    }

    /// `GET` `url` and return the body as text, without any policy.
    pub async fn get_string(&self, url: &str) -> Result<String> {
        raw::fetch_string(&self.client, url).await
    }
}

/// `GET` `url` and decode the JSON response.
///
/// # Example
///
/// ```ignore
/// let stats: ClusterStats = justhttp::get("https://api.example.com/stats", &[]).await?;
/// ```
pub async fn get<R: DeserializeOwned>(url: &str, args: &[RequestArguments]) -> Result<R> {
    JustHttp::new().get(url, args).await
}

/// `POST` `data` as JSON and decode the JSON response.
pub async fn post<D, R>(url: &str, data: &D, args: &[RequestArguments]) -> Result<R>
where
    D: Serialize + ?Sized,
    R: DeserializeOwned,
{
    JustHttp::new().post(url, data, args).await
}

/// `PUT` `data` as JSON and decode the JSON response.
pub async fn put<D, R>(url: &str, data: &D, args: &[RequestArguments]) -> Result<R>
where
    D: Serialize + ?Sized,
    R: DeserializeOwned,
{
    JustHttp::new().put(url, data, args).await
}

/// `DELETE` with `data` as JSON body and decode the JSON response.
pub async fn delete<D, R>(url: &str, data: &D, args: &[RequestArguments]) -> Result<R>
where
    D: Serialize + ?Sized,
    R: DeserializeOwned,
{
    JustHttp::new().delete(url, data, args).await
}
