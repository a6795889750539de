//! Raw `GET` helpers.
//!
//! These bypass the JSON pipeline: no policy, no size limit, no status
//! classification. Whatever the server sends is returned.

use bytes::Bytes;
use tracing::debug;

use crate::{Error, HttpClient, HyperClient, Method, Request, Result, parse_url};

pub(crate) async fn fetch_raw<C: HttpClient>(client: &C, url: &str) -> Result<Bytes> {
    let request = Request::builder(Method::Get, parse_url(url)?).build();
    let response = client.execute(request).await?;
    debug!(url, status = response.status(), "raw response received");
    response.into_body().collect().await
}

pub(crate) async fn fetch_string<C: HttpClient>(client: &C, url: &str) -> Result<String> {
    let bytes = fetch_raw(client, url).await?;
    String::from_utf8(bytes.to_vec()).map_err(|err| Error::decode(".", err.to_string()))
}

/// `GET` `url` and return the whole body as bytes.
pub async fn get_raw(url: &str) -> Result<Bytes> {
    fetch_raw(&HyperClient::new(), url).await
}

/// `GET` `url` and return the whole body as text.
///
/// Fails with [`Error::Decode`] if the body is not UTF-8.
pub async fn get_string(url: &str) -> Result<String> {
    fetch_string(&HyperClient::new(), url).await
}
