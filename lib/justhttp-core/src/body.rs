//! JSON serialization utilities.

use bytes::Bytes;

use crate::{Error, Result};

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if JSON serialization fails.
///
/// # Example
///
/// ```
/// use justhttp_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Ping { cluster_name: String, pings: u32 }
///
/// let ping = Ping { cluster_name: "cl1".to_string(), pings: 2 };
/// let bytes = to_json(&ping).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"cluster_name":"cl1","pings":2}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Deserialize the first JSON value in `bytes`, keeping the path of the
/// failing field. Anything after that value is ignored.
///
/// # Errors
///
/// Returns [`Error::Decode`] with the JSON path where deserialization failed.
///
/// # Example
///
/// ```
/// use justhttp_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Ping { pings: u32 }
///
/// let err = from_json::<Ping>(br#"{"pings":"two"}"#).unwrap_err();
/// assert!(err.to_string().contains("'pings'"));
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        Error::decode(path, err.into_inner().to_string())
    })
}
