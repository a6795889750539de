//! Prelude module for convenient imports.
//!
//! ```ignore
//! use justhttp_core::prelude::*;
//! ```

pub use crate::{
    BasicAuthCredentials, Body, Error, HttpClient, Method, Policy, Request, RequestArguments,
    RequestBuilder, Response, Result, from_json, resolve, to_json,
};
