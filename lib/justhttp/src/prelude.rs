//! Prelude module for convenient imports.
//!
//! ```ignore
//! use justhttp::prelude::*;
//! ```

pub use crate::{
    Error, HttpClient, HyperClient, JustHttp, Method, RequestArguments, Result,
};

pub use serde::{Deserialize, Serialize};
