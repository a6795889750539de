//! Tower middleware layers for the justhttp transport.
//!
//! Layers wrap [`crate::HyperClient`] through
//! [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer) and see every
//! request the JSON pipeline dispatches, after auth and query decoration.
//!
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

pub use tower::Layer;
