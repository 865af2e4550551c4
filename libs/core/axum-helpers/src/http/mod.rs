//! HTTP middleware module.
//!
//! - CORS configuration
//! - Request tracing
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::http::{cors_layer_from_env, trace_layer};
//!
//! let app = Router::new()
//!     .layer(trace_layer())
//!     .layer(cors_layer_from_env()?);
//! ```

pub mod cors;
pub mod logging;

pub use cors::{cors_layer_from_env, create_cors_layer, create_permissive_cors_layer};
pub use logging::{RequestSpan, RequestTraceLayer, ResponseLog, trace_layer};
