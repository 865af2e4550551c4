//! Custom extractors for Axum handlers.
//!
//! Both extractors reject with the shared JSON error envelope, so handlers
//! only ever see well-formed input.

pub mod id_path;
pub mod validated_json;

pub use id_path::IdPath;
pub use validated_json::ValidatedJson;
