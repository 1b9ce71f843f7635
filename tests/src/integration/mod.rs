//! Cross-crate integration tests.

pub mod concurrency;
pub mod http_surface;
pub mod lifecycle;
