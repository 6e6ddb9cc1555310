//! Async decompression operations.
//!
//! Uses [`futures::io`] traits (`AsyncRead`) rather than Tokio-specific types
//! for runtime portability. Requires the `async` feature.

pub(crate) mod ops;
