//! # Rategate Shared
//!
//! Presentation helpers for transports embedding the engine: the
//! rejection body rendered on a blocked request and the `X-RateLimit-*`
//! header values derived from a quota record.

pub mod headers;
pub mod response;

pub use headers::RateLimitHeaders;
pub use response::RejectionBody;
