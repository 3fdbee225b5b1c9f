//! Engine-level error types.

use thiserror::Error;

use crate::domain::QuotaRecord;

/// Errors surfaced by the decision engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Raised instead of a Block verdict when
    /// [`EngineConfig::escalate_rejection`](crate::EngineConfig) is set,
    /// for deployments that prefer an error to a response.
    #[error("Rate limit exceeded for key {}", .record.key)]
    RateLimitExceeded { record: QuotaRecord },
}
