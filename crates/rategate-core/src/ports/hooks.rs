//! Extension hooks - explicit trait seams registered on the engine at
//! construction time. Hooks observe or reshape a decision; they never
//! touch stored state.

use crate::domain::{QuotaRecord, RequestContext};

/// The rejection the caller should render when a request is blocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionResponse {
    pub status: u16,
    pub message: String,
    /// Seconds until the block lapses, when known.
    pub retry_after: Option<u64>,
}

/// Invoked exactly once per key composition with the in-progress segment
/// list. Implementations may append segments (per-user, per-IP) to split
/// the quota bucket.
pub trait KeyGenerationHook: Send + Sync {
    fn augment(&self, request: &RequestContext, segments: &mut Vec<String>);
}

/// Notified exactly once per block transition, after the record has been
/// persisted as blocked.
pub trait PostBlockHook: Send + Sync {
    fn on_block(&self, request: &RequestContext, record: &QuotaRecord);
}

/// Offered the chance to substitute the rejection response before it is
/// returned to the caller. The first hook returning `Some` wins.
pub trait ResponseHook: Send + Sync {
    fn on_reject(&self, request: &RequestContext, record: &QuotaRecord)
    -> Option<RejectionResponse>;
}
