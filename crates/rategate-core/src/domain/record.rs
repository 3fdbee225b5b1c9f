use serde::{Deserialize, Serialize};

/// Quota record - the persisted counter state for one storage key.
///
/// The counter store owns the persisted copy; the engine only ever holds
/// request-scoped snapshots. While `blocked` is set, `reset_at` holds the
/// block expiry rather than the original window end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaRecord {
    pub key: String,
    pub limit: i64,
    pub calls: i64,
    /// Unix timestamp (seconds) at which the window or block lapses.
    pub reset_at: i64,
    pub blocked: bool,
}

impl QuotaRecord {
    /// A freshly created window: one call counted, not blocked.
    pub fn fresh(key: impl Into<String>, limit: i64, reset_at: i64) -> Self {
        Self {
            key: key.into(),
            limit,
            calls: 1,
            reset_at,
            blocked: false,
        }
    }

    /// Calls left in the current window, clamped at zero.
    pub fn remaining(&self) -> i64 {
        (self.limit - self.calls).max(0)
    }

    /// Whether the window (or block) has lapsed at `now`.
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.reset_at
    }

    /// Whether the counter has gone past its limit. Never true for the
    /// unlimited sentinel (`limit == -1`).
    pub fn has_exceeded(&self) -> bool {
        self.limit >= 0 && self.calls > self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_record() {
        let record = QuotaRecord::fresh("key", 100, 1234);
        assert_eq!(record.calls, 1);
        assert_eq!(record.limit, 100);
        assert_eq!(record.reset_at, 1234);
        assert!(!record.blocked);
        assert_eq!(record.remaining(), 99);
    }

    #[test]
    fn test_exceeded_ignores_unlimited_sentinel() {
        let mut record = QuotaRecord::fresh("key", -1, 1234);
        record.calls = 1_000_000;
        assert!(!record.has_exceeded());

        let mut record = QuotaRecord::fresh("key", 2, 1234);
        record.calls = 2;
        assert!(!record.has_exceeded());
        record.calls = 3;
        assert!(record.has_exceeded());
    }

    #[test]
    fn test_remaining_clamps_at_zero() {
        let mut record = QuotaRecord::fresh("key", 2, 1234);
        record.calls = 5;
        assert_eq!(record.remaining(), 0);
    }

    #[test]
    fn test_expiry() {
        let record = QuotaRecord::fresh("key", 2, 1000);
        assert!(!record.is_expired(999));
        assert!(record.is_expired(1000));
        assert!(record.is_expired(1001));
    }
}
