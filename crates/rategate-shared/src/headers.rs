//! Rate limit response headers.

use rategate_core::domain::QuotaRecord;

pub const HEADER_LIMIT: &str = "X-RateLimit-Limit";
pub const HEADER_REMAINING: &str = "X-RateLimit-Remaining";
pub const HEADER_RESET: &str = "X-RateLimit-Reset";

/// The `X-RateLimit-*` header values for one response, computed from the
/// record the engine annotated the request with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitHeaders {
    pub limit: i64,
    pub remaining: i64,
    pub reset: i64,
}

impl RateLimitHeaders {
    pub fn from_record(record: &QuotaRecord) -> Self {
        Self {
            limit: record.limit,
            remaining: record.remaining(),
            reset: record.reset_at,
        }
    }

    /// Header name/value pairs, ready to insert into any response type.
    pub fn pairs(&self) -> [(&'static str, String); 3] {
        [
            (HEADER_LIMIT, self.limit.to_string()),
            (HEADER_REMAINING, self.remaining.to_string()),
            (HEADER_RESET, self.reset.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_from_record() {
        let mut record = QuotaRecord::fresh("key", 100, 1234);
        record.calls = 40;

        let headers = RateLimitHeaders::from_record(&record);
        assert_eq!(headers.limit, 100);
        assert_eq!(headers.remaining, 60);
        assert_eq!(headers.reset, 1234);

        let pairs = headers.pairs();
        assert_eq!(pairs[0], (HEADER_LIMIT, "100".to_string()));
        assert_eq!(pairs[1], (HEADER_REMAINING, "60".to_string()));
        assert_eq!(pairs[2], (HEADER_RESET, "1234".to_string()));
    }

    #[test]
    fn test_remaining_never_negative() {
        let mut record = QuotaRecord::fresh("key", 2, 1234);
        record.calls = 10;
        assert_eq!(RateLimitHeaders::from_record(&record).remaining, 0);
    }
}
