//! Rejection body (RFC 7807 problem details shape).

use serde::{Deserialize, Serialize};

use rategate_core::ports::RejectionResponse;

/// RFC 7807 Problem Details body for a rate-limited request.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionBody {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// A short, human-readable summary of the problem.
    pub title: String,

    /// The HTTP status code.
    pub status: u16,

    /// Seconds until the block lapses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl RejectionBody {
    pub fn from_rejection(rejection: &RejectionResponse) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: rejection.message.clone(),
            status: rejection.status,
            retry_after: rejection.retry_after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_serialization() {
        let body = RejectionBody::from_rejection(&RejectionResponse {
            status: 429,
            message: "Rate limit exceeded".to_string(),
            retry_after: Some(30),
        });

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["type"], "about:blank");
        assert_eq!(json["title"], "Rate limit exceeded");
        assert_eq!(json["status"], 429);
        assert_eq!(json["retry_after"], 30);
    }

    #[test]
    fn test_retry_after_omitted_when_unknown() {
        let body = RejectionBody::from_rejection(&RejectionResponse {
            status: 429,
            message: "Rate limit exceeded".to_string(),
            retry_after: None,
        });

        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("retry_after"));
    }
}
