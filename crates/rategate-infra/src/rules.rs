//! Declarative path limits - the fallback rule source for requests that
//! carry no per-handler descriptors.

use serde::{Deserialize, Serialize};

use rategate_core::domain::{LimitDescriptor, RequestContext};
use rategate_core::ports::PathLimitProvider;

/// One configured path rule: a path pattern plus the limit triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathLimit {
    /// Path pattern, matched as a segment prefix (e.g. `api/users`).
    pub path: String,
    /// HTTP methods this rule applies to (empty = any).
    #[serde(default)]
    pub methods: Vec<String>,
    pub limit: i64,
    pub period: u64,
    #[serde(default)]
    pub block_period: u64,
}

impl PathLimit {
    fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }

    fn matches(&self, method: &str, path: &str) -> bool {
        if !self.methods.is_empty() && !self.methods.iter().any(|m| m == method) {
            return false;
        }
        let request_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let own: Vec<&str> = self.segments().collect();
        own.len() <= request_segments.len() && own == request_segments[..own.len()]
    }

    fn descriptor(&self) -> LimitDescriptor {
        LimitDescriptor {
            methods: self.methods.clone(),
            limit: self.limit,
            period: self.period,
            block_period: self.block_period,
        }
    }
}

/// Configuration-driven path rule set. The first rule whose path prefix
/// and method match wins, so order entries from most to least specific.
pub struct PathLimits {
    limits: Vec<PathLimit>,
}

impl PathLimits {
    pub fn new(limits: Vec<PathLimit>) -> Self {
        Self { limits }
    }

    /// Load rules from a JSON array.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    fn find(&self, request: &RequestContext) -> Option<&PathLimit> {
        self.limits
            .iter()
            .find(|limit| limit.matches(&request.method, &request.path))
    }
}

impl PathLimitProvider for PathLimits {
    fn rate_limit(&self, request: &RequestContext) -> Option<LimitDescriptor> {
        self.find(request).map(PathLimit::descriptor)
    }

    fn matched_path(&self, request: &RequestContext) -> Option<String> {
        self.find(request)
            .map(|limit| limit.segments().collect::<Vec<_>>().join("/"))
    }
}
