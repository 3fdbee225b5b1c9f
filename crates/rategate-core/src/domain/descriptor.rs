use serde::{Deserialize, Serialize};

/// Limit descriptor - one declarative rate limit rule.
///
/// An empty `methods` list acts as a wildcard that applies to any HTTP
/// method. `limit == -1` means unlimited: calls are still counted but the
/// threshold never triggers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitDescriptor {
    /// HTTP methods this rule applies to (empty = any).
    pub methods: Vec<String>,
    /// Maximum calls per window, or -1 for unlimited.
    pub limit: i64,
    /// Window duration in seconds.
    pub period: u64,
    /// Cooldown after the limit is exceeded, in seconds (0 = reuse `period`).
    pub block_period: u64,
}

impl Default for LimitDescriptor {
    fn default() -> Self {
        Self {
            methods: Vec::new(),
            limit: -1,
            period: 3600,
            block_period: 0,
        }
    }
}

impl LimitDescriptor {
    /// Create a wildcard descriptor with the given limit and period.
    pub fn new(limit: i64, period: u64) -> Self {
        Self {
            limit,
            period,
            ..Self::default()
        }
    }

    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_block_period(mut self, block_period: u64) -> Self {
        self.block_period = block_period;
        self
    }

    /// Whether this rule never blocks (`limit == -1` sentinel).
    pub fn is_unlimited(&self) -> bool {
        self.limit < 0
    }

    /// The cooldown applied on a block transition.
    pub fn effective_block_period(&self) -> u64 {
        if self.block_period > 0 {
            self.block_period
        } else {
            self.period
        }
    }

    /// The method list as a deterministic key segment (sorted, dot-joined).
    pub fn method_segment(&self) -> String {
        let mut methods = self.methods.clone();
        methods.sort();
        methods.join(".")
    }
}
