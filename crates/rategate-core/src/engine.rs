//! Decision engine - orchestrates resolver, key composer, and counter
//! store into an allow/block verdict. Owns the counter state machine:
//! create, increment, expire/reset, exceed, block, unblock.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{LimitDescriptor, QuotaRecord, RequestContext};
use crate::error::EngineError;
use crate::ports::{
    CounterStore, KeyGenerationHook, PathLimitProvider, PostBlockHook, RejectionResponse,
    ResponseHook, RuleProvider, StoreError,
};
use crate::{key, resolver};

/// What to do when the counter store is unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Let the request through without counting it.
    FailOpen,
    /// Reject the request.
    FailClosed,
}

/// Deployment-time engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub failure_policy: FailurePolicy,
    /// Status code of the default rejection response.
    pub rejection_status: u16,
    /// Message of the default rejection response.
    pub rejection_message: String,
    /// Return `EngineError::RateLimitExceeded` instead of a Block verdict.
    pub escalate_rejection: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::FailOpen,
            rejection_status: 429,
            rejection_message: "Rate limit exceeded".to_string(),
            escalate_rejection: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            failure_policy: std::env::var("RATEGATE_FAIL_CLOSED")
                .map(|v| v == "true" || v == "1")
                .map(|closed| {
                    if closed {
                        FailurePolicy::FailClosed
                    } else {
                        FailurePolicy::FailOpen
                    }
                })
                .unwrap_or(defaults.failure_policy),
            rejection_status: std::env::var("RATEGATE_REJECTION_STATUS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.rejection_status),
            rejection_message: std::env::var("RATEGATE_REJECTION_MESSAGE")
                .unwrap_or(defaults.rejection_message),
            escalate_rejection: std::env::var("RATEGATE_ESCALATE_REJECTION")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.escalate_rejection),
        }
    }
}

/// The outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Block,
}

/// Verdict returned by [`RateLimitEngine::check`]. The record is absent
/// when no rule matched or the store failed.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub decision: Decision,
    pub record: Option<QuotaRecord>,
}

impl Verdict {
    fn allow(record: Option<QuotaRecord>) -> Self {
        Self {
            decision: Decision::Allow,
            record,
        }
    }

    fn block(record: Option<QuotaRecord>) -> Self {
        Self {
            decision: Decision::Block,
            record,
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.decision == Decision::Allow
    }
}

/// The rate limit decision engine.
///
/// Holds no mutable state of its own; all shared state lives in the
/// counter store, which serializes concurrent callers per key. Hooks and
/// the path-rule fallback are injected at construction.
pub struct RateLimitEngine {
    store: Arc<dyn CounterStore>,
    config: EngineConfig,
    path_limits: Option<Arc<dyn PathLimitProvider>>,
    key_hooks: Vec<Arc<dyn KeyGenerationHook>>,
    block_hooks: Vec<Arc<dyn PostBlockHook>>,
    response_hooks: Vec<Arc<dyn ResponseHook>>,
}

impl RateLimitEngine {
    pub fn new(store: Arc<dyn CounterStore>, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            path_limits: None,
            key_hooks: Vec::new(),
            block_hooks: Vec::new(),
            response_hooks: Vec::new(),
        }
    }

    /// Register the fallback matcher consulted when a request carries no
    /// candidate descriptors.
    pub fn with_path_limits(mut self, provider: Arc<dyn PathLimitProvider>) -> Self {
        self.path_limits = Some(provider);
        self
    }

    pub fn with_key_hook(mut self, hook: Arc<dyn KeyGenerationHook>) -> Self {
        self.key_hooks.push(hook);
        self
    }

    pub fn with_block_hook(mut self, hook: Arc<dyn PostBlockHook>) -> Self {
        self.block_hooks.push(hook);
        self
    }

    pub fn with_response_hook(mut self, hook: Arc<dyn ResponseHook>) -> Self {
        self.response_hooks.push(hook);
        self
    }

    /// Gather candidates from a rule provider, then [`check`](Self::check).
    pub async fn check_request(
        &self,
        rules: &dyn RuleProvider,
        request: &mut RequestContext,
    ) -> Result<Verdict, EngineError> {
        let candidates = rules.rules_for(request);
        self.check(&candidates, request).await
    }

    /// Run the counter state machine for one request.
    ///
    /// Returns an Allow verdict without touching storage when no
    /// descriptor resolves. Otherwise the final record is cloned into
    /// `request.rate_limit_info` for downstream consumers.
    pub async fn check(
        &self,
        candidates: &[LimitDescriptor],
        request: &mut RequestContext,
    ) -> Result<Verdict, EngineError> {
        let (descriptor, path_alias) = match self.resolve(candidates, request) {
            Some(resolved) => resolved,
            None => return Ok(Verdict::allow(None)),
        };

        let key = key::compose(&descriptor, request, path_alias.as_deref(), &self.key_hooks);
        tracing::trace!(key = %key, limit = descriptor.limit, "Checking rate limit");

        let mut record = match self.acquire(&key, &descriptor).await {
            Ok(record) => record,
            Err(err) => return Ok(self.degraded(&key, err)),
        };

        // Window (or block) lapsed: start a fresh one. This runs before
        // the exceeded check on every call; a lapsed block is just another
        // reset_at, so it transitions back to a fresh active window even
        // when the backend TTL has not reaped the key yet.
        let now = Utc::now().timestamp();
        if record.is_expired(now) {
            record = match self.restart_window(&key, &descriptor).await {
                Ok(record) => record,
                Err(err) => return Ok(self.degraded(&key, err)),
            };
        }

        if !record.blocked && !descriptor.is_unlimited() && record.has_exceeded() {
            let block_period = descriptor.effective_block_period();
            if let Err(err) = self.store.set_block(&mut record, block_period).await {
                return Ok(self.degraded(&key, err));
            }
            tracing::debug!(key = %key, calls = record.calls, block_period, "Rate limit exceeded, blocking");
            for hook in &self.block_hooks {
                hook.on_block(request, &record);
            }
        }

        request.rate_limit_info = Some(record.clone());

        if record.blocked {
            if self.config.escalate_rejection {
                return Err(EngineError::RateLimitExceeded { record });
            }
            return Ok(Verdict::block(Some(record)));
        }
        Ok(Verdict::allow(Some(record)))
    }

    /// Build the rejection for a blocked request: the configured
    /// status/message, unless a response hook substitutes its own.
    pub fn rejection(&self, request: &RequestContext, record: &QuotaRecord) -> RejectionResponse {
        let now = Utc::now().timestamp();
        let mut response = RejectionResponse {
            status: self.config.rejection_status,
            message: self.config.rejection_message.clone(),
            retry_after: Some((record.reset_at - now).max(0) as u64),
        };
        for hook in &self.response_hooks {
            if let Some(substitute) = hook.on_reject(request, record) {
                response = substitute;
                break;
            }
        }
        response
    }

    fn resolve(
        &self,
        candidates: &[LimitDescriptor],
        request: &RequestContext,
    ) -> Option<(LimitDescriptor, Option<String>)> {
        if candidates.is_empty() {
            // Fall through to the path-based matcher, whose matched
            // pattern also becomes the bucket alias.
            let provider = self.path_limits.as_deref()?;
            let descriptor = provider.rate_limit(request)?;
            let alias = provider.matched_path(request);
            return Some((descriptor, alias));
        }
        resolver::resolve(candidates, &request.method).map(|descriptor| (descriptor.clone(), None))
    }

    async fn acquire(
        &self,
        key: &str,
        descriptor: &LimitDescriptor,
    ) -> Result<QuotaRecord, StoreError> {
        if let Some(record) = self.store.limit_rate(key).await? {
            return Ok(record);
        }
        self.store
            .create_rate(key, descriptor.limit, descriptor.period)
            .await
    }

    async fn restart_window(
        &self,
        key: &str,
        descriptor: &LimitDescriptor,
    ) -> Result<QuotaRecord, StoreError> {
        self.store.reset_rate(key).await?;
        self.store
            .create_rate(key, descriptor.limit, descriptor.period)
            .await
    }

    fn degraded(&self, key: &str, err: StoreError) -> Verdict {
        tracing::error!(key = %key, error = %err, "Counter store failure");
        match self.config.failure_policy {
            FailurePolicy::FailOpen => {
                tracing::warn!(key = %key, "Failing open");
                Verdict::allow(None)
            }
            FailurePolicy::FailClosed => Verdict::block(None),
        }
    }
}
