//! Rule provider ports - how declarative limit rules reach the engine.
//! The engine never parses rule declarations itself.

use crate::domain::{LimitDescriptor, RequestContext};

/// Supplies the ordered candidate descriptors attached to a routed
/// handler (annotations, attributes, or config - the loader's concern).
pub trait RuleProvider: Send + Sync {
    fn rules_for(&self, request: &RequestContext) -> Vec<LimitDescriptor>;
}

/// Fallback matcher consulted when a request carries no candidate
/// descriptors at all: resolves a limit from the request path instead.
pub trait PathLimitProvider: Send + Sync {
    /// The descriptor applying to this request's path and method, if any.
    fn rate_limit(&self, request: &RequestContext) -> Option<LimitDescriptor>;

    /// The configured path pattern that matched, used as the bucket alias.
    fn matched_path(&self, request: &RequestContext) -> Option<String>;
}
