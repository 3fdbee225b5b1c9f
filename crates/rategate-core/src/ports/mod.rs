//! Ports - trait definitions for external collaborators.
//! Backends, rule loaders, and extension hooks implement these.

mod counter_store;
mod hooks;
mod rules;

pub use counter_store::{CounterStore, StoreError};
pub use hooks::{KeyGenerationHook, PostBlockHook, RejectionResponse, ResponseHook};
pub use rules::{PathLimitProvider, RuleProvider};
