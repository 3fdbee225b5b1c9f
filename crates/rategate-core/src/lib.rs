//! # Rategate Core
//!
//! The decision layer of the rategate rate limiter.
//! This crate contains the rule resolver, key composer, and counter state
//! machine, with zero storage dependencies: backends implement the
//! [`ports::CounterStore`] contract.

pub mod domain;
pub mod engine;
pub mod error;
pub mod key;
pub mod ports;
pub mod resolver;

pub use engine::{Decision, EngineConfig, FailurePolicy, RateLimitEngine, Verdict};
pub use error::EngineError;
