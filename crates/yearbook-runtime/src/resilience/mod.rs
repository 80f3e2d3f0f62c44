//! Resilience patterns for yearbook-runtime.
//!
//! This module provides:
//! - Circuit breaker per remote call kind
//! - Summary fallback strategy

mod circuit_breaker;
mod fallback;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState, RemoteCall};
pub use fallback::SummaryFallback;
