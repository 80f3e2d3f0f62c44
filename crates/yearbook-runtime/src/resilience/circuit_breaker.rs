//! Circuit breaker to prevent cascade failures.
//!
//! When remote calls fail repeatedly, the circuit opens and subsequent
//! calls go straight to their local fallback.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use crate::config::duration_str;

/// Kind of remote call. Each kind has its own circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteCall {
    Summary,
    Extraction,
    Inspiration,
}

impl fmt::Display for RemoteCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteCall::Summary => write!(f, "summary"),
            RemoteCall::Extraction => write!(f, "extraction"),
            RemoteCall::Inspiration => write!(f, "inspiration"),
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Failures before opening circuit
    pub failure_threshold: u32,

    /// Time before attempting recovery
    #[serde(with = "duration_str")]
    pub recovery_timeout: Duration,

    /// Successes needed to close circuit
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            recovery_timeout: Duration::from_secs(30),
            success_threshold: 1,
        }
    }
}

/// State of a circuit.
#[derive(Debug, Clone)]
pub enum CircuitState {
    /// Normal operation
    Closed { failures: u32 },

    /// Circuit is open, all calls bypass
    Open { opened_at: Instant },

    /// Testing if circuit can close
    HalfOpen { successes: u32 },
}

/// Per-call-kind circuit breaker.
pub struct CircuitBreaker {
    states: RwLock<HashMap<RemoteCall, CircuitState>>,
    config: CircuitBreakerConfig,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Whether calls of this kind should skip the remote and fall back.
    pub fn is_open(&self, call: RemoteCall) -> bool {
        let states = self.states.read();
        match states.get(&call) {
            Some(CircuitState::Open { opened_at }) => {
                if opened_at.elapsed() >= self.config.recovery_timeout {
                    drop(states);
                    self.transition_to_half_open(call);
                    false
                } else {
                    true
                }
            }
            _ => false,
        }
    }

    pub fn record_success(&self, call: RemoteCall) {
        let mut states = self.states.write();
        match states.get(&call).cloned() {
            Some(CircuitState::HalfOpen { successes }) => {
                if successes + 1 >= self.config.success_threshold {
                    states.insert(call, CircuitState::Closed { failures: 0 });
                    tracing::info!(call = %call, "Circuit closed after successful recovery");
                } else {
                    states.insert(
                        call,
                        CircuitState::HalfOpen {
                            successes: successes + 1,
                        },
                    );
                }
            }
            Some(CircuitState::Closed { .. }) => {
                states.insert(call, CircuitState::Closed { failures: 0 });
            }
            _ => {}
        }
    }

    pub fn record_failure(&self, call: RemoteCall) {
        let mut states = self.states.write();
        let failures = match states.get(&call).cloned() {
            Some(CircuitState::Closed { failures }) => failures + 1,
            None => 1,
            Some(CircuitState::HalfOpen { .. }) => {
                states.insert(
                    call,
                    CircuitState::Open {
                        opened_at: Instant::now(),
                    },
                );
                tracing::warn!(call = %call, "Circuit reopened after failed recovery attempt");
                return;
            }
            Some(CircuitState::Open { .. }) => return,
        };

        if failures >= self.config.failure_threshold {
            states.insert(
                call,
                CircuitState::Open {
                    opened_at: Instant::now(),
                },
            );
            tracing::warn!(call = %call, failures, "Circuit opened after repeated failures");
        } else {
            states.insert(call, CircuitState::Closed { failures });
        }
    }

    fn transition_to_half_open(&self, call: RemoteCall) {
        let mut states = self.states.write();
        if matches!(states.get(&call), Some(CircuitState::Open { .. })) {
            states.insert(call, CircuitState::HalfOpen { successes: 0 });
            tracing::info!(call = %call, "Circuit transitioning to half-open for recovery test");
        }
    }

    pub fn state(&self, call: RemoteCall) -> CircuitState {
        self.states
            .read()
            .get(&call)
            .cloned()
            .unwrap_or(CircuitState::Closed { failures: 0 })
    }

    /// Reset all circuits to closed.
    pub fn reset(&self) {
        self.states.write().clear();
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(threshold: u32, recovery: Duration) -> CircuitBreaker {
        CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: threshold,
            recovery_timeout: recovery,
            success_threshold: 1,
        })
    }

    #[test]
    fn test_circuit_starts_closed() {
        assert!(!CircuitBreaker::default().is_open(RemoteCall::Summary));
    }

    #[test]
    fn test_circuit_opens_after_failures() {
        let cb = breaker(2, Duration::from_secs(60));

        cb.record_failure(RemoteCall::Summary);
        assert!(!cb.is_open(RemoteCall::Summary));

        cb.record_failure(RemoteCall::Summary);
        assert!(cb.is_open(RemoteCall::Summary));
    }

    #[test]
    fn test_success_resets_failures() {
        let cb = CircuitBreaker::default();

        cb.record_failure(RemoteCall::Extraction);
        cb.record_failure(RemoteCall::Extraction);
        cb.record_success(RemoteCall::Extraction);

        cb.record_failure(RemoteCall::Extraction);
        cb.record_failure(RemoteCall::Extraction);
        assert!(!cb.is_open(RemoteCall::Extraction));
    }

    #[test]
    fn test_calls_are_independent() {
        let cb = breaker(1, Duration::from_secs(60));
        cb.record_failure(RemoteCall::Summary);

        assert!(cb.is_open(RemoteCall::Summary));
        assert!(!cb.is_open(RemoteCall::Inspiration));
    }

    #[test]
    fn test_half_open_after_recovery_timeout() {
        let cb = breaker(1, Duration::ZERO);
        cb.record_failure(RemoteCall::Summary);

        // Zero recovery: the next check lets a probe through
        assert!(!cb.is_open(RemoteCall::Summary));
        assert!(matches!(cb.state(RemoteCall::Summary), CircuitState::HalfOpen { .. }));

        cb.record_success(RemoteCall::Summary);
        assert!(matches!(
            cb.state(RemoteCall::Summary),
            CircuitState::Closed { failures: 0 }
        ));
    }

    #[test]
    fn test_failed_probe_reopens() {
        let cb = breaker(1, Duration::ZERO);
        cb.record_failure(RemoteCall::Summary);
        assert!(!cb.is_open(RemoteCall::Summary));

        cb.record_failure(RemoteCall::Summary);
        assert!(matches!(cb.state(RemoteCall::Summary), CircuitState::Open { .. }));
    }
}
