//! What the pipeline does when a remote summary cannot be produced.

use serde::{Deserialize, Serialize};

/// Fallback strategy when the remote summary fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryFallback {
    /// Build the summary locally from templates
    #[default]
    Deterministic,

    /// Surface the error to the caller
    Fail,
}

impl SummaryFallback {
    pub fn allows_local(&self) -> bool {
        matches!(self, SummaryFallback::Deterministic)
    }
}
