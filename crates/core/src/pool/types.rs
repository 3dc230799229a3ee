//! Types produced by the concurrency pool.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a single item failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureDetail {
    /// The worker returned an error.
    Transform { message: String },
    /// The worker did not finish within the per-item timeout.
    Timeout { after_ms: u64 },
    /// The worker panicked.
    Panicked { message: String },
}

impl FailureDetail {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transform { .. } => "failed",
            Self::Timeout { .. } => "timeout",
            Self::Panicked { .. } => "panicked",
        }
    }
}

impl fmt::Display for FailureDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transform { message } => write!(f, "{}", message),
            Self::Timeout { after_ms } => write!(f, "timed out after {} ms", after_ms),
            Self::Panicked { message } => write!(f, "worker panicked: {}", message),
        }
    }
}

/// Outcome of one worker invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure(FailureDetail),
}

/// An item paired with the outcome of processing it.
#[derive(Debug, Clone)]
pub struct ExecutionResult<T> {
    pub item: T,
    pub outcome: Outcome,
}

impl<T> ExecutionResult<T> {
    /// Whether the worker completed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success)
    }

    /// The failure detail, if the item failed.
    pub fn failure(&self) -> Option<&FailureDetail> {
        match &self.outcome {
            Outcome::Success => None,
            Outcome::Failure(detail) => Some(detail),
        }
    }
}

/// Running completion counter, reported after each result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolProgress {
    pub completed: usize,
    pub total: usize,
}
