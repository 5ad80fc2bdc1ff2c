//! CloudFormation stack status classification.
//!
//! Statuses fall into four partitions. The first two are the waiting and
//! refusal sets; `SETTLED_STATUS` is the explicit success set. Anything
//! outside the three sets is `Unknown` and fatal. Rollback-complete states
//! land in `Unknown`: they are stable, but not the requested deployment.

/// Statuses that mean the stack is still transitioning. Keep polling.
pub const IN_PROGRESS_STATUS: &[&str] = &[
    "CREATE_IN_PROGRESS",
    "ROLLBACK_IN_PROGRESS",
    "UPDATE_IN_PROGRESS",
    "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
    "UPDATE_ROLLBACK_IN_PROGRESS",
    "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS",
    "REVIEW_IN_PROGRESS",
];

/// Statuses under which updating the rule target is unsafe. Abort.
pub const FAILED_STATUS: &[&str] = &[
    "CREATE_FAILED",
    "ROLLBACK_FAILED",
    "DELETE_IN_PROGRESS",
    "DELETE_FAILED",
    "DELETE_COMPLETE",
    "UPDATE_ROLLBACK_FAILED",
];

/// Statuses that mean the stack settled successfully and its outputs
/// describe the deployment the operator asked for.
pub const SETTLED_STATUS: &[&str] = &["CREATE_COMPLETE", "UPDATE_COMPLETE", "IMPORT_COMPLETE"];

/// Which partition a stack status falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Still transitioning; keep polling.
    InProgress,
    /// Unsafe to proceed; abort immediately.
    Failed,
    /// Stable success state; continue the pipeline.
    Settled,
    /// Not in any configured set; abort rather than guess.
    Unknown,
}

impl Settlement {
    pub fn classify(status: &str) -> Self {
        if IN_PROGRESS_STATUS.contains(&status) {
            Settlement::InProgress
        } else if FAILED_STATUS.contains(&status) {
            Settlement::Failed
        } else if SETTLED_STATUS.contains(&status) {
            Settlement::Settled
        } else {
            Settlement::Unknown
        }
    }
}
