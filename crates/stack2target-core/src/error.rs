//! Error types for the deployment pipeline.

use thiserror::Error;

/// Failure conditions the pipeline detects itself. Provider/API failures
/// stay untyped (`anyhow`) and are reported by the top-level handler.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The stack is in a rollback/delete state. Fatal, never retried.
    #[error("Detected unsafe stack status {status}: exiting for safety")]
    UnsafeStackStatus { status: String },

    /// The stack reported a status outside every configured set.
    #[error("Stack reported unrecognized status {status}: refusing to proceed")]
    UnknownStackStatus { status: String },

    /// The polling budget ran out before the stack settled.
    #[error("Stack did not settle within {attempts} polling attempts")]
    PollTimeout { attempts: u32 },

    /// A required stack output is absent or empty.
    #[error("Failed to find required key {key} from stack output")]
    MissingOutput { key: &'static str },

    /// The subnet-id output parsed to an empty list.
    #[error("Failed to find subnet ids from stack output")]
    EmptySubnetIds,

    /// A subnet is owned by a different VPC than the stack exported.
    #[error("Subnet {subnet_id} is not part of VPC {vpc_id}")]
    SubnetOutsideVpc { subnet_id: String, vpc_id: String },

    /// The rule has no target whose id matches the exported task name.
    #[error("Failed to find target with id {target_id} on rule {rule}")]
    TargetNotFound { rule: String, target_id: String },
}
