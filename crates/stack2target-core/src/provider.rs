//! Trait seams over the cloud management APIs the pipeline depends on.
//!
//! The pipeline only consumes structured responses; it never implements
//! the underlying protocols. The binary crate supplies AWS SDK
//! implementations, tests supply in-memory fakes.

use crate::target::TargetSpec;
use anyhow::Result;
use std::collections::HashMap;

/// Stack-description service: status and output queries.
#[async_trait::async_trait]
pub trait StackApi: Send + Sync {
    /// Current status string of the named stack.
    async fn stack_status(&self, stack_name: &str) -> Result<String>;

    /// Declared outputs of the named stack, reduced to key/value pairs.
    async fn stack_outputs(&self, stack_name: &str) -> Result<HashMap<String, String>>;
}

/// Subnet-description service.
#[async_trait::async_trait]
pub trait SubnetApi: Send + Sync {
    /// Batched lookup of subnet id -> owning VPC id.
    async fn subnet_vpc_ids(&self, subnet_ids: &[String]) -> Result<HashMap<String, String>>;
}

/// Scheduled-rule target service.
#[async_trait::async_trait]
pub trait RuleApi: Send + Sync {
    /// Ids of the targets currently attached to the named rule.
    async fn target_ids(&self, rule_name: &str) -> Result<Vec<String>>;

    /// Replace the rule's targets with the single given spec.
    async fn replace_targets(&self, rule_name: &str, target: &TargetSpec) -> Result<()>;
}
