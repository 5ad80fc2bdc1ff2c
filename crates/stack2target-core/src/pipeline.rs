//! The four-stage deployment pipeline.
//!
//! Stages run strictly top to bottom, each consuming the previous stage's
//! result: wait for the stack to settle, extract its outputs, validate
//! subnet/VPC ownership, then replace the rule target.

use crate::clock::Clock;
use crate::error::DeployError;
use crate::outputs::StackOutputs;
use crate::provider::{RuleApi, StackApi, SubnetApi};
use crate::status::Settlement;
use crate::target::TargetSpec;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

/// Timing and budget knobs for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Delay between stack status polls.
    pub poll_interval: Duration,
    /// Polling budget; exhausting it is a hard timeout.
    pub max_attempts: u32,
    /// Operator confirmation window before the target replacement is
    /// submitted. Interrupting the process during the window aborts.
    pub confirm_wait: Duration,
    /// Submit immediately without the confirmation window.
    pub skip_confirm: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_attempts: 300,
            confirm_wait: Duration::from_secs(10),
            skip_confirm: false,
        }
    }
}

/// Run the whole pipeline for one stack.
pub async fn run(
    stacks: &dyn StackApi,
    subnets: &dyn SubnetApi,
    rules: &dyn RuleApi,
    clock: &dyn Clock,
    stack_name: &str,
    opts: &PipelineOptions,
) -> Result<()> {
    info!("Checking stack {}", stack_name);
    let status = wait_for_settled(stacks, clock, stack_name, opts).await?;
    info!("Stack {} settled with status {}", stack_name, status);

    let outputs = extract_outputs(stacks, stack_name).await?;
    info!("Got outputs from stack {}", stack_name);
    info!("VPC id: {}", outputs.vpc_id);
    info!("Subnet ids: {}", outputs.subnet_ids.join(" "));
    info!("Security group id: {}", outputs.security_group_id);
    info!("Event rule name: {}", outputs.rule_name);

    info!("Checking networking configuration");
    validate_network(subnets, &outputs).await?;
    info!("Passed network config validation");

    replace_rule_target(rules, clock, &outputs, opts).await?;
    info!("Successfully updated target");
    Ok(())
}

/// Poll the stack until its status leaves the in-progress set.
///
/// Returns the settled status string. A status in the failed set, an
/// unrecognized status, or an exhausted polling budget all abort.
pub async fn wait_for_settled(
    stacks: &dyn StackApi,
    clock: &dyn Clock,
    stack_name: &str,
    opts: &PipelineOptions,
) -> Result<String> {
    let mut attempt: u32 = 0;
    loop {
        let status = stacks
            .stack_status(stack_name)
            .await
            .context("Failed to describe stack")?;

        match Settlement::classify(&status) {
            Settlement::InProgress => {
                if attempt >= opts.max_attempts {
                    return Err(DeployError::PollTimeout {
                        attempts: opts.max_attempts,
                    }
                    .into());
                }
                info!("Stack is in-progress status ({}). Waiting...", status);
                clock.sleep(opts.poll_interval).await;
                attempt += 1;
            }
            Settlement::Failed => {
                return Err(DeployError::UnsafeStackStatus { status }.into());
            }
            Settlement::Settled => return Ok(status),
            Settlement::Unknown => {
                return Err(DeployError::UnknownStackStatus { status }.into());
            }
        }
    }
}

/// Fetch the settled stack's outputs and pluck the required fields.
pub async fn extract_outputs(stacks: &dyn StackApi, stack_name: &str) -> Result<StackOutputs> {
    let raw = stacks
        .stack_outputs(stack_name)
        .await
        .context("Failed to fetch stack outputs")?;
    Ok(StackOutputs::from_map(&raw)?)
}

/// Cross-check that every exported subnet belongs to the exported VPC.
///
/// One batched describe call; the first mismatch in export order is
/// reported.
pub async fn validate_network(subnets: &dyn SubnetApi, outputs: &StackOutputs) -> Result<()> {
    let owners = subnets
        .subnet_vpc_ids(&outputs.subnet_ids)
        .await
        .context("Failed to describe subnets")?;

    if let Some(subnet_id) = first_foreign_subnet(&outputs.subnet_ids, &owners, &outputs.vpc_id) {
        return Err(DeployError::SubnetOutsideVpc {
            subnet_id,
            vpc_id: outputs.vpc_id.clone(),
        }
        .into());
    }
    Ok(())
}

fn first_foreign_subnet(
    subnet_ids: &[String],
    owners: &HashMap<String, String>,
    vpc_id: &str,
) -> Option<String> {
    subnet_ids
        .iter()
        .find(|id| owners.get(*id).map(String::as_str) != Some(vpc_id))
        .cloned()
}

/// Build and submit the replacement target for the scheduled rule.
///
/// The rule must already carry a target whose id equals the exported task
/// name; its id is preserved, everything else is rebuilt from the outputs.
pub async fn replace_rule_target(
    rules: &dyn RuleApi,
    clock: &dyn Clock,
    outputs: &StackOutputs,
    opts: &PipelineOptions,
) -> Result<()> {
    info!(
        "Reading current target configuration of rule {}",
        outputs.rule_name
    );
    let ids = rules
        .target_ids(&outputs.rule_name)
        .await
        .context("Failed to list rule targets")?;

    let existing_id = ids
        .into_iter()
        .find(|id| id == &outputs.task_name)
        .ok_or_else(|| DeployError::TargetNotFound {
            rule: outputs.rule_name.clone(),
            target_id: outputs.task_name.clone(),
        })?;

    let spec = TargetSpec::from_outputs(existing_id, outputs);

    // Operator-facing: show exactly what will be submitted.
    println!(
        "Generated target:\n{}",
        serde_json::to_string_pretty(&spec).context("Failed to render target spec")?
    );

    if !opts.skip_confirm {
        info!(
            "Waiting {}s for confirmation. Interrupt to abort.",
            opts.confirm_wait.as_secs()
        );
        clock.sleep(opts.confirm_wait).await;
    }

    info!("Updating target...");
    rules
        .replace_targets(&outputs.rule_name, &spec)
        .await
        .context("Failed to update rule targets")?;
    Ok(())
}
