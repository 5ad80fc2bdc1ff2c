//! AWS SDK implementations of the core provider traits.
//!
//! Each adapter wraps one service client and converts SDK response shapes
//! into the flat structures the pipeline consumes.

use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use aws_sdk_eventbridge::types as event_types;
use stack2target_core::provider::{RuleApi, StackApi, SubnetApi};
use stack2target_core::target::TargetSpec;
use std::collections::HashMap;

/// Load the shared SDK config, with an optional region override.
pub async fn load_sdk_config(region: Option<String>) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(aws_config::Region::new(region));
    }
    loader.load().await
}

/// CloudFormation DescribeStacks adapter.
pub struct CfnStacks {
    client: aws_sdk_cloudformation::Client,
}

impl CfnStacks {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_cloudformation::Client::new(sdk_config),
        }
    }

    async fn describe(&self, stack_name: &str) -> Result<aws_sdk_cloudformation::types::Stack> {
        let resp = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .context("Failed to describe stack")?;

        // DescribeStacks with an explicit name returns at most one stack.
        resp.stacks()
            .first()
            .cloned()
            .with_context(|| format!("Stack {} not found", stack_name))
    }
}

#[async_trait::async_trait]
impl StackApi for CfnStacks {
    async fn stack_status(&self, stack_name: &str) -> Result<String> {
        let stack = self.describe(stack_name).await?;
        let status = stack
            .stack_status()
            .with_context(|| format!("Stack {} reported no status", stack_name))?;
        Ok(status.as_str().to_string())
    }

    async fn stack_outputs(&self, stack_name: &str) -> Result<HashMap<String, String>> {
        let stack = self.describe(stack_name).await?;

        let mut outputs = HashMap::new();
        for output in stack.outputs() {
            if let (Some(key), Some(value)) = (output.output_key(), output.output_value()) {
                outputs.insert(key.to_string(), value.to_string());
            }
        }
        Ok(outputs)
    }
}

/// EC2 DescribeSubnets adapter.
pub struct Ec2Subnets {
    client: aws_sdk_ec2::Client,
}

impl Ec2Subnets {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_ec2::Client::new(sdk_config),
        }
    }
}

#[async_trait::async_trait]
impl SubnetApi for Ec2Subnets {
    async fn subnet_vpc_ids(&self, subnet_ids: &[String]) -> Result<HashMap<String, String>> {
        let resp = self
            .client
            .describe_subnets()
            .set_subnet_ids(Some(subnet_ids.to_vec()))
            .send()
            .await
            .context("Failed to describe subnets")?;

        let mut owners = HashMap::new();
        for subnet in resp.subnets() {
            if let (Some(id), Some(vpc_id)) = (subnet.subnet_id(), subnet.vpc_id()) {
                owners.insert(id.to_string(), vpc_id.to_string());
            }
        }
        Ok(owners)
    }
}

/// EventBridge ListTargetsByRule / PutTargets adapter.
pub struct EventRules {
    client: aws_sdk_eventbridge::Client,
}

impl EventRules {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_eventbridge::Client::new(sdk_config),
        }
    }
}

#[async_trait::async_trait]
impl RuleApi for EventRules {
    async fn target_ids(&self, rule_name: &str) -> Result<Vec<String>> {
        let resp = self
            .client
            .list_targets_by_rule()
            .rule(rule_name)
            .send()
            .await
            .with_context(|| format!("Failed to list targets for rule {}", rule_name))?;

        Ok(resp
            .targets()
            .iter()
            .map(|target| target.id().to_string())
            .collect())
    }

    async fn replace_targets(&self, rule_name: &str, target: &TargetSpec) -> Result<()> {
        let resp = self
            .client
            .put_targets()
            .rule(rule_name)
            .targets(to_sdk_target(target)?)
            .send()
            .await
            .with_context(|| format!("Failed to update targets for rule {}", rule_name))?;

        // PutTargets can partially fail without an API error.
        let failed = resp.failed_entries();
        if !failed.is_empty() {
            let reasons: Vec<String> = failed
                .iter()
                .map(|entry| {
                    format!(
                        "{}: {}",
                        entry.target_id().unwrap_or("unknown"),
                        entry.error_message().unwrap_or("unknown error")
                    )
                })
                .collect();
            anyhow::bail!("Rule target replacement rejected: {}", reasons.join("; "));
        }
        Ok(())
    }
}

fn to_sdk_target(spec: &TargetSpec) -> Result<event_types::Target> {
    let placement = &spec.ecs_parameters.network_configuration.awsvpc_configuration;

    let awsvpc = event_types::AwsVpcConfiguration::builder()
        .set_subnets(Some(placement.subnets.clone()))
        .set_security_groups(Some(placement.security_groups.clone()))
        .assign_public_ip(event_types::AssignPublicIp::from(
            placement.assign_public_ip.as_str(),
        ))
        .build()
        .context("Invalid awsvpc configuration")?;

    let ecs = event_types::EcsParameters::builder()
        .task_definition_arn(&spec.ecs_parameters.task_definition_arn)
        .task_count(spec.ecs_parameters.task_count)
        .launch_type(event_types::LaunchType::from(
            spec.ecs_parameters.launch_type.as_str(),
        ))
        .network_configuration(
            event_types::NetworkConfiguration::builder()
                .awsvpc_configuration(awsvpc)
                .build(),
        )
        .build()
        .context("Invalid ECS parameters")?;

    event_types::Target::builder()
        .id(&spec.id)
        .arn(&spec.arn)
        .role_arn(&spec.role_arn)
        .ecs_parameters(ecs)
        .build()
        .context("Invalid rule target")
}
