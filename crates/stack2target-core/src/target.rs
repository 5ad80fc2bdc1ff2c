//! Rule-target specification.
//!
//! Serde field names follow the EventBridge wire shape so the rendered
//! JSON matches what the API receives.

use crate::outputs::StackOutputs;
use serde::Serialize;

pub const LAUNCH_TYPE_FARGATE: &str = "FARGATE";
pub const ASSIGN_PUBLIC_IP_ENABLED: &str = "ENABLED";

/// Replacement target for the scheduled rule: an ECS task launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetSpec {
    pub id: String,
    pub arn: String,
    pub role_arn: String,
    pub ecs_parameters: EcsParameters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EcsParameters {
    pub task_definition_arn: String,
    pub task_count: i32,
    pub launch_type: String,
    pub network_configuration: NetworkConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkConfiguration {
    #[serde(rename = "awsvpcConfiguration")]
    pub awsvpc_configuration: AwsVpcConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AwsVpcConfiguration {
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub assign_public_ip: String,
}

impl TargetSpec {
    /// Build the replacement spec from the extracted stack outputs. The id
    /// of the existing matched target is preserved; everything else comes
    /// fresh from the outputs. One task, Fargate launch, public IP on.
    pub fn from_outputs(existing_id: String, outputs: &StackOutputs) -> Self {
        Self {
            id: existing_id,
            arn: outputs.cluster_arn.clone(),
            role_arn: outputs.event_role_arn.clone(),
            ecs_parameters: EcsParameters {
                task_definition_arn: outputs.task_definition_arn.clone(),
                task_count: 1,
                launch_type: LAUNCH_TYPE_FARGATE.to_string(),
                network_configuration: NetworkConfiguration {
                    awsvpc_configuration: AwsVpcConfiguration {
                        subnets: outputs.subnet_ids.clone(),
                        security_groups: vec![outputs.security_group_id.clone()],
                        assign_public_ip: ASSIGN_PUBLIC_IP_ENABLED.to_string(),
                    },
                },
            },
        }
    }
}
