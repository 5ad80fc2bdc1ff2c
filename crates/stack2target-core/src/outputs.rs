//! Stack output extraction.
//!
//! A settled stack exports eight named string outputs. They are plucked
//! from the raw key/value map into `StackOutputs`; the subnet-id output is
//! a comma-separated list that must be non-empty after trimming.

use crate::error::DeployError;
use std::collections::HashMap;

/// Output keys the stack must export, in the order they are checked.
pub const REQUIRED_KEYS: &[&str] = &[
    "TaskName",
    "ECSCluster",
    "ECSTaskDefinition",
    "VpcId",
    "SubnetIds",
    "SecurityGroupId",
    "CloudwatchEventRuleName",
    "CloudwatchEventRole",
];

/// The typed record built from a settled stack's outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOutputs {
    pub task_name: String,
    pub cluster_arn: String,
    pub task_definition_arn: String,
    pub vpc_id: String,
    pub subnet_ids: Vec<String>,
    pub security_group_id: String,
    pub rule_name: String,
    pub event_role_arn: String,
}

impl StackOutputs {
    /// Pluck the required keys out of the raw output map. The first
    /// missing or empty key aborts extraction naming that key.
    pub fn from_map(outputs: &HashMap<String, String>) -> Result<Self, DeployError> {
        let task_name = required(outputs, "TaskName")?;
        let cluster_arn = required(outputs, "ECSCluster")?;
        let task_definition_arn = required(outputs, "ECSTaskDefinition")?;
        let vpc_id = required(outputs, "VpcId")?;
        let raw_subnet_ids = required(outputs, "SubnetIds")?;
        let security_group_id = required(outputs, "SecurityGroupId")?;
        let rule_name = required(outputs, "CloudwatchEventRuleName")?;
        let event_role_arn = required(outputs, "CloudwatchEventRole")?;

        let subnet_ids = split_subnet_ids(&raw_subnet_ids);
        if subnet_ids.is_empty() {
            return Err(DeployError::EmptySubnetIds);
        }

        Ok(Self {
            task_name,
            cluster_arn,
            task_definition_arn,
            vpc_id,
            subnet_ids,
            security_group_id,
            rule_name,
            event_role_arn,
        })
    }
}

fn required(outputs: &HashMap<String, String>, key: &'static str) -> Result<String, DeployError> {
    match outputs.get(key) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        _ => Err(DeployError::MissingOutput { key }),
    }
}

/// Split a comma-separated subnet-id list, trimming whitespace and
/// dropping empty segments.
pub fn split_subnet_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_output_map() -> HashMap<String, String> {
        [
            ("TaskName", "nightly-report"),
            ("ECSCluster", "arn:aws:ecs:us-west-2:123456789012:cluster/jobs"),
            (
                "ECSTaskDefinition",
                "arn:aws:ecs:us-west-2:123456789012:task-definition/nightly-report:7",
            ),
            ("VpcId", "vpc-0a1b2c3d"),
            ("SubnetIds", "subnet-1,subnet-2"),
            ("SecurityGroupId", "sg-0f9e8d7c"),
            ("CloudwatchEventRuleName", "nightly-report-schedule"),
            ("CloudwatchEventRole", "arn:aws:iam::123456789012:role/events-invoke"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_full_map_extracts_all_fields() {
        let outputs = StackOutputs::from_map(&full_output_map()).unwrap();
        assert_eq!(outputs.task_name, "nightly-report");
        assert_eq!(outputs.vpc_id, "vpc-0a1b2c3d");
        assert_eq!(outputs.subnet_ids, vec!["subnet-1", "subnet-2"]);
        assert_eq!(outputs.security_group_id, "sg-0f9e8d7c");
        assert_eq!(outputs.rule_name, "nightly-report-schedule");
    }

    #[test]
    fn test_each_missing_key_is_named() {
        for key in REQUIRED_KEYS {
            let mut map = full_output_map();
            map.remove(*key);
            match StackOutputs::from_map(&map) {
                Err(DeployError::MissingOutput { key: reported }) => {
                    assert_eq!(reported, *key)
                }
                other => panic!("expected MissingOutput for {}, got {:?}", key, other),
            }
        }
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let mut map = full_output_map();
        map.insert("SecurityGroupId".to_string(), String::new());
        assert!(matches!(
            StackOutputs::from_map(&map),
            Err(DeployError::MissingOutput {
                key: "SecurityGroupId"
            })
        ));
    }

    #[test]
    fn test_subnet_list_trims_and_drops_blanks() {
        assert_eq!(
            split_subnet_ids("subnet-1, subnet-2,  ,subnet-3"),
            vec!["subnet-1", "subnet-2", "subnet-3"]
        );
    }

    #[test]
    fn test_all_blank_subnet_list_is_an_error() {
        let mut map = full_output_map();
        map.insert("SubnetIds".to_string(), " , ,".to_string());
        assert!(matches!(
            StackOutputs::from_map(&map),
            Err(DeployError::EmptySubnetIds)
        ));
    }
}
