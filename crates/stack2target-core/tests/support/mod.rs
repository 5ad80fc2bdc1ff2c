//! In-memory fakes for the provider traits and clock.
//!
//! Each fake records the calls it receives so tests can assert how far
//! the pipeline got, not just its final result.

use anyhow::Result;
use stack2target_core::clock::Clock;
use stack2target_core::provider::{RuleApi, StackApi, SubnetApi};
use stack2target_core::target::TargetSpec;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Stack service that replays a scripted status sequence. The final
/// status repeats once the script is exhausted.
pub struct ScriptedStacks {
    statuses: Mutex<Vec<String>>,
    outputs: HashMap<String, String>,
    pub status_fetches: AtomicUsize,
}

impl ScriptedStacks {
    pub fn new(statuses: &[&str], outputs: HashMap<String, String>) -> Self {
        Self {
            statuses: Mutex::new(statuses.iter().map(|s| s.to_string()).collect()),
            outputs,
            status_fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.status_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl StackApi for ScriptedStacks {
    async fn stack_status(&self, _stack_name: &str) -> Result<String> {
        self.status_fetches.fetch_add(1, Ordering::SeqCst);
        let mut statuses = self.statuses.lock().unwrap();
        if statuses.len() > 1 {
            Ok(statuses.remove(0))
        } else {
            Ok(statuses[0].clone())
        }
    }

    async fn stack_outputs(&self, _stack_name: &str) -> Result<HashMap<String, String>> {
        Ok(self.outputs.clone())
    }
}

/// Subnet service answering from a fixed subnet -> VPC map.
pub struct FakeSubnets {
    owners: HashMap<String, String>,
}

impl FakeSubnets {
    pub fn new(owners: &[(&str, &str)]) -> Self {
        Self {
            owners: owners
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[async_trait::async_trait]
impl SubnetApi for FakeSubnets {
    async fn subnet_vpc_ids(&self, subnet_ids: &[String]) -> Result<HashMap<String, String>> {
        Ok(self
            .owners
            .iter()
            .filter(|(id, _)| subnet_ids.contains(id))
            .map(|(id, vpc)| (id.clone(), vpc.clone()))
            .collect())
    }
}

/// Rule service with fixed target ids that records every replacement.
pub struct RecordingRules {
    target_ids: Vec<String>,
    pub submitted: Mutex<Vec<(String, TargetSpec)>>,
}

impl RecordingRules {
    pub fn new(target_ids: &[&str]) -> Self {
        Self {
            target_ids: target_ids.iter().map(|s| s.to_string()).collect(),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn submission_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl RuleApi for RecordingRules {
    async fn target_ids(&self, _rule_name: &str) -> Result<Vec<String>> {
        Ok(self.target_ids.clone())
    }

    async fn replace_targets(&self, rule_name: &str, target: &TargetSpec) -> Result<()> {
        self.submitted
            .lock()
            .unwrap()
            .push((rule_name.to_string(), target.clone()));
        Ok(())
    }
}

/// Clock that records requested sleeps and returns immediately.
pub struct ManualClock {
    pub sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn sleep_count(&self) -> usize {
        self.sleeps.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Clock for ManualClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// A complete, valid output map for the happy path.
pub fn full_output_map() -> HashMap<String, String> {
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
