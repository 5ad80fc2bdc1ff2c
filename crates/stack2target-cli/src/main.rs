use anyhow::{Context, Result};
use clap::Parser;
use stack2target_core::clock::TokioClock;
use stack2target_core::pipeline::{self, PipelineOptions};
use std::time::Duration;
use tracing::error;

mod aws;
mod init;

/// Point a scheduled EventBridge rule at the ECS task a CloudFormation
/// stack exports.
#[derive(Parser)]
#[command(name = "stack2target")]
#[command(version)]
#[command(
    about = "Point a scheduled EventBridge rule at the ECS task a CloudFormation stack exports",
    long_about = None
)]
struct Cli {
    /// Name of the CloudFormation stack to read outputs from
    #[arg(value_name = "STACK_NAME")]
    stack_name: String,

    /// AWS region (defaults to the profile/environment region)
    #[arg(long, value_name = "REGION")]
    region: Option<String>,

    /// Seconds between stack status polls
    #[arg(long, value_name = "SECS", default_value_t = 1)]
    poll_interval_secs: u64,

    /// Maximum number of status polls before giving up
    #[arg(long, value_name = "N", default_value_t = 300)]
    max_attempts: u32,

    /// Seconds to wait for operator confirmation before submitting
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    confirm_wait_secs: u64,

    /// Skip the confirmation wait and submit immediately
    #[arg(long)]
    yes: bool,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

fn main() {
    // Exit codes are part of the contract: 0 on success, 1 on any failure
    // including usage errors. clap's default usage exit code is 2, so map
    // parse errors ourselves; help and version output still exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    init::init_tracing(&cli.log_level);

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")
        .and_then(|rt| rt.block_on(run(cli)));

    if let Err(err) = result {
        error!("Failed to update rule target: {:#}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let sdk_config = aws::load_sdk_config(cli.region.clone()).await;
    let stacks = aws::CfnStacks::new(&sdk_config);
    let subnets = aws::Ec2Subnets::new(&sdk_config);
    let rules = aws::EventRules::new(&sdk_config);

    let opts = PipelineOptions {
        poll_interval: Duration::from_secs(cli.poll_interval_secs),
        max_attempts: cli.max_attempts,
        confirm_wait: Duration::from_secs(cli.confirm_wait_secs),
        skip_confirm: cli.yes,
    };

    pipeline::run(
        &stacks,
        &subnets,
        &rules,
        &TokioClock,
        &cli.stack_name,
        &opts,
    )
    .await
}
