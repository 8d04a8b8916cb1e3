//! # Submit and Run CLI
//!
//! `submit` sends a proofs file to the verifier contracts. `run` proves a
//! chain and submits it in one go. Both print the aggregated
//! [`AllProofsResult`] and exit with [`EXIT_SUBMISSION_FAILED`] when any
//! proof was not accepted.
//!
//! Connection settings come from the `ACP_*` environment variables; see
//! [`RpcConfig::from_env`].

use std::path::PathBuf;

use acp_core::AllProofsResult;
use acp_rpc::{RpcConfig, SubmissionAggregator, SubmissionMode};
use anyhow::{Context, Result};
use clap::Args;

use crate::prove::read_proofs;
use crate::source::{ChainSourceArgs, ProvingArgs};

/// Exit code when at least one proof failed submission.
pub const EXIT_SUBMISSION_FAILED: u8 = 2;

/// Submit subcommand arguments.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// JSON file written by `acp prove`.
    #[arg(long)]
    pub proofs: PathBuf,

    /// Submit all proofs concurrently. Results keep proof order.
    #[arg(long)]
    pub concurrent: bool,
}

/// Run subcommand arguments.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: ChainSourceArgs,

    #[command(flatten)]
    pub proving: ProvingArgs,

    /// Submit all proofs concurrently. Results keep proof order.
    #[arg(long)]
    pub concurrent: bool,
}

/// Execute the submit subcommand.
pub async fn run_submit(args: &SubmitArgs) -> Result<u8> {
    let proofs = read_proofs(&args.proofs)?;
    let aggregator = aggregator_from_env(args.concurrent)?;
    report(&aggregator.submit_all(&proofs).await)
}

/// Execute the run subcommand.
pub async fn run_run(args: &RunArgs) -> Result<u8> {
    let aggregator = aggregator_from_env(args.concurrent)?;
    let pipeline = args.proving.pipeline(args.source.provider()?)?;
    let all = pipeline
        .run(&args.source.alias, &aggregator, args.proving.randomness.clone())
        .await?;
    report(&all)
}

fn aggregator_from_env(concurrent: bool) -> Result<SubmissionAggregator> {
    let config = RpcConfig::from_env().context("JSON-RPC configuration")?;
    tracing::debug!(?config, "loaded JSON-RPC configuration");
    let aggregator = SubmissionAggregator::from_config(&config)?;
    Ok(if concurrent {
        aggregator.with_mode(SubmissionMode::Concurrent)
    } else {
        aggregator
    })
}

/// Print `all` and map it to an exit code.
pub fn report(all: &AllProofsResult) -> Result<u8> {
    println!("{}", all.to_json_pretty()?);
    Ok(exit_code(all))
}

pub fn exit_code(all: &AllProofsResult) -> u8 {
    if all.overall_success {
        0
    } else {
        EXIT_SUBMISSION_FAILED
    }
}
