//! # acp CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber and
//! dispatches to the subcommand handlers. Logs go to stderr so stdout
//! carries only command output.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use acp_cli::inspect::{run_inspect, InspectArgs};
use acp_cli::prove::{run_encode, run_prove, EncodeArgs, ProveArgs};
use acp_cli::submit::{run_run, run_submit, RunArgs, SubmitArgs};

/// Attestation chain prover.
///
/// Proves that an attestation leaf certificate descends from its root, one
/// zero-knowledge link per issuer, and submits the link proofs to the
/// on-chain verifiers.
#[derive(Parser, Debug)]
#[command(name = "acp", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the proving inputs extracted from certificates.
    Inspect(InspectArgs),

    /// Prove every link of an attestation chain.
    Prove(ProveArgs),

    /// Encode a proofs file as verifier call data.
    Encode(EncodeArgs),

    /// Submit a proofs file to the verifier contracts.
    Submit(SubmitArgs),

    /// Prove an attestation chain and submit the proofs.
    Run(RunArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let result = match &cli.command {
        Commands::Inspect(args) => run_inspect(args),
        Commands::Prove(args) => run_prove(args).await,
        Commands::Encode(args) => run_encode(args),
        Commands::Submit(args) => run_submit(args).await,
        Commands::Run(args) => run_run(args).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
