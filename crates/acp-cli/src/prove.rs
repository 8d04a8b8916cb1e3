//! # Prove and Encode CLI
//!
//! `prove` builds the link proofs for one attestation chain and writes
//! them as a JSON array of proof results. `encode` turns such a file into
//! the `eth_call` destinations and call data that `submit` would send.
//!
//! ```bash
//! acp prove --chain chain.pem --mock --out proofs.json
//! acp encode --proofs proofs.json
//! ```

use std::path::{Path, PathBuf};

use acp_core::ProofResult;
use acp_rpc::{encode_for_verifier_call, VerifierAddresses};
use anyhow::{Context, Result};
use clap::Args;
use serde_json::{json, Value};

use crate::source::{ChainSourceArgs, ProvingArgs};

/// Prove subcommand arguments.
#[derive(Args, Debug)]
pub struct ProveArgs {
    #[command(flatten)]
    pub source: ChainSourceArgs,

    #[command(flatten)]
    pub proving: ProvingArgs,

    /// Write proofs here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Encode subcommand arguments.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// JSON file written by `acp prove`.
    #[arg(long)]
    pub proofs: PathBuf,
}

/// Execute the prove subcommand.
pub async fn run_prove(args: &ProveArgs) -> Result<u8> {
    let pipeline = args.proving.pipeline(args.source.provider()?)?;
    let proofs = pipeline
        .prove_alias(&args.source.alias, args.proving.randomness.clone())
        .await?;
    let rendered = serde_json::to_string_pretty(&proofs)?;

    match &args.out {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), proofs = proofs.len(), "proofs written");
        }
        None => println!("{rendered}"),
    }
    Ok(0)
}

/// Execute the encode subcommand.
pub fn run_encode(args: &EncodeArgs) -> Result<u8> {
    let proofs = read_proofs(&args.proofs)?;
    let verifiers = VerifierAddresses::from_env()?;
    let calls = encode_calls(&proofs, &verifiers)?;
    println!("{}", serde_json::to_string_pretty(&calls)?);
    Ok(0)
}

/// Load a proofs file written by `acp prove`.
pub fn read_proofs(path: &Path) -> Result<Vec<ProofResult>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a proofs file", path.display()))
}

/// `{ proofIndex, to, data }` for every proof, in order.
pub fn encode_calls(proofs: &[ProofResult], verifiers: &VerifierAddresses) -> Result<Value> {
    let calls = proofs
        .iter()
        .enumerate()
        .map(|(index, proof)| {
            let data = encode_for_verifier_call(proof)
                .with_context(|| format!("proof {index} cannot be encoded"))?;
            Ok(json!({
                "proofIndex": index,
                "to": verifiers.for_family(proof.family()),
                "data": data,
            }))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::Array(calls))
}
