//! Argument groups shared by the proving subcommands: where the
//! attestation chain comes from and which proving backend to use.

use std::path::PathBuf;
use std::sync::Arc;

use acp_core::CircuitAssets;
use acp_x509::{load_pem_file, AttestationProvider, PemDirectoryProvider, StaticChainProvider};
use acp_zkp::{AssetStore, MockCommitter, MockProver};
use anyhow::{bail, Context, Result};
use clap::Args;

use crate::pipeline::Pipeline;

/// Alias used when none is given.
pub const DEFAULT_ALIAS: &str = "secure-key";

/// Chain source: a single PEM bundle or a directory of `{alias}.pem` bundles.
#[derive(Args, Debug, Clone)]
pub struct ChainSourceArgs {
    /// PEM bundle holding the attestation chain, leaf first.
    #[arg(long, conflicts_with = "keys_dir", required_unless_present = "keys_dir")]
    pub chain: Option<PathBuf>,

    /// Directory of `{alias}.pem` chain bundles.
    #[arg(long)]
    pub keys_dir: Option<PathBuf>,

    /// Key alias to prove.
    #[arg(long, default_value = DEFAULT_ALIAS)]
    pub alias: String,
}

impl ChainSourceArgs {
    pub fn provider(&self) -> Result<Arc<dyn AttestationProvider>> {
        match (&self.chain, &self.keys_dir) {
            (Some(path), _) => {
                let chain = load_pem_file(path)
                    .with_context(|| format!("failed to load chain from {}", path.display()))?;
                tracing::debug!(path = %path.display(), certificates = chain.len(), "loaded chain bundle");
                Ok(Arc::new(
                    StaticChainProvider::new().with_chain(self.alias.clone(), chain),
                ))
            }
            (None, Some(dir)) => Ok(Arc::new(PemDirectoryProvider::new(dir.clone()))),
            (None, None) => bail!("either --chain or --keys-dir is required"),
        }
    }
}

/// Proving backend selection.
#[derive(Args, Debug, Clone)]
pub struct ProvingArgs {
    /// Use the deterministic mock committer and prover.
    #[arg(long)]
    pub mock: bool,

    /// Circuit asset directory. When given, circuit, verification key and
    /// SRS files are loaded for every link.
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Hex randomness for the seed commitment. Drawn fresh when omitted.
    #[arg(long)]
    pub randomness: Option<String>,
}

impl ProvingArgs {
    /// Build a [`Pipeline`] over `provider` with the selected backend.
    pub fn pipeline(&self, provider: Arc<dyn AttestationProvider>) -> Result<Pipeline> {
        if !self.mock {
            bail!("no native proving backend is available in this build; rerun with --mock");
        }
        let (assets, prover) = match &self.assets {
            Some(dir) => (
                CircuitAssets::new(dir.clone()),
                MockProver::new().with_assets(AssetStore::in_memory()),
            ),
            None => (CircuitAssets::default(), MockProver::new()),
        };
        Ok(Pipeline::new(
            provider,
            Arc::new(MockCommitter::new()),
            Arc::new(prover),
            assets,
        ))
    }
}
