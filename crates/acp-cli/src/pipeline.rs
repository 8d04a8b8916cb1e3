//! # Attestation Pipeline
//!
//! Wires the stages together for one key alias:
//!
//! ```text
//! provider ─► seed commitment ─► chain builder ─► aggregator ─► AllProofsResult
//! ```
//!
//! Proving is blocking and strictly sequential, so it runs on the tokio
//! blocking pool. Submission runs on the async runtime. Each call is
//! independent; a `Pipeline` holds no per-run state.

use std::sync::Arc;

use acp_core::{AllProofsResult, CircuitAssets, ProofResult};
use acp_rpc::SubmissionAggregator;
use acp_x509::{AttestationProvider, Certificate, X509Error};
use acp_zkp::{seed_commitment, ChainError, Committer, CommitmentChainBuilder, Prover};
use thiserror::Error;

/// Failure before any proof reached the submission stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("attestation provider: {0}")]
    Provider(#[source] X509Error),

    #[error("no attestation chain for alias {0:?}")]
    UnknownAlias(String),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("proving task failed: {0}")]
    Worker(String),
}

/// Provider, proving capabilities and submitter for end-to-end runs.
#[derive(Clone)]
pub struct Pipeline {
    provider: Arc<dyn AttestationProvider>,
    committer: Arc<dyn Committer>,
    prover: Arc<dyn Prover>,
    assets: CircuitAssets,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("assets", &self.assets)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(
        provider: Arc<dyn AttestationProvider>,
        committer: Arc<dyn Committer>,
        prover: Arc<dyn Prover>,
        assets: CircuitAssets,
    ) -> Self {
        Self {
            provider,
            committer,
            prover,
            assets,
        }
    }

    /// Fetch the chain registered under `alias`.
    pub fn chain_for(&self, alias: &str) -> Result<Vec<Certificate>, PipelineError> {
        self.provider
            .get_chain(alias)
            .map_err(PipelineError::Provider)?
            .ok_or_else(|| PipelineError::UnknownAlias(alias.to_string()))
    }

    /// Seed and prove `chain` on the current thread.
    pub fn prove_chain_blocking(
        &self,
        chain: &[Certificate],
        randomness: Option<String>,
    ) -> Result<Vec<ProofResult>, PipelineError> {
        let seed = seed_commitment(chain, self.committer.as_ref(), randomness)?;
        let builder = CommitmentChainBuilder::new(self.prover.as_ref(), &self.assets);
        Ok(builder.build(chain, seed)?)
    }

    /// Seed and prove `chain` on the blocking pool.
    pub async fn prove_chain(
        &self,
        chain: Vec<Certificate>,
        randomness: Option<String>,
    ) -> Result<Vec<ProofResult>, PipelineError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.prove_chain_blocking(&chain, randomness))
            .await
            .map_err(|e| PipelineError::Worker(e.to_string()))?
    }

    /// Prove the chain of `alias`.
    pub async fn prove_alias(
        &self,
        alias: &str,
        randomness: Option<String>,
    ) -> Result<Vec<ProofResult>, PipelineError> {
        let chain = self.chain_for(alias)?;
        tracing::info!(alias, certificates = chain.len(), "proving attestation chain");
        self.prove_chain(chain, randomness).await
    }

    /// Prove the chain of `alias` and submit every link proof.
    ///
    /// Chain failures are returned as errors. Submission failures are
    /// recorded per proof in the result.
    pub async fn run(
        &self,
        alias: &str,
        aggregator: &SubmissionAggregator,
        randomness: Option<String>,
    ) -> Result<AllProofsResult, PipelineError> {
        let proofs = self.prove_alias(alias, randomness).await?;
        Ok(aggregator.submit_all(&proofs).await)
    }
}
