//! # Proving and Commit Capabilities
//!
//! The proof system and the commit function are external capabilities.
//! The chain builder only sees these traits, so the deterministic mocks in
//! [`crate::mock`] and a real proving backend are interchangeable.
//!
//! Both traits require `Send + Sync`; the CLI runs chain building on a
//! blocking worker thread.

use std::path::PathBuf;

use acp_core::{CircuitMeta, Commitment, ProofResult};
use acp_x509::COORDINATE_LEN;
use thiserror::Error;

/// Padded width of the subject name committed to by the seed commitment.
pub const SUBJECT_DER_MAX_LEN: usize = 124;
/// Width of a SHA-1 key identifier.
pub const KEY_ID_LEN: usize = 20;

/// Error from a [`Prover`].
#[derive(Error, Debug)]
pub enum ProverError {
    /// Inputs were rejected before witness generation.
    #[error("invalid prover inputs: {0}")]
    InvalidInputs(String),

    /// A circuit asset could not be loaded.
    #[error("circuit asset {}: {reason}", path.display())]
    Assets { path: PathBuf, reason: String },

    /// Witness or proof generation failed.
    #[error("proof generation failed: {0}")]
    GenerationFailed(String),
}

/// Error from a [`Committer`].
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("invalid commit input: {0}")]
    InvalidInput(String),
}

/// Inputs for proving one chain link: `parent` signed `child`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProveRequest {
    pub circuit: CircuitMeta,
    /// Full DER of the child certificate.
    pub child_der: Vec<u8>,
    pub authority_key_id: Vec<u8>,
    pub issuer_pk_x: [u8; COORDINATE_LEN],
    pub issuer_pk_y: [u8; COORDINATE_LEN],
    /// Commitment produced by the previous link, or the seed.
    pub prev: Commitment,
}

/// Generates one link proof.
pub trait Prover: Send + Sync {
    /// Prove the link and return the proof plus the next commitment.
    fn prove(&self, request: &ProveRequest) -> Result<ProofResult, ProverError>;
}

/// Identity attributes of the root-ward certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRequest {
    pub subject_der: Vec<u8>,
    pub subject_key_id: Vec<u8>,
    pub pk_x: [u8; COORDINATE_LEN],
    pub pk_y: [u8; COORDINATE_LEN],
    /// Hex-encoded randomness; fresh randomness is drawn when `None`.
    pub randomness: Option<String>,
}

impl CommitRequest {
    /// Check the fixed-width constraints of the commitment circuit.
    pub fn validate(&self) -> Result<(), CommitError> {
        if self.subject_der.len() > SUBJECT_DER_MAX_LEN {
            return Err(CommitError::InvalidInput(format!(
                "subject must be at most {SUBJECT_DER_MAX_LEN} bytes, got {}",
                self.subject_der.len()
            )));
        }
        if self.subject_key_id.len() != KEY_ID_LEN {
            return Err(CommitError::InvalidInput(format!(
                "subject key identifier must be {KEY_ID_LEN} bytes, got {}",
                self.subject_key_id.len()
            )));
        }
        Ok(())
    }

    /// Subject DER zero-padded to [`SUBJECT_DER_MAX_LEN`].
    pub fn padded_subject(&self) -> Result<[u8; SUBJECT_DER_MAX_LEN], CommitError> {
        self.validate()?;
        let mut out = [0u8; SUBJECT_DER_MAX_LEN];
        out[..self.subject_der.len()].copy_from_slice(&self.subject_der);
        Ok(out)
    }
}

/// Computes the seed commitment over a certificate's identity.
pub trait Committer: Send + Sync {
    fn commit(&self, request: &CommitRequest) -> Result<Commitment, CommitError>;
}
