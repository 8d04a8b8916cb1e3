//! # Mock Prover and Committer
//!
//! Deterministic, transparent stand-ins for the proving backend. Proofs
//! are SHA-256 digests of the link inputs laid out in the same shape a
//! real prover emits:
//!
//! ```text
//! {ca|ee}_0x <9 × 32-byte public inputs> <64-byte proof body>
//! ```
//!
//! so everything downstream (ABI encoding, submission) runs unchanged.
//!
//! ## Security Notice
//!
//! Mock proofs carry NO soundness or zero-knowledge guarantees. A verifier
//! contract will reject them. Use for development and tests only.

use acp_core::{Commitment, ProofResult};
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::assets::AssetStore;
use crate::traits::{CommitError, CommitRequest, Committer, ProveRequest, Prover, ProverError};

/// Number of public-input words in a link proof.
pub const PUBLIC_INPUT_WORDS: usize = 9;

const COMMIT_DOMAIN: &[u8] = b"acp/mock-commit/v1";
const NEXT_R_DOMAIN: &[u8] = b"acp/mock-next-r/v1";
const NEXT_CMT_DOMAIN: &[u8] = b"acp/mock-next-cmt/v1";
const BODY_DOMAIN: &[u8] = b"acp/mock-proof-body/v1";

fn sha256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// SHA-256 commitment over the padded identity attributes and randomness.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockCommitter;

impl MockCommitter {
    pub fn new() -> Self {
        Self
    }
}

impl Committer for MockCommitter {
    fn commit(&self, request: &CommitRequest) -> Result<Commitment, CommitError> {
        let subject = request.padded_subject()?;
        let r = randomness(request.randomness.as_deref())?;
        let cmt = sha256(&[
            COMMIT_DOMAIN,
            &subject,
            &request.subject_key_id,
            &request.pk_x,
            &request.pk_y,
            &r,
        ]);
        Ok(Commitment::new(hex::encode(cmt), hex::encode(r)))
    }
}

/// 32 bytes of randomness: the caller's hex value left-padded, or fresh.
fn randomness(hex_value: Option<&str>) -> Result<[u8; 32], CommitError> {
    let mut r = [0u8; 32];
    match hex_value {
        Some(value) => {
            let bytes = hex::decode(value)
                .map_err(|e| CommitError::InvalidInput(format!("randomness is not hex: {e}")))?;
            if bytes.len() > r.len() {
                return Err(CommitError::InvalidInput(format!(
                    "randomness must be at most 32 bytes, got {}",
                    bytes.len()
                )));
            }
            r[32 - bytes.len()..].copy_from_slice(&bytes);
        }
        None => OsRng.fill_bytes(&mut r),
    }
    Ok(r)
}

/// Deterministic link prover.
///
/// With an [`AssetStore`] attached, the circuit assets are loaded for every
/// link and the verification key is bound into the public inputs, so a
/// missing asset directory fails the same way it would with a real prover.
#[derive(Debug, Default, Clone)]
pub struct MockProver {
    assets: Option<AssetStore>,
}

impl MockProver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assets(mut self, store: AssetStore) -> Self {
        self.assets = Some(store);
        self
    }

    /// The commitment a mock proof of `request` hands to the next link.
    pub fn next_commitment(request: &ProveRequest) -> Commitment {
        let next_r = sha256(&[
            NEXT_R_DOMAIN,
            request.prev.randomness.as_bytes(),
            &request.child_der,
        ]);
        let next_cmt = sha256(&[
            NEXT_CMT_DOMAIN,
            request.prev.value.as_bytes(),
            &next_r,
            &request.child_der,
        ]);
        Commitment::new(hex::encode(next_cmt), hex::encode(next_r))
    }
}

impl Prover for MockProver {
    fn prove(&self, request: &ProveRequest) -> Result<ProofResult, ProverError> {
        if request.child_der.is_empty() {
            return Err(ProverError::InvalidInputs("empty child certificate".into()));
        }
        if request.authority_key_id.is_empty() {
            return Err(ProverError::InvalidInputs("empty authority key identifier".into()));
        }
        if request.prev.value.is_empty() || request.prev.randomness.is_empty() {
            return Err(ProverError::InvalidInputs("empty previous commitment".into()));
        }

        let vk_digest = match &self.assets {
            Some(store) => {
                let loaded = store.load_circuit(&request.circuit)?;
                sha256(&[loaded.verification_key.as_slice()])
            }
            None => [0u8; 32],
        };

        let next = Self::next_commitment(request);
        let next_cmt = hex::decode(&next.value)
            .map_err(|e| ProverError::GenerationFailed(e.to_string()))?;

        let mut words: Vec<[u8; 32]> = vec![
            sha256(&[request.prev.value.as_bytes()]),
            sha256(&[&next_cmt]),
            sha256(&[&request.child_der]),
            sha256(&[&request.authority_key_id]),
            request.issuer_pk_x,
            request.issuer_pk_y,
            sha256(&[request.circuit.name.as_bytes()]),
            vk_digest,
        ];
        let binding = sha256(&words.iter().map(|w| w.as_slice()).collect::<Vec<_>>());
        words.push(binding);
        debug_assert_eq!(words.len(), PUBLIC_INPUT_WORDS);

        let mut proof = format!("{}_0x", request.circuit.family.tag());
        for word in &words {
            proof.push_str(&hex::encode(word));
        }
        proof.push_str(&hex::encode(sha256(&[BODY_DOMAIN, &binding, &[0u8]])));
        proof.push_str(&hex::encode(sha256(&[BODY_DOMAIN, &binding, &[1u8]])));

        Ok(ProofResult::new(proof, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acp_core::{CircuitAssets, CircuitFamily};

    fn request(family: CircuitFamily) -> ProveRequest {
        ProveRequest {
            circuit: CircuitAssets::default().meta(family),
            child_der: vec![0x30, 0x82, 0x01, 0x00],
            authority_key_id: vec![0xaa; 20],
            issuer_pk_x: [1; 32],
            issuer_pk_y: [2; 32],
            prev: Commitment::new("0ede28f5", "deadbeef"),
        }
    }

    #[test]
    fn proof_has_tagged_prover_layout() {
        let proof = MockProver::new().prove(&request(CircuitFamily::EndEntity)).unwrap();
        assert!(proof.proof.starts_with("ee_0x"));
        assert_eq!(proof.family(), Some(CircuitFamily::EndEntity));
        assert_eq!(proof.payload_hex().len(), PUBLIC_INPUT_WORDS * 64 + 128);
        assert_eq!(proof.next_cmt.len(), 64);
        assert_eq!(proof.next_cmt_r.len(), 64);
    }

    #[test]
    fn prover_is_deterministic_and_input_sensitive() {
        let prover = MockProver::new();
        let a = prover.prove(&request(CircuitFamily::Ca)).unwrap();
        assert_eq!(a, prover.prove(&request(CircuitFamily::Ca)).unwrap());

        let mut other = request(CircuitFamily::Ca);
        other.prev = Commitment::new("0ede28f5", "feedface");
        let b = prover.prove(&other).unwrap();
        assert_ne!(a.next_cmt_r, b.next_cmt_r);
        assert_ne!(a.proof, b.proof);
    }

    #[test]
    fn prover_rejects_empty_inputs() {
        let mut req = request(CircuitFamily::Ca);
        req.authority_key_id.clear();
        assert!(matches!(
            MockProver::new().prove(&req),
            Err(ProverError::InvalidInputs(_))
        ));
    }

    #[test]
    fn prover_with_assets_requires_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut req = request(CircuitFamily::Ca);
        req.circuit = CircuitAssets::new(dir.path()).meta(CircuitFamily::Ca);
        let prover = MockProver::new().with_assets(AssetStore::in_memory());
        assert!(matches!(prover.prove(&req), Err(ProverError::Assets { .. })));

        for path in req.circuit.asset_paths() {
            std::fs::write(path, b"asset").unwrap();
        }
        assert!(prover.prove(&req).is_ok());
    }

    #[test]
    fn commit_with_given_randomness_is_deterministic() {
        let req = CommitRequest {
            subject_der: vec![0x30, 0x29],
            subject_key_id: vec![0xfe; 20],
            pk_x: [0x29; 32],
            pk_y: [0x9a; 32],
            randomness: Some("deadbeef".into()),
        };
        let a = MockCommitter.commit(&req).unwrap();
        assert_eq!(a, MockCommitter.commit(&req).unwrap());
        assert_eq!(a.value.len(), 64);
        assert_eq!(a.randomness, format!("{}deadbeef", "0".repeat(56)));
    }

    #[test]
    fn commit_draws_fresh_randomness() {
        let req = CommitRequest {
            subject_der: vec![0x30],
            subject_key_id: vec![0; 20],
            pk_x: [0; 32],
            pk_y: [0; 32],
            randomness: None,
        };
        let a = MockCommitter.commit(&req).unwrap();
        let b = MockCommitter.commit(&req).unwrap();
        assert_ne!(a.randomness, b.randomness);
    }

    #[test]
    fn commit_rejects_bad_randomness() {
        let mut req = CommitRequest {
            subject_der: vec![0x30],
            subject_key_id: vec![0; 20],
            pk_x: [0; 32],
            pk_y: [0; 32],
            randomness: Some("zz".into()),
        };
        assert!(MockCommitter.commit(&req).is_err());
        req.randomness = Some("00".repeat(33));
        assert!(MockCommitter.commit(&req).is_err());
    }
}
