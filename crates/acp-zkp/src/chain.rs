//! # Commitment Chain Builder
//!
//! Proves an attestation chain `[leaf, parent, ..., root]` one link at a
//! time, from the root-ward end toward the leaf. Each link proves that
//! `chain[i]` signed `chain[i - 1]` and consumes the commitment produced
//! by the previous link:
//!
//! ```text
//! seed ─► link 0 (root → chain[n-2]) ─► link 1 ─► ... ─► link n-2 (chain[1] → leaf)
//! ```
//!
//! ## Ordering
//!
//! Links are strictly sequential. Link `k + 1` cannot start before link
//! `k` returns, because its input commitment is link `k`'s output.
//!
//! ## Failure
//!
//! Chains shorter than [`MIN_CHAIN_LEN`] are rejected before anything is
//! extracted or proved. All link inputs are extracted up front, so a
//! malformed certificate also fails before the prover runs. A prover
//! failure aborts the remaining links and reports the failing link index.

use acp_core::{CircuitAssets, CircuitMeta, Commitment, ProofResult};
use acp_x509::{
    compute_subject_key_id, extract_authority_key_id, extract_ec_public_key_coordinates,
    select_circuit, Certificate, X509Error, COORDINATE_LEN,
};
use thiserror::Error;

use crate::traits::{CommitError, CommitRequest, Committer, ProveRequest, Prover, ProverError};

/// Shortest chain accepted: leaf, one intermediate, root.
pub const MIN_CHAIN_LEN: usize = 3;

/// Error from seeding or building a proof chain.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("certificate chain has {len} certificate(s); at least {MIN_CHAIN_LEN} are required")]
    ChainTooShort { len: usize },

    /// Root certificate fields could not be extracted for the seed.
    #[error("root certificate: {0}")]
    RootExtraction(#[source] X509Error),

    /// Link inputs could not be extracted.
    #[error("link {link}: {source}")]
    Extraction {
        link: usize,
        #[source]
        source: X509Error,
    },

    #[error("seed commitment failed: {0}")]
    Commit(#[from] CommitError),

    #[error("link {link}: {source}")]
    Prover {
        link: usize,
        #[source]
        source: ProverError,
    },
}

/// Commitment-independent inputs for one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInputs {
    pub circuit: CircuitMeta,
    pub child_der: Vec<u8>,
    pub authority_key_id: Vec<u8>,
    pub issuer_pk_x: [u8; COORDINATE_LEN],
    pub issuer_pk_y: [u8; COORDINATE_LEN],
}

impl LinkInputs {
    /// Extract the inputs for `parent` signing `child`.
    pub fn extract(
        child: &Certificate,
        parent: &Certificate,
        assets: &CircuitAssets,
    ) -> Result<Self, X509Error> {
        let authority_key_id = extract_authority_key_id(child, parent)?;
        let (issuer_pk_x, issuer_pk_y) = extract_ec_public_key_coordinates(parent)?;
        Ok(Self {
            circuit: select_circuit(child, assets),
            child_der: child.as_der().to_vec(),
            authority_key_id,
            issuer_pk_x,
            issuer_pk_y,
        })
    }

    fn into_request(self, prev: Commitment) -> ProveRequest {
        ProveRequest {
            circuit: self.circuit,
            child_der: self.child_der,
            authority_key_id: self.authority_key_id,
            issuer_pk_x: self.issuer_pk_x,
            issuer_pk_y: self.issuer_pk_y,
            prev,
        }
    }
}

/// Commit request over the identity of `root`.
pub fn seed_request(
    root: &Certificate,
    randomness: Option<String>,
) -> Result<CommitRequest, X509Error> {
    let (pk_x, pk_y) = extract_ec_public_key_coordinates(root)?;
    Ok(CommitRequest {
        subject_der: root.subject_der()?,
        subject_key_id: compute_subject_key_id(root)?,
        pk_x,
        pk_y,
        randomness,
    })
}

/// Seed commitment for `chain`, taken over its root-ward certificate.
///
/// Rejects short chains before the committer is called.
pub fn seed_commitment(
    chain: &[Certificate],
    committer: &dyn Committer,
    randomness: Option<String>,
) -> Result<Commitment, ChainError> {
    let root = match chain {
        [.., root] if chain.len() >= MIN_CHAIN_LEN => root,
        _ => return Err(ChainError::ChainTooShort { len: chain.len() }),
    };
    let request = seed_request(root, randomness).map_err(ChainError::RootExtraction)?;
    let seed = committer.commit(&request)?;
    tracing::debug!(cmt = %seed.value, "seed commitment");
    Ok(seed)
}

/// Sequential link prover for one chain.
pub struct CommitmentChainBuilder<'a> {
    prover: &'a dyn Prover,
    assets: &'a CircuitAssets,
}

impl<'a> CommitmentChainBuilder<'a> {
    pub fn new(prover: &'a dyn Prover, assets: &'a CircuitAssets) -> Self {
        Self { prover, assets }
    }

    /// Inputs for every link, in proving order.
    pub fn link_inputs(&self, chain: &[Certificate]) -> Result<Vec<LinkInputs>, ChainError> {
        if chain.len() < MIN_CHAIN_LEN {
            return Err(ChainError::ChainTooShort { len: chain.len() });
        }
        (1..chain.len())
            .rev()
            .enumerate()
            .map(|(link, i)| {
                LinkInputs::extract(&chain[i - 1], &chain[i], self.assets)
                    .map_err(|source| ChainError::Extraction { link, source })
            })
            .collect()
    }

    /// Prove every link of `chain`, threading commitments from `seed`.
    ///
    /// Returns one [`ProofResult`] per link in proving order (root-ward
    /// link first), `chain.len() - 1` in total.
    pub fn build(
        &self,
        chain: &[Certificate],
        seed: Commitment,
    ) -> Result<Vec<ProofResult>, ChainError> {
        let links = self.link_inputs(chain)?;
        let total = links.len();
        let mut proofs = Vec::with_capacity(total);
        let mut prev = seed;

        for (link, inputs) in links.into_iter().enumerate() {
            let span = tracing::info_span!("prove_link", link, circuit = %inputs.circuit.name);
            let _guard = span.enter();

            let request = inputs.into_request(prev);
            let proof = self
                .prover
                .prove(&request)
                .map_err(|source| ChainError::Prover { link, source })?;
            tracing::info!(total, next_cmt = %proof.next_cmt, "link proved");

            prev = proof.next_commitment();
            proofs.push(proof);
        }
        Ok(proofs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acp_core::CircuitFamily;
    use acp_x509::load_pem_chain;
    use parking_lot::Mutex;

    const CHAIN: &[u8] = include_bytes!("../../acp-x509/tests/fixtures/chain.pem");

    /// Records every request and returns a commitment derived from the call
    /// index, so threading mistakes show up as mismatched values.
    #[derive(Default)]
    struct RecordingProver {
        calls: Mutex<Vec<ProveRequest>>,
        fail_at: Option<usize>,
    }

    impl Prover for RecordingProver {
        fn prove(&self, request: &ProveRequest) -> Result<ProofResult, ProverError> {
            let mut calls = self.calls.lock();
            let n = calls.len();
            calls.push(request.clone());
            if self.fail_at == Some(n) {
                return Err(ProverError::GenerationFailed("constraint unsatisfied".into()));
            }
            Ok(ProofResult::new(
                format!("{}_0x{n:02x}", request.circuit.family.tag()),
                Commitment::new(format!("cmt{n}"), format!("r{n}")),
            ))
        }
    }

    fn chain() -> Vec<Certificate> {
        load_pem_chain(CHAIN).unwrap()
    }

    #[test]
    fn three_certificates_yield_two_threaded_proofs() {
        let prover = RecordingProver::default();
        let assets = CircuitAssets::default();
        let builder = CommitmentChainBuilder::new(&prover, &assets);

        let proofs = builder.build(&chain(), Commitment::new("C0", "R0")).unwrap();
        assert_eq!(proofs.len(), 2);

        let calls = prover.calls.lock();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].prev, Commitment::new("C0", "R0"));
        assert_eq!(calls[1].prev, proofs[0].next_commitment());
        assert_eq!(calls[1].prev, Commitment::new("cmt0", "r0"));
    }

    #[test]
    fn links_run_from_root_toward_leaf() {
        let chain = chain();
        let prover = RecordingProver::default();
        let assets = CircuitAssets::default();
        CommitmentChainBuilder::new(&prover, &assets)
            .build(&chain, Commitment::new("C0", "R0"))
            .unwrap();

        let calls = prover.calls.lock();
        // root signs the intermediate, then the intermediate signs the leaf
        assert_eq!(calls[0].child_der, chain[1].as_der());
        assert_eq!(calls[0].circuit.family, CircuitFamily::Ca);
        assert_eq!(calls[1].child_der, chain[0].as_der());
        assert_eq!(calls[1].circuit.family, CircuitFamily::EndEntity);

        let (x, y) = extract_ec_public_key_coordinates(&chain[1]).unwrap();
        assert_eq!((calls[1].issuer_pk_x, calls[1].issuer_pk_y), (x, y));
        assert_eq!(
            calls[1].authority_key_id,
            compute_subject_key_id(&chain[1]).unwrap()
        );
    }

    #[test]
    fn short_chain_is_rejected_before_proving() {
        let prover = RecordingProver::default();
        let assets = CircuitAssets::default();
        let builder = CommitmentChainBuilder::new(&prover, &assets);

        let chain = chain();
        assert!(matches!(
            builder.build(&chain[..2], Commitment::new("C0", "R0")),
            Err(ChainError::ChainTooShort { len: 2 })
        ));
        assert!(prover.calls.lock().is_empty());
        assert!(matches!(
            builder.build(&[], Commitment::new("C0", "R0")),
            Err(ChainError::ChainTooShort { len: 0 })
        ));
    }

    #[test]
    fn prover_failure_aborts_and_names_link() {
        let prover = RecordingProver {
            fail_at: Some(0),
            ..Default::default()
        };
        let assets = CircuitAssets::default();
        let err = CommitmentChainBuilder::new(&prover, &assets)
            .build(&chain(), Commitment::new("C0", "R0"))
            .unwrap_err();
        assert!(matches!(err, ChainError::Prover { link: 0, .. }));
        assert_eq!(prover.calls.lock().len(), 1, "later links must not run");
    }

    #[test]
    fn longer_chain_repeats_the_root() {
        // [leaf, parent, root, root]: the self-signed root link is proved
        // first, giving n - 1 proofs.
        let mut chain = chain();
        chain.push(chain[2].clone());
        let prover = RecordingProver::default();
        let assets = CircuitAssets::default();
        let proofs = CommitmentChainBuilder::new(&prover, &assets)
            .build(&chain, Commitment::new("C0", "R0"))
            .unwrap();
        assert_eq!(proofs.len(), 3);
        let calls = prover.calls.lock();
        for k in 1..calls.len() {
            assert_eq!(calls[k].prev, proofs[k - 1].next_commitment());
        }
    }
}
