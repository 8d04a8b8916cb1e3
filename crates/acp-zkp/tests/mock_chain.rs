//! End-to-end chain proving over the fixture chain with the mock backend.

#![cfg(feature = "mock")]

use std::sync::atomic::{AtomicUsize, Ordering};

use acp_core::{CircuitAssets, CircuitFamily, Commitment};
use acp_x509::{load_pem_chain, Certificate};
use acp_zkp::chain::seed_request;
use acp_zkp::{
    seed_commitment, ChainError, CommitError, CommitRequest, Committer, CommitmentChainBuilder,
    MockCommitter, MockProver, Prover,
};

fn fixture_chain() -> Vec<Certificate> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../acp-x509/tests/fixtures/chain.pem");
    load_pem_chain(&std::fs::read(path).expect("fixture chain should exist"))
        .expect("fixture chain should parse")
}

#[derive(Default)]
struct CountingCommitter {
    calls: AtomicUsize,
}

impl Committer for CountingCommitter {
    fn commit(&self, request: &CommitRequest) -> Result<Commitment, CommitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        MockCommitter.commit(request)
    }
}

#[test]
fn test_seed_is_taken_over_root_identity() {
    let chain = fixture_chain();
    let seed = seed_commitment(&chain, &MockCommitter, Some("deadbeef".into())).unwrap();

    let request = seed_request(&chain[2], Some("deadbeef".into())).unwrap();
    assert_eq!(request.subject_key_id.len(), 20);
    assert_eq!(seed, MockCommitter.commit(&request).unwrap());
}

#[test]
fn test_seed_rejects_short_chain_without_committing() {
    let chain = fixture_chain();
    let committer = CountingCommitter::default();
    let err = seed_commitment(&chain[..2], &committer, None).unwrap_err();
    assert!(matches!(err, ChainError::ChainTooShort { len: 2 }));
    assert_eq!(committer.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_mock_chain_threads_commitments() {
    let chain = fixture_chain();
    let assets = CircuitAssets::default();
    let prover = MockProver::new();
    let seed = seed_commitment(&chain, &MockCommitter, Some("01".into())).unwrap();

    let proofs = CommitmentChainBuilder::new(&prover, &assets)
        .build(&chain, seed.clone())
        .unwrap();
    assert_eq!(proofs.len(), 2);
    assert_eq!(proofs[0].family(), Some(CircuitFamily::Ca));
    assert_eq!(proofs[1].family(), Some(CircuitFamily::EndEntity));

    // Replaying link by link with the mock's own derivation reproduces the
    // chain only if each link consumed its predecessor's output.
    let builder = CommitmentChainBuilder::new(&prover, &assets);
    let links = builder.link_inputs(&chain).unwrap();
    let mut prev = seed;
    for (inputs, proof) in links.into_iter().zip(&proofs) {
        let request = acp_zkp::ProveRequest {
            circuit: inputs.circuit,
            child_der: inputs.child_der,
            authority_key_id: inputs.authority_key_id,
            issuer_pk_x: inputs.issuer_pk_x,
            issuer_pk_y: inputs.issuer_pk_y,
            prev: prev.clone(),
        };
        assert_eq!(&prover.prove(&request).unwrap(), proof);
        prev = proof.next_commitment();
    }
}
