//! # acp-zkp: Proof Chaining over Attestation Chains
//!
//! Turns a leaf-first attestation chain into an ordered list of link
//! proofs, each bound to the previous one by a running commitment.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): [`Prover`] and [`Committer`], the two
//!   external capabilities. Implement them to plug in a proving backend.
//!
//! - **Mock** (`mock.rs`, feature `mock`): [`MockProver`] and
//!   [`MockCommitter`], deterministic and transparent. No soundness.
//!
//! - **Assets** (`assets.rs`): [`AssetStore`] read-through loading of
//!   circuit files over an injected [`AssetCache`].
//!
//! - **Chain** (`chain.rs`): [`seed_commitment`] and
//!   [`CommitmentChainBuilder`].
//!
//! ## Data Flow
//!
//! ```text
//! chain ──► seed_commitment(root) ──► CommitmentChainBuilder::build ──► Vec<ProofResult>
//!                                        │ per link: AKI, issuer key, circuit
//!                                        └─► Prover::prove(prev) ─► next commitment
//! ```

pub mod assets;
pub mod chain;
#[cfg(feature = "mock")]
pub mod mock;
pub mod traits;

pub use assets::{AssetCache, AssetStore, InMemoryAssetCache, LoadedCircuit};
pub use chain::{seed_commitment, ChainError, CommitmentChainBuilder, LinkInputs, MIN_CHAIN_LEN};
#[cfg(feature = "mock")]
pub use mock::{MockCommitter, MockProver};
pub use traits::{CommitError, CommitRequest, Committer, ProveRequest, Prover, ProverError};
