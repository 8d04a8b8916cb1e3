//! # acp-core: Foundational Types for the Attestation Chain Prover
//!
//! Shared data model consumed by every other crate in the workspace:
//!
//! - [`CircuitFamily`] and [`CircuitMeta`]: which proving circuit a chain
//!   link uses and where its assets live ([`CircuitAssets`]).
//! - [`Commitment`]: the opaque `(cmt, r)` pair threaded between proofs.
//! - [`ProofResult`]: one proof per chain link, plus the next commitment.
//! - [`SubmissionResult`] and [`AllProofsResult`]: the per-proof and
//!   aggregate outcome of on-chain submission.
//!
//! ## Ownership
//!
//! Every type here is immutable after construction. A [`Commitment`] is
//! produced by one step and consumed by exactly the next one; nothing in
//! this crate holds shared mutable state.

pub mod circuit;
pub mod commitment;
pub mod proof;
pub mod submission;

pub use circuit::{CircuitAssets, CircuitFamily, CircuitMeta};
pub use commitment::Commitment;
pub use proof::ProofResult;
pub use submission::{AllProofsResult, SubmissionResult};
