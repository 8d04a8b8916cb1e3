//! # acp-rpc: On-Chain Proof Submission
//!
//! Sends link proofs to their verifier contracts as JSON-RPC `eth_call`s
//! and reports a per-proof outcome.
//!
//! - [`abi`]: proof string → verifier call data.
//! - [`jsonrpc`]: `eth_call` envelope and response classification.
//! - [`transport`]: the [`RpcTransport`] seam and the `reqwest`
//!   implementation, with transport-level retry.
//! - [`submit`]: [`SubmissionAggregator`], sequential or concurrent.
//! - [`config`]: [`RpcConfig`], loaded from `ACP_*` environment variables.
//!
//! ## Failure Model
//!
//! Submission never fails as a whole. Transport errors, non-2xx statuses,
//! JSON-RPC `error` members and unparsable bodies all become
//! `isSuccess = false` entries in the [`AllProofsResult`](acp_core::AllProofsResult).

pub mod abi;
pub mod config;
pub mod error;
pub mod jsonrpc;
pub mod submit;
pub mod transport;

pub use abi::encode_for_verifier_call;
pub use config::{ConfigError, RpcConfig, SubmissionMode, VerifierAddresses};
pub use error::{EncodingError, TransportError};
pub use jsonrpc::{classify_response, eth_call_request, RpcResponse};
pub use submit::SubmissionAggregator;
pub use transport::{HttpRpcTransport, RpcTransport};
