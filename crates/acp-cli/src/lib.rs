//! # acp-cli
//!
//! The `acp` command-line interface and the [`pipeline::Pipeline`] that
//! wires attestation providers, proving capabilities and JSON-RPC
//! submission together.
//!
//! ## Subcommands
//!
//! - `acp inspect`: certificate fields, selected circuit and JWK.
//! - `acp prove`: prove every link of a chain and write the proofs.
//! - `acp encode`: verifier call data for a proofs file.
//! - `acp submit`: submit a proofs file to the verifier contracts.
//! - `acp run`: prove and submit in one step.
//!
//! ```bash
//! acp inspect chain.pem
//! acp prove --chain chain.pem --mock --out proofs.json
//! ACP_RPC_API_KEY=... acp submit --proofs proofs.json
//! ```

pub mod inspect;
pub mod pipeline;
pub mod prove;
pub mod source;
pub mod submit;

pub use pipeline::{Pipeline, PipelineError};
