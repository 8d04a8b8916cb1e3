//! Running commitment threaded between chain-link proofs.

use serde::{Deserialize, Serialize};

/// An opaque commitment value and its randomness.
///
/// Both fields are scalar-encoded strings produced by the commit or prove
/// capability; this crate never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment {
    #[serde(rename = "cmt")]
    pub value: String,
    #[serde(rename = "r")]
    pub randomness: String,
}

impl Commitment {
    pub fn new(value: impl Into<String>, randomness: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            randomness: randomness.into(),
        }
    }
}
