//! # Proof Results
//!
//! A [`ProofResult`] is what the prover returns for one chain link. The
//! `proof` string is hex, optionally tagged with the circuit family
//! (`ca_` / `ee_`) and optionally `0x`-prefixed, e.g. `ee_0x1f2e...`.

use serde::{Deserialize, Serialize};

use crate::circuit::CircuitFamily;
use crate::commitment::Commitment;

/// Output of one prover invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofResult {
    pub proof: String,
    pub next_cmt: String,
    pub next_cmt_r: String,
}

impl ProofResult {
    pub fn new(proof: impl Into<String>, next: Commitment) -> Self {
        Self {
            proof: proof.into(),
            next_cmt: next.value,
            next_cmt_r: next.randomness,
        }
    }

    /// Circuit family from the `ca_` / `ee_` tag, if the proof carries one.
    pub fn family(&self) -> Option<CircuitFamily> {
        let (tag, _) = self.proof.split_once('_')?;
        CircuitFamily::from_tag(tag)
    }

    /// The raw proof hex with the family tag and `0x` prefix removed.
    pub fn payload_hex(&self) -> &str {
        let untagged = match self.family() {
            Some(_) => &self.proof[3..],
            None => self.proof.as_str(),
        };
        untagged.strip_prefix("0x").unwrap_or(untagged)
    }

    /// The commitment this proof hands to the next link.
    pub fn next_commitment(&self) -> Commitment {
        Commitment::new(self.next_cmt.clone(), self.next_cmt_r.clone())
    }
}
