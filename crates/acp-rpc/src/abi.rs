//! # Verifier Call Data
//!
//! Encodes a link proof as ABI call data for the verifier contract's
//! `verify(bytes proof, bytes32[] publicInputs)`:
//!
//! ```text
//! selector                         4 bytes
//! head[0] offset(proof)   = 0x40   word
//! head[1] offset(inputs)           word   = 0x40 + 0x20 + padded proof length
//! proof length (bytes)             word
//! proof data                       right-padded to a word boundary
//! inputs count            = 9      word
//! public inputs                    9 words, verbatim
//! ```
//!
//! The prover emits the public inputs first, then the proof data; the
//! contract wants them the other way round.

use std::fmt::Write;

use acp_core::ProofResult;

use crate::error::EncodingError;

/// Function selector of the verifier entry point.
pub const VERIFY_SELECTOR: &str = "ea50d0e4";
/// Number of `bytes32` public inputs per link proof.
pub const PUBLIC_INPUT_COUNT: usize = 9;
/// Hex characters in one 32-byte ABI word.
pub const WORD_HEX_LEN: usize = 64;
/// Hex characters of the public-inputs segment.
pub const PUBLIC_INPUTS_HEX_LEN: usize = PUBLIC_INPUT_COUNT * WORD_HEX_LEN;

const WORD_BYTES: usize = 32;
const PROOF_DATA_OFFSET: usize = 2 * WORD_BYTES;

/// `0x`-prefixed call data for verifying `proof` on chain.
pub fn encode_for_verifier_call(proof: &ProofResult) -> Result<String, EncodingError> {
    encode_payload(proof.payload_hex())
}

/// Encode an untagged, unprefixed proof payload.
pub fn encode_payload(payload: &str) -> Result<String, EncodingError> {
    if payload.len() < PUBLIC_INPUTS_HEX_LEN {
        return Err(EncodingError::TooShort {
            len: payload.len(),
            min: PUBLIC_INPUTS_HEX_LEN,
        });
    }
    if payload.len() % 2 != 0 {
        return Err(EncodingError::InvalidHex("odd number of hex digits".into()));
    }
    if let Some(pos) = payload.bytes().position(|b| !b.is_ascii_hexdigit()) {
        return Err(EncodingError::InvalidHex(format!("non-hex character at {pos}")));
    }

    let (public_inputs, proof_data) = payload.split_at(PUBLIC_INPUTS_HEX_LEN);
    let proof_len = proof_data.len() / 2;
    let padded_len = proof_len.div_ceil(WORD_BYTES) * WORD_BYTES;
    let inputs_offset = PROOF_DATA_OFFSET + WORD_BYTES + padded_len;

    let mut out = String::with_capacity(
        2 + VERIFY_SELECTOR.len() + 5 * WORD_HEX_LEN + padded_len * 2 + PUBLIC_INPUTS_HEX_LEN,
    );
    out.push_str("0x");
    out.push_str(VERIFY_SELECTOR);
    push_word(&mut out, PROOF_DATA_OFFSET);
    push_word(&mut out, inputs_offset);
    push_word(&mut out, proof_len);
    out.push_str(proof_data);
    out.extend(std::iter::repeat('0').take((padded_len - proof_len) * 2));
    push_word(&mut out, PUBLIC_INPUT_COUNT);
    out.push_str(public_inputs);
    Ok(out)
}

fn push_word(out: &mut String, value: usize) {
    // Writing to a String cannot fail.
    let _ = write!(out, "{value:064x}");
}
