//! # acp-x509: Attestation Certificate Field Extraction
//!
//! Everything the prover needs to know about a certificate, normalized to
//! the fixed widths the circuits expect:
//!
//! - [`cert`]: DER container, PEM loading and re-armoring.
//! - [`extract`]: Authority/Subject Key Identifiers and P-256 coordinates.
//! - [`selector`]: issuer-organization based circuit selection.
//! - [`jwk`]: JWK export of the public key.
//! - [`provider`]: the [`AttestationProvider`] capability and two
//!   implementations.
//!
//! ## Error Policy
//!
//! Optional extensions decode into [`ParseOutcome`] and callers pick the
//! fallback. Only conditions with no sensible fallback (non-P-256 keys,
//! oversized coordinates, a malformed SKI extension) are [`X509Error`]s.

pub mod cert;
pub mod error;
pub mod extract;
pub mod jwk;
pub mod provider;
pub mod selector;

pub use cert::{load_pem_chain, load_pem_file, Certificate};
pub use error::X509Error;
pub use extract::{
    compute_subject_key_id, extract_authority_key_id, extract_ec_public_key_coordinates,
    normalize_coordinate, ParseOutcome, COORDINATE_LEN,
};
pub use jwk::public_key_jwk;
pub use provider::{AttestationProvider, PemDirectoryProvider, StaticChainProvider};
pub use selector::{select_circuit, select_family};
