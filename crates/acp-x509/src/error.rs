//! # X.509 Error Types
//!
//! Structured errors for certificate parsing and field extraction.
//! A missing optional extension is not an error; see
//! [`ParseOutcome`](crate::extract::ParseOutcome).

use thiserror::Error;

/// Errors from certificate parsing and field extraction.
#[derive(Error, Debug)]
pub enum X509Error {
    /// The certificate DER could not be parsed.
    #[error("certificate parse error: {0}")]
    Parse(String),

    /// PEM armor was missing or malformed.
    #[error("PEM error: {0}")]
    Pem(String),

    /// An ASN.1 structure inside the certificate was malformed.
    #[error("ASN.1 decode error in {what}: {reason}")]
    Asn1Decode {
        /// The structure being decoded (e.g. "SubjectKeyIdentifier").
        what: &'static str,
        reason: String,
    },

    /// The public key is not an EC key on P-256.
    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// A coordinate's big-endian encoding does not fit 32 bytes.
    #[error("EC coordinate has {len} bytes; expected at most 32 (or 33 with a zero sign byte)")]
    CoordinateEncoding { len: usize },

    /// I/O error while loading certificates.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
