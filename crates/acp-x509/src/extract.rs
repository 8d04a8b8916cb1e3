//! # Field Extraction
//!
//! Pulls the canonical, fixed-width fields that circuit inputs are built
//! from:
//!
//! - Authority Key Identifier of a child, falling back to the parent's
//!   Subject Key Identifier ([`extract_authority_key_id`]).
//! - Subject Key Identifier, from the extension or computed per RFC 5280
//!   §4.2.1.2 method (1) ([`compute_subject_key_id`]).
//! - P-256 affine coordinates as exactly 32 big-endian bytes each
//!   ([`extract_ec_public_key_coordinates`]).
//!
//! ## Normalization Invariant
//!
//! Every fixed-width output is normalized here, once. Downstream circuit
//! inputs assume bit-exact widths: a coordinate that keeps a sign byte or
//! loses a leading zero produces a proof over the wrong key.
//!
//! ## Extension Parsing
//!
//! Optional extensions are decoded into a [`ParseOutcome`]; callers choose
//! the fallback explicitly. Extension values are decoded with `asn1-rs`,
//! so long-form DER lengths are handled by the decoder rather than by
//! offset arithmetic.

use asn1_rs::{Any, Class, FromDer, Tag};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use sha1::{Digest, Sha1};
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::X509Extension;

use crate::cert::Certificate;
use crate::error::X509Error;

/// Width of a P-256 field element in bytes.
pub const COORDINATE_LEN: usize = 32;

/// id-ce-authorityKeyIdentifier (2.5.29.35), content octets.
const OID_AUTHORITY_KEY_IDENTIFIER: &[u8] = &[0x55, 0x1d, 0x23];
/// id-ce-subjectKeyIdentifier (2.5.29.14), content octets.
const OID_SUBJECT_KEY_IDENTIFIER: &[u8] = &[0x55, 0x1d, 0x0e];
/// id-ecPublicKey (1.2.840.10045.2.1).
const OID_EC_PUBLIC_KEY: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01];
/// prime256v1 / secp256r1 (1.2.840.10045.3.1.7).
const OID_PRIME256V1: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07];

/// Result of decoding an optional certificate field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome<T> {
    /// The field is present and decoded.
    Found(T),
    /// The extension or the field inside it is not present.
    Absent,
    /// The extension is present but could not be decoded.
    Malformed(String),
}

impl<T> ParseOutcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            Self::Absent | Self::Malformed(_) => None,
        }
    }
}

/// Authority Key Identifier of `child`, or the computed Subject Key
/// Identifier of `parent` when the child's AKI is absent, malformed, or
/// carries no `keyIdentifier`.
///
/// # Errors
///
/// Only fails if the fallback itself fails (parent's SKI extension is
/// malformed or the parent cannot be parsed).
pub fn extract_authority_key_id(
    child: &Certificate,
    parent: &Certificate,
) -> Result<Vec<u8>, X509Error> {
    match authority_key_id(child) {
        ParseOutcome::Found(id) => Ok(id),
        ParseOutcome::Absent => {
            tracing::debug!("child has no AKI keyIdentifier; using parent SKI");
            compute_subject_key_id(parent)
        }
        ParseOutcome::Malformed(reason) => {
            tracing::debug!(%reason, "child AKI malformed; using parent SKI");
            compute_subject_key_id(parent)
        }
    }
}

/// Decode the `keyIdentifier` of the child's AKI extension.
pub fn authority_key_id(cert: &Certificate) -> ParseOutcome<Vec<u8>> {
    let x509 = match cert.parse() {
        Ok(x509) => x509,
        Err(e) => return ParseOutcome::Malformed(e.to_string()),
    };
    match find_extension(&x509, OID_AUTHORITY_KEY_IDENTIFIER) {
        Some(ext) => parse_authority_key_id(ext.value),
        None => ParseOutcome::Absent,
    }
}

/// Decode an `AuthorityKeyIdentifier` SEQUENCE (the extnValue contents)
/// and return its `keyIdentifier [0] IMPLICIT OCTET STRING`.
pub fn parse_authority_key_id(ext_value: &[u8]) -> ParseOutcome<Vec<u8>> {
    let (rest, seq) = match Any::from_der(ext_value) {
        Ok(parsed) => parsed,
        Err(e) => return ParseOutcome::Malformed(format!("AuthorityKeyIdentifier: {e:?}")),
    };
    if !rest.is_empty() {
        return ParseOutcome::Malformed("trailing bytes after AuthorityKeyIdentifier".into());
    }
    if seq.header.tag() != Tag::Sequence {
        return ParseOutcome::Malformed(format!(
            "AuthorityKeyIdentifier is {:?}, not a SEQUENCE",
            seq.header.tag()
        ));
    }

    let mut fields = seq.data;
    while !fields.is_empty() {
        let (next, field) = match Any::from_der(fields) {
            Ok(parsed) => parsed,
            Err(e) => return ParseOutcome::Malformed(format!("AuthorityKeyIdentifier field: {e:?}")),
        };
        if field.header.class() == Class::ContextSpecific && field.header.tag() == Tag(0) {
            if field.data.is_empty() {
                return ParseOutcome::Malformed("empty keyIdentifier".into());
            }
            return ParseOutcome::Found(field.data.to_vec());
        }
        fields = next;
    }
    ParseOutcome::Absent
}

/// Subject Key Identifier of `cert`.
///
/// Uses the SKI extension when present; otherwise computes SHA-1 over the
/// subjectPublicKey BIT STRING payload (RFC 5280 §4.2.1.2, method 1).
///
/// # Errors
///
/// [`X509Error::Asn1Decode`] if the SKI extension is present but its
/// `keyIdentifier` cannot be decoded.
pub fn compute_subject_key_id(cert: &Certificate) -> Result<Vec<u8>, X509Error> {
    let x509 = cert.parse()?;
    match subject_key_id_extension(&x509) {
        ParseOutcome::Found(id) => Ok(id),
        ParseOutcome::Absent => {
            tracing::debug!("no SKI extension; hashing subjectPublicKey");
            Ok(public_key_sha1(&x509))
        }
        ParseOutcome::Malformed(reason) => Err(X509Error::Asn1Decode {
            what: "SubjectKeyIdentifier",
            reason,
        }),
    }
}

fn subject_key_id_extension(x509: &X509Certificate<'_>) -> ParseOutcome<Vec<u8>> {
    match find_extension(x509, OID_SUBJECT_KEY_IDENTIFIER) {
        Some(ext) => parse_subject_key_id(ext.value),
        None => ParseOutcome::Absent,
    }
}

/// Decode a `SubjectKeyIdentifier ::= KeyIdentifier (OCTET STRING)` from
/// the extnValue contents. An empty identifier is malformed.
pub fn parse_subject_key_id(ext_value: &[u8]) -> ParseOutcome<Vec<u8>> {
    match Any::from_der(ext_value) {
        Ok((rest, id)) if rest.is_empty() && id.header.tag() == Tag::OctetString => {
            if id.data.is_empty() {
                ParseOutcome::Malformed("keyIdentifier is missing".into())
            } else {
                ParseOutcome::Found(id.data.to_vec())
            }
        }
        Ok((_, id)) => ParseOutcome::Malformed(format!(
            "expected a single OCTET STRING, got {:?}",
            id.header.tag()
        )),
        Err(e) => ParseOutcome::Malformed(format!("{e:?}")),
    }
}

/// SHA-1 over the raw subjectPublicKey bits, excluding the BIT STRING tag,
/// length and unused-bits octet.
fn public_key_sha1(x509: &X509Certificate<'_>) -> Vec<u8> {
    let key_bits = &x509.public_key().subject_public_key.data[..];
    Sha1::digest(key_bits).to_vec()
}

/// Affine X and Y of a P-256 public key, each exactly 32 bytes big-endian.
///
/// # Errors
///
/// [`X509Error::UnsupportedKeyType`] for non-EC keys, EC keys on other
/// curves, or points that do not decode on P-256.
pub fn extract_ec_public_key_coordinates(
    cert: &Certificate,
) -> Result<([u8; COORDINATE_LEN], [u8; COORDINATE_LEN]), X509Error> {
    let x509 = cert.parse()?;
    let spki = x509.public_key();

    let algorithm = &spki.algorithm.algorithm;
    if algorithm.as_bytes() != OID_EC_PUBLIC_KEY {
        return Err(X509Error::UnsupportedKeyType(format!(
            "public key algorithm {} is not id-ecPublicKey",
            algorithm.to_id_string()
        )));
    }
    let curve = spki
        .algorithm
        .parameters
        .as_ref()
        .ok_or_else(|| X509Error::UnsupportedKeyType("EC key without named curve".into()))?;
    if curve.header.tag() != Tag::Oid || curve.data != OID_PRIME256V1 {
        return Err(X509Error::UnsupportedKeyType(
            "EC key is not on the 256-bit prime field (P-256)".into(),
        ));
    }

    let point = &spki.subject_public_key.data[..];
    let key = p256::PublicKey::from_sec1_bytes(point)
        .map_err(|e| X509Error::UnsupportedKeyType(format!("invalid P-256 point: {e}")))?;
    let encoded = key.to_encoded_point(false);
    match (encoded.x(), encoded.y()) {
        (Some(x), Some(y)) => Ok((
            normalize_coordinate(&x[..])?,
            normalize_coordinate(&y[..])?,
        )),
        _ => Err(X509Error::UnsupportedKeyType("point at infinity".into())),
    }
}

/// Normalize a natural big-endian unsigned integer encoding to 32 bytes.
///
/// - 33 bytes with a leading `0x00` sign byte: the sign byte is dropped.
/// - 32 bytes or fewer: left-padded with zeros.
/// - Anything else: [`X509Error::CoordinateEncoding`].
pub fn normalize_coordinate(bytes: &[u8]) -> Result<[u8; COORDINATE_LEN], X509Error> {
    let digits = match bytes.len() {
        n if n == COORDINATE_LEN + 1 && bytes[0] == 0 => &bytes[1..],
        n if n <= COORDINATE_LEN => bytes,
        n => return Err(X509Error::CoordinateEncoding { len: n }),
    };
    let mut out = [0u8; COORDINATE_LEN];
    out[COORDINATE_LEN - digits.len()..].copy_from_slice(digits);
    Ok(out)
}

fn find_extension<'c, 'a>(
    x509: &'c X509Certificate<'a>,
    oid: &[u8],
) -> Option<&'c X509Extension<'a>> {
    x509.extensions().iter().find(|ext| ext.oid.as_bytes() == oid)
}
