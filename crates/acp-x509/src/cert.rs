//! # Certificate Container
//!
//! [`Certificate`] owns the DER bytes of one X.509 certificate and parses
//! on demand. Construction validates that the DER parses as a complete
//! certificate, so accessors only fail on truly inconsistent input.

use std::fmt;
use std::path::Path;

use base64::Engine;
use x509_parser::certificate::X509Certificate;
use x509_parser::pem::parse_x509_pem;

use crate::error::X509Error;

const PEM_BEGIN: &[u8] = b"-----BEGIN";
const PEM_LINE_WIDTH: usize = 64;

/// An immutable DER-encoded X.509 certificate.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Certificate {
    der: Vec<u8>,
}

impl Certificate {
    /// Wrap DER bytes, rejecting anything that is not exactly one certificate.
    pub fn from_der(der: impl Into<Vec<u8>>) -> Result<Self, X509Error> {
        let der = der.into();
        let (rest, _) = x509_parser::parse_x509_certificate(&der)
            .map_err(|e| X509Error::Parse(e.to_string()))?;
        if !rest.is_empty() {
            return Err(X509Error::Parse(format!(
                "{} trailing bytes after certificate",
                rest.len()
            )));
        }
        Ok(Self { der })
    }

    /// Parse the first `CERTIFICATE` block of a PEM document.
    pub fn from_pem(pem: &[u8]) -> Result<Self, X509Error> {
        let (_, pem) = parse_x509_pem(pem).map_err(|e| X509Error::Pem(e.to_string()))?;
        if pem.label != "CERTIFICATE" {
            return Err(X509Error::Pem(format!("unexpected PEM label {:?}", pem.label)));
        }
        Self::from_der(pem.contents)
    }

    /// Re-armor as PEM with 64-column base64 lines.
    pub fn to_pem(&self) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(&self.der);
        let mut out = String::from("-----BEGIN CERTIFICATE-----\n");
        for chunk in b64.as_bytes().chunks(PEM_LINE_WIDTH) {
            // base64 output is ASCII.
            out.push_str(&String::from_utf8_lossy(chunk));
            out.push('\n');
        }
        out.push_str("-----END CERTIFICATE-----\n");
        out
    }

    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    /// Parse the stored DER.
    pub fn parse(&self) -> Result<X509Certificate<'_>, X509Error> {
        x509_parser::parse_x509_certificate(&self.der)
            .map(|(_, cert)| cert)
            .map_err(|e| X509Error::Parse(e.to_string()))
    }

    /// DER encoding of the Subject name.
    pub fn subject_der(&self) -> Result<Vec<u8>, X509Error> {
        Ok(self.parse()?.subject().as_raw().to_vec())
    }

    /// DER encoding of the Issuer name.
    pub fn issuer_der(&self) -> Result<Vec<u8>, X509Error> {
        Ok(self.parse()?.issuer().as_raw().to_vec())
    }

    /// Subject as a DN string, e.g. `O=TEE, CN=42f7...`.
    pub fn subject_dn(&self) -> Result<String, X509Error> {
        Ok(self.parse()?.subject().to_string())
    }

    /// Issuer as a DN string, e.g. `O=Google LLC, CN=Droid CA3`.
    pub fn issuer_dn(&self) -> Result<String, X509Error> {
        Ok(self.parse()?.issuer().to_string())
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subject = self
            .subject_dn()
            .unwrap_or_else(|_| "<unparsable>".to_string());
        f.debug_struct("Certificate")
            .field("subject", &subject)
            .field("der_len", &self.der.len())
            .finish()
    }
}

/// Parse every `CERTIFICATE` block in a PEM bundle, preserving order.
///
/// Attestation bundles are written leaf first; the order is not checked here.
pub fn load_pem_chain(bundle: &[u8]) -> Result<Vec<Certificate>, X509Error> {
    let mut chain = Vec::new();
    let mut rest = bundle;
    while contains(rest, PEM_BEGIN) {
        let (next, pem) = parse_x509_pem(rest).map_err(|e| X509Error::Pem(e.to_string()))?;
        if pem.label == "CERTIFICATE" {
            chain.push(Certificate::from_der(pem.contents)?);
        } else {
            tracing::debug!(label = %pem.label, "skipping non-certificate PEM block");
        }
        rest = next;
    }
    if chain.is_empty() {
        return Err(X509Error::Pem("no CERTIFICATE blocks found".to_string()));
    }
    Ok(chain)
}

/// Read and parse a PEM bundle from disk.
pub fn load_pem_file(path: &Path) -> Result<Vec<Certificate>, X509Error> {
    let bytes = std::fs::read(path)?;
    load_pem_chain(&bytes)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEAF: &[u8] = include_bytes!("../tests/fixtures/leaf.pem");
    const CHAIN: &[u8] = include_bytes!("../tests/fixtures/chain.pem");

    #[test]
    fn pem_round_trip_preserves_der() {
        let cert = Certificate::from_pem(LEAF).unwrap();
        let again = Certificate::from_pem(cert.to_pem().as_bytes()).unwrap();
        assert_eq!(cert, again);
    }

    #[test]
    fn pem_lines_are_64_columns() {
        let cert = Certificate::from_pem(LEAF).unwrap();
        let pem = cert.to_pem();
        let body: Vec<&str> = pem
            .lines()
            .filter(|l| !l.starts_with("-----"))
            .collect();
        assert!(body[..body.len() - 1].iter().all(|l| l.len() == 64));
        assert!(body.last().unwrap().len() <= 64);
    }

    #[test]
    fn chain_bundle_keeps_leaf_first_order() {
        let chain = load_pem_chain(CHAIN).unwrap();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].subject_dn().unwrap(), "CN=Android Keystore Key");
        assert!(chain[2].subject_dn().unwrap().contains("Droid CA3"));
    }

    #[test]
    fn rejects_trailing_garbage() {
        let cert = Certificate::from_pem(LEAF).unwrap();
        let mut der = cert.as_der().to_vec();
        der.extend_from_slice(&[0, 0]);
        assert!(matches!(Certificate::from_der(der), Err(X509Error::Parse(_))));
    }

    #[test]
    fn rejects_non_certificate_bytes() {
        assert!(Certificate::from_der(vec![0x30, 0x03, 0x02, 0x01, 0x01]).is_err());
        assert!(matches!(load_pem_chain(b"no pem here"), Err(X509Error::Pem(_))));
    }
}
