//! # Circuit Selection
//!
//! Maps a certificate to the circuit that proves it was signed by its
//! issuer. Android key attestation intermediates carry `O=TEE` or
//! `O=StrongBox` in their subject; any certificate issued by one of them
//! is an end-entity link. Everything else, including certificates that
//! fail to parse, is proved with the CA circuit.

use acp_core::{CircuitAssets, CircuitFamily, CircuitMeta};

use crate::cert::Certificate;

/// Issuer organizations that mark an attestation-key issued certificate.
const END_ENTITY_ISSUERS: [&str; 2] = ["tee", "strongbox"];

/// Select the circuit family for `cert`. Never fails.
pub fn select_family(cert: &Certificate) -> CircuitFamily {
    match cert.issuer_dn() {
        Ok(dn) => organization_from_dn(&dn)
            .map(|org| family_for_organization(&org))
            .unwrap_or(CircuitFamily::Ca),
        Err(e) => {
            tracing::debug!(error = %e, "issuer unreadable; defaulting to CA circuit");
            CircuitFamily::Ca
        }
    }
}

/// Resolve the full [`CircuitMeta`] for `cert` under `assets`.
pub fn select_circuit(cert: &Certificate, assets: &CircuitAssets) -> CircuitMeta {
    assets.meta(select_family(cert))
}

/// Family for an issuer organization value (compared case-insensitively).
pub fn family_for_organization(org: &str) -> CircuitFamily {
    let org = org.trim();
    if END_ENTITY_ISSUERS
        .iter()
        .any(|known| org.eq_ignore_ascii_case(known))
    {
        CircuitFamily::EndEntity
    } else {
        CircuitFamily::Ca
    }
}

/// First `O=` attribute of a comma-delimited DN string, trimmed.
pub fn organization_from_dn(dn: &str) -> Option<String> {
    dn.split(',').find_map(|rdn| {
        let (key, value) = rdn.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("o")
            .then(|| value.trim().to_string())
    })
}
