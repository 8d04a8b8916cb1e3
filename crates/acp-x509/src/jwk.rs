//! JWK (RFC 7517) export of a certificate's P-256 public key.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{json, Value};

use crate::cert::Certificate;
use crate::error::X509Error;
use crate::extract::extract_ec_public_key_coordinates;

/// The certificate's public key as an ES256 signing JWK.
///
/// Coordinates are the same normalized 32-byte values the circuits
/// consume, base64url-encoded without padding.
pub fn public_key_jwk(cert: &Certificate) -> Result<Value, X509Error> {
    let (x, y) = extract_ec_public_key_coordinates(cert)?;
    Ok(json!({
        "kty": "EC",
        "crv": "P-256",
        "x": URL_SAFE_NO_PAD.encode(x),
        "y": URL_SAFE_NO_PAD.encode(y),
        "use": "sig",
        "alg": "ES256",
    }))
}
