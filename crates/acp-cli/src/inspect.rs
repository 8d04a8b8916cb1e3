//! # Inspect CLI
//!
//! Prints the fields the prover consumes for every certificate in a PEM
//! file: names, key identifiers, public-key coordinates, the selected
//! circuit and the JWK form of the key.
//!
//! ```bash
//! acp inspect chain.pem
//! ```

use std::path::PathBuf;

use acp_core::CircuitAssets;
use acp_x509::extract::authority_key_id;
use acp_x509::{
    compute_subject_key_id, extract_authority_key_id, extract_ec_public_key_coordinates,
    load_pem_file, public_key_jwk, select_circuit, Certificate,
};
use anyhow::{Context, Result};
use clap::Args;
use serde_json::{json, Value};

/// Inspect subcommand arguments.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// PEM file with one certificate or a leaf-first chain.
    pub path: PathBuf,
}

/// Execute the inspect subcommand.
pub fn run_inspect(args: &InspectArgs) -> Result<u8> {
    let chain = load_pem_file(&args.path)
        .with_context(|| format!("failed to load {}", args.path.display()))?;
    let summary = summarize_chain(&chain, &CircuitAssets::default())?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(0)
}

/// One JSON object per certificate, leaf first.
///
/// The authority key identifier is resolved against the next certificate
/// when there is one; the last certificate reports only its own extension.
/// Fields that cannot be derived are reported as an `error` string in
/// place of the value.
pub fn summarize_chain(chain: &[Certificate], assets: &CircuitAssets) -> Result<Value> {
    let entries = chain
        .iter()
        .enumerate()
        .map(|(index, cert)| summarize(index, cert, chain.get(index + 1), assets))
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::Array(entries))
}

fn summarize(
    index: usize,
    cert: &Certificate,
    parent: Option<&Certificate>,
    assets: &CircuitAssets,
) -> Result<Value> {
    let circuit = select_circuit(cert, assets);
    let aki = match parent {
        Some(parent) => field(extract_authority_key_id(cert, parent).map(hex::encode)),
        None => authority_key_id(cert)
            .found()
            .map_or(Value::Null, |id| Value::String(hex::encode(id))),
    };
    let coordinates = match extract_ec_public_key_coordinates(cert) {
        Ok((x, y)) => json!({ "x": hex::encode(x), "y": hex::encode(y) }),
        Err(e) => json!({ "error": e.to_string() }),
    };

    Ok(json!({
        "index": index,
        "subject": cert.subject_dn()?,
        "issuer": cert.issuer_dn()?,
        "subjectKeyId": field(compute_subject_key_id(cert).map(hex::encode)),
        "authorityKeyId": aki,
        "publicKey": coordinates,
        "circuit": circuit.name,
        "jwk": field(public_key_jwk(cert)),
    }))
}

fn field<T: Into<Value>, E: std::fmt::Display>(result: std::result::Result<T, E>) -> Value {
    match result {
        Ok(v) => v.into(),
        Err(e) => json!({ "error": e.to_string() }),
    }
}
