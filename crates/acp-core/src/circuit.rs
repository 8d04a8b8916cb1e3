//! # Circuit Metadata
//!
//! Two proving circuits exist: one for links whose child certificate was
//! issued by a certificate authority, one for links whose child was issued
//! by a device key-attestation intermediate (TEE or StrongBox).
//!
//! Asset resolution is deterministic: the same [`CircuitFamily`] always
//! maps to the same three paths under a given asset root.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name of the structured reference string shared by both circuits.
const COMMON_SRS: &str = "common.srs";

/// Circuit family selected for a chain link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitFamily {
    /// Child certificate issued by a certificate authority.
    Ca,
    /// Child certificate issued by a TEE/StrongBox attestation key.
    EndEntity,
}

impl CircuitFamily {
    /// Proof-string tag emitted by the prover for this family (`ca` / `ee`).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Ca => "ca",
            Self::EndEntity => "ee",
        }
    }

    /// Circuit identifier, also the asset file stem.
    pub fn circuit_name(&self) -> &'static str {
        match self {
            Self::Ca => "es256_ca",
            Self::EndEntity => "es256_ee",
        }
    }

    /// Parse a proof-string tag. Anything other than `ca`/`ee` is `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ca" => Some(Self::Ca),
            "ee" => Some(Self::EndEntity),
            _ => None,
        }
    }
}

impl fmt::Display for CircuitFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.circuit_name())
    }
}

/// Identity and asset locations of one proving circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitMeta {
    pub name: String,
    pub family: CircuitFamily,
    /// Compiled circuit description (JSON bytecode).
    pub circuit_path: PathBuf,
    pub verification_key_path: PathBuf,
    /// Structured reference string.
    pub srs_path: PathBuf,
}

impl CircuitMeta {
    /// All three asset paths, in circuit / vk / srs order.
    pub fn asset_paths(&self) -> [&Path; 3] {
        [
            self.circuit_path.as_path(),
            self.verification_key_path.as_path(),
            self.srs_path.as_path(),
        ]
    }
}

/// Root directory holding the circuit assets.
///
/// Layout:
///
/// ```text
/// {root}/es256_ca.json   {root}/es256_ca.vk
/// {root}/es256_ee.json   {root}/es256_ee.vk
/// {root}/common.srs
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitAssets {
    root: PathBuf,
}

impl CircuitAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the [`CircuitMeta`] for a family.
    pub fn meta(&self, family: CircuitFamily) -> CircuitMeta {
        let name = family.circuit_name();
        CircuitMeta {
            name: name.to_string(),
            family,
            circuit_path: self.root.join(format!("{name}.json")),
            verification_key_path: self.root.join(format!("{name}.vk")),
            srs_path: self.root.join(COMMON_SRS),
        }
    }
}

impl Default for CircuitAssets {
    fn default() -> Self {
        Self::new("circuits")
    }
}
