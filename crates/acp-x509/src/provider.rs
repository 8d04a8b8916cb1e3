//! # Attestation Providers
//!
//! The platform key store that issues attestation chains is an external
//! capability. [`AttestationProvider`] is the seam: the pipeline asks for
//! the chain of a key alias and gets back leaf-first certificates.
//!
//! Two implementations ship here:
//!
//! - [`StaticChainProvider`]: in-memory alias map, for tests and embedding.
//! - [`PemDirectoryProvider`]: reads `{dir}/{alias}.pem` bundles exported
//!   from a device.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::cert::{load_pem_file, Certificate};
use crate::error::X509Error;

/// Source of attestation certificate chains.
pub trait AttestationProvider: Send + Sync {
    /// Chain for `alias`, ordered leaf first. `Ok(None)` if the alias is unknown.
    fn get_chain(&self, alias: &str) -> Result<Option<Vec<Certificate>>, X509Error>;
}

/// Fixed alias → chain map.
#[derive(Debug, Default, Clone)]
pub struct StaticChainProvider {
    chains: HashMap<String, Vec<Certificate>>,
}

impl StaticChainProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain(mut self, alias: impl Into<String>, chain: Vec<Certificate>) -> Self {
        self.chains.insert(alias.into(), chain);
        self
    }
}

impl AttestationProvider for StaticChainProvider {
    fn get_chain(&self, alias: &str) -> Result<Option<Vec<Certificate>>, X509Error> {
        Ok(self.chains.get(alias).cloned())
    }
}

/// Reads `{dir}/{alias}.pem`.
#[derive(Debug, Clone)]
pub struct PemDirectoryProvider {
    dir: PathBuf,
}

impl PemDirectoryProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, alias: &str) -> Result<PathBuf, X509Error> {
        // Aliases name files directly under `dir`; reject anything that
        // could resolve elsewhere.
        if alias.is_empty()
            || alias.contains(['/', '\\'])
            || alias == "."
            || alias == ".."
        {
            return Err(X509Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid key alias {alias:?}"),
            )));
        }
        Ok(self.dir.join(format!("{alias}.pem")))
    }
}

impl AttestationProvider for PemDirectoryProvider {
    fn get_chain(&self, alias: &str) -> Result<Option<Vec<Certificate>>, X509Error> {
        let path = self.path_for(alias)?;
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no chain for alias");
            return Ok(None);
        }
        load_pem_file(&path).map(Some)
    }
}
