//! # Circuit Asset Loading
//!
//! Circuit descriptions, verification keys and the SRS are large and read
//! repeatedly across links. Caching is an injected capability: an
//! [`AssetStore`] reads through whatever [`AssetCache`] it was given, and
//! nothing here is process-global.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use acp_core::CircuitMeta;
use parking_lot::RwLock;

use crate::traits::ProverError;

/// Path-keyed cache of asset bytes.
pub trait AssetCache: Send + Sync {
    fn get(&self, path: &Path) -> Option<Arc<Vec<u8>>>;
    fn put(&self, path: PathBuf, bytes: Arc<Vec<u8>>);
}

/// Unbounded in-memory [`AssetCache`].
#[derive(Debug, Default)]
pub struct InMemoryAssetCache {
    entries: RwLock<HashMap<PathBuf, Arc<Vec<u8>>>>,
}

impl InMemoryAssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl AssetCache for InMemoryAssetCache {
    fn get(&self, path: &Path) -> Option<Arc<Vec<u8>>> {
        self.entries.read().get(path).cloned()
    }

    fn put(&self, path: PathBuf, bytes: Arc<Vec<u8>>) {
        self.entries.write().insert(path, bytes);
    }
}

/// The three assets of one circuit, loaded.
#[derive(Debug, Clone)]
pub struct LoadedCircuit {
    pub circuit: Arc<Vec<u8>>,
    pub verification_key: Arc<Vec<u8>>,
    pub srs: Arc<Vec<u8>>,
}

/// Read-through loader for circuit assets.
#[derive(Clone)]
pub struct AssetStore {
    cache: Arc<dyn AssetCache>,
}

impl AssetStore {
    pub fn new(cache: Arc<dyn AssetCache>) -> Self {
        Self { cache }
    }

    /// Store backed by a fresh [`InMemoryAssetCache`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryAssetCache::new()))
    }

    /// Bytes of `path`, from the cache or from disk.
    pub fn load(&self, path: &Path) -> Result<Arc<Vec<u8>>, ProverError> {
        if let Some(bytes) = self.cache.get(path) {
            tracing::trace!(path = %path.display(), "asset cache hit");
            return Ok(bytes);
        }
        let bytes = std::fs::read(path).map_err(|e| ProverError::Assets {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), len = bytes.len(), "loaded circuit asset");
        let bytes = Arc::new(bytes);
        self.cache.put(path.to_path_buf(), Arc::clone(&bytes));
        Ok(bytes)
    }

    /// Load all three assets of `meta`.
    pub fn load_circuit(&self, meta: &CircuitMeta) -> Result<LoadedCircuit, ProverError> {
        Ok(LoadedCircuit {
            circuit: self.load(&meta.circuit_path)?,
            verification_key: self.load(&meta.verification_key_path)?,
            srs: self.load(&meta.srs_path)?,
        })
    }
}

impl std::fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetStore").finish_non_exhaustive()
    }
}
