// ============================================================
// Layer 6 - Model Cache
// ============================================================
// Process-lifetime memo of loaded artifacts, keyed by path.
// The first request for a path reads the file; every later
// request gets the same Arc. Bundles are never mutated after
// loading, so callers share them without further locking.
//
// A failed load is not cached: the next call tries again.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;

use crate::infra::artifact::{self, ArtifactBundle};

static MODELS: Lazy<Mutex<HashMap<PathBuf, Arc<ArtifactBundle>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Return the cached bundle for `path`, loading it on first use.
pub fn get_or_load(path: &Path) -> Result<Arc<ArtifactBundle>> {
    let key = path.to_path_buf();

    let mut models = MODELS
        .lock()
        .map_err(|_| anyhow!("model cache lock poisoned"))?;

    if let Some(bundle) = models.get(&key) {
        tracing::debug!("Model cache hit for '{}'", key.display());
        return Ok(Arc::clone(bundle));
    }

    let bundle = Arc::new(artifact::load(path)?);
    models.insert(key, Arc::clone(&bundle));
    Ok(bundle)
}

/// Whether `path` has already been loaded by this process.
#[cfg(test)]
pub fn is_cached(path: &Path) -> bool {
    MODELS.lock().map(|m| m.contains_key(path)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::artifact::tests::small_bundle;

    #[test]
    fn test_second_load_returns_same_instance() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("cached.json.gz");
        artifact::save(&path, &small_bundle()).unwrap();

        assert!(!is_cached(&path));
        let a = get_or_load(&path).unwrap();
        assert!(is_cached(&path));

        // Removing the file proves the second call never touches disk
        std::fs::remove_file(&path).unwrap();
        let b = get_or_load(&path).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json.gz");
        assert!(get_or_load(&path).is_err());
        assert!(!is_cached(&path));
    }
}
