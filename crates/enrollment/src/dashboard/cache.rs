use super::dataset::Dataset;
use super::loader::{DataSourceError, DatasetLoader};
use std::collections::{HashMap, VecDeque};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::UNIX_EPOCH;
use tracing::{debug, info};

/// Identity of a data source plus a fingerprint of its current contents.
/// A changed fingerprint under the same identity invalidates the cached table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceSignature {
    pub identity: String,
    pub fingerprint: String,
}

impl SourceSignature {
    /// File signature from metadata only; the file body is not read.
    pub fn for_path(path: &Path) -> Result<Self, DataSourceError> {
        let canonical = std::fs::canonicalize(path)?;
        let metadata = std::fs::metadata(&canonical)?;
        let modified = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();

        Ok(Self {
            identity: canonical.display().to_string(),
            fingerprint: format!("{}:{}", metadata.len(), modified),
        })
    }

    /// Content-addressed signature for uploads and other in-memory sources.
    pub fn for_bytes(bytes: &[u8]) -> Self {
        let digest = format!("{:x}", md5::compute(bytes));
        Self {
            identity: format!("{INLINE_PREFIX}{digest}"),
            fingerprint: digest,
        }
    }

    pub fn is_inline(&self) -> bool {
        self.identity.starts_with(INLINE_PREFIX)
    }
}

const INLINE_PREFIX: &str = "inline:";

/// In-memory sources kept at once; the least recently used is evicted first.
pub const MAX_INLINE_ENTRIES: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, (String, Arc<Dataset>)>,
    /// Inline identities, least recently used first.
    inline_order: VecDeque<String>,
    stats: CacheStats,
}

impl CacheState {
    fn touch_inline(&mut self, identity: &str) {
        self.inline_order.retain(|entry| entry != identity);
        self.inline_order.push_back(identity.to_string());
        while self.inline_order.len() > MAX_INLINE_ENTRIES {
            if let Some(evicted) = self.inline_order.pop_front() {
                self.entries.remove(&evicted);
                debug!(source = %evicted, "inline dataset evicted");
            }
        }
    }
}

/// Loaded tables keyed by source identity. Shared read-only across callers;
/// the mutex only guards the map itself.
#[derive(Default)]
pub struct DatasetCache {
    state: Mutex<CacheState>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<Arc<Dataset>, DataSourceError> {
        let path = path.as_ref();
        let signature = SourceSignature::for_path(path)?;
        self.get_or_load(signature, || DatasetLoader::from_path(path))
    }

    pub fn load_bytes(&self, bytes: &[u8]) -> Result<Arc<Dataset>, DataSourceError> {
        let signature = SourceSignature::for_bytes(bytes);
        self.get_or_load(signature, || DatasetLoader::from_reader(Cursor::new(bytes)))
    }

    /// Drops the entry for `path`, forcing the next load to reread it.
    pub fn invalidate<P: AsRef<Path>>(&self, path: P) -> bool {
        let identity = std::fs::canonicalize(path.as_ref())
            .unwrap_or_else(|_| PathBuf::from(path.as_ref()))
            .display()
            .to_string();
        self.lock().entries.remove(&identity).is_some()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_or_load<F>(
        &self,
        signature: SourceSignature,
        load: F,
    ) -> Result<Arc<Dataset>, DataSourceError>
    where
        F: FnOnce() -> Result<Dataset, DataSourceError>,
    {
        {
            let mut state = self.lock();
            let cached = state
                .entries
                .get(&signature.identity)
                .filter(|(fingerprint, _)| *fingerprint == signature.fingerprint)
                .map(|(_, dataset)| Arc::clone(dataset));
            if let Some(dataset) = cached {
                state.stats.hits += 1;
                if signature.is_inline() {
                    state.touch_inline(&signature.identity);
                }
                debug!(source = %signature.identity, "dataset cache hit");
                return Ok(dataset);
            }
            state.stats.misses += 1;
        }

        // Loading happens outside the lock; a concurrent miss for the same
        // source may load twice, and the last writer wins.
        let dataset = Arc::new(load()?);
        let mut state = self.lock();
        let replaced = state
            .entries
            .insert(
                signature.identity.clone(),
                (signature.fingerprint.clone(), Arc::clone(&dataset)),
            )
            .is_some();
        if signature.is_inline() {
            state.touch_inline(&signature.identity);
        }
        info!(
            source = %signature.identity,
            rows = dataset.len(),
            replaced,
            "dataset cached"
        );
        Ok(dataset)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        // A poisoned guard only means a panic mid-insert; the map is still usable.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
