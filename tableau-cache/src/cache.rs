//! Bounded asset cache with in-flight load deduplication.
//!
//! Each asset id occupies at most one slot:
//!
//! ```text
//! Absent ──load──▶ Pending ──ok──▶ Cached ──evict/remove──▶ Absent
//!                     └─────err─────────────────────────────▶ Absent
//! ```
//!
//! A pending slot holds one shared future. Every `load` of that id while it is
//! pending awaits a clone of the same future, so exactly one fetch runs and
//! all callers see the same outcome. Another clone is spawned onto the ambient
//! tokio runtime, so a fetch runs to completion even when no caller is left
//! waiting on it.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use futures::future::{join_all, BoxFuture, FutureExt, Shared};
use serde::Serialize;
use tableau_core::{AssetCatalog, AssetMetadata};

use crate::{AssetFetcher, CacheError, CacheResult};

/// Default number of resident assets.
pub const DEFAULT_CAPACITY: usize = 100;

/// Where a returned asset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetOrigin {
    /// Produced by a fetch that this call started or joined.
    Fresh,
    /// Already resident when the call was made.
    Cache,
}

/// A loaded asset.
///
/// Cloning is cheap: metadata and payload are shared.
#[derive(Debug, Clone)]
pub struct Asset {
    /// Asset identifier.
    pub id: String,
    /// Catalog metadata.
    pub metadata: Arc<AssetMetadata>,
    /// Opaque payload produced by the fetcher.
    pub payload: Arc<[u8]>,
    /// When the fetch completed.
    pub loaded_at: SystemTime,
    /// Whether this value was served from the cache.
    pub origin: AssetOrigin,
}

impl Asset {
    fn fresh(metadata: Arc<AssetMetadata>, payload: Vec<u8>) -> Self {
        Self {
            id: metadata.id.clone(),
            metadata,
            payload: payload.into(),
            loaded_at: SystemTime::now(),
            origin: AssetOrigin::Fresh,
        }
    }

    fn served_from_cache(&self) -> Self {
        Self {
            origin: AssetOrigin::Cache,
            ..self.clone()
        }
    }

    /// Check whether two values share the same loaded payload.
    #[must_use]
    pub fn same_load(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload) && self.loaded_at == other.loaded_at
    }
}

/// Configuration for the asset cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of resident assets.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Snapshot of cache occupancy and counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of resident assets.
    pub size: usize,
    /// Configured capacity.
    pub capacity: usize,
    /// Resident ids, oldest insertion first.
    pub asset_ids: Vec<String>,
    /// Loads answered from a resident asset.
    pub hits: u64,
    /// Loads that joined an in-flight fetch.
    pub coalesced: u64,
    /// Fetches started.
    pub fetches: u64,
    /// Fetches that failed.
    pub failures: u64,
    /// Residents dropped to respect capacity.
    pub evictions: u64,
    /// Total payload bytes fetched.
    pub bytes_loaded: u64,
}

type PendingLoad = Shared<BoxFuture<'static, CacheResult<Asset>>>;

enum Slot {
    Pending(PendingLoad),
    Cached(Asset),
}

#[derive(Default)]
struct Counters {
    hits: u64,
    coalesced: u64,
    fetches: u64,
    failures: u64,
    evictions: u64,
    bytes_loaded: u64,
}

struct CacheState {
    slots: HashMap<String, Slot>,
    /// Resident ids in insertion order; the front is evicted first.
    order: VecDeque<String>,
    capacity: usize,
    counters: Counters,
}

impl CacheState {
    /// Make room for one more resident, then insert `asset`.
    fn admit(&mut self, asset: Asset) {
        self.slots.remove(&asset.id);
        if self.capacity == 0 {
            tracing::warn!("Cache capacity is 0; {} not retained", asset.id);
            return;
        }
        while self.order.len() >= self.capacity {
            self.evict_oldest();
        }
        self.order.push_back(asset.id.clone());
        self.slots.insert(asset.id.clone(), Slot::Cached(asset));
    }

    fn evict_oldest(&mut self) {
        if let Some(id) = self.order.pop_front() {
            self.slots.remove(&id);
            self.counters.evictions += 1;
            tracing::debug!("Evicted {id}");
        }
    }

    fn remove_resident(&mut self, id: &str) -> Option<Asset> {
        if !matches!(self.slots.get(id), Some(Slot::Cached(_))) {
            return None;
        }
        self.order.retain(|resident| resident != id);
        match self.slots.remove(id) {
            Some(Slot::Cached(asset)) => Some(asset),
            _ => None,
        }
    }
}

/// Cache of loaded assets.
///
/// Cloning the cache yields another handle to the same state.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tableau_cache::{AssetCache, CacheConfig, PlaceholderFetcher};
/// use tableau_core::{AssetCatalog, AssetMetadata, Category};
///
/// let mut catalog = AssetCatalog::new();
/// catalog.register(AssetMetadata::new("a", Category::Ui, "png", 1, "ui/a.png"));
///
/// let cache = AssetCache::with_config(
///     Arc::new(catalog),
///     Arc::new(PlaceholderFetcher),
///     CacheConfig { capacity: 2 },
/// );
/// let asset = futures::executor::block_on(cache.load("a")).unwrap();
/// assert_eq!(asset.id, "a");
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Clone)]
pub struct AssetCache {
    catalog: Arc<AssetCatalog>,
    fetcher: Arc<dyn AssetFetcher>,
    state: Arc<Mutex<CacheState>>,
}

impl std::fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("AssetCache")
            .field("size", &state.order.len())
            .field("capacity", &state.capacity)
            .finish_non_exhaustive()
    }
}

impl AssetCache {
    /// Create a cache with the default capacity.
    #[must_use]
    pub fn new(catalog: Arc<AssetCatalog>, fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self::with_config(catalog, fetcher, CacheConfig::default())
    }

    /// Create a cache with custom configuration.
    #[must_use]
    pub fn with_config(
        catalog: Arc<AssetCatalog>,
        fetcher: Arc<dyn AssetFetcher>,
        config: CacheConfig,
    ) -> Self {
        Self {
            catalog,
            fetcher,
            state: Arc::new(Mutex::new(CacheState {
                slots: HashMap::new(),
                order: VecDeque::new(),
                capacity: config.capacity,
                counters: Counters::default(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        lock_state(&self.state)
    }

    /// The catalog assets are resolved against.
    #[must_use]
    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    /// Load an asset, fetching it only if it is neither resident nor in flight.
    ///
    /// Concurrent loads of the same id share a single fetch and all resolve to
    /// the same outcome.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotFound`] if the id is not in the catalog; the
    /// cache is left unchanged.
    /// Returns [`CacheError::LoadFailed`] if the fetch fails; the id reverts to
    /// absent so a later call retries from scratch.
    ///
    /// When called inside a tokio runtime, a fetch that is started here is also
    /// spawned onto that runtime, so it settles even if every caller drops its
    /// `load` future. Outside a runtime the fetch only advances while polled.
    pub async fn load(&self, id: &str) -> CacheResult<Asset> {
        let (pending, started) = {
            let mut guard = self.lock();
            let state = &mut *guard;
            match state.slots.get(id) {
                Some(Slot::Cached(asset)) => {
                    state.counters.hits += 1;
                    tracing::debug!("Cache hit for {id}");
                    return Ok(asset.served_from_cache());
                }
                Some(Slot::Pending(pending)) => {
                    state.counters.coalesced += 1;
                    tracing::debug!("Joining in-flight load of {id}");
                    (pending.clone(), false)
                }
                None => {
                    let metadata = self
                        .catalog
                        .resolve(id)
                        .map_err(|_| CacheError::NotFound(id.to_string()))?;
                    state.counters.fetches += 1;
                    let pending = self.start_fetch(metadata);
                    state
                        .slots
                        .insert(id.to_string(), Slot::Pending(pending.clone()));
                    (pending, true)
                }
            }
        };
        if started {
            if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                runtime.spawn(pending.clone());
            }
        }
        pending.await
    }

    /// Build the shared future that fetches an asset and settles its slot.
    ///
    /// The slot is updated before the outcome is handed to any waiter.
    fn start_fetch(&self, metadata: Arc<AssetMetadata>) -> PendingLoad {
        let fetcher = Arc::clone(&self.fetcher);
        let state = Arc::clone(&self.state);
        async move {
            tracing::debug!("Fetching {} from {}", metadata.id, metadata.source);
            let outcome = fetcher.fetch(&metadata).await;
            let mut state = lock_state(&state);
            match outcome {
                Ok(payload) => {
                    state.counters.bytes_loaded += payload.len() as u64;
                    let asset = Asset::fresh(metadata, payload);
                    state.admit(asset.clone());
                    Ok(asset)
                }
                Err(err) => {
                    state.counters.failures += 1;
                    state.slots.remove(&metadata.id);
                    tracing::warn!("Failed to load {}: {err}", metadata.id);
                    Err(CacheError::LoadFailed {
                        id: metadata.id.clone(),
                        reason: err.to_string(),
                    })
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Get a resident asset without loading it.
    ///
    /// Never changes cache state or statistics.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Asset> {
        match self.lock().slots.get(id) {
            Some(Slot::Cached(asset)) => Some(asset.served_from_cache()),
            _ => None,
        }
    }

    /// Check whether an asset is resident.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        matches!(self.lock().slots.get(id), Some(Slot::Cached(_)))
    }

    /// Check whether a fetch for the asset is in flight.
    #[must_use]
    pub fn is_loading(&self, id: &str) -> bool {
        matches!(self.lock().slots.get(id), Some(Slot::Pending(_)))
    }

    /// Drop a resident asset.
    ///
    /// In-flight loads are not affected. Removing an absent id is a no-op.
    pub fn remove(&self, id: &str) -> Option<Asset> {
        let removed = self.lock().remove_resident(id);
        if removed.is_some() {
            tracing::debug!("Removed {id}");
        }
        removed
    }

    /// Load every id, ignoring individual failures.
    ///
    /// Returns how many of the ids ended up loaded. Callers that need the
    /// outcome per id should call [`load`](Self::load) directly.
    pub async fn preload<I, S>(&self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: Vec<S> = ids.into_iter().collect();
        let outcomes = join_all(ids.iter().map(|id| self.load(id.as_ref()))).await;
        let mut loaded = 0;
        for (id, outcome) in ids.iter().zip(outcomes) {
            match outcome {
                Ok(_) => loaded += 1,
                Err(err) => tracing::warn!("Preload of {} skipped: {err}", id.as_ref()),
            }
        }
        loaded
    }

    /// Change the capacity, evicting the oldest residents if now over it.
    pub fn set_capacity(&self, capacity: usize) {
        let mut state = self.lock();
        state.capacity = capacity;
        while state.order.len() > capacity {
            state.evict_oldest();
        }
    }

    /// The configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.lock().capacity
    }

    /// Drop every resident asset. In-flight loads still complete.
    pub fn clear(&self) {
        let mut state = self.lock();
        let state = &mut *state;
        for id in state.order.drain(..) {
            state.slots.remove(&id);
        }
    }

    /// Number of resident assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    /// Check if nothing is resident.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().order.is_empty()
    }

    /// Snapshot of occupancy and counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            size: state.order.len(),
            capacity: state.capacity,
            asset_ids: state.order.iter().cloned().collect(),
            hits: state.counters.hits,
            coalesced: state.counters.coalesced,
            fetches: state.counters.fetches,
            failures: state.counters.failures,
            evictions: state.counters.evictions,
            bytes_loaded: state.counters.bytes_loaded,
        }
    }
}

fn lock_state(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
