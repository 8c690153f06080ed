//! Read-only registry of asset metadata.
//!
//! The catalog is filled once at startup and then shared, usually behind an
//! `Arc`, by the asset cache and the scene graph.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{AssetMetadata, Category, StageError, StageResult};

/// Registry mapping asset ids to their metadata.
///
/// # Example
///
/// ```
/// use tableau_core::{AssetCatalog, AssetMetadata, Category};
///
/// let mut catalog = AssetCatalog::new();
/// catalog.register(AssetMetadata::new(
///     "bg_beach",
///     Category::Background,
///     "png",
///     2_500_000,
///     "background/bg_beach.png",
/// ));
///
/// assert!(catalog.resolve("bg_beach").is_ok());
/// assert!(catalog.resolve("bg_moon").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    entries: HashMap<String, Arc<AssetMetadata>>,
    /// Registration order, used for enumeration.
    order: Vec<String>,
}

impl AssetCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata, replacing any previous entry with the same id.
    ///
    /// A replaced entry keeps its original enumeration position.
    pub fn register(&mut self, metadata: AssetMetadata) {
        let id = metadata.id.clone();
        if self.entries.insert(id.clone(), Arc::new(metadata)).is_some() {
            tracing::debug!("Replaced catalog entry {id}");
        } else {
            self.order.push(id);
        }
    }

    /// Look up metadata by id.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::AssetNotFound`] if the id is not registered.
    pub fn resolve(&self, id: &str) -> StageResult<Arc<AssetMetadata>> {
        self.entries
            .get(id)
            .cloned()
            .ok_or_else(|| StageError::AssetNotFound(id.to_string()))
    }

    /// Borrow metadata by id, if registered.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AssetMetadata> {
        self.entries.get(id).map(AsRef::as_ref)
    }

    /// Check whether an id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// All metadata of one category, in registration order.
    #[must_use]
    pub fn list_by_category(&self, category: Category) -> Vec<&AssetMetadata> {
        self.iter().filter(|m| m.category == category).collect()
    }

    /// All metadata, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &AssetMetadata> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).map(AsRef::as_ref))
    }

    /// Number of registered assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
