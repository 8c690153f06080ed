//! Error types for catalog and scene operations.

use thiserror::Error;

use crate::LayerId;

/// Result type for catalog and scene operations.
pub type StageResult<T> = Result<T, StageError>;

/// Errors that can occur in catalog and scene operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    /// Asset id is not registered in the catalog.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// Scene id is not known to the scene graph.
    #[error("Scene not found: {0}")]
    SceneNotFound(String),

    /// Layer id is not present in the given scene.
    #[error("Layer {layer_id} not found in scene {scene_id}")]
    LayerNotFound {
        /// Scene that was searched.
        scene_id: String,
        /// Layer that was requested.
        layer_id: LayerId,
    },
}
