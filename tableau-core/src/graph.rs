//! The scene graph: every named scene, its layers and the active pointer.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::validation::{self, ValidationReport};
use crate::{
    AssetCatalog, Category, Layer, LayerId, LayerPatch, Scene, StageError, StageResult,
};

/// Size used for layers whose asset has no natural dimensions.
const FALLBACK_LAYER_SIZE: f32 = 100.0;

/// Per-category layer counts for one scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneSummary {
    /// Scene identifier.
    pub scene_id: String,
    /// Scene name.
    pub name: String,
    /// Total number of layers.
    pub layer_count: usize,
    /// Layers showing a background asset.
    pub background_count: usize,
    /// Layers showing a character asset.
    pub character_count: usize,
    /// Layers showing a UI asset.
    pub ui_count: usize,
    /// Layers referencing an audio asset.
    pub audio_count: usize,
    /// Layers referencing a data asset.
    pub data_count: usize,
}

/// Owner of all scenes.
///
/// Every layer mutation keeps the affected scene sorted by z-index, so
/// renderers can paint [`Scene::layers`] back to front without sorting.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tableau_core::{AssetCatalog, AssetMetadata, Category, LayerPatch, SceneGraph};
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
/// let mut graph = SceneGraph::new(Arc::new(catalog));
/// graph.create_scene("s1", "Beach", None, None);
/// let layer = graph.add_layer("s1", "bg_beach", LayerPatch::new()).unwrap();
/// assert_eq!(layer.z_index, 10);
/// ```
#[derive(Debug)]
pub struct SceneGraph {
    catalog: Arc<AssetCatalog>,
    scenes: HashMap<String, Scene>,
    /// Creation order, used for enumeration.
    order: Vec<String>,
    current: Option<String>,
    next_layer: u64,
}

impl SceneGraph {
    /// Create an empty scene graph backed by the given catalog.
    #[must_use]
    pub fn new(catalog: Arc<AssetCatalog>) -> Self {
        Self {
            catalog,
            scenes: HashMap::new(),
            order: Vec::new(),
            current: None,
            next_layer: 0,
        }
    }

    /// The catalog layers are resolved against.
    #[must_use]
    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    /// Create a scene, replacing any scene with the same id.
    ///
    /// Width and height default to 1920x1080.
    pub fn create_scene(
        &mut self,
        id: &str,
        name: &str,
        width: Option<u32>,
        height: Option<u32>,
    ) -> &Scene {
        let scene = Scene::new(
            id,
            name,
            width.unwrap_or(crate::scene::DEFAULT_WIDTH),
            height.unwrap_or(crate::scene::DEFAULT_HEIGHT),
        );
        if self.scenes.insert(id.to_string(), scene).is_some() {
            tracing::warn!("Scene {id} already existed and was overwritten");
        } else {
            self.order.push(id.to_string());
        }
        &self.scenes[id]
    }

    /// Get a scene by id.
    #[must_use]
    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.get(id)
    }

    fn scene_mut(&mut self, id: &str) -> StageResult<&mut Scene> {
        self.scenes
            .get_mut(id)
            .ok_or_else(|| StageError::SceneNotFound(id.to_string()))
    }

    /// All scenes, in creation order.
    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.order.iter().filter_map(|id| self.scenes.get(id))
    }

    /// Number of scenes.
    #[must_use]
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Add a layer showing `asset_id` to a scene.
    ///
    /// The z-index defaults to the asset category's band and the size to the
    /// asset's natural dimensions; any field set in `overrides` wins.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::SceneNotFound`] if the scene does not exist.
    /// Returns [`StageError::AssetNotFound`] if the asset is not in the catalog.
    pub fn add_layer(
        &mut self,
        scene_id: &str,
        asset_id: &str,
        overrides: LayerPatch,
    ) -> StageResult<Layer> {
        if !self.scenes.contains_key(scene_id) {
            return Err(StageError::SceneNotFound(scene_id.to_string()));
        }
        let metadata = self.catalog.resolve(asset_id)?;

        let id = LayerId::from_raw(self.next_layer);
        self.next_layer += 1;

        #[allow(clippy::cast_precision_loss)]
        let mut layer = Layer {
            id,
            asset_id: asset_id.to_string(),
            z_index: metadata.category.default_z_index(),
            x: 0.0,
            y: 0.0,
            width: metadata.width.map_or(FALLBACK_LAYER_SIZE, |w| w as f32),
            height: metadata.height.map_or(FALLBACK_LAYER_SIZE, |h| h as f32),
            opacity: 1.0,
            visible: true,
            animation: None,
        };
        layer.apply(&overrides);

        let scene = self.scene_mut(scene_id)?;
        scene.push_layer(layer.clone());
        tracing::debug!(
            "Added {id} ({asset_id}, z={}) to scene {scene_id}",
            layer.z_index
        );
        Ok(layer)
    }

    /// Remove a layer from a scene.
    ///
    /// Returns `None` if the scene has no such layer.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::SceneNotFound`] if the scene does not exist.
    pub fn remove_layer(
        &mut self,
        scene_id: &str,
        layer_id: LayerId,
    ) -> StageResult<Option<Layer>> {
        Ok(self.scene_mut(scene_id)?.remove_layer(layer_id))
    }

    /// Merge `patch` into a layer, re-sorting the scene if the z-index changed.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::SceneNotFound`] if the scene does not exist.
    /// Returns [`StageError::LayerNotFound`] if the layer does not exist.
    pub fn update_layer(
        &mut self,
        scene_id: &str,
        layer_id: LayerId,
        patch: &LayerPatch,
    ) -> StageResult<&Layer> {
        let scene = self.scene_mut(scene_id)?;
        let layer = scene
            .layer_mut(layer_id)
            .ok_or_else(|| StageError::LayerNotFound {
                scene_id: scene_id.to_string(),
                layer_id,
            })?;
        if layer.apply(patch) {
            scene.sort_layers();
        }
        scene.layer(layer_id).ok_or_else(|| StageError::LayerNotFound {
            scene_id: scene_id.to_string(),
            layer_id,
        })
    }

    /// Flip a layer's visibility and return the new value.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::SceneNotFound`] if the scene does not exist.
    /// Returns [`StageError::LayerNotFound`] if the layer does not exist.
    pub fn toggle_visibility(&mut self, scene_id: &str, layer_id: LayerId) -> StageResult<bool> {
        let layer = self
            .scene_mut(scene_id)?
            .layer_mut(layer_id)
            .ok_or_else(|| StageError::LayerNotFound {
                scene_id: scene_id.to_string(),
                layer_id,
            })?;
        layer.visible = !layer.visible;
        Ok(layer.visible)
    }

    /// Set the fill color painted under all layers.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::SceneNotFound`] if the scene does not exist.
    pub fn set_background_color(
        &mut self,
        scene_id: &str,
        color: Option<String>,
    ) -> StageResult<()> {
        self.scene_mut(scene_id)?.background_color = color;
        Ok(())
    }

    /// Set how long the scene should be shown.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::SceneNotFound`] if the scene does not exist.
    pub fn set_duration(&mut self, scene_id: &str, duration_ms: Option<u32>) -> StageResult<()> {
        self.scene_mut(scene_id)?.duration_ms = duration_ms;
        Ok(())
    }

    /// Make a scene the active one.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::SceneNotFound`] if the scene does not exist; the
    /// active scene is left unchanged.
    pub fn set_current_scene(&mut self, scene_id: &str) -> StageResult<()> {
        if !self.scenes.contains_key(scene_id) {
            return Err(StageError::SceneNotFound(scene_id.to_string()));
        }
        self.current = Some(scene_id.to_string());
        Ok(())
    }

    /// The active scene, if any.
    #[must_use]
    pub fn current_scene(&self) -> Option<&Scene> {
        self.current.as_deref().and_then(|id| self.scenes.get(id))
    }

    /// Layers of a scene whose asset has the given category, in paint order.
    ///
    /// Layers with unresolved assets are never included.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::SceneNotFound`] if the scene does not exist.
    pub fn layers_by_category(
        &self,
        scene_id: &str,
        category: Category,
    ) -> StageResult<Vec<&Layer>> {
        let scene = self
            .scenes
            .get(scene_id)
            .ok_or_else(|| StageError::SceneNotFound(scene_id.to_string()))?;
        Ok(scene
            .layers()
            .iter()
            .filter(|l| {
                self.catalog
                    .get(&l.asset_id)
                    .is_some_and(|m| m.category == category)
            })
            .collect())
    }

    /// Per-category layer counts of a scene.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::SceneNotFound`] if the scene does not exist.
    pub fn scene_summary(&self, scene_id: &str) -> StageResult<SceneSummary> {
        let scene = self
            .scenes
            .get(scene_id)
            .ok_or_else(|| StageError::SceneNotFound(scene_id.to_string()))?;
        let mut summary = SceneSummary {
            scene_id: scene.id.clone(),
            name: scene.name.clone(),
            layer_count: scene.layer_count(),
            background_count: 0,
            character_count: 0,
            ui_count: 0,
            audio_count: 0,
            data_count: 0,
        };
        for metadata in scene
            .layers()
            .iter()
            .filter_map(|l| self.catalog.get(&l.asset_id))
        {
            match metadata.category {
                Category::Background => summary.background_count += 1,
                Category::Character => summary.character_count += 1,
                Category::Ui => summary.ui_count += 1,
                Category::Audio => summary.audio_count += 1,
                Category::Data => summary.data_count += 1,
            }
        }
        Ok(summary)
    }

    /// Validate a scene against this graph's catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::SceneNotFound`] if the scene does not exist.
    pub fn validate_scene(&self, scene_id: &str) -> StageResult<ValidationReport> {
        let scene = self
            .scenes
            .get(scene_id)
            .ok_or_else(|| StageError::SceneNotFound(scene_id.to_string()))?;
        Ok(validation::validate(scene, &self.catalog))
    }

    /// Delete a scene, clearing the active pointer if it pointed there.
    pub fn delete_scene(&mut self, scene_id: &str) -> Option<Scene> {
        let removed = self.scenes.remove(scene_id)?;
        self.order.retain(|id| id != scene_id);
        if self.current.as_deref() == Some(scene_id) {
            self.current = None;
        }
        Some(removed)
    }

    /// Drop every scene and reset layer numbering.
    pub fn clear_all(&mut self) {
        self.scenes.clear();
        self.order.clear();
        self.current = None;
        self.next_layer = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Animation, AnimationKind, AssetMetadata};

    fn catalog() -> Arc<AssetCatalog> {
        let mut catalog = AssetCatalog::new();
        catalog.register(
            AssetMetadata::new(
                "bg_beach",
                Category::Background,
                "png",
                2_500_000,
                "background/bg_beach.png",
            )
            .with_dimensions(1920, 1080),
        );
        catalog.register(
            AssetMetadata::new(
                "char_nook",
                Category::Character,
                "png",
                150_000,
                "character/char_nook.png",
            )
            .with_dimensions(256, 256),
        );
        catalog.register(
            AssetMetadata::new("ui_badge", Category::Ui, "png", 20_000, "ui/ui_badge.png")
                .with_dimensions(100, 100),
        );
        catalog.register(AssetMetadata::new(
            "sfx_chime",
            Category::Audio,
            "ogg",
            8_000,
            "audio/sfx_chime.ogg",
        ));
        Arc::new(catalog)
    }

    fn graph_with_scene() -> SceneGraph {
        let mut graph = SceneGraph::new(catalog());
        graph.create_scene("s1", "Beach", None, None);
        graph
    }

    fn z_order(graph: &SceneGraph) -> Vec<(i32, u64)> {
        graph
            .scene("s1")
            .expect("scene exists")
            .layers()
            .iter()
            .map(|l| (l.z_index, l.id.raw()))
            .collect()
    }

    #[test]
    fn test_create_scene_defaults() {
        let graph = graph_with_scene();
        let scene = graph.scene("s1").expect("scene exists");
        assert_eq!(scene.name, "Beach");
        assert_eq!((scene.width, scene.height), (1920, 1080));
        assert_eq!(scene.background_color.as_deref(), Some("#ffffff"));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_create_scene_overwrites() {
        let mut graph = graph_with_scene();
        graph
            .add_layer("s1", "bg_beach", LayerPatch::new())
            .expect("add");
        let scene = graph.create_scene("s1", "Sunset", Some(800), Some(600));
        assert_eq!(scene.name, "Sunset");
        assert!(scene.is_empty());
        assert_eq!(graph.scene_count(), 1);
    }

    #[test]
    fn test_add_layer_defaults_from_metadata() {
        let mut graph = graph_with_scene();
        let bg = graph
            .add_layer("s1", "bg_beach", LayerPatch::new())
            .expect("add bg");
        assert!(Category::Background.z_band().contains(&bg.z_index));
        assert!((bg.width - 1920.0).abs() < f32::EPSILON);
        assert!((bg.height - 1080.0).abs() < f32::EPSILON);
        assert!(bg.visible);

        let sfx = graph
            .add_layer("s1", "sfx_chime", LayerPatch::new())
            .expect("add audio");
        assert!((sfx.width - FALLBACK_LAYER_SIZE).abs() < f32::EPSILON);
        assert_eq!(sfx.z_index, 50);
    }

    #[test]
    fn test_add_layer_overrides() {
        let mut graph = graph_with_scene();
        let fade = Animation::new(AnimationKind::Fade, 300);
        let layer = graph
            .add_layer(
                "s1",
                "char_nook",
                LayerPatch::new()
                    .z_index(5)
                    .position(40.0, 60.0)
                    .opacity(0.5)
                    .animation(fade),
            )
            .expect("add");
        assert_eq!(layer.z_index, 5);
        assert!((layer.x - 40.0).abs() < f32::EPSILON);
        assert!((layer.opacity - 0.5).abs() < f32::EPSILON);
        assert_eq!(layer.animation, Some(fade));
    }

    #[test]
    fn test_add_layer_unknown_asset() {
        let mut graph = graph_with_scene();
        let result = graph.add_layer("s1", "unknown_asset", LayerPatch::new());
        assert_eq!(
            result,
            Err(StageError::AssetNotFound("unknown_asset".to_string()))
        );
        assert_eq!(graph.scene("s1").map(Scene::layer_count), Some(0));
    }

    #[test]
    fn test_add_layer_unknown_scene() {
        let mut graph = graph_with_scene();
        let result = graph.add_layer("s2", "bg_beach", LayerPatch::new());
        assert!(matches!(result, Err(StageError::SceneNotFound(_))));
    }

    #[test]
    fn test_layers_sorted_with_stable_ties() {
        let mut graph = graph_with_scene();
        graph.add_layer("s1", "ui_badge", LayerPatch::new()).expect("add");
        graph.add_layer("s1", "char_nook", LayerPatch::new()).expect("add");
        graph.add_layer("s1", "bg_beach", LayerPatch::new()).expect("add");
        graph.add_layer("s1", "char_nook", LayerPatch::new()).expect("add");

        assert_eq!(z_order(&graph), [(10, 2), (50, 1), (50, 3), (80, 0)]);
    }

    #[test]
    fn test_update_layer_resorts_by_insertion_on_ties() {
        let mut graph = graph_with_scene();
        let a = graph.add_layer("s1", "char_nook", LayerPatch::new()).expect("add");
        let b = graph.add_layer("s1", "char_nook", LayerPatch::new().z_index(40)).expect("add");

        graph
            .update_layer("s1", a.id, &LayerPatch::new().z_index(60))
            .expect("update");
        assert_eq!(z_order(&graph), [(40, 1), (60, 0)]);

        // Back onto b's value: the older layer still paints first.
        graph
            .update_layer("s1", a.id, &LayerPatch::new().z_index(40))
            .expect("update");
        assert_eq!(z_order(&graph), [(40, 0), (40, 1)]);

        let updated = graph
            .update_layer("s1", b.id, &LayerPatch::new().visible(false))
            .expect("update");
        assert!(!updated.visible);
    }

    #[test]
    fn test_update_missing_layer() {
        let mut graph = graph_with_scene();
        let result = graph.update_layer("s1", LayerId::from_raw(99), &LayerPatch::new());
        assert!(matches!(result, Err(StageError::LayerNotFound { .. })));
    }

    #[test]
    fn test_remove_layer_round_trip() {
        let mut graph = graph_with_scene();
        graph.add_layer("s1", "bg_beach", LayerPatch::new()).expect("add");
        let before = graph.scene("s1").map(Scene::layer_count);

        let layer = graph.add_layer("s1", "char_nook", LayerPatch::new()).expect("add");
        let removed = graph.remove_layer("s1", layer.id).expect("remove");
        assert_eq!(removed.map(|l| l.id), Some(layer.id));
        assert_eq!(graph.scene("s1").map(Scene::layer_count), before);

        // Second removal is a no-op.
        assert_eq!(graph.remove_layer("s1", layer.id), Ok(None));
    }

    #[test]
    fn test_toggle_visibility() {
        let mut graph = graph_with_scene();
        let layer = graph.add_layer("s1", "bg_beach", LayerPatch::new()).expect("add");

        assert_eq!(graph.toggle_visibility("s1", layer.id), Ok(false));
        assert_eq!(graph.toggle_visibility("s1", layer.id), Ok(true));
        let after = graph.scene("s1").and_then(|s| s.layer(layer.id)).expect("layer");
        assert_eq!(after.z_index, layer.z_index);
    }

    #[test]
    fn test_current_scene() {
        let mut graph = graph_with_scene();
        assert!(graph.current_scene().is_none());

        graph.set_current_scene("s1").expect("set current");
        assert_eq!(graph.current_scene().map(|s| s.id.as_str()), Some("s1"));

        assert!(graph.set_current_scene("missing").is_err());
        assert_eq!(graph.current_scene().map(|s| s.id.as_str()), Some("s1"));
    }

    #[test]
    fn test_delete_scene_clears_current() {
        let mut graph = graph_with_scene();
        graph.create_scene("s2", "Forest", None, None);
        graph.set_current_scene("s1").expect("set current");

        assert!(graph.delete_scene("s2").is_some());
        assert!(graph.current_scene().is_some());

        assert!(graph.delete_scene("s1").is_some());
        assert!(graph.current_scene().is_none());
        assert!(graph.delete_scene("s1").is_none());
    }

    #[test]
    fn test_layers_by_category() {
        let mut graph = graph_with_scene();
        graph.add_layer("s1", "char_nook", LayerPatch::new()).expect("add");
        graph.add_layer("s1", "bg_beach", LayerPatch::new()).expect("add");
        graph.add_layer("s1", "char_nook", LayerPatch::new().z_index(20)).expect("add");

        let characters = graph
            .layers_by_category("s1", Category::Character)
            .expect("layers");
        let ids: Vec<_> = characters.iter().map(|l| l.id.raw()).collect();
        assert_eq!(ids, [2, 0]);
        assert!(graph
            .layers_by_category("s1", Category::Data)
            .expect("layers")
            .is_empty());
    }

    #[test]
    fn test_scene_summary() {
        let mut graph = graph_with_scene();
        graph.add_layer("s1", "bg_beach", LayerPatch::new()).expect("add");
        graph.add_layer("s1", "char_nook", LayerPatch::new()).expect("add");
        graph.add_layer("s1", "ui_badge", LayerPatch::new()).expect("add");
        graph.add_layer("s1", "ui_badge", LayerPatch::new()).expect("add");

        let summary = graph.scene_summary("s1").expect("summary");
        assert_eq!(summary.layer_count, 4);
        assert_eq!(summary.background_count, 1);
        assert_eq!(summary.character_count, 1);
        assert_eq!(summary.ui_count, 2);
        assert_eq!(summary.audio_count, 0);
    }

    #[test]
    fn test_clear_all_resets_numbering() {
        let mut graph = graph_with_scene();
        graph.add_layer("s1", "bg_beach", LayerPatch::new()).expect("add");
        graph.set_current_scene("s1").expect("set current");

        graph.clear_all();
        assert_eq!(graph.scene_count(), 0);
        assert!(graph.current_scene().is_none());

        graph.create_scene("s1", "Again", None, None);
        let layer = graph.add_layer("s1", "bg_beach", LayerPatch::new()).expect("add");
        assert_eq!(layer.id, LayerId::from_raw(0));
    }

    #[test]
    fn test_scenes_in_creation_order() {
        let mut graph = SceneGraph::new(catalog());
        graph.create_scene("b", "B", None, None);
        graph.create_scene("a", "A", None, None);
        graph.create_scene("b", "B again", None, None);

        let ids: Vec<_> = graph.scenes().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_validate_scene() {
        let mut graph = graph_with_scene();
        graph.add_layer("s1", "bg_beach", LayerPatch::new()).expect("add");
        graph.add_layer("s1", "char_nook", LayerPatch::new()).expect("add");

        let report = graph.validate_scene("s1").expect("report");
        assert!(report.valid);
        assert!(graph.validate_scene("nope").is_err());
    }
}
