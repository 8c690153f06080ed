//! Scenes - named, sized compositions of layered assets.

use serde::Serialize;

use crate::{Layer, LayerId};

/// Default canvas width in pixels.
pub const DEFAULT_WIDTH: u32 = 1920;

/// Default canvas height in pixels.
pub const DEFAULT_HEIGHT: u32 = 1080;

/// Default fill painted under all layers.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

/// A scene containing layers in paint order.
///
/// Layers are always kept sorted ascending by z-index, ties broken by
/// insertion order. Mutation goes through [`SceneGraph`].
///
/// [`SceneGraph`]: crate::SceneGraph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Layers in paint order.
    layers: Vec<Layer>,
    /// Fill color under all layers.
    pub background_color: Option<String>,
    /// How long the scene is shown, in milliseconds.
    pub duration_ms: Option<u32>,
}

impl Scene {
    /// Create a new empty scene.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            width,
            height,
            layers: Vec::new(),
            background_color: Some(DEFAULT_BACKGROUND_COLOR.to_string()),
            duration_ms: None,
        }
    }

    /// Layers in paint order (back to front).
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Get a layer by id.
    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub(crate) fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Append a layer and restore paint order.
    pub(crate) fn push_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
        self.sort_layers();
    }

    pub(crate) fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        let index = self.layers.iter().position(|l| l.id == id)?;
        Some(self.layers.remove(index))
    }

    /// Stable sort by z-index; equal z-indices keep insertion (id) order.
    pub(crate) fn sort_layers(&mut self) {
        self.layers.sort_by_key(|l| (l.z_index, l.id));
    }

    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Check if the scene has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Find the topmost visible layer covering the given canvas point.
    #[must_use]
    pub fn layer_at(&self, x: f32, y: f32) -> Option<&Layer> {
        self.layers
            .iter()
            .rev()
            .find(|l| l.visible && l.contains_point(x, y))
    }
}
