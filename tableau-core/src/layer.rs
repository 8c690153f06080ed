//! Layers - one placed reference to an asset inside a scene.

use std::fmt;

use serde::Serialize;

/// Identifier of a layer.
///
/// Ids are handed out in increasing order by one [`SceneGraph`], so comparing
/// two ids from the same graph compares their insertion order.
///
/// [`SceneGraph`]: crate::SceneGraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LayerId(u64);

impl LayerId {
    /// Wrap a raw counter value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw counter value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer_{}", self.0)
    }
}

/// Kind of entrance or idle animation a renderer should play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    /// Opacity fade.
    Fade,
    /// Positional slide.
    Slide,
    /// Vertical bounce.
    Bounce,
    /// Horizontal shake.
    Shake,
}

/// Animation hint attached to a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Animation {
    /// What to animate.
    pub kind: AnimationKind,
    /// Duration in milliseconds.
    pub duration_ms: u32,
    /// Delay before start in milliseconds.
    pub delay_ms: u32,
    /// Whether the animation repeats.
    pub looped: bool,
}

impl Animation {
    /// A one-shot animation without delay.
    #[must_use]
    pub const fn new(kind: AnimationKind, duration_ms: u32) -> Self {
        Self {
            kind,
            duration_ms,
            delay_ms: 0,
            looped: false,
        }
    }

    /// Set the start delay.
    #[must_use]
    pub const fn with_delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Make the animation repeat.
    #[must_use]
    pub const fn looped(mut self) -> Self {
        self.looped = true;
        self
    }
}

/// One asset placed in a scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    /// Unique identifier within the owning scene graph.
    pub id: LayerId,
    /// Catalog id of the referenced asset.
    pub asset_id: String,
    /// Paint order; lower values paint first.
    pub z_index: i32,
    /// X position (pixels from left).
    pub x: f32,
    /// Y position (pixels from top).
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Opacity in `0.0..=1.0`.
    pub opacity: f32,
    /// Whether the layer is drawn.
    pub visible: bool,
    /// Optional animation hint.
    pub animation: Option<Animation>,
}

impl Layer {
    /// Check if a point (in canvas coordinates) is within this layer.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Merge the set fields of a patch into this layer.
    ///
    /// Returns `true` if the z-index changed.
    pub fn apply(&mut self, patch: &LayerPatch) -> bool {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(animation) = patch.animation {
            self.animation = animation;
        }
        match patch.z_index {
            Some(z) if z != self.z_index => {
                self.z_index = z;
                true
            }
            _ => false,
        }
    }
}

/// A partial set of layer fields.
///
/// Used both as overrides when adding a layer and as the update payload for
/// an existing one. Unset fields leave the layer untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerPatch {
    /// New z-index.
    pub z_index: Option<i32>,
    /// New X position.
    pub x: Option<f32>,
    /// New Y position.
    pub y: Option<f32>,
    /// New width.
    pub width: Option<f32>,
    /// New height.
    pub height: Option<f32>,
    /// New opacity (clamped to `0.0..=1.0`).
    pub opacity: Option<f32>,
    /// New visibility.
    pub visible: Option<bool>,
    /// New animation; `Some(None)` removes the current one.
    pub animation: Option<Option<Animation>>,
}

impl LayerPatch {
    /// An empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the z-index.
    #[must_use]
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    /// Set the position.
    #[must_use]
    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Set the size.
    #[must_use]
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the opacity.
    #[must_use]
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Set visibility.
    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Attach an animation.
    #[must_use]
    pub fn animation(mut self, animation: Animation) -> Self {
        self.animation = Some(Some(animation));
        self
    }

    /// Remove any animation.
    #[must_use]
    pub fn clear_animation(mut self) -> Self {
        self.animation = Some(None);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer() -> Layer {
        Layer {
            id: LayerId::from_raw(7),
            asset_id: "char_nook".to_string(),
            z_index: 50,
            x: 0.0,
            y: 0.0,
            width: 256.0,
            height: 256.0,
            opacity: 1.0,
            visible: true,
            animation: None,
        }
    }

    #[test]
    fn test_layer_id_display() {
        assert_eq!(LayerId::from_raw(3).to_string(), "layer_3");
    }

    #[test]
    fn test_apply_merges_only_set_fields() {
        let mut l = layer();
        let changed = l.apply(&LayerPatch::new().position(10.0, 20.0));
        assert!(!changed);
        assert!((l.x - 10.0).abs() < f32::EPSILON);
        assert!((l.y - 20.0).abs() < f32::EPSILON);
        assert!((l.width - 256.0).abs() < f32::EPSILON);
        assert!(l.visible);
    }

    #[test]
    fn test_apply_reports_z_change() {
        let mut l = layer();
        assert!(!l.apply(&LayerPatch::new().z_index(50)));
        assert!(l.apply(&LayerPatch::new().z_index(30)));
        assert_eq!(l.z_index, 30);
    }

    #[test]
    fn test_apply_clamps_opacity() {
        let mut l = layer();
        l.apply(&LayerPatch::new().opacity(1.7));
        assert!((l.opacity - 1.0).abs() < f32::EPSILON);
        l.apply(&LayerPatch::new().opacity(-0.2));
        assert!(l.opacity.abs() < f32::EPSILON);
    }

    #[test]
    fn test_animation_set_and_clear() {
        let mut l = layer();
        let bounce = Animation::new(AnimationKind::Bounce, 600).looped();
        l.apply(&LayerPatch::new().animation(bounce));
        assert_eq!(l.animation, Some(bounce));

        l.apply(&LayerPatch::new().clear_animation());
        assert_eq!(l.animation, None);
    }

    #[test]
    fn test_contains_point() {
        let l = layer();
        assert!(l.contains_point(100.0, 100.0));
        assert!(!l.contains_point(300.0, 10.0));
    }
}
