//! Asset metadata - the static description of every resource a scene can use.

use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

/// The kind of content an asset holds.
///
/// The category decides where a layer lands in the paint order when no
/// explicit z-index is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Full-canvas scenery painted first.
    Background,
    /// Characters and props in the middle of the stack.
    Character,
    /// Buttons, dialogs and icons painted on top.
    Ui,
    /// Sound effects and music.
    Audio,
    /// Structured data consumed by the composition.
    Data,
}

impl Category {
    /// All categories, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Background,
        Self::Character,
        Self::Ui,
        Self::Audio,
        Self::Data,
    ];

    /// The z-index band layers of this category are expected to occupy.
    #[must_use]
    pub const fn z_band(self) -> RangeInclusive<i32> {
        match self {
            Self::Background => 0..=10,
            Self::Character | Self::Audio | Self::Data => 20..=50,
            Self::Ui => 60..=100,
        }
    }

    /// Z-index assigned to a new layer when the caller does not override it.
    #[must_use]
    pub const fn default_z_index(self) -> i32 {
        match self {
            Self::Background => 10,
            Self::Character | Self::Audio | Self::Data => 50,
            Self::Ui => 80,
        }
    }

    /// Lowercase name, as used in asset source paths.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Character => "character",
            Self::Ui => "ui",
            Self::Audio => "audio",
            Self::Data => "data",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of an asset, independent of whether it is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetMetadata {
    /// Unique identifier.
    pub id: String,
    /// Content category.
    pub category: Category,
    /// Natural width in pixels, if the asset is visual.
    pub width: Option<u32>,
    /// Natural height in pixels, if the asset is visual.
    pub height: Option<u32>,
    /// File format (e.g. `png`).
    pub format: String,
    /// Size of the encoded payload in bytes.
    pub byte_size: u64,
    /// Locator handed to the fetcher.
    pub source: String,
    /// Optional human-readable description.
    pub description: Option<String>,
}

impl AssetMetadata {
    /// Create metadata without dimensions or description.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        category: Category,
        format: impl Into<String>,
        byte_size: u64,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            width: None,
            height: None,
            format: format.into(),
            byte_size,
            source: source.into(),
            description: None,
        }
    }

    /// Set the natural dimensions.
    #[must_use]
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_z_index_inside_band() {
        for category in Category::ALL {
            assert!(
                category.z_band().contains(&category.default_z_index()),
                "{category} default outside its band"
            );
        }
    }

    #[test]
    fn test_bands_are_ordered() {
        let bg = Category::Background.z_band();
        let ch = Category::Character.z_band();
        let ui = Category::Ui.z_band();
        assert!(bg.end() < ch.start());
        assert!(ch.end() < ui.start());
    }

    #[test]
    fn test_metadata_builder() {
        let meta = AssetMetadata::new(
            "bg_beach",
            Category::Background,
            "png",
            2_500_000,
            "background/bg_beach.png",
        )
        .with_dimensions(1920, 1080)
        .with_description("Beach");
        assert_eq!(meta.width, Some(1920));
        assert_eq!(meta.height, Some(1080));
        assert_eq!(meta.description.as_deref(), Some("Beach"));
    }
}
