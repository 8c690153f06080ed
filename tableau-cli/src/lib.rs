//! # Tableau CLI
//!
//! Command-line host that wires the catalog, cache and scene graph together.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p tableau-cli
//! ```
//!
//! ## With assets on disk:
//!
//! ```bash
//! cargo run -p tableau-cli -- --asset-root ./assets --capacity 16 --json
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Capacity, canvas size and asset root
//! - `Stage` - Owns the cache and scene graph built from the stock catalog

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

pub mod seed;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tableau_cache::{
    AssetCache, AssetFetcher, CacheConfig, CacheStats, FsFetcher, PlaceholderFetcher,
};
use tableau_core::{
    Animation, AnimationKind, Layer, LayerPatch, SceneGraph, SceneSummary, StageError,
    ValidationReport,
};

/// Id of the scene the CLI composes.
pub const DEMO_SCENE: &str = "demo";

/// Assets placed in the demo scene, back to front.
pub const DEMO_ASSETS: [&str; 3] = ["bg_beach", "char_nook", "ui_dialog_box"];

/// Errors raised while composing the demo scene.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// A catalog or scene operation failed.
    #[error("Composition failed: {0}")]
    Stage(#[from] StageError),
}

/// Command-line arguments for tableau.
#[derive(Debug, Clone, Parser)]
#[command(name = "tableau")]
#[command(about = "Compose a scene from the stock catalog and report its state")]
#[command(version)]
pub struct CliArgs {
    /// Directory holding asset files; without it payloads are placeholders
    #[arg(long, env = "TABLEAU_ASSET_ROOT")]
    pub asset_root: Option<PathBuf>,

    /// Maximum number of resident assets
    #[arg(long, env = "TABLEAU_CACHE_CAPACITY", default_value = "100")]
    pub capacity: usize,

    /// Canvas width in pixels
    #[arg(long, default_value = "1920")]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value = "1080")]
    pub height: u32,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory holding asset files.
    pub asset_root: Option<PathBuf>,
    /// Cache capacity.
    pub capacity: usize,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Whether to print JSON.
    pub json: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CliConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            asset_root: None,
            capacity: tableau_cache::DEFAULT_CAPACITY,
            width: tableau_core::scene::DEFAULT_WIDTH,
            height: tableau_core::scene::DEFAULT_HEIGHT,
            json: false,
        }
    }
}

impl From<CliArgs> for CliConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            asset_root: args.asset_root,
            capacity: args.capacity,
            width: args.width,
            height: args.height,
            json: args.json,
        }
    }
}

/// Everything the CLI reports after composing.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Per-category layer counts.
    pub scene: SceneSummary,
    /// Layers in paint order.
    pub layers: Vec<Layer>,
    /// Validation outcome.
    pub validation: ValidationReport,
    /// Number of scene assets that loaded.
    pub preloaded: usize,
    /// Cache occupancy after preloading.
    pub cache: CacheStats,
}

/// The cache and scene graph, built over the stock catalog.
#[derive(Debug)]
pub struct Stage {
    /// Loaded assets.
    pub cache: AssetCache,
    /// Composed scenes.
    pub graph: SceneGraph,
}

impl Stage {
    /// Build the stock catalog and the components that share it.
    #[must_use]
    pub fn new(config: &CliConfig) -> Self {
        let catalog = Arc::new(seed::stock_catalog());
        let fetcher: Arc<dyn AssetFetcher> = match &config.asset_root {
            Some(root) => {
                tracing::info!("Reading assets from {}", root.display());
                Arc::new(FsFetcher::new(root))
            }
            None => {
                tracing::info!("No asset root configured, using placeholder payloads");
                Arc::new(PlaceholderFetcher)
            }
        };
        let cache = AssetCache::with_config(
            Arc::clone(&catalog),
            fetcher,
            CacheConfig {
                capacity: config.capacity,
            },
        );
        Self {
            cache,
            graph: SceneGraph::new(catalog),
        }
    }

    /// Lay out the demo scene and make it current.
    ///
    /// # Errors
    ///
    /// Returns an error if a demo asset is missing from the catalog.
    #[allow(clippy::cast_precision_loss)]
    pub fn compose_demo(&mut self, config: &CliConfig) -> Result<(), ComposeError> {
        let (width, height) = (config.width as f32, config.height as f32);
        self.graph.create_scene(
            DEMO_SCENE,
            "Beach greeting",
            Some(config.width),
            Some(config.height),
        );

        self.graph.add_layer(
            DEMO_SCENE,
            DEMO_ASSETS[0],
            LayerPatch::new().size(width, height),
        )?;
        self.graph.add_layer(
            DEMO_SCENE,
            DEMO_ASSETS[1],
            LayerPatch::new()
                .position((width - 256.0) / 2.0, height - 480.0)
                .animation(Animation::new(AnimationKind::Bounce, 800).looped()),
        )?;
        self.graph.add_layer(
            DEMO_SCENE,
            DEMO_ASSETS[2],
            LayerPatch::new()
                .position((width - 600.0) / 2.0, height - 220.0)
                .animation(Animation::new(AnimationKind::Fade, 300).with_delay(200)),
        )?;
        self.graph.set_current_scene(DEMO_SCENE)?;
        Ok(())
    }

    /// Compose the demo scene, load its assets and collect a report.
    ///
    /// # Errors
    ///
    /// Returns an error if composing fails. Individual asset load failures
    /// only lower [`Report::preloaded`].
    pub async fn run(&mut self, config: &CliConfig) -> Result<Report, ComposeError> {
        self.compose_demo(config)?;

        let scene = self
            .graph
            .scene(DEMO_SCENE)
            .ok_or_else(|| StageError::SceneNotFound(DEMO_SCENE.to_string()))?;
        let asset_ids: Vec<String> = scene.layers().iter().map(|l| l.asset_id.clone()).collect();
        let layers = scene.layers().to_vec();

        let preloaded = self.cache.preload(&asset_ids).await;
        tracing::info!("Loaded {preloaded}/{} scene assets", asset_ids.len());

        Ok(Report {
            scene: self.graph.scene_summary(DEMO_SCENE)?,
            layers,
            validation: self.graph.validate_scene(DEMO_SCENE)?,
            preloaded,
            cache: self.cache.stats(),
        })
    }
}
