//! # Tableau Core
//!
//! Synchronous composition logic: the asset catalog, scenes made of
//! z-ordered layers, and the validator that checks them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                tableau-core                 │
//! ├─────────────────────────────────────────────┤
//! │  AssetCatalog    │  SceneGraph              │
//! │  - Metadata      │  - Scenes                │
//! │  - Categories    │  - Layers (z-ordered)    │
//! │  - Z-index bands │  - Active scene          │
//! ├─────────────────────────────────────────────┤
//! │  Validation: background, z collisions,      │
//! │              unresolved assets              │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Loading asset payloads lives in `tableau-cache`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod asset;
pub mod catalog;
pub mod error;
pub mod graph;
pub mod layer;
pub mod scene;
pub mod validation;

pub use asset::{AssetMetadata, Category};
pub use catalog::AssetCatalog;
pub use error::{StageError, StageResult};
pub use graph::{SceneGraph, SceneSummary};
pub use layer::{Animation, AnimationKind, Layer, LayerId, LayerPatch};
pub use scene::Scene;
pub use validation::{validate, ValidationIssue, ValidationReport};

/// Tableau core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
