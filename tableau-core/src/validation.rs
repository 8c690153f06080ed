//! Structural checks over a composed scene.
//!
//! Validation never mutates and never stops at the first problem: a single
//! call reports everything that is wrong with the scene.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::{AssetCatalog, Category, LayerId, Scene};

/// A problem found in a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// No resolvable layer is a background.
    MissingBackground,
    /// More than one layer uses this z-index.
    DuplicateZIndex {
        /// The colliding value.
        z_index: i32,
    },
    /// The layer references an asset the catalog does not know.
    UnresolvedAsset {
        /// The offending layer.
        layer_id: LayerId,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBackground => f.write_str("missing background"),
            Self::DuplicateZIndex { z_index } => write!(f, "duplicate z-index: {z_index}"),
            Self::UnresolvedAsset { layer_id } => {
                write!(f, "unresolved asset for layer: {layer_id}")
            }
        }
    }
}

/// Outcome of validating a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// True iff `issues` is empty.
    pub valid: bool,
    /// Every problem found, in check order.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        Self {
            valid: issues.is_empty(),
            issues,
        }
    }

    /// Issues rendered as human-readable messages.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// Validate a scene against the catalog.
///
/// Checks, in order:
/// 1. at least one layer resolves to a [`Category::Background`] asset,
/// 2. no z-index is used twice (reported once per value),
/// 3. every layer's asset resolves.
#[must_use]
pub fn validate(scene: &Scene, catalog: &AssetCatalog) -> ValidationReport {
    let mut issues = Vec::new();

    let has_background = scene
        .layers()
        .iter()
        .filter_map(|l| catalog.get(&l.asset_id))
        .any(|m| m.category == Category::Background);
    if !has_background {
        issues.push(ValidationIssue::MissingBackground);
    }

    let mut seen = BTreeSet::new();
    let mut duplicated = BTreeSet::new();
    for layer in scene.layers() {
        if !seen.insert(layer.z_index) {
            duplicated.insert(layer.z_index);
        }
    }
    issues.extend(
        duplicated
            .into_iter()
            .map(|z_index| ValidationIssue::DuplicateZIndex { z_index }),
    );

    issues.extend(
        scene
            .layers()
            .iter()
            .filter(|l| !catalog.contains(&l.asset_id))
            .map(|l| ValidationIssue::UnresolvedAsset { layer_id: l.id }),
    );

    ValidationReport::from_issues(issues)
}
