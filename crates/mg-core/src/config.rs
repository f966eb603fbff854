//! Tunables for scene seeding and the canvas.
//!
//! All fields have defaults matching the dashboard's behavior; callers
//! override individual fields with struct-update syntax.

use crate::model::{DEFAULT_NODE_SIZE, Size};
use serde::{Deserialize, Serialize};

// ─── Graph seeding ────────────────────────────────────────────────────────

/// Configuration for `build_scene` and the similarity builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphConfig {
    /// Minimum Jaccard similarity (exclusive) for an edge. Default: **0.2**.
    pub similarity_threshold: f64,

    /// Maximum number of consecutive pairs linked when no pair is similar
    /// enough. Default: **3**.
    pub fallback_chain_len: usize,

    /// Grid columns for initial placement. `None` picks `ceil(sqrt(n))`.
    pub grid_columns: Option<usize>,

    /// Gap between grid cells, world units. Default: **40**.
    pub grid_gap: f64,

    /// Offset of the first grid cell from the world origin. Default: **40**.
    pub grid_margin: f64,

    /// Size of seeded nodes.
    pub node_size: Size,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.2,
            fallback_chain_len: 3,
            grid_columns: None,
            grid_gap: 40.0,
            grid_margin: 40.0,
            node_size: DEFAULT_NODE_SIZE,
        }
    }
}

// ─── Canvas ───────────────────────────────────────────────────────────────

/// Configuration for the interactive canvas and its thumbnail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    /// Zoom increment of the zoom-in/zoom-out controls. Default: **0.1**.
    pub zoom_step: f64,

    /// Scale applied to world geometry in thumbnails. Default: **0.25**.
    pub thumbnail_scale: f64,

    /// Fixed thumbnail surface size. Default: **320 × 200**.
    pub thumbnail_size: Size,

    /// Padding kept around content by zoom-to-fit, screen pixels. Default: **32**.
    pub fit_padding: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            zoom_step: crate::viewport::ZOOM_STEP,
            thumbnail_scale: 0.25,
            thumbnail_size: Size::new(320.0, 200.0),
            fit_padding: 32.0,
        }
    }
}
