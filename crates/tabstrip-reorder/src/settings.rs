// Tuning constants for reorder gestures. Loaded as part of the host's
// settings file, so every field falls back to its default when missing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorderSettings {
    /// Fraction of a view's width the drag must cover before a swap, merge
    /// or drag-out happens.
    pub reorder_overlap_switch_percentage: f32,
    pub anim_tab_move_ms: u64,
    pub anim_folio_detach_ms: u64,
    pub folio: FolioMargins,
    pub edge_scroll: EdgeScrollSettings,
}

impl Default for ReorderSettings {
    fn default() -> Self {
        Self {
            reorder_overlap_switch_percentage: 0.53,
            anim_tab_move_ms: 125,
            anim_folio_detach_ms: 75,
            folio: FolioMargins::default(),
            edge_scroll: EdgeScrollSettings::default(),
        }
    }
}

/// Bottom margins of a tab container while attached to, lifting off and
/// detached from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioMargins {
    pub attached: f32,
    pub intermediate: f32,
    pub detached: f32,
}

impl Default for FolioMargins {
    fn default() -> Self {
        Self {
            attached: 0.0,
            intermediate: -12.0,
            detached: 4.0,
        }
    }
}

/// Auto-scroll while a dragged view sits in a strip gutter. Speed ramps
/// from zero at `start_min` px from the edge to `max_speed` at `start_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeScrollSettings {
    /// Pixels per second.
    pub max_speed: f32,
    pub start_min: f32,
    pub start_max: f32,
}

impl Default for EdgeScrollSettings {
    fn default() -> Self {
        Self {
            max_speed: 1000.0,
            start_min: 87.4,
            start_max: 18.4,
        }
    }
}
