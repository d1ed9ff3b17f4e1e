// Threshold and offset math shared by every strategy. All thresholds are
// compared against |offset|, the signed drag distance from a view's ideal
// position.

use tabstrip_core::{GroupTitleView, StripMetrics};

/// Distance a tab must be dragged over a neighbouring tab to swap with it.
pub fn tab_swap_threshold(metrics: &StripMetrics, k: f32, pinned: bool) -> f32 {
    metrics.effective_tab_width(pinned) * k
}

/// Distance a tab must be dragged over an expanded group's edge to join it.
pub fn drag_in_threshold(metrics: &StripMetrics, k: f32) -> f32 {
    metrics.half_tab_width(false) * k
}

/// Leaving toward the start also has to cross the group title.
pub fn drag_out_threshold(metrics: &StripMetrics, k: f32, title_width: f32, toward_end: bool) -> f32 {
    let base = drag_in_threshold(metrics, k);
    if toward_end {
        base
    } else {
        base + title_width
    }
}

pub fn collapsed_group_swap_threshold(title_width: f32, k: f32) -> f32 {
    title_width * k
}

pub fn expanded_group_swap_threshold(metrics: &StripMetrics, k: f32, bottom_indicator_width: f32) -> f32 {
    (bottom_indicator_width + metrics.bottom_indicator_width_offset) * k
}

/// Threshold for moving past the group whose title is `title`.
pub fn group_swap_threshold(metrics: &StripMetrics, k: f32, title: &GroupTitleView) -> f32 {
    if title.collapsed {
        collapsed_group_swap_threshold(title.state.width, k)
    } else {
        expanded_group_swap_threshold(metrics, k, title.bottom_indicator_width)
    }
}

/// Space reserved at a strip edge so a grouped edge tab can leave its group.
pub fn edge_margin(metrics: &StripMetrics, k: f32) -> f32 {
    drag_in_threshold(metrics, k)
}

pub fn is_offset_toward_end(offset: f32, rtl: bool) -> bool {
    (offset >= 0.0) != rtl
}

pub fn flip_sign_if(value: f32, flip: bool) -> f32 {
    if flip {
        -value
    } else {
        value
    }
}

/// Limit `offset` so it cannot travel more than `limit` toward the start.
pub fn clamp_toward_start(offset: f32, limit: f32, rtl: bool) -> f32 {
    if rtl {
        offset.min(limit)
    } else {
        offset.max(-limit)
    }
}

/// Limit `offset` so it cannot travel more than `limit` toward the end.
pub fn clamp_toward_end(offset: f32, limit: f32, rtl: bool) -> f32 {
    if rtl {
        offset.max(-limit)
    } else {
        offset.min(limit)
    }
}

/// Shift a drop x so it snaps to the gap nearest the dragged tab's centre.
pub fn adjust_x_for_tab_drop(x: f32, tab_width: f32, rtl: bool) -> f32 {
    if rtl {
        x + tab_width / 2.0
    } else {
        x - tab_width / 2.0
    }
}
