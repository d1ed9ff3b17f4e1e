use tabstrip_core::{GroupId, GroupTitleView, StripMetrics, ViewState};

use super::support::{approx_eq, metrics};
use crate::utils::*;

const K: f32 = 0.53;

fn title(collapsed: bool, width: f32, indicator: f32) -> GroupTitleView {
    GroupTitleView {
        group_id: GroupId(1),
        root_id: 1,
        bottom_indicator_width: indicator,
        collapsed,
        shared: false,
        state: ViewState {
            draw_x: 0.0,
            draw_y: 0.0,
            ideal_x: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            width,
            trailing_margin: 0.0,
            foregrounded: false,
            collapsed: false,
            dragged_off_strip: false,
            visible: true,
        },
    }
}

#[test]
fn test_tab_swap_threshold() {
    assert!(approx_eq(tab_swap_threshold(&metrics(), K, false), 11.66));
    // Pinned tabs are 40 wide here.
    assert!(approx_eq(tab_swap_threshold(&metrics(), K, true), 6.36));
}

#[test]
fn test_drag_in_and_out_thresholds() {
    let m = metrics();
    assert!(approx_eq(drag_in_threshold(&m, K), 5.83));
    assert!(approx_eq(drag_out_threshold(&m, K, 46.0, true), 5.83));
    assert!(approx_eq(drag_out_threshold(&m, K, 46.0, false), 51.83));
    assert!(approx_eq(edge_margin(&m, K), 5.83));
}

#[test]
fn test_group_swap_thresholds() {
    let m = metrics();
    assert!(approx_eq(group_swap_threshold(&m, K, &title(true, 50.0, 0.0)), 26.5));
    // (63 + 27) * 0.53
    assert!(approx_eq(group_swap_threshold(&m, K, &title(false, 46.0, 63.0)), 47.7));
}

#[test]
fn test_direction_follows_layout() {
    assert!(is_offset_toward_end(3.0, false));
    assert!(!is_offset_toward_end(-3.0, false));
    assert!(!is_offset_toward_end(3.0, true));
    assert!(is_offset_toward_end(-3.0, true));
}

#[test]
fn test_clamps_are_mirrored_in_rtl() {
    assert!(approx_eq(clamp_toward_start(-20.0, 5.0, false), -5.0));
    assert!(approx_eq(clamp_toward_start(20.0, 5.0, true), 5.0));
    assert!(approx_eq(clamp_toward_end(20.0, 5.0, false), 5.0));
    assert!(approx_eq(clamp_toward_end(-20.0, 5.0, true), -5.0));
    // Movement away from the clamped edge is untouched.
    assert!(approx_eq(clamp_toward_start(20.0, 5.0, false), 20.0));
}

#[test]
fn test_adjust_x_for_tab_drop() {
    assert!(approx_eq(adjust_x_for_tab_drop(100.0, 50.0, false), 75.0));
    assert!(approx_eq(adjust_x_for_tab_drop(100.0, 50.0, true), 125.0));
}

#[test]
fn test_settings_default_from_empty_json() {
    let settings: crate::ReorderSettings = serde_json::from_str("{}").unwrap();
    assert_eq!(settings, crate::ReorderSettings::default());
    assert!(approx_eq(settings.reorder_overlap_switch_percentage, K));
    assert_eq!(settings.anim_tab_move_ms, 125);
}

#[test]
fn test_settings_partial_override() {
    let settings: crate::ReorderSettings =
        serde_json::from_str(r#"{"edge_scroll": {"max_speed": 500.0}, "folio": {"detached": 6.0}}"#).unwrap();
    assert!(approx_eq(settings.edge_scroll.max_speed, 500.0));
    assert!(approx_eq(settings.edge_scroll.start_min, 87.4));
    assert!(approx_eq(settings.folio.detached, 6.0));
    assert!(approx_eq(settings.folio.intermediate, -12.0));
}

#[test]
fn test_metrics_round_trip_through_json() {
    let m = StripMetrics { rtl: true, ..metrics() };
    let json = serde_json::to_string(&m).unwrap();
    let back: StripMetrics = serde_json::from_str(&json).unwrap();
    assert_eq!(back, m);
}
