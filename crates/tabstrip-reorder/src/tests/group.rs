use tabstrip_core::{GroupId, ReorderType, Tab, TabGroupModelFilter, TabModel, ViewKey};
use tabstrip_model::{StripScroller, TabStripModel};

use super::support::*;
use crate::StrategyKind;

const G: GroupId = GroupId(7);

fn title() -> ViewKey {
    ViewKey::GroupTitle(G)
}

/// `[1][G: 2 3][4]`
fn model() -> TabStripModel {
    TabStripModel::with_tabs(
        vec![Tab::new(1), grouped(2, 7), grouped(3, 7), Tab::new(4)],
        vec![group(7, 2)],
    )
}

#[test]
fn test_group_moves_past_tab() {
    let mut h = Harness::new(model());
    h.start(title(), ReorderType::DragWithinStrip);
    assert_eq!(h.delegate.active_strategy(), Some(StrategyKind::Group));
    assert!(h.strip.tab(3).unwrap().force_hide_end_divider);

    h.drag(10.0);
    assert_eq!(h.ids(), vec![1, 2, 3, 4]);
    // Title and members share one offset.
    for key in [title(), ViewKey::Tab(2), ViewKey::Tab(3)] {
        assert!(approx_eq(h.offset(key), 10.0));
    }

    h.drag(5.0);
    assert_eq!(h.ids(), vec![1, 4, 2, 3]);
    assert_eq!(h.model.tabs_in_group(G), vec![2, 3]);
    assert!(approx_eq(h.draw_x(title()), 37.0));
    assert!(approx_eq(h.offset(ViewKey::Tab(2)), -7.0));
}

#[test]
fn test_group_moves_past_group() {
    let model = TabStripModel::with_tabs(
        vec![grouped(1, 5), grouped(2, 7), grouped(3, 7)],
        vec![group(5, 1), group(7, 2)],
    );
    let mut h = Harness::new(model);
    h.start(title(), ReorderType::DragWithinStrip);
    // Expanded neighbour: (bottom indicator 41 + 27) * 0.53
    h.drag(-30.0);
    assert_eq!(h.ids(), vec![1, 2, 3]);
    h.drag(-10.0);
    assert_eq!(h.ids(), vec![2, 3, 1]);
    assert_eq!(h.model.group_of(1), Some(GroupId(5)));
}

#[test]
fn test_group_blocked_by_pinned_tab() {
    let model = TabStripModel::with_tabs(vec![pinned(1), grouped(2, 7), grouped(3, 7)], vec![group(7, 2)]);
    let mut h = Harness::new(model);
    h.start(title(), ReorderType::DragWithinStrip);
    h.drag(-30.0);

    assert_eq!(h.ids(), vec![1, 2, 3]);
    assert!(approx_eq(h.offset(title()), 0.0));
}

#[test]
fn test_group_stop_settles_and_shows_divider() {
    let mut h = Harness::new(model());
    h.start(title(), ReorderType::DragWithinStrip);
    h.drag(6.0);
    assert!(h.strip.title(G).unwrap().state.foregrounded);

    h.stop();
    h.settle();
    for key in [title(), ViewKey::Tab(2), ViewKey::Tab(3)] {
        assert!(approx_eq(h.offset(key), 0.0));
        assert!(!h.strip.view(key).unwrap().foregrounded);
    }
    assert!(!h.strip.tab(3).unwrap().force_hide_end_divider);
}

#[test]
fn test_group_drag_lifts_selected_member() {
    let mut model = model();
    model.select_tab(3);
    let mut h = Harness::new(model);
    h.start(title(), ReorderType::DragWithinStrip);
    h.settle();
    assert!(approx_eq(h.strip.tab(3).unwrap().bottom_margin, 4.0));
    assert!(approx_eq(h.strip.tab(2).unwrap().bottom_margin, 0.0));

    h.stop();
    h.settle();
    assert!(approx_eq(h.strip.tab(3).unwrap().bottom_margin, 0.0));
}

#[test]
fn test_keyboard_moves_group() {
    let model = TabStripModel::with_tabs(
        vec![grouped(1, 7), grouped(2, 7), Tab::new(3)],
        vec![group(7, 1)],
    );
    let mut h = Harness::new(model);
    assert!(h.run(|delegate, env| delegate.reorder_view_in_direction(env, ViewKey::GroupTitle(G), true)));
    assert_eq!(h.ids(), vec![3, 1, 2]);

    // Already at the end.
    assert!(!h.run(|delegate, env| delegate.reorder_view_in_direction(env, ViewKey::GroupTitle(G), true)));
    assert_eq!(h.model.selected_tab_id(), Some(1));
}

#[test]
fn test_group_moves_past_tab_in_rtl() {
    let mut h = Harness::with_metrics(model(), rtl_metrics(), StripScroller::default());
    assert!(approx_eq(h.draw_x(title()), 932.0));
    h.start(title(), ReorderType::DragWithinStrip);

    // Toward the end is leftward.
    h.drag(-15.0);
    assert_eq!(h.ids(), vec![1, 4, 2, 3]);
    assert!(approx_eq(h.draw_x(title()), 917.0));
    for key in [title(), ViewKey::Tab(2), ViewKey::Tab(3)] {
        assert!(approx_eq(h.offset(key), 7.0));
    }
}
