use std::cell::RefCell;
use std::rc::Rc;

use tabstrip_core::{ReorderType, ScrollDelegate, StripMetrics, TabId, ViewKey};
use tabstrip_model::StripScroller;

use super::support::*;

/// Twenty tabs in a 200 px wide viewport.
fn scrolling_strip() -> Harness {
    let ids: Vec<TabId> = (1..=20).collect();
    let content = 20.0 * 22.0 + 28.0;
    Harness::with_metrics(plain(&ids), metrics(), StripScroller::for_content(content, 200.0))
}

fn tick(h: &mut Harness, time_ms: u64) {
    h.run(|delegate, env| delegate.update_reorder_position_auto_scroll(env, time_ms, 200.0, 0.0, 0.0));
}

// ──────────────────────────────────────────
// Reorder mode
// ──────────────────────────────────────────

#[test]
fn test_observers_follow_reorder_mode() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut h = Harness::new(plain(&[1, 2]));
    let id = {
        let seen = Rc::clone(&seen);
        h.delegate.add_in_reorder_mode_observer(move |active| seen.borrow_mut().push(active))
    };

    h.start(ViewKey::Tab(1), ReorderType::DragWithinStrip);
    assert!(h.delegate.in_reorder_mode());
    h.stop();
    assert_eq!(*seen.borrow(), vec![true, false]);

    assert!(h.delegate.remove_in_reorder_mode_observer(id));
    assert!(!h.delegate.remove_in_reorder_mode_observer(id));
    h.start(ViewKey::Tab(1), ReorderType::DragWithinStrip);
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn test_compositor_buttons_hidden_while_reordering() {
    let mut h = Harness::new(plain(&[1, 2]));
    h.start(ViewKey::Tab(2), ReorderType::DragWithinStrip);
    assert_eq!(h.updates.buttons_visible, Some(false));
    assert_eq!(h.delegate.interacting_view(), Some(ViewKey::Tab(2)));

    h.stop();
    assert_eq!(h.updates.buttons_visible, Some(true));
    assert_eq!(h.delegate.interacting_view(), None);
    assert_eq!(h.delegate.active_strategy(), None);
}

#[test]
fn test_unknown_view_does_not_enter_reorder_mode() {
    let mut h = Harness::new(plain(&[1, 2]));
    h.start_at(ViewKey::Tab(42), 10.0, ReorderType::DragWithinStrip);
    assert!(!h.delegate.in_reorder_mode());
    assert_eq!(h.updates.buttons_visible, None);
}

#[test]
fn test_keyboard_reorder_ignored_during_drag() {
    let mut h = Harness::new(plain(&[1, 2, 3]));
    h.start(ViewKey::Tab(1), ReorderType::DragWithinStrip);
    let moved = h.run(|delegate, env| delegate.reorder_view_in_direction(env, ViewKey::Tab(3), false));
    assert!(!moved);
    assert_eq!(h.ids(), vec![1, 2, 3]);
}

// ──────────────────────────────────────────
// Edge auto-scroll
// ──────────────────────────────────────────

#[test]
fn test_auto_scroll_in_end_gutter() {
    let mut h = scrolling_strip();
    h.start(ViewKey::Tab(1), ReorderType::DragWithinStrip);
    h.drag(80.0);
    assert!(approx_eq(h.draw_x(ViewKey::Tab(1)), 80.0));

    // The first frame only records the time.
    tick(&mut h, 1000);
    assert!(approx_eq(h.scroller.scroll_offset(), 0.0));

    tick(&mut h, 1016);
    // 1000 px/s * (130 - 112.6) / -69 * 0.016 s
    assert!(approx_eq(h.scroller.scroll_offset(), -4.03));
    // The dragged tab stays under the pointer while the strip scrolls.
    assert!(approx_eq(h.draw_x(ViewKey::Tab(1)), 80.0));
    assert_eq!(h.ids()[..3], [2, 3, 1]);
    assert_eq!(h.updates.refreshes, 1);
}

#[test]
fn test_no_auto_scroll_toward_unvisited_side() {
    let mut h = scrolling_strip();
    // Tab 7 rests at 132, already inside the end gutter.
    h.start(ViewKey::Tab(7), ReorderType::DragWithinStrip);
    h.drag(-3.0);

    tick(&mut h, 1000);
    tick(&mut h, 1016);
    assert!(approx_eq(h.scroller.scroll_offset(), 0.0));
}

#[test]
fn test_unsettled_scroller_leaves_offset_alone() {
    let mut h = scrolling_strip();
    h.start(ViewKey::Tab(1), ReorderType::DragWithinStrip);
    h.drag(80.0);
    let offset = h.offset(ViewKey::Tab(1));
    h.scroller.set_finished(false);

    tick(&mut h, 1000);
    tick(&mut h, 1016);
    assert!(h.scroller.scroll_offset() < 0.0);
    assert!(approx_eq(h.offset(ViewKey::Tab(1)), offset));
    assert!(approx_eq(h.draw_x(ViewKey::Tab(1)), 80.0 + h.scroller.scroll_offset()));
}

#[test]
fn test_auto_scroll_in_rtl_follows_screen_side() {
    let ids: Vec<TabId> = (1..=20).collect();
    let content = 20.0 * 22.0 + 28.0;
    let metrics = StripMetrics {
        strip_width: 200.0,
        ..rtl_metrics()
    };
    let mut h = Harness::with_metrics(plain(&ids), metrics, StripScroller::for_content(content, 200.0));
    assert!(approx_eq(h.draw_x(ViewKey::Tab(1)), 150.0));

    // Tab 1 starts in the right gutter, but only a leftward move was seen.
    h.start(ViewKey::Tab(1), ReorderType::DragWithinStrip);
    h.drag(-80.0);
    assert!(approx_eq(h.draw_x(ViewKey::Tab(1)), 70.0));

    tick(&mut h, 1000);
    tick(&mut h, 1016);
    // Leftward is toward the end in RTL, so the offset goes negative.
    assert!(approx_eq(h.scroller.scroll_offset(), -4.03));
    assert!(approx_eq(h.draw_x(ViewKey::Tab(1)), 70.0));
    assert_eq!(h.ids()[..3], [2, 3, 1]);
}
