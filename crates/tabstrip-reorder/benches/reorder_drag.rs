//! Benchmark: dragging across a strip.
//!
//! Drags the first tab from one end of the strip to the other in 4 px steps,
//! for strips of 20, 100 and 500 tabs, with and without groups. Every step
//! re-runs the threshold checks, and every swap re-syncs the views.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tabstrip_core::{
    AnimationHost, GroupId, ReorderType, StripMetrics, StripUpdateDelegate, StripViews, Tab, TabGroup, TabId,
    Transition, TransitionId, Vec2, ViewKey,
};
use tabstrip_model::{StripScroller, TabStripModel};
use tabstrip_reorder::{ReorderDelegate, ReorderEnv, ReorderSettings};

// ── Helpers ──

/// Settles every transition as soon as it starts.
struct InstantHost;

impl AnimationHost for InstantHost {
    fn finish_animations(&mut self, _strip: &mut StripViews) {}

    fn start_animations(&mut self, strip: &mut StripViews, transition: Transition) -> TransitionId {
        transition.finish(strip);
        0
    }
}

struct NoUpdates;

impl StripUpdateDelegate for NoUpdates {
    fn resize_tab_strip(&mut self, _animate: bool, _tab_to_animate: Option<TabId>, _animate_added: bool) {}
    fn refresh(&mut self) {}
    fn set_compositor_buttons_visible(&mut self, _visible: bool) {}
}

/// `n` tabs; with `grouped`, every run of four tabs after the first forms a group.
fn build_model(n: i32, grouped: bool) -> TabStripModel {
    let mut groups = Vec::new();
    let tabs = (1..=n)
        .map(|id| {
            let mut tab = Tab::new(id);
            if grouped && id > 1 {
                let group = GroupId(((id - 2) / 4) as u64 + 1);
                if (id - 2) % 4 == 0 {
                    groups.push(TabGroup {
                        id: group,
                        root_id: id,
                        color: 0,
                        collapsed: false,
                        shared: false,
                    });
                }
                tab.group = Some(group);
            }
            tab
        })
        .collect();
    TabStripModel::with_tabs(tabs, groups)
}

fn drag_across(n: i32, grouped: bool) -> usize {
    let mut model = build_model(n, grouped);
    let metrics = StripMetrics::default();
    let mut strip = StripViews::new(metrics);
    strip.sync_with_model(&model);
    let mut scroller = StripScroller::default();
    let mut host = InstantHost;
    let mut updates = NoUpdates;
    let mut delegate = ReorderDelegate::new(ReorderSettings::default(), 1);

    let mut env = ReorderEnv::new(&mut model, &mut strip, &mut scroller, &mut host, &mut updates);
    let mut x = metrics.tab_width / 2.0;
    delegate.start_reorder_mode(&mut env, ViewKey::Tab(1), Vec2::new(x, 0.0), ReorderType::DragWithinStrip);
    let end = metrics.effective_tab_width(false) * n as f32 * 1.5;
    while x < end {
        x += 4.0;
        delegate.update_reorder_position(&mut env, x, 4.0, ReorderType::DragWithinStrip);
    }
    delegate.stop_reorder_mode(&mut env);
    env.strip.order().len()
}

// ── Benchmarks ──

fn bench_drag_across(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_across_strip");
    for &n in &[20, 100, 500] {
        group.bench_with_input(BenchmarkId::new("plain", n), &n, |b, &n| {
            b.iter(|| black_box(drag_across(n, false)));
        });
        group.bench_with_input(BenchmarkId::new("grouped", n), &n, |b, &n| {
            b.iter(|| black_box(drag_across(n, true)));
        });
    }
    group.finish();
}

fn bench_sync_views(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync_with_model");
    for &n in &[20, 100, 500] {
        let model = build_model(n, true);
        let mut strip = StripViews::new(StripMetrics::default());
        group.bench_with_input(BenchmarkId::new("grouped", n), &n, |b, _| {
            b.iter(|| {
                strip.sync_with_model(&model);
                black_box(strip.order().len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_drag_across, bench_sync_views);
criterion_main!(benches);
