use tabstrip_core::{
    AnimationHost, DragKind, DragSession, GroupId, ReorderType, StripMetrics, StripUpdateDelegate, StripViews,
    Tab, TabDragSource, TabGroup, TabId, Transition, TransitionId, Vec2, ViewKey,
};
use tabstrip_model::{StripScroller, TabStripModel};

use crate::{ReorderDelegate, ReorderEnv, ReorderSettings};

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}

// ──────────────────────────────────────────
// Model builders
// ──────────────────────────────────────────

pub fn grouped(id: TabId, group: u64) -> Tab {
    Tab {
        group: Some(GroupId(group)),
        ..Tab::new(id)
    }
}

pub fn pinned(id: TabId) -> Tab {
    Tab {
        pinned: true,
        ..Tab::new(id)
    }
}

pub fn group(id: u64, root: TabId) -> TabGroup {
    TabGroup {
        id: GroupId(id),
        root_id: root,
        color: 0,
        collapsed: false,
        shared: false,
    }
}

pub fn plain(ids: &[TabId]) -> TabStripModel {
    TabStripModel::with_tabs(ids.iter().map(|&id| Tab::new(id)).collect(), Vec::new())
}

/// Tab width 50 and overlap 28: every unpinned tab advances 22 px and the
/// tab swap threshold is 11.66 px.
pub fn metrics() -> StripMetrics {
    StripMetrics {
        tab_width: 50.0,
        pinned_tab_width: 40.0,
        strip_width: 1000.0,
        ..StripMetrics::default()
    }
}

/// Right-to-left variant of [`metrics`]: the first tab is drawn at 950.
pub fn rtl_metrics() -> StripMetrics {
    StripMetrics {
        rtl: true,
        ..metrics()
    }
}

// ──────────────────────────────────────────
// Collaborator fakes
// ──────────────────────────────────────────

/// Applies start values immediately and holds transitions until flushed.
#[derive(Default)]
pub struct RecordingHost {
    pub started: Vec<Transition>,
    pending: Vec<Transition>,
    next_id: TransitionId,
}

impl AnimationHost for RecordingHost {
    fn finish_animations(&mut self, strip: &mut StripViews) {
        for transition in self.pending.drain(..) {
            transition.finish(strip);
        }
    }

    fn start_animations(&mut self, strip: &mut StripViews, transition: Transition) -> TransitionId {
        transition.apply_start(strip);
        self.started.push(transition.clone());
        self.pending.push(transition);
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct RecordingUpdates {
    pub refreshes: usize,
    pub resizes: usize,
    pub haptics: usize,
    pub buttons_visible: Option<bool>,
}

impl StripUpdateDelegate for RecordingUpdates {
    fn resize_tab_strip(&mut self, _animate: bool, _tab_to_animate: Option<TabId>, _animate_added: bool) {
        self.resizes += 1;
    }

    fn refresh(&mut self) {
        self.refreshes += 1;
    }

    fn set_compositor_buttons_visible(&mut self, visible: bool) {
        self.buttons_visible = Some(visible);
    }

    fn perform_haptic_feedback(&mut self) {
        self.haptics += 1;
    }
}

pub struct ScriptedDragSource {
    pub accept: bool,
    pub started: Vec<(DragKind, Vec<TabId>)>,
}

impl ScriptedDragSource {
    fn record(&mut self, session: &DragSession) -> bool {
        self.started.push((session.kind(), session.tab_ids().to_vec()));
        self.accept
    }
}

impl TabDragSource for ScriptedDragSource {
    fn start_tab_drag_action(&mut self, session: &DragSession, _start_point: Vec2) -> bool {
        self.record(session)
    }

    fn start_group_drag_action(&mut self, session: &DragSession, _start_point: Vec2) -> bool {
        self.record(session)
    }

    fn start_multi_tab_drag_action(&mut self, session: &DragSession, _start_point: Vec2) -> bool {
        self.record(session)
    }
}

// ──────────────────────────────────────────
// Harness
// ──────────────────────────────────────────

pub struct Harness {
    pub model: TabStripModel,
    pub strip: StripViews,
    pub scroller: StripScroller,
    pub host: RecordingHost,
    pub updates: RecordingUpdates,
    pub source: ScriptedDragSource,
    pub drag_source_enabled: bool,
    pub delegate: ReorderDelegate,
    pub pointer_x: f32,
}

impl Harness {
    pub fn new(model: TabStripModel) -> Self {
        Self::with_metrics(model, metrics(), StripScroller::default())
    }

    pub fn with_metrics(model: TabStripModel, metrics: StripMetrics, scroller: StripScroller) -> Self {
        let mut strip = StripViews::new(metrics);
        strip.sync_with_model(&model);
        Self {
            model,
            strip,
            scroller,
            host: RecordingHost::default(),
            updates: RecordingUpdates::default(),
            source: ScriptedDragSource {
                accept: true,
                started: Vec::new(),
            },
            drag_source_enabled: false,
            delegate: ReorderDelegate::new(ReorderSettings::default(), 1),
            pointer_x: 0.0,
        }
    }

    pub fn with_drag_source(mut self, accept: bool) -> Self {
        self.drag_source_enabled = true;
        self.source.accept = accept;
        self
    }

    pub fn run<R>(&mut self, f: impl FnOnce(&mut ReorderDelegate, &mut ReorderEnv<'_>) -> R) -> R {
        let mut env = ReorderEnv::new(
            &mut self.model,
            &mut self.strip,
            &mut self.scroller,
            &mut self.host,
            &mut self.updates,
        );
        if self.drag_source_enabled {
            env = env.with_drag_source(&mut self.source);
        }
        f(&mut self.delegate, &mut env)
    }

    /// Press on the middle of `key` and start reordering.
    pub fn start(&mut self, key: ViewKey, reorder_type: ReorderType) {
        let view = self.strip.view(key).expect("view to drag");
        self.pointer_x = view.draw_x + view.width / 2.0;
        let point = Vec2::new(self.pointer_x, 0.0);
        self.run(|delegate, env| delegate.start_reorder_mode(env, key, point, reorder_type));
    }

    pub fn start_at(&mut self, key: ViewKey, x: f32, reorder_type: ReorderType) {
        self.pointer_x = x;
        self.run(|delegate, env| delegate.start_reorder_mode(env, key, Vec2::new(x, 0.0), reorder_type));
    }

    pub fn drag(&mut self, dx: f32) {
        self.pointer_x += dx;
        let end_x = self.pointer_x;
        self.run(|delegate, env| delegate.update_reorder_position(env, end_x, dx, ReorderType::DragWithinStrip));
    }

    pub fn send(&mut self, reorder_type: ReorderType) {
        let end_x = self.pointer_x;
        self.run(|delegate, env| delegate.update_reorder_position(env, end_x, 0.0, reorder_type));
    }

    pub fn move_pointer_to(&mut self, x: f32, reorder_type: ReorderType) {
        let dx = x - self.pointer_x;
        self.pointer_x = x;
        self.run(|delegate, env| delegate.update_reorder_position(env, x, dx, reorder_type));
    }

    pub fn stop(&mut self) {
        self.run(|delegate, env| delegate.stop_reorder_mode(env));
    }

    /// Run every pending transition to completion.
    pub fn settle(&mut self) {
        self.host.finish_animations(&mut self.strip);
    }

    pub fn ids(&self) -> Vec<TabId> {
        tabstrip_core::TabModel::tab_ids(&self.model)
    }

    pub fn draw_x(&self, key: ViewKey) -> f32 {
        self.strip.view(key).map_or(f32::NAN, |v| v.draw_x)
    }

    pub fn offset(&self, key: ViewKey) -> f32 {
        self.strip.offset_x(key)
    }
}
