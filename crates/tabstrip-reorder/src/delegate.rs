// Entry point for the strip. Owns reorder-mode state, picks a strategy for
// each gesture and drives edge auto-scroll.

use std::rc::Rc;

use tabstrip_core::{ConfirmationKind, DragSession, GroupId, ReorderType, Vec2, ViewKey, WindowId};

use crate::env::ReorderEnv;
use crate::settings::ReorderSettings;
use crate::strategy::{
    ActiveStrategy, GroupReorder, MultiTabReorder, ReorderStep, StrategyKind, TabReorder, UpdateOutcome,
};
use crate::utils;

pub type ObserverId = u64;

/// Drag directions seen since reorder started. Auto-scroll only runs toward
/// a side the user already moved to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ScrollDirections {
    left: bool,
    right: bool,
}

pub struct ReorderDelegate {
    settings: ReorderSettings,
    window: WindowId,
    active: Option<ActiveStrategy>,
    observers: Vec<(ObserverId, Box<dyn FnMut(bool)>)>,
    next_observer_id: ObserverId,
    last_reorder_x: f32,
    last_reorder_scroll_time: Option<u64>,
    scroll_directions: ScrollDirections,
    group_to_hide: Option<GroupId>,
}

impl ReorderDelegate {
    pub fn new(settings: ReorderSettings, window: WindowId) -> Self {
        Self {
            settings,
            window,
            active: None,
            observers: Vec::new(),
            next_observer_id: 1,
            last_reorder_x: 0.0,
            last_reorder_scroll_time: None,
            scroll_directions: ScrollDirections::default(),
            group_to_hide: None,
        }
    }

    pub fn settings(&self) -> &ReorderSettings {
        &self.settings
    }

    pub fn in_reorder_mode(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_strategy(&self) -> Option<StrategyKind> {
        self.active.as_ref().map(ActiveStrategy::kind)
    }

    /// The view under the pointer: the dragged tab, the dragged group's
    /// title, or the view an external drop would follow.
    pub fn interacting_view(&self) -> Option<ViewKey> {
        self.active.as_ref().and_then(ActiveStrategy::interacting_view)
    }

    pub fn last_reorder_x(&self) -> f32 {
        self.last_reorder_x
    }

    /// Group whose title is hidden while an ungroup dialog is showing.
    pub fn group_to_hide(&self) -> Option<GroupId> {
        self.group_to_hide
    }

    /// Session of the native drag started by this strip, if one is running.
    pub fn drag_session(&self) -> Option<Rc<DragSession>> {
        match &self.active {
            Some(ActiveStrategy::SourceDragDrop(s)) => s.session().cloned(),
            _ => None,
        }
    }

    // ──────────────────────────────────────────────
    // Observers
    // ──────────────────────────────────────────────

    pub fn add_in_reorder_mode_observer(&mut self, observer: impl FnMut(bool) + 'static) -> ObserverId {
        let id = self.next_observer_id;
        self.next_observer_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn remove_in_reorder_mode_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    fn notify_observers(&mut self, in_reorder_mode: bool) {
        for (_, observer) in &mut self.observers {
            observer(in_reorder_mode);
        }
    }

    // ──────────────────────────────────────────────
    // Reorder mode
    // ──────────────────────────────────────────────

    pub fn start_reorder_mode(
        &mut self,
        env: &mut ReorderEnv<'_>,
        interacting: ViewKey,
        start_point: Vec2,
        reorder_type: ReorderType,
    ) {
        debug_assert!(self.active.is_none(), "reorder mode already active");
        if self.active.is_some() {
            log::warn!("start_reorder_mode called while already reordering");
            return;
        }

        let Some(strategy) = ActiveStrategy::start(
            env,
            &self.settings,
            self.window,
            interacting,
            start_point,
            reorder_type,
        ) else {
            log::warn!("no view {:?} to reorder", interacting);
            return;
        };
        log::debug!("reorder mode started: {:?} for {:?}", strategy.kind(), interacting);
        self.active = Some(strategy);
        self.last_reorder_scroll_time = None;
        self.scroll_directions = ScrollDirections::default();
        self.last_reorder_x = start_point.x;
        env.updates.set_compositor_buttons_visible(false);
        self.notify_observers(true);
    }

    pub fn update_reorder_position(
        &mut self,
        env: &mut ReorderEnv<'_>,
        end_x: f32,
        delta_x: f32,
        reorder_type: ReorderType,
    ) {
        debug_assert!(self.active.is_some(), "update without an active strategy");
        let Some(active) = self.active.as_mut() else {
            log::warn!("update_reorder_position called outside reorder mode");
            return;
        };

        // Small moves accumulate until they reach a whole pixel.
        let accumulated = end_x - self.last_reorder_x;
        match reorder_type {
            ReorderType::DragWithinStrip => {
                if accumulated.abs() < 1.0 {
                    return;
                }
                if delta_x >= 1.0 {
                    self.scroll_directions.right = true;
                } else if delta_x <= -1.0 {
                    self.scroll_directions.left = true;
                }
                self.last_reorder_x = end_x;
            }
            ReorderType::DragOntoStrip => self.last_reorder_x = end_x,
            ReorderType::StartDragDrop | ReorderType::DragOutOfStrip => {}
        }

        let outcome = active.update(env, &self.settings, end_x, accumulated, reorder_type);
        self.handle_outcome(env, outcome);
    }

    /// Scroll the strip while the dragged view sits in an edge gutter.
    pub fn update_reorder_position_auto_scroll(
        &mut self,
        env: &mut ReorderEnv<'_>,
        time_ms: u64,
        strip_width: f32,
        left_margin: f32,
        right_margin: f32,
    ) {
        debug_assert!(self.active.is_some(), "auto-scroll without an active strategy");
        let Some(span) = self.active.as_ref().map(|a| a.scroll_span(env, self.last_reorder_x)) else {
            return;
        };
        let delta = self.compute_scroll_offset_delta(span, time_ms, strip_width, left_margin, right_margin, env.is_rtl());
        if delta == 0.0 {
            return;
        }

        let applied = env.scroll.set_scroll_offset(env.scroll.scroll_offset() + delta);
        env.relayout();
        if env.scroll.is_finished() {
            let drag_delta = utils::flip_sign_if(-applied, env.is_rtl());
            if let Some(active) = self.active.as_mut() {
                let outcome = active.update(
                    env,
                    &self.settings,
                    self.last_reorder_x,
                    drag_delta,
                    ReorderType::DragWithinStrip,
                );
                self.handle_outcome(env, outcome);
            }
        }
        env.updates.refresh();
    }

    pub fn stop_reorder_mode(&mut self, env: &mut ReorderEnv<'_>) {
        debug_assert!(self.active.is_some(), "stop without an active strategy");
        let Some(active) = self.active.take() else {
            log::warn!("stop_reorder_mode called outside reorder mode");
            return;
        };
        log::debug!("reorder mode stopped: {:?}", active.kind());
        active.stop(env, &self.settings);
        self.scroll_directions = ScrollDirections::default();
        self.last_reorder_scroll_time = None;
        env.updates.set_compositor_buttons_visible(true);
        self.notify_observers(false);
    }

    /// Keyboard reorder: move `key` one step without entering reorder mode.
    /// A tab in a multi-selection moves the whole selection. Returns whether
    /// the model changed.
    pub fn reorder_view_in_direction(&mut self, env: &mut ReorderEnv<'_>, key: ViewKey, toward_end: bool) -> bool {
        if self.active.is_some() {
            log::warn!("keyboard reorder ignored during a drag");
            return false;
        }
        let step = match key {
            ViewKey::Tab(id) => {
                let model = env.model();
                if model.is_multi_selected(id) && model.multi_selected_tabs().len() > 1 {
                    MultiTabReorder::reorder_in_direction(env, &self.settings, id, toward_end)
                } else {
                    TabReorder::reorder_in_direction(env, &self.settings, id, toward_end)
                }
            }
            ViewKey::GroupTitle(group) => GroupReorder::reorder_in_direction(env, &self.settings, group, toward_end),
        };
        match step {
            ReorderStep::Reordered => {
                env.updates.refresh();
                true
            }
            ReorderStep::Unchanged => false,
            ReorderStep::Paused { group, kind } => {
                self.hide_group_for_confirmation(env, group, kind);
                false
            }
        }
    }

    /// Finish a drop from another window. The host has already inserted the
    /// dropped tabs at `drop_index`.
    pub fn handle_tab_drop_for_external_view(
        &mut self,
        env: &mut ReorderEnv<'_>,
        session: &DragSession,
        drop_index: usize,
    ) -> bool {
        match &self.active {
            Some(ActiveStrategy::ExternalDragDrop(strategy)) => strategy.handle_drop(env, session, drop_index),
            _ => {
                debug_assert!(false, "external drop without an external drag in progress");
                log::warn!("external drop ignored: no external drag in progress");
                false
            }
        }
    }

    /// The host resolved the ungroup dialog. Call after the model applied
    /// (or dropped) the pending ungroup.
    pub fn on_ungroup_confirmation_result(&mut self, env: &mut ReorderEnv<'_>, accepted: bool) {
        let Some(group) = self.group_to_hide.take() else {
            return;
        };
        env.rebuild();
        if !accepted {
            if let Some(title) = env.strip.title_mut(group) {
                title.state.visible = true;
            }
        }
        log::debug!("ungroup confirmation for {:?}: accepted={}", group, accepted);
        env.updates.refresh();
    }

    // ──────────────────────────────────────────────
    // Internals
    // ──────────────────────────────────────────────

    fn handle_outcome(&mut self, env: &mut ReorderEnv<'_>, outcome: UpdateOutcome) {
        let UpdateOutcome::AwaitingConfirmation {
            group,
            kind,
            exit_reorder_mode,
        } = outcome
        else {
            return;
        };
        if exit_reorder_mode && self.active.is_some() {
            self.stop_reorder_mode(env);
        }
        self.hide_group_for_confirmation(env, group, kind);
    }

    fn hide_group_for_confirmation(&mut self, env: &mut ReorderEnv<'_>, group: GroupId, kind: ConfirmationKind) {
        if kind != ConfirmationKind::Sync {
            return;
        }
        self.group_to_hide = Some(group);
        if let Some(title) = env.strip.title_mut(group) {
            title.state.visible = false;
        }
        env.updates.refresh();
    }

    /// Scroll offset change for this frame. Speed ramps across each gutter
    /// and scales with the time since the previous frame.
    fn compute_scroll_offset_delta(
        &mut self,
        span: Option<(f32, f32)>,
        time_ms: u64,
        strip_width: f32,
        left_margin: f32,
        right_margin: f32,
        rtl: bool,
    ) -> f32 {
        let delta_sec = self
            .last_reorder_scroll_time
            .map_or(0.0, |last| time_ms.saturating_sub(last) as f32 / 1000.0);
        self.last_reorder_scroll_time = Some(time_ms);

        let edge = self.settings.edge_scroll;
        let drag_range = edge.start_max - edge.start_min;
        let left_min_x = edge.start_min + left_margin;
        let left_max_x = edge.start_max + left_margin;
        let right_min_x = strip_width - left_margin - right_margin - edge.start_min;
        let right_max_x = strip_width - left_margin - right_margin - edge.start_max;

        let mut ratio = 0.0;
        if let Some((x, width)) = span {
            if self.scroll_directions.left && x < left_min_x {
                ratio = -(left_min_x - x.max(left_max_x)) / drag_range;
            } else if self.scroll_directions.right && x + width > right_min_x {
                ratio = ((x + width).min(right_max_x) - right_min_x) / drag_range;
            }
        }
        let ratio = utils::flip_sign_if(ratio, rtl);
        if ratio == 0.0 {
            self.last_reorder_scroll_time = None;
            return 0.0;
        }
        edge.max_speed * ratio * delta_sec
    }
}
