// Drag that may leave the strip through the platform drag-and-drop system.
// While the pointer stays on the strip an ordinary in-strip reorder runs
// underneath; leaving the strip lifts the dragged views out of the layout
// and coming back puts them where they were.

use std::rc::Rc;

use tabstrip_core::{
    DragKind, DragSession, ReorderType, TabDragSource, TabId, TabModel, UngroupOutcome, Vec2, ViewKey,
    WindowId,
};

use super::base::UpdateOutcome;
use super::InStripStrategy;
use crate::env::ReorderEnv;
use crate::settings::ReorderSettings;

/// Views and tabs lifted by the drag.
#[derive(Debug, Default)]
pub(crate) struct DragData {
    pub(crate) views_being_dragged: Vec<ViewKey>,
    pub(crate) tabs_being_dragged: Vec<TabId>,
    pub(crate) selected_tab_to_reselect: Option<TabId>,
}

fn drag_kind(strategy: &InStripStrategy) -> DragKind {
    match strategy {
        InStripStrategy::Tab(_) => DragKind::Tab,
        InStripStrategy::MultiTab(_) => DragKind::MultiTab,
        InStripStrategy::Group(s) => DragKind::Group(s.group()),
    }
}

fn start_view_drag_action(
    kind: DragKind,
    source: &mut dyn TabDragSource,
    session: &DragSession,
    start_point: Vec2,
) -> bool {
    match kind {
        DragKind::Tab => source.start_tab_drag_action(session, start_point),
        DragKind::MultiTab => source.start_multi_tab_drag_action(session, start_point),
        DragKind::Group(_) => source.start_group_drag_action(session, start_point),
    }
}

/// The tab closest to `index` that is not being dragged.
fn nearest_remaining_index(model: &dyn TabModel, dragged: &[TabId], index: usize) -> Option<usize> {
    (0..model.count())
        .filter(|&i| model.tab_at(i).is_some_and(|t| !dragged.contains(&t.id)))
        .min_by_key(|&i| i.abs_diff(index))
}

#[derive(Debug)]
pub(crate) struct SourceDragDrop {
    in_strip: InStripStrategy,
    data: DragData,
    session: Option<Rc<DragSession>>,
    saved_offsets: Vec<(ViewKey, f32)>,
    off_strip: bool,
    /// Pointer distance from the interacting view's leading screen edge.
    grab_offset: f32,
}

impl SourceDragDrop {
    pub(crate) fn start(
        env: &mut ReorderEnv<'_>,
        settings: &ReorderSettings,
        window: WindowId,
        interacting: ViewKey,
        start_point: Vec2,
    ) -> Option<Self> {
        let in_strip = InStripStrategy::start(env, settings, interacting)?;
        let views_being_dragged = in_strip.dragged_views(env);
        let tabs_being_dragged: Vec<TabId> = views_being_dragged.iter().filter_map(|k| k.tab_id()).collect();
        let primary = in_strip.primary_tab(env)?;
        let kind = drag_kind(&in_strip);
        let grab_offset = env
            .strip
            .view(in_strip.interacting_view())
            .map_or(0.0, |v| start_point.x - v.draw_x);
        let incognito = env.model().tab_by_id(primary).is_some_and(|t| t.incognito);

        let session = DragSession::new(window, kind, primary, tabs_being_dragged.clone(), incognito);
        let started = match env.drag_source.as_mut() {
            Some(source) => start_view_drag_action(kind, &mut **source, &session, start_point),
            None => false,
        };
        let session = if started {
            env.updates.perform_haptic_feedback();
            log::debug!("native drag started for {:?}", tabs_being_dragged);
            Some(session)
        } else {
            log::debug!("native drag declined, reordering within the strip");
            None
        };

        Some(Self {
            in_strip,
            data: DragData {
                views_being_dragged,
                tabs_being_dragged,
                selected_tab_to_reselect: None,
            },
            session,
            saved_offsets: Vec::new(),
            off_strip: false,
            grab_offset,
        })
    }

    pub(crate) fn in_strip(&self) -> &InStripStrategy {
        &self.in_strip
    }

    pub(crate) fn session(&self) -> Option<&Rc<DragSession>> {
        self.session.as_ref()
    }

    pub(crate) fn is_off_strip(&self) -> bool {
        self.off_strip
    }

    pub(crate) fn update(
        &mut self,
        env: &mut ReorderEnv<'_>,
        settings: &ReorderSettings,
        end_x: f32,
        delta_x: f32,
        reorder_type: ReorderType,
    ) -> UpdateOutcome {
        match reorder_type {
            ReorderType::DragOutOfStrip => self.drag_out_of_strip(env),
            ReorderType::DragOntoStrip => self.drag_onto_strip(env, settings, end_x),
            ReorderType::DragWithinStrip | ReorderType::StartDragDrop => {
                if self.off_strip {
                    UpdateOutcome::Continue
                } else {
                    self.in_strip.update(env, settings, delta_x)
                }
            }
        }
    }

    fn drag_out_of_strip(&mut self, env: &mut ReorderEnv<'_>) -> UpdateOutcome {
        let Some(session) = self.session.as_ref() else {
            return UpdateOutcome::Continue;
        };
        if self.off_strip {
            return UpdateOutcome::Continue;
        }
        self.off_strip = true;
        session.set_dragged_off_strip(true);
        env.finish_animations();

        let strip_height = env.strip.metrics().strip_height;
        self.saved_offsets.clear();
        for &key in &self.data.views_being_dragged {
            if let Some(state) = env.strip.view_mut(key) {
                self.saved_offsets.push((key, state.offset_x));
                state.dragged_off_strip = true;
                state.offset_y = strip_height;
            }
        }

        let model = env.filter.tab_model_mut();
        if let Some(selected) = model.selected_tab_id() {
            if self.data.tabs_being_dragged.contains(&selected) {
                let index = model.index().unwrap_or_default();
                if let Some(next) = nearest_remaining_index(&*model, &self.data.tabs_being_dragged, index) {
                    model.set_index(next);
                    self.data.selected_tab_to_reselect = Some(selected);
                }
            }
        }

        env.rebuild();
        env.updates.resize_tab_strip(true, None, false);
        log::debug!("dragged {:?} off the strip", self.data.tabs_being_dragged);

        // A lone grouped tab leaving the strip leaves its group behind.
        if let &[tab] = self.data.tabs_being_dragged.as_slice() {
            if let Some(group) = env.filter.group_of(tab) {
                let sole_member = env.filter.tabs_in_group(group).len() == 1;
                let shared = env.filter.group(group).is_some_and(|g| g.shared);
                let skip = env.filter.action_confirmation_manager().will_skip_ungroup_tab_attempt();
                if sole_member && (shared || !skip) {
                    match env.filter.ungroup_tabs(&[tab], false, true) {
                        UngroupOutcome::AwaitingConfirmation(kind) => {
                            return UpdateOutcome::AwaitingConfirmation {
                                group,
                                kind,
                                exit_reorder_mode: false,
                            };
                        }
                        UngroupOutcome::Ungrouped => env.rebuild(),
                        UngroupOutcome::Noop => {}
                    }
                }
            }
        }
        UpdateOutcome::Continue
    }

    /// Put the dragged views back and resume the in-strip reorder with the
    /// interacting view under the pointer at `end_x`.
    fn drag_onto_strip(&mut self, env: &mut ReorderEnv<'_>, settings: &ReorderSettings, end_x: f32) -> UpdateOutcome {
        if !self.off_strip {
            return UpdateOutcome::Continue;
        }
        self.off_strip = false;
        if let Some(session) = &self.session {
            session.set_dragged_off_strip(false);
        }
        self.restore_views(env);
        if let Some(selected) = self.data.selected_tab_to_reselect.take() {
            let model = env.filter.tab_model_mut();
            if let Some(index) = model.index_of(selected) {
                model.set_index(index);
            }
        }
        env.rebuild();
        env.updates.resize_tab_strip(true, None, false);

        let Some(view) = env.strip.view(self.in_strip.interacting_view()) else {
            return UpdateOutcome::Continue;
        };
        let jump = end_x - self.grab_offset - view.draw_x;
        log::debug!("back on the strip at {}, moving {:?} by {}", end_x, self.data.tabs_being_dragged, jump);
        self.in_strip.update(env, settings, jump)
    }

    fn restore_views(&mut self, env: &mut ReorderEnv<'_>) {
        for &key in &self.data.views_being_dragged {
            if let Some(state) = env.strip.view_mut(key) {
                state.dragged_off_strip = false;
                state.offset_y = 0.0;
            }
        }
        for (key, offset) in self.saved_offsets.drain(..) {
            if let Some(state) = env.strip.view_mut(key) {
                state.offset_x = offset;
            }
        }
        env.relayout();
    }

    pub(crate) fn stop(mut self, env: &mut ReorderEnv<'_>, settings: &ReorderSettings) {
        let dropped_elsewhere = self.session.as_ref().is_some_and(|s| s.is_dropped());
        if self.off_strip && !dropped_elsewhere {
            self.restore_views(env);
            if let Some(selected) = self.data.selected_tab_to_reselect.take() {
                let model = env.filter.tab_model_mut();
                if let Some(index) = model.index_of(selected) {
                    model.set_index(index);
                }
            }
            env.rebuild();
            env.updates.resize_tab_strip(true, None, false);
        }
        self.in_strip.stop(env, settings);
    }
}
