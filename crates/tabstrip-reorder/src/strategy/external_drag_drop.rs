use tabstrip_core::{AnimatedProperty, Animation, DragSession, MergeNotify, ReorderType, TabId, Transition, ViewKey};

use super::base::{self, UpdateOutcome};
use crate::env::ReorderEnv;
use crate::settings::ReorderSettings;
use crate::utils;

/// Where an incoming drop would land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropTarget {
    BeforeFirst,
    After(ViewKey),
}

/// Previews a drop from another window by opening a gap after the hovered
/// view.
#[derive(Debug)]
pub(crate) struct ExternalDragDrop {
    target: Option<DropTarget>,
    edge_start_margin: f32,
    off_strip: bool,
}

impl ExternalDragDrop {
    pub(crate) fn start(env: &mut ReorderEnv<'_>, settings: &ReorderSettings, start_x: f32) -> Self {
        env.finish_animations_and_push_tab_updates();
        base::set_edge_margins_for_reorder(env, settings, true);
        let mut strategy = Self {
            target: None,
            edge_start_margin: env.scroll.reorder_start_margin(),
            off_strip: false,
        };
        strategy.update(env, settings, start_x, ReorderType::DragOntoStrip);
        strategy
    }

    /// The view the gap follows, if any.
    pub(crate) fn hovered_view(&self) -> Option<ViewKey> {
        match self.target {
            Some(DropTarget::After(key)) => Some(key),
            _ => None,
        }
    }

    /// The pointer left the strip; no gap is shown until it comes back.
    pub(crate) fn is_off_strip(&self) -> bool {
        self.off_strip
    }

    pub(crate) fn update(
        &mut self,
        env: &mut ReorderEnv<'_>,
        settings: &ReorderSettings,
        end_x: f32,
        reorder_type: ReorderType,
    ) -> UpdateOutcome {
        if reorder_type == ReorderType::DragOutOfStrip {
            self.off_strip = true;
            if let Some(old) = self.target.take() {
                let mut transition = Transition::new();
                self.close_gap(env, settings, old, &mut transition);
                env.start_transition(transition);
                log::trace!("external drag left the strip, gap closed");
            }
            return UpdateOutcome::Continue;
        }
        self.off_strip = false;

        let metrics = *env.strip.metrics();
        let x = utils::adjust_x_for_tab_drop(end_x, metrics.tab_width, metrics.rtl);
        let target = match env.strip.view_at_x(x) {
            Some(key) => DropTarget::After(key),
            None => DropTarget::BeforeFirst,
        };
        if self.target == Some(target) {
            return UpdateOutcome::Continue;
        }

        let gap = metrics.half_tab_width(false);
        let mut transition = Transition::new();
        if let Some(old) = self.target {
            self.close_gap(env, settings, old, &mut transition);
        }
        match target {
            DropTarget::BeforeFirst => env.set_reorder_start_margin(gap),
            DropTarget::After(key) => {
                let current = env.strip.view(key).map_or(0.0, |v| v.trailing_margin);
                transition.push(Animation::new(
                    key,
                    AnimatedProperty::TrailingMargin,
                    current,
                    gap,
                    settings.anim_tab_move_ms,
                ));
            }
        }
        log::trace!("external drop target now {:?}", target);
        self.target = Some(target);
        env.start_transition(transition);
        UpdateOutcome::Continue
    }

    fn close_gap(&self, env: &mut ReorderEnv<'_>, settings: &ReorderSettings, target: DropTarget, transition: &mut Transition) {
        match target {
            DropTarget::BeforeFirst => env.set_reorder_start_margin(self.edge_start_margin),
            DropTarget::After(key) => {
                let Some(current) = env.strip.view(key).map(|v| v.trailing_margin) else {
                    return;
                };
                let is_last = env.strip.tabs().last().is_some_and(|t| ViewKey::Tab(t.id) == key);
                let resting = if is_last {
                    utils::edge_margin(env.strip.metrics(), base::k(settings))
                } else {
                    0.0
                };
                transition.push(Animation::new(
                    key,
                    AnimatedProperty::TrailingMargin,
                    current,
                    resting,
                    settings.anim_tab_move_ms,
                ));
            }
        }
    }

    /// Called after the host inserted the dropped tabs at `drop_index`.
    /// Tabs dropped inside an expanded group join it. Returns whether a merge
    /// happened.
    pub(crate) fn handle_drop(&self, env: &mut ReorderEnv<'_>, session: &DragSession, drop_index: usize) -> bool {
        session.mark_dropped();
        let Some(key) = self.hovered_view() else {
            return false;
        };
        if session.is_group_drag() {
            return false;
        }
        let model = env.model();
        let strip_incognito = (0..model.count())
            .filter_map(|i| model.tab_at(i))
            .find(|t| !session.tab_ids().contains(&t.id))
            .map(|t| t.incognito);
        if strip_incognito.is_some_and(|incognito| incognito != session.is_incognito()) {
            log::warn!("ignoring drop of {:?} across profiles", session.tab_ids());
            return false;
        }

        let group = match key {
            ViewKey::Tab(id) => env.strip.tab(id).and_then(|t| t.group),
            ViewKey::GroupTitle(group) => Some(group),
        };
        let Some(group) = group else {
            return false;
        };
        if env.filter.is_group_collapsed(group) {
            return false;
        }
        let members = env.filter.tabs_in_group(group);
        let Some(&anchor) = members.first() else {
            return false;
        };
        let incoming: Vec<TabId> = session
            .tab_ids()
            .iter()
            .copied()
            .filter(|&id| env.model().index_of(id).is_some() && !members.contains(&id))
            .collect();
        if incoming.is_empty() {
            return false;
        }
        let index_in_group = members
            .iter()
            .filter(|&&m| env.model().index_of(m).is_some_and(|i| i < drop_index))
            .count();
        env.filter
            .merge_list_of_tabs_to_group(&incoming, anchor, Some(index_in_group), MergeNotify::Silent);
        env.rebuild();
        log::debug!("dropped {:?} into {:?} at {}", incoming, group, index_in_group);
        true
    }

    pub(crate) fn stop(self, env: &mut ReorderEnv<'_>, settings: &ReorderSettings) {
        let mut transition = Transition::new();
        base::clear_edge_margins(env, settings, &mut transition);
        env.start_transition(transition);
    }
}
