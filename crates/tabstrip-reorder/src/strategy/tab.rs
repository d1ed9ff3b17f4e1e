use tabstrip_core::{MergeNotify, Tab, TabId, Transition, ViewKey};

use super::base::{self, ReorderStep, UpdateOutcome};
use crate::env::ReorderEnv;
use crate::settings::ReorderSettings;
use crate::utils;

/// Dragging a single tab.
#[derive(Debug)]
pub(crate) struct TabReorder {
    tab: TabId,
}

fn not_related_and_either_in_group(a: &Tab, b: &Tab) -> bool {
    (a.group.is_some() || b.group.is_some()) && a.group != b.group
}

/// Offset large enough to cross any threshold in the given direction.
pub(crate) fn unbounded_offset(toward_end: bool, rtl: bool) -> f32 {
    utils::flip_sign_if(f32::MAX, toward_end == rtl)
}

impl TabReorder {
    pub(crate) fn start(env: &mut ReorderEnv<'_>, settings: &ReorderSettings, tab: TabId) -> Option<Self> {
        let index = env.model().index_of(tab)?;
        let key = ViewKey::Tab(tab);
        base::set_foregrounded(env, &[key], true);
        env.filter.tab_model_mut().set_index(index);
        env.finish_animations_and_push_tab_updates();
        base::set_edge_margins_for_reorder(env, settings, false);

        let mut transition = Transition::new();
        base::update_tab_attach_state(env, settings, tab, false, &mut transition);
        env.start_transition(transition);
        env.updates.perform_haptic_feedback();
        log::debug!("tab reorder started for {} at {}", tab, index);
        Some(Self { tab })
    }

    pub(crate) fn tab(&self) -> TabId {
        self.tab
    }

    pub(crate) fn update(&mut self, env: &mut ReorderEnv<'_>, settings: &ReorderSettings, delta_x: f32) -> UpdateOutcome {
        let Some(index) = env.model().index_of(self.tab) else {
            return UpdateOutcome::Continue;
        };
        let key = ViewKey::Tab(self.tab);
        let old_rest = env.rest_x(key);
        let snapshot = base::snapshot_rest_positions(env);
        let mut offset = env.strip.offset_x(key) + delta_x;
        let mut transition = Transition::new();

        match reorder_if_threshold_reached(env, settings, self.tab, index, offset, &mut transition) {
            ReorderStep::Unchanged => {}
            ReorderStep::Reordered => {
                base::set_edge_margins_for_reorder(env, settings, false);
                offset = base::keep_rest_position(env, key, offset, old_rest);
                base::animate_displaced_views(env, settings, &snapshot, &[key], &mut transition);
            }
            paused @ ReorderStep::Paused { .. } => return paused.into_outcome(),
        }

        offset = clamp_offset(env, settings, self.tab, offset);
        env.strip.set_offset_x(key, offset);
        env.start_transition(transition);
        UpdateOutcome::Continue
    }

    pub(crate) fn stop(self, env: &mut ReorderEnv<'_>, settings: &ReorderSettings) {
        let key = ViewKey::Tab(self.tab);
        let mut transition = Transition::new();
        base::settle_views(env, settings, &[key], &mut transition);
        base::update_tab_attach_state(env, settings, self.tab, true, &mut transition);
        base::clear_edge_margins(env, settings, &mut transition);
        env.start_transition(transition);
    }

    /// One keyboard step: the same threshold logic with an unbounded offset.
    pub(crate) fn reorder_in_direction(
        env: &mut ReorderEnv<'_>,
        settings: &ReorderSettings,
        tab: TabId,
        toward_end: bool,
    ) -> ReorderStep {
        let Some(index) = env.model().index_of(tab) else {
            return ReorderStep::Unchanged;
        };
        let offset = unbounded_offset(toward_end, env.is_rtl());
        let snapshot = base::snapshot_rest_positions(env);
        let mut transition = Transition::new();
        let step = reorder_if_threshold_reached(env, settings, tab, index, offset, &mut transition);
        if step == ReorderStep::Reordered {
            base::animate_displaced_views(env, settings, &snapshot, &[], &mut transition);
            env.start_transition(transition);
        }
        step
    }
}

/// Swap, join, leave or jump past a group once the drag offset crosses the
/// relevant threshold.
fn reorder_if_threshold_reached(
    env: &mut ReorderEnv<'_>,
    settings: &ReorderSettings,
    tab: TabId,
    index: usize,
    offset: f32,
    transition: &mut Transition,
) -> ReorderStep {
    let metrics = *env.strip.metrics();
    let k = base::k(settings);
    let toward_end = utils::is_offset_toward_end(offset, metrics.rtl);
    let distance = offset.abs();

    let model = env.model();
    let Some(current) = model.tab_at(index).cloned() else {
        return ReorderStep::Unchanged;
    };
    let adjacent_index = if toward_end { index.checked_add(1) } else { index.checked_sub(1) };
    let adjacent = adjacent_index.and_then(|i| model.tab_at(i)).cloned();

    let drag_in_or_out = match &adjacent {
        Some(adjacent) => not_related_and_either_in_group(&current, adjacent),
        None => current.group.is_some(),
    };

    if !drag_in_or_out {
        let Some(adjacent) = adjacent else {
            return ReorderStep::Unchanged;
        };
        if adjacent.pinned != current.pinned {
            log::trace!("tab {} held at the pinned boundary", tab);
            return ReorderStep::Unchanged;
        }
        if distance <= utils::tab_swap_threshold(&metrics, k, current.pinned) {
            return ReorderStep::Unchanged;
        }
        let destination = if toward_end { index + 2 } else { index - 1 };
        if !env.filter.tab_model_mut().move_tab(tab, destination) {
            return ReorderStep::Unchanged;
        }
        env.rebuild();
        return ReorderStep::Reordered;
    }

    if let Some(group) = current.group {
        let title_width = env.strip.title(group).map_or(metrics.group_title_width, |t| t.state.width);
        if distance <= utils::drag_out_threshold(&metrics, k, title_width, toward_end) {
            return ReorderStep::Unchanged;
        }
        return base::move_tabs_out_of_group(env, settings, &[tab], group, toward_end, transition);
    }

    // The neighbour belongs to a group this tab is not in.
    let Some(adjacent) = adjacent else {
        return ReorderStep::Unchanged;
    };
    let Some(adjacent_group) = adjacent.group else {
        return ReorderStep::Unchanged;
    };
    if adjacent.pinned != current.pinned {
        return ReorderStep::Unchanged;
    }

    if env.filter.is_group_collapsed(adjacent_group) {
        let title_width = env
            .strip
            .title(adjacent_group)
            .map_or(metrics.group_title_width, |t| t.state.width);
        if distance <= utils::collapsed_group_swap_threshold(title_width, k) {
            return ReorderStep::Unchanged;
        }
        let count = env.filter.tabs_in_group(adjacent_group).len();
        let destination = if toward_end {
            index + 1 + count
        } else {
            index.saturating_sub(count)
        };
        if !env.filter.tab_model_mut().move_tab(tab, destination) {
            return ReorderStep::Unchanged;
        }
        env.rebuild();
        return ReorderStep::Reordered;
    }

    if distance <= utils::drag_in_threshold(&metrics, k) {
        return ReorderStep::Unchanged;
    }
    let index_in_group = if toward_end { Some(0) } else { None };
    env.filter
        .merge_list_of_tabs_to_group(&[tab], adjacent.id, index_in_group, MergeNotify::Silent);
    env.rebuild();
    base::animate_group_indicator(env, settings, adjacent_group, false, transition);
    ReorderStep::Reordered
}

/// Keep the tab from leaving the strip ends or crossing the pinned boundary.
fn clamp_offset(env: &ReorderEnv<'_>, settings: &ReorderSettings, tab: TabId, offset: f32) -> f32 {
    let metrics = env.strip.metrics();
    let rtl = metrics.rtl;
    let k = base::k(settings);
    let model = env.model();
    let Some(index) = model.index_of(tab) else {
        return offset;
    };
    let Some(current) = model.tab_at(index) else {
        return offset;
    };
    let mut offset = offset;

    if index == 0 {
        let limit = match env.strip.order().first() {
            Some(&ViewKey::GroupTitle(group)) => {
                let title_width = env.strip.title(group).map_or(metrics.group_title_width, |t| t.state.width);
                utils::drag_out_threshold(metrics, k, title_width, false)
            }
            _ => env.strip.start_margin(),
        };
        offset = utils::clamp_toward_start(offset, limit, rtl);
    }
    if index + 1 == model.count() {
        let limit = env.strip.view(ViewKey::Tab(tab)).map_or(0.0, |v| v.trailing_margin);
        offset = utils::clamp_toward_end(offset, limit, rtl);
    }

    if current.group.is_none() {
        let toward_end = utils::is_offset_toward_end(offset, rtl);
        let neighbour = if toward_end { index.checked_add(1) } else { index.checked_sub(1) };
        if let Some(neighbour) = neighbour.and_then(|i| model.tab_at(i)) {
            if neighbour.pinned != current.pinned {
                let limit = utils::tab_swap_threshold(metrics, k, current.pinned);
                offset = if toward_end {
                    utils::clamp_toward_end(offset, limit, rtl)
                } else {
                    utils::clamp_toward_start(offset, limit, rtl)
                };
            }
        }
    }
    offset
}
