use tabstrip_core::{GroupId, SettleAction, TabId, Transition, ViewKey};

use super::base::{self, ReorderStep, UpdateOutcome};
use super::tab::unbounded_offset;
use crate::env::ReorderEnv;
use crate::settings::ReorderSettings;
use crate::utils;

/// Dragging a group by its title. The title and all members move together.
#[derive(Debug)]
pub(crate) struct GroupReorder {
    group: GroupId,
    views: Vec<ViewKey>,
    last_tab: TabId,
    selected_tab: Option<TabId>,
}

fn group_views(env: &ReorderEnv<'_>, group: GroupId) -> Vec<ViewKey> {
    std::iter::once(ViewKey::GroupTitle(group))
        .chain(env.filter.tabs_in_group(group).into_iter().map(ViewKey::Tab))
        .collect()
}

/// Model indices of the group's first and last member.
fn group_bounds(env: &ReorderEnv<'_>, group: GroupId) -> Option<(usize, usize)> {
    let members = env.filter.tabs_in_group(group);
    let model = env.model();
    let first = model.index_of(*members.first()?)?;
    let last = model.index_of(*members.last()?)?;
    Some((first, last))
}

impl GroupReorder {
    pub(crate) fn start(env: &mut ReorderEnv<'_>, settings: &ReorderSettings, group: GroupId) -> Option<Self> {
        env.strip.title(group)?;
        let members = env.filter.tabs_in_group(group);
        let last_tab = *members.last()?;
        let views = group_views(env, group);

        if let Some(tab) = env.strip.tab_mut(last_tab) {
            tab.force_hide_end_divider = true;
        }
        base::set_foregrounded(env, &views, true);
        env.finish_animations_and_push_tab_updates();
        env.updates.perform_haptic_feedback();

        let selected_tab = env.model().selected_tab_id().filter(|id| members.contains(id));
        if let Some(selected) = selected_tab {
            let mut transition = Transition::new();
            base::update_tab_attach_state(env, settings, selected, false, &mut transition);
            env.start_transition(transition);
        }
        log::debug!("group reorder started for {:?} ({} tabs)", group, members.len());
        Some(Self {
            group,
            views,
            last_tab,
            selected_tab,
        })
    }

    pub(crate) fn group(&self) -> GroupId {
        self.group
    }

    pub(crate) fn update(&mut self, env: &mut ReorderEnv<'_>, settings: &ReorderSettings, delta_x: f32) -> UpdateOutcome {
        let title = ViewKey::GroupTitle(self.group);
        if env.strip.title(self.group).is_none() {
            return UpdateOutcome::Continue;
        }
        let old_rest = env.rest_x(title);
        let snapshot = base::snapshot_rest_positions(env);
        let mut offset = env.strip.offset_x(title) + delta_x;
        let mut transition = Transition::new();

        if reorder_group_if_threshold_reached(env, settings, self.group, offset) == ReorderStep::Reordered {
            offset = base::keep_rest_position(env, title, offset, old_rest);
            self.views = group_views(env, self.group);
            base::animate_displaced_views(env, settings, &snapshot, &self.views, &mut transition);
        }

        if let Some((first, last)) = group_bounds(env, self.group) {
            let rtl = env.is_rtl();
            let model = env.model();
            if first <= model.first_non_pinned_index() {
                offset = utils::clamp_toward_start(offset, 0.0, rtl);
            }
            if last + 1 >= model.count() {
                offset = utils::clamp_toward_end(offset, 0.0, rtl);
            }
        }

        for &key in &self.views {
            if let Some(state) = env.strip.view_mut(key) {
                state.offset_x = offset;
            }
        }
        env.relayout();
        env.start_transition(transition);
        UpdateOutcome::Continue
    }

    pub(crate) fn stop(self, env: &mut ReorderEnv<'_>, settings: &ReorderSettings) {
        env.finish_animations_and_push_tab_updates();
        let mut transition = Transition::new();
        base::settle_views(env, settings, &self.views, &mut transition);
        if let Some(selected) = self.selected_tab {
            base::update_tab_attach_state(env, settings, selected, true, &mut transition);
        }
        transition.then(SettleAction::ShowEndDivider(self.last_tab));
        env.start_transition(transition);
    }

    pub(crate) fn reorder_in_direction(
        env: &mut ReorderEnv<'_>,
        settings: &ReorderSettings,
        group: GroupId,
        toward_end: bool,
    ) -> ReorderStep {
        let offset = unbounded_offset(toward_end, env.is_rtl());
        let snapshot = base::snapshot_rest_positions(env);
        let step = reorder_group_if_threshold_reached(env, settings, group, offset);
        if step == ReorderStep::Reordered {
            let mut transition = Transition::new();
            base::animate_displaced_views(env, settings, &snapshot, &[], &mut transition);
            env.start_transition(transition);
        }
        step
    }
}

/// Move the whole group past its neighbour (a tab or another group) once
/// the title's offset crosses the matching threshold.
fn reorder_group_if_threshold_reached(
    env: &mut ReorderEnv<'_>,
    settings: &ReorderSettings,
    group: GroupId,
    offset: f32,
) -> ReorderStep {
    let metrics = *env.strip.metrics();
    let k = base::k(settings);
    let toward_end = utils::is_offset_toward_end(offset, metrics.rtl);
    let Some((first, last)) = group_bounds(env, group) else {
        return ReorderStep::Unchanged;
    };
    let Some(anchor) = env.filter.tabs_in_group(group).first().copied() else {
        return ReorderStep::Unchanged;
    };

    let Some(adjacent_index) = (if toward_end { last.checked_add(1) } else { first.checked_sub(1) }) else {
        return ReorderStep::Unchanged;
    };
    let Some(adjacent) = env.model().tab_at(adjacent_index).cloned() else {
        return ReorderStep::Unchanged;
    };
    if adjacent.pinned {
        return ReorderStep::Unchanged;
    }

    let destination = match adjacent.group {
        Some(other) => {
            let Some(title) = env.strip.title(other) else {
                return ReorderStep::Unchanged;
            };
            if offset.abs() <= utils::group_swap_threshold(&metrics, k, title) {
                return ReorderStep::Unchanged;
            }
            let Some((other_first, other_last)) = group_bounds(env, other) else {
                return ReorderStep::Unchanged;
            };
            if toward_end {
                other_last + 1
            } else {
                other_first
            }
        }
        None => {
            if offset.abs() <= utils::tab_swap_threshold(&metrics, k, false) {
                return ReorderStep::Unchanged;
            }
            if toward_end {
                adjacent_index + 1
            } else {
                adjacent_index
            }
        }
    };

    env.filter.move_related_tabs(anchor, destination);
    env.rebuild();
    log::debug!("group {:?} moved to {}", group, destination);
    ReorderStep::Reordered
}
