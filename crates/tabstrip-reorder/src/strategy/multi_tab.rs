// Dragging a multi-selection. On start the selection is gathered into one
// block: tabs sharing the primary's pinned state become contiguous around
// it and the rest wait at the pinned boundary. During the drag only one
// partition (the driving one) moves through the model; the other follows
// through its offset so the block always looks contiguous.

use tabstrip_core::{AnimatedProperty, Animation, GroupId, MergeNotify, TabId, Transition, ViewKey};

use super::base::{self, ReorderStep, UpdateOutcome};
use super::tab::unbounded_offset;
use crate::env::ReorderEnv;
use crate::settings::ReorderSettings;
use crate::utils;

#[derive(Debug)]
pub(crate) struct MultiTabReorder {
    primary: TabId,
    tabs: Vec<TabId>,
}

/// Block tabs split by pinned state, each in model order.
struct Partitions {
    pinned: Vec<TabId>,
    unpinned: Vec<TabId>,
}

impl MultiTabReorder {
    pub(crate) fn start(env: &mut ReorderEnv<'_>, settings: &ReorderSettings, primary: TabId) -> Option<Self> {
        let primary_index = env.model().index_of(primary)?;
        let mut tabs = env.model().multi_selected_tabs();
        if !tabs.contains(&primary) {
            tabs.push(primary);
        }
        let keys: Vec<ViewKey> = tabs.iter().map(|&id| ViewKey::Tab(id)).collect();
        base::set_foregrounded(env, &keys, true);
        env.filter.tab_model_mut().set_index(primary_index);
        env.finish_animations_and_push_tab_updates();

        let primary_key = ViewKey::Tab(primary);
        let primary_offset = env.strip.offset_x(primary_key);
        let primary_rest = env.rest_x(primary_key);
        let snapshot = base::snapshot_rest_positions(env);

        gather(env, primary, &tabs);
        env.rebuild();
        base::set_edge_margins_for_reorder(env, settings, false);

        let strategy = Self { primary, tabs };
        let anchor_pinned = env.strip.tab(primary).is_some_and(|t| t.pinned);
        let block_offset = base::keep_rest_position(env, primary_key, primary_offset, primary_rest);
        strategy.apply_offsets(env, anchor_pinned, block_offset);

        let mut transition = Transition::new();
        base::animate_displaced_views(env, settings, &snapshot, &keys, &mut transition);
        for &(key, old_rest) in &snapshot {
            if key == primary_key || !keys.contains(&key) {
                continue;
            }
            let target = env.strip.offset_x(key);
            let from = target + old_rest - env.rest_x(key);
            if (from - target).abs() > 0.5 {
                transition.push(Animation::new(
                    key,
                    AnimatedProperty::OffsetX,
                    from,
                    target,
                    settings.anim_tab_move_ms,
                ));
            }
        }
        base::update_tab_attach_state(env, settings, primary, false, &mut transition);
        env.start_transition(transition);
        env.updates.perform_haptic_feedback();
        log::debug!("multi-tab reorder started for {:?} (primary {})", strategy.tabs, primary);
        Some(strategy)
    }

    pub(crate) fn primary(&self) -> TabId {
        self.primary
    }

    pub(crate) fn tabs(&self) -> &[TabId] {
        &self.tabs
    }

    fn keys(&self) -> Vec<ViewKey> {
        self.tabs.iter().map(|&id| ViewKey::Tab(id)).collect()
    }

    fn partitions(&self, env: &ReorderEnv<'_>) -> Partitions {
        let model = env.model();
        let mut ordered: Vec<(usize, TabId)> = self
            .tabs
            .iter()
            .filter_map(|&id| model.index_of(id).map(|i| (i, id)))
            .collect();
        ordered.sort_unstable();
        let (pinned, unpinned): (Vec<_>, Vec<_>) = ordered
            .into_iter()
            .map(|(_, id)| id)
            .partition(|&id| model.tab_by_id(id).is_some_and(|t| t.pinned));
        Partitions { pinned, unpinned }
    }

    pub(crate) fn update(&mut self, env: &mut ReorderEnv<'_>, settings: &ReorderSettings, delta_x: f32) -> UpdateOutcome {
        let parts = self.partitions(env);
        let Some(driving_pinned) = driving_partition(env, &parts, delta_x) else {
            return UpdateOutcome::Continue;
        };
        let driving = if driving_pinned { &parts.pinned } else { &parts.unpinned };
        let Some(&lead) = driving.first() else {
            return UpdateOutcome::Continue;
        };

        let lead_key = ViewKey::Tab(lead);
        let old_rest = env.rest_x(lead_key);
        let snapshot = base::snapshot_rest_positions(env);
        let mut offset = env.strip.offset_x(lead_key) + delta_x;
        let mut transition = Transition::new();

        match reorder_block_if_threshold_reached(env, settings, driving, driving_pinned, offset, &mut transition) {
            ReorderStep::Unchanged => {}
            ReorderStep::Reordered => {
                base::set_edge_margins_for_reorder(env, settings, false);
                offset = base::keep_rest_position(env, lead_key, offset, old_rest);
                base::animate_displaced_views(env, settings, &snapshot, &self.keys(), &mut transition);
            }
            paused @ ReorderStep::Paused { .. } => return paused.into_outcome(),
        }

        offset = clamp_block_offset(env, settings, driving, driving_pinned, offset);
        self.apply_offsets(env, driving_pinned, offset);
        env.start_transition(transition);
        UpdateOutcome::Continue
    }

    /// Keyboard reorder of a multi-selection: gather it around `primary`,
    /// then move the primary's partition one step.
    pub(crate) fn reorder_in_direction(
        env: &mut ReorderEnv<'_>,
        settings: &ReorderSettings,
        primary: TabId,
        toward_end: bool,
    ) -> ReorderStep {
        let mut tabs = env.model().multi_selected_tabs();
        if !tabs.contains(&primary) {
            tabs.push(primary);
        }
        let before = membership(env);
        let snapshot = base::snapshot_rest_positions(env);
        gather(env, primary, &tabs);
        env.rebuild();

        let strategy = Self { primary, tabs };
        let parts = strategy.partitions(env);
        let pinned = env.model().tab_by_id(primary).is_some_and(|t| t.pinned);
        let block = if pinned { parts.pinned } else { parts.unpinned };
        let offset = unbounded_offset(toward_end, env.is_rtl());
        let mut transition = Transition::new();
        let step = reorder_block_if_threshold_reached(env, settings, &block, pinned, offset, &mut transition);
        if matches!(step, ReorderStep::Paused { .. }) {
            return step;
        }

        base::animate_displaced_views(env, settings, &snapshot, &[], &mut transition);
        env.start_transition(transition);
        if step == ReorderStep::Unchanged && membership(env) != before {
            return ReorderStep::Reordered;
        }
        step
    }

    pub(crate) fn stop(self, env: &mut ReorderEnv<'_>, settings: &ReorderSettings) {
        let mut transition = Transition::new();
        base::settle_views(env, settings, &self.keys(), &mut transition);
        base::update_tab_attach_state(env, settings, self.primary, true, &mut transition);
        base::clear_edge_margins(env, settings, &mut transition);
        env.start_transition(transition);
    }

    /// Give the driving partition `driving_offset` and place the other one
    /// flush against it.
    fn apply_offsets(&self, env: &mut ReorderEnv<'_>, driving_pinned: bool, driving_offset: f32) {
        let parts = self.partitions(env);
        let (driving, other) = if driving_pinned {
            (&parts.pinned, &parts.unpinned)
        } else {
            (&parts.unpinned, &parts.pinned)
        };
        for &id in driving {
            if let Some(state) = env.strip.view_mut(ViewKey::Tab(id)) {
                state.offset_x = driving_offset;
            }
        }

        let rtl = env.is_rtl();
        let logical_offset = utils::flip_sign_if(driving_offset, rtl);

        let mut targets = Vec::with_capacity(other.len());
        if driving_pinned {
            if let Some(&last) = driving.last() {
                let mut cursor = logical_rest(env, last) + logical_offset + advance(env, last);
                for &id in other {
                    targets.push((id, cursor - logical_rest(env, id)));
                    cursor += advance(env, id);
                }
            }
        } else if let Some(&first) = driving.first() {
            let mut cursor = logical_rest(env, first) + logical_offset;
            for &id in other.iter().rev() {
                cursor -= advance(env, id);
                targets.push((id, cursor - logical_rest(env, id)));
            }
        }
        for (id, logical) in targets {
            if let Some(state) = env.strip.view_mut(ViewKey::Tab(id)) {
                state.offset_x = utils::flip_sign_if(logical, rtl);
            }
        }
        env.relayout();
    }
}

/// Rest position measured from the strip start, whatever the direction.
fn logical_rest(env: &ReorderEnv<'_>, id: TabId) -> f32 {
    let key = ViewKey::Tab(id);
    let rest = env.rest_x(key);
    let metrics = env.strip.metrics();
    if metrics.rtl {
        let width = env.strip.view(key).map_or(0.0, |v| v.width);
        metrics.strip_width - rest - width
    } else {
        rest
    }
}

fn advance(env: &ReorderEnv<'_>, id: TabId) -> f32 {
    env.strip.view(ViewKey::Tab(id)).map_or(0.0, |v| v.width) - env.strip.metrics().tab_overlap
}

// ──────────────────────────────────────────────
// Gathering
// ──────────────────────────────────────────────

/// Model order and group of every tab.
fn membership(env: &ReorderEnv<'_>) -> Vec<(TabId, Option<GroupId>)> {
    env.model()
        .tab_ids()
        .into_iter()
        .map(|id| (id, env.filter.group_of(id)))
        .collect()
}

fn gather(env: &mut ReorderEnv<'_>, primary: TabId, selected: &[TabId]) {
    let Some(primary_tab) = env.model().tab_by_id(primary).cloned() else {
        return;
    };
    let target_group = primary_tab
        .group
        .filter(|&g| !env.filter.tabs_in_group(g).iter().all(|m| selected.contains(m)));

    if target_group.is_none() {
        let grouped: Vec<TabId> = selected
            .iter()
            .copied()
            .filter(|&id| env.filter.is_tab_in_tab_group(id))
            .collect();
        if !grouped.is_empty() {
            env.filter.ungroup_tabs(&grouped, false, false);
        }
    }

    let (same_pin, other_pin) = {
        let model = env.model();
        let mut ordered: Vec<(usize, TabId)> = selected
            .iter()
            .filter(|&&id| id != primary)
            .filter_map(|&id| model.index_of(id).map(|i| (i, id)))
            .collect();
        ordered.sort_unstable();
        let (same, other): (Vec<_>, Vec<_>) = ordered
            .into_iter()
            .partition(|&(_, id)| model.tab_by_id(id).is_some_and(|t| t.pinned == primary_tab.pinned));
        (same, other)
    };
    let Some(primary_index) = env.model().index_of(primary) else {
        return;
    };

    // Same-pin tabs close up around the primary, keeping their order.
    let mut block_first = primary;
    for &(_, id) in same_pin.iter().filter(|(i, _)| *i < primary_index).rev() {
        if let Some(at) = env.model().index_of(block_first) {
            env.filter.tab_model_mut().move_tab(id, at);
        }
        block_first = id;
    }
    let mut block_last = primary;
    for &(_, id) in same_pin.iter().filter(|(i, _)| *i > primary_index) {
        if let Some(at) = env.model().index_of(block_last) {
            env.filter.tab_model_mut().move_tab(id, at + 1);
        }
        block_last = id;
    }

    // The others wait at the pinned boundary.
    if primary_tab.pinned {
        for &(_, id) in other_pin.iter().rev() {
            let boundary = env.model().first_non_pinned_index();
            env.filter.tab_model_mut().move_tab(id, boundary);
        }
    } else {
        for &(_, id) in &other_pin {
            let boundary = env.model().first_non_pinned_index();
            env.filter.tab_model_mut().move_tab(id, boundary);
        }
    }

    if let Some(group) = target_group {
        merge_block_into_group(env, primary, group, &same_pin.iter().map(|&(_, id)| id).collect::<Vec<_>>());
    }
}

/// Join the contiguous block around `primary` into its group, right to left
/// so every merge lands next to an already merged neighbour.
fn merge_block_into_group(env: &mut ReorderEnv<'_>, primary: TabId, group: GroupId, block: &[TabId]) {
    let mut ordered: Vec<(usize, TabId)> = block
        .iter()
        .filter_map(|&id| env.model().index_of(id).map(|i| (i, id)))
        .collect();
    ordered.sort_unstable();
    for &(_, id) in ordered.iter().rev() {
        if env.filter.group_of(id) == Some(group) {
            continue;
        }
        let Some(index) = env.model().index_of(id) else {
            continue;
        };
        let slot = env
            .filter
            .tabs_in_group(group)
            .iter()
            .filter(|&&m| env.model().index_of(m).is_some_and(|i| i < index))
            .count();
        env.filter
            .merge_list_of_tabs_to_group(&[id], primary, Some(slot), MergeNotify::Silent);
    }
}

// ──────────────────────────────────────────────
// Dragging
// ──────────────────────────────────────────────

/// Whether the pinned partition drives this update. The partition that has
/// left the pinned boundary keeps driving; while both sit at the boundary
/// the drag direction picks.
fn driving_partition(env: &ReorderEnv<'_>, parts: &Partitions, delta_x: f32) -> Option<bool> {
    let model = env.model();
    let boundary = model.first_non_pinned_index();
    let pinned_home = parts
        .pinned
        .last()
        .is_none_or(|&id| model.index_of(id).is_some_and(|i| i + 1 == boundary));
    let unpinned_home = parts
        .unpinned
        .first()
        .is_none_or(|&id| model.index_of(id) == Some(boundary));

    match (parts.pinned.is_empty(), parts.unpinned.is_empty()) {
        (true, true) => None,
        (true, false) => Some(false),
        (false, true) => Some(true),
        (false, false) if !unpinned_home => Some(false),
        (false, false) if !pinned_home => Some(true),
        (false, false) => {
            let first = ViewKey::Tab(parts.unpinned[0]);
            let candidate = env.strip.offset_x(first) + delta_x;
            Some(!utils::is_offset_toward_end(candidate, env.is_rtl()))
        }
    }
}

/// The group every tab of `block` belongs to, if they share one.
fn common_group(env: &ReorderEnv<'_>, block: &[TabId]) -> Option<GroupId> {
    let group = env.filter.group_of(*block.first()?)?;
    block
        .iter()
        .all(|&id| env.filter.group_of(id) == Some(group))
        .then_some(group)
}

fn reorder_block_if_threshold_reached(
    env: &mut ReorderEnv<'_>,
    settings: &ReorderSettings,
    block: &[TabId],
    block_pinned: bool,
    offset: f32,
    transition: &mut Transition,
) -> ReorderStep {
    let metrics = *env.strip.metrics();
    let k = base::k(settings);
    let toward_end = utils::is_offset_toward_end(offset, metrics.rtl);
    let distance = offset.abs();

    let (Some(&first_id), Some(&last_id)) = (block.first(), block.last()) else {
        return ReorderStep::Unchanged;
    };
    let (Some(first), Some(last)) = (env.model().index_of(first_id), env.model().index_of(last_id)) else {
        return ReorderStep::Unchanged;
    };
    let block_group = common_group(env, block);
    let adjacent = (if toward_end { last.checked_add(1) } else { first.checked_sub(1) })
        .and_then(|i| env.model().tab_at(i))
        .cloned();
    let title_width = |env: &ReorderEnv<'_>, group: GroupId| {
        env.strip.title(group).map_or(metrics.group_title_width, |t| t.state.width)
    };

    if let Some(group) = block_group {
        let leaving = adjacent.as_ref().is_none_or(|a| a.group != Some(group));
        if leaving {
            if distance <= utils::drag_out_threshold(&metrics, k, title_width(env, group), toward_end) {
                return ReorderStep::Unchanged;
            }
            return base::move_tabs_out_of_group(env, settings, block, group, toward_end, transition);
        }
    }

    let Some(adjacent) = adjacent else {
        return ReorderStep::Unchanged;
    };
    if adjacent.pinned != block_pinned {
        log::trace!("multi-tab block held at the pinned boundary");
        return ReorderStep::Unchanged;
    }
    let past_block = if toward_end { first } else { last + 1 };

    match adjacent.group {
        Some(other) if Some(other) != block_group => {
            if env.filter.is_group_collapsed(other) {
                if distance <= utils::collapsed_group_swap_threshold(title_width(env, other), k) {
                    return ReorderStep::Unchanged;
                }
                env.filter.move_related_tabs(adjacent.id, past_block);
                env.rebuild();
                return ReorderStep::Reordered;
            }
            if distance <= utils::drag_in_threshold(&metrics, k) {
                return ReorderStep::Unchanged;
            }
            let index_in_group = if toward_end { Some(0) } else { None };
            env.filter
                .merge_list_of_tabs_to_group(block, adjacent.id, index_in_group, MergeNotify::Silent);
            env.rebuild();
            base::animate_group_indicator(env, settings, other, false, transition);
            ReorderStep::Reordered
        }
        _ => {
            if distance <= utils::tab_swap_threshold(&metrics, k, block_pinned) {
                return ReorderStep::Unchanged;
            }
            if !env.filter.tab_model_mut().move_tab(adjacent.id, past_block) {
                return ReorderStep::Unchanged;
            }
            env.rebuild();
            ReorderStep::Reordered
        }
    }
}

/// Edge and pinned-boundary limits for the driving partition.
fn clamp_block_offset(
    env: &ReorderEnv<'_>,
    settings: &ReorderSettings,
    block: &[TabId],
    block_pinned: bool,
    offset: f32,
) -> f32 {
    let metrics = env.strip.metrics();
    let rtl = metrics.rtl;
    let k = base::k(settings);
    let model = env.model();
    let (Some(&first_id), Some(&last_id)) = (block.first(), block.last()) else {
        return offset;
    };
    let (Some(first), Some(last)) = (model.index_of(first_id), model.index_of(last_id)) else {
        return offset;
    };
    let mut offset = offset;

    if first == 0 {
        let limit = match env.strip.order().first() {
            Some(&ViewKey::GroupTitle(group)) => {
                let title_width = env.strip.title(group).map_or(metrics.group_title_width, |t| t.state.width);
                utils::drag_out_threshold(metrics, k, title_width, false)
            }
            _ => env.strip.start_margin(),
        };
        offset = utils::clamp_toward_start(offset, limit, rtl);
    }
    if last + 1 == model.count() {
        let limit = env.strip.view(ViewKey::Tab(last_id)).map_or(0.0, |v| v.trailing_margin);
        offset = utils::clamp_toward_end(offset, limit, rtl);
    }

    if common_group(env, block).is_none() {
        let toward_end = utils::is_offset_toward_end(offset, rtl);
        let neighbour = if toward_end { last.checked_add(1) } else { first.checked_sub(1) };
        if let Some(neighbour) = neighbour.and_then(|i| model.tab_at(i)) {
            if neighbour.pinned != block_pinned {
                let limit = utils::tab_swap_threshold(metrics, k, block_pinned);
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
