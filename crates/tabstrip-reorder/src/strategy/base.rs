// Helpers shared by every reorder strategy: edge margins, folio attachment,
// sliding displaced views and the group underline.

use tabstrip_core::{
    AnimatedProperty, Animation, ConfirmationKind, GroupId, SettleAction, TabId, Transition, UngroupOutcome,
    ViewKey,
};

use crate::env::ReorderEnv;
use crate::settings::ReorderSettings;
use crate::utils;

/// Views closer than this to their old position are not animated.
const SLIDE_EPSILON: f32 = 0.5;

/// What a strategy update asks of the delegate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UpdateOutcome {
    Continue,
    /// An ungroup is waiting on a user dialog.
    AwaitingConfirmation {
        group: GroupId,
        kind: ConfirmationKind,
        exit_reorder_mode: bool,
    },
}

/// Result of one threshold check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReorderStep {
    Unchanged,
    Reordered,
    Paused { group: GroupId, kind: ConfirmationKind },
}

impl ReorderStep {
    pub(crate) fn into_outcome(self) -> UpdateOutcome {
        match self {
            ReorderStep::Paused { group, kind } => UpdateOutcome::AwaitingConfirmation {
                group,
                kind,
                exit_reorder_mode: true,
            },
            _ => UpdateOutcome::Continue,
        }
    }
}

pub(crate) fn k(settings: &ReorderSettings) -> f32 {
    settings.reorder_overlap_switch_percentage
}

// ──────────────────────────────────────────────
// Edge margins
// ──────────────────────────────────────────────

/// Reserve space at the strip ends so a grouped edge tab can be dragged out
/// of its group. `for_tab_drop` always reserves the trailing space.
pub(crate) fn set_edge_margins_for_reorder(env: &mut ReorderEnv<'_>, settings: &ReorderSettings, for_tab_drop: bool) {
    let margin = utils::edge_margin(env.strip.metrics(), k(settings));
    let (first_grouped, last) = {
        let tabs = env.strip.tabs();
        (
            tabs.first().is_some_and(|t| t.group.is_some()),
            tabs.last().map(|t| (t.id, t.group.is_some())),
        )
    };

    env.scroll
        .set_reorder_start_margin(if first_grouped { margin } else { 0.0 });

    if !for_tab_drop {
        let ids: Vec<TabId> = env.strip.tabs().iter().map(|t| t.id).collect();
        for id in ids {
            if let Some(state) = env.strip.view_mut(ViewKey::Tab(id)) {
                state.trailing_margin = 0.0;
            }
        }
    }
    if let Some((last_id, last_grouped)) = last {
        if let Some(state) = env.strip.view_mut(ViewKey::Tab(last_id)) {
            state.trailing_margin = if last_grouped || for_tab_drop { margin } else { 0.0 };
        }
    }
    env.relayout();
}

/// Drop the start margin at once and animate every trailing margin away.
pub(crate) fn clear_edge_margins(env: &mut ReorderEnv<'_>, settings: &ReorderSettings, transition: &mut Transition) {
    env.set_reorder_start_margin(0.0);
    let keys: Vec<ViewKey> = env.strip.order().to_vec();
    for key in keys {
        let margin = env.strip.view(key).map_or(0.0, |v| v.trailing_margin);
        if margin > 0.0 {
            transition.push(Animation::new(
                key,
                AnimatedProperty::TrailingMargin,
                margin,
                0.0,
                settings.anim_tab_move_ms,
            ));
        }
    }
}

// ──────────────────────────────────────────────
// Folio attachment
// ──────────────────────────────────────────────

/// Lift a tab off the toolbar (or set it back down) in two stages.
pub(crate) fn update_tab_attach_state(
    env: &ReorderEnv<'_>,
    settings: &ReorderSettings,
    tab: TabId,
    attached: bool,
    transition: &mut Transition,
) {
    let Some(view) = env.strip.tab(tab) else {
        return;
    };
    let folio = &settings.folio;
    let target = if attached { folio.attached } else { folio.detached };
    if view.bottom_margin == target {
        return;
    }
    let key = ViewKey::Tab(tab);
    let duration = settings.anim_folio_detach_ms;
    transition.push(Animation::new(
        key,
        AnimatedProperty::BottomMargin,
        view.bottom_margin,
        folio.intermediate,
        duration,
    ));
    transition.push(
        Animation::new(key, AnimatedProperty::BottomMargin, folio.intermediate, target, duration)
            .with_delay(duration),
    );
}

// ──────────────────────────────────────────────
// Sliding
// ──────────────────────────────────────────────

/// Rest positions of every view, taken before a model mutation.
pub(crate) fn snapshot_rest_positions(env: &ReorderEnv<'_>) -> Vec<(ViewKey, f32)> {
    env.strip
        .order()
        .iter()
        .map(|&key| (key, env.rest_x(key)))
        .collect()
}

/// Slide views that a mutation moved from their old spot into their new one.
pub(crate) fn animate_displaced_views(
    env: &ReorderEnv<'_>,
    settings: &ReorderSettings,
    snapshot: &[(ViewKey, f32)],
    exclude: &[ViewKey],
    transition: &mut Transition,
) {
    for &(key, old_rest) in snapshot {
        if exclude.contains(&key) {
            continue;
        }
        let Some(state) = env.strip.view(key) else {
            continue;
        };
        if !state.occupies_strip() {
            continue;
        }
        let new_rest = state.draw_x - state.offset_x;
        let shift = old_rest - new_rest;
        if shift.abs() <= SLIDE_EPSILON {
            continue;
        }
        transition.push(Animation::new(
            key,
            AnimatedProperty::OffsetX,
            state.offset_x + shift,
            0.0,
            settings.anim_tab_move_ms,
        ));
    }
}

/// Offset that keeps a view where it was on screen after its rest position
/// moved from `old_rest`.
pub(crate) fn keep_rest_position(env: &ReorderEnv<'_>, key: ViewKey, offset: f32, old_rest: f32) -> f32 {
    offset + old_rest - env.rest_x(key)
}

/// Grow or shrink a group's underline by one tab width.
pub(crate) fn animate_group_indicator(
    env: &ReorderEnv<'_>,
    settings: &ReorderSettings,
    group: GroupId,
    moving_out: bool,
    transition: &mut Transition,
) {
    let Some(title) = env.strip.title(group) else {
        return;
    };
    if title.collapsed {
        return;
    }
    let current = title.bottom_indicator_width;
    let step = env.strip.metrics().effective_tab_width(false);
    let from = if moving_out { current + step } else { current - step };
    transition.push(Animation::new(
        ViewKey::GroupTitle(group),
        AnimatedProperty::BottomIndicatorWidth,
        from.max(0.0),
        current,
        settings.anim_tab_move_ms,
    ));
}

// ──────────────────────────────────────────────
// Group membership
// ──────────────────────────────────────────────

/// Ungroup `tabs` from `group`, placing them at its trailing edge when
/// `toward_end`.
pub(crate) fn move_tabs_out_of_group(
    env: &mut ReorderEnv<'_>,
    settings: &ReorderSettings,
    tabs: &[TabId],
    group: GroupId,
    toward_end: bool,
    transition: &mut Transition,
) -> ReorderStep {
    match env.filter.ungroup_tabs(tabs, toward_end, true) {
        UngroupOutcome::AwaitingConfirmation(kind) => {
            log::debug!("ungroup of {:?} from {:?} awaits {:?} confirmation", tabs, group, kind);
            ReorderStep::Paused { group, kind }
        }
        UngroupOutcome::Noop => ReorderStep::Unchanged,
        UngroupOutcome::Ungrouped => {
            env.rebuild();
            animate_group_indicator(env, settings, group, true, transition);
            ReorderStep::Reordered
        }
    }
}

// ──────────────────────────────────────────────
// Stop
// ──────────────────────────────────────────────

pub(crate) fn set_foregrounded(env: &mut ReorderEnv<'_>, keys: &[ViewKey], foregrounded: bool) {
    for &key in keys {
        if let Some(state) = env.strip.view_mut(key) {
            state.foregrounded = foregrounded;
        }
    }
}

/// Animate `keys` back to their rest positions and drop them from the
/// foreground once settled.
pub(crate) fn settle_views(
    env: &ReorderEnv<'_>,
    settings: &ReorderSettings,
    keys: &[ViewKey],
    transition: &mut Transition,
) {
    for &key in keys {
        let offset = env.strip.offset_x(key);
        if offset != 0.0 {
            transition.push(Animation::new(
                key,
                AnimatedProperty::OffsetX,
                offset,
                0.0,
                settings.anim_tab_move_ms,
            ));
        }
    }
    transition.then(SettleAction::ClearForeground(keys.to_vec()));
}
