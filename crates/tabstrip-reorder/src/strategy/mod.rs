// Reorder strategies. Exactly one is active while the strip is in reorder
// mode; it is created when reorder mode starts and dropped when it stops.

pub(crate) mod base;
mod external_drag_drop;
mod group;
mod multi_tab;
mod source_drag_drop;
mod tab;

use tabstrip_core::{ReorderType, TabId, Vec2, ViewKey, WindowId};

use crate::env::ReorderEnv;
use crate::settings::ReorderSettings;

pub(crate) use base::{ReorderStep, UpdateOutcome};
pub(crate) use external_drag_drop::ExternalDragDrop;
pub(crate) use group::GroupReorder;
pub(crate) use multi_tab::MultiTabReorder;
pub(crate) use source_drag_drop::SourceDragDrop;
pub(crate) use tab::TabReorder;

/// Which strategy handles the current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Tab,
    MultiTab,
    Group,
    SourceDragDrop,
    ExternalDragDrop,
}

// ──────────────────────────────────────────────
// In-strip strategies
// ──────────────────────────────────────────────

/// Reorders that stay inside the strip. Also run underneath a source
/// drag-and-drop while the pointer is over the strip.
#[derive(Debug)]
pub(crate) enum InStripStrategy {
    Tab(TabReorder),
    MultiTab(MultiTabReorder),
    Group(GroupReorder),
}

impl InStripStrategy {
    /// A tab that is part of a multi-selection drags the whole selection.
    pub(crate) fn start(env: &mut ReorderEnv<'_>, settings: &ReorderSettings, interacting: ViewKey) -> Option<Self> {
        match interacting {
            ViewKey::Tab(id) => {
                let model = env.model();
                if model.is_multi_selected(id) && model.multi_selected_tabs().len() > 1 {
                    MultiTabReorder::start(env, settings, id).map(Self::MultiTab)
                } else {
                    TabReorder::start(env, settings, id).map(Self::Tab)
                }
            }
            ViewKey::GroupTitle(group) => GroupReorder::start(env, settings, group).map(Self::Group),
        }
    }

    pub(crate) fn kind(&self) -> StrategyKind {
        match self {
            InStripStrategy::Tab(_) => StrategyKind::Tab,
            InStripStrategy::MultiTab(_) => StrategyKind::MultiTab,
            InStripStrategy::Group(_) => StrategyKind::Group,
        }
    }

    pub(crate) fn interacting_view(&self) -> ViewKey {
        match self {
            InStripStrategy::Tab(s) => ViewKey::Tab(s.tab()),
            InStripStrategy::MultiTab(s) => ViewKey::Tab(s.primary()),
            InStripStrategy::Group(s) => ViewKey::GroupTitle(s.group()),
        }
    }

    pub(crate) fn primary_tab(&self, env: &ReorderEnv<'_>) -> Option<TabId> {
        match self {
            InStripStrategy::Tab(s) => Some(s.tab()),
            InStripStrategy::MultiTab(s) => Some(s.primary()),
            InStripStrategy::Group(s) => env.filter.tabs_in_group(s.group()).first().copied(),
        }
    }

    /// Every view that moves with the gesture.
    pub(crate) fn dragged_views(&self, env: &ReorderEnv<'_>) -> Vec<ViewKey> {
        match self {
            InStripStrategy::Tab(s) => vec![ViewKey::Tab(s.tab())],
            InStripStrategy::MultiTab(s) => {
                let model = env.model();
                let mut tabs: Vec<TabId> = s.tabs().to_vec();
                tabs.sort_by_key(|&id| model.index_of(id));
                tabs.into_iter().map(ViewKey::Tab).collect()
            }
            InStripStrategy::Group(s) => std::iter::once(ViewKey::GroupTitle(s.group()))
                .chain(env.filter.tabs_in_group(s.group()).into_iter().map(ViewKey::Tab))
                .collect(),
        }
    }

    pub(crate) fn update(&mut self, env: &mut ReorderEnv<'_>, settings: &ReorderSettings, delta_x: f32) -> UpdateOutcome {
        match self {
            InStripStrategy::Tab(s) => s.update(env, settings, delta_x),
            InStripStrategy::MultiTab(s) => s.update(env, settings, delta_x),
            InStripStrategy::Group(s) => s.update(env, settings, delta_x),
        }
    }

    pub(crate) fn stop(self, env: &mut ReorderEnv<'_>, settings: &ReorderSettings) {
        match self {
            InStripStrategy::Tab(s) => s.stop(env, settings),
            InStripStrategy::MultiTab(s) => s.stop(env, settings),
            InStripStrategy::Group(s) => s.stop(env, settings),
        }
    }
}

// ──────────────────────────────────────────────
// Active strategy
// ──────────────────────────────────────────────

#[derive(Debug)]
pub(crate) enum ActiveStrategy {
    InStrip(InStripStrategy),
    SourceDragDrop(SourceDragDrop),
    ExternalDragDrop(ExternalDragDrop),
}

impl ActiveStrategy {
    /// Pick and start the strategy for a new gesture.
    pub(crate) fn start(
        env: &mut ReorderEnv<'_>,
        settings: &ReorderSettings,
        window: WindowId,
        interacting: ViewKey,
        start_point: Vec2,
        reorder_type: ReorderType,
    ) -> Option<Self> {
        match reorder_type {
            ReorderType::StartDragDrop if env.drag_source.is_some() => {
                SourceDragDrop::start(env, settings, window, interacting, start_point).map(Self::SourceDragDrop)
            }
            ReorderType::DragOntoStrip => Some(Self::ExternalDragDrop(ExternalDragDrop::start(
                env,
                settings,
                start_point.x,
            ))),
            _ => InStripStrategy::start(env, settings, interacting).map(Self::InStrip),
        }
    }

    pub(crate) fn kind(&self) -> StrategyKind {
        match self {
            ActiveStrategy::InStrip(s) => s.kind(),
            ActiveStrategy::SourceDragDrop(_) => StrategyKind::SourceDragDrop,
            ActiveStrategy::ExternalDragDrop(_) => StrategyKind::ExternalDragDrop,
        }
    }

    pub(crate) fn interacting_view(&self) -> Option<ViewKey> {
        match self {
            ActiveStrategy::InStrip(s) => Some(s.interacting_view()),
            ActiveStrategy::SourceDragDrop(s) => Some(s.in_strip().interacting_view()),
            ActiveStrategy::ExternalDragDrop(s) => s.hovered_view(),
        }
    }

    /// Horizontal span (x, width) checked against the auto-scroll gutters.
    pub(crate) fn scroll_span(&self, env: &ReorderEnv<'_>, last_reorder_x: f32) -> Option<(f32, f32)> {
        let view_span = |key: ViewKey| env.strip.view(key).map(|v| (v.draw_x, v.width));
        match self {
            ActiveStrategy::InStrip(s) => view_span(s.interacting_view()),
            ActiveStrategy::SourceDragDrop(s) if s.is_off_strip() => None,
            ActiveStrategy::SourceDragDrop(s) => view_span(s.in_strip().interacting_view()),
            ActiveStrategy::ExternalDragDrop(s) if s.is_off_strip() => None,
            ActiveStrategy::ExternalDragDrop(_) => {
                let metrics = env.strip.metrics();
                let x = crate::utils::adjust_x_for_tab_drop(last_reorder_x, metrics.tab_width, metrics.rtl);
                Some((x, metrics.tab_width))
            }
        }
    }

    pub(crate) fn update(
        &mut self,
        env: &mut ReorderEnv<'_>,
        settings: &ReorderSettings,
        end_x: f32,
        delta_x: f32,
        reorder_type: ReorderType,
    ) -> UpdateOutcome {
        match self {
            ActiveStrategy::InStrip(s) => s.update(env, settings, delta_x),
            ActiveStrategy::SourceDragDrop(s) => s.update(env, settings, end_x, delta_x, reorder_type),
            ActiveStrategy::ExternalDragDrop(s) => s.update(env, settings, end_x, reorder_type),
        }
    }

    pub(crate) fn stop(self, env: &mut ReorderEnv<'_>, settings: &ReorderSettings) {
        match self {
            ActiveStrategy::InStrip(s) => s.stop(env, settings),
            ActiveStrategy::SourceDragDrop(s) => s.stop(env, settings),
            ActiveStrategy::ExternalDragDrop(s) => s.stop(env, settings),
        }
    }
}
