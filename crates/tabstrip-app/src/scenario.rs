// Scripted drag scenarios: a strip to start from plus the pointer and
// keyboard events to feed the reorder delegate.

use std::path::Path;

use serde::Deserialize;
use tabstrip_core::{
    AnimationHost, DragKind, DragSession, GroupId, ReorderType, StripUpdateDelegate, StripViews, Tab, TabGroup,
    TabGroupModelFilter, TabId, Transition, TransitionId, Vec2, ViewKey, WindowId,
};
use tabstrip_model::{StripScroller, TabStripModel};
use tabstrip_reorder::{ReorderDelegate, ReorderEnv, StrategyKind};

use crate::settings::AppSettings;

const REPLAY_WINDOW: WindowId = 1;
/// Window that external drops pretend to come from.
const DROP_SOURCE_WINDOW: WindowId = 2;

// ──────────────────────────────────────────────
// Scenario file
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewRef {
    Tab(TabId),
    Group(GroupId),
}

impl From<ViewRef> for ViewKey {
    fn from(view: ViewRef) -> Self {
        match view {
            ViewRef::Tab(id) => ViewKey::Tab(id),
            ViewRef::Group(group) => ViewKey::GroupTitle(group),
        }
    }
}

fn within_strip() -> ReorderType {
    ReorderType::DragWithinStrip
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Start {
        view: ViewRef,
        x: f32,
        #[serde(default = "within_strip")]
        kind: ReorderType,
    },
    Move {
        x: f32,
        #[serde(default = "within_strip")]
        kind: ReorderType,
    },
    ScrollTick {
        time_ms: u64,
        #[serde(default)]
        left_margin: f32,
        #[serde(default)]
        right_margin: f32,
    },
    Stop,
    /// Tabs arriving from another window, inserted at `index`.
    Drop {
        tabs: Vec<TabId>,
        index: usize,
        #[serde(default)]
        incognito: bool,
    },
    Keyboard {
        view: ViewRef,
        toward_end: bool,
    },
    /// Answer a pending ungroup dialog.
    Confirm {
        accepted: bool,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub tabs: Vec<Tab>,
    #[serde(default)]
    pub groups: Vec<TabGroup>,
    #[serde(default)]
    pub selected: Option<TabId>,
    #[serde(default)]
    pub multi_selected: Vec<TabId>,
    #[serde(default)]
    pub skip_ungroup_confirmation: bool,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

// ──────────────────────────────────────────────
// Host collaborators
// ──────────────────────────────────────────────

/// No frames to render, so every transition lands at once.
struct SettleImmediately;

impl AnimationHost for SettleImmediately {
    fn finish_animations(&mut self, _strip: &mut StripViews) {}

    fn start_animations(&mut self, strip: &mut StripViews, transition: Transition) -> TransitionId {
        transition.finish(strip);
        0
    }
}

#[derive(Debug, Default)]
struct StripEvents {
    refreshes: usize,
    resizes: usize,
}

impl StripUpdateDelegate for StripEvents {
    fn resize_tab_strip(&mut self, _animate: bool, tab_to_animate: Option<TabId>, _animate_added: bool) {
        self.resizes += 1;
        log::trace!("resize strip (animate tab {:?})", tab_to_animate);
    }

    fn refresh(&mut self) {
        self.refreshes += 1;
    }

    fn set_compositor_buttons_visible(&mut self, visible: bool) {
        log::trace!("compositor buttons visible: {}", visible);
    }
}

/// Logical width of everything on the strip.
fn content_width(strip: &StripViews) -> f32 {
    let overlap = strip.metrics().tab_overlap;
    let advance: f32 = strip
        .order()
        .iter()
        .filter_map(|&key| strip.view(key).map(|state| (key, state)))
        .filter(|(_, state)| state.occupies_strip())
        .map(|(key, state)| match key {
            ViewKey::Tab(_) => state.width - overlap,
            ViewKey::GroupTitle(_) => state.width,
        })
        .sum();
    advance + overlap
}

// ──────────────────────────────────────────────
// Replay
// ──────────────────────────────────────────────

pub struct Replay {
    model: TabStripModel,
    strip: StripViews,
    scroller: StripScroller,
    host: SettleImmediately,
    events: StripEvents,
    delegate: ReorderDelegate,
    last_x: f32,
}

impl Replay {
    pub fn new(scenario: &Scenario, settings: &AppSettings) -> Self {
        let mut model = TabStripModel::with_tabs(scenario.tabs.clone(), scenario.groups.clone());
        if let Some(id) = scenario.selected {
            model.select_tab(id);
        }
        model.set_multi_selected(&scenario.multi_selected);
        model.confirmations_mut().skip_ungroup_confirmation = scenario.skip_ungroup_confirmation;

        let mut strip = StripViews::new(settings.layout);
        strip.sync_with_model(&model);
        let scroller = StripScroller::for_content(content_width(&strip), settings.layout.strip_width);

        Self {
            model,
            strip,
            scroller,
            host: SettleImmediately,
            events: StripEvents::default(),
            delegate: ReorderDelegate::new(settings.reorder.clone(), REPLAY_WINDOW),
            last_x: 0.0,
        }
    }

    fn with_env<R>(&mut self, f: impl FnOnce(&mut ReorderDelegate, &mut ReorderEnv<'_>) -> R) -> R {
        let mut env = ReorderEnv::new(
            &mut self.model,
            &mut self.strip,
            &mut self.scroller,
            &mut self.host,
            &mut self.events,
        );
        f(&mut self.delegate, &mut env)
    }

    pub fn run(&mut self, steps: &[Step]) {
        for (i, step) in steps.iter().enumerate() {
            log::debug!("step {}: {:?}", i, step);
            self.apply(step);
        }
        if self.delegate.in_reorder_mode() {
            log::warn!("scenario ended mid-drag, stopping reorder");
            self.with_env(|delegate, env| delegate.stop_reorder_mode(env));
        }
        log::debug!(
            "replay done: {} refreshes, {} resizes",
            self.events.refreshes,
            self.events.resizes
        );
    }

    pub fn apply(&mut self, step: &Step) {
        let reordering = self.delegate.in_reorder_mode();
        match *step {
            Step::Start { view, x, kind } => {
                if reordering {
                    log::warn!("ignoring start: already reordering");
                    return;
                }
                self.last_x = x;
                self.with_env(|delegate, env| {
                    delegate.start_reorder_mode(env, view.into(), Vec2::new(x, 0.0), kind)
                });
            }
            Step::Move { x, kind } => {
                if !reordering {
                    log::warn!("ignoring move outside reorder mode");
                    return;
                }
                let delta = x - self.last_x;
                self.last_x = x;
                self.with_env(|delegate, env| delegate.update_reorder_position(env, x, delta, kind));
            }
            Step::ScrollTick {
                time_ms,
                left_margin,
                right_margin,
            } => {
                if !reordering {
                    log::warn!("ignoring scroll tick outside reorder mode");
                    return;
                }
                let width = self.strip.metrics().strip_width;
                self.with_env(|delegate, env| {
                    delegate.update_reorder_position_auto_scroll(env, time_ms, width, left_margin, right_margin)
                });
            }
            Step::Stop => {
                if !reordering {
                    log::warn!("ignoring stop outside reorder mode");
                    return;
                }
                self.with_env(|delegate, env| delegate.stop_reorder_mode(env));
            }
            Step::Drop {
                ref tabs,
                index,
                incognito,
            } => self.drop_tabs(tabs, index, incognito),
            Step::Keyboard { view, toward_end } => {
                self.with_env(|delegate, env| delegate.reorder_view_in_direction(env, view.into(), toward_end));
            }
            Step::Confirm { accepted } => {
                self.model.resolve_pending_ungroup(accepted);
                self.with_env(|delegate, env| delegate.on_ungroup_confirmation_result(env, accepted));
            }
        }
    }

    fn drop_tabs(&mut self, tabs: &[TabId], index: usize, incognito: bool) {
        if self.delegate.active_strategy() != Some(StrategyKind::ExternalDragDrop) {
            log::warn!("ignoring drop: no external drag in progress");
            return;
        }
        let Some(&primary) = tabs.first() else {
            log::warn!("ignoring drop without tabs");
            return;
        };
        let kind = if tabs.len() > 1 { DragKind::MultiTab } else { DragKind::Tab };
        let session = DragSession::new(DROP_SOURCE_WINDOW, kind, primary, tabs.to_vec(), incognito);

        let incoming = tabs.iter().map(|&id| Tab { incognito, ..Tab::new(id) }).collect();
        self.model.insert_tabs(incoming, index);
        let merged = self.with_env(|delegate, env| delegate.handle_tab_drop_for_external_view(env, &session, index));
        self.strip.sync_with_model(&self.model);
        log::debug!("dropped {:?} at {} (merged: {})", tabs, index, merged);
    }

    pub fn pending_confirmation(&self) -> bool {
        self.model.pending_ungroup().is_some()
    }

    /// One line per strip: pinned tabs as `P<id>`, expanded groups as
    /// `G<id>(...)`, collapsed groups as `G<id>[...]`.
    pub fn render(&self) -> String {
        let tabs = self.model.tabs();
        let mut parts = Vec::new();
        let mut i = 0;
        while i < tabs.len() {
            let tab = &tabs[i];
            match tab.group {
                Some(group) => {
                    let members: Vec<String> = tabs[i..]
                        .iter()
                        .take_while(|t| t.group == Some(group))
                        .map(|t| t.id.to_string())
                        .collect();
                    i += members.len();
                    let (open, close) = if self.model.is_group_collapsed(group) {
                        ('[', ']')
                    } else {
                        ('(', ')')
                    };
                    parts.push(format!("G{}{}{}{}", group.0, open, members.join(" "), close));
                }
                None => {
                    parts.push(if tab.pinned {
                        format!("P{}", tab.id)
                    } else {
                        tab.id.to_string()
                    });
                    i += 1;
                }
            }
        }
        parts.join(" ")
    }
}
