// Core types and collaborator traits for the tab strip reorder engine.
// Everything the engine borrows from its host (tab model, animation driver,
// scroller, native drag source) is described here as a trait.

mod animation;
mod drag;
mod tests;
mod views;

use serde::{Deserialize, Serialize};

pub use animation::{AnimatedProperty, Animation, SettleAction, Transition, TransitionId};
pub use drag::{DragKind, DragSession};
pub use views::{GroupTitleView, StripViews, TabView, ViewKey, ViewState};

// ──────────────────────────────────────────────
// Geometry
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Fixed layout dimensions of the strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripMetrics {
    pub tab_width: f32,
    pub pinned_tab_width: f32,
    /// Horizontal overlap between neighbouring tabs.
    pub tab_overlap: f32,
    pub group_title_width: f32,
    /// Subtracted from an expanded group's underline so it ends inside the last member.
    pub bottom_indicator_width_offset: f32,
    pub strip_width: f32,
    pub strip_height: f32,
    pub start_padding: f32,
    pub rtl: bool,
}

impl Default for StripMetrics {
    fn default() -> Self {
        Self {
            tab_width: 156.0,
            pinned_tab_width: 56.0,
            tab_overlap: 28.0,
            group_title_width: 46.0,
            bottom_indicator_width_offset: 27.0,
            strip_width: 1200.0,
            strip_height: 40.0,
            start_padding: 0.0,
            rtl: false,
        }
    }
}

impl StripMetrics {
    pub fn tab_width_for(&self, pinned: bool) -> f32 {
        if pinned {
            self.pinned_tab_width
        } else {
            self.tab_width
        }
    }

    /// Width a tab actually advances the strip by.
    pub fn effective_tab_width(&self, pinned: bool) -> f32 {
        self.tab_width_for(pinned) - self.tab_overlap
    }

    pub fn half_tab_width(&self, pinned: bool) -> f32 {
        self.effective_tab_width(pinned) / 2.0
    }
}

// ──────────────────────────────────────────────
// Identity
// ──────────────────────────────────────────────

pub type TabId = i32;

/// Opaque token identifying a tab group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub u64);

/// Identifies the window a strip lives in.
pub type WindowId = u32;

// ──────────────────────────────────────────────
// Model entities
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub group: Option<GroupId>,
    #[serde(default)]
    pub incognito: bool,
}

impl Tab {
    pub fn new(id: TabId) -> Self {
        Self {
            id,
            pinned: false,
            group: None,
            incognito: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabGroup {
    pub id: GroupId,
    pub root_id: TabId,
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub collapsed: bool,
    /// Collaboration groups are shared with other users.
    #[serde(default)]
    pub shared: bool,
}

/// How a merge is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeNotify {
    Silent,
    ShowUndo,
}

/// Which confirmation a pending ungroup is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationKind {
    /// Deleting a synced group.
    Sync,
    /// Leaving or deleting a shared group.
    Collaboration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UngroupOutcome {
    /// Tabs were removed from their group.
    Ungrouped,
    /// Nothing to do (tabs were not grouped).
    Noop,
    /// A dialog is showing; the ungroup happens only if the user accepts.
    AwaitingConfirmation(ConfirmationKind),
}

/// Selects which strategy handles a reorder call and which path inside it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderType {
    StartDragDrop,
    DragWithinStrip,
    DragOntoStrip,
    DragOutOfStrip,
}

// ──────────────────────────────────────────────
// Trait: TabModel
// ──────────────────────────────────────────────

/// Ordered sequence of tabs. Pinned tabs always form a leading prefix.
pub trait TabModel {
    fn count(&self) -> usize;
    fn tab_at(&self, index: usize) -> Option<&Tab>;
    fn tab_by_id(&self, id: TabId) -> Option<&Tab>;
    fn index_of(&self, id: TabId) -> Option<usize>;
    /// Move `id` to the slot before the tab currently at `new_index`
    /// (`count()` appends). Returns whether the order changed.
    fn move_tab(&mut self, id: TabId, new_index: usize) -> bool;
    /// Index of the selected tab.
    fn index(&self) -> Option<usize>;
    fn set_index(&mut self, index: usize);
    fn first_non_pinned_index(&self) -> usize;
    fn is_multi_selected(&self, id: TabId) -> bool;
    /// Multi-selected tabs in model order.
    fn multi_selected_tabs(&self) -> Vec<TabId>;

    fn tab_ids(&self) -> Vec<TabId> {
        (0..self.count())
            .filter_map(|i| self.tab_at(i).map(|t| t.id))
            .collect()
    }

    fn selected_tab_id(&self) -> Option<TabId> {
        self.index().and_then(|i| self.tab_at(i)).map(|t| t.id)
    }
}

// ──────────────────────────────────────────────
// Trait: TabGroupModelFilter
// ──────────────────────────────────────────────

/// Group view over a `TabModel`: membership, merge, ungroup and range moves.
pub trait TabGroupModelFilter {
    fn tab_model(&self) -> &dyn TabModel;
    fn tab_model_mut(&mut self) -> &mut dyn TabModel;
    fn group(&self, id: GroupId) -> Option<&TabGroup>;
    /// Member tabs of `group` in model order.
    fn tabs_in_group(&self, group: GroupId) -> Vec<TabId>;
    fn merge_list_of_tabs_to_group(
        &mut self,
        tabs: &[TabId],
        dest_tab: TabId,
        index_in_group: Option<usize>,
        notify: MergeNotify,
    );
    fn ungroup_tabs(&mut self, tabs: &[TabId], trailing: bool, allow_dialog: bool) -> UngroupOutcome;
    /// Move every tab related to `anchor` so the range starts at the slot
    /// before the tab currently at `dest_index`.
    fn move_related_tabs(&mut self, anchor: TabId, dest_index: usize);
    fn action_confirmation_manager(&self) -> &dyn ActionConfirmationManager;

    fn is_tab_in_tab_group(&self, id: TabId) -> bool {
        self.group_of(id).is_some()
    }

    fn group_of(&self, id: TabId) -> Option<GroupId> {
        self.tab_model().tab_by_id(id).and_then(|t| t.group)
    }

    /// The tab's whole group, or just the tab itself when ungrouped.
    fn related_tab_list(&self, id: TabId) -> Vec<TabId> {
        match self.group_of(id) {
            Some(group) => self.tabs_in_group(group),
            None if self.tab_model().tab_by_id(id).is_some() => vec![id],
            None => Vec::new(),
        }
    }

    fn is_group_collapsed(&self, group: GroupId) -> bool {
        self.group(group).is_some_and(|g| g.collapsed)
    }
}

// ──────────────────────────────────────────────
// Trait: ActionConfirmationManager
// ──────────────────────────────────────────────

pub trait ActionConfirmationManager {
    /// True when the user opted out of the "delete group?" prompt.
    fn will_skip_ungroup_tab_attempt(&self) -> bool;
}

// ──────────────────────────────────────────────
// Trait: AnimationHost
// ──────────────────────────────────────────────

/// Drives view property animations. Transitions resolve asynchronously:
/// the host applies each animation's `from` value on start and, once the
/// transition completes (or is finished early), its end values followed by
/// its settle actions.
pub trait AnimationHost {
    fn finish_animations(&mut self, strip: &mut StripViews);
    fn start_animations(&mut self, strip: &mut StripViews, transition: Transition) -> TransitionId;

    fn finish_animations_and_push_tab_updates(&mut self, strip: &mut StripViews) {
        self.finish_animations(strip);
    }
}

// ──────────────────────────────────────────────
// Trait: StripUpdateDelegate
// ──────────────────────────────────────────────

pub trait StripUpdateDelegate {
    fn resize_tab_strip(&mut self, animate: bool, tab_to_animate: Option<TabId>, animate_added: bool);
    fn refresh(&mut self);
    fn set_compositor_buttons_visible(&mut self, visible: bool);
    fn perform_haptic_feedback(&mut self) {}
}

// ──────────────────────────────────────────────
// Trait: ScrollDelegate
// ──────────────────────────────────────────────

/// Owns the strip's scroll offset. Offsets are non-positive once scrolled
/// toward the end; in RTL the sign of their effect on draw positions flips.
pub trait ScrollDelegate {
    fn scroll_offset(&self) -> f32;
    /// Clamp and apply `offset`. Returns the delta actually applied.
    fn set_scroll_offset(&mut self, offset: f32) -> f32;
    /// False while a fling or scroll animation is still running.
    fn is_finished(&self) -> bool;
    fn reorder_start_margin(&self) -> f32;
    /// Reserve leading space during reorder. The scroll offset absorbs the
    /// change so nothing on screen moves.
    fn set_reorder_start_margin(&mut self, margin: f32);
}

// ──────────────────────────────────────────────
// Trait: TabDragSource
// ──────────────────────────────────────────────

/// Native platform drag-and-drop. Each call returns whether the platform
/// accepted the drag.
pub trait TabDragSource {
    fn start_tab_drag_action(&mut self, session: &DragSession, start_point: Vec2) -> bool;
    fn start_group_drag_action(&mut self, session: &DragSession, start_point: Vec2) -> bool;
    fn start_multi_tab_drag_action(&mut self, session: &DragSession, start_point: Vec2) -> bool;
}
