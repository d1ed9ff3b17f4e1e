// In-memory tab model (implements tabstrip_core::TabModel and
// tabstrip_core::TabGroupModelFilter over a single ordered Vec<Tab>)

mod scroller;

use std::collections::{BTreeMap, BTreeSet};

use tabstrip_core::{
    ActionConfirmationManager, ConfirmationKind, GroupId, MergeNotify, Tab, TabGroup,
    TabGroupModelFilter, TabId, TabModel, UngroupOutcome,
};

pub use scroller::StripScroller;

// ──────────────────────────────────────────────
// Confirmation preferences
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfirmationPrefs {
    /// User ticked "don't ask again" on the delete-group dialog.
    pub skip_ungroup_confirmation: bool,
}

impl ActionConfirmationManager for ConfirmationPrefs {
    fn will_skip_ungroup_tab_attempt(&self) -> bool {
        self.skip_ungroup_confirmation
    }
}

/// An ungroup request parked behind a confirmation dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingUngroup {
    pub tabs: Vec<TabId>,
    pub trailing: bool,
    pub kind: ConfirmationKind,
}

// ──────────────────────────────────────────────
// TabStripModel
// ──────────────────────────────────────────────

/// Tabs in strip order. Pinned tabs form a leading prefix and every group's
/// members are contiguous.
#[derive(Debug, Default)]
pub struct TabStripModel {
    pub(crate) tabs: Vec<Tab>,
    pub(crate) groups: BTreeMap<GroupId, TabGroup>,
    selected: Option<TabId>,
    multi_selected: BTreeSet<TabId>,
    next_group_id: u64,
    confirmations: ConfirmationPrefs,
    pending_ungroup: Option<PendingUngroup>,
}

impl TabStripModel {
    pub fn new() -> Self {
        Self {
            next_group_id: 1,
            ..Self::default()
        }
    }

    /// Build from tabs listed in order; groups referenced by the tabs must be
    /// listed in `groups`. Pinned tabs are moved to the front.
    pub fn with_tabs(tabs: Vec<Tab>, groups: Vec<TabGroup>) -> Self {
        let mut model = Self::new();
        let (pinned, unpinned): (Vec<Tab>, Vec<Tab>) = tabs.into_iter().partition(|t| t.pinned);
        model.tabs = pinned.into_iter().chain(unpinned).collect();
        for tab in &mut model.tabs {
            if tab.pinned {
                tab.group = None;
            }
        }
        for group in groups {
            model.next_group_id = model.next_group_id.max(group.id.0 + 1);
            model.groups.insert(group.id, group);
        }
        let groups = &model.groups;
        for tab in &mut model.tabs {
            if tab.group.is_some_and(|g| !groups.contains_key(&g)) {
                log::warn!("tab {} references unknown group, ungrouping", tab.id);
                tab.group = None;
            }
        }
        model.selected = model.tabs.first().map(|t| t.id);
        model
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn add_tab(&mut self, tab: Tab) {
        if tab.pinned {
            let at = self.first_non_pinned_index();
            self.tabs.insert(at, Tab { group: None, ..tab });
        } else {
            self.tabs.push(tab);
        }
        if self.selected.is_none() {
            self.selected = self.tabs.first().map(|t| t.id);
        }
    }

    /// Insert tabs arriving from another window at `index`.
    pub fn insert_tabs(&mut self, tabs: Vec<Tab>, index: usize) {
        let lo = self.first_non_pinned_index();
        let mut at = index.clamp(lo, self.tabs.len());
        for tab in tabs {
            self.tabs.insert(at, Tab { pinned: false, group: None, ..tab });
            at += 1;
        }
    }

    pub fn remove_tab(&mut self, id: TabId) -> Option<Tab> {
        let index = self.index_of(id)?;
        let tab = self.tabs.remove(index);
        self.multi_selected.remove(&id);
        if let Some(group) = tab.group {
            self.drop_group_if_empty(group);
        }
        if self.selected == Some(id) {
            let next = index.min(self.tabs.len().saturating_sub(1));
            self.selected = self.tabs.get(next).map(|t| t.id);
        }
        Some(tab)
    }

    /// Group `tabs` (which must be contiguous and unpinned) under a new group.
    pub fn create_group(&mut self, tabs: &[TabId], collapsed: bool) -> Option<GroupId> {
        let root = *tabs.first()?;
        let id = GroupId(self.next_group_id);
        self.next_group_id += 1;
        self.groups.insert(
            id,
            TabGroup {
                id,
                root_id: root,
                color: 0,
                collapsed,
                shared: false,
            },
        );
        for &tab_id in tabs {
            if let Some(tab) = self.tab_mut(tab_id) {
                if !tab.pinned {
                    tab.group = Some(id);
                }
            }
        }
        self.drop_group_if_empty(id);
        self.groups.contains_key(&id).then_some(id)
    }

    pub fn set_group_collapsed(&mut self, group: GroupId, collapsed: bool) {
        if let Some(g) = self.groups.get_mut(&group) {
            g.collapsed = collapsed;
        }
    }

    pub fn set_group_shared(&mut self, group: GroupId, shared: bool) {
        if let Some(g) = self.groups.get_mut(&group) {
            g.shared = shared;
        }
    }

    pub fn select_tab(&mut self, id: TabId) {
        if self.index_of(id).is_some() {
            self.selected = Some(id);
        }
    }

    /// Replace the multi-selection. The selected tab is always part of it.
    pub fn set_multi_selected(&mut self, ids: &[TabId]) {
        self.multi_selected = ids.iter().copied().filter(|&id| self.index_of(id).is_some()).collect();
        if let Some(selected) = self.selected {
            if !self.multi_selected.is_empty() {
                self.multi_selected.insert(selected);
            }
        }
    }

    pub fn confirmations_mut(&mut self) -> &mut ConfirmationPrefs {
        &mut self.confirmations
    }

    pub fn pending_ungroup(&self) -> Option<&PendingUngroup> {
        self.pending_ungroup.as_ref()
    }

    /// Answer the dialog behind a pending ungroup. Returns whether tabs
    /// were ungrouped.
    pub fn resolve_pending_ungroup(&mut self, accepted: bool) -> bool {
        let Some(pending) = self.pending_ungroup.take() else {
            return false;
        };
        if !accepted {
            log::debug!("ungroup of {:?} cancelled by user", pending.tabs);
            return false;
        }
        self.apply_ungroup(&pending.tabs, pending.trailing);
        true
    }

    fn tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    fn drop_group_if_empty(&mut self, group: GroupId) {
        let members: Vec<TabId> = self.tabs_in_group(group);
        match members.first() {
            None => {
                self.groups.remove(&group);
            }
            Some(&first) => {
                if let Some(g) = self.groups.get_mut(&group) {
                    if !members.contains(&g.root_id) {
                        g.root_id = first;
                    }
                }
            }
        }
    }

    /// Pinned tabs stay in the pinned prefix, unpinned tabs after it.
    fn clamp_to_pin_section(&self, pinned: bool, index: usize) -> usize {
        let boundary = self.first_non_pinned_index();
        if pinned {
            index.min(boundary)
        } else {
            index.clamp(boundary, self.tabs.len())
        }
    }

    fn apply_ungroup(&mut self, tabs: &[TabId], trailing: bool) {
        let ordered: Vec<TabId> = if trailing {
            tabs.iter().rev().copied().collect()
        } else {
            tabs.to_vec()
        };
        for id in ordered {
            let Some(group) = self.group_of(id) else {
                continue;
            };
            let others: Vec<TabId> = self.tabs_in_group(group).into_iter().filter(|&t| t != id).collect();
            if let (Some(&first), Some(&last)) = (others.first(), others.last()) {
                let dest = if trailing {
                    self.index_of(last).map(|i| i + 1)
                } else {
                    self.index_of(first)
                };
                if let Some(dest) = dest {
                    self.move_tab(id, dest);
                }
            }
            if let Some(tab) = self.tab_mut(id) {
                tab.group = None;
            }
            log::debug!("ungrouped tab {} from {:?}", id, group);
            self.drop_group_if_empty(group);
        }
    }
}

impl TabModel for TabStripModel {
    fn count(&self) -> usize {
        self.tabs.len()
    }

    fn tab_at(&self, index: usize) -> Option<&Tab> {
        self.tabs.get(index)
    }

    fn tab_by_id(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    fn move_tab(&mut self, id: TabId, new_index: usize) -> bool {
        let Some(current) = self.index_of(id) else {
            return false;
        };
        let pinned = self.tabs[current].pinned;
        let mut new_index = self.clamp_to_pin_section(pinned, new_index);
        if current == new_index || current + 1 == new_index {
            return false;
        }
        let tab = self.tabs.remove(current);
        if current < new_index {
            new_index -= 1;
        }
        self.tabs.insert(new_index, tab);
        log::debug!("moved tab {} from {} to {}", id, current, new_index);
        true
    }

    fn index(&self) -> Option<usize> {
        self.selected.and_then(|id| self.index_of(id))
    }

    fn set_index(&mut self, index: usize) {
        if let Some(tab) = self.tabs.get(index) {
            self.selected = Some(tab.id);
        }
    }

    fn first_non_pinned_index(&self) -> usize {
        self.tabs.iter().take_while(|t| t.pinned).count()
    }

    fn is_multi_selected(&self, id: TabId) -> bool {
        self.multi_selected.contains(&id)
    }

    fn multi_selected_tabs(&self) -> Vec<TabId> {
        self.tabs
            .iter()
            .filter(|t| self.multi_selected.contains(&t.id))
            .map(|t| t.id)
            .collect()
    }
}

impl TabGroupModelFilter for TabStripModel {
    fn tab_model(&self) -> &dyn TabModel {
        self
    }

    fn tab_model_mut(&mut self) -> &mut dyn TabModel {
        self
    }

    fn group(&self, id: GroupId) -> Option<&TabGroup> {
        self.groups.get(&id)
    }

    fn tabs_in_group(&self, group: GroupId) -> Vec<TabId> {
        self.tabs
            .iter()
            .filter(|t| t.group == Some(group))
            .map(|t| t.id)
            .collect()
    }

    fn merge_list_of_tabs_to_group(
        &mut self,
        tabs: &[TabId],
        dest_tab: TabId,
        index_in_group: Option<usize>,
        notify: MergeNotify,
    ) {
        let Some(dest) = self.tab_by_id(dest_tab).cloned() else {
            return;
        };
        if dest.pinned {
            log::warn!("cannot merge into pinned tab {}", dest_tab);
            return;
        }
        let group = match dest.group {
            Some(group) => group,
            None => match self.create_group(&[dest_tab], false) {
                Some(group) => group,
                None => return,
            },
        };

        let mut slot = index_in_group;
        for &id in tabs {
            if id == dest_tab {
                continue;
            }
            let Some(tab) = self.tab_by_id(id).cloned() else {
                continue;
            };
            if tab.pinned {
                log::warn!("skipping pinned tab {} in merge", id);
                continue;
            }
            if let Some(old) = tab.group {
                if let Some(t) = self.tab_mut(id) {
                    t.group = None;
                }
                self.drop_group_if_empty(old);
            }
            let members: Vec<TabId> = self.tabs_in_group(group);
            let target = match slot {
                Some(i) if i < members.len() => self.index_of(members[i]),
                _ => members.last().and_then(|&last| self.index_of(last)).map(|i| i + 1),
            };
            if let Some(target) = target {
                self.move_tab(id, target);
            }
            if let Some(t) = self.tab_mut(id) {
                t.group = Some(group);
            }
            slot = slot.map(|i| i + 1);
        }
        log::debug!("merged {:?} into {:?} ({:?})", tabs, group, notify);
    }

    fn ungroup_tabs(&mut self, tabs: &[TabId], trailing: bool, allow_dialog: bool) -> UngroupOutcome {
        let grouped: Vec<TabId> = tabs.iter().copied().filter(|&id| self.group_of(id).is_some()).collect();
        if grouped.is_empty() {
            return UngroupOutcome::Noop;
        }

        if allow_dialog {
            let emptied = grouped.iter().filter_map(|&id| self.group_of(id)).find(|&group| {
                self.tabs_in_group(group).iter().all(|member| grouped.contains(member))
            });
            if let Some(group) = emptied {
                let shared = self.groups.get(&group).is_some_and(|g| g.shared);
                let kind = if shared {
                    Some(ConfirmationKind::Collaboration)
                } else if !self.confirmations.will_skip_ungroup_tab_attempt() {
                    Some(ConfirmationKind::Sync)
                } else {
                    None
                };
                if let Some(kind) = kind {
                    log::debug!("ungroup of {:?} awaiting {:?} confirmation", grouped, kind);
                    self.pending_ungroup = Some(PendingUngroup {
                        tabs: grouped,
                        trailing,
                        kind,
                    });
                    return UngroupOutcome::AwaitingConfirmation(kind);
                }
            }
        }

        self.apply_ungroup(&grouped, trailing);
        UngroupOutcome::Ungrouped
    }

    fn move_related_tabs(&mut self, anchor: TabId, dest_index: usize) {
        let related = self.related_tab_list(anchor);
        let (Some(&first_id), Some(&last_id)) = (related.first(), related.last()) else {
            return;
        };
        if related.len() == 1 {
            self.move_tab(anchor, dest_index);
            return;
        }
        let (Some(first), Some(last)) = (self.index_of(first_id), self.index_of(last_id)) else {
            return;
        };
        let mut dest = self.clamp_to_pin_section(false, dest_index);
        if dest >= first && dest <= last + 1 {
            return;
        }
        let range: Vec<Tab> = self.tabs.drain(first..=last).collect();
        if dest > last {
            dest -= range.len();
        }
        let len = range.len();
        for (offset, tab) in range.into_iter().enumerate() {
            self.tabs.insert(dest + offset, tab);
        }
        log::debug!("moved {} related tabs of {} from {} to {}", len, anchor, first, dest);
    }

    fn action_confirmation_manager(&self) -> &dyn ActionConfirmationManager {
        &self.confirmations
    }
}
