// Visual layer state: one view per tab plus one title per group, kept in
// model order. Reorder strategies mutate offsets and margins here; the
// resting (ideal) positions are recomputed by `relayout`.

use crate::{AnimatedProperty, GroupId, StripMetrics, TabGroupModelFilter, TabId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKey {
    Tab(TabId),
    GroupTitle(GroupId),
}

impl ViewKey {
    pub fn tab_id(self) -> Option<TabId> {
        match self {
            ViewKey::Tab(id) => Some(id),
            ViewKey::GroupTitle(_) => None,
        }
    }

    pub fn group_id(self) -> Option<GroupId> {
        match self {
            ViewKey::GroupTitle(id) => Some(id),
            ViewKey::Tab(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub draw_x: f32,
    pub draw_y: f32,
    /// Resting position absent any drag offset.
    pub ideal_x: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub trailing_margin: f32,
    /// Drawn above siblings.
    pub foregrounded: bool,
    /// Tab hidden inside a collapsed group.
    pub collapsed: bool,
    pub dragged_off_strip: bool,
    pub visible: bool,
}

impl ViewState {
    fn new(width: f32) -> Self {
        Self {
            draw_x: 0.0,
            draw_y: 0.0,
            ideal_x: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            width,
            trailing_margin: 0.0,
            foregrounded: false,
            collapsed: false,
            dragged_off_strip: false,
            visible: true,
        }
    }

    /// Whether the view takes space on the strip.
    pub fn occupies_strip(&self) -> bool {
        !self.collapsed && !self.dragged_off_strip
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabView {
    pub id: TabId,
    pub pinned: bool,
    pub group: Option<GroupId>,
    pub bottom_margin: f32,
    pub force_hide_end_divider: bool,
    pub state: ViewState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupTitleView {
    pub group_id: GroupId,
    pub root_id: TabId,
    /// Width of the underline beneath the group's members.
    pub bottom_indicator_width: f32,
    pub collapsed: bool,
    pub shared: bool,
    pub state: ViewState,
}

pub struct StripViews {
    metrics: StripMetrics,
    tabs: Vec<TabView>,
    titles: Vec<GroupTitleView>,
    order: Vec<ViewKey>,
    start_margin: f32,
    scroll_offset: f32,
}

impl StripViews {
    pub fn new(metrics: StripMetrics) -> Self {
        Self {
            metrics,
            tabs: Vec::new(),
            titles: Vec::new(),
            order: Vec::new(),
            start_margin: 0.0,
            scroll_offset: 0.0,
        }
    }

    pub fn metrics(&self) -> &StripMetrics {
        &self.metrics
    }

    pub fn is_rtl(&self) -> bool {
        self.metrics.rtl
    }

    /// Tab views in model order.
    pub fn tabs(&self) -> &[TabView] {
        &self.tabs
    }

    pub fn titles(&self) -> &[GroupTitleView] {
        &self.titles
    }

    /// Every view in visual order; a group's title precedes its members.
    pub fn order(&self) -> &[ViewKey] {
        &self.order
    }

    pub fn start_margin(&self) -> f32 {
        self.start_margin
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn tab(&self, id: TabId) -> Option<&TabView> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn tab_mut(&mut self, id: TabId) -> Option<&mut TabView> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn tab_index(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    pub fn title(&self, group: GroupId) -> Option<&GroupTitleView> {
        self.titles.iter().find(|t| t.group_id == group)
    }

    pub fn title_mut(&mut self, group: GroupId) -> Option<&mut GroupTitleView> {
        self.titles.iter_mut().find(|t| t.group_id == group)
    }

    pub fn view(&self, key: ViewKey) -> Option<&ViewState> {
        match key {
            ViewKey::Tab(id) => self.tab(id).map(|t| &t.state),
            ViewKey::GroupTitle(group) => self.title(group).map(|t| &t.state),
        }
    }

    pub fn view_mut(&mut self, key: ViewKey) -> Option<&mut ViewState> {
        match key {
            ViewKey::Tab(id) => self.tab_mut(id).map(|t| &mut t.state),
            ViewKey::GroupTitle(group) => self.title_mut(group).map(|t| &mut t.state),
        }
    }

    pub fn offset_x(&self, key: ViewKey) -> f32 {
        self.view(key).map_or(0.0, |v| v.offset_x)
    }

    pub fn ideal_x(&self, key: ViewKey) -> f32 {
        self.view(key).map_or(0.0, |v| v.ideal_x)
    }

    pub fn set_offset_x(&mut self, key: ViewKey, offset: f32) {
        if let Some(state) = self.view_mut(key) {
            state.offset_x = offset;
        }
        self.relayout();
    }

    /// Member tab ids of `group` in model order.
    pub fn group_members(&self, group: GroupId) -> Vec<TabId> {
        self.tabs
            .iter()
            .filter(|t| t.group == Some(group))
            .map(|t| t.id)
            .collect()
    }

    pub fn set_scroll(&mut self, start_margin: f32, scroll_offset: f32) {
        self.start_margin = start_margin;
        self.scroll_offset = scroll_offset;
        self.relayout();
    }

    pub fn set_property(&mut self, key: ViewKey, property: AnimatedProperty, value: f32) {
        match (key, property) {
            (ViewKey::Tab(id), AnimatedProperty::BottomMargin) => {
                if let Some(tab) = self.tab_mut(id) {
                    tab.bottom_margin = value;
                }
            }
            (ViewKey::GroupTitle(group), AnimatedProperty::BottomIndicatorWidth) => {
                if let Some(title) = self.title_mut(group) {
                    title.bottom_indicator_width = value;
                }
            }
            (_, AnimatedProperty::BottomMargin | AnimatedProperty::BottomIndicatorWidth) => {}
            (key, property) => {
                if let Some(state) = self.view_mut(key) {
                    match property {
                        AnimatedProperty::OffsetX => state.offset_x = value,
                        AnimatedProperty::OffsetY => state.offset_y = value,
                        AnimatedProperty::TrailingMargin => state.trailing_margin = value.max(0.0),
                        _ => {}
                    }
                }
            }
        }
    }

    /// Rebuild views from the model, keeping per-view drag state of views
    /// that survive.
    pub fn sync_with_model(&mut self, filter: &dyn TabGroupModelFilter) {
        let model = filter.tab_model();
        let mut old_tabs = std::mem::take(&mut self.tabs);
        let mut old_titles = std::mem::take(&mut self.titles);
        self.order.clear();

        let mut current_group = None;
        for index in 0..model.count() {
            let Some(tab) = model.tab_at(index) else {
                continue;
            };
            let collapsed = tab.group.is_some_and(|g| filter.is_group_collapsed(g));

            if tab.group != current_group {
                current_group = tab.group;
                if let Some(group_id) = tab.group {
                    let shared = filter.group(group_id).is_some_and(|g| g.shared);
                    let root_id = filter.group(group_id).map_or(tab.id, |g| g.root_id);
                    let mut title = match old_titles.iter().position(|t| t.group_id == group_id) {
                        Some(pos) => old_titles.swap_remove(pos),
                        None => GroupTitleView {
                            group_id,
                            root_id,
                            bottom_indicator_width: 0.0,
                            collapsed,
                            shared,
                            state: ViewState::new(self.metrics.group_title_width),
                        },
                    };
                    title.root_id = root_id;
                    title.shared = shared;
                    title.collapsed = collapsed;
                    self.titles.push(title);
                    self.order.push(ViewKey::GroupTitle(group_id));
                }
            }

            let mut view = match old_tabs.iter().position(|t| t.id == tab.id) {
                Some(pos) => old_tabs.swap_remove(pos),
                None => TabView {
                    id: tab.id,
                    pinned: tab.pinned,
                    group: tab.group,
                    bottom_margin: 0.0,
                    force_hide_end_divider: false,
                    state: ViewState::new(self.metrics.tab_width_for(tab.pinned)),
                },
            };
            view.pinned = tab.pinned;
            view.group = tab.group;
            view.state.width = self.metrics.tab_width_for(tab.pinned);
            view.state.collapsed = collapsed;
            view.state.visible = !collapsed;
            self.tabs.push(view);
            self.order.push(ViewKey::Tab(tab.id));
        }

        self.update_bottom_indicators();
        self.relayout();
    }

    fn update_bottom_indicators(&mut self) {
        let effective = self.metrics.effective_tab_width(false);
        let title_width = self.metrics.group_title_width;
        let offset = self.metrics.bottom_indicator_width_offset;
        for title in &mut self.titles {
            if title.collapsed {
                title.bottom_indicator_width = 0.0;
                continue;
            }
            let members = self
                .tabs
                .iter()
                .filter(|t| t.group == Some(title.group_id) && t.state.occupies_strip())
                .count();
            title.bottom_indicator_width = if members == 0 {
                0.0
            } else {
                effective * members as f32 + title_width - offset
            };
        }
    }

    /// Recompute ideal and draw positions from the current order, margins
    /// and scroll offset.
    pub fn relayout(&mut self) {
        let rtl = self.metrics.rtl;
        let strip_width = self.metrics.strip_width;
        let overlap = self.metrics.tab_overlap;
        let scroll = if rtl { -self.scroll_offset } else { self.scroll_offset };
        let mut pos = self.metrics.start_padding + self.start_margin;

        for i in 0..self.order.len() {
            let key = self.order[i];
            let is_tab = matches!(key, ViewKey::Tab(_));
            let Some(state) = self.view_mut(key) else {
                continue;
            };
            state.ideal_x = if rtl { strip_width - pos - state.width } else { pos };
            state.draw_x = state.ideal_x + state.offset_x + scroll;
            state.draw_y = state.offset_y;
            if state.occupies_strip() {
                let advance = if is_tab { state.width - overlap } else { state.width };
                pos += advance + state.trailing_margin;
            }
        }
    }

    /// The view whose on-screen span contains `x`. Returns `None` when `x`
    /// lies before the first view; positions past the end resolve to the
    /// last view.
    pub fn view_at_x(&self, x: f32) -> Option<ViewKey> {
        let rtl = self.metrics.rtl;
        let overlap = self.metrics.tab_overlap;
        let mut first = None;
        let mut last = None;
        for &key in &self.order {
            let Some(state) = self.view(key) else {
                continue;
            };
            if !state.occupies_strip() {
                continue;
            }
            let advance = match key {
                ViewKey::Tab(_) => state.width - overlap,
                ViewKey::GroupTitle(_) => state.width,
            } + state.trailing_margin;
            let (start, end) = if rtl {
                (state.draw_x + state.width - advance, state.draw_x + state.width)
            } else {
                (state.draw_x, state.draw_x + advance)
            };
            if x >= start && x < end {
                return Some(key);
            }
            if first.is_none() {
                first = Some((start, end));
            }
            last = Some(key);
        }
        let (start, end) = first?;
        let before_first = if rtl { x >= end } else { x < start };
        if before_first {
            None
        } else {
            last
        }
    }
}
