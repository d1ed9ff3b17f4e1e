// Drag session shared between the source strip, the native drag bridge and
// whichever strip the drag is dropped on. Replaces any process-wide tracker:
// every party holds an `Rc<DragSession>` for the lifetime of the gesture.

use std::cell::Cell;
use std::rc::Rc;

use crate::{GroupId, TabId, WindowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Tab,
    MultiTab,
    Group(GroupId),
}

#[derive(Debug)]
pub struct DragSession {
    source_window: WindowId,
    kind: DragKind,
    primary_tab: TabId,
    tab_ids: Vec<TabId>,
    incognito: bool,
    dragged_off_strip: Cell<bool>,
    dropped: Cell<bool>,
}

impl DragSession {
    pub fn new(
        source_window: WindowId,
        kind: DragKind,
        primary_tab: TabId,
        tab_ids: Vec<TabId>,
        incognito: bool,
    ) -> Rc<Self> {
        Rc::new(Self {
            source_window,
            kind,
            primary_tab,
            tab_ids,
            incognito,
            dragged_off_strip: Cell::new(false),
            dropped: Cell::new(false),
        })
    }

    pub fn source_window(&self) -> WindowId {
        self.source_window
    }

    pub fn kind(&self) -> DragKind {
        self.kind
    }

    pub fn primary_tab(&self) -> TabId {
        self.primary_tab
    }

    pub fn tab_ids(&self) -> &[TabId] {
        &self.tab_ids
    }

    pub fn is_incognito(&self) -> bool {
        self.incognito
    }

    pub fn is_group_drag(&self) -> bool {
        matches!(self.kind, DragKind::Group(_))
    }

    pub fn is_dragged_off_strip(&self) -> bool {
        self.dragged_off_strip.get()
    }

    pub fn set_dragged_off_strip(&self, off: bool) {
        self.dragged_off_strip.set(off);
    }

    pub fn is_dropped(&self) -> bool {
        self.dropped.get()
    }

    /// Mark the payload as consumed by a drop target.
    pub fn mark_dropped(&self) {
        self.dropped.set(true);
    }
}
