use tabstrip_core::{
    AnimationHost, ScrollDelegate, StripUpdateDelegate, StripViews, TabDragSource, TabGroupModelFilter,
    TabModel, Transition, ViewKey,
};

/// Collaborators borrowed for the duration of one delegate call. The engine
/// never owns the model or the views.
pub struct ReorderEnv<'a> {
    pub filter: &'a mut dyn TabGroupModelFilter,
    pub strip: &'a mut StripViews,
    pub scroll: &'a mut dyn ScrollDelegate,
    pub animations: &'a mut dyn AnimationHost,
    pub updates: &'a mut dyn StripUpdateDelegate,
    pub drag_source: Option<&'a mut dyn TabDragSource>,
}

impl<'a> ReorderEnv<'a> {
    pub fn new(
        filter: &'a mut dyn TabGroupModelFilter,
        strip: &'a mut StripViews,
        scroll: &'a mut dyn ScrollDelegate,
        animations: &'a mut dyn AnimationHost,
        updates: &'a mut dyn StripUpdateDelegate,
    ) -> Self {
        Self {
            filter,
            strip,
            scroll,
            animations,
            updates,
            drag_source: None,
        }
    }

    pub fn with_drag_source(mut self, drag_source: &'a mut dyn TabDragSource) -> Self {
        self.drag_source = Some(drag_source);
        self
    }

    pub(crate) fn model(&self) -> &dyn TabModel {
        self.filter.tab_model()
    }

    pub(crate) fn is_rtl(&self) -> bool {
        self.strip.is_rtl()
    }

    /// Re-sync views after a model mutation.
    pub(crate) fn rebuild(&mut self) {
        self.strip.sync_with_model(&*self.filter);
        self.relayout();
    }

    pub(crate) fn relayout(&mut self) {
        self.strip
            .set_scroll(self.scroll.reorder_start_margin(), self.scroll.scroll_offset());
    }

    pub(crate) fn set_reorder_start_margin(&mut self, margin: f32) {
        self.scroll.set_reorder_start_margin(margin);
        self.relayout();
    }

    pub(crate) fn finish_animations(&mut self) {
        self.animations.finish_animations(self.strip);
    }

    pub(crate) fn finish_animations_and_push_tab_updates(&mut self) {
        self.animations.finish_animations_and_push_tab_updates(self.strip);
    }

    pub(crate) fn start_transition(&mut self, transition: Transition) {
        if transition.is_empty() {
            return;
        }
        self.animations.start_animations(self.strip, transition);
    }

    /// On-screen position of `key` with its drag offset removed.
    pub(crate) fn rest_x(&self, key: ViewKey) -> f32 {
        self.strip.view(key).map_or(0.0, |v| v.draw_x - v.offset_x)
    }
}
