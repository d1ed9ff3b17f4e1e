use tabstrip_core::ScrollDelegate;

/// Scroll state of a strip. Offsets run from 0 (start edge visible) down to
/// `min_offset` (fully scrolled toward the end).
#[derive(Debug, Clone)]
pub struct StripScroller {
    offset: f32,
    min_offset: f32,
    start_margin: f32,
    finished: bool,
}

impl StripScroller {
    pub fn new(min_offset: f32) -> Self {
        Self {
            offset: 0.0,
            min_offset: min_offset.min(0.0),
            start_margin: 0.0,
            finished: true,
        }
    }

    /// Content wider than the visible strip can scroll by the difference.
    pub fn for_content(content_width: f32, visible_width: f32) -> Self {
        Self::new(visible_width - content_width)
    }

    pub fn set_min_offset(&mut self, min_offset: f32) {
        self.min_offset = min_offset.min(0.0);
    }

    /// Simulates a fling in progress (false) or settled (true).
    pub fn set_finished(&mut self, finished: bool) {
        self.finished = finished;
    }
}

impl Default for StripScroller {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl ScrollDelegate for StripScroller {
    fn scroll_offset(&self) -> f32 {
        self.offset
    }

    fn set_scroll_offset(&mut self, offset: f32) -> f32 {
        // The reorder start margin extends the scrollable range.
        let min = self.min_offset - self.start_margin;
        let clamped = offset.clamp(min, 0.0);
        let delta = clamped - self.offset;
        self.offset = clamped;
        delta
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn reorder_start_margin(&self) -> f32 {
        self.start_margin
    }

    fn set_reorder_start_margin(&mut self, margin: f32) {
        let delta = margin - self.start_margin;
        self.start_margin = margin;
        let min = self.min_offset - self.start_margin;
        self.offset = (self.offset - delta).clamp(min, 0.0);
    }
}
