// Animation requests exchanged with the AnimationHost.
// A transition is plain data: property tweens plus settle actions that run
// once every tween has reached its end value.

use crate::{GroupId, StripViews, TabId, ViewKey};

pub type TransitionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatedProperty {
    OffsetX,
    OffsetY,
    TrailingMargin,
    /// Folio attachment: distance between a tab's bottom and the toolbar.
    BottomMargin,
    BottomIndicatorWidth,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub target: ViewKey,
    pub property: AnimatedProperty,
    pub from: f32,
    pub to: f32,
    pub duration_ms: u64,
    pub delay_ms: u64,
}

impl Animation {
    pub fn new(target: ViewKey, property: AnimatedProperty, from: f32, to: f32, duration_ms: u64) -> Self {
        Self {
            target,
            property,
            from,
            to,
            duration_ms,
            delay_ms: 0,
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Total time from transition start until this tween settles.
    pub fn end_ms(&self) -> u64 {
        self.delay_ms + self.duration_ms
    }
}

/// Cleanup deferred until a transition settles.
#[derive(Debug, Clone, PartialEq)]
pub enum SettleAction {
    ClearForeground(Vec<ViewKey>),
    ShowEndDivider(TabId),
    ShowGroupTitle(GroupId),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    pub animations: Vec<Animation>,
    pub on_end: Vec<SettleAction>,
}

impl Transition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, animation: Animation) {
        self.animations.push(animation);
    }

    pub fn then(&mut self, action: SettleAction) {
        self.on_end.push(action);
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty() && self.on_end.is_empty()
    }

    pub fn duration_ms(&self) -> u64 {
        self.animations.iter().map(Animation::end_ms).max().unwrap_or(0)
    }

    /// Apply the `from` value of every undelayed tween. Hosts call this when
    /// the transition starts.
    pub fn apply_start(&self, strip: &mut StripViews) {
        for anim in self.animations.iter().filter(|a| a.delay_ms == 0) {
            strip.set_property(anim.target, anim.property, anim.from);
        }
        strip.relayout();
    }

    /// Jump every tween to its end value and run the settle actions.
    pub fn finish(self, strip: &mut StripViews) {
        let mut ordered = self.animations;
        // Later-ending tweens on the same property win.
        ordered.sort_by_key(Animation::end_ms);
        for anim in &ordered {
            strip.set_property(anim.target, anim.property, anim.to);
        }
        for action in self.on_end {
            match action {
                SettleAction::ClearForeground(keys) => {
                    for key in keys {
                        if let Some(state) = strip.view_mut(key) {
                            state.foregrounded = false;
                        }
                    }
                }
                SettleAction::ShowEndDivider(id) => {
                    if let Some(tab) = strip.tab_mut(id) {
                        tab.force_hide_end_divider = false;
                    }
                }
                SettleAction::ShowGroupTitle(group) => {
                    if let Some(title) = strip.title_mut(group) {
                        title.state.visible = true;
                    }
                }
            }
        }
        strip.relayout();
    }
}
