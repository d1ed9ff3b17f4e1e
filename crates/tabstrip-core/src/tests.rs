#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    struct NeverSkip;

    impl ActionConfirmationManager for NeverSkip {
        fn will_skip_ungroup_tab_attempt(&self) -> bool {
            false
        }
    }

    /// Read-only model: enough to drive `StripViews::sync_with_model`.
    struct FixedModel {
        tabs: Vec<Tab>,
        groups: HashMap<GroupId, TabGroup>,
        confirmations: NeverSkip,
    }

    impl FixedModel {
        fn new(tabs: Vec<Tab>, groups: Vec<TabGroup>) -> Self {
            Self {
                tabs,
                groups: groups.into_iter().map(|g| (g.id, g)).collect(),
                confirmations: NeverSkip,
            }
        }
    }

    impl TabModel for FixedModel {
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
        fn move_tab(&mut self, _id: TabId, _new_index: usize) -> bool {
            false
        }
        fn index(&self) -> Option<usize> {
            None
        }
        fn set_index(&mut self, _index: usize) {}
        fn first_non_pinned_index(&self) -> usize {
            self.tabs.iter().take_while(|t| t.pinned).count()
        }
        fn is_multi_selected(&self, _id: TabId) -> bool {
            false
        }
        fn multi_selected_tabs(&self) -> Vec<TabId> {
            Vec::new()
        }
    }

    impl TabGroupModelFilter for FixedModel {
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
            self.tabs.iter().filter(|t| t.group == Some(group)).map(|t| t.id).collect()
        }
        fn merge_list_of_tabs_to_group(&mut self, _: &[TabId], _: TabId, _: Option<usize>, _: MergeNotify) {}
        fn ungroup_tabs(&mut self, _: &[TabId], _: bool, _: bool) -> UngroupOutcome {
            UngroupOutcome::Noop
        }
        fn move_related_tabs(&mut self, _: TabId, _: usize) {}
        fn action_confirmation_manager(&self) -> &dyn ActionConfirmationManager {
            &self.confirmations
        }
    }

    fn grouped(id: TabId, group: u64) -> Tab {
        Tab {
            group: Some(GroupId(group)),
            ..Tab::new(id)
        }
    }

    fn group(id: u64, root: TabId, collapsed: bool) -> TabGroup {
        TabGroup {
            id: GroupId(id),
            root_id: root,
            color: 0,
            collapsed,
            shared: false,
        }
    }

    fn metrics() -> StripMetrics {
        StripMetrics {
            tab_width: 50.0,
            ..StripMetrics::default()
        }
    }

    /// [Tab1][Title][Tab2][Tab3]
    fn grouped_strip(collapsed: bool) -> StripViews {
        let model = FixedModel::new(
            vec![Tab::new(1), grouped(2, 7), grouped(3, 7)],
            vec![group(7, 2, collapsed)],
        );
        let mut strip = StripViews::new(metrics());
        strip.sync_with_model(&model);
        strip
    }

    // ──────────────────────────────────────────
    // Layout
    // ──────────────────────────────────────────

    #[test]
    fn test_title_precedes_members() {
        let strip = grouped_strip(false);
        assert_eq!(
            strip.order(),
            &[
                ViewKey::Tab(1),
                ViewKey::GroupTitle(GroupId(7)),
                ViewKey::Tab(2),
                ViewKey::Tab(3)
            ]
        );
    }

    #[test]
    fn test_ideal_positions_account_for_overlap_and_title() {
        let strip = grouped_strip(false);
        assert!(approx_eq(strip.ideal_x(ViewKey::Tab(1)), 0.0));
        assert!(approx_eq(strip.ideal_x(ViewKey::GroupTitle(GroupId(7))), 22.0));
        assert!(approx_eq(strip.ideal_x(ViewKey::Tab(2)), 68.0));
        assert!(approx_eq(strip.ideal_x(ViewKey::Tab(3)), 90.0));
    }

    #[test]
    fn test_bottom_indicator_spans_members() {
        let strip = grouped_strip(false);
        let title = strip.title(GroupId(7)).unwrap();
        // 22 * 2 + 46 - 27
        assert!(approx_eq(title.bottom_indicator_width, 63.0));
    }

    #[test]
    fn test_collapsed_members_take_no_space() {
        let model = FixedModel::new(
            vec![grouped(1, 7), grouped(2, 7), Tab::new(3)],
            vec![group(7, 1, true)],
        );
        let mut strip = StripViews::new(metrics());
        strip.sync_with_model(&model);
        assert!(approx_eq(strip.ideal_x(ViewKey::Tab(3)), 46.0));
        assert!(!strip.tab(1).unwrap().state.visible);
        assert!(approx_eq(strip.title(GroupId(7)).unwrap().bottom_indicator_width, 0.0));
    }

    #[test]
    fn test_trailing_margin_pushes_following_views() {
        let mut strip = grouped_strip(false);
        strip.set_property(ViewKey::Tab(1), AnimatedProperty::TrailingMargin, 10.0);
        strip.relayout();
        assert!(approx_eq(strip.ideal_x(ViewKey::GroupTitle(GroupId(7))), 32.0));
    }

    #[test]
    fn test_negative_trailing_margin_is_clamped() {
        let mut strip = grouped_strip(false);
        strip.set_property(ViewKey::Tab(1), AnimatedProperty::TrailingMargin, -5.0);
        assert!(approx_eq(strip.tab(1).unwrap().state.trailing_margin, 0.0));
    }

    #[test]
    fn test_start_margin_absorbed_by_scroll() {
        let mut strip = grouped_strip(false);
        let before = strip.view(ViewKey::Tab(3)).unwrap().draw_x;
        strip.set_scroll(11.0, -11.0);
        let after = strip.view(ViewKey::Tab(3)).unwrap().draw_x;
        assert!(approx_eq(before, after));
        assert!(approx_eq(strip.ideal_x(ViewKey::Tab(1)), 11.0));
    }

    #[test]
    fn test_rtl_mirrors_positions() {
        let model = FixedModel::new(vec![Tab::new(1), Tab::new(2)], Vec::new());
        let mut strip = StripViews::new(StripMetrics {
            rtl: true,
            strip_width: 200.0,
            ..metrics()
        });
        strip.sync_with_model(&model);
        assert!(approx_eq(strip.ideal_x(ViewKey::Tab(1)), 150.0));
        assert!(approx_eq(strip.ideal_x(ViewKey::Tab(2)), 128.0));
    }

    #[test]
    fn test_sync_keeps_drag_state() {
        let model = FixedModel::new(vec![Tab::new(1), Tab::new(2)], Vec::new());
        let mut strip = StripViews::new(metrics());
        strip.sync_with_model(&model);
        strip.set_offset_x(ViewKey::Tab(2), -7.0);
        strip.tab_mut(2).unwrap().state.foregrounded = true;

        let reordered = FixedModel::new(vec![Tab::new(2), Tab::new(1)], Vec::new());
        strip.sync_with_model(&reordered);
        let tab = strip.tab(2).unwrap();
        assert!(approx_eq(tab.state.offset_x, -7.0));
        assert!(tab.state.foregrounded);
        assert_eq!(strip.tab_index(2), Some(0));
    }

    // ──────────────────────────────────────────
    // Hit testing
    // ──────────────────────────────────────────

    #[test]
    fn test_view_at_x() {
        let strip = grouped_strip(false);
        assert_eq!(strip.view_at_x(5.0), Some(ViewKey::Tab(1)));
        assert_eq!(strip.view_at_x(30.0), Some(ViewKey::GroupTitle(GroupId(7))));
        assert_eq!(strip.view_at_x(95.0), Some(ViewKey::Tab(3)));
        assert_eq!(strip.view_at_x(900.0), Some(ViewKey::Tab(3)));
    }

    #[test]
    fn test_view_at_x_before_first_is_none() {
        let mut strip = grouped_strip(false);
        strip.set_scroll(20.0, 0.0);
        assert_eq!(strip.view_at_x(10.0), None);
    }

    // ──────────────────────────────────────────
    // Transitions
    // ──────────────────────────────────────────

    #[test]
    fn test_transition_start_then_finish() {
        let mut strip = grouped_strip(false);
        let mut transition = Transition::new();
        transition.push(Animation::new(ViewKey::Tab(1), AnimatedProperty::OffsetX, 30.0, 0.0, 125));
        transition.then(SettleAction::ClearForeground(vec![ViewKey::Tab(1)]));
        strip.tab_mut(1).unwrap().state.foregrounded = true;

        transition.apply_start(&mut strip);
        assert!(approx_eq(strip.offset_x(ViewKey::Tab(1)), 30.0));
        assert!(approx_eq(strip.view(ViewKey::Tab(1)).unwrap().draw_x, 30.0));

        transition.finish(&mut strip);
        assert!(approx_eq(strip.offset_x(ViewKey::Tab(1)), 0.0));
        assert!(!strip.tab(1).unwrap().state.foregrounded);
    }

    #[test]
    fn test_transition_later_tween_wins() {
        let mut strip = grouped_strip(false);
        let mut transition = Transition::new();
        transition.push(Animation::new(ViewKey::Tab(2), AnimatedProperty::BottomMargin, 0.0, 4.0, 75).with_delay(75));
        transition.push(Animation::new(ViewKey::Tab(2), AnimatedProperty::BottomMargin, 0.0, -12.0, 75));
        assert_eq!(transition.duration_ms(), 150);
        transition.finish(&mut strip);
        assert!(approx_eq(strip.tab(2).unwrap().bottom_margin, 4.0));
    }

    // ──────────────────────────────────────────
    // Drag session
    // ──────────────────────────────────────────

    #[test]
    fn test_drag_session_shared_state() {
        let session = DragSession::new(1, DragKind::Group(GroupId(7)), 2, vec![2, 3], false);
        let other = std::rc::Rc::clone(&session);
        other.set_dragged_off_strip(true);
        other.mark_dropped();
        assert!(session.is_dragged_off_strip());
        assert!(session.is_dropped());
        assert!(session.is_group_drag());
        assert_eq!(session.tab_ids(), &[2, 3]);
    }
}
