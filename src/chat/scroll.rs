use super::message::Origin;

/// Rows from the bottom within which an agent reply still auto-scrolls.
pub const DEFAULT_NEAR_BOTTOM_THRESHOLD: usize = 4;

/// Transcript viewport geometry as last rendered, in rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewportMetrics {
    /// First visible row
    pub offset: usize,
    pub content_height: usize,
    pub viewport_height: usize,
}

impl ViewportMetrics {
    pub fn distance_to_bottom(&self) -> usize {
        self.content_height
            .saturating_sub(self.offset)
            .saturating_sub(self.viewport_height)
    }
}

/// Decides whether a transcript change should pull the view to the tail.
///
/// User messages always follow. Agent messages follow only if the reader was
/// near the bottom before the change. The seeded first render never scrolls.
#[derive(Debug)]
pub struct ScrollCoordinator {
    threshold: usize,
    initial_render: bool,
    pending_scroll_to_bottom: bool,
}

impl ScrollCoordinator {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            initial_render: true,
            pending_scroll_to_bottom: false,
        }
    }

    pub fn is_near_bottom(&self, metrics: ViewportMetrics) -> bool {
        metrics.distance_to_bottom() < self.threshold
    }

    /// Record a transcript change. `before` is the geometry prior to the append.
    pub fn on_transcript_changed(&mut self, appended: Origin, before: ViewportMetrics) -> bool {
        if self.initial_render {
            self.initial_render = false;
            return false;
        }

        let follow = match appended {
            Origin::User => true,
            Origin::Agent => self.is_near_bottom(before),
        };
        if follow {
            self.pending_scroll_to_bottom = true;
        }
        follow
    }

    #[cfg(test)]
    pub fn has_pending_scroll(&self) -> bool {
        self.pending_scroll_to_bottom
    }

    /// One-shot: true at most once per follow decision
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.pending_scroll_to_bottom)
    }
}

impl Default for ScrollCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_NEAR_BOTTOM_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(offset: usize, content_height: usize, viewport_height: usize) -> ViewportMetrics {
        ViewportMetrics {
            offset,
            content_height,
            viewport_height,
        }
    }

    fn past_seed() -> ScrollCoordinator {
        let mut scroll = ScrollCoordinator::default();
        scroll.on_transcript_changed(Origin::Agent, ViewportMetrics::default());
        scroll
    }

    #[test]
    fn test_initial_render_never_scrolls() {
        let mut scroll = ScrollCoordinator::default();
        assert!(!scroll.on_transcript_changed(Origin::Agent, at(0, 3, 20)));
        assert!(!scroll.take_scroll_request());
    }

    #[test]
    fn test_distance_to_bottom() {
        assert_eq!(at(0, 10, 20).distance_to_bottom(), 0);
        assert_eq!(at(0, 100, 20).distance_to_bottom(), 80);
        assert_eq!(at(80, 100, 20).distance_to_bottom(), 0);
        assert_eq!(at(70, 100, 20).distance_to_bottom(), 10);
    }

    #[rstest]
    #[case(at(80, 100, 20), true)]
    #[case(at(77, 100, 20), true)]
    #[case(at(76, 100, 20), false)]
    #[case(at(0, 100, 20), false)]
    #[case(at(0, 5, 20), true)]
    fn test_agent_follows_only_near_bottom(#[case] before: ViewportMetrics, #[case] follows: bool) {
        let mut scroll = past_seed();
        assert_eq!(scroll.on_transcript_changed(Origin::Agent, before), follows);
        assert_eq!(scroll.take_scroll_request(), follows);
    }

    #[test]
    fn test_user_always_follows() {
        let mut scroll = past_seed();
        assert!(scroll.on_transcript_changed(Origin::User, at(0, 500, 20)));
        assert!(scroll.has_pending_scroll());
    }

    #[test]
    fn test_request_is_one_shot() {
        let mut scroll = past_seed();
        scroll.on_transcript_changed(Origin::User, at(0, 10, 20));
        assert!(scroll.take_scroll_request());
        assert!(!scroll.take_scroll_request());
    }
}
