//! Drag interception
//!
//! Every delta the body dispatches passes the header twice: once before the
//! body scrolls (pre-scroll) and once with whatever the body left over
//! (post-scroll). Deltas are in scroll space: positive collapses the header,
//! negative reveals it.
//!
//! - Pre-scroll claims collapsing deltas, and any delta while the header is
//!   not fully collapsed. Once collapsed, collapsing motion belongs to the body.
//! - Post-scroll claims revealing leftovers: the body reached its own top, so
//!   the rest of the motion pulls the header back into view.
//!
//! Fling-sourced deltas are never claimed here; flings are coordinated at the
//! velocity level in [`crate::fling`].

use tandem_core::events::GestureSource;
use tandem_core::numeric::finite_or_zero;

use crate::extent::ScrollExtent;

/// Interception point within one delta dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollPhase {
    /// Before the body has had a chance to consume
    PreScroll,
    /// After the body consumed what it wanted
    PostScroll,
}

impl ScrollPhase {
    /// Whether the header claims `delta` in this phase
    pub fn claims(&self, extent: &ScrollExtent, delta: f32, source: GestureSource) -> bool {
        if !source.is_interceptable() {
            return false;
        }
        match self {
            ScrollPhase::PreScroll => delta > 0.0 || extent.can_scroll_forward(),
            ScrollPhase::PostScroll => delta < 0.0,
        }
    }

    /// Run the phase: claim, apply through the accumulator, report consumption.
    ///
    /// The return value may be smaller than `delta` when the header reaches
    /// 0 or its maximum; the caller forwards only the difference.
    pub fn intercept(&self, extent: &mut ScrollExtent, delta: f32, source: GestureSource) -> f32 {
        let delta = finite_or_zero(delta);
        if delta == 0.0 || !self.claims(extent, delta, source) {
            return 0.0;
        }

        let consumed = extent.apply(delta).consumed;
        tracing::trace!(
            "{:?} {} delta={:.2} consumed={:.2} offset={}/{}",
            self,
            source.name(),
            delta,
            consumed,
            extent.offset(),
            extent.max_offset()
        );
        consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent_at(offset: f32, max: i32) -> ScrollExtent {
        let mut extent = ScrollExtent::with_max_offset(max);
        extent.apply(offset);
        extent
    }

    #[test]
    fn test_pre_scroll_collapses_header_first() {
        let mut extent = extent_at(0.0, 300);
        let consumed = ScrollPhase::PreScroll.intercept(&mut extent, 40.0, GestureSource::Drag);
        assert_eq!(consumed, 40.0);
        assert_eq!(extent.offset(), 40);
    }

    #[test]
    fn test_pre_scroll_reports_partial_consumption_at_max() {
        let mut extent = extent_at(280.0, 300);
        let consumed = ScrollPhase::PreScroll.intercept(&mut extent, 50.0, GestureSource::Drag);
        assert_eq!(consumed, 20.0);
        assert_eq!(extent.offset(), 300);
    }

    #[test]
    fn test_pre_scroll_leaves_reveal_to_body_when_collapsed() {
        let mut extent = extent_at(300.0, 300);
        assert!(!ScrollPhase::PreScroll.claims(&extent, -30.0, GestureSource::Drag));
        let consumed = ScrollPhase::PreScroll.intercept(&mut extent, -30.0, GestureSource::Drag);
        assert_eq!(consumed, 0.0);
        assert_eq!(extent.offset(), 300);
    }

    #[test]
    fn test_pre_scroll_reveals_partially_collapsed_header() {
        let mut extent = extent_at(120.0, 300);
        let consumed = ScrollPhase::PreScroll.intercept(&mut extent, -30.0, GestureSource::Drag);
        assert_eq!(consumed, -30.0);
        assert_eq!(extent.offset(), 90);
    }

    #[test]
    fn test_post_scroll_reveals_header_with_leftover() {
        let mut extent = extent_at(300.0, 300);
        let consumed = ScrollPhase::PostScroll.intercept(&mut extent, -25.0, GestureSource::Drag);
        assert_eq!(consumed, -25.0);
        assert_eq!(extent.offset(), 275);
    }

    #[test]
    fn test_post_scroll_ignores_collapsing_leftover() {
        let mut extent = extent_at(300.0, 300);
        let consumed = ScrollPhase::PostScroll.intercept(&mut extent, 25.0, GestureSource::Drag);
        assert_eq!(consumed, 0.0);
    }

    #[test]
    fn test_fling_deltas_are_never_claimed() {
        let mut extent = extent_at(100.0, 300);
        for phase in [ScrollPhase::PreScroll, ScrollPhase::PostScroll] {
            assert_eq!(phase.intercept(&mut extent, 10.0, GestureSource::Fling), 0.0);
            assert_eq!(phase.intercept(&mut extent, -10.0, GestureSource::Fling), 0.0);
        }
        assert_eq!(extent.offset(), 100);
    }

    #[test]
    fn test_programmatic_deltas_follow_drag_rules() {
        let mut extent = extent_at(0.0, 300);
        let consumed =
            ScrollPhase::PreScroll.intercept(&mut extent, 15.0, GestureSource::Programmatic);
        assert_eq!(consumed, 15.0);
    }

    #[test]
    fn test_post_scroll_at_top_consumes_nothing() {
        let mut extent = extent_at(0.0, 300);
        let consumed = ScrollPhase::PostScroll.intercept(&mut extent, -25.0, GestureSource::Drag);
        assert_eq!(consumed, 0.0);
        assert_eq!(extent.offset(), 0);
    }
}
