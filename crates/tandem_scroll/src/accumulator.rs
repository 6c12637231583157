//! Fractional scroll accumulation
//!
//! Converts real-valued scroll requests into whole-pixel offset changes and
//! carries the sub-pixel part forward, so a run of small deltas adds up
//! instead of being rounded away one call at a time.

use tandem_core::numeric::finite_or_zero;

/// Outcome of a single [`ScrollAccumulator::apply`] call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Consumption {
    /// Amount the caller should treat as consumed
    pub consumed: f32,
    /// Whether the request hit 0 or the maximum offset
    pub clamped: bool,
}

impl Consumption {
    /// Part of `requested` that was not consumed
    pub fn leftover(&self, requested: f32) -> f32 {
        requested - self.consumed
    }
}

/// Integer offset plus sub-pixel remainder
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollAccumulator {
    offset: i32,
    /// Always within (-1, 1)
    remainder: f32,
}

impl ScrollAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn remainder(&self) -> f32 {
        self.remainder
    }

    /// Offset including the carried sub-pixel part
    pub fn exact_offset(&self) -> f32 {
        self.offset as f32 + self.remainder
    }

    /// Place the offset at `offset` and drop any carried remainder
    pub fn snap_to(&mut self, offset: i32) {
        self.offset = offset;
        self.remainder = 0.0;
    }

    pub fn clear_remainder(&mut self) {
        self.remainder = 0.0;
    }

    /// Apply `requested` against `[0, max_offset]`.
    ///
    /// When nothing was clamped the request is echoed back unchanged so that
    /// float noise from the integer split never leaks to the caller.
    pub fn apply(&mut self, requested: f32, max_offset: i32) -> Consumption {
        let requested = finite_or_zero(requested);
        let max_offset = max_offset.max(0);

        let absolute = self.offset as f32 + self.remainder + requested;
        let target = absolute.clamp(0.0, max_offset as f32);
        let clamped = target != absolute;
        let consumed = target - self.offset as f32;

        let consumed_int = consumed.round() as i32;
        let next = self.offset.saturating_add(consumed_int);
        if (0..=max_offset).contains(&next) {
            self.offset = next;
            self.remainder = consumed - consumed_int as f32;
        } else {
            // Only reachable when f32 cannot represent the unbounded sentinel exactly
            self.snap_to(next.clamp(0, max_offset));
        }

        tracing::trace!(
            "accumulate requested={:.2} consumed={:.2} offset={} remainder={:.3} clamped={}",
            requested,
            consumed,
            self.offset,
            self.remainder,
            clamped
        );

        Consumption {
            consumed: if clamped { consumed } else { requested },
            clamped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_deltas_clamp_at_max() {
        let mut acc = ScrollAccumulator::new();

        let first = acc.apply(120.0, 300);
        assert_eq!(acc.offset(), 120);
        assert_eq!(first.consumed, 120.0);
        assert!(!first.clamped);

        acc.apply(120.0, 300);
        assert_eq!(acc.offset(), 240);

        let third = acc.apply(120.0, 300);
        assert_eq!(acc.offset(), 300);
        assert_eq!(third.consumed, 60.0);
        assert!(third.clamped);
        assert_eq!(third.leftover(120.0), 60.0);
    }

    #[test]
    fn test_upward_past_top_consumes_nothing() {
        let mut acc = ScrollAccumulator::new();
        let result = acc.apply(-50.0, 300);
        assert_eq!(result.consumed, 0.0);
        assert!(result.clamped);
        assert_eq!(acc.offset(), 0);
        assert_eq!(acc.remainder(), 0.0);
    }

    #[test]
    fn test_sub_pixel_deltas_accumulate() {
        let mut acc = ScrollAccumulator::new();
        let mut reported = 0.0;
        for _ in 0..100 {
            reported += acc.apply(0.25, 300).consumed;
        }
        assert_eq!(reported, 25.0);
        assert_eq!(acc.offset(), 25);
        assert_eq!(acc.remainder(), 0.0);
    }

    #[test]
    fn test_apply_zero_is_idempotent() {
        let mut acc = ScrollAccumulator::new();
        acc.apply(10.25, 300);
        let before = acc;

        for _ in 0..10 {
            let result = acc.apply(0.0, 300);
            assert_eq!(result.consumed, 0.0);
            assert!(!result.clamped);
        }
        assert_eq!(acc, before);
    }

    #[test]
    fn test_remainder_stays_below_one_pixel() {
        let mut acc = ScrollAccumulator::new();
        for delta in [0.7, 1.6, -0.9, 13.45, -2.2, 0.49, 300.0, -0.51, -1000.0, 3.3] {
            acc.apply(delta, 300);
            assert!(acc.remainder().abs() < 1.0);
            assert!((0..=300).contains(&acc.offset()));
        }
    }

    #[test]
    fn test_non_finite_request_is_noop() {
        let mut acc = ScrollAccumulator::new();
        acc.apply(40.0, 300);

        let result = acc.apply(f32::NAN, 300);
        assert_eq!(result.consumed, 0.0);
        assert_eq!(acc.offset(), 40);

        acc.apply(f32::INFINITY, 300);
        assert_eq!(acc.offset(), 40);
    }

    #[test]
    fn test_unbounded_max_absorbs_everything() {
        let mut acc = ScrollAccumulator::new();
        let result = acc.apply(5000.0, i32::MAX);
        assert_eq!(result.consumed, 5000.0);
        assert!(!result.clamped);
        assert_eq!(acc.offset(), 5000);
    }
}
