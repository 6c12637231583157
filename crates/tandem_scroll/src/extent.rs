//! Header extent tracking
//!
//! The maximum offset is the header's measured height. Layout reports it
//! once per pass; when it shrinks below the current offset the offset is
//! pulled down in the same call.

use crate::accumulator::{Consumption, ScrollAccumulator};

/// Maximum offset before the first layout pass. Scrolls arriving this early
/// are absorbed and clamped once the real height is known.
pub const UNMEASURED_MAX_OFFSET: i32 = i32::MAX;

/// Current header offset together with its bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollExtent {
    accumulator: ScrollAccumulator,
    max_offset: i32,
}

impl Default for ScrollExtent {
    fn default() -> Self {
        Self {
            accumulator: ScrollAccumulator::new(),
            max_offset: UNMEASURED_MAX_OFFSET,
        }
    }
}

impl ScrollExtent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extent with a known header height
    pub fn with_max_offset(max_offset: i32) -> Self {
        let mut extent = Self::default();
        extent.set_max_offset(max_offset);
        extent
    }

    pub fn offset(&self) -> i32 {
        self.accumulator.offset()
    }

    pub fn max_offset(&self) -> i32 {
        self.max_offset
    }

    pub fn remainder(&self) -> f32 {
        self.accumulator.remainder()
    }

    /// Offset including the carried sub-pixel part
    pub fn exact_offset(&self) -> f32 {
        self.accumulator.exact_offset()
    }

    /// Whether layout has reported a real header height yet
    pub fn is_measured(&self) -> bool {
        self.max_offset != UNMEASURED_MAX_OFFSET
    }

    /// Record the header height from a layout pass
    pub fn set_max_offset(&mut self, new_max: i32) {
        let new_max = new_max.max(0);
        if new_max == self.max_offset {
            return;
        }
        self.max_offset = new_max;

        let offset = self.accumulator.offset();
        if offset > new_max {
            tracing::debug!("header shrank to {new_max}, clamping offset {offset}");
            self.accumulator.snap_to(new_max);
        } else if self.accumulator.exact_offset() > new_max as f32 {
            self.accumulator.clear_remainder();
        }
    }

    /// Header can still collapse further
    pub fn can_scroll_forward(&self) -> bool {
        self.offset() < self.max_offset
    }

    /// Header can still be revealed further
    pub fn can_scroll_backward(&self) -> bool {
        self.offset() > 0
    }

    /// Whether a scroll-space motion with this sign has room to move the header
    pub fn has_room_toward(&self, direction: f32) -> bool {
        if direction > 0.0 {
            self.can_scroll_forward()
        } else if direction < 0.0 {
            self.can_scroll_backward()
        } else {
            false
        }
    }

    /// Neither fully collapsed nor fully revealed
    pub fn is_between_boundaries(&self) -> bool {
        self.can_scroll_forward() && self.can_scroll_backward()
    }

    /// Boundary the header comes to rest on when moving with `velocity`
    pub fn resting_boundary(&self, velocity: f32) -> i32 {
        if velocity > 0.0 {
            self.max_offset
        } else if velocity < 0.0 {
            0
        } else if self.offset() >= self.max_offset - self.offset() {
            self.max_offset
        } else {
            0
        }
    }

    /// Apply a scroll-space delta through the accumulator
    pub fn apply(&mut self, delta: f32) -> Consumption {
        self.accumulator.apply(delta, self.max_offset)
    }
}
