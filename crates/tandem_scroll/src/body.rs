//! Body scroll contract
//!
//! The body is a foreign surface (document viewer, list) that owns its own
//! scroll position. The coordinator only needs to read that position, nudge
//! it by whole pixels and hand it a fling velocity.

use tandem_animation::{Decay, DecayConfig};
use tandem_core::numeric::{finite_or_zero, is_at_rest};

/// What the coordinator can ask of the body
pub trait BodyScroll: Send {
    /// Current scroll position in the body's own pixel space
    fn offset(&self) -> i32;

    /// Largest position the body can scroll to
    fn max_offset(&self) -> i32;

    /// Scroll by `delta` pixels (scroll space); returns the amount applied
    fn scroll_by(&mut self, delta: i32) -> i32;

    /// Start a fling; returns the part of `velocity` the body declined
    fn fling(&mut self, velocity: f32) -> f32;

    /// Stop any fling the body is running
    fn stop_fling(&mut self) {}
}

/// Called with the applied delta every time an [`InMemoryBody`] moves
pub type ScrollListener = Box<dyn FnMut(i32) + Send>;

/// Progress of an [`InMemoryBody`] fling for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyFlingStatus {
    /// No fling running
    Idle,
    /// Still moving
    Flinging,
    /// Stopped this frame; `residual` is the velocity left when it hit an edge
    Finished { residual: f32 },
}

struct BodyFling {
    decay: Decay,
    origin: f32,
}

/// A bounded body that lives entirely in memory
///
/// Used by headless hosts and tests. It scrolls by whole pixels, runs its
/// own decay fling, and reports scroll notifications through an optional
/// listener the way a platform view would.
pub struct InMemoryBody {
    offset: i32,
    max_offset: i32,
    decay_config: DecayConfig,
    fling: Option<BodyFling>,
    listener: Option<ScrollListener>,
}

impl InMemoryBody {
    pub fn new(max_offset: i32) -> Self {
        Self {
            offset: 0,
            max_offset: max_offset.max(0),
            decay_config: DecayConfig::default(),
            fling: None,
            listener: None,
        }
    }

    /// Start at `offset` instead of the top
    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = offset.clamp(0, self.max_offset);
        self
    }

    pub fn with_decay(mut self, config: DecayConfig) -> Self {
        self.decay_config = config;
        self
    }

    /// Receive a notification for every movement
    pub fn with_scroll_listener(mut self, listener: ScrollListener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn is_flinging(&self) -> bool {
        self.fling.is_some()
    }

    fn move_to(&mut self, target: i32) -> i32 {
        let target = target.clamp(0, self.max_offset);
        let applied = target - self.offset;
        if applied != 0 {
            self.offset = target;
            if let Some(listener) = self.listener.as_mut() {
                listener(applied);
            }
        }
        applied
    }

    /// Advance the body's own fling by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> BodyFlingStatus {
        let Some(mut fling) = self.fling.take() else {
            return BodyFlingStatus::Idle;
        };

        fling.decay.step(dt);
        let position = fling.origin + fling.decay.value();

        if position <= 0.0 || position >= self.max_offset as f32 {
            let edge = if position <= 0.0 { 0 } else { self.max_offset };
            let residual = fling.decay.velocity_at_distance(edge as f32 - fling.origin);
            self.move_to(edge);
            tracing::debug!("body fling hit edge {edge} with residual {residual:.1}");
            return BodyFlingStatus::Finished { residual };
        }

        self.move_to(position.round() as i32);
        if fling.decay.is_settled() {
            return BodyFlingStatus::Finished { residual: 0.0 };
        }

        self.fling = Some(fling);
        BodyFlingStatus::Flinging
    }
}

impl BodyScroll for InMemoryBody {
    fn offset(&self) -> i32 {
        self.offset
    }

    fn max_offset(&self) -> i32 {
        self.max_offset
    }

    fn scroll_by(&mut self, delta: i32) -> i32 {
        self.move_to(self.offset.saturating_add(delta))
    }

    fn fling(&mut self, velocity: f32) -> f32 {
        let velocity = finite_or_zero(velocity);
        let has_room = (velocity > 0.0 && self.offset < self.max_offset)
            || (velocity < 0.0 && self.offset > 0);
        if !has_room || is_at_rest(velocity, self.decay_config.velocity_threshold) {
            return velocity;
        }

        self.fling = Some(BodyFling {
            decay: Decay::new(self.decay_config, velocity),
            origin: self.offset as f32,
        });
        0.0
    }

    fn stop_fling(&mut self) {
        self.fling = None;
    }
}
