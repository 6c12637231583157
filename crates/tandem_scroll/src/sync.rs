//! Child sync adapter
//!
//! Keeps a foreign body's own scroll position consistent with the header:
//!
//! - Before a revealing delta is allowed to pull the header down, the body is
//!   returned to its top. Otherwise the header ends up fully shown while the
//!   body still sits mid-content.
//! - When a collapsing delta is more than the header can absorb, the rest is
//!   pushed into the body so the motion continues without a dead zone.
//!
//! The body only moves in whole pixels. Fractional parts of forwarded deltas
//! are carried until they add up to one, so slow drags still reach it.
//!
//! Every outbound call raises the [`EchoGuard`]. The body's own scroll
//! notifications arrive while it is raised and are dropped by the
//! coordinator handle instead of being counted a second time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tandem_core::numeric::finite_or_zero;

use crate::body::BodyScroll;

/// Flag raised while the adapter is driving the body
#[derive(Debug, Clone, Default)]
pub struct EchoGuard {
    driving: Arc<AtomicBool>,
}

impl EchoGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an outbound body call is in progress
    pub fn is_driving(&self) -> bool {
        self.driving.load(Ordering::Acquire)
    }

    /// Raise the flag until the returned token drops
    pub fn drive(&self) -> DrivingToken<'_> {
        let was_driving = self.driving.swap(true, Ordering::AcqRel);
        DrivingToken {
            flag: &self.driving,
            was_driving,
        }
    }
}

/// Held for the duration of one outbound body call
pub struct DrivingToken<'a> {
    flag: &'a AtomicBool,
    was_driving: bool,
}

impl Drop for DrivingToken<'_> {
    fn drop(&mut self) {
        self.flag.store(self.was_driving, Ordering::Release);
    }
}

/// Bridge to the externally owned body scroll state
#[derive(Default)]
pub struct ChildSyncAdapter {
    body: Option<Box<dyn BodyScroll>>,
    guard: EchoGuard,
    /// Sub-pixel part of forwarded deltas not yet sent to the body
    remainder: f32,
    /// Body offset when `remainder` was last updated
    synced_offset: i32,
}

impl ChildSyncAdapter {
    pub fn new(guard: EchoGuard) -> Self {
        Self {
            body: None,
            guard,
            remainder: 0.0,
            synced_offset: 0,
        }
    }

    pub fn guard(&self) -> &EchoGuard {
        &self.guard
    }

    pub fn attach(&mut self, body: Box<dyn BodyScroll>) {
        tracing::debug!("body attached at offset {}", body.offset());
        self.remainder = 0.0;
        self.synced_offset = body.offset();
        self.body = Some(body);
    }

    pub fn detach(&mut self) -> Option<Box<dyn BodyScroll>> {
        tracing::debug!("body detached");
        self.remainder = 0.0;
        self.body.take()
    }

    pub fn is_attached(&self) -> bool {
        self.body.is_some()
    }

    /// Current body position, 0 when no body is attached
    pub fn read_offset(&self) -> i32 {
        self.body.as_ref().map_or(0, |body| body.offset())
    }

    /// Body scroll range, 0 when no body is attached
    pub fn read_max_offset(&self) -> i32 {
        self.body.as_ref().map_or(0, |body| body.max_offset())
    }

    /// Scroll the body by `delta`, pre-clamped to its bounds.
    ///
    /// Returns the clamped amount, which is what the coordinator reports as
    /// consumed; it does not wait for the body to confirm.
    pub fn scroll_by(&mut self, delta: i32) -> i32 {
        let Some(body) = self.body.as_mut() else {
            return 0;
        };

        let offset = body.offset();
        let clamped = delta.clamp(-offset, (body.max_offset() - offset).max(0));
        if clamped == 0 {
            return 0;
        }

        let _token = self.guard.drive();
        body.scroll_by(clamped);
        tracing::trace!("body scroll_by({clamped}) from offset {offset}");
        clamped
    }

    /// Bring the body back toward its top before a revealing `delta` reaches
    /// the header. Returns the part of `delta` spent doing so.
    pub fn restore_before_reveal(&mut self, delta: f32) -> f32 {
        let delta = finite_or_zero(delta);
        if delta >= 0.0 {
            return 0.0;
        }
        let wanted = delta.clamp(-(self.read_offset().max(0) as f32), 0.0);
        self.carry(wanted)
    }

    /// Push a collapsing remainder the header could not absorb into the body.
    /// Returns the part of `residual` the body took.
    pub fn forward_residual(&mut self, residual: f32) -> f32 {
        let residual = finite_or_zero(residual);
        if residual <= 0.0 {
            return 0.0;
        }
        let room = (self.read_max_offset() - self.read_offset()).max(0) as f32;
        let wanted = residual.clamp(0.0, room);
        self.carry(wanted)
    }

    /// Send `wanted` plus the carried remainder to the body in whole pixels.
    ///
    /// Returns `wanted` when the whole-pixel part landed, so fractional input
    /// is reported as consumed while it accumulates.
    fn carry(&mut self, wanted: f32) -> f32 {
        if wanted == 0.0 {
            return 0.0;
        }

        // The body moved on its own since the last carry
        if self.read_offset() != self.synced_offset {
            self.remainder = 0.0;
        }

        let total = self.remainder + wanted;
        let whole = total.round() as i32;
        let applied = self.scroll_by(whole);
        self.synced_offset = self.read_offset();

        if applied == whole {
            self.remainder = total - whole as f32;
            wanted
        } else {
            self.remainder = 0.0;
            applied as f32
        }
    }

    /// Hand `velocity` to the body's fling. Returns the velocity it declined;
    /// without a body everything is declined.
    pub fn fling(&mut self, velocity: f32) -> f32 {
        let velocity = finite_or_zero(velocity);
        let Some(body) = self.body.as_mut() else {
            return velocity;
        };
        let _token = self.guard.drive();
        body.fling(velocity)
    }

    pub fn stop_fling(&mut self) {
        if let Some(body) = self.body.as_mut() {
            body.stop_fling();
        }
    }
}
