//! Fling deceleration
//!
//! Exponential friction: `v(t) = v0 * e^(-k t)`, so the travelled distance
//! is `x(t) = (v0 - v(t)) / k`. Velocity is therefore linear in distance,
//! `v(x) = v0 - k * x`, which lets a fling that gets clamped mid-frame know
//! exactly how much velocity is left at the clamp point.

use tandem_core::numeric::is_at_rest;

/// Parameters for fling deceleration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecayConfig {
    /// Friction coefficient per second (higher stops sooner)
    pub friction: f32,
    /// Speed below which the fling is considered finished (pixels/second)
    pub velocity_threshold: f32,
}

impl DecayConfig {
    pub fn new(friction: f32, velocity_threshold: f32) -> Self {
        Self {
            friction,
            velocity_threshold,
        }
    }
}

impl Default for DecayConfig {
    fn default() -> Self {
        // 0.998 per millisecond, the platform "normal" deceleration rate
        Self::new(2.0, 10.0)
    }
}

/// A decelerating fling along one axis
///
/// `value` is the distance travelled since the fling started, in the sign
/// of the initial velocity.
#[derive(Clone, Debug)]
pub struct Decay {
    config: DecayConfig,
    initial_velocity: f32,
    value: f32,
    velocity: f32,
}

impl Decay {
    pub fn new(config: DecayConfig, initial_velocity: f32) -> Self {
        Self {
            config,
            initial_velocity,
            value: 0.0,
            velocity: initial_velocity,
        }
    }

    pub fn config(&self) -> DecayConfig {
        self.config
    }

    pub fn initial_velocity(&self) -> f32 {
        self.initial_velocity
    }

    /// Distance travelled so far
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Current velocity
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_settled(&self) -> bool {
        is_at_rest(self.velocity, self.config.velocity_threshold)
    }

    /// Velocity remaining once `distance` has been travelled
    pub fn velocity_at_distance(&self, distance: f32) -> f32 {
        self.initial_velocity - self.config.friction * distance
    }

    /// Distance the fling covers before coming to rest
    pub fn projected_distance(&self) -> f32 {
        if is_at_rest(self.initial_velocity, self.config.velocity_threshold) {
            return 0.0;
        }
        let rest = self.config.velocity_threshold.copysign(self.initial_velocity);
        (self.initial_velocity - rest) / self.config.friction
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if self.is_settled() || dt <= 0.0 {
            return;
        }

        let factor = (-self.config.friction * dt).exp();
        let next_velocity = self.velocity * factor;

        if is_at_rest(next_velocity, self.config.velocity_threshold) {
            // Land exactly on the rest point instead of creeping past it
            self.value = self.projected_distance();
            self.velocity = self.velocity_at_distance(self.value);
            return;
        }

        self.value += self.velocity * (1.0 - factor) / self.config.friction;
        self.velocity = next_velocity;
    }
}
