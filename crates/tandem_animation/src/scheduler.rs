//! Animation scheduler
//!
//! Owns every active simulation and steps them each frame. A simulation is
//! cancelled by removing its id; once removed nothing advances it again.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::decay::Decay;
use crate::spring::Spring;

new_key_type! {
    pub struct SpringId;
    pub struct DecayId;
}

/// Scheduler shared between the host frame loop and the coordinators reading it
pub type SharedScheduler = Arc<Mutex<AnimationScheduler>>;

/// The animation scheduler that ticks all active simulations
pub struct AnimationScheduler {
    springs: SlotMap<SpringId, Spring>,
    decays: SlotMap<DecayId, Decay>,
    last_frame: Instant,
    target_fps: u32,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            springs: SlotMap::with_key(),
            decays: SlotMap::with_key(),
            last_frame: Instant::now(),
            target_fps: 120,
        }
    }

    /// Create a scheduler already wrapped for sharing
    pub fn shared() -> SharedScheduler {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps.max(1);
    }

    /// Nominal frame duration in seconds
    pub fn frame_duration(&self) -> f32 {
        1.0 / self.target_fps as f32
    }

    pub fn add_spring(&mut self, spring: Spring) -> SpringId {
        let id = self.springs.insert(spring);
        tracing::trace!("spring {:?} added ({} active)", id, self.springs.len());
        id
    }

    pub fn get_spring(&self, id: SpringId) -> Option<&Spring> {
        self.springs.get(id)
    }

    pub fn remove_spring(&mut self, id: SpringId) -> Option<Spring> {
        self.springs.remove(id)
    }

    pub fn add_decay(&mut self, decay: Decay) -> DecayId {
        let id = self.decays.insert(decay);
        tracing::trace!("decay {:?} added ({} active)", id, self.decays.len());
        id
    }

    pub fn get_decay(&self, id: DecayId) -> Option<&Decay> {
        self.decays.get(id)
    }

    pub fn remove_decay(&mut self, id: DecayId) -> Option<Decay> {
        self.decays.remove(id)
    }

    /// Tick all simulations using wall-clock time since the last tick
    pub fn tick(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.step_all(dt);
    }

    /// Tick all simulations by a fixed `dt` (replay, tests)
    pub fn tick_by(&mut self, dt: f32) {
        self.last_frame = Instant::now();
        self.step_all(dt);
    }

    fn step_all(&mut self, dt: f32) {
        for (_, spring) in self.springs.iter_mut() {
            spring.step(dt);
        }
        for (_, decay) in self.decays.iter_mut() {
            decay.step(dt);
        }
    }

    /// Check if any simulations are still moving
    pub fn has_active_animations(&self) -> bool {
        self.springs.iter().any(|(_, s)| !s.is_settled())
            || self.decays.iter().any(|(_, d)| !d.is_settled())
    }

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    pub fn decay_count(&self) -> usize {
        self.decays.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decay::DecayConfig;
    use crate::spring::SpringConfig;

    #[test]
    fn test_removed_simulation_stops_advancing() {
        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.add_decay(Decay::new(DecayConfig::default(), 1000.0));

        scheduler.tick_by(1.0 / 60.0);
        let removed = scheduler.remove_decay(id).expect("decay registered");
        let travelled = removed.value();
        assert!(travelled > 0.0);

        scheduler.tick_by(1.0 / 60.0);
        assert!(scheduler.get_decay(id).is_none());
        assert_eq!(scheduler.decay_count(), 0);
    }

    #[test]
    fn test_active_animations() {
        let mut scheduler = AnimationScheduler::new();
        assert!(!scheduler.has_active_animations());

        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);
        spring.set_target(50.0);
        let id = scheduler.add_spring(spring);
        assert!(scheduler.has_active_animations());

        for _ in 0..240 {
            scheduler.tick_by(1.0 / 120.0);
        }
        assert!(!scheduler.has_active_animations());
        assert_eq!(scheduler.get_spring(id).map(|s| s.value()), Some(50.0));
    }

    #[test]
    fn test_frame_duration() {
        let mut scheduler = AnimationScheduler::new();
        scheduler.set_target_fps(60);
        assert!((scheduler.frame_duration() - 1.0 / 60.0).abs() < f32::EPSILON);
        scheduler.set_target_fps(0);
        assert_eq!(scheduler.frame_duration(), 1.0);
    }
}
