//! Fling coordination
//!
//! Only one region owns a fling at a time. The header's flings run as
//! simulations in the shared [`AnimationScheduler`]; the body runs its own and
//! is only told to start or stop.
//!
//! ```text
//!            OUTER_FLING_START / FLING_INTERCEPTED / HANDOFF_TO_OUTER
//!     Idle ─────────────────────────────────────────────▶ OuterFlinging
//!      │  ▲                                                  │   ▲
//!      │  │ SETTLED / CANCEL / DRAG_START     HANDOFF_TO_BODY│   │HANDOFF_TO_OUTER
//!      │  └──────────────────────────────────────────────────┤   │
//!      │ BODY_FLING_START / HANDOFF_TO_BODY                  ▼   │
//!      └─────────────────────────────────────────────▶ BodyFlinging
//! ```
//!
//! Hand-off works on velocity, not distance: exponential friction makes the
//! velocity left at a boundary a function of the distance travelled to reach
//! it, so the receiving region continues at exactly the speed the other one
//! had when it stopped.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use smallvec::SmallVec;
use tandem_animation::{
    AnimationScheduler, Decay, DecayConfig, DecayId, Spring, SpringConfig, SpringId,
};
use tandem_core::events::{event_name, event_types, EventType};
use tandem_core::fsm::StateTransitions;
use tandem_core::numeric::{finite_or_zero, is_at_rest};

use crate::config::{CoordinatorConfig, HandoffPolicy};
use crate::extent::ScrollExtent;
use crate::sync::ChildSyncAdapter;

/// Transitions kept for inspection
const HISTORY_LIMIT: usize = 32;

/// Which region currently owns an in-flight fling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlingState {
    /// Nothing is flinging
    #[default]
    Idle,
    /// Header simulation (decay or settle spring) is running
    OuterFlinging,
    /// Body is running its own fling
    BodyFlinging,
}

impl StateTransitions for FlingState {
    fn on_event(&self, event: EventType) -> Option<Self> {
        use event_types::*;
        match (self, event) {
            (
                FlingState::Idle,
                OUTER_FLING_START | FLING_INTERCEPTED | HANDOFF_TO_OUTER,
            ) => Some(FlingState::OuterFlinging),
            (FlingState::Idle, BODY_FLING_START | HANDOFF_TO_BODY) => {
                Some(FlingState::BodyFlinging)
            }
            (FlingState::OuterFlinging, HANDOFF_TO_BODY) => Some(FlingState::BodyFlinging),
            (FlingState::BodyFlinging, HANDOFF_TO_OUTER) => Some(FlingState::OuterFlinging),
            (
                FlingState::OuterFlinging | FlingState::BodyFlinging,
                SETTLED | CANCEL | DRAG_START,
            ) => Some(FlingState::Idle),
            _ => None,
        }
    }
}

/// One recorded state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlingTransition {
    pub from: FlingState,
    pub event: EventType,
    pub to: FlingState,
}

/// Header simulation currently driving the offset
#[derive(Debug, Clone, Copy)]
enum OuterTask {
    /// Decelerating fling from `origin`; `applied` is the travelled distance
    /// already applied
    Decay {
        id: DecayId,
        origin: f32,
        applied: f32,
    },
    /// Spring whose value is the absolute offset to hold
    Settle { id: SpringId },
}

/// Snapshot of a simulation read under the scheduler lock
struct Sample {
    value: f32,
    settled: bool,
    initial_velocity: f32,
    friction: f32,
}

/// Owns [`FlingState`] and the header's fling simulation
pub struct FlingCoordinator {
    state: FlingState,
    task: Option<OuterTask>,
    scheduler: Weak<Mutex<AnimationScheduler>>,
    policy: HandoffPolicy,
    handoff_threshold: f32,
    decay: DecayConfig,
    settle: SpringConfig,
    history: SmallVec<[FlingTransition; 8]>,
}

impl FlingCoordinator {
    pub fn new(config: &CoordinatorConfig) -> Self {
        Self {
            state: FlingState::Idle,
            task: None,
            scheduler: Weak::new(),
            policy: config.handoff,
            handoff_threshold: config.handoff_threshold,
            decay: config.decay_config(),
            settle: config.settle_spring(),
            history: SmallVec::new(),
        }
    }

    /// Run header simulations on `scheduler` instead of jumping to their end
    pub fn set_scheduler(&mut self, scheduler: &Arc<Mutex<AnimationScheduler>>) {
        self.scheduler = Arc::downgrade(scheduler);
    }

    pub fn apply_config(&mut self, config: &CoordinatorConfig) {
        self.policy = config.handoff;
        self.handoff_threshold = config.handoff_threshold;
        self.decay = config.decay_config();
        self.settle = config.settle_spring();
    }

    pub fn state(&self) -> FlingState {
        self.state
    }

    pub fn policy(&self) -> HandoffPolicy {
        self.policy
    }

    /// Whether a header simulation is running
    pub fn is_animating(&self) -> bool {
        self.task.is_some()
    }

    /// Recent transitions, oldest first
    pub fn history(&self) -> &[FlingTransition] {
        &self.history
    }

    fn send(&mut self, event: EventType) {
        let from = self.state;
        if self.state.transition(event) {
            tracing::debug!(
                "fling {:?} --{}--> {:?}",
                from,
                event_name(event),
                self.state
            );
            if self.history.len() >= HISTORY_LIMIT {
                self.history.remove(0);
            }
            self.history.push(FlingTransition {
                from,
                event,
                to: self.state,
            });
        }
    }

    fn sample(&self, task: OuterTask) -> Option<Sample> {
        let scheduler = self.scheduler.upgrade()?;
        let scheduler = scheduler.lock();
        match task {
            OuterTask::Decay { id, .. } => scheduler.get_decay(id).map(|decay| Sample {
                value: decay.value(),
                settled: decay.is_settled(),
                initial_velocity: decay.initial_velocity(),
                friction: decay.config().friction,
            }),
            OuterTask::Settle { id, .. } => scheduler.get_spring(id).map(|spring| Sample {
                value: spring.value(),
                settled: spring.is_settled(),
                initial_velocity: 0.0,
                friction: 0.0,
            }),
        }
    }

    fn release(&self, task: OuterTask) {
        let Some(scheduler) = self.scheduler.upgrade() else {
            return;
        };
        let mut scheduler = scheduler.lock();
        match task {
            OuterTask::Decay { id, .. } => {
                scheduler.remove_decay(id);
            }
            OuterTask::Settle { id, .. } => {
                scheduler.remove_spring(id);
            }
        }
    }

    /// Offset change that brings the header to where `task` has reached.
    ///
    /// A decay is relative to what was already applied. A settle spring is
    /// absolute, so clamped overshoot is not lost on the way back.
    fn frame_delta(task: OuterTask, sample: &Sample, extent: &ScrollExtent) -> f32 {
        match task {
            OuterTask::Decay { applied, .. } => sample.value - applied,
            OuterTask::Settle { .. } => sample.value - extent.exact_offset(),
        }
    }

    /// Remove the header simulation, applying whatever it reached since the
    /// last tick exactly once
    fn flush_outer_task(&mut self, extent: &mut ScrollExtent) {
        let Some(task) = self.task.take() else {
            return;
        };
        if let Some(sample) = self.sample(task) {
            let delta = Self::frame_delta(task, &sample, extent);
            extent.apply(delta);
        }
        self.release(task);
        tracing::trace!("flushed header fling at offset {}", extent.offset());
    }

    /// Stop any fling synchronously. The reached offset is kept, the state is
    /// `Idle` before this returns, and no further deltas are applied.
    pub fn cancel(&mut self, extent: &mut ScrollExtent, adapter: &mut ChildSyncAdapter) {
        self.flush_outer_task(extent);
        if self.state == FlingState::BodyFlinging {
            adapter.stop_fling();
        }
        self.send(event_types::CANCEL);
    }

    /// A new drag takes over from any running fling
    pub fn on_drag_start(&mut self, extent: &mut ScrollExtent, adapter: &mut ChildSyncAdapter) {
        self.flush_outer_task(extent);
        if self.state == FlingState::BodyFlinging {
            adapter.stop_fling();
        }
        self.send(event_types::DRAG_START);
    }

    /// Start a decelerating header fling with `velocity` (scroll space).
    ///
    /// Returns false when the velocity is already at rest.
    pub fn start_outer_fling(
        &mut self,
        extent: &mut ScrollExtent,
        adapter: &mut ChildSyncAdapter,
        velocity: f32,
        event: EventType,
    ) -> bool {
        let velocity = finite_or_zero(velocity);
        self.flush_outer_task(extent);

        let decay = Decay::new(self.decay, velocity);
        if decay.is_settled() {
            return false;
        }

        // The body picking this up after its own fling ended is a hand-off;
        // anything else takes over from a body still in motion
        if self.state == FlingState::BodyFlinging && event != event_types::HANDOFF_TO_OUTER {
            adapter.stop_fling();
            self.send(event_types::CANCEL);
        }
        self.send(event);

        if !extent.has_room_toward(velocity) {
            // Already against the boundary: all of it is residual
            self.finish_at_boundary(adapter, velocity);
            return true;
        }

        let Some(scheduler) = self.scheduler.upgrade() else {
            // No frame loop: travel the whole projected distance now
            let origin = extent.exact_offset();
            if extent.apply(decay.projected_distance()).clamped {
                let residual = decay.velocity_at_distance(extent.exact_offset() - origin);
                self.finish_at_boundary(adapter, residual);
            } else {
                self.send(event_types::SETTLED);
            }
            return true;
        };

        let id = scheduler.lock().add_decay(decay);
        self.task = Some(OuterTask::Decay {
            id,
            origin: extent.exact_offset(),
            applied: 0.0,
        });
        tracing::debug!(
            "header fling v={:.1} from offset {}",
            velocity,
            extent.offset()
        );
        true
    }

    /// Animate the header to `target` with a spring seeded by `velocity`
    pub fn start_settle(
        &mut self,
        extent: &mut ScrollExtent,
        target: i32,
        velocity: f32,
        spring: SpringConfig,
        event: EventType,
    ) {
        self.flush_outer_task(extent);

        let start = extent.exact_offset();
        let target = target.clamp(0, extent.max_offset()) as f32;

        let Some(scheduler) = self.scheduler.upgrade() else {
            extent.apply(target - start);
            return;
        };

        let mut settle = Spring::new(spring, start).with_velocity(finite_or_zero(velocity));
        settle.set_target(target);
        let id = scheduler.lock().add_spring(settle);
        self.task = Some(OuterTask::Settle { id });
        self.send(event);
        tracing::debug!("header settle {} -> {}", start, target);
    }

    /// A fling is about to start in the body.
    ///
    /// While the header is between its boundaries the whole velocity is
    /// claimed and turned into a settle, so the header never eases on its
    /// own while the body decelerates separately. Returns the velocity
    /// consumed.
    pub fn pre_fling(
        &mut self,
        extent: &mut ScrollExtent,
        adapter: &mut ChildSyncAdapter,
        velocity: f32,
    ) -> f32 {
        let velocity = finite_or_zero(velocity);
        self.cancel(extent, adapter);

        if self.policy.intercepts_pre_fling()
            && extent.is_measured()
            && extent.is_between_boundaries()
        {
            let target = extent.resting_boundary(velocity);
            self.start_settle(
                extent,
                target,
                velocity,
                self.settle,
                event_types::FLING_INTERCEPTED,
            );
            return velocity;
        }

        if !is_at_rest(velocity, self.decay.velocity_threshold) {
            self.send(event_types::BODY_FLING_START);
        }
        0.0
    }

    /// The body's fling ended with `available` velocity it could not use.
    ///
    /// If the header has room in that direction it continues the motion.
    /// Returns the velocity consumed.
    pub fn post_fling(
        &mut self,
        extent: &mut ScrollExtent,
        adapter: &mut ChildSyncAdapter,
        _consumed: f32,
        available: f32,
    ) -> f32 {
        let available = finite_or_zero(available);

        if self.policy.hands_off()
            && !is_at_rest(available, self.handoff_threshold)
            && extent.has_room_toward(available)
            && self.start_outer_fling(extent, adapter, available, event_types::HANDOFF_TO_OUTER)
        {
            tracing::debug!("body handed {:.1} to header", available);
            return available;
        }

        if self.state == FlingState::BodyFlinging {
            self.send(event_types::SETTLED);
        }
        0.0
    }

    /// The header fling reached 0 or its maximum with `residual` velocity left
    fn finish_at_boundary(&mut self, adapter: &mut ChildSyncAdapter, residual: f32) {
        if self.policy.hands_off() && !is_at_rest(residual, self.handoff_threshold) {
            let declined = adapter.fling(residual);
            let accepted = residual - declined;
            if !is_at_rest(accepted, self.handoff_threshold) {
                tracing::debug!("header handed {:.1} to body", accepted);
                self.send(event_types::HANDOFF_TO_BODY);
                return;
            }
        }
        self.send(event_types::SETTLED);
    }

    /// Apply this frame's progress of the header simulation.
    ///
    /// Call after the scheduler has been ticked. Returns true while a header
    /// simulation is still running.
    pub fn tick(&mut self, extent: &mut ScrollExtent, adapter: &mut ChildSyncAdapter) -> bool {
        let Some(task) = self.task else {
            return false;
        };

        let Some(sample) = self.sample(task) else {
            // Scheduler or simulation went away underneath us
            self.task = None;
            self.send(event_types::SETTLED);
            return false;
        };

        match task {
            OuterTask::Decay {
                id,
                origin,
                applied,
            } => {
                if extent.apply(sample.value - applied).clamped {
                    let travelled = extent.exact_offset() - origin;
                    let residual = sample.initial_velocity - sample.friction * travelled;
                    self.release(task);
                    self.task = None;
                    tracing::debug!(
                        "header fling hit {} with residual {:.1}",
                        extent.offset(),
                        residual
                    );
                    self.finish_at_boundary(adapter, residual);
                    return false;
                }
                if sample.settled {
                    self.release(task);
                    self.task = None;
                    self.send(event_types::SETTLED);
                    return false;
                }
                self.task = Some(OuterTask::Decay {
                    id,
                    origin,
                    applied: sample.value,
                });
            }
            OuterTask::Settle { .. } => {
                let delta = Self::frame_delta(task, &sample, extent);
                extent.apply(delta);
                if sample.settled {
                    self.release(task);
                    self.task = None;
                    self.send(event_types::SETTLED);
                    return false;
                }
            }
        }
        true
    }
}
