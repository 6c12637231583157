//! Nested scroll coordinator
//!
//! The facade a host talks to. It owns the header extent, the body adapter
//! and the fling coordinator, and routes every entry point through them:
//!
//! - layout reports the header height and reads back placement
//! - the body forwards its pre/post scroll and fling callbacks
//! - the host forwards drags that start on the header itself
//!
//! One coordinator per composite view. Hosts that need to reach it from the
//! body's callbacks wrap it in a [`CoordinatorHandle`].

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tandem_animation::SharedScheduler;
use tandem_core::events::{event_types, GestureSource};
use tandem_core::numeric::{finite_or_zero, is_at_rest};

use crate::body::BodyScroll;
use crate::config::CoordinatorConfig;
use crate::extent::ScrollExtent;
use crate::fling::{FlingCoordinator, FlingState, FlingTransition};
use crate::interception::ScrollPhase;
use crate::sync::{ChildSyncAdapter, EchoGuard};

/// Where layout should put the two regions, relative to the container top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    /// Header top; `-offset` so a collapsing header slides up out of view
    pub header_y: i32,
    /// Body top, directly below the visible part of the header
    pub body_y: i32,
}

/// Coordinates one collapsing header with one body
pub struct NestedScrollCoordinator {
    extent: ScrollExtent,
    adapter: ChildSyncAdapter,
    fling: FlingCoordinator,
    config: CoordinatorConfig,
    dragging: bool,
}

impl Default for NestedScrollCoordinator {
    fn default() -> Self {
        Self::new(CoordinatorConfig::default())
    }
}

impl NestedScrollCoordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            extent: ScrollExtent::new(),
            adapter: ChildSyncAdapter::new(EchoGuard::new()),
            fling: FlingCoordinator::new(&config),
            config,
            dragging: false,
        }
    }

    /// Run flings and animated scrolls on a shared scheduler
    pub fn with_scheduler(mut self, scheduler: &SharedScheduler) -> Self {
        self.set_scheduler(scheduler);
        self
    }

    pub fn set_scheduler(&mut self, scheduler: &SharedScheduler) {
        self.fling.set_scheduler(scheduler);
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Replace the configuration; an in-flight fling keeps its simulation
    pub fn set_config(&mut self, config: CoordinatorConfig) {
        self.fling.apply_config(&config);
        self.config = config;
    }

    /// Flag raised while the coordinator drives the body
    pub fn guard(&self) -> EchoGuard {
        self.adapter.guard().clone()
    }

    // =========================================================================
    // Body
    // =========================================================================

    pub fn attach_body(&mut self, body: Box<dyn BodyScroll>) {
        self.adapter.attach(body);
    }

    pub fn detach_body(&mut self) -> Option<Box<dyn BodyScroll>> {
        if self.fling.state() == FlingState::BodyFlinging {
            self.fling.cancel(&mut self.extent, &mut self.adapter);
        }
        self.adapter.detach()
    }

    pub fn has_body(&self) -> bool {
        self.adapter.is_attached()
    }

    pub fn body_offset(&self) -> i32 {
        self.adapter.read_offset()
    }

    /// Scroll the body directly; its own notifications are suppressed
    pub fn scroll_body_by(&mut self, delta: i32) -> i32 {
        self.adapter.scroll_by(delta)
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Report the measured header height
    pub fn set_max_offset(&mut self, max_offset: i32) {
        tracing::trace!("layout max_offset={max_offset}");
        self.extent.set_max_offset(max_offset);
    }

    pub fn current_offset(&self) -> i32 {
        self.extent.offset()
    }

    pub fn max_offset(&self) -> i32 {
        self.extent.max_offset()
    }

    pub fn extent(&self) -> &ScrollExtent {
        &self.extent
    }

    /// Whether the header still takes part in scrolling
    pub fn is_scroll_enabled(&self) -> bool {
        self.extent.can_scroll_forward() || self.dragging
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn placement(&self, header_height: i32) -> Placement {
        let offset = self.extent.offset();
        Placement {
            header_y: -offset,
            body_y: header_height - offset,
        }
    }

    // =========================================================================
    // Body callbacks
    // =========================================================================

    /// The body is about to scroll by `delta`. Returns the part the header
    /// (and, for a reveal, restoring the body to its top) consumed.
    pub fn pre_scroll(&mut self, delta: f32, source: GestureSource) -> f32 {
        let delta = finite_or_zero(delta);
        if delta == 0.0 || self.adapter.guard().is_driving() {
            return 0.0;
        }

        let mut consumed = 0.0;
        if delta < 0.0 && source.is_interceptable() && self.extent.can_scroll_backward() {
            consumed += self.adapter.restore_before_reveal(delta);
        }
        consumed += ScrollPhase::PreScroll.intercept(&mut self.extent, delta - consumed, source);
        consumed
    }

    /// The body scrolled by `consumed_by_body` and left `available` over.
    /// Returns the part of `available` the header consumed.
    pub fn post_scroll(
        &mut self,
        consumed_by_body: f32,
        available: f32,
        source: GestureSource,
    ) -> f32 {
        if self.adapter.guard().is_driving() {
            return 0.0;
        }
        tracing::trace!("post_scroll body consumed {consumed_by_body:.2}");
        ScrollPhase::PostScroll.intercept(&mut self.extent, available, source)
    }

    /// A fling is about to start in the body. Returns the velocity consumed.
    pub fn pre_fling(&mut self, velocity: f32) -> f32 {
        self.fling.pre_fling(&mut self.extent, &mut self.adapter, velocity)
    }

    /// The body's fling ended. Returns the part of `available` consumed.
    pub fn post_fling(&mut self, consumed: f32, available: f32) -> f32 {
        self.fling.post_fling(&mut self.extent, &mut self.adapter, consumed, available)
    }

    // =========================================================================
    // Header drags
    // =========================================================================

    /// A drag started on the header; any running fling stops where it is
    pub fn begin_drag(&mut self) {
        self.dragging = true;
        self.fling.on_drag_start(&mut self.extent, &mut self.adapter);
    }

    /// Drag by `delta` (scroll space). The body is returned to its top before
    /// the header reveals, and whatever the header cannot absorb while
    /// collapsing continues into the body. Returns the total consumed.
    pub fn drag_by(&mut self, delta: f32) -> f32 {
        let delta = finite_or_zero(delta);
        if delta == 0.0 {
            return 0.0;
        }

        let restored = self.adapter.restore_before_reveal(delta);
        let remaining = delta - restored;
        let consumption = self.extent.apply(remaining);
        let forwarded = self.adapter.forward_residual(consumption.leftover(remaining));

        tracing::trace!(
            "drag delta={:.2} body_restore={:.2} header={:.2} body_forward={:.2} offset={}",
            delta,
            restored,
            consumption.consumed,
            forwarded,
            self.extent.offset()
        );
        restored + consumption.consumed + forwarded
    }

    /// The drag ended with release `velocity`; start a header fling if it is
    /// fast enough
    pub fn end_drag(&mut self, velocity: f32) {
        self.dragging = false;
        let velocity = finite_or_zero(velocity);
        if is_at_rest(velocity, self.config.decay.velocity_threshold) {
            return;
        }
        self.fling.start_outer_fling(
            &mut self.extent,
            &mut self.adapter,
            velocity,
            event_types::OUTER_FLING_START,
        );
    }

    // =========================================================================
    // Flings and programmatic scrolling
    // =========================================================================

    /// Apply this frame's fling progress. Call after ticking the scheduler.
    ///
    /// Returns true while a header animation is still running.
    pub fn tick(&mut self) -> bool {
        self.fling.tick(&mut self.extent, &mut self.adapter)
    }

    pub fn cancel_fling(&mut self) {
        self.fling.cancel(&mut self.extent, &mut self.adapter);
    }

    pub fn fling_state(&self) -> FlingState {
        self.fling.state()
    }

    pub fn fling_history(&self) -> &[FlingTransition] {
        self.fling.history()
    }

    pub fn is_animating(&self) -> bool {
        self.fling.is_animating()
    }

    /// Jump the header to `target`, clamped to its range. Returns the
    /// distance moved.
    pub fn scroll_to(&mut self, target: i32) -> f32 {
        self.fling.cancel(&mut self.extent, &mut self.adapter);
        let target = target.clamp(0, self.extent.max_offset());
        let delta = target as f32 - self.extent.exact_offset();
        let consumption = self.extent.apply(delta);
        tracing::trace!("{} scroll_to {target}", GestureSource::Programmatic.name());
        consumption.consumed
    }

    /// Animate the header to `target` with the `scroll_to` spring
    pub fn animate_scroll_to(&mut self, target: i32) {
        self.fling.cancel(&mut self.extent, &mut self.adapter);
        let spring = self.config.scroll_to_spring();
        self.fling.start_settle(
            &mut self.extent,
            target,
            0.0,
            spring,
            event_types::OUTER_FLING_START,
        );
    }
}

/// Coordinator shared between the host and the body's callbacks
pub type SharedCoordinator = Arc<Mutex<NestedScrollCoordinator>>;

/// Cloneable access to a [`SharedCoordinator`]
///
/// The body's scroll callbacks go through the handle. While the coordinator
/// is itself driving the body the callbacks return 0 without touching the
/// lock, so a body that reports its own movement synchronously neither
/// deadlocks nor gets counted twice.
#[derive(Clone)]
pub struct CoordinatorHandle {
    inner: SharedCoordinator,
    guard: EchoGuard,
}

impl CoordinatorHandle {
    pub fn new(coordinator: NestedScrollCoordinator) -> Self {
        let guard = coordinator.guard();
        Self {
            inner: Arc::new(Mutex::new(coordinator)),
            guard,
        }
    }

    pub fn shared(&self) -> &SharedCoordinator {
        &self.inner
    }

    pub fn lock(&self) -> MutexGuard<'_, NestedScrollCoordinator> {
        self.inner.lock()
    }

    fn is_echo(&self, what: &str) -> bool {
        let echo = self.guard.is_driving();
        if echo {
            tracing::trace!("suppressed echoed {what}");
        }
        echo
    }

    pub fn pre_scroll(&self, delta: f32, source: GestureSource) -> f32 {
        if self.is_echo("pre_scroll") {
            return 0.0;
        }
        self.inner.lock().pre_scroll(delta, source)
    }

    pub fn post_scroll(&self, consumed_by_body: f32, available: f32, source: GestureSource) -> f32 {
        if self.is_echo("post_scroll") {
            return 0.0;
        }
        self.inner
            .lock()
            .post_scroll(consumed_by_body, available, source)
    }

    pub fn pre_fling(&self, velocity: f32) -> f32 {
        if self.is_echo("pre_fling") {
            return 0.0;
        }
        self.inner.lock().pre_fling(velocity)
    }

    pub fn post_fling(&self, consumed: f32, available: f32) -> f32 {
        if self.is_echo("post_fling") {
            return 0.0;
        }
        self.inner.lock().post_fling(consumed, available)
    }
}
