//! Tandem Scroll
//!
//! Coordinates one gesture across a collapsing header and an independently
//! scrollable body so that dragging or flinging anywhere reads as a single
//! continuous motion.
//!
//! # Features
//!
//! - **Sub-pixel accumulation**: fractional deltas become whole-pixel header
//!   offsets without drift
//! - **Drag interception**: pre-scroll and post-scroll phases decide which
//!   region consumes each delta
//! - **Fling hand-off**: residual velocity at a boundary continues in the
//!   other region
//! - **Echo suppression**: the body's notifications about movement the
//!   coordinator caused are dropped, not counted twice
//!
//! # Example
//!
//! ```rust
//! use tandem_scroll::{InMemoryBody, NestedScrollCoordinator};
//!
//! let mut coordinator = NestedScrollCoordinator::default();
//! coordinator.set_max_offset(300);
//! coordinator.attach_body(Box::new(InMemoryBody::new(2000)));
//!
//! coordinator.begin_drag();
//! coordinator.drag_by(350.0);
//! assert_eq!(coordinator.current_offset(), 300);
//! assert_eq!(coordinator.body_offset(), 50);
//! ```

pub mod accumulator;
pub mod body;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod extent;
pub mod fling;
pub mod interception;
pub mod sync;

pub use accumulator::{Consumption, ScrollAccumulator};
pub use body::{BodyFlingStatus, BodyScroll, InMemoryBody, ScrollListener};
pub use config::{CoordinatorConfig, DecaySettings, HandoffPolicy, SpringSettings};
pub use coordinator::{CoordinatorHandle, NestedScrollCoordinator, Placement, SharedCoordinator};
pub use error::{ConfigError, Result};
pub use extent::{ScrollExtent, UNMEASURED_MAX_OFFSET};
pub use fling::{FlingCoordinator, FlingState, FlingTransition};
pub use interception::ScrollPhase;
pub use sync::{ChildSyncAdapter, DrivingToken, EchoGuard};

pub use tandem_core::GestureSource;
