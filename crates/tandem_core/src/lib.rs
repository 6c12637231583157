//! Tandem Core
//!
//! This crate provides the shared vocabulary for coordinating one vertical
//! gesture across a collapsing header and an independently scrolling body:
//!
//! - **Gesture Events**: event ids for drag, release, hand-off and settle
//! - **Gesture Sources**: drag, fling and programmatic deltas
//! - **State Transitions**: event-driven transition tables for small state enums
//! - **Numeric Guards**: non-finite input is treated as zero
//!
//! # Example
//!
//! ```rust
//! use tandem_core::events::{event_types, GestureSource};
//! use tandem_core::numeric::finite_or_zero;
//!
//! assert!(GestureSource::Drag.is_interceptable());
//! assert!(!GestureSource::Fling.is_interceptable());
//! assert_eq!(finite_or_zero(f32::NAN), 0.0);
//! assert_ne!(event_types::DRAG_START, event_types::SETTLED);
//! ```

pub mod events;
pub mod fsm;
pub mod numeric;

pub use events::{EventType, GestureSource};
pub use fsm::StateTransitions;
pub use numeric::finite_or_zero;
