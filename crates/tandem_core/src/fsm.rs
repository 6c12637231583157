//! Event-driven state transitions
//!
//! Small interaction states (fling ownership, drag phase) are plain enums
//! that map an incoming event id to the next state. Unknown pairs yield
//! `None` and leave the state untouched.
//!
//! ```rust
//! use tandem_core::events::event_types::*;
//! use tandem_core::fsm::StateTransitions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Phase {
//!     Resting,
//!     Dragging,
//! }
//!
//! impl StateTransitions for Phase {
//!     fn on_event(&self, event: u32) -> Option<Self> {
//!         match (self, event) {
//!             (Phase::Resting, DRAG_START) => Some(Phase::Dragging),
//!             (Phase::Dragging, SETTLED) => Some(Phase::Resting),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut phase = Phase::Resting;
//! phase.transition(DRAG_START);
//! assert_eq!(phase, Phase::Dragging);
//! assert!(!phase.transition(DRAG_START));
//! assert!(phase.transition(SETTLED));
//! assert_eq!(phase, Phase::Resting);
//! ```

use std::hash::Hash;

use crate::events::EventType;

/// Trait for state enums that handle event transitions
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + Send + Sync + std::fmt::Debug + 'static
{
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: EventType) -> Option<Self>;

    /// Apply `event` in place. Returns true if the state changed.
    fn transition(&mut self, event: EventType) -> bool {
        match self.on_event(event) {
            Some(next) if next != *self => {
                tracing::trace!(
                    "{:?} --{}--> {:?}",
                    self,
                    crate::events::event_name(event),
                    next
                );
                *self = next;
                true
            }
            _ => false,
        }
    }
}
