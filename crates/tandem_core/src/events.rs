//! Gesture event vocabulary
//!
//! Event ids drive the fling state machine; `GestureSource` tells the
//! interception protocol where a delta came from.

/// Event type identifier
pub type EventType = u32;

/// Gesture and fling lifecycle events
pub mod event_types {
    use super::EventType;

    /// Pointer went down and started moving the content
    pub const DRAG_START: EventType = 1;

    /// Header started its own fling (release on the header, or animated scroll)
    pub const OUTER_FLING_START: EventType = 10;
    /// Incoming body fling was stolen into a header settle
    pub const FLING_INTERCEPTED: EventType = 11;
    /// Body started flinging on its own
    pub const BODY_FLING_START: EventType = 12;

    /// Header fling hit a boundary and passed residual velocity to the body
    pub const HANDOFF_TO_BODY: EventType = 20;
    /// Body fling finished and passed residual velocity to the header
    pub const HANDOFF_TO_OUTER: EventType = 21;

    /// Velocity decayed below the rest threshold or the target was reached
    pub const SETTLED: EventType = 30;
    /// In-flight fling was cancelled (new drag, new fling, detach)
    pub const CANCEL: EventType = 31;
}

/// Where a scroll delta originated
///
/// Only non-fling sources are force-intercepted per frame; fling motion is
/// coordinated at the velocity level instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureSource {
    /// Direct pointer drag
    #[default]
    Drag,
    /// Delta produced by a running fling simulation
    Fling,
    /// Delta requested by code (scroll_to, keyboard paging, ...)
    Programmatic,
}

impl GestureSource {
    /// Whether per-frame interception rules apply to deltas from this source
    pub fn is_interceptable(&self) -> bool {
        !matches!(self, GestureSource::Fling)
    }

    /// Short name for logs and replay traces
    pub fn name(&self) -> &'static str {
        match self {
            GestureSource::Drag => "drag",
            GestureSource::Fling => "fling",
            GestureSource::Programmatic => "programmatic",
        }
    }
}

/// Human-readable name of a lifecycle event
pub fn event_name(event: EventType) -> &'static str {
    use event_types::*;
    match event {
        DRAG_START => "drag_start",
        OUTER_FLING_START => "outer_fling_start",
        FLING_INTERCEPTED => "fling_intercepted",
        BODY_FLING_START => "body_fling_start",
        HANDOFF_TO_BODY => "handoff_to_body",
        HANDOFF_TO_OUTER => "handoff_to_outer",
        SETTLED => "settled",
        CANCEL => "cancel",
        _ => "unknown",
    }
}
