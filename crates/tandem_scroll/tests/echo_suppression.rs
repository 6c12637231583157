//! A body that reports its own movement synchronously, the way platform
//! scroll views do, must not see that movement counted twice.

use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Arc;

use tandem_scroll::{CoordinatorHandle, GestureSource, InMemoryBody, NestedScrollCoordinator};

struct Echoes {
    calls: Arc<AtomicUsize>,
    consumed: Arc<AtomicI32>,
}

/// Coordinator with header max 300 at offset 100 and a body at `body_offset`
/// whose listener feeds every movement back into `pre_scroll`
fn setup(body_offset: i32) -> (CoordinatorHandle, Echoes) {
    let handle = CoordinatorHandle::new(NestedScrollCoordinator::default());
    {
        let mut coordinator = handle.lock();
        coordinator.set_max_offset(300);
        coordinator.scroll_to(100);
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let consumed = Arc::new(AtomicI32::new(0));
    let echo = handle.clone();
    let (calls_sink, consumed_sink) = (Arc::clone(&calls), Arc::clone(&consumed));
    let body = InMemoryBody::new(1000)
        .with_offset(body_offset)
        .with_scroll_listener(Box::new(move |delta| {
            calls_sink.fetch_add(1, Ordering::SeqCst);
            let taken = echo.pre_scroll(delta as f32, GestureSource::Drag);
            consumed_sink.fetch_add(taken as i32, Ordering::SeqCst);
        }));
    handle.lock().attach_body(Box::new(body));

    (handle, Echoes { calls, consumed })
}

#[test]
fn test_adapter_scroll_is_not_echoed_into_header() {
    let (handle, echoes) = setup(200);

    assert_eq!(handle.lock().scroll_body_by(-40), -40);

    let coordinator = handle.lock();
    assert_eq!(coordinator.body_offset(), 160);
    assert_eq!(coordinator.current_offset(), 100);
    assert_eq!(echoes.calls.load(Ordering::SeqCst), 1);
    assert_eq!(echoes.consumed.load(Ordering::SeqCst), 0);
}

#[test]
fn test_reveal_drag_moves_header_exactly_once() {
    let (handle, echoes) = setup(40);

    // 40 returns the body to its top, the other 20 reveals the header
    assert_eq!(handle.lock().drag_by(-60.0), -60.0);

    let coordinator = handle.lock();
    assert_eq!(coordinator.body_offset(), 0);
    assert_eq!(coordinator.current_offset(), 80);
    assert_eq!(echoes.calls.load(Ordering::SeqCst), 1);
    assert_eq!(echoes.consumed.load(Ordering::SeqCst), 0);
}

#[test]
fn test_collapse_drag_forwards_into_body_once() {
    let (handle, echoes) = setup(0);

    assert_eq!(handle.lock().drag_by(250.0), 250.0);

    let coordinator = handle.lock();
    assert_eq!(coordinator.current_offset(), 300);
    assert_eq!(coordinator.body_offset(), 50);
    assert_eq!(echoes.consumed.load(Ordering::SeqCst), 0);
}

#[test]
fn test_callbacks_outside_a_drive_are_handled() {
    let (handle, _echoes) = setup(0);

    assert_eq!(handle.pre_scroll(30.0, GestureSource::Drag), 30.0);
    assert_eq!(handle.post_scroll(0.0, -10.0, GestureSource::Drag), -10.0);
    assert_eq!(handle.lock().current_offset(), 120);
}

#[test]
fn test_guard_is_lowered_after_each_drive() {
    let (handle, _echoes) = setup(200);
    let guard = handle.lock().guard();

    handle.lock().scroll_body_by(-10);
    assert!(!guard.is_driving());
    handle.lock().drag_by(-300.0);
    assert!(!guard.is_driving());
}
