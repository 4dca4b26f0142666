//! The event source collaborator and timer helpers built on it.

use std::time::Duration;

use crate::args::InputState;
use crate::error::{FlowError, Result};
use crate::event::Event;

/// A drainable FIFO queue of events plus timer and pause primitives.
///
/// Backends implement this on top of their native event loop; the in-memory
/// [`crate::EventQueue`] implements it for headless use.
pub trait EventSource {
    /// Drain every pending event in delivery order.
    fn poll_events(&mut self) -> Vec<Event>;

    /// Enqueue `event` for the next poll.
    fn post_event(&mut self, event: Event);

    /// Install (`Some`) or cancel (`None`) a repeating timer that re-posts
    /// `event` at `interval`. At most one timer exists per event type.
    fn set_timer(&mut self, event: Event, interval: Option<Duration>);

    /// Block the calling thread for `duration`.
    fn pause(&mut self, duration: Duration);

    /// Live pointer position and modifier mask.
    fn input_state(&self) -> InputState;
}

/// Convert a millisecond delay into a [`Duration`], rejecting `ms <= 0`.
pub fn positive_millis(ms: i64) -> Result<Duration> {
    u64::try_from(ms)
        .ok()
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
        .ok_or_else(|| {
            FlowError::invalid_argument("ms", format!("must be a positive integer, got {ms}"))
        })
}

/// Re-post `event` every `ms` milliseconds.
///
/// # Errors
///
/// Returns [`FlowError::InvalidArgument`] if `ms <= 0`.
pub fn schedule(source: &mut dyn EventSource, event: &Event, ms: i64) -> Result<()> {
    let interval = positive_millis(ms)?;
    tracing::debug!(
        target: "horizon_flow_core::timer",
        event_type = %event.event_type(),
        ?interval,
        "schedule"
    );
    source.set_timer(event.clone(), Some(interval));
    Ok(())
}

/// Cancel the repeating timer for `event`'s type, if any.
pub fn unschedule(source: &mut dyn EventSource, event: &Event) {
    tracing::debug!(
        target: "horizon_flow_core::timer",
        event_type = %event.event_type(),
        "unschedule"
    );
    source.set_timer(event.clone(), None);
}

/// Block for `ms` milliseconds. Non-positive values return immediately.
pub fn pause(source: &mut dyn EventSource, ms: i64) {
    if let Ok(duration) = positive_millis(ms) {
        source.pause(duration);
    }
}
