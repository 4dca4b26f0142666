//! In-memory event source.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::args::InputState;
use crate::event::{Event, ModifiersState};
use crate::source::EventSource;
use crate::timer::TimerManager;

/// A FIFO event queue with repeating timers.
///
/// Used by headless backends and tests. Events pushed by the caller and
/// events produced by expired timers come out of [`EventQueue::poll_events`]
/// in the order they were enqueued. `pause` sleeps the calling thread.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<Event>,
    timers: TimerManager,
    input: InputState,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an event as if it came from the platform.
    pub fn push(&mut self, event: Event) {
        self.pending.push_back(event);
    }

    /// Set the live pointer position reported to dispatch.
    pub fn set_pointer(&mut self, x: i32, y: i32) {
        self.input.pointer = (x, y);
    }

    /// Set the live modifier mask reported to dispatch.
    pub fn set_modifiers(&mut self, modifiers: ModifiersState) {
        self.input.modifiers = modifiers;
    }

    /// Number of queued events, not counting timers yet to fire.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if no event is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Access the timers.
    pub fn timers(&self) -> &TimerManager {
        &self.timers
    }

    /// Install or cancel a timer relative to `now`.
    pub fn set_timer_at(&mut self, event: Event, interval: Option<Duration>, now: Instant) {
        match interval {
            Some(interval) => {
                self.timers.start_repeating_at(event, interval, now);
            }
            None => {
                self.timers.cancel(event.event_type());
            }
        }
    }

    /// Enqueue every timer due at `now`, then drain.
    pub fn poll_events_at(&mut self, now: Instant) -> Vec<Event> {
        self.pending.extend(self.timers.process_expired_at(now));
        self.pending.drain(..).collect()
    }
}

impl EventSource for EventQueue {
    fn poll_events(&mut self) -> Vec<Event> {
        self.poll_events_at(Instant::now())
    }

    fn post_event(&mut self, event: Event) {
        self.push(event);
    }

    fn set_timer(&mut self, event: Event, interval: Option<Duration>) {
        self.set_timer_at(event, interval, Instant::now());
    }

    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn input_state(&self) -> InputState {
        self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventType, KeyCode};

    #[test]
    fn test_poll_drains_in_order() {
        let mut queue = EventQueue::new();
        queue.push(Event::focus_gained());
        queue.post_event(Event::key_down(KeyCode::KeyQ, ModifiersState::empty()));
        queue.push(Event::quit());

        let types: Vec<EventType> = queue.poll_events().iter().map(Event::event_type).collect();
        assert_eq!(
            types,
            vec![EventType::WINDOW_FOCUS_GAINED, EventType::KEY_DOWN, EventType::QUIT]
        );
        assert!(queue.is_empty());
        assert!(queue.poll_events().is_empty());
    }

    #[test]
    fn test_timer_events_follow_pushed_events() {
        let mut queue = EventQueue::new();
        let start = Instant::now();
        queue.set_timer_at(Event::focus_lost(), Some(Duration::from_millis(10)), start);
        queue.push(Event::window_enter());

        let events = queue.poll_events_at(start + Duration::from_millis(10));
        assert_eq!(events, vec![Event::window_enter(), Event::focus_lost()]);

        queue.set_timer_at(Event::focus_lost(), None, start);
        assert!(queue
            .poll_events_at(start + Duration::from_millis(100))
            .is_empty());
    }

    #[test]
    fn test_input_state() {
        let mut queue = EventQueue::new();
        queue.set_pointer(3, 4);
        queue.set_modifiers(ModifiersState::ALT);
        assert_eq!(
            queue.input_state(),
            InputState {
                pointer: (3, 4),
                modifiers: ModifiersState::ALT,
            }
        );
    }
}
