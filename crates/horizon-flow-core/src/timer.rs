//! Repeating event timers.
//!
//! Timers are cooperative: nothing fires asynchronously. The owner calls
//! [`TimerManager::process_expired_at`] during its poll step and enqueues the
//! returned events like any other input.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};

use crate::event::{Event, EventType};

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// Internal timer data.
#[derive(Debug)]
struct TimerData {
    /// The event re-posted on every fire.
    event: Event,
    /// Interval between fires.
    interval: Duration,
    /// When this timer should next fire.
    next_fire: Instant,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.fire_time.cmp(&self.fire_time)
    }
}

/// Manages repeating timers, one per event type.
#[derive(Debug, Default)]
pub struct TimerManager {
    /// All registered timers.
    timers: SlotMap<TimerId, TimerData>,
    /// Active timer for each event type.
    by_type: HashMap<EventType, TimerId>,
    /// Pending fires. Stale entries are skipped lazily.
    queue: BinaryHeap<TimerQueueEntry>,
}

impl TimerManager {
    /// Create a new timer manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a repeating timer for `event`, first firing `interval` after `now`.
    ///
    /// An existing timer for the same event type is replaced.
    pub fn start_repeating_at(&mut self, event: Event, interval: Duration, now: Instant) -> TimerId {
        let event_type = event.event_type();
        self.cancel(event_type);

        let next_fire = now + interval;
        let id = self.timers.insert(TimerData {
            event,
            interval,
            next_fire,
        });
        self.by_type.insert(event_type, id);
        self.queue.push(TimerQueueEntry {
            id,
            fire_time: next_fire,
        });

        tracing::trace!(target: "horizon_flow_core::timer", ?id, %event_type, ?interval, "timer started");
        id
    }

    /// Start a repeating timer relative to the current instant.
    pub fn start_repeating(&mut self, event: Event, interval: Duration) -> TimerId {
        self.start_repeating_at(event, interval, Instant::now())
    }

    /// Stop the timer for `event_type`.
    ///
    /// Returns `true` if a timer was active.
    pub fn cancel(&mut self, event_type: EventType) -> bool {
        match self.by_type.remove(&event_type) {
            Some(id) => {
                self.timers.remove(id);
                tracing::trace!(target: "horizon_flow_core::timer", ?id, %event_type, "timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Check if a timer is active for `event_type`.
    pub fn is_active(&self, event_type: EventType) -> bool {
        self.by_type.contains_key(&event_type)
    }

    /// Get the duration from `now` until the next timer fires, if any.
    pub fn time_until_next_at(&mut self, now: Instant) -> Option<Duration> {
        self.discard_stale();
        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    /// Collect the events of every timer due at `now`.
    ///
    /// Each due timer fires once and is rescheduled `interval` after `now`.
    pub fn process_expired_at(&mut self, now: Instant) -> Vec<Event> {
        let mut events = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > now {
                break;
            }
            self.queue.pop();

            // Cancelled or replaced timers leave stale queue entries behind.
            let Some(timer) = self.timers.get_mut(entry.id) else {
                continue;
            };
            if timer.next_fire != entry.fire_time {
                continue;
            }

            tracing::trace!(target: "horizon_flow_core::timer", id = ?entry.id, "timer fired");
            events.push(timer.event.clone());

            timer.next_fire = now + timer.interval;
            self.queue.push(TimerQueueEntry {
                id: entry.id,
                fire_time: timer.next_fire,
            });
        }

        events
    }

    /// Get the number of active timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    fn discard_stale(&mut self) {
        while let Some(entry) = self.queue.peek() {
            let live = self
                .timers
                .get(entry.id)
                .is_some_and(|t| t.next_fire == entry.fire_time);
            if live {
                break;
            }
            self.queue.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventPayload;

    fn custom(n: u32) -> Event {
        Event::new(
            EventType(EventType::CUSTOM_BASE.0 + n),
            EventPayload::Custom {
                name: None,
                attrs: Default::default(),
            },
        )
    }

    #[test]
    fn test_repeating_fires_each_interval() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        timers.start_repeating_at(custom(1), Duration::from_millis(16), start);

        assert!(timers.process_expired_at(start + Duration::from_millis(10)).is_empty());
        assert_eq!(timers.process_expired_at(start + Duration::from_millis(16)).len(), 1);
        assert!(timers.process_expired_at(start + Duration::from_millis(20)).is_empty());
        assert_eq!(timers.process_expired_at(start + Duration::from_millis(32)).len(), 1);
    }

    #[test]
    fn test_cancel_stops_firing() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        timers.start_repeating_at(custom(1), Duration::from_millis(5), start);

        assert!(timers.cancel(custom(1).event_type()));
        assert!(!timers.cancel(custom(1).event_type()));
        assert!(timers.process_expired_at(start + Duration::from_secs(1)).is_empty());
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn test_restart_replaces_interval() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        timers.start_repeating_at(custom(2), Duration::from_millis(5), start);
        timers.start_repeating_at(custom(2), Duration::from_millis(50), start);

        assert_eq!(timers.active_count(), 1);
        assert!(timers.process_expired_at(start + Duration::from_millis(10)).is_empty());
        assert_eq!(timers.process_expired_at(start + Duration::from_millis(50)).len(), 1);
    }

    #[test]
    fn test_time_until_next() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        assert_eq!(timers.time_until_next_at(start), None);

        timers.start_repeating_at(custom(3), Duration::from_millis(100), start);
        timers.start_repeating_at(custom(4), Duration::from_millis(40), start);
        assert_eq!(
            timers.time_until_next_at(start),
            Some(Duration::from_millis(40))
        );

        timers.cancel(custom(4).event_type());
        assert_eq!(
            timers.time_until_next_at(start + Duration::from_millis(30)),
            Some(Duration::from_millis(70))
        );
    }
}
