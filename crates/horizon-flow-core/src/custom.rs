//! Application defined event types.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{FlowError, Result};
use crate::event::{Attributes, Event, EventPayload, EventType};
use crate::source::{self, EventSource};

/// Number of custom types allocated so far. Type `n` is `CUSTOM_BASE + n`.
static ALLOCATED: AtomicU32 = AtomicU32::new(0);

/// Highest number of custom event types a process can allocate.
pub const MAX_CUSTOM_EVENTS: u32 = u32::MAX - EventType::CUSTOM_BASE.0;

/// Reserve the next custom event type.
fn allocate_type() -> Result<EventType> {
    ALLOCATED
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
            (n < MAX_CUSTOM_EVENTS).then_some(n + 1)
        })
        .map(|prev| EventType(EventType::CUSTOM_BASE.0 + prev + 1))
        .map_err(|_| FlowError::EventTypesExhausted)
}

/// A user event with its own, process-unique [`EventType`].
///
/// # Example
///
/// ```
/// use horizon_flow_core::{CustomEvent, EventQueue, EventSource};
/// use serde_json::json;
///
/// let mut tick = CustomEvent::new(Some("tick"), Default::default()).unwrap();
/// let mut queue = EventQueue::new();
///
/// let mut attrs = serde_json::Map::new();
/// attrs.insert("frame".into(), json!(1));
/// tick.post(&mut queue, attrs);
///
/// let events = queue.poll_events();
/// assert_eq!(events[0].event_type(), tick.event_type());
/// assert_eq!(events[0].attrs().unwrap()["frame"], json!(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CustomEvent {
    event: Event,
}

impl CustomEvent {
    /// Allocate a fresh event type, tagged with `name` and carrying `attrs`.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::EventTypesExhausted`] once every identifier above
    /// [`EventType::CUSTOM_BASE`] has been handed out.
    pub fn new(name: Option<&str>, attrs: Attributes) -> Result<Self> {
        let event_type = allocate_type()?;
        tracing::debug!(
            target: "horizon_flow_core::custom",
            %event_type,
            ?name,
            "custom event allocated"
        );
        Ok(Self {
            event: Event::new(
                event_type,
                EventPayload::Custom {
                    name: name.map(str::to_owned),
                    attrs,
                },
            ),
        })
    }

    /// The allocated type.
    pub fn event_type(&self) -> EventType {
        self.event.event_type()
    }

    /// The diagnostic name, if one was given.
    pub fn name(&self) -> Option<&str> {
        self.event.name()
    }

    /// The event as it will be posted.
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Merge `attrs` into the payload and enqueue the event on `source`.
    ///
    /// The merged attributes stick to this event, so later posts and timer
    /// fires carry them as well.
    pub fn post(&mut self, source: &mut dyn EventSource, attrs: Attributes) {
        self.event.merge_attrs(attrs);
        source.post_event(self.event.clone());
    }

    /// Re-post this event every `ms` milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidArgument`] if `ms <= 0`.
    pub fn schedule(&self, source: &mut dyn EventSource, ms: i64) -> Result<()> {
        source::schedule(source, &self.event, ms)
    }

    /// Stop any repeating timer for this event.
    pub fn unschedule(&self, source: &mut dyn EventSource) {
        source::unschedule(source, &self.event);
    }

    /// Number of custom event types allocated in this process.
    pub fn allocated_count() -> u32 {
        ALLOCATED.load(Ordering::Relaxed)
    }
}

impl From<CustomEvent> for Event {
    fn from(custom: CustomEvent) -> Self {
        custom.event
    }
}
