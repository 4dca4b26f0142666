//! Event handler registry and dispatch.
//!
//! An [`EventRegistry`] maps each [`EventType`] to a set of named callbacks.
//! The callback's declared name is its identity: registering a second
//! callback with the same name under the same type replaces the first, and
//! removal by name is idempotent.
//!
//! Dispatch works from a snapshot of the slots registered for the event's
//! type, so a callback may freely mutate the registry it was called from
//! (for example when a view switch rebinds every slot). The change becomes
//! visible to the next event.
//!
//! # Example
//!
//! ```
//! use horizon_flow_core::{
//!     dispatch_all, Event, EventArgs, EventRegistry, EventTarget, EventType, InputState,
//!     NamedCallback,
//! };
//!
//! struct Counter {
//!     registry: EventRegistry<Counter>,
//!     quits: u32,
//! }
//!
//! impl EventTarget for Counter {
//!     fn registry(&self) -> &EventRegistry<Self> {
//!         &self.registry
//!     }
//!
//!     fn input_state(&self) -> InputState {
//!         InputState::default()
//!     }
//! }
//!
//! let mut counter = Counter { registry: EventRegistry::new(), quits: 0 };
//! counter.registry.add_handler(
//!     EventType::QUIT,
//!     NamedCallback::new("count_quit", |c: &mut Counter, _args: &EventArgs| c.quits += 1),
//! );
//!
//! dispatch_all(&mut counter, vec![Event::quit(), Event::focus_gained(), Event::quit()]);
//! assert_eq!(counter.quits, 2);
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::args::{EventArgs, InputState};
use crate::event::{Event, EventType};

/// Signature of a registered callback.
pub type CallbackFn<C> = dyn Fn(&mut C, &EventArgs);

/// A callback slot: a declared name plus the callable.
///
/// The optional owner tag records who installed the slot. The registry never
/// interprets it; the window uses it to tell which binding a slot routes to.
pub struct NamedCallback<C> {
    name: Cow<'static, str>,
    owner: Option<u64>,
    func: Rc<CallbackFn<C>>,
}

impl<C> NamedCallback<C> {
    /// Create a callback with the given declared name.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&mut C, &EventArgs) + 'static,
    {
        Self {
            name: name.into(),
            owner: None,
            func: Rc::new(func),
        }
    }

    /// Attach an owner tag.
    pub fn with_owner(mut self, owner: u64) -> Self {
        self.owner = Some(owner);
        self
    }

    /// The declared name, used as the slot key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owner tag, if any.
    pub fn owner(&self) -> Option<u64> {
        self.owner
    }

    /// Call the callback.
    pub fn invoke(&self, target: &mut C, args: &EventArgs) {
        (self.func)(target, args);
    }

    /// Returns `true` if both slots share the same callable.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl<C> Clone for NamedCallback<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            owner: self.owner,
            func: Rc::clone(&self.func),
        }
    }
}

impl<C> fmt::Debug for NamedCallback<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedCallback")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

/// Mapping from event type to named callback slots.
pub struct EventRegistry<C> {
    handlers: HashMap<EventType, HashMap<Cow<'static, str>, NamedCallback<C>>>,
}

impl<C> EventRegistry<C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register `callback` under `event_type`.
    ///
    /// Returns the slot it replaced, if one with the same name existed.
    pub fn add_handler(
        &mut self,
        event_type: EventType,
        callback: NamedCallback<C>,
    ) -> Option<NamedCallback<C>> {
        tracing::trace!(
            target: "horizon_flow_core::registry",
            %event_type,
            name = callback.name(),
            "add handler"
        );
        self.handlers
            .entry(event_type)
            .or_default()
            .insert(callback.name.clone(), callback)
    }

    /// Remove the slot named `name` under `event_type`.
    ///
    /// Missing types or names are not an error.
    pub fn remove_handler(&mut self, event_type: EventType, name: &str) -> Option<NamedCallback<C>> {
        let slots = self.handlers.get_mut(&event_type)?;
        let removed = slots.remove(name);
        if slots.is_empty() {
            self.handlers.remove(&event_type);
        }
        removed
    }

    /// Install every `(type, callback)` pair in one pass.
    ///
    /// Same-name slots are overwritten; other slots under the same types are
    /// left alone.
    pub fn replace_all<I>(&mut self, callbacks: I)
    where
        I: IntoIterator<Item = (EventType, NamedCallback<C>)>,
    {
        for (event_type, callback) in callbacks {
            self.handlers
                .entry(event_type)
                .or_default()
                .insert(callback.name.clone(), callback);
        }
    }

    /// Look up a single slot.
    pub fn get(&self, event_type: EventType, name: &str) -> Option<&NamedCallback<C>> {
        self.handlers.get(&event_type)?.get(name)
    }

    /// Returns `true` if a slot named `name` exists under `event_type`.
    pub fn contains(&self, event_type: EventType, name: &str) -> bool {
        self.get(event_type, name).is_some()
    }

    /// Names registered under `event_type`, sorted.
    pub fn handler_names(&self, event_type: EventType) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .handlers
            .get(&event_type)
            .map(|slots| slots.keys().map(|k| k.as_ref()).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// Number of slots registered under `event_type`.
    pub fn handler_count(&self, event_type: EventType) -> usize {
        self.handlers.get(&event_type).map_or(0, HashMap::len)
    }

    /// Event types that have at least one slot.
    pub fn event_types(&self) -> impl Iterator<Item = EventType> + '_ {
        self.handlers.keys().copied()
    }

    /// Returns `true` if no slot is registered at all.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Clone out the slots for `event_type`.
    pub fn snapshot(&self, event_type: EventType) -> Vec<NamedCallback<C>> {
        self.handlers
            .get(&event_type)
            .map(|slots| slots.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl<C> Default for EventRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for EventRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (event_type, slots) in &self.handlers {
            let names: Vec<&str> = slots.keys().map(|k| k.as_ref()).collect();
            map.entry(event_type, &names);
        }
        map.finish()
    }
}

/// Something that owns an [`EventRegistry`] keyed on itself and can report
/// live input state.
pub trait EventTarget: Sized {
    /// The registry callbacks are looked up in.
    fn registry(&self) -> &EventRegistry<Self>;

    /// Current pointer position and modifier mask.
    fn input_state(&self) -> InputState;
}

/// Dispatch one event to every callback registered for its type.
///
/// Returns the number of callbacks invoked. Unregistered types are dropped.
pub fn dispatch_event<T: EventTarget>(target: &mut T, event: &Event) -> usize {
    let callbacks = target.registry().snapshot(event.event_type());
    if callbacks.is_empty() {
        tracing::trace!(
            target: "horizon_flow_core::dispatch",
            event_type = %event.event_type(),
            "no handlers, event dropped"
        );
        return 0;
    }

    let args = EventArgs::extract(event, &target.input_state());
    for callback in &callbacks {
        callback.invoke(target, &args);
    }
    callbacks.len()
}

/// Dispatch a batch of events in order.
///
/// Returns the total number of callback invocations.
pub fn dispatch_all<T, I>(target: &mut T, events: I) -> usize
where
    T: EventTarget,
    I: IntoIterator<Item = Event>,
{
    events
        .into_iter()
        .map(|event| dispatch_event(target, &event))
        .sum()
}
