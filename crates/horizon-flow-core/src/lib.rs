//! Core systems for Horizon Flow.
//!
//! This crate provides the windowing-independent half of the Horizon Flow
//! framework:
//!
//! - **Events**: built-in and custom event types with typed payloads
//! - **Registry**: per-type tables of named callbacks, and dispatch
//! - **Custom events**: process-unique user event types that can be posted
//!   and re-posted on a repeating timer
//! - **Event sources**: the queue/timer/pause abstraction backends implement
//! - **Frame clock**: fixed-rate loop pacing
//!
//! # Dispatch Example
//!
//! ```
//! use horizon_flow_core::{
//!     dispatch_all, CustomEvent, EventArgs, EventQueue, EventRegistry, EventSource, EventTarget,
//!     InputState, NamedCallback,
//! };
//!
//! #[derive(Default)]
//! struct Game {
//!     registry: EventRegistry<Game>,
//!     ticks: u32,
//! }
//!
//! impl EventTarget for Game {
//!     fn registry(&self) -> &EventRegistry<Self> {
//!         &self.registry
//!     }
//!
//!     fn input_state(&self) -> InputState {
//!         InputState::default()
//!     }
//! }
//!
//! let mut tick = CustomEvent::new(Some("tick"), Default::default())?;
//! let mut game = Game::default();
//! game.registry.add_handler(
//!     tick.event_type(),
//!     NamedCallback::new("on_tick", |game: &mut Game, _: &EventArgs| game.ticks += 1),
//! );
//!
//! let mut queue = EventQueue::new();
//! tick.post(&mut queue, Default::default());
//! tick.post(&mut queue, Default::default());
//! dispatch_all(&mut game, queue.poll_events());
//! assert_eq!(game.ticks, 2);
//! # Ok::<(), horizon_flow_core::FlowError>(())
//! ```

mod args;
mod clock;
mod custom;
mod error;
mod event;
pub mod logging;
mod queue;
mod registry;
mod source;
mod timer;

pub use args::{EventArgs, InputState};
pub use clock::FrameClock;
pub use custom::{CustomEvent, MAX_CUSTOM_EVENTS};
pub use error::{FlowError, Result};
pub use event::{
    Attributes, Event, EventPayload, EventType, KeyCode, ModifiersState, MouseButton, MouseButtons,
};
pub use queue::EventQueue;
pub use registry::{dispatch_all, dispatch_event, CallbackFn, EventRegistry, EventTarget, NamedCallback};
pub use source::{pause, positive_millis, schedule, unschedule, EventSource};
pub use timer::{TimerId, TimerManager};
