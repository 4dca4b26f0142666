//! Horizon Flow - windows, swappable views and event dispatch.
//!
//! This is the main crate. It re-exports everything from
//! `horizon-flow-core` and adds:
//!
//! - **Window**: a fixed-rate run loop that clears, updates, draws and
//!   presents, dispatching queued events between frames
//! - **Views**: bundles of handlers that can be swapped in and out of a
//!   window at runtime
//! - **App**: a context that owns the active window
//! - **Backends**: a native winit window (feature `winit-backend`) or a
//!   headless backend for tests
//!
//! # Example
//!
//! ```
//! use horizon_flow::{Color, Event, EventArgs, EventType, HeadlessBackend, Window, WindowConfig};
//!
//! let backend = HeadlessBackend::new();
//! let probe = backend.probe();
//! probe.quit_after(2);
//! probe.push_event(Event::resized(1024, 768));
//!
//! let mut window = Window::new(WindowConfig::simple(320, 240), Box::new(backend));
//! window.on(EventType::WINDOW_RESIZED, "wide_is_green", |window, args| {
//!     if let EventArgs::Resize { width, .. } = args {
//!         if *width > 800 {
//!             window.set_background_color(Color::GREEN);
//!         }
//!     }
//! });
//! window.run()?;
//!
//! assert_eq!(probe.frames(), vec![Color::GREEN; 2]);
//! # Ok::<(), horizon_flow::FlowError>(())
//! ```

mod app;
pub mod backend;
mod color;
mod config;
pub mod prelude;
mod view;
mod window;

pub use horizon_flow_core::*;

pub use app::{App, HIDE_WELCOME_ENV};
#[cfg(feature = "winit-backend")]
pub use backend::WinitBackend;
pub use backend::{Backend, HeadlessBackend, HeadlessProbe, Renderer};
pub use color::{Color, IntoColor};
pub use config::{ConfigError, WindowConfig};
pub use view::{Binding, View, ViewId};
pub use window::{RunGuard, RunState, Window};
