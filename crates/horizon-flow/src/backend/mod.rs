//! Rendering and platform backends.
//!
//! A [`Backend`] is the window's only link to the platform. It combines a
//! [`Renderer`] (surface creation, fill, present, title) with an
//! [`EventSource`] (event queue, timers, pause, live input state).
//!
//! Two implementations ship with the crate:
//!
//! - [`HeadlessBackend`]: never opens an OS window; frames and titles are
//!   recorded in memory. Used by tests and CI.
//! - `WinitBackend` (feature `winit-backend`): a native window driven by
//!   winit with a software framebuffer.

mod headless;
#[cfg(feature = "winit-backend")]
mod native;

use horizon_flow_core::{EventSource, Result};

use crate::color::Color;
use crate::config::WindowConfig;

pub use headless::{HeadlessBackend, HeadlessProbe};
#[cfg(feature = "winit-backend")]
pub use native::WinitBackend;

/// The drawing half of a backend.
pub trait Renderer {
    /// Create (or recreate) the window surface described by `config`.
    fn create_surface(&mut self, config: &WindowConfig) -> Result<()>;

    /// Fill the whole surface with `color`.
    fn fill(&mut self, color: Color) -> Result<()>;

    /// Show the current frame.
    fn present(&mut self) -> Result<()>;

    /// Change the window caption.
    fn set_title(&mut self, title: &str);

    /// Size of the primary display, if known.
    fn display_size(&self) -> Option<(u32, u32)>;

    /// Release the surface and any platform resources. Must be idempotent.
    fn shutdown(&mut self);
}

/// A complete platform backend.
pub trait Backend: Renderer + EventSource {
    /// View the backend as its event source.
    fn as_event_source(&mut self) -> &mut dyn EventSource;
}

impl<T: Renderer + EventSource> Backend for T {
    fn as_event_source(&mut self) -> &mut dyn EventSource {
        self
    }
}
