//! Prelude module for Horizon Flow.
//!
//! ```
//! use horizon_flow::prelude::*;
//! ```
//!
//! This provides access to:
//! - The application context and windows (`App`, `Window`, `WindowConfig`)
//! - Views (`View`, `ViewId`)
//! - Events and input (`Event`, `EventType`, `CustomEvent`, `KeyCode`, ...)
//! - Colours and the headless backend

pub use crate::{App, Binding, Color, HeadlessBackend, View, ViewId, Window, WindowConfig};

pub use horizon_flow_core::{
    CustomEvent, Event, EventArgs, EventType, FlowError, KeyCode, ModifiersState, MouseButton,
    MouseButtons, Result,
};
