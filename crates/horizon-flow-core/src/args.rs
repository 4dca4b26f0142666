//! Per-type callback arguments.
//!
//! Every registered callback receives an [`EventArgs`] built from the raw
//! event. Some fields are sampled live from the input state at dispatch time
//! rather than taken from the payload: the pointer position for enter/leave
//! and wheel events, and the modifier mask for motion and button events.

use crate::event::{Event, EventPayload, EventType, KeyCode, ModifiersState, MouseButton, MouseButtons};

/// Live input state sampled while dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    /// Current pointer position in window coordinates.
    pub pointer: (i32, i32),
    /// Currently held keyboard modifiers.
    pub modifiers: ModifiersState,
}

/// The argument tuple passed to callbacks for one event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventArgs {
    /// Key up/down: `(key, modifiers)`.
    Key {
        key: KeyCode,
        modifiers: ModifiersState,
    },
    /// Window enter/leave: live `(x, y)`.
    Pointer { x: i32, y: i32 },
    /// Motion: `(x, y, dx, dy, buttons, live modifiers)`.
    Motion {
        x: i32,
        y: i32,
        dx: i32,
        dy: i32,
        buttons: MouseButtons,
        modifiers: ModifiersState,
    },
    /// Button up/down: `(x, y, button, live modifiers)`.
    Button {
        x: i32,
        y: i32,
        button: MouseButton,
        modifiers: ModifiersState,
    },
    /// Wheel: `(live x, live y, scroll dx, scroll dy)`.
    Wheel { x: i32, y: i32, dx: f32, dy: f32 },
    /// Resize: `(width, height)`.
    Resize { width: u32, height: u32 },
    /// Every other type.
    None,
}

impl EventArgs {
    /// Build the argument tuple for `event`.
    ///
    /// The mapping is fixed per event type. A payload that does not match its
    /// type yields [`EventArgs::None`].
    pub fn extract(event: &Event, input: &InputState) -> Self {
        let (px, py) = input.pointer;
        match (event.event_type(), event.payload()) {
            (EventType::KEY_DOWN | EventType::KEY_UP, EventPayload::Key { key, modifiers }) => {
                Self::Key {
                    key: *key,
                    modifiers: *modifiers,
                }
            }
            (EventType::WINDOW_ENTER | EventType::WINDOW_LEAVE, _) => Self::Pointer { x: px, y: py },
            (
                EventType::MOUSE_MOTION,
                EventPayload::Motion {
                    x,
                    y,
                    dx,
                    dy,
                    buttons,
                },
            ) => Self::Motion {
                x: *x,
                y: *y,
                dx: *dx,
                dy: *dy,
                buttons: *buttons,
                modifiers: input.modifiers,
            },
            (
                EventType::MOUSE_BUTTON_DOWN | EventType::MOUSE_BUTTON_UP,
                EventPayload::Button { x, y, button },
            ) => Self::Button {
                x: *x,
                y: *y,
                button: *button,
                modifiers: input.modifiers,
            },
            (EventType::MOUSE_WHEEL, EventPayload::Wheel { dx, dy }) => Self::Wheel {
                x: px,
                y: py,
                dx: *dx,
                dy: *dy,
            },
            (EventType::WINDOW_RESIZED, EventPayload::Resize { width, height }) => Self::Resize {
                width: *width,
                height: *height,
            },
            _ => Self::None,
        }
    }
}
