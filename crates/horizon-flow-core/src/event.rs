//! Event types flowing through the Horizon Flow dispatch loop.

use std::fmt;

use static_assertions::const_assert;

pub use winit::event::MouseButton;
pub use winit::keyboard::{KeyCode, ModifiersState};

/// Free-form attribute bag carried by custom events.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Identifier for a class of event.
///
/// Built-in types cover keyboard, mouse and window notifications. Custom
/// types are allocated at runtime starting above [`EventType::CUSTOM_BASE`]
/// (see [`crate::CustomEvent`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventType(pub u32);

impl EventType {
    /// The window manager asked the window to close.
    pub const QUIT: Self = Self(0x100);
    /// A key was pressed.
    pub const KEY_DOWN: Self = Self(0x300);
    /// A key was released.
    pub const KEY_UP: Self = Self(0x301);
    /// The pointer moved.
    pub const MOUSE_MOTION: Self = Self(0x400);
    /// A mouse button was pressed.
    pub const MOUSE_BUTTON_DOWN: Self = Self(0x401);
    /// A mouse button was released.
    pub const MOUSE_BUTTON_UP: Self = Self(0x402);
    /// The mouse wheel was scrolled.
    pub const MOUSE_WHEEL: Self = Self(0x403);
    /// The pointer entered the window.
    pub const WINDOW_ENTER: Self = Self(0x210);
    /// The pointer left the window.
    pub const WINDOW_LEAVE: Self = Self(0x211);
    /// The window was resized.
    pub const WINDOW_RESIZED: Self = Self(0x212);
    /// The window gained keyboard focus.
    pub const WINDOW_FOCUS_GAINED: Self = Self(0x213);
    /// The window lost keyboard focus.
    pub const WINDOW_FOCUS_LOST: Self = Self(0x214);

    /// First identifier reserved for custom events. Allocated types are
    /// strictly greater than this value.
    pub const CUSTOM_BASE: Self = Self(0x8000);

    /// All built-in event types.
    pub const BUILTIN: [Self; 12] = [
        Self::QUIT,
        Self::KEY_DOWN,
        Self::KEY_UP,
        Self::MOUSE_MOTION,
        Self::MOUSE_BUTTON_DOWN,
        Self::MOUSE_BUTTON_UP,
        Self::MOUSE_WHEEL,
        Self::WINDOW_ENTER,
        Self::WINDOW_LEAVE,
        Self::WINDOW_RESIZED,
        Self::WINDOW_FOCUS_GAINED,
        Self::WINDOW_FOCUS_LOST,
    ];

    /// Returns `true` if this type was allocated for a custom event.
    pub fn is_custom(self) -> bool {
        self.0 > Self::CUSTOM_BASE.0
    }

    /// Human readable name of a built-in type.
    pub fn builtin_name(self) -> Option<&'static str> {
        let name = match self {
            Self::QUIT => "Quit",
            Self::KEY_DOWN => "KeyDown",
            Self::KEY_UP => "KeyUp",
            Self::MOUSE_MOTION => "MouseMotion",
            Self::MOUSE_BUTTON_DOWN => "MouseButtonDown",
            Self::MOUSE_BUTTON_UP => "MouseButtonUp",
            Self::MOUSE_WHEEL => "MouseWheel",
            Self::WINDOW_ENTER => "WindowEnter",
            Self::WINDOW_LEAVE => "WindowLeave",
            Self::WINDOW_RESIZED => "WindowResized",
            Self::WINDOW_FOCUS_GAINED => "WindowFocusGained",
            Self::WINDOW_FOCUS_LOST => "WindowFocusLost",
            _ => return None,
        };
        Some(name)
    }
}

const_assert!(EventType::CUSTOM_BASE.0 > EventType::MOUSE_WHEEL.0);

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.builtin_name() {
            Some(name) => f.write_str(name),
            None if self.is_custom() => write!(f, "Custom({})", self.0 - Self::CUSTOM_BASE.0),
            None => write!(f, "EventType({:#x})", self.0),
        }
    }
}

/// Snapshot of the left, middle and right mouse buttons.
///
/// A motion event with no buttons held is plain motion; anything else is a
/// drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MouseButtons(u8);

impl MouseButtons {
    /// No buttons held.
    pub const NONE: Self = Self(0);
    /// Primary button.
    pub const LEFT: Self = Self(0b001);
    /// Middle button.
    pub const MIDDLE: Self = Self(0b010);
    /// Secondary button.
    pub const RIGHT: Self = Self(0b100);

    /// Build from a `(left, middle, right)` tuple where non-zero means held.
    pub fn from_tuple((left, middle, right): (u8, u8, u8)) -> Self {
        let mut buttons = Self::NONE;
        buttons.set(Self::LEFT, left != 0);
        buttons.set(Self::MIDDLE, middle != 0);
        buttons.set(Self::RIGHT, right != 0);
        buttons
    }

    /// The `(left, middle, right)` tuple form, `1` for held buttons.
    pub fn as_tuple(self) -> (u8, u8, u8) {
        (
            u8::from(self.contains(Self::LEFT)),
            u8::from(self.contains(Self::MIDDLE)),
            u8::from(self.contains(Self::RIGHT)),
        )
    }

    /// Returns `true` when no button is held.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` when every button in `other` is held.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Mark the buttons in `other` as held or released.
    pub fn set(&mut self, other: Self, held: bool) {
        if held {
            self.0 |= other.0;
        } else {
            self.0 &= !other.0;
        }
    }

    /// The tracked flag for a winit button, if it is one of the three tracked.
    pub fn from_button(button: MouseButton) -> Option<Self> {
        match button {
            MouseButton::Left => Some(Self::LEFT),
            MouseButton::Middle => Some(Self::MIDDLE),
            MouseButton::Right => Some(Self::RIGHT),
            _ => None,
        }
    }
}

/// Payload fields of an [`Event`], specific to its type.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    /// No payload (quit, focus, enter/leave).
    None,
    /// Keyboard key press or release.
    Key {
        key: KeyCode,
        modifiers: ModifiersState,
    },
    /// Pointer motion with relative movement and held buttons.
    Motion {
        x: i32,
        y: i32,
        dx: i32,
        dy: i32,
        buttons: MouseButtons,
    },
    /// Mouse button press or release.
    Button { x: i32, y: i32, button: MouseButton },
    /// Scroll wheel movement.
    Wheel { dx: f32, dy: f32 },
    /// New client area size.
    Resize { width: u32, height: u32 },
    /// Application defined event.
    Custom {
        name: Option<String>,
        attrs: Attributes,
    },
}

/// A tagged event record.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    event_type: EventType,
    payload: EventPayload,
}

impl Event {
    /// Create an event from raw parts.
    pub fn new(event_type: EventType, payload: EventPayload) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    /// Window close request.
    pub fn quit() -> Self {
        Self::new(EventType::QUIT, EventPayload::None)
    }

    /// Key press.
    pub fn key_down(key: KeyCode, modifiers: ModifiersState) -> Self {
        Self::new(EventType::KEY_DOWN, EventPayload::Key { key, modifiers })
    }

    /// Key release.
    pub fn key_up(key: KeyCode, modifiers: ModifiersState) -> Self {
        Self::new(EventType::KEY_UP, EventPayload::Key { key, modifiers })
    }

    /// Pointer motion.
    pub fn mouse_motion(x: i32, y: i32, dx: i32, dy: i32, buttons: MouseButtons) -> Self {
        Self::new(
            EventType::MOUSE_MOTION,
            EventPayload::Motion {
                x,
                y,
                dx,
                dy,
                buttons,
            },
        )
    }

    /// Mouse button press.
    pub fn mouse_button_down(x: i32, y: i32, button: MouseButton) -> Self {
        Self::new(
            EventType::MOUSE_BUTTON_DOWN,
            EventPayload::Button { x, y, button },
        )
    }

    /// Mouse button release.
    pub fn mouse_button_up(x: i32, y: i32, button: MouseButton) -> Self {
        Self::new(
            EventType::MOUSE_BUTTON_UP,
            EventPayload::Button { x, y, button },
        )
    }

    /// Scroll wheel.
    pub fn mouse_wheel(dx: f32, dy: f32) -> Self {
        Self::new(EventType::MOUSE_WHEEL, EventPayload::Wheel { dx, dy })
    }

    /// Pointer entered the window.
    pub fn window_enter() -> Self {
        Self::new(EventType::WINDOW_ENTER, EventPayload::None)
    }

    /// Pointer left the window.
    pub fn window_leave() -> Self {
        Self::new(EventType::WINDOW_LEAVE, EventPayload::None)
    }

    /// Window resized.
    pub fn resized(width: u32, height: u32) -> Self {
        Self::new(
            EventType::WINDOW_RESIZED,
            EventPayload::Resize { width, height },
        )
    }

    /// Focus gained.
    pub fn focus_gained() -> Self {
        Self::new(EventType::WINDOW_FOCUS_GAINED, EventPayload::None)
    }

    /// Focus lost.
    pub fn focus_lost() -> Self {
        Self::new(EventType::WINDOW_FOCUS_LOST, EventPayload::None)
    }

    /// The event's type.
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// The event's payload.
    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// Name of a custom event, if it was given one.
    pub fn name(&self) -> Option<&str> {
        match &self.payload {
            EventPayload::Custom { name, .. } => name.as_deref(),
            _ => None,
        }
    }

    /// Attribute bag of a custom event.
    pub fn attrs(&self) -> Option<&Attributes> {
        match &self.payload {
            EventPayload::Custom { attrs, .. } => Some(attrs),
            _ => None,
        }
    }

    /// Merge `extra` into the attribute bag, overwriting same-named keys.
    ///
    /// Events that are not custom get a custom payload first, keeping their
    /// type.
    pub fn merge_attrs(&mut self, extra: Attributes) {
        if !matches!(self.payload, EventPayload::Custom { .. }) {
            self.payload = EventPayload::Custom {
                name: None,
                attrs: Attributes::new(),
            };
        }
        if let EventPayload::Custom { attrs, .. } = &mut self.payload {
            attrs.extend(extra);
        }
    }
}
