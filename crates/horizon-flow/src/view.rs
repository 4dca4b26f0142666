//! Swappable handler sets sharing one window.
//!
//! A [`View`] is a bundle of event handlers. Views are added to a
//! [`Window`](crate::Window), which owns them and hands out a [`ViewId`].
//! Showing a view makes its methods the window's active handlers for every
//! built-in event; only one view is active at a time.
//!
//! Every method has a no-op default, so a view only implements what it
//! cares about.
//!
//! # Example
//!
//! ```
//! use horizon_flow::prelude::*;
//!
//! struct Title;
//!
//! impl View for Title {
//!     fn setup(&mut self, window: &mut Window) {
//!         window.set_background_color(Color::BLACK);
//!     }
//!
//!     fn on_key_press(&mut self, window: &mut Window, key: KeyCode, _: ModifiersState) {
//!         if key == KeyCode::Enter {
//!             if let Some(game) = window.find_view("game") {
//!                 if let Err(err) = game.show(window) {
//!                     tracing::warn!(%err, "could not show the game view");
//!                 }
//!             }
//!         }
//!     }
//! }
//!
//! struct Game;
//! impl View for Game {}
//!
//! let mut window = Window::new(WindowConfig::default(), Box::new(HeadlessBackend::new()));
//! let title = window.add_view("title", Title);
//! window.add_view("game", Game);
//! title.show(&mut window).unwrap();
//! assert_eq!(window.background_color(), Color::BLACK);
//! ```

use std::any::Any;

use horizon_flow_core::{KeyCode, ModifiersState, MouseButton, MouseButtons, Result};
use slotmap::{new_key_type, Key, KeyData};

use crate::window::Window;

new_key_type! {
    /// Handle to a view owned by a [`Window`].
    pub struct ViewId;
}

impl ViewId {
    /// Make this view the window's active handler set.
    pub fn show(self, window: &mut Window) -> Result<()> {
        window.show_view(self)
    }

    /// Show this view, then run the window loop.
    pub fn run(self, window: &mut Window) -> Result<()> {
        window.run_view(self)
    }
}

/// Whose methods currently receive the window's built-in events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// The window's own no-op defaults.
    Window,
    /// A view added to the window.
    View(ViewId),
}

impl Binding {
    /// Owner tag stored on registry slots installed for the window itself.
    /// Slotmap keys never encode to zero.
    const WINDOW_TAG: u64 = 0;

    pub(crate) fn owner_tag(self) -> u64 {
        match self {
            Self::Window => Self::WINDOW_TAG,
            Self::View(id) => id.data().as_ffi(),
        }
    }

    pub(crate) fn from_owner_tag(tag: u64) -> Self {
        if tag == Self::WINDOW_TAG {
            Self::Window
        } else {
            Self::View(ViewId::from(KeyData::from_ffi(tag)))
        }
    }
}

/// A set of handlers for window events.
///
/// Every method receives the window the view is bound to, so handlers can
/// change the background, post events or switch to another view.
#[allow(unused_variables)]
pub trait View: Any {
    /// Called each time the view is shown, after its handlers are bound.
    fn setup(&mut self, window: &mut Window) {}

    /// Draw the frame. Called once per frame after `on_update`.
    fn on_draw(&mut self, window: &mut Window) {}

    /// Advance state. Called once per frame after the window is cleared.
    fn on_update(&mut self, window: &mut Window) {}

    /// A key was pressed.
    fn on_key_press(&mut self, window: &mut Window, key: KeyCode, modifiers: ModifiersState) {}

    /// A key was released.
    fn on_key_release(&mut self, window: &mut Window, key: KeyCode, modifiers: ModifiersState) {}

    /// The pointer entered the window at `(x, y)`.
    fn on_mouse_enter(&mut self, window: &mut Window, x: i32, y: i32) {}

    /// The pointer left the window at `(x, y)`.
    fn on_mouse_leave(&mut self, window: &mut Window, x: i32, y: i32) {}

    /// The pointer moved with no button held.
    fn on_mouse_motion(
        &mut self,
        window: &mut Window,
        x: i32,
        y: i32,
        dx: i32,
        dy: i32,
        modifiers: ModifiersState,
    ) {
    }

    /// The pointer moved with at least one button held.
    #[allow(clippy::too_many_arguments)]
    fn on_mouse_drag(
        &mut self,
        window: &mut Window,
        x: i32,
        y: i32,
        dx: i32,
        dy: i32,
        buttons: MouseButtons,
        modifiers: ModifiersState,
    ) {
    }

    /// A mouse button was pressed.
    fn on_mouse_press(
        &mut self,
        window: &mut Window,
        x: i32,
        y: i32,
        button: MouseButton,
        modifiers: ModifiersState,
    ) {
    }

    /// A mouse button was released.
    fn on_mouse_release(
        &mut self,
        window: &mut Window,
        x: i32,
        y: i32,
        button: MouseButton,
        modifiers: ModifiersState,
    ) {
    }

    /// The wheel scrolled by `(dx, dy)` while the pointer was at `(x, y)`.
    fn on_mouse_scroll(&mut self, window: &mut Window, x: i32, y: i32, dx: f32, dy: f32) {}

    /// The window was resized.
    fn on_resize(&mut self, window: &mut Window, width: u32, height: u32) {}

    /// The window gained keyboard focus.
    fn on_focus(&mut self, window: &mut Window) {}

    /// The window lost keyboard focus.
    fn on_blur(&mut self, window: &mut Window) {}
}

/// Handlers used while no view is shown.
pub(crate) struct WindowDefaults;

impl View for WindowDefaults {}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    #[test]
    fn test_owner_tag_round_trip() {
        let mut ids: SlotMap<ViewId, ()> = SlotMap::with_key();
        let a = ids.insert(());
        let b = ids.insert(());

        assert_eq!(Binding::from_owner_tag(Binding::Window.owner_tag()), Binding::Window);
        assert_eq!(Binding::from_owner_tag(Binding::View(a).owner_tag()), Binding::View(a));
        assert_ne!(Binding::View(a).owner_tag(), Binding::View(b).owner_tag());
        assert_ne!(Binding::View(a).owner_tag(), 0);
    }
}
