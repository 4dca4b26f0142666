//! Application context.
//!
//! [`App`] holds the active window and forwards the common window commands
//! to it. Every forwarding method fails with [`FlowError::NotActive`] until a
//! window has been opened or set.

use std::sync::Once;

use horizon_flow_core::{Event, FlowError, Result};

use crate::backend::Backend;
use crate::color::{Color, IntoColor};
use crate::config::WindowConfig;
use crate::window::Window;

/// Set this environment variable to suppress the welcome banner.
pub const HIDE_WELCOME_ENV: &str = "HORIZON_FLOW_HIDE_WELCOME";

static WELCOME: Once = Once::new();

fn log_welcome() {
    WELCOME.call_once(|| {
        if std::env::var_os(HIDE_WELCOME_ENV).is_none() {
            tracing::info!(
                target: "horizon_flow::app",
                version = env!("CARGO_PKG_VERSION"),
                "Hello from the Horizon Flow community"
            );
        }
    });
}

/// Owner of the active window.
///
/// # Example
///
/// ```
/// use horizon_flow::{App, FlowError, HeadlessBackend, WindowConfig};
///
/// let mut app = App::new();
/// assert!(matches!(app.window(), Err(FlowError::NotActive)));
///
/// app.open_window_with(WindowConfig::simple(640, 480), Box::new(HeadlessBackend::new()));
/// app.set_background_color("black")?;
/// assert_eq!(app.window()?.size(), (640, 480));
/// assert!(app.is_aa_enabled()?);
/// # Ok::<(), FlowError>(())
/// ```
#[derive(Debug)]
pub struct App {
    window: Option<Window>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create a context with no active window.
    pub fn new() -> Self {
        log_welcome();
        Self { window: None }
    }

    /// Open a native window and make it active.
    ///
    /// Any previously active window is closed.
    #[cfg(feature = "winit-backend")]
    pub fn open_window(&mut self, config: WindowConfig) -> Result<&mut Window> {
        let window = Window::open(config)?;
        Ok(self.set_window(window))
    }

    /// Create a window on `backend` and make it active.
    ///
    /// Any previously active window is closed.
    pub fn open_window_with(&mut self, config: WindowConfig, backend: Box<dyn Backend>) -> &mut Window {
        self.set_window(Window::new(config, backend))
    }

    /// Make `window` the active window.
    ///
    /// Any previously active window is closed.
    pub fn set_window(&mut self, window: Window) -> &mut Window {
        if let Some(mut previous) = self.window.take() {
            previous.close();
        }
        tracing::debug!(target: "horizon_flow::app", "active window set");
        self.window.insert(window)
    }

    /// The active window.
    pub fn window(&self) -> Result<&Window> {
        self.window.as_ref().ok_or(FlowError::NotActive)
    }

    /// The active window, mutably.
    pub fn window_mut(&mut self) -> Result<&mut Window> {
        self.window.as_mut().ok_or(FlowError::NotActive)
    }

    /// Detach the active window without closing it.
    pub fn take_window(&mut self) -> Option<Window> {
        self.window.take()
    }

    /// Run the active window's loop.
    pub fn run(&mut self) -> Result<()> {
        self.window_mut()?.run()
    }

    /// Close the active window and clear it.
    pub fn close_window(&mut self) -> Result<()> {
        let mut window = self.window.take().ok_or(FlowError::NotActive)?;
        window.close();
        Ok(())
    }

    /// Close any active window and drop the context.
    pub fn exit(mut self) {
        if let Some(mut window) = self.window.take() {
            window.close();
        }
        tracing::debug!(target: "horizon_flow::app", "exit");
    }

    /// Change the active window's background colour.
    ///
    /// Accepts a [`Color`], an RGB(A) tuple, or a name / hex string.
    pub fn set_background_color(&mut self, color: impl IntoColor) -> Result<()> {
        let color = color.into_color()?;
        self.window_mut()?.set_background_color(color);
        Ok(())
    }

    /// The active window's background colour.
    pub fn background_color(&self) -> Result<Color> {
        Ok(self.window()?.background_color())
    }

    /// Change the active window's caption.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        self.window_mut()?.set_title(title);
        Ok(())
    }

    /// The active window's caption.
    pub fn title(&self) -> Result<String> {
        Ok(self.window()?.title().to_owned())
    }

    /// Whether the active window requested antialiasing.
    pub fn is_aa_enabled(&self) -> Result<bool> {
        Ok(self.window()?.config().antialiasing)
    }

    /// Whether the active window requested vertical sync.
    pub fn is_vsync_enabled(&self) -> Result<bool> {
        Ok(self.window()?.config().vsync)
    }

    /// Size of the primary display.
    pub fn display_size(&self) -> Result<(u32, u32)> {
        self.window()?
            .display_size()
            .ok_or_else(|| FlowError::backend("display size is not available"))
    }

    /// Re-post `event` every `ms` milliseconds on the active window.
    pub fn schedule(&mut self, event: &Event, ms: i64) -> Result<()> {
        self.window_mut()?.schedule(event, ms)
    }

    /// Cancel the repeating timer for `event` on the active window.
    pub fn unschedule(&mut self, event: &Event) -> Result<()> {
        self.window_mut()?.unschedule(event);
        Ok(())
    }

    /// Block for `ms` milliseconds.
    pub fn pause(&mut self, ms: i64) -> Result<()> {
        self.window_mut()?.pause(ms);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;

    fn app_with_window() -> (App, crate::backend::HeadlessProbe) {
        let backend = HeadlessBackend::new().with_display_size(2560, 1440);
        let probe = backend.probe();
        let mut app = App::new();
        app.open_window_with(
            WindowConfig::simple(800, 600).with_title("Test"),
            Box::new(backend),
        );
        (app, probe)
    }

    #[test]
    fn test_default_matches_new() {
        let app = App::default();
        assert!(WELCOME.is_completed());
        assert!(matches!(app.window(), Err(FlowError::NotActive)));
    }

    #[test]
    fn test_not_active_before_open() {
        let mut app = App::new();
        assert!(matches!(app.window(), Err(FlowError::NotActive)));
        assert!(matches!(app.set_title("x"), Err(FlowError::NotActive)));
        assert!(matches!(app.close_window(), Err(FlowError::NotActive)));
        assert!(matches!(app.run(), Err(FlowError::NotActive)));
    }

    #[test]
    fn test_forwards_to_active_window() {
        let (mut app, probe) = app_with_window();

        app.set_background_color("#102030").unwrap();
        assert_eq!(app.background_color().unwrap(), Color::rgb(0x10, 0x20, 0x30));

        app.set_title("Renamed").unwrap();
        assert_eq!(app.title().unwrap(), "Renamed");
        assert_eq!(probe.title(), "Renamed");

        assert!(app.is_aa_enabled().unwrap());
        assert!(!app.is_vsync_enabled().unwrap());
        assert_eq!(app.display_size().unwrap(), (2560, 1440));
    }

    #[test]
    fn test_bad_colour_leaves_background() {
        let (mut app, _) = app_with_window();
        assert!(app.set_background_color("plaid").unwrap_err().is_invalid_argument());
        assert_eq!(app.background_color().unwrap(), Color::WHITE);
    }

    #[test]
    fn test_schedule_validates_on_active_window() {
        let (mut app, probe) = app_with_window();
        let event = Event::focus_gained();

        assert!(app.schedule(&event, 0).unwrap_err().is_invalid_argument());
        assert!(app.schedule(&event, -5).unwrap_err().is_invalid_argument());
        app.schedule(&event, 16).unwrap();
        assert_eq!(probe.active_timers(), 1);
        app.unschedule(&event).unwrap();
        assert_eq!(probe.active_timers(), 0);
    }

    #[test]
    fn test_close_window_clears() {
        let (mut app, probe) = app_with_window();
        app.close_window().unwrap();
        assert!(probe.is_shut_down());
        assert!(matches!(app.window(), Err(FlowError::NotActive)));
    }

    #[test]
    fn test_set_window_closes_previous() {
        let (mut app, first) = app_with_window();
        let second = HeadlessBackend::new();
        app.open_window_with(WindowConfig::default(), Box::new(second));
        assert!(first.is_shut_down());
        assert_eq!(app.window().unwrap().size(), (800, 600));
        app.exit();
    }
}
