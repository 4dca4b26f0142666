//! Native windows through winit, presented with softbuffer.
//!
//! The event loop is never handed over to winit. Each poll pumps pending OS
//! events without blocking, translates them into [`Event`]s and appends them
//! to an [`EventQueue`], which also owns the repeating timers.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use horizon_flow_core::{
    Event, EventQueue, EventSource, FlowError, InputState, ModifiersState, MouseButtons, Result,
};
use softbuffer::{Context, Surface};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop, OwnedDisplayHandle};
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window as WinitWindow, WindowAttributes, WindowId};

use super::Renderer;
use crate::color::Color;
use crate::config::WindowConfig;

/// The OS window and its framebuffer.
///
/// Fields drop in declaration order: the surface goes before the context,
/// and both before the window.
struct Platform {
    surface: Surface<OwnedDisplayHandle, Arc<WinitWindow>>,
    _context: Context<OwnedDisplayHandle>,
    window: Arc<WinitWindow>,
}

/// Receives winit callbacks while the loop is pumped.
struct PumpHandler {
    pending: Option<(WindowAttributes, bool)>,
    platform: Option<Platform>,
    creation_error: Option<String>,
    queue: EventQueue,
    /// Last reported pointer position, `None` until the first move.
    cursor: Option<(i32, i32)>,
    buttons: MouseButtons,
    modifiers: ModifiersState,
    display_size: Option<(u32, u32)>,
}

impl PumpHandler {
    fn create_pending(&mut self, event_loop: &ActiveEventLoop) {
        self.display_size = event_loop.primary_monitor().map(|monitor| {
            let size = monitor.size();
            (size.width, size.height)
        });

        let Some((attrs, center)) = self.pending.take() else {
            return;
        };
        match create_platform(event_loop, attrs, center) {
            Ok(platform) => {
                tracing::debug!(target: "horizon_flow::backend", "native window created");
                self.platform = Some(platform);
            }
            Err(err) => {
                tracing::error!(target: "horizon_flow::backend", error = %err, "window creation failed");
                self.creation_error = Some(err);
            }
        }
    }

    fn translate(&mut self, event: WindowEvent) -> Option<Event> {
        let translated = match event {
            WindowEvent::CloseRequested => Event::quit(),
            WindowEvent::Resized(size) => Event::resized(size.width, size.height),
            WindowEvent::Focused(true) => Event::focus_gained(),
            WindowEvent::Focused(false) => Event::focus_lost(),
            WindowEvent::CursorEntered { .. } => Event::window_enter(),
            WindowEvent::CursorLeft { .. } => Event::window_leave(),
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as i32, position.y as i32);
                let (dx, dy) = pointer_delta(self.cursor, (x, y));
                self.cursor = Some((x, y));
                self.queue.set_pointer(x, y);
                Event::mouse_motion(x, y, dx, dy, self.buttons)
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state == ElementState::Pressed;
                if let Some(flag) = MouseButtons::from_button(button) {
                    self.buttons.set(flag, pressed);
                }
                let (x, y) = self.cursor.unwrap_or_default();
                if pressed {
                    Event::mouse_button_down(x, y, button)
                } else {
                    Event::mouse_button_up(x, y, button)
                }
            }
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(dx, dy) => Event::mouse_wheel(dx, dy),
                MouseScrollDelta::PixelDelta(pos) => Event::mouse_wheel(pos.x as f32, pos.y as f32),
            },
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
                self.queue.set_modifiers(self.modifiers);
                return None;
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => Event::key_down(code, self.modifiers),
                ElementState::Released => Event::key_up(code, self.modifiers),
            },
            _ => return None,
        };
        Some(translated)
    }
}

impl ApplicationHandler for PumpHandler {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, _cause: StartCause) {
        if self.pending.is_some() {
            self.create_pending(event_loop);
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        if let Some(event) = self.translate(event) {
            self.queue.push(event);
        }
    }
}

/// Motion relative to the previous position. The first move has no delta.
fn pointer_delta(previous: Option<(i32, i32)>, (x, y): (i32, i32)) -> (i32, i32) {
    previous.map_or((0, 0), |(px, py)| (x - px, y - py))
}

fn create_platform(
    event_loop: &ActiveEventLoop,
    attrs: WindowAttributes,
    center: bool,
) -> std::result::Result<Platform, String> {
    let window = Arc::new(event_loop.create_window(attrs).map_err(|e| e.to_string())?);
    let context = Context::new(event_loop.owned_display_handle()).map_err(|e| e.to_string())?;
    let surface = Surface::new(&context, Arc::clone(&window)).map_err(|e| e.to_string())?;

    if center {
        if let Some(monitor) = window.current_monitor() {
            let area = monitor.size();
            let origin = monitor.position();
            let outer = window.outer_size();
            window.set_outer_position(PhysicalPosition::new(
                origin.x + (area.width as i32 - outer.width as i32) / 2,
                origin.y + (area.height as i32 - outer.height as i32) / 2,
            ));
        }
    }

    Ok(Platform {
        surface,
        _context: context,
        window,
    })
}

fn window_attributes(config: &WindowConfig) -> WindowAttributes {
    let mut attrs = WindowAttributes::default()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(config.width, config.height))
        .with_resizable(config.resizable)
        .with_decorations(!config.hide_title_bar)
        .with_visible(!config.hidden);
    if config.fullscreen {
        attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    attrs
}

/// Backend that opens a real window.
///
/// Only one may exist per process, since winit allows a single event loop.
pub struct WinitBackend {
    handler: PumpHandler,
    fill: Color,
    // Dropped last, after the window it owns.
    event_loop: EventLoop<()>,
}

impl WinitBackend {
    /// Connect to the platform's windowing system.
    ///
    /// # Errors
    ///
    /// Fails if the event loop cannot be created, for example when no display
    /// is available or an event loop already exists in this process.
    pub fn new() -> Result<Self> {
        let event_loop = EventLoop::new().map_err(|e| FlowError::WindowCreation(e.to_string()))?;
        Ok(Self {
            handler: PumpHandler {
                pending: None,
                platform: None,
                creation_error: None,
                queue: EventQueue::new(),
                cursor: None,
                buttons: MouseButtons::NONE,
                modifiers: ModifiersState::empty(),
                display_size: None,
            },
            fill: Color::default(),
            event_loop,
        })
    }

    fn pump(&mut self, timeout: Duration) {
        let status = self
            .event_loop
            .pump_app_events(Some(timeout), &mut self.handler);
        if let PumpStatus::Exit(code) = status {
            tracing::debug!(target: "horizon_flow::backend", code, "event loop exited");
            self.handler.queue.push(Event::quit());
        }
    }

    fn platform(&mut self) -> Result<&mut Platform> {
        self.handler
            .platform
            .as_mut()
            .ok_or_else(|| FlowError::backend("the window surface has not been created"))
    }
}

impl Renderer for WinitBackend {
    #[tracing::instrument(skip_all, target = "horizon_flow::backend", fields(width = config.width, height = config.height))]
    fn create_surface(&mut self, config: &WindowConfig) -> Result<()> {
        self.handler.platform = None;
        self.handler.creation_error = None;
        self.handler.pending = Some((window_attributes(config), config.center_window));

        if config.vsync {
            tracing::debug!(target: "horizon_flow::backend", "vsync is not available on a software surface");
        }
        if config.antialiasing {
            tracing::debug!(target: "horizon_flow::backend", "antialiasing is not available on a software surface");
        }

        self.pump(Duration::from_millis(100));

        if let Some(err) = self.handler.creation_error.take() {
            return Err(FlowError::WindowCreation(err));
        }
        if self.handler.platform.is_none() {
            self.handler.pending = None;
            return Err(FlowError::WindowCreation(
                "the event loop never became ready".to_string(),
            ));
        }
        Ok(())
    }

    fn fill(&mut self, color: Color) -> Result<()> {
        self.platform()?;
        self.fill = color;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        let pixel = self.fill.to_xrgb();
        let platform = self.platform()?;
        let size = platform.window.inner_size();
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            // Minimised windows have no area to draw into.
            return Ok(());
        };

        platform
            .surface
            .resize(width, height)
            .map_err(|e| FlowError::backend(e.to_string()))?;
        let mut buffer = platform
            .surface
            .buffer_mut()
            .map_err(|e| FlowError::backend(e.to_string()))?;
        buffer.fill(pixel);
        platform.window.pre_present_notify();
        buffer.present().map_err(|e| FlowError::backend(e.to_string()))
    }

    fn set_title(&mut self, title: &str) {
        if let Some(platform) = &self.handler.platform {
            platform.window.set_title(title);
        }
    }

    fn display_size(&self) -> Option<(u32, u32)> {
        self.handler.display_size
    }

    fn shutdown(&mut self) {
        self.handler.pending = None;
        if let Some(platform) = self.handler.platform.take() {
            tracing::debug!(target: "horizon_flow::backend", "closing native window");
            drop(platform);
            // Let the platform process the destroy request.
            self.pump(Duration::ZERO);
        }
    }
}

impl EventSource for WinitBackend {
    fn poll_events(&mut self) -> Vec<Event> {
        self.pump(Duration::ZERO);
        self.handler.queue.poll_events()
    }

    fn post_event(&mut self, event: Event) {
        self.handler.queue.push(event);
    }

    fn set_timer(&mut self, event: Event, interval: Option<Duration>) {
        self.handler.queue.set_timer(event, interval);
    }

    fn pause(&mut self, duration: Duration) {
        self.handler.queue.pause(duration);
    }

    fn input_state(&self) -> InputState {
        self.handler.queue.input_state()
    }
}
