//! A backend that never touches the platform.
//!
//! Time is virtual: it only advances when the window pauses (the frame
//! throttle included), so timers fire deterministically no matter how fast
//! the host runs the loop.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use horizon_flow_core::{
    Event, EventQueue, EventSource, FlowError, InputState, ModifiersState, Result,
};

use super::Renderer;
use crate::color::Color;
use crate::config::WindowConfig;

#[derive(Debug)]
struct HeadlessState {
    queue: EventQueue,
    script: VecDeque<Vec<Event>>,
    surface: Option<WindowConfig>,
    fill: Option<Color>,
    frames: Vec<Color>,
    title: String,
    display_size: (u32, u32),
    epoch: Instant,
    elapsed: Duration,
    pauses: Vec<Duration>,
    quit_after: Option<usize>,
    shutdowns: usize,
}

impl HeadlessState {
    fn now(&self) -> Instant {
        self.epoch + self.elapsed
    }
}

/// In-memory backend for tests and CI.
///
/// # Example
///
/// ```
/// use horizon_flow::{Color, HeadlessBackend, Window, WindowConfig};
///
/// let backend = HeadlessBackend::new();
/// let probe = backend.probe();
/// probe.quit_after(3);
///
/// let mut window = Window::new(WindowConfig::default(), Box::new(backend));
/// window.set_background_color(Color::BLACK);
/// window.run().unwrap();
///
/// assert_eq!(probe.frames(), vec![Color::BLACK; 3]);
/// assert!(probe.is_shut_down());
/// ```
#[derive(Debug)]
pub struct HeadlessBackend {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessBackend {
    /// Create a backend with an empty queue and a 1920x1080 display.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(HeadlessState {
                queue: EventQueue::new(),
                script: VecDeque::new(),
                surface: None,
                fill: None,
                frames: Vec::new(),
                title: String::new(),
                display_size: (1920, 1080),
                epoch: Instant::now(),
                elapsed: Duration::ZERO,
                pauses: Vec::new(),
                quit_after: None,
                shutdowns: 0,
            })),
        }
    }

    /// Report `size` as the display size.
    pub fn with_display_size(self, width: u32, height: u32) -> Self {
        self.state.borrow_mut().display_size = (width, height);
        self
    }

    /// A handle for feeding input and inspecting output after the backend
    /// has been moved into a window.
    pub fn probe(&self) -> HeadlessProbe {
        HeadlessProbe {
            state: Rc::clone(&self.state),
        }
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HeadlessBackend {
    fn create_surface(&mut self, config: &WindowConfig) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.title = config.title.clone();
        state.surface = Some(config.clone());
        tracing::debug!(
            target: "horizon_flow::backend",
            width = config.width,
            height = config.height,
            "headless surface created"
        );
        Ok(())
    }

    fn fill(&mut self, color: Color) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.surface.is_none() {
            return Err(FlowError::backend("fill before the surface was created"));
        }
        state.fill = Some(color);
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.surface.is_none() {
            return Err(FlowError::backend("present before the surface was created"));
        }
        let frame = state.fill.unwrap_or_default();
        state.frames.push(frame);
        if state.quit_after.is_some_and(|n| state.frames.len() >= n) {
            state.quit_after = None;
            state.queue.push(Event::quit());
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.state.borrow_mut().title = title.to_owned();
    }

    fn display_size(&self) -> Option<(u32, u32)> {
        Some(self.state.borrow().display_size)
    }

    fn shutdown(&mut self) {
        let mut state = self.state.borrow_mut();
        state.surface = None;
        state.shutdowns += 1;
    }
}

impl EventSource for HeadlessBackend {
    fn poll_events(&mut self) -> Vec<Event> {
        let mut state = self.state.borrow_mut();
        if let Some(batch) = state.script.pop_front() {
            for event in batch {
                state.queue.push(event);
            }
        }
        let now = state.now();
        state.queue.poll_events_at(now)
    }

    fn post_event(&mut self, event: Event) {
        self.state.borrow_mut().queue.push(event);
    }

    fn set_timer(&mut self, event: Event, interval: Option<Duration>) {
        let mut state = self.state.borrow_mut();
        let now = state.now();
        state.queue.set_timer_at(event, interval, now);
    }

    fn pause(&mut self, duration: Duration) {
        let mut state = self.state.borrow_mut();
        state.elapsed += duration;
        state.pauses.push(duration);
    }

    fn input_state(&self) -> InputState {
        self.state.borrow().queue.input_state()
    }
}

/// Shared view into a [`HeadlessBackend`].
#[derive(Debug, Clone)]
pub struct HeadlessProbe {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessProbe {
    /// Queue an event for the next poll.
    pub fn push_event(&self, event: Event) {
        self.state.borrow_mut().queue.push(event);
    }

    /// Queue a batch to be delivered on a later poll, one batch per frame.
    pub fn script_frame(&self, events: Vec<Event>) {
        self.state.borrow_mut().script.push_back(events);
    }

    /// Post a quit event once `frames` frames have been presented.
    pub fn quit_after(&self, frames: usize) {
        self.state.borrow_mut().quit_after = Some(frames);
    }

    /// Move the live pointer.
    pub fn set_pointer(&self, x: i32, y: i32) {
        self.state.borrow_mut().queue.set_pointer(x, y);
    }

    /// Change the live modifier mask.
    pub fn set_modifiers(&self, modifiers: ModifiersState) {
        self.state.borrow_mut().queue.set_modifiers(modifiers);
    }

    /// The fill colour of every presented frame, oldest first.
    pub fn frames(&self) -> Vec<Color> {
        self.state.borrow().frames.clone()
    }

    /// The configuration the current surface was created with.
    pub fn surface(&self) -> Option<WindowConfig> {
        self.state.borrow().surface.clone()
    }

    /// The current window caption.
    pub fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    /// Every pause requested so far.
    pub fn pauses(&self) -> Vec<Duration> {
        self.state.borrow().pauses.clone()
    }

    /// Virtual time elapsed.
    pub fn elapsed(&self) -> Duration {
        self.state.borrow().elapsed
    }

    /// Number of active timers.
    pub fn active_timers(&self) -> usize {
        self.state.borrow().queue.timers().active_count()
    }

    /// Returns `true` once the window has shut the backend down.
    pub fn is_shut_down(&self) -> bool {
        self.state.borrow().shutdowns > 0
    }

    /// How many times `shutdown` was called.
    pub fn shutdown_count(&self) -> usize {
        self.state.borrow().shutdowns
    }
}
