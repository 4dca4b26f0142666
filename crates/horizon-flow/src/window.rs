//! The window: registry owner, view host and render loop.

use std::collections::VecDeque;
use std::fmt;
use std::ops::{Deref, DerefMut};

use horizon_flow_core::{
    dispatch_all, dispatch_event, Event, EventArgs, EventRegistry, EventSource, EventTarget,
    EventType, FlowError, FrameClock, InputState, NamedCallback, Result,
};
use slotmap::SlotMap;

use crate::backend::{Backend, Renderer};
use crate::color::Color;
use crate::config::WindowConfig;
use crate::view::{Binding, View, ViewId, WindowDefaults};

/// Lifecycle of a [`Window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Created, loop not started.
    Idle,
    /// Inside [`Window::run`].
    Running,
    /// Closed. The window cannot run again.
    Closed,
}

/// Name of the pre-wired quit slot.
const CLOSE_SLOT: &str = "close";

struct ViewSlot {
    name: String,
    /// `None` while one of the view's own handlers is executing.
    view: Option<Box<dyn View>>,
}

/// A window with an event registry, a set of views and a frame loop.
///
/// Built-in events are routed to the active [`Binding`]: the window's own
/// no-op handlers until a view is shown, the view's methods afterwards.
/// Extra callbacks can be added for any event type with
/// [`Window::add_event_handler`].
///
/// Each frame runs the same fixed sequence: dispatch pending events, clear
/// to the background colour, `on_update`, `on_draw`, present, then sleep for
/// what is left of the frame budget.
pub struct Window {
    config: WindowConfig,
    backend: Box<dyn Backend>,
    registry: EventRegistry<Window>,
    binding: Binding,
    views: SlotMap<ViewId, ViewSlot>,
    pending_setup: VecDeque<ViewId>,
    state: RunState,
    background: Color,
}

impl Window {
    /// Create a window that draws through `backend`.
    ///
    /// The surface is not created until the loop starts.
    pub fn new(config: WindowConfig, backend: Box<dyn Backend>) -> Self {
        let mut window = Self {
            config,
            backend,
            registry: EventRegistry::new(),
            binding: Binding::Window,
            views: SlotMap::with_key(),
            pending_setup: VecDeque::new(),
            state: RunState::Idle,
            background: Color::default(),
        };
        window.registry.add_handler(
            EventType::QUIT,
            NamedCallback::new(CLOSE_SLOT, |window: &mut Window, _: &EventArgs| window.close())
                .with_owner(Binding::Window.owner_tag()),
        );
        window.rebind(Binding::Window);
        window
    }

    /// Open a native window.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or the platform event loop
    /// cannot be created.
    #[cfg(feature = "winit-backend")]
    pub fn open(config: WindowConfig) -> Result<Self> {
        config.validate()?;
        let backend = crate::backend::WinitBackend::new()?;
        Ok(Self::new(config, Box::new(backend)))
    }

    // ========================================================================
    // Handlers
    // ========================================================================

    /// Register `callback` for `event_type`, replacing a same-named slot.
    pub fn add_event_handler(&mut self, event_type: EventType, callback: NamedCallback<Window>) {
        self.registry.add_handler(event_type, callback);
    }

    /// Register a closure under `name` for `event_type`.
    pub fn on<F>(&mut self, event_type: EventType, name: &'static str, func: F)
    where
        F: Fn(&mut Window, &EventArgs) + 'static,
    {
        self.add_event_handler(event_type, NamedCallback::new(name, func));
    }

    /// Remove the slot `name` under `event_type`. Missing slots are ignored.
    pub fn remove_event_handler(&mut self, event_type: EventType, name: &str) {
        self.registry.remove_handler(event_type, name);
    }

    /// The handler table.
    pub fn registry(&self) -> &EventRegistry<Window> {
        &self.registry
    }

    /// Drain the backend queue and dispatch every event.
    ///
    /// Returns the number of callbacks invoked.
    pub fn dispatch_all(&mut self) -> usize {
        let events = self.backend.poll_events();
        dispatch_all(self, events)
    }

    /// Dispatch a single event immediately, bypassing the queue.
    pub fn dispatch_event(&mut self, event: &Event) -> usize {
        dispatch_event(self, event)
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Take ownership of `view` without showing it.
    pub fn add_view(&mut self, name: impl Into<String>, view: impl View) -> ViewId {
        let name = name.into();
        tracing::debug!(target: "horizon_flow::view", name = %name, "view added");
        self.views.insert(ViewSlot {
            name,
            view: Some(Box::new(view)),
        })
    }

    /// Look a view up by the name it was added with.
    pub fn find_view(&self, name: &str) -> Option<ViewId> {
        self.views
            .iter()
            .find(|(_, slot)| slot.name == name)
            .map(|(id, _)| id)
    }

    /// The name a view was added with.
    pub fn view_name(&self, id: ViewId) -> Option<&str> {
        self.views.get(id).map(|slot| slot.name.as_str())
    }

    /// Borrow a view as its concrete type.
    ///
    /// Returns `None` for unknown ids, a different type, or while the view's
    /// own handler is running.
    pub fn view<V: View>(&self, id: ViewId) -> Option<&V> {
        let view: &dyn View = self.views.get(id)?.view.as_deref()?;
        let any: &dyn std::any::Any = view;
        any.downcast_ref::<V>()
    }

    /// Mutably borrow a view as its concrete type.
    pub fn view_mut<V: View>(&mut self, id: ViewId) -> Option<&mut V> {
        let view: &mut dyn View = self.views.get_mut(id)?.view.as_deref_mut()?;
        let any: &mut dyn std::any::Any = view;
        any.downcast_mut::<V>()
    }

    /// Remove a view. If it was active, the window's defaults take over.
    pub fn remove_view(&mut self, id: ViewId) -> Option<Box<dyn View>> {
        if self.binding == Binding::View(id) {
            self.rebind(Binding::Window);
        }
        self.pending_setup.retain(|pending| *pending != id);
        self.views.remove(id)?.view
    }

    /// Number of views added.
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Make `id` the active handler set, then call its `setup`.
    ///
    /// Allowed while the loop runs; the next dispatched event sees the new
    /// handlers.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::UnknownView`] if `id` does not belong to this
    /// window.
    pub fn show_view(&mut self, id: ViewId) -> Result<()> {
        let Some(slot) = self.views.get(id) else {
            return Err(FlowError::UnknownView(format!("{id:?}")));
        };
        let _span = tracing::debug_span!(
            target: "horizon_flow::view",
            "horizon_flow::show_view",
            name = %slot.name
        )
        .entered();

        // The last view shown wins; setups still queued for others are dropped.
        self.pending_setup.retain(|pending| *pending == id);
        self.rebind(Binding::View(id));
        if !self.with_view(id, |view, window| view.setup(window)) {
            // The view is showing itself from one of its handlers.
            self.pending_setup.push_back(id);
        }
        Ok(())
    }

    /// Show `id`, then run the loop.
    pub fn run_view(&mut self, id: ViewId) -> Result<()> {
        self.show_view(id)?;
        self.run()
    }

    /// The current binding.
    pub fn active_binding(&self) -> Binding {
        self.binding
    }

    /// The active view, if one is shown.
    pub fn active_view(&self) -> Option<ViewId> {
        match self.binding {
            Binding::View(id) => Some(id),
            Binding::Window => None,
        }
    }

    /// Route every built-in event to `binding`.
    ///
    /// All built-in slots are replaced in one pass. User slots registered
    /// under other names are kept.
    pub fn rebind(&mut self, binding: Binding) {
        tracing::debug!(target: "horizon_flow::view", ?binding, "rebinding handlers");
        self.binding = binding;
        self.registry.replace_all(builtin_slots(binding));
    }

    /// The binding a registry slot routes to.
    ///
    /// Returns `None` for missing slots and for callbacks added with
    /// [`Window::add_event_handler`].
    pub fn handler_binding(&self, event_type: EventType, name: &str) -> Option<Binding> {
        let tag = self.registry.get(event_type, name)?.owner()?;
        Some(Binding::from_owner_tag(tag))
    }

    /// Run `f` against `binding`'s handlers.
    fn route(&mut self, binding: Binding, f: impl FnOnce(&mut dyn View, &mut Window)) {
        match binding {
            Binding::Window => f(&mut WindowDefaults, self),
            Binding::View(id) => {
                if !self.with_view(id, f) {
                    tracing::trace!(target: "horizon_flow::view", ?id, "view unavailable, event skipped");
                }
            }
        }
    }

    /// Route to the active binding.
    fn route_active(&mut self, f: impl FnOnce(&mut dyn View, &mut Window)) {
        self.route(self.binding, f);
    }

    /// Lend view `id` to `f`. Returns `false` if it is missing or already
    /// lent out.
    fn with_view(&mut self, id: ViewId, f: impl FnOnce(&mut dyn View, &mut Window)) -> bool {
        let Some(mut view) = self.views.get_mut(id).and_then(|slot| slot.view.take()) else {
            return false;
        };
        f(view.as_mut(), self);
        if let Some(slot) = self.views.get_mut(id) {
            slot.view = Some(view);
        }
        self.run_pending_setups();
        true
    }

    fn run_pending_setups(&mut self) {
        while let Some(id) = self.pending_setup.front().copied() {
            let Some(slot) = self.views.get(id) else {
                // Removed before its setup could run.
                self.pending_setup.pop_front();
                continue;
            };
            if slot.view.is_none() {
                // Still lent out further up the stack; that frame retries.
                return;
            }
            self.pending_setup.pop_front();
            self.with_view(id, |view, window| view.setup(window));
        }
    }

    // ========================================================================
    // Loop
    // ========================================================================

    /// Create the surface and enter the running state.
    ///
    /// The returned guard closes the window when dropped, whether the loop
    /// ended normally, returned an error or panicked.
    ///
    /// # Errors
    ///
    /// [`FlowError::WindowClosed`] after [`Window::close`],
    /// [`FlowError::AlreadyRunning`] if called from inside the loop, or any
    /// configuration or surface creation error.
    pub fn begin(&mut self) -> Result<RunGuard<'_>> {
        match self.state {
            RunState::Closed => return Err(FlowError::WindowClosed),
            RunState::Running => return Err(FlowError::AlreadyRunning),
            RunState::Idle => {}
        }
        self.config.validate()?;
        let clock = FrameClock::new(self.config.update_rate)?;
        self.backend.create_surface(&self.config)?;

        tracing::info!(
            target: "horizon_flow::window",
            width = self.config.width,
            height = self.config.height,
            fps = clock.target_fps(),
            "window loop starting"
        );
        self.state = RunState::Running;
        Ok(RunGuard {
            window: self,
            clock,
        })
    }

    /// Run frames until the window is closed.
    ///
    /// The window is closed when this returns, including on error.
    #[tracing::instrument(name = "horizon_flow::run_loop", skip(self), target = "horizon_flow::window")]
    pub fn run(&mut self) -> Result<()> {
        let mut guard = self.begin()?;
        while guard.is_running() {
            guard.frame()?;
        }
        tracing::debug!(
            target: "horizon_flow::window",
            frames = guard.clock.frame_count(),
            "window loop finished"
        );
        Ok(())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Returns `true` inside the loop until the window is closed.
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Returns `true` once the window has been closed.
    pub fn is_closed(&self) -> bool {
        self.state == RunState::Closed
    }

    /// Stop the loop and release the backend. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.state == RunState::Closed {
            return;
        }
        self.state = RunState::Closed;
        self.backend.shutdown();
        tracing::info!(target: "horizon_flow::window", "window closed");
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Fill the surface with `color`, or the background colour.
    pub fn clear(&mut self, color: Option<Color>) -> Result<()> {
        self.backend.fill(color.unwrap_or(self.background))
    }

    /// The colour used by [`Window::clear`].
    pub fn background_color(&self) -> Color {
        self.background
    }

    /// Change the colour used by [`Window::clear`].
    pub fn set_background_color(&mut self, color: Color) {
        self.background = color;
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// The configuration the window was created with.
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Width and height.
    pub fn size(&self) -> (u32, u32) {
        self.config.size()
    }

    /// The window caption.
    pub fn title(&self) -> &str {
        &self.config.title
    }

    /// Change the window caption.
    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.backend.set_title(&title);
        self.config.title = title;
    }

    /// Size of the primary display, if the backend knows it.
    pub fn display_size(&self) -> Option<(u32, u32)> {
        self.backend.display_size()
    }

    // ========================================================================
    // Events and timers
    // ========================================================================

    /// The backend's event queue, for posting custom events.
    pub fn event_source(&mut self) -> &mut dyn EventSource {
        self.backend.as_event_source()
    }

    /// Queue `event` for the next dispatch.
    pub fn post_event(&mut self, event: Event) {
        self.backend.post_event(event);
    }

    /// Re-post `event` every `ms` milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidArgument`] if `ms <= 0`.
    pub fn schedule(&mut self, event: &Event, ms: i64) -> Result<()> {
        horizon_flow_core::schedule(self.backend.as_event_source(), event, ms)
    }

    /// Cancel the repeating timer for `event`'s type.
    pub fn unschedule(&mut self, event: &Event) {
        horizon_flow_core::unschedule(self.backend.as_event_source(), event);
    }

    /// Block for `ms` milliseconds.
    pub fn pause(&mut self, ms: i64) {
        horizon_flow_core::pause(self.backend.as_event_source(), ms);
    }
}

impl EventTarget for Window {
    fn registry(&self) -> &EventRegistry<Self> {
        &self.registry
    }

    fn input_state(&self) -> InputState {
        self.backend.input_state()
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let views: Vec<&str> = self.views.values().map(|slot| slot.name.as_str()).collect();
        f.debug_struct("Window")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("binding", &self.binding)
            .field("views", &views)
            .field("background", &self.background)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Scope of one run of the loop.
///
/// Dereferences to the [`Window`]. Dropping the guard closes the window.
pub struct RunGuard<'w> {
    window: &'w mut Window,
    clock: FrameClock,
}

impl RunGuard<'_> {
    /// Run one frame: dispatch, clear, update, draw, present, throttle.
    ///
    /// Stops early, without presenting, once the window is closed.
    pub fn frame(&mut self) -> Result<()> {
        let window = &mut *self.window;

        window.dispatch_all();
        if !window.is_running() {
            return Ok(());
        }

        window.clear(None)?;
        window.route_active(|view, window| view.on_update(window));
        window.route_active(|view, window| view.on_draw(window));
        if !window.is_running() {
            return Ok(());
        }
        window.backend.present()?;

        if let Some(sleep) = self.clock.tick() {
            window.backend.pause(sleep);
        }
        Ok(())
    }

    /// Frames completed in this run.
    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count()
    }
}

impl Deref for RunGuard<'_> {
    type Target = Window;

    fn deref(&self) -> &Window {
        self.window
    }
}

impl DerefMut for RunGuard<'_> {
    fn deref_mut(&mut self) -> &mut Window {
        self.window
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::error!(target: "horizon_flow::window", "window loop panicked, closing");
        }
        self.window.close();
    }
}

/// The built-in slots for `binding`, one per routed event type.
fn builtin_slots(binding: Binding) -> Vec<(EventType, NamedCallback<Window>)> {
    let owner = binding.owner_tag();
    let slot = |name: &'static str, func: fn(&mut Window, Binding, &EventArgs)| {
        NamedCallback::new(name, move |window: &mut Window, args: &EventArgs| {
            func(window, binding, args)
        })
        .with_owner(owner)
    };

    vec![
        (
            EventType::KEY_DOWN,
            slot("on_key_press", |window, binding, args| {
                if let &EventArgs::Key { key, modifiers } = args {
                    window.route(binding, |view, window| view.on_key_press(window, key, modifiers));
                }
            }),
        ),
        (
            EventType::KEY_UP,
            slot("on_key_release", |window, binding, args| {
                if let &EventArgs::Key { key, modifiers } = args {
                    window.route(binding, |view, window| view.on_key_release(window, key, modifiers));
                }
            }),
        ),
        (
            EventType::WINDOW_ENTER,
            slot("on_mouse_enter", |window, binding, args| {
                if let &EventArgs::Pointer { x, y } = args {
                    window.route(binding, |view, window| view.on_mouse_enter(window, x, y));
                }
            }),
        ),
        (
            EventType::WINDOW_LEAVE,
            slot("on_mouse_leave", |window, binding, args| {
                if let &EventArgs::Pointer { x, y } = args {
                    window.route(binding, |view, window| view.on_mouse_leave(window, x, y));
                }
            }),
        ),
        (
            EventType::MOUSE_MOTION,
            slot("on_mouse_motion", |window, binding, args| {
                if let &EventArgs::Motion {
                    x,
                    y,
                    dx,
                    dy,
                    buttons,
                    modifiers,
                } = args
                {
                    if buttons.is_empty() {
                        window.route(binding, |view, window| {
                            view.on_mouse_motion(window, x, y, dx, dy, modifiers)
                        });
                    } else {
                        window.route(binding, |view, window| {
                            view.on_mouse_drag(window, x, y, dx, dy, buttons, modifiers)
                        });
                    }
                }
            }),
        ),
        (
            EventType::MOUSE_BUTTON_DOWN,
            slot("on_mouse_press", |window, binding, args| {
                if let &EventArgs::Button {
                    x,
                    y,
                    button,
                    modifiers,
                } = args
                {
                    window.route(binding, |view, window| {
                        view.on_mouse_press(window, x, y, button, modifiers)
                    });
                }
            }),
        ),
        (
            EventType::MOUSE_BUTTON_UP,
            slot("on_mouse_release", |window, binding, args| {
                if let &EventArgs::Button {
                    x,
                    y,
                    button,
                    modifiers,
                } = args
                {
                    window.route(binding, |view, window| {
                        view.on_mouse_release(window, x, y, button, modifiers)
                    });
                }
            }),
        ),
        (
            EventType::MOUSE_WHEEL,
            slot("on_mouse_scroll", |window, binding, args| {
                if let &EventArgs::Wheel { x, y, dx, dy } = args {
                    window.route(binding, |view, window| view.on_mouse_scroll(window, x, y, dx, dy));
                }
            }),
        ),
        (
            EventType::WINDOW_RESIZED,
            slot("on_resize", |window, binding, args| {
                if let &EventArgs::Resize { width, height } = args {
                    window.route(binding, |view, window| view.on_resize(window, width, height));
                }
            }),
        ),
        (
            EventType::WINDOW_FOCUS_GAINED,
            slot("on_focus", |window, binding, _| {
                window.route(binding, |view, window| view.on_focus(window));
            }),
        ),
        (
            EventType::WINDOW_FOCUS_LOST,
            slot("on_blur", |window, binding, _| {
                window.route(binding, |view, window| view.on_blur(window));
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use horizon_flow_core::{KeyCode, ModifiersState, MouseButton, MouseButtons};

    use super::*;
    use crate::backend::{HeadlessBackend, HeadlessProbe};

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        label: &'static str,
        log: Log,
    }

    impl Recorder {
        fn push(&self, entry: impl fmt::Display) {
            self.log.borrow_mut().push(format!("{}:{entry}", self.label));
        }
    }

    impl View for Recorder {
        fn setup(&mut self, _: &mut Window) {
            self.push("setup");
        }

        fn on_key_press(&mut self, _: &mut Window, key: KeyCode, _: ModifiersState) {
            self.push(format_args!("press {key:?}"));
        }

        fn on_mouse_motion(&mut self, _: &mut Window, x: i32, y: i32, _: i32, _: i32, _: ModifiersState) {
            self.push(format_args!("motion {x},{y}"));
        }

        fn on_mouse_drag(
            &mut self,
            _: &mut Window,
            x: i32,
            y: i32,
            _: i32,
            _: i32,
            buttons: MouseButtons,
            _: ModifiersState,
        ) {
            self.push(format_args!("drag {x},{y} {:?}", buttons.as_tuple()));
        }

        fn on_focus(&mut self, _: &mut Window) {
            self.push("focus");
        }
    }

    fn headless() -> (Window, HeadlessProbe) {
        let backend = HeadlessBackend::new();
        let probe = backend.probe();
        (Window::new(WindowConfig::default(), Box::new(backend)), probe)
    }

    fn recorder(label: &'static str, log: &Log) -> Recorder {
        Recorder {
            label,
            log: Rc::clone(log),
        }
    }

    #[test]
    fn test_defaults_bind_every_builtin_slot() {
        let (window, _) = headless();
        assert_eq!(window.active_binding(), Binding::Window);
        for (event_type, name) in [
            (EventType::KEY_DOWN, "on_key_press"),
            (EventType::KEY_UP, "on_key_release"),
            (EventType::MOUSE_MOTION, "on_mouse_motion"),
            (EventType::MOUSE_WHEEL, "on_mouse_scroll"),
            (EventType::WINDOW_FOCUS_LOST, "on_blur"),
            (EventType::QUIT, CLOSE_SLOT),
        ] {
            assert_eq!(
                window.handler_binding(event_type, name),
                Some(Binding::Window),
                "{name}"
            );
        }
    }

    #[test]
    fn test_show_view_rebinds_and_runs_setup() {
        let log = Log::default();
        let (mut window, _) = headless();
        let id = window.add_view("a", recorder("a", &log));
        assert!(log.borrow().is_empty());

        window.show_view(id).unwrap();
        assert_eq!(window.active_view(), Some(id));
        assert_eq!(
            window.handler_binding(EventType::KEY_DOWN, "on_key_press"),
            Some(Binding::View(id))
        );
        // Quit stays wired to the window.
        assert_eq!(
            window.handler_binding(EventType::QUIT, CLOSE_SLOT),
            Some(Binding::Window)
        );
        assert_eq!(*log.borrow(), vec!["a:setup"]);
    }

    #[test]
    fn test_motion_demux() {
        let log = Log::default();
        let (mut window, _) = headless();
        let id = window.add_view("a", recorder("a", &log));
        window.show_view(id).unwrap();
        log.borrow_mut().clear();

        window.dispatch_event(&Event::mouse_motion(1, 2, 1, 1, MouseButtons::NONE));
        window.dispatch_event(&Event::mouse_motion(3, 4, 2, 2, MouseButtons::from_tuple((1, 0, 1))));
        assert_eq!(*log.borrow(), vec!["a:motion 1,2", "a:drag 3,4 (1, 0, 1)"]);
    }

    #[test]
    fn test_user_handlers_survive_rebind() {
        let hits = Rc::new(RefCell::new(0));
        let (mut window, _) = headless();
        let counter = Rc::clone(&hits);
        window.on(EventType::KEY_DOWN, "count_keys", move |_, _| *counter.borrow_mut() += 1);

        let id = window.add_view("a", recorder("a", &Log::default()));
        window.show_view(id).unwrap();
        window.dispatch_event(&Event::key_down(KeyCode::KeyZ, ModifiersState::empty()));

        assert_eq!(*hits.borrow(), 1);
        assert_eq!(window.handler_binding(EventType::KEY_DOWN, "count_keys"), None);

        window.remove_event_handler(EventType::KEY_DOWN, "count_keys");
        window.remove_event_handler(EventType::KEY_DOWN, "count_keys");
        assert_eq!(window.registry().handler_count(EventType::KEY_DOWN), 1);
    }

    #[test]
    fn test_self_show_defers_setup() {
        struct Reset {
            setups: u32,
        }

        impl View for Reset {
            fn setup(&mut self, _: &mut Window) {
                self.setups += 1;
            }

            fn on_key_press(&mut self, window: &mut Window, _: KeyCode, _: ModifiersState) {
                if let Some(me) = window.find_view("reset") {
                    window.show_view(me).unwrap();
                }
            }
        }

        let (mut window, _) = headless();
        let id = window.add_view("reset", Reset { setups: 0 });
        window.show_view(id).unwrap();
        window.dispatch_event(&Event::key_down(KeyCode::KeyR, ModifiersState::empty()));

        assert_eq!(window.view::<Reset>(id).map(|v| v.setups), Some(2));
    }

    #[test]
    fn test_last_shown_view_wins_over_deferred_setup() {
        struct Paint {
            color: Color,
            other: Option<&'static str>,
        }

        impl View for Paint {
            fn setup(&mut self, window: &mut Window) {
                window.set_background_color(self.color);
            }

            fn on_key_press(&mut self, window: &mut Window, _: KeyCode, _: ModifiersState) {
                let Some(other) = self.other else {
                    return;
                };
                let me = window.find_view("a").unwrap();
                let next = window.find_view(other).unwrap();
                window.show_view(me).unwrap();
                window.show_view(next).unwrap();
            }
        }

        let (mut window, _) = headless();
        let a = window.add_view(
            "a",
            Paint {
                color: Color::BLACK,
                other: Some("b"),
            },
        );
        let b = window.add_view(
            "b",
            Paint {
                color: Color::RED,
                other: None,
            },
        );
        window.show_view(a).unwrap();
        window.dispatch_event(&Event::key_down(KeyCode::Enter, ModifiersState::empty()));

        assert_eq!(window.active_view(), Some(b));
        assert_eq!(window.background_color(), Color::RED);
    }

    #[test]
    fn test_remove_active_view_restores_defaults() {
        let (mut window, _) = headless();
        let id = window.add_view("a", recorder("a", &Log::default()));
        window.show_view(id).unwrap();

        assert!(window.remove_view(id).is_some());
        assert_eq!(window.active_binding(), Binding::Window);
        assert!(window.find_view("a").is_none());
        assert!(matches!(window.show_view(id), Err(FlowError::UnknownView(_))));
    }

    #[test]
    fn test_run_until_quit() {
        let (mut window, probe) = headless();
        window.set_background_color(Color::BLUE);
        probe.quit_after(2);

        window.run().unwrap();

        assert!(window.is_closed());
        assert_eq!(probe.frames(), vec![Color::BLUE, Color::BLUE]);
        assert_eq!(probe.shutdown_count(), 1);
        assert!(matches!(window.run(), Err(FlowError::WindowClosed)));
    }

    #[test]
    fn test_run_rejects_bad_update_rate() {
        let backend = HeadlessBackend::new();
        let probe = backend.probe();
        let mut window = Window::new(
            WindowConfig::default().with_update_rate(0.0),
            Box::new(backend),
        );

        assert!(window.run().unwrap_err().is_invalid_argument());
        assert_eq!(window.state(), RunState::Idle);
        assert!(probe.surface().is_none());
    }

    #[test]
    fn test_run_is_not_reentrant() {
        struct Nested {
            result: Option<String>,
        }

        impl View for Nested {
            fn on_update(&mut self, window: &mut Window) {
                self.result = window.run().err().map(|e| e.to_string());
                window.close();
            }
        }

        let (mut window, _) = headless();
        let id = window.add_view("nested", Nested { result: None });
        window.run_view(id).unwrap();

        assert_eq!(
            window.view::<Nested>(id).and_then(|v| v.result.clone()),
            Some(FlowError::AlreadyRunning.to_string())
        );
    }

    #[test]
    fn test_guard_closes_on_drop() {
        let (mut window, probe) = headless();
        {
            let mut guard = window.begin().unwrap();
            assert!(guard.is_running());
            guard.frame().unwrap();
            assert_eq!(guard.frame_count(), 1);
        }
        assert!(window.is_closed());
        assert!(probe.is_shut_down());
    }

    #[test]
    fn test_close_is_idempotent() {
        let (mut window, probe) = headless();
        window.close();
        window.close();
        assert_eq!(probe.shutdown_count(), 1);
        assert_eq!(window.state(), RunState::Closed);
    }

    #[test]
    fn test_focus_routes_to_view() {
        let log = Log::default();
        let (mut window, probe) = headless();
        let id = window.add_view("a", recorder("a", &log));
        window.show_view(id).unwrap();
        probe.push_event(Event::focus_gained());
        probe.push_event(Event::focus_lost());

        assert_eq!(window.dispatch_all(), 2);
        assert_eq!(*log.borrow(), vec!["a:setup", "a:focus"]);
    }

    #[test]
    fn test_button_args_sample_live_modifiers() {
        struct Buttons(Vec<(i32, i32, MouseButton, ModifiersState)>);

        impl View for Buttons {
            fn on_mouse_press(
                &mut self,
                _: &mut Window,
                x: i32,
                y: i32,
                button: MouseButton,
                modifiers: ModifiersState,
            ) {
                self.0.push((x, y, button, modifiers));
            }
        }

        let (mut window, probe) = headless();
        let id = window.add_view("buttons", Buttons(Vec::new()));
        window.show_view(id).unwrap();
        probe.set_modifiers(ModifiersState::CONTROL);
        probe.push_event(Event::mouse_button_down(5, 6, MouseButton::Left));
        window.dispatch_all();

        assert_eq!(
            window.view::<Buttons>(id).map(|v| v.0.clone()),
            Some(vec![(5, 6, MouseButton::Left, ModifiersState::CONTROL)])
        );
    }
}
