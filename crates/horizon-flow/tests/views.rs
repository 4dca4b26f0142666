//! End-to-end tests driving windows and views through the headless backend.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use horizon_flow::prelude::*;
use horizon_flow::{HeadlessProbe, RunState};

const BUILTIN_SLOTS: [(EventType, &str); 11] = [
    (EventType::KEY_DOWN, "on_key_press"),
    (EventType::KEY_UP, "on_key_release"),
    (EventType::WINDOW_ENTER, "on_mouse_enter"),
    (EventType::WINDOW_LEAVE, "on_mouse_leave"),
    (EventType::MOUSE_MOTION, "on_mouse_motion"),
    (EventType::MOUSE_BUTTON_DOWN, "on_mouse_press"),
    (EventType::MOUSE_BUTTON_UP, "on_mouse_release"),
    (EventType::MOUSE_WHEEL, "on_mouse_scroll"),
    (EventType::WINDOW_RESIZED, "on_resize"),
    (EventType::WINDOW_FOCUS_GAINED, "on_focus"),
    (EventType::WINDOW_FOCUS_LOST, "on_blur"),
];

type Log = Rc<RefCell<Vec<String>>>;

fn headless_window(width: u32, height: u32) -> (Window, HeadlessProbe) {
    let backend = HeadlessBackend::new();
    let probe = backend.probe();
    let window = Window::new(WindowConfig::simple(width, height), Box::new(backend));
    (window, probe)
}

fn enter() -> Event {
    Event::key_down(KeyCode::Enter, ModifiersState::empty())
}

/// Black screen that moves on to the next view when ENTER is pressed.
struct Intro {
    next: &'static str,
    log: Log,
}

impl View for Intro {
    fn setup(&mut self, window: &mut Window) {
        self.log.borrow_mut().push("intro setup".into());
        window.set_background_color(Color::BLACK);
    }

    fn on_key_press(&mut self, window: &mut Window, key: KeyCode, _: ModifiersState) {
        self.log.borrow_mut().push(format!("intro {key:?}"));
        if key == KeyCode::Enter {
            if let Some(next) = window.find_view(self.next) {
                next.show(window).unwrap();
            }
        }
    }
}

struct Level {
    log: Log,
    updates: u32,
}

impl View for Level {
    fn setup(&mut self, window: &mut Window) {
        self.log.borrow_mut().push("level setup".into());
        window.set_background_color(Color::BLUE);
    }

    fn on_update(&mut self, _: &mut Window) {
        self.updates += 1;
    }

    fn on_key_press(&mut self, _: &mut Window, key: KeyCode, _: ModifiersState) {
        self.log.borrow_mut().push(format!("level {key:?}"));
    }
}

#[test]
fn test_enter_switches_views_inside_the_loop() {
    let (mut window, probe) = headless_window(800, 600);
    let log = Log::default();

    let intro = window.add_view(
        "intro",
        Intro {
            next: "level",
            log: Rc::clone(&log),
        },
    );
    let level = window.add_view(
        "level",
        Level {
            log: Rc::clone(&log),
            updates: 0,
        },
    );

    probe.script_frame(Vec::new());
    probe.script_frame(vec![enter()]);
    probe.script_frame(vec![enter()]);
    probe.quit_after(4);

    intro.run(&mut window).unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["intro setup", "intro Enter", "level setup", "level Enter"]
    );
    assert_eq!(
        probe.frames(),
        vec![Color::BLACK, Color::BLUE, Color::BLUE, Color::BLUE]
    );
    assert_eq!(
        window.handler_binding(EventType::KEY_DOWN, "on_key_press"),
        Some(Binding::View(level))
    );
    assert_eq!(window.view::<Level>(level).unwrap().updates, 3);
    assert_eq!(window.state(), RunState::Closed);
    assert_eq!(probe.surface(), None);
}

#[test]
fn test_show_back_restores_every_builtin_slot() {
    let (mut window, _) = headless_window(320, 240);
    let log = Log::default();
    let a = window.add_view(
        "a",
        Intro {
            next: "b",
            log: Rc::clone(&log),
        },
    );
    let b = window.add_view(
        "b",
        Level {
            log: Rc::clone(&log),
            updates: 0,
        },
    );

    a.show(&mut window).unwrap();
    b.show(&mut window).unwrap();
    for (event_type, name) in BUILTIN_SLOTS {
        assert_eq!(window.handler_binding(event_type, name), Some(Binding::View(b)), "{name}");
    }

    a.show(&mut window).unwrap();
    for (event_type, name) in BUILTIN_SLOTS {
        assert_eq!(window.handler_binding(event_type, name), Some(Binding::View(a)), "{name}");
    }
    assert_eq!(window.active_view(), Some(a));
    assert_eq!(
        *log.borrow(),
        vec!["intro setup", "level setup", "intro setup"]
    );
    assert_eq!(window.background_color(), Color::BLACK);
}

#[test]
fn test_unknown_view_is_rejected() {
    let (mut window, _) = headless_window(320, 240);
    let (mut other, _) = headless_window(320, 240);
    let foreign = other.add_view("elsewhere", Level {
        log: Log::default(),
        updates: 0,
    });

    assert!(matches!(
        foreign.show(&mut window),
        Err(FlowError::UnknownView(_))
    ));
    assert_eq!(window.active_binding(), Binding::Window);
}

/// Spends 20ms of (virtual) time per frame.
struct Busy;

impl View for Busy {
    fn on_update(&mut self, window: &mut Window) {
        window.pause(20);
    }
}

#[test]
fn test_scheduled_custom_event_fires_each_frame() {
    let (mut window, probe) = headless_window(640, 480);
    let tick = CustomEvent::new(Some("tick"), Default::default()).unwrap();
    let ticks = Rc::new(Cell::new(0u32));

    let counter = Rc::clone(&ticks);
    window.on(tick.event_type(), "count_ticks", move |_, args| {
        assert_eq!(args, &EventArgs::None);
        counter.set(counter.get() + 1);
    });
    window.schedule(tick.event(), 16).unwrap();
    assert_eq!(probe.active_timers(), 1);

    let busy = window.add_view("busy", Busy);
    probe.quit_after(5);
    busy.run(&mut window).unwrap();

    // Nothing is due on the first frame; every later dispatch sees one tick.
    assert!((4..=5).contains(&ticks.get()), "ticks = {}", ticks.get());
    assert!(probe.elapsed().as_millis() >= 100);
}

#[test]
fn test_schedule_rejects_non_positive_interval() {
    let (mut window, probe) = headless_window(640, 480);
    let tick = CustomEvent::new(None, Default::default()).unwrap();

    assert!(window.schedule(tick.event(), 0).unwrap_err().is_invalid_argument());
    assert!(window.schedule(tick.event(), -1).unwrap_err().is_invalid_argument());
    assert_eq!(probe.active_timers(), 0);
}

#[test]
fn test_posted_events_reach_user_handlers_and_views() {
    let (mut window, probe) = headless_window(640, 480);
    let log = Log::default();
    let level = window.add_view(
        "level",
        Level {
            log: Rc::clone(&log),
            updates: 0,
        },
    );
    level.show(&mut window).unwrap();

    let seen = Rc::new(Cell::new(false));
    let flag = Rc::clone(&seen);
    window.on(EventType::KEY_DOWN, "spy", move |_, _| flag.set(true));

    window.post_event(Event::key_down(KeyCode::KeyA, ModifiersState::empty()));
    probe.quit_after(1);
    window.run().unwrap();

    assert!(seen.get());
    assert_eq!(*log.borrow(), vec!["level setup", "level KeyA"]);
}

#[test]
fn test_window_config_from_toml() {
    let config = WindowConfig::from_toml_str(
        r#"
        width = 1024
        height = 768
        title = "From TOML"
        update_rate = 0.02
        "#,
    )
    .unwrap();

    let backend = HeadlessBackend::new();
    let probe = backend.probe();
    probe.quit_after(1);
    let mut window = Window::new(config, Box::new(backend));
    window.run().unwrap();

    assert_eq!(window.size(), (1024, 768));
    assert_eq!(window.title(), "From TOML");
    assert_eq!(probe.title(), "From TOML");
    assert_eq!(probe.frames().len(), 1);
}
