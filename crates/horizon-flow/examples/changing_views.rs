//! Two views sharing one window.
//!
//! ENTER switches between a black "View 1" and a red "View 2".
//!
//! Run with: cargo run -p horizon-flow --example changing_views

use horizon_flow::prelude::*;
use tracing_subscriber::EnvFilter;

const SCREEN_WIDTH: u32 = 1000;
const SCREEN_HEIGHT: u32 = 650;

/// A view that paints one colour and hands over to `next` on ENTER.
struct Screen {
    title: &'static str,
    background: Color,
    next: &'static str,
}

impl View for Screen {
    fn setup(&mut self, window: &mut Window) {
        window.set_background_color(self.background);
        window.set_title(self.title);
    }

    fn on_key_press(&mut self, window: &mut Window, key: KeyCode, _: ModifiersState) {
        if key != KeyCode::Enter {
            return;
        }
        if let Some(next) = window.find_view(self.next) {
            if let Err(err) = next.show(window) {
                tracing::warn!(%err, "could not switch views");
            }
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut app = App::new();
    let window = app.open_window(
        WindowConfig::simple(SCREEN_WIDTH, SCREEN_HEIGHT).with_resizable(true),
    )?;

    let first = window.add_view(
        "1",
        Screen {
            title: "View 1",
            background: Color::BLACK,
            next: "2",
        },
    );
    window.add_view(
        "2",
        Screen {
            title: "View 2",
            background: Color::RED,
            next: "1",
        },
    );

    first.run(window)
}
