// TUI module - Terminal User Interface
//
// Sets up the terminal, runs the event loop, and routes input. The loop
// waits on terminal input, a redraw tick, the background dataset load,
// settled search text and deferred section jumps.

pub mod app;
pub mod clipboard;
pub mod components;
pub mod input;
pub mod layout;
pub mod modal;
pub mod scroll;
pub mod theme;
pub mod traits;
pub mod ui;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::loader::{DataLoader, LoadError, LoadHandle};
use crate::logging::LogBuffer;
use anyhow::{Context, Result};
use app::{App, AppEvents};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use modal::{Modal, ModalAction};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use traits::{ComponentId, Handled};

/// Run the browser until the user quits
pub async fn run_tui(config: Config, loader: Arc<DataLoader>, log_buffer: LogBuffer) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let (mut app, mut events) = App::new(&config, loader, log_buffer);

    let result = run_event_loop(&mut terminal, &mut app, &mut events).await;

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Branch futures never touch `app`; every mutation happens in a handler
/// once `select!` has picked a winner.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut AppEvents,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));
    events.load = Some(app.start_load());

    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            input = poll_input() => match input {
                Some(Event::Key(key_event)) => handle_key_event(app, key_event),
                Some(Event::Mouse(mouse_event)) => handle_mouse_event(app, mouse_event),
                _ => {}
            },

            _ = tick_interval.tick() => app.tick(),

            result = next_load(&mut events.load) => {
                events.load = None;
                app.on_load_result(result);
            }

            Some(query) = events.queries.recv() => app.on_query_settled(query),

            Some(section) = events.scrolls.recv() => app.on_scroll(section),
        }

        if app.take_reload_request() {
            // Replacing the handle aborts any previous fetch
            events.load = Some(app.start_load());
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Short blocking poll so the other branches stay responsive
async fn poll_input() -> Option<Event> {
    if event::poll(Duration::from_millis(10)).unwrap_or(false) {
        event::read().ok()
    } else {
        None
    }
}

/// Resolves with the outcome of the in-flight load; pends forever when idle
async fn next_load(load: &mut Option<LoadHandle>) -> Result<Catalog, LoadError> {
    if let Some(handle) = load {
        if let Some(result) = handle.recv().await {
            return result;
        }
    }
    std::future::pending().await
}

// ─────────────────────────────────────────────────────────────────────────────
// Input routing
// ─────────────────────────────────────────────────────────────────────────────

/// Layered dispatch: Modal → text-entry panels → Global → focused panel
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    if key_event.kind == KeyEventKind::Release {
        app.handle_key_release(key_event.code);
        return;
    }
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        app.should_quit = true;
        return;
    }

    // Layer 1: modal captures all input while open
    if handle_modal_input(app, &key_event) {
        return;
    }

    // Layer 2: search and the letter index consume printable keys, so
    // "q" types a q there instead of quitting
    if matches!(app.focus, ComponentId::Search | ComponentId::Letters)
        && app.dispatch_to_focused(key_event) != Handled::No
    {
        return;
    }

    // Layer 3: global keys
    if handle_global_keys(app, &key_event) {
        return;
    }

    // Layer 4: navigation in the focused panel
    if app.handle_key_press(key_event.code) {
        app.dispatch_to_focused(key_event);
    }
}

fn handle_modal_input(app: &mut App, key_event: &KeyEvent) -> bool {
    let Some(ref mut modal) = app.modal else {
        return false;
    };

    match modal.handle_input(key_event.code) {
        ModalAction::None => {}
        ModalAction::Close => app.modal = None,
    }
    true
}

/// Returns true if the key was a global binding
fn handle_global_keys(app: &mut App, key_event: &KeyEvent) -> bool {
    let key = key_event.code;
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            if app.handle_key_press(key) {
                app.should_quit = true;
            }
        }
        KeyCode::Char('?') => {
            if app.handle_key_press(key) {
                app.modal = Some(Modal::help());
            }
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            if app.handle_key_press(key) {
                app.request_reload(key == KeyCode::Char('R'));
            }
        }
        KeyCode::Tab => {
            if app.handle_key_press(key) {
                app.focus_next();
            }
        }
        KeyCode::BackTab => {
            if app.handle_key_press(key) {
                app.focus_prev();
            }
        }
        KeyCode::Char('/') => app.set_focus(ComponentId::Search),
        KeyCode::Char('g') => app.back_to_top(),
        KeyCode::Char('y') => {
            if app.handle_key_press(key) {
                app.copy_details();
            }
        }
        KeyCode::Esc => app.back_one_section(),
        _ => return false,
    }
    true
}

/// Wheel scrolling acts like the arrow keys on the focused panel
fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    if app.modal.is_some() {
        return;
    }
    let code = match mouse_event.kind {
        MouseEventKind::ScrollUp => KeyCode::Up,
        MouseEventKind::ScrollDown => KeyCode::Down,
        _ => return,
    };
    app.dispatch_to_focused(KeyEvent::new(code, KeyModifiers::NONE));
}
