// Input handling with per-key behaviors
//
// Action keys (quit, help, copy, reload, Enter) fire once per press so a
// held key cannot queue up a burst of reloads or copies. Everything else,
// navigation included, passes straight through: list movement is expected
// to follow the terminal's own key repeat.

use crossterm::event::KeyCode;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Minimum gap between two triggers of a held action key on terminals that
/// never report key release
const REPRESS_WINDOW: Duration = Duration::from_millis(150);

/// How a key behaves when pressed or held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBehavior {
    /// Every press event triggers (terminal auto-repeat included)
    PassThrough,
    /// Trigger once per press; repeats while held are swallowed
    StateChange,
}

/// Tracks the state of a single action key
#[derive(Debug, Default)]
struct KeyState {
    is_pressed: bool,
    last_triggered: Option<Instant>,
}

/// Input handler that manages key behaviors
pub struct InputHandler {
    key_states: HashMap<KeyCode, KeyState>,
    key_behaviors: HashMap<KeyCode, KeyBehavior>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            key_states: HashMap::new(),
            key_behaviors: HashMap::new(),
        }
    }

    pub fn configure_key(&mut self, key: KeyCode, behavior: KeyBehavior) {
        self.key_behaviors.insert(key, behavior);
    }

    pub fn configure_keys(&mut self, keys: &[KeyCode], behavior: KeyBehavior) {
        for key in keys {
            self.configure_key(*key, behavior);
        }
    }

    /// Handle a key press event. Returns true if the action should run.
    pub fn handle_key_press(&mut self, key: KeyCode) -> bool {
        let behavior = self
            .key_behaviors
            .get(&key)
            .copied()
            .unwrap_or(KeyBehavior::PassThrough);

        if behavior == KeyBehavior::PassThrough {
            return true;
        }

        let now = Instant::now();
        let state = self.key_states.entry(key).or_default();

        if state.is_pressed {
            // Terminals without release events report every press as a
            // repeat, so let one through once the window has passed
            match state.last_triggered {
                Some(last) if now.duration_since(last) >= REPRESS_WINDOW => {
                    state.last_triggered = Some(now);
                    true
                }
                _ => false,
            }
        } else {
            state.is_pressed = true;
            state.last_triggered = Some(now);
            true
        }
    }

    pub fn handle_key_release(&mut self, key: KeyCode) {
        if let Some(state) = self.key_states.get_mut(&key) {
            state.is_pressed = false;
            state.last_triggered = None;
        }
    }

    /// Action keys guarded, everything else passes through
    pub fn with_default_config() -> Self {
        let mut handler = Self::new();
        handler.configure_keys(
            &[
                KeyCode::Enter,
                KeyCode::Tab,
                KeyCode::BackTab,
                // Quit
                KeyCode::Char('q'),
                KeyCode::Char('Q'),
                // Help
                KeyCode::Char('?'),
                // Clipboard
                KeyCode::Char('y'),
                // Reload
                KeyCode::Char('r'),
                KeyCode::Char('R'),
            ],
            KeyBehavior::StateChange,
        );
        handler
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::with_default_config()
    }
}
