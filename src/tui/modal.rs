// Modal system for TUI overlays
//
// Self-contained modal dialogs that handle their own input and return actions.
// App just holds Option<Modal>, input routing acts on returned ModalAction.

use crossterm::event::KeyCode;

/// Actions returned by modal input handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// Input consumed, no state change needed
    None,
    Close,
}

/// Available modal types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    /// Keyboard shortcuts
    Help,
}

/// Key, description pairs shown by the help modal
pub const HELP_BINDINGS: &[(&str, &str)] = &[
    ("Tab / Shift+Tab", "Cycle focus"),
    ("/", "Search"),
    ("Esc", "Clear search / back one section"),
    ("← →  Enter", "Move through letters, select"),
    ("a-z  0", "Jump to a letter / All (index focused)"),
    ("↑ ↓  Home End", "Move through a list"),
    ("Enter  →", "Open drug or subdrug"),
    ("PgUp PgDn", "Scroll details"),
    ("y", "Copy details"),
    ("g", "Back to the index"),
    ("r / R", "Reload if stale / force reload"),
    ("?", "This help"),
    ("q  Ctrl+C", "Quit"),
];

impl Modal {
    pub fn help() -> Self {
        Modal::Help
    }

    pub fn title(&self) -> &'static str {
        match self {
            Modal::Help => " Keyboard shortcuts ",
        }
    }

    /// Handle keyboard input, return action for caller to execute
    pub fn handle_input(&mut self, key: KeyCode) -> ModalAction {
        match self {
            Modal::Help => match key {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Enter => {
                    ModalAction::Close
                }
                _ => ModalAction::None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_closes_on_dismiss_keys_only() {
        let mut modal = Modal::help();
        assert_eq!(modal.handle_input(KeyCode::Char('x')), ModalAction::None);
        assert_eq!(modal.handle_input(KeyCode::Down), ModalAction::None);
        assert_eq!(modal.handle_input(KeyCode::Esc), ModalAction::Close);
        assert_eq!(modal.handle_input(KeyCode::Char('?')), ModalAction::Close);
    }
}
