//! Interactive trait for components that handle keyboard input
//!
//! App routes key events to the focused component, which either consumes
//! them, lets them bubble up, or reports a selection change as an
//! [`Intent`].

use super::{Component, Scrollable};
use crate::catalog::filter::Letter;
use crate::catalog::{DrugKey, SubdrugKey};
use crossterm::event::{KeyCode, KeyEvent};

/// What the user asked a panel for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// `None` is "All"
    SelectLetter(Option<Letter>),
    /// Raw search text after an edit
    QueryChanged(String),
    /// `activate` is Enter/Right (drill in), as opposed to moving through
    /// the list with the arrows
    SelectDrug { key: DrugKey, activate: bool },
    SelectSubdrug { key: SubdrugKey, activate: bool },
}

/// Result of handling a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    /// Event was consumed by the component
    Yes,
    /// Event was not handled, should bubble up
    No,
    /// Consumed, and App should apply the intent
    Emit(Intent),
}

/// Trait for components that handle keyboard input
///
/// ```text
/// KeyEvent
///    │
///    ▼
/// App (modal, then global keys: ?, q, r, Tab)
///    │
///    ▼
/// Focused component ──► Handled::Emit(intent) ──► App updates Selection
/// ```
pub trait Interactive: Component {
    fn handle_key(&mut self, key: KeyEvent) -> Handled;

    /// Keybind hints for the status bar while focused
    fn focus_hint(&self) -> Option<&'static str> {
        None
    }
}

/// Standard scroll keys for components that are both Interactive and Scrollable
pub trait ScrollableInteractive: Interactive + Scrollable {
    /// Returns `Handled::Yes` for Up, Down, k, j, Home, End, PageUp, PageDown
    fn handle_scroll_keys(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(),
            KeyCode::Home => self.scroll_to_top(),
            KeyCode::End => self.scroll_to_bottom(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::PageDown => self.page_down(),
            _ => return Handled::No,
        }
        Handled::Yes
    }
}

// Blanket implementation: anything that implements both traits gets this for free
impl<T: Interactive + Scrollable> ScrollableInteractive for T {}
