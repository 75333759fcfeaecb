//! Core component trait
//!
//! Every panel that can be rendered implements `Component`.

use crate::catalog::selection::Section;
use crate::tui::theme::Theme;
use ratatui::{layout::Rect, Frame};

/// Unique identifier for a component
///
/// Used for focus tracking and event routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Search,
    Letters,
    Drugs,
    Subdrugs,
    Details,
}

impl ComponentId {
    /// Focus order for Tab
    pub const FOCUS_ORDER: [ComponentId; 5] = [
        ComponentId::Search,
        ComponentId::Letters,
        ComponentId::Drugs,
        ComponentId::Subdrugs,
        ComponentId::Details,
    ];

    /// Cycle to next focusable component (Tab behavior)
    pub fn next_focus(self) -> Self {
        self.step(1)
    }

    /// Cycle to previous focusable component (Shift+Tab behavior)
    pub fn prev_focus(self) -> Self {
        self.step(Self::FOCUS_ORDER.len() - 1)
    }

    fn step(self, by: usize) -> Self {
        match Self::FOCUS_ORDER.iter().position(|&id| id == self) {
            Some(i) => Self::FOCUS_ORDER[(i + by) % Self::FOCUS_ORDER.len()],
            None => self,
        }
    }

    /// Screen section the component lives in. Search sits with the index.
    pub fn section(self) -> Section {
        match self {
            Self::Search | Self::Letters => Section::Letters,
            Self::Drugs => Section::Drugs,
            Self::Subdrugs => Section::Subdrugs,
            Self::Details => Section::Details,
        }
    }

    /// Component that takes focus when a section is brought into view
    pub fn for_section(section: Section) -> Self {
        match section {
            Section::Letters => Self::Letters,
            Section::Drugs => Self::Drugs,
            Section::Subdrugs => Self::Subdrugs,
            Section::Details => Self::Details,
        }
    }
}

/// Immutable context passed to components during rendering
///
/// Components only see what they need; no access to mutable app state.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub theme: &'a Theme,

    /// Which component currently has focus
    pub focus: ComponentId,

    /// Animation frame counter (for spinners)
    pub animation_frame: usize,
}

impl<'a> RenderContext<'a> {
    pub fn new(theme: &'a Theme, focus: ComponentId, animation_frame: usize) -> Self {
        Self {
            theme,
            focus,
            animation_frame,
        }
    }

    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.focus == id
    }

    /// Spinner character for the current animation frame
    pub fn spinner_char(&self) -> char {
        const SPINNER: [char; 4] = ['◐', '◓', '◑', '◒'];
        SPINNER[self.animation_frame % SPINNER.len()]
    }
}

/// Base trait for all UI components
///
/// A component is anything that can render itself to the terminal. Most
/// also implement `Interactive`, some `Scrollable` or `Copyable`.
pub trait Component {
    fn id(&self) -> ComponentId;

    /// Render into `area`
    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_cycles_through_panels() {
        let mut id = ComponentId::Search;
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(id);
            id = id.next_focus();
        }
        assert_eq!(seen, ComponentId::FOCUS_ORDER.to_vec());
        assert_eq!(id, ComponentId::Search);

        assert_eq!(ComponentId::Search.prev_focus(), ComponentId::Details);
        assert_eq!(ComponentId::Drugs.prev_focus(), ComponentId::Letters);
    }

    #[test]
    fn test_sections_map_back_to_components() {
        for id in ComponentId::FOCUS_ORDER.iter().skip(1) {
            assert_eq!(ComponentId::for_section(id.section()), *id);
        }
        assert_eq!(ComponentId::Search.section(), Section::Letters);
    }
}
