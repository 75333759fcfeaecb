//! Scrollable trait for components with scrollable content

use super::Component;
use crate::tui::scroll::ScrollState;

/// Uniform scroll interface. Components own a `ScrollState` and expose it;
/// the navigation methods delegate to it.
pub trait Scrollable: Component {
    fn scroll_state_mut(&mut self) -> &mut ScrollState;

    // ─────────────────────────────────────────────────────────────
    // Navigation - default implementations delegate to ScrollState
    // ─────────────────────────────────────────────────────────────

    fn scroll_up(&mut self) {
        self.scroll_state_mut().scroll_up();
    }

    fn scroll_down(&mut self) {
        self.scroll_state_mut().scroll_down();
    }

    fn scroll_to_top(&mut self) {
        self.scroll_state_mut().scroll_to_top();
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_state_mut().scroll_to_bottom();
    }

    fn page_up(&mut self) {
        self.scroll_state_mut().page_up();
    }

    fn page_down(&mut self) {
        self.scroll_state_mut().page_down();
    }

    /// Call before each frame with current sizes
    fn update_dimensions(&mut self, total: usize, viewport: usize) {
        self.scroll_state_mut().update_dimensions(total, viewport);
    }
}
