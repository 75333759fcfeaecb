// Scroll and cursor state for TUI panels
//
// Each component owns its own state. App only routes input and, before each
// frame, tells scrollable panels how much room they have.

/// Scroll state for a text panel
///
/// Owns position, content size and viewport size. Offsets are clamped once
/// dimensions are known; before the first frame scrolling down is unbounded
/// and render clamps it.
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    /// Line index at the top of the viewport
    offset: usize,
    /// Total lines of content
    total: usize,
    /// Lines visible in the viewport
    viewport: usize,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call before rendering with current sizes
    pub fn update_dimensions(&mut self, total: usize, viewport: usize) {
        self.total = total;
        self.viewport = viewport;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        if self.total == 0 || self.offset < self.max_offset() {
            self.offset += 1;
        }
    }

    pub fn page_up(&mut self) {
        self.offset = self.offset.saturating_sub(self.viewport.max(1));
    }

    pub fn page_down(&mut self) {
        self.offset = (self.offset + self.viewport.max(1)).min(self.max_offset());
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Content overflows the viewport
    pub fn needs_scrollbar(&self) -> bool {
        self.total > self.viewport
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn viewport(&self) -> usize {
        self.viewport
    }

    fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.viewport)
    }
}

/// Highlighted row of a list, with wrap-around movement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCursor {
    selected: Option<usize>,
    len: usize,
}

impl ListCursor {
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Resize the list, dropping a selection that fell off the end
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.selected.is_some_and(|i| i >= len) {
            self.selected = None;
        }
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.len);
    }

    /// Down: first row when nothing is selected, wraps past the end
    pub fn next(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let next = match self.selected {
            Some(i) if i + 1 < self.len => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.selected = Some(next);
        self.selected
    }

    /// Up: last row when nothing is selected, wraps past the start
    pub fn prev(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let prev = match self.selected {
            Some(0) | None => self.len - 1,
            Some(i) => i - 1,
        };
        self.selected = Some(prev);
        self.selected
    }

    pub fn first(&mut self) -> Option<usize> {
        self.selected = (self.len > 0).then_some(0);
        self.selected
    }

    pub fn last(&mut self) -> Option<usize> {
        self.selected = self.len.checked_sub(1);
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_clamps_to_content() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(10, 4);
        for _ in 0..20 {
            scroll.scroll_down();
        }
        assert_eq!(scroll.offset(), 6);

        scroll.page_up();
        assert_eq!(scroll.offset(), 2);
        scroll.page_up();
        assert_eq!(scroll.offset(), 0);

        scroll.scroll_to_bottom();
        assert_eq!(scroll.offset(), 6);

        // Content shrank under us
        scroll.update_dimensions(5, 4);
        assert_eq!(scroll.offset(), 1);
        assert!(scroll.needs_scrollbar());
    }

    #[test]
    fn test_cursor_wraps_both_ways() {
        let mut cursor = ListCursor::default();
        cursor.set_len(3);

        assert_eq!(cursor.next(), Some(0));
        assert_eq!(cursor.next(), Some(1));
        assert_eq!(cursor.next(), Some(2));
        assert_eq!(cursor.next(), Some(0));
        assert_eq!(cursor.prev(), Some(2));

        cursor.select(None);
        assert_eq!(cursor.prev(), Some(2));
        assert_eq!(cursor.first(), Some(0));
        assert_eq!(cursor.last(), Some(2));
    }

    #[test]
    fn test_cursor_on_empty_list() {
        let mut cursor = ListCursor::default();
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.prev(), None);
        assert_eq!(cursor.first(), None);
        assert_eq!(cursor.last(), None);
    }

    #[test]
    fn test_shrinking_drops_out_of_range_selection() {
        let mut cursor = ListCursor::default();
        cursor.set_len(5);
        cursor.select(Some(4));
        cursor.set_len(2);
        assert_eq!(cursor.selected(), None);

        cursor.select(Some(7));
        assert_eq!(cursor.selected(), None);
    }
}
