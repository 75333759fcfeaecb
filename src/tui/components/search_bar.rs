//! Search bar
//!
//! Single-line text input. Every edit reports the raw text upward at once;
//! debouncing happens in App, not here.

use crate::tui::traits::{Component, ComponentId, Handled, Intent, Interactive, RenderContext};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = " ⌕ ";
const PLACEHOLDER: &str = "Search drugs...";

/// Text plus a cursor, kept as a byte offset on a char boundary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    cursor: usize,
}

impl TextInput {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Backspace
    pub fn delete_char_before(&mut self) -> bool {
        let Some((prev, _)) = self.text[..self.cursor].char_indices().next_back() else {
            return false;
        };
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    /// Delete
    pub fn delete_char_at(&mut self) -> bool {
        let Some(c) = self.text[self.cursor..].chars().next() else {
            return false;
        };
        self.text.drain(self.cursor..self.cursor + c.len_utf8());
        true
    }

    /// Ctrl+W: drop trailing spaces, then the word before them
    pub fn delete_word_before(&mut self) -> bool {
        let before = &self.text[..self.cursor];
        let trimmed = before.trim_end();
        let start = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        if start == self.cursor {
            return false;
        }
        self.text.drain(start..self.cursor);
        self.cursor = start;
        true
    }

    pub fn move_left(&mut self) {
        if let Some((prev, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) -> bool {
        if self.text.is_empty() {
            return false;
        }
        self.text.clear();
        self.cursor = 0;
        true
    }

    /// Display columns between the start of the text and the cursor
    fn cursor_column(&self) -> u16 {
        self.text[..self.cursor].width() as u16
    }
}

#[derive(Debug, Default)]
pub struct SearchBar {
    input: TextInput,
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        self.input.text()
    }

    fn changed(&self) -> Handled {
        Handled::Emit(Intent::QueryChanged(self.input.text().to_string()))
    }
}

impl Component for SearchBar {
    fn id(&self) -> ComponentId {
        ComponentId::Search
    }

    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let theme = ctx.theme;
        let focused = ctx.is_focused(self.id());

        let body = if self.input.text().is_empty() {
            Span::styled(PLACEHOLDER, Style::default().fg(theme.muted))
        } else {
            Span::styled(self.input.text(), Style::default().fg(theme.foreground))
        };
        let line = Line::from(vec![
            Span::styled(PROMPT, Style::default().fg(theme.highlight)),
            body,
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(theme.border_style(focused))
            .title(Span::styled(" Search ", theme.title_style(focused)));
        let inner = block.inner(area);

        f.render_widget(Paragraph::new(line).block(block), area);

        if focused && inner.width > 0 && inner.height > 0 {
            let x = inner.x + PROMPT.width() as u16 + self.input.cursor_column();
            f.set_cursor_position(Position::new(x.min(inner.right().saturating_sub(1)), inner.y));
        }
    }
}

impl Interactive for SearchBar {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('w') if ctrl => {
                if self.input.delete_word_before() {
                    self.changed()
                } else {
                    Handled::Yes
                }
            }
            KeyCode::Char('u') if ctrl => {
                if self.input.clear() {
                    self.changed()
                } else {
                    Handled::Yes
                }
            }
            // Leave other chords (Ctrl+C) to App
            KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => Handled::No,
            KeyCode::Char(c) => {
                self.input.insert_char(c);
                self.changed()
            }
            KeyCode::Backspace => {
                if self.input.delete_char_before() {
                    self.changed()
                } else {
                    Handled::Yes
                }
            }
            KeyCode::Delete => {
                if self.input.delete_char_at() {
                    self.changed()
                } else {
                    Handled::Yes
                }
            }
            KeyCode::Left => {
                self.input.move_left();
                Handled::Yes
            }
            KeyCode::Right => {
                self.input.move_right();
                Handled::Yes
            }
            KeyCode::Home => {
                self.input.move_start();
                Handled::Yes
            }
            KeyCode::End => {
                self.input.move_end();
                Handled::Yes
            }
            // Esc on an empty box bubbles up so App can move focus on
            KeyCode::Esc => {
                if self.input.clear() {
                    self.changed()
                } else {
                    Handled::No
                }
            }
            _ => Handled::No,
        }
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("type to filter  Esc:clear  Tab:letters")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(bar: &mut SearchBar, code: KeyCode) -> Handled {
        bar.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(bar: &mut SearchBar, text: &str) {
        for c in text.chars() {
            press(bar, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_emits_full_text() {
        let mut bar = SearchBar::new();
        type_str(&mut bar, "amo");
        assert_eq!(
            press(&mut bar, KeyCode::Char('x')),
            Handled::Emit(Intent::QueryChanged("amox".to_string()))
        );
        assert_eq!(bar.query(), "amox");
    }

    #[test]
    fn test_editing_in_the_middle() {
        let mut bar = SearchBar::new();
        type_str(&mut bar, "parcetamol");
        for _ in 0..7 {
            press(&mut bar, KeyCode::Left);
        }
        press(&mut bar, KeyCode::Char('a'));
        assert_eq!(bar.query(), "paracetamol");

        press(&mut bar, KeyCode::Home);
        press(&mut bar, KeyCode::Delete);
        assert_eq!(bar.query(), "aracetamol");
    }

    #[test]
    fn test_multibyte_backspace() {
        let mut bar = SearchBar::new();
        type_str(&mut bar, "obé");
        assert_eq!(
            press(&mut bar, KeyCode::Backspace),
            Handled::Emit(Intent::QueryChanged("ob".to_string()))
        );
    }

    #[test]
    fn test_no_op_edits_do_not_emit() {
        let mut bar = SearchBar::new();
        assert_eq!(press(&mut bar, KeyCode::Backspace), Handled::Yes);
        assert_eq!(press(&mut bar, KeyCode::Delete), Handled::Yes);
    }

    #[test]
    fn test_escape_clears_then_bubbles() {
        let mut bar = SearchBar::new();
        type_str(&mut bar, "zzz");
        assert_eq!(
            press(&mut bar, KeyCode::Esc),
            Handled::Emit(Intent::QueryChanged(String::new()))
        );
        assert_eq!(press(&mut bar, KeyCode::Esc), Handled::No);
    }

    #[test]
    fn test_ctrl_w_deletes_previous_word() {
        let mut bar = SearchBar::new();
        type_str(&mut bar, "asam mefenamat ");
        let handled = bar.handle_key(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert_eq!(handled, Handled::Emit(Intent::QueryChanged("asam ".to_string())));

        let ctrl_c = bar.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(ctrl_c, Handled::No);
    }
}
