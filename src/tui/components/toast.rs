//! Toast notification component
//!
//! A non-blocking overlay in the bottom-right corner that dismisses itself.

use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

/// Severity decides the border color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    /// Info toast, shown for 2 seconds
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Info,
            created_at: Instant::now(),
            duration: Duration::from_secs(2),
        }
    }

    /// Error toast, left up a little longer
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            duration: Duration::from_secs(4),
            ..Self::new(message)
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    /// Draw over whatever is below; `Clear` blanks the cells first
    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        // 2 cells of padding each side including the border
        let width = (self.message.width() as u16 + 4).min(area.width.saturating_sub(4));
        let height = 3;

        let x = area.right().saturating_sub(width + 2);
        let y = area.bottom().saturating_sub(height + 2);
        let toast_area = Rect::new(x, y, width, height).intersection(area);

        let border = match self.kind {
            ToastKind::Info => theme.highlight,
            ToastKind::Error => theme.error,
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(theme.background));

        let text = Paragraph::new(self.message.as_str())
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.foreground))
            .block(block);

        f.render_widget(Clear, toast_area);
        f.render_widget(text, toast_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_kinds_and_expiry() {
        let info = Toast::new("Copied");
        assert_eq!(info.kind, ToastKind::Info);
        assert!(!info.is_expired());

        let error = Toast::error("Refresh failed: HTTP 500");
        assert_eq!(error.kind, ToastKind::Error);
        assert_eq!(error.message, "Refresh failed: HTTP 500");
        assert!(!error.is_expired());
    }
}
