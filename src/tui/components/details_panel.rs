//! Details panel
//!
//! Renders a [`DetailsView`] as a label/value table. Long tables scroll;
//! `y` copies the plain-text rendering.

use super::scrollbar::render_scrollbar;
use crate::catalog::details::{flag_marker, DetailValue, DetailsView};
use crate::tui::scroll::ScrollState;
use crate::tui::theme::Theme;
use crate::tui::traits::{
    Component, ComponentId, Copyable, Handled, Interactive, RenderContext, Scrollable,
    ScrollableInteractive,
};
use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub struct DetailsPanel {
    view: DetailsView,
    scroll: ScrollState,
}

impl DetailsPanel {
    pub fn new() -> Self {
        Self {
            view: DetailsView::NothingSelected,
            scroll: ScrollState::new(),
        }
    }

    /// Swap in a new view; scroll position resets when the content changes
    pub fn set_view(&mut self, view: DetailsView) {
        if view != self.view {
            self.view = view;
            self.scroll = ScrollState::new();
        }
    }

    pub fn view(&self) -> &DetailsView {
        &self.view
    }

    /// Body lines below the heading
    fn lines(&self, theme: &Theme) -> Vec<Line<'_>> {
        let DetailsView::Rows { rows, .. } = &self.view else {
            return Vec::new();
        };
        if rows.is_empty() {
            return Vec::new();
        }

        let width = rows.iter().map(|row| row.label.width()).max().unwrap_or(0);
        let label_style = Style::default()
            .fg(theme.label)
            .add_modifier(Modifier::BOLD);
        let indent = " ".repeat(width + 2);

        let mut lines = Vec::new();
        for row in rows {
            let label = format!("{}{}  ", row.label, " ".repeat(width - row.label.width()));
            match &row.value {
                DetailValue::Flag(flag) => {
                    let color = if *flag { theme.flag_on } else { theme.flag_off };
                    lines.push(Line::from(vec![
                        Span::styled(label, label_style),
                        Span::styled(flag_marker(*flag), Style::default().fg(color)),
                    ]));
                }
                DetailValue::Lines(values) => {
                    for (i, value) in values.iter().enumerate() {
                        let lead = if i == 0 {
                            Span::styled(label.clone(), label_style)
                        } else {
                            Span::raw(indent.clone())
                        };
                        lines.push(Line::from(vec![lead, Span::raw(value.as_str())]));
                    }
                }
            }
        }
        lines
    }

    /// Line count of the body, for scroll clamping
    pub fn content_height(&self) -> usize {
        match &self.view {
            DetailsView::Rows { rows, .. } => rows
                .iter()
                .map(|row| match &row.value {
                    DetailValue::Flag(_) => 1,
                    DetailValue::Lines(lines) => lines.len().max(1),
                })
                .sum(),
            _ => 0,
        }
    }

    /// Call before rendering with the panel's height
    pub fn sync_viewport(&mut self, area_height: u16) {
        // Border top/bottom plus the heading line
        let viewport = area_height.saturating_sub(3) as usize;
        let total = self.content_height();
        self.update_dimensions(total, viewport);
    }
}

impl Default for DetailsPanel {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Trait Implementations
// ═══════════════════════════════════════════════════════════════════════════

impl Component for DetailsPanel {
    fn id(&self) -> ComponentId {
        ComponentId::Details
    }

    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let theme = ctx.theme;
        let focused = ctx.is_focused(self.id());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(theme.border_style(focused))
            .title(Span::styled(" Details ", theme.title_style(focused)));

        let heading_style = Style::default()
            .fg(theme.title)
            .add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(theme.muted);

        let mut lines = Vec::new();
        match &self.view {
            DetailsView::Rows { heading, .. } => {
                lines.push(Line::from(Span::styled(heading.as_str(), heading_style)));
                match self.view.message() {
                    Some(message) => lines.push(Line::from(Span::styled(message, muted))),
                    None => lines.extend(self.lines(theme).into_iter().skip(self.scroll.offset())),
                }
            }
            other => {
                let message = other.message().unwrap_or_default();
                lines.push(Line::from(Span::styled(message, muted)));
            }
        }

        let paragraph = Paragraph::new(lines)
            .style(Style::default().fg(theme.foreground))
            .block(block);
        f.render_widget(paragraph, area);

        render_scrollbar(f, area, &self.scroll);
    }
}

impl Scrollable for DetailsPanel {
    fn scroll_state_mut(&mut self) -> &mut ScrollState {
        &mut self.scroll
    }
}

impl Copyable for DetailsPanel {
    fn copy_text(&self) -> Option<String> {
        matches!(self.view, DetailsView::Rows { .. }).then(|| self.view.to_text())
    }

    fn copy_description(&self) -> String {
        match &self.view {
            DetailsView::Rows { heading, .. } => format!("details for {}", heading),
            _ => "details".to_string(),
        }
    }
}

impl Interactive for DetailsPanel {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        self.handle_scroll_keys(key)
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("↑↓/PgUp/PgDn:scroll  y:copy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldValue, SubDrug};
    use crossterm::event::{KeyCode, KeyModifiers};

    fn amoxicillin() -> DetailsView {
        DetailsView::for_subdrug(
            &SubDrug::new("Amoxicillin 500mg")
                .with("sediaan", FieldValue::Text("tablet".to_string()))
                .with("fpktp", FieldValue::Flag(true))
                .with("keterangan", FieldValue::Text("line one\nline two".to_string())),
        )
    }

    #[test]
    fn test_copy_only_with_rows() {
        let mut panel = DetailsPanel::new();
        assert_eq!(panel.copy_text(), None);

        panel.set_view(amoxicillin());
        let text = panel.copy_text().unwrap();
        assert!(text.starts_with("Amoxicillin 500mg\n"));
        assert!(text.contains("[x]"));
        assert_eq!(panel.copy_description(), "details for Amoxicillin 500mg");
    }

    #[test]
    fn test_content_height_counts_wrapped_values() {
        let mut panel = DetailsPanel::new();
        panel.set_view(amoxicillin());
        // Nama, Sediaan, FPKTP, and two lines of Keterangan
        assert_eq!(panel.content_height(), 5);
        assert_eq!(panel.lines(&Theme::default()).len(), 5);
    }

    #[test]
    fn test_scroll_keys_clamp_and_reset() {
        let mut panel = DetailsPanel::new();
        panel.set_view(amoxicillin());
        panel.sync_viewport(6); // 3 visible lines

        for _ in 0..10 {
            panel.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        }
        assert_eq!(panel.scroll.offset(), 2);

        panel.set_view(DetailsView::NoSubdrug);
        assert_eq!(panel.scroll.offset(), 0);
    }

    #[test]
    fn test_unrelated_keys_bubble() {
        let mut panel = DetailsPanel::new();
        let handled = panel.handle_key(KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE));
        assert_eq!(handled, Handled::No);
    }
}
