// Status bar component
//
// Key hints for the focused panel, the stacked-section indicator on narrow
// terminals, and the most recent warning from the log.

use crate::tui::app::App;
use crate::tui::layout::stack_position;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Duration;

/// Warnings older than this drop off the bar
const PROBLEM_WINDOW: Duration = Duration::from_secs(60);

/// Render the status bar
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mut spans = Vec::new();

    if app.breakpoint().is_narrow() {
        spans.push(Span::styled(
            format!(" [{}/4 {}]", stack_position(app.section), app.section.title()),
            Style::default().fg(theme.highlight),
        ));
    }

    let hint = app.focus_hint().unwrap_or("Tab:next panel");
    spans.push(Span::raw(format!(" {} │ ?:help  q:quit", hint)));

    if app.show_back_to_top {
        spans.push(Span::styled(" │ g: back to top", Style::default().fg(theme.highlight)));
    }

    if let Some(entry) = recent_problem(app) {
        spans.push(Span::styled(
            format!(" │ {}", entry),
            Style::default().fg(theme.warn),
        ));
    }

    let status = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(theme.status_bar))
        .block(Block::default().borders(Borders::TOP));

    f.render_widget(status, area);
}

fn recent_problem(app: &App) -> Option<String> {
    let entry = app.log_buffer.latest_problem()?;
    let age = chrono::Utc::now().signed_duration_since(entry.timestamp);
    let fresh = age.to_std().map_or(true, |age| age <= PROBLEM_WINDOW);
    fresh.then(|| entry.summary())
}
