// Title bar component
//
// App name and version, where the data comes from, and a spinner while a
// load is in flight.

use crate::loader::LoadState;
use crate::tui::app::App;
use crate::tui::traits::RenderContext;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render the title bar at the top of the screen
pub fn render(f: &mut Frame, area: Rect, app: &App, ctx: &RenderContext) {
    let status = match (&app.load_state, app.is_loading()) {
        (LoadState::Ready(cached), true) => {
            format!(" {} refreshing ({} drugs)", ctx.spinner_char(), cached.catalog().len())
        }
        (LoadState::Ready(cached), false) => format!(" {} drugs", cached.catalog().len()),
        (_, true) => format!(" {} loading", ctx.spinner_char()),
        (LoadState::Failed(_), false) => " offline".to_string(),
        (LoadState::Loading, false) => String::new(),
    };

    let title_text = format!(
        " 💊 drugstore v{} ──── {} │{}",
        VERSION,
        app.source_label(),
        status
    );

    let title = Paragraph::new(title_text)
        .style(
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.title))
                .title_top(Line::from(" ? ").right_aligned()),
        );

    f.render_widget(title, area);
}
