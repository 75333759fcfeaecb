// UI rendering
//
// Shell is title bar / body / status bar. The body depends on load state:
// a spinner while the first fetch runs, an error screen if it failed, and
// the browser once data is in. Wide terminals show every panel side by
// side; narrow ones stack them and show one section at a time.

use super::app::App;
use super::components::{status_bar, title_bar};
use super::modal::{Modal, HELP_BINDINGS};
use super::traits::{Component, RenderContext};
use crate::catalog::selection::Section;
use crate::loader::{LoadError, LoadState};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Height of the search box including its border
const SEARCH_HEIGHT: u16 = 3;
/// Letter index height in the column layout (wraps to two rows)
const INDEX_HEIGHT: u16 = 5;

/// Main render function, called every frame
pub fn draw(f: &mut Frame, app: &mut App) {
    let bg = Block::default().style(app.theme.base());
    f.render_widget(bg, f.area());

    app.set_viewport_width(f.area().width);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(8),    // Body
            Constraint::Length(2), // Status bar
        ])
        .split(f.area());

    let theme = app.theme.clone();
    let ctx = RenderContext::new(&theme, app.focus, app.animation_frame);

    title_bar::render(f, chunks[0], app, &ctx);

    if app.catalog().is_some() {
        if app.breakpoint().is_narrow() {
            render_stacked(f, chunks[1], app, &ctx);
        } else {
            render_columns(f, chunks[1], app, &ctx);
        }
    } else if let LoadState::Failed(error) = &app.load_state {
        render_error(f, chunks[1], app, error, &ctx);
    } else {
        render_loading(f, chunks[1], app, &ctx);
    }

    status_bar::render(f, chunks[2], app);

    if let Some(modal) = app.modal {
        render_modal(f, modal, app);
    }
    if let Some(toast) = &app.toast {
        let area = f.area();
        toast.render(f, area, &app.theme);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Load states
// ─────────────────────────────────────────────────────────────────────────────

fn render_loading(f: &mut Frame, area: Rect, app: &App, ctx: &RenderContext) {
    let text = Text::from(vec![
        Line::raw(""),
        Line::from(Span::styled(
            format!("{} Loading drug data...", ctx.spinner_char()),
            Style::default().fg(app.theme.highlight),
        )),
        Line::from(Span::styled(
            app.source_label(),
            Style::default().fg(app.theme.muted),
        )),
    ]);
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(app.theme.border_type));
    f.render_widget(paragraph, area);
}

fn render_error(f: &mut Frame, area: Rect, app: &App, error: &LoadError, ctx: &RenderContext) {
    let error_style = Style::default()
        .fg(app.theme.error)
        .add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(app.theme.muted);

    let retry = if app.is_loading() {
        format!("{} Retrying...", ctx.spinner_char())
    } else {
        "Press R to try again".to_string()
    };

    let text = Text::from(vec![
        Line::raw(""),
        Line::from(Span::styled("Failed to load data", error_style)),
        Line::from(Span::styled(
            "Please check your connection and try again.",
            Style::default().fg(app.theme.foreground),
        )),
        Line::raw(""),
        Line::from(Span::styled(error.to_string(), muted)),
        Line::raw(""),
        Line::from(Span::styled(retry, Style::default().fg(app.theme.highlight))),
    ]);
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.error)),
        );
    f.render_widget(paragraph, area);
}

// ─────────────────────────────────────────────────────────────────────────────
// Browser layouts
// ─────────────────────────────────────────────────────────────────────────────

/// Left column (search, index, drugs) | subdrugs | details
fn render_columns(f: &mut Frame, area: Rect, app: &mut App, ctx: &RenderContext) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(SEARCH_HEIGHT),
            Constraint::Length(INDEX_HEIGHT),
            Constraint::Min(3),
        ])
        .split(columns[0]);

    app.search.render(f, left[0], ctx);
    app.letters.render(f, left[1], ctx);
    app.drugs.render(f, left[2], ctx);
    app.subdrugs.render(f, columns[1], ctx);

    app.details.sync_viewport(columns[2].height);
    app.details.render(f, columns[2], ctx);
}

/// One section fills the body; the search box stays above the index
fn render_stacked(f: &mut Frame, area: Rect, app: &mut App, ctx: &RenderContext) {
    match app.section {
        Section::Letters => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(SEARCH_HEIGHT), Constraint::Min(3)])
                .split(area);
            app.search.render(f, rows[0], ctx);
            app.letters.render(f, rows[1], ctx);
        }
        Section::Drugs => app.drugs.render(f, area, ctx),
        Section::Subdrugs => app.subdrugs.render(f, area, ctx),
        Section::Details => {
            app.details.sync_viewport(area.height);
            app.details.render(f, area, ctx);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Overlays
// ─────────────────────────────────────────────────────────────────────────────

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn render_modal(f: &mut Frame, modal: Modal, app: &App) {
    match modal {
        Modal::Help => render_help(f, modal, app),
    }
}

fn render_help(f: &mut Frame, modal: Modal, app: &App) {
    let key_style = Style::default().fg(app.theme.highlight);
    let desc_style = Style::default().fg(app.theme.foreground);

    let mut lines = vec![Line::raw("")];
    lines.extend(HELP_BINDINGS.iter().map(|(key, desc)| {
        Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{:<16}", key), key_style),
            Span::styled(*desc, desc_style),
        ])
    }));
    lines.push(Line::raw(""));

    let width = 58;
    let height = lines.len() as u16 + 2;
    let area = centered_rect(width, height, f.area());
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(app.theme.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.highlight))
                .border_type(app.theme.border_type)
                .title(modal.title())
                .title_bottom(Line::from(" Press ? or Esc to close ").centered()),
        );
    f.render_widget(paragraph, area);
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Drug};
    use crate::config::Config;
    use crate::loader::{DataLoader, DataSource, LoaderOptions};
    use crate::logging::LogBuffer;
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn app() -> App {
        let loader = DataLoader::new(
            DataSource::File(PathBuf::from("missing.json")),
            LoaderOptions::default(),
        )
        .unwrap();
        let (app, _events) = App::new(&Config::default(), Arc::new(loader), LogBuffer::new());
        app
    }

    /// Draw one frame and return the screen, one line per row
    fn screen(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_failed_first_load_shows_error_view() {
        let mut app = app();
        app.on_load_result(Err(LoadError::Http { status: 500 }));

        let text = screen(&mut app, 120, 30);
        assert!(text.contains("Failed to load data"));
        assert!(text.contains("Please check your connection and try again."));
        assert!(text.contains("Press R to try again"));
    }

    #[tokio::test]
    async fn test_loading_view_before_data_arrives() {
        let mut app = app();
        let text = screen(&mut app, 120, 30);
        assert!(text.contains("Loading drug data..."));
    }

    #[tokio::test]
    async fn test_query_without_matches_shows_empty_list() {
        let mut app = app();
        app.on_load_result(Ok(Catalog::new(vec![
            Drug::new("Amoxicillin", vec![]),
            Drug::new("Paracetamol", vec![]),
        ])));
        app.on_query_settled("zzz".to_string());

        let text = screen(&mut app, 160, 40);
        assert!(text.contains("No drugs found"));
        assert!(!text.contains("Amoxicillin"));
    }
}
