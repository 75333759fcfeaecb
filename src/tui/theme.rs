// Theme system for the TUI
//
// A handful of built-in palettes selected by name from config. Each theme
// defines colors for every element the browser draws.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
    Nord,
}

impl ThemeKind {
    pub fn all() -> &'static [ThemeKind] {
        &[ThemeKind::Dark, ThemeKind::Light, ThemeKind::Nord]
    }

    /// Look a theme up by config name. Unknown names fall back to dark.
    pub fn parse(name: &str) -> Self {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_default()
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThemeKind::Dark => "dark",
            ThemeKind::Light => "light",
            ThemeKind::Nord => "nord",
        }
    }

    pub fn theme(&self) -> Theme {
        match self {
            ThemeKind::Dark => Theme::dark(),
            ThemeKind::Light => Theme::light(),
            ThemeKind::Nord => Theme::nord(),
        }
    }
}

/// Complete theme definition with all UI colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub highlight: Color,
    pub border_type: BorderType,

    // Title and status
    pub title: Color,
    pub status_bar: Color,

    // Selection
    pub selection: Color,
    pub selection_fg: Color,

    // Text roles
    pub muted: Color,
    /// Matched part of a drug name
    pub matched: Color,
    /// Letters with no drugs
    pub disabled: Color,
    /// Field labels in the details table
    pub label: Color,
    pub flag_on: Color,
    pub flag_off: Color,

    pub error: Color,
    pub warn: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn by_name(name: &str) -> Self {
        ThemeKind::parse(name).theme()
    }

    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::White,
            border: Color::Gray,
            highlight: Color::Cyan,
            border_type: BorderType::Rounded,

            title: Color::Cyan,
            status_bar: Color::Green,

            selection: Color::DarkGray,
            selection_fg: Color::Yellow,

            muted: Color::Gray,
            matched: Color::Yellow,
            disabled: Color::DarkGray,
            label: Color::LightBlue,
            flag_on: Color::Green,
            flag_off: Color::DarkGray,

            error: Color::Red,
            warn: Color::Yellow,
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::White,
            foreground: Color::Black,
            border: Color::DarkGray,
            highlight: Color::Blue,
            border_type: BorderType::Plain,

            title: Color::Blue,
            status_bar: Color::DarkGray,

            selection: Color::LightBlue,
            selection_fg: Color::Black,

            muted: Color::DarkGray,
            matched: Color::Magenta,
            disabled: Color::Gray,
            label: Color::Blue,
            flag_on: Color::Green,
            flag_off: Color::Gray,

            error: Color::Red,
            warn: Color::Rgb(184, 134, 11), // Dark goldenrod
        }
    }

    pub fn nord() -> Self {
        Self {
            background: Color::Rgb(46, 52, 64),
            foreground: Color::Rgb(216, 222, 233),
            border: Color::Rgb(76, 86, 106),
            highlight: Color::Rgb(136, 192, 208),
            border_type: BorderType::Rounded,

            title: Color::Rgb(136, 192, 208),
            status_bar: Color::Rgb(163, 190, 140),

            selection: Color::Rgb(67, 76, 94),
            selection_fg: Color::Rgb(235, 203, 139),

            muted: Color::Rgb(129, 161, 193),
            matched: Color::Rgb(235, 203, 139),
            disabled: Color::Rgb(76, 86, 106),
            label: Color::Rgb(129, 161, 193),
            flag_on: Color::Rgb(163, 190, 140),
            flag_off: Color::Rgb(76, 86, 106),

            error: Color::Rgb(191, 97, 106),
            warn: Color::Rgb(235, 203, 139),
        }
    }

    // ─── Style helpers ───────────────────────────────────────

    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        let color = if focused { self.highlight } else { self.border };
        Style::default().fg(color)
    }

    pub fn title_style(&self, focused: bool) -> Style {
        let style = Style::default().fg(self.title);
        if focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .fg(self.selection_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn matched_style(&self) -> Style {
        Style::default()
            .fg(self.matched)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }
}
