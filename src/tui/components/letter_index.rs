//! Letter index: "All" plus A–Z
//!
//! Letters with no drugs under them are drawn dimmed and can be neither
//! highlighted nor selected.

use crate::catalog::filter::Letter;
use crate::tui::traits::{Component, ComponentId, Handled, Intent, Interactive, RenderContext};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::collections::BTreeSet;

/// One button; `None` is "All"
type Slot = Option<Letter>;

#[derive(Debug)]
pub struct LetterIndex {
    slots: Vec<Slot>,
    available: BTreeSet<Letter>,
    /// Currently applied filter
    active: Option<Letter>,
    /// Highlighted button (index into `slots`)
    cursor: usize,
}

impl LetterIndex {
    pub fn new() -> Self {
        let mut slots = vec![None];
        slots.extend(Letter::all().map(Some));
        Self {
            slots,
            available: BTreeSet::new(),
            active: None,
            cursor: 0,
        }
    }

    pub fn set_available(&mut self, available: BTreeSet<Letter>) {
        self.available = available;
        if !self.is_enabled(self.slots[self.cursor]) {
            self.cursor = 0;
        }
    }

    /// Mirror the applied filter and move the highlight onto it
    pub fn set_active(&mut self, letter: Option<Letter>) {
        self.active = letter;
        if let Some(i) = self.slots.iter().position(|&slot| slot == letter) {
            self.cursor = i;
        }
    }

    pub fn is_enabled(&self, slot: Slot) -> bool {
        slot.map_or(true, |letter| self.available.contains(&letter))
    }

    pub fn highlighted(&self) -> Slot {
        self.slots[self.cursor]
    }

    /// Move the highlight to the next enabled button, wrapping around.
    /// "All" is always enabled so this terminates.
    fn step(&mut self, forward: bool) {
        let len = self.slots.len();
        let mut i = self.cursor;
        loop {
            i = if forward { (i + 1) % len } else { (i + len - 1) % len };
            if self.is_enabled(self.slots[i]) {
                self.cursor = i;
                return;
            }
        }
    }

    fn select(&mut self, slot: Slot) -> Handled {
        if !self.is_enabled(slot) {
            return Handled::Yes;
        }
        self.set_active(slot);
        Handled::Emit(Intent::SelectLetter(slot))
    }

    fn slot_span(&self, index: usize, slot: Slot, ctx: &RenderContext) -> Span<'static> {
        let theme = ctx.theme;
        let label = match slot {
            None => " All ".to_string(),
            Some(letter) => format!(" {} ", letter),
        };

        let mut style = if !self.is_enabled(slot) {
            Style::default().fg(theme.disabled)
        } else if slot == self.active {
            theme.selected_style()
        } else {
            Style::default().fg(theme.foreground)
        };
        if index == self.cursor && ctx.is_focused(self.id()) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Span::styled(label, style)
    }
}

impl Component for LetterIndex {
    fn id(&self) -> ComponentId {
        ComponentId::Letters
    }

    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let focused = ctx.is_focused(self.id());
        let spans: Vec<Span> = self
            .slots
            .iter()
            .enumerate()
            .map(|(i, &slot)| self.slot_span(i, slot, ctx))
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(ctx.theme.border_type)
            .border_style(ctx.theme.border_style(focused))
            .title(Span::styled(" Index ", ctx.theme.title_style(focused)));

        let paragraph = Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: false })
            .block(block);
        f.render_widget(paragraph, area);
    }
}

impl Interactive for LetterIndex {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return Handled::No;
        }
        match key.code {
            KeyCode::Left => {
                self.step(false);
                Handled::Yes
            }
            KeyCode::Right => {
                self.step(true);
                Handled::Yes
            }
            KeyCode::Enter => self.select(self.highlighted()),
            KeyCode::Char('0') | KeyCode::Char('*') => self.select(None),
            KeyCode::Char(c) => match Letter::new(c) {
                Some(letter) => self.select(Some(letter)),
                None => Handled::No,
            },
            _ => Handled::No,
        }
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("←→:move  Enter:select  a-z:jump  0:all")
    }
}
