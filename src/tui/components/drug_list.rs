//! Drug list
//!
//! Shows the filtered drugs with the matched part of each name emphasized.
//! Moving through the list selects as it goes; Enter or Right drills into
//! the subdrugs.

use crate::catalog::filter::NameMatch;
use crate::catalog::{Catalog, DrugKey, PLACEHOLDER};
use crate::tui::scroll::ListCursor;
use crate::tui::theme::Theme;
use crate::tui::traits::{Component, ComponentId, Handled, Intent, Interactive, RenderContext};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::ops::Range;

pub const EMPTY_MESSAGE: &str = "No drugs found";

/// One visible row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrugItem {
    pub key: DrugKey,
    pub name: String,
    /// Byte range of `name` to emphasize
    pub highlight: Option<Range<usize>>,
}

impl DrugItem {
    pub fn from_match(catalog: &Catalog, m: &NameMatch) -> Option<Self> {
        let drug = catalog.drug(m.key)?;
        Some(Self {
            key: m.key,
            name: drug.name.clone(),
            highlight: m.highlight.clone(),
        })
    }

    fn line(&self, theme: &Theme) -> Line<'_> {
        if self.name.trim().is_empty() {
            return Line::from(Span::styled(PLACEHOLDER, Style::default().fg(theme.muted)));
        }
        match &self.highlight {
            Some(range) if self.name.get(range.clone()).is_some() => Line::from(vec![
                Span::raw(&self.name[..range.start]),
                Span::styled(&self.name[range.clone()], theme.matched_style()),
                Span::raw(&self.name[range.end..]),
            ]),
            _ => Line::from(self.name.as_str()),
        }
    }
}

#[derive(Debug, Default)]
pub struct DrugList {
    items: Vec<DrugItem>,
    cursor: ListCursor,
}

impl DrugList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rows, keeping the cursor on `selected` if it is still visible
    pub fn set_items(&mut self, items: Vec<DrugItem>, selected: Option<DrugKey>) {
        self.items = items;
        self.cursor.set_len(self.items.len());
        self.sync_selected(selected);
    }

    pub fn sync_selected(&mut self, selected: Option<DrugKey>) {
        let index = selected.and_then(|key| self.items.iter().position(|item| item.key == key));
        self.cursor.select(index);
    }

    #[cfg(test)]
    pub fn items(&self) -> &[DrugItem] {
        &self.items
    }

    #[cfg(test)]
    pub fn selected_item(&self) -> Option<&DrugItem> {
        self.cursor.selected().and_then(|i| self.items.get(i))
    }

    pub fn title(&self) -> String {
        format!(" Drugs ({}) ", self.items.len())
    }

    fn emit(&self, index: Option<usize>, activate: bool) -> Handled {
        match index.and_then(|i| self.items.get(i)) {
            Some(item) => Handled::Emit(Intent::SelectDrug {
                key: item.key,
                activate,
            }),
            None => Handled::Yes,
        }
    }
}

impl Component for DrugList {
    fn id(&self) -> ComponentId {
        ComponentId::Drugs
    }

    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let theme = ctx.theme;
        let focused = ctx.is_focused(self.id());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(theme.border_style(focused))
            .title(Span::styled(self.title(), theme.title_style(focused)));

        if self.items.is_empty() {
            let empty = Paragraph::new(Span::styled(EMPTY_MESSAGE, Style::default().fg(theme.muted)))
                .block(block);
            f.render_widget(empty, area);
            return;
        }

        let rows: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| ListItem::new(item.line(theme)))
            .collect();

        let list = List::new(rows)
            .block(block)
            .style(Style::default().fg(theme.foreground))
            .highlight_style(theme.selected_style())
            .highlight_symbol("▸ ");

        // Fresh state each frame; ratatui scrolls the selection into view
        let mut state = ListState::default().with_selected(self.cursor.selected());
        f.render_stateful_widget(list, area, &mut state);
    }
}

impl Interactive for DrugList {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                let index = self.cursor.prev();
                self.emit(index, false)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let index = self.cursor.next();
                self.emit(index, false)
            }
            KeyCode::Home => {
                let index = self.cursor.first();
                self.emit(index, false)
            }
            KeyCode::End => {
                let index = self.cursor.last();
                self.emit(index, false)
            }
            KeyCode::Enter | KeyCode::Right => {
                // Enter with nothing highlighted opens the first row
                let index = self.cursor.selected().or_else(|| self.cursor.first());
                self.emit(index, true)
            }
            _ => Handled::No,
        }
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("↑↓:select  Enter:subdrugs  Home/End")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::filter::{display_matches, filter_drugs};
    use crate::catalog::Drug;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Drug::new("Amoxicillin", vec![]),
            Drug::new("Ampisilin", vec![]),
            Drug::new("Paracetamol", vec![]),
        ])
    }

    fn list_for(catalog: &Catalog, query: &str) -> DrugList {
        let keys = filter_drugs(catalog, None, query);
        let items = display_matches(catalog, &keys, query)
            .iter()
            .filter_map(|m| DrugItem::from_match(catalog, m))
            .collect();
        let mut list = DrugList::new();
        list.set_items(items, None);
        list
    }

    fn press(list: &mut DrugList, code: KeyCode) -> Handled {
        list.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn select(index: usize, activate: bool) -> Handled {
        Handled::Emit(Intent::SelectDrug {
            key: DrugKey(index),
            activate,
        })
    }

    #[test]
    fn test_items_carry_highlight() {
        let c = catalog();
        let list = list_for(&c, "AMP");
        assert_eq!(list.items().len(), 1);
        assert_eq!(list.items()[0].name, "Ampisilin");
        assert_eq!(list.items()[0].highlight, Some(0..3));
        assert_eq!(list.title(), " Drugs (1) ");
    }

    #[test]
    fn test_navigation_wraps_and_selects() {
        let c = catalog();
        let mut list = list_for(&c, "");

        assert_eq!(press(&mut list, KeyCode::Down), select(0, false));
        assert_eq!(press(&mut list, KeyCode::Up), select(2, false));
        assert_eq!(press(&mut list, KeyCode::Down), select(0, false));
        assert_eq!(press(&mut list, KeyCode::End), select(2, false));
        assert_eq!(press(&mut list, KeyCode::Home), select(0, false));
        assert_eq!(press(&mut list, KeyCode::Enter), select(0, true));
    }

    #[test]
    fn test_enter_without_highlight_opens_first() {
        let c = catalog();
        let mut list = list_for(&c, "para");
        assert_eq!(press(&mut list, KeyCode::Right), select(2, true));
    }

    #[test]
    fn test_empty_list_swallows_navigation() {
        let c = catalog();
        let mut list = list_for(&c, "zzz");
        assert!(list.items().is_empty());
        assert_eq!(press(&mut list, KeyCode::Down), Handled::Yes);
        assert_eq!(press(&mut list, KeyCode::Enter), Handled::Yes);
        assert_eq!(press(&mut list, KeyCode::Tab), Handled::No);
    }

    #[test]
    fn test_empty_list_renders_message() {
        let c = catalog();
        let list = list_for(&c, "zzz");
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme, ComponentId::Drugs, 0);

        let mut terminal = Terminal::new(TestBackend::new(40, 5)).unwrap();
        terminal
            .draw(|f| list.render(f, f.area(), &ctx))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("No drugs found"));
        assert!(text.contains("Drugs (0)"));
    }

    #[test]
    fn test_refilter_keeps_visible_selection() {
        let c = catalog();
        let mut list = list_for(&c, "");
        list.sync_selected(Some(DrugKey(2)));
        assert_eq!(list.selected_item().map(|i| i.key), Some(DrugKey(2)));

        let keys = filter_drugs(&c, None, "am");
        let items: Vec<DrugItem> = display_matches(&c, &keys, "am")
            .iter()
            .filter_map(|m| DrugItem::from_match(&c, m))
            .collect();
        list.set_items(items.clone(), Some(DrugKey(2)));
        // "Paracetamol" contains "am" too
        assert_eq!(list.selected_item().map(|i| i.key), Some(DrugKey(2)));

        list.set_items(items, Some(DrugKey(1)));
        assert_eq!(list.selected_item().map(|i| i.key), Some(DrugKey(1)));
    }
}
