//! Subdrug list: variants of the selected drug
//!
//! Each row is the variant name with its dosage form (`sediaan`) on a second,
//! dimmer line when the dataset has one.

use crate::catalog::{Catalog, DrugKey, SubdrugKey};
use crate::tui::scroll::ListCursor;
use crate::tui::traits::{Component, ComponentId, Handled, Intent, Interactive, RenderContext};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub const NO_DRUG_MESSAGE: &str = "Select a drug to view subdrugs";
pub const EMPTY_MESSAGE: &str = "No subdrugs available";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdrugItem {
    pub key: SubdrugKey,
    pub name: String,
    pub sediaan: Option<String>,
}

#[derive(Debug, Default)]
pub struct SubdrugList {
    drug: Option<DrugKey>,
    items: Vec<SubdrugItem>,
    cursor: ListCursor,
}

impl SubdrugList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the variants of `drug` (or the "select a drug" prompt)
    pub fn set_drug(&mut self, catalog: &Catalog, drug: Option<DrugKey>) {
        if self.drug == drug && !self.items.is_empty() {
            return;
        }
        self.drug = drug;
        self.items = drug
            .and_then(|key| catalog.drug(key).map(|d| (key, d)))
            .map(|(key, d)| {
                d.subdrugs
                    .iter()
                    .enumerate()
                    .map(|(index, sub)| SubdrugItem {
                        key: SubdrugKey { drug: key, index },
                        name: sub.display_name().to_string(),
                        sediaan: sub.sediaan().map(str::to_string),
                    })
                    .collect()
            })
            .unwrap_or_default();
        self.cursor = ListCursor::default();
        self.cursor.set_len(self.items.len());
    }

    /// Drop cached rows so the next `set_drug` rebuilds them (dataset reload)
    pub fn invalidate(&mut self) {
        self.drug = None;
        self.items.clear();
        self.cursor = ListCursor::default();
    }

    pub fn sync_selected(&mut self, selected: Option<SubdrugKey>) {
        let index = selected.and_then(|key| self.items.iter().position(|item| item.key == key));
        self.cursor.select(index);
    }

    #[cfg(test)]
    pub fn items(&self) -> &[SubdrugItem] {
        &self.items
    }

    pub fn title(&self) -> String {
        format!(" Subdrugs ({}) ", self.items.len())
    }

    /// Message shown instead of rows, if any
    pub fn message(&self) -> Option<&'static str> {
        match (self.drug, self.items.is_empty()) {
            (None, _) => Some(NO_DRUG_MESSAGE),
            (Some(_), true) => Some(EMPTY_MESSAGE),
            (Some(_), false) => None,
        }
    }

    fn emit(&self, index: Option<usize>, activate: bool) -> Handled {
        match index.and_then(|i| self.items.get(i)) {
            Some(item) => Handled::Emit(Intent::SelectSubdrug {
                key: item.key,
                activate,
            }),
            None => Handled::Yes,
        }
    }
}

impl Component for SubdrugList {
    fn id(&self) -> ComponentId {
        ComponentId::Subdrugs
    }

    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let theme = ctx.theme;
        let focused = ctx.is_focused(self.id());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(theme.border_style(focused))
            .title(Span::styled(self.title(), theme.title_style(focused)));

        if let Some(message) = self.message() {
            let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(theme.muted)))
                .wrap(Wrap { trim: true })
                .block(block);
            f.render_widget(paragraph, area);
            return;
        }

        let rows: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| {
                let mut text = Text::from(Line::from(item.name.as_str()));
                if let Some(sediaan) = &item.sediaan {
                    text.push_line(Line::from(Span::styled(
                        format!("  {}", sediaan),
                        Style::default().fg(theme.muted),
                    )));
                }
                ListItem::new(text)
            })
            .collect();

        let list = List::new(rows)
            .block(block)
            .style(Style::default().fg(theme.foreground))
            .highlight_style(theme.selected_style())
            .highlight_symbol("▸ ");

        let mut state = ListState::default().with_selected(self.cursor.selected());
        f.render_stateful_widget(list, area, &mut state);
    }
}

impl Interactive for SubdrugList {
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
                let index = self.cursor.selected().or_else(|| self.cursor.first());
                self.emit(index, true)
            }
            _ => Handled::No,
        }
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("↑↓:select  Enter:details")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Drug, FieldValue, SubDrug};
    use crossterm::event::KeyModifiers;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Drug::new(
                "Amoxicillin",
                vec![
                    SubDrug::new("Amoxicillin 500mg")
                        .with("sediaan", FieldValue::Text("tablet".to_string())),
                    SubDrug::new("Amoxicillin sirup"),
                ],
            ),
            Drug::new("Paracetamol", vec![]),
        ])
    }

    fn press(list: &mut SubdrugList, code: KeyCode) -> Handled {
        list.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_messages_follow_drug_state() {
        let c = catalog();
        let mut list = SubdrugList::new();
        assert_eq!(list.message(), Some(NO_DRUG_MESSAGE));

        list.set_drug(&c, Some(DrugKey(1)));
        assert_eq!(list.message(), Some(EMPTY_MESSAGE));
        assert_eq!(list.title(), " Subdrugs (0) ");

        list.set_drug(&c, Some(DrugKey(0)));
        assert_eq!(list.message(), None);
        assert_eq!(list.title(), " Subdrugs (2) ");
        assert_eq!(list.items()[0].sediaan.as_deref(), Some("tablet"));
        assert_eq!(list.items()[1].sediaan, None);
    }

    #[test]
    fn test_navigation_emits_keys_of_this_drug() {
        let c = catalog();
        let mut list = SubdrugList::new();
        list.set_drug(&c, Some(DrugKey(0)));

        let key = |index| SubdrugKey {
            drug: DrugKey(0),
            index,
        };
        assert_eq!(
            press(&mut list, KeyCode::Up),
            Handled::Emit(Intent::SelectSubdrug {
                key: key(1),
                activate: false
            })
        );
        assert_eq!(
            press(&mut list, KeyCode::Enter),
            Handled::Emit(Intent::SelectSubdrug {
                key: key(1),
                activate: true
            })
        );
    }

    #[test]
    fn test_switching_drug_resets_cursor() {
        let c = catalog();
        let mut list = SubdrugList::new();
        list.set_drug(&c, Some(DrugKey(0)));
        press(&mut list, KeyCode::Down);

        list.set_drug(&c, None);
        assert!(list.items().is_empty());
        assert_eq!(press(&mut list, KeyCode::Down), Handled::Yes);
    }
}
