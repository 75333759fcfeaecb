//! Details table derivation
//!
//! Turns a subdrug into the ordered rows shown by the details panel and
//! printed by `drugstore show`. Recognised fields come first in their fixed
//! order, then unrecognised ones in dataset order. Blank text is dropped;
//! flags always survive.

use super::selection::Selection;
use super::{Catalog, FieldValue, KnownField, SubDrug, PLACEHOLDER};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailValue {
    Flag(bool),
    /// Text split on line breaks
    Lines(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub key: String,
    pub label: String,
    pub value: DetailValue,
}

impl DetailRow {
    fn new(key: &str, label: &str, value: &FieldValue) -> Option<Self> {
        if value.is_blank() {
            return None;
        }
        let value = match value {
            FieldValue::Flag(flag) => DetailValue::Flag(*flag),
            FieldValue::Text(text) => DetailValue::Lines(
                text.trim()
                    .split('\n')
                    .map(|line| line.trim_end_matches('\r').to_string())
                    .collect(),
            ),
        };
        Some(Self {
            key: key.to_string(),
            label: label.to_string(),
            value,
        })
    }
}

/// Rows for one subdrug, in display order
pub fn detail_rows(subdrug: &SubDrug) -> Vec<DetailRow> {
    let name = FieldValue::Text(subdrug.name.clone());
    let name_row = DetailRow::new(KnownField::Name.key(), KnownField::Name.label(), &name);

    let known = subdrug
        .known_fields()
        .filter_map(|(field, value)| DetailRow::new(field.key(), field.label(), value));

    let extra = subdrug
        .extra_fields()
        .iter()
        .filter_map(|(key, value)| DetailRow::new(key, key, value));

    name_row.into_iter().chain(known).chain(extra).collect()
}

/// Checkbox rendering of a flag
pub fn flag_marker(flag: bool) -> &'static str {
    if flag {
        "[x]"
    } else {
        "[ ]"
    }
}

/// What the details panel should show for the current selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsView {
    NothingSelected,
    NoSubdrug,
    Rows { heading: String, rows: Vec<DetailRow> },
}

impl DetailsView {
    pub fn for_selection(catalog: &Catalog, selection: &Selection) -> Self {
        if selection.drug().is_none() {
            return Self::NothingSelected;
        }
        match selection.selected_subdrug(catalog) {
            Some(subdrug) => Self::for_subdrug(subdrug),
            None => Self::NoSubdrug,
        }
    }

    pub fn for_subdrug(subdrug: &SubDrug) -> Self {
        let heading = if subdrug.name.trim().is_empty() {
            "Details".to_string()
        } else {
            subdrug.name.clone()
        };
        Self::Rows {
            heading,
            rows: detail_rows(subdrug),
        }
    }

    /// One-line message for states without rows
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::NothingSelected => Some("Select a drug and subdrug"),
            Self::NoSubdrug => Some("Select a subdrug to view details"),
            Self::Rows { rows, .. } if rows.is_empty() => Some("No details available"),
            Self::Rows { .. } => None,
        }
    }

    /// Plain-text rendering, used for the clipboard and headless output
    pub fn to_text(&self) -> String {
        let Self::Rows { heading, rows } = self else {
            return self.message().unwrap_or(PLACEHOLDER).to_string();
        };

        let mut out = String::new();
        let _ = writeln!(out, "{}", heading);
        if rows.is_empty() {
            let _ = writeln!(out, "{}", self.message().unwrap_or(PLACEHOLDER));
            return out;
        }

        let width = rows
            .iter()
            .map(|row| row.label.chars().count())
            .max()
            .unwrap_or(0);
        for row in rows {
            match &row.value {
                DetailValue::Flag(flag) => {
                    let _ = writeln!(out, "{:<width$}  {}", row.label, flag_marker(*flag));
                }
                DetailValue::Lines(lines) => {
                    for (i, line) in lines.iter().enumerate() {
                        let label = if i == 0 { row.label.as_str() } else { "" };
                        let _ = writeln!(out, "{:<width$}  {}", label, line);
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Drug, DrugKey, SubdrugKey};

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    fn labels(rows: &[DetailRow]) -> Vec<&str> {
        rows.iter().map(|row| row.label.as_str()).collect()
    }

    #[test]
    fn test_rows_follow_display_order_then_extras() {
        let subdrug = SubDrug::new("Amoxicillin 500mg")
            .with("zeta", text("z"))
            .with("kekuatan", text("500"))
            .with("fpktp", FieldValue::Flag(true))
            .with("kelas terapi", text("Antiinfeksi"))
            .with("alpha", text("a"));

        let rows = detail_rows(&subdrug);
        assert_eq!(
            labels(&rows),
            vec!["Nama", "Kelas Terapi", "Kekuatan", "FPKTP", "zeta", "alpha"]
        );
    }

    #[test]
    fn test_blank_text_omitted_but_false_flags_kept() {
        let subdrug = SubDrug::new("X")
            .with("sediaan", text("   "))
            .with("komposisi", text(""))
            .with("prb", FieldValue::Flag(false))
            .with("extra", text(" \n "));

        let rows = detail_rows(&subdrug);
        assert_eq!(labels(&rows), vec!["Nama", "PRB"]);
        assert_eq!(rows[1].value, DetailValue::Flag(false));
    }

    #[test]
    fn test_multiline_values_keep_line_breaks() {
        let subdrug = SubDrug::new("X").with("restriksi obat", text("Line one\r\nLine two\n"));
        let rows = detail_rows(&subdrug);
        assert_eq!(
            rows[1].value,
            DetailValue::Lines(vec!["Line one".to_string(), "Line two".to_string()])
        );
    }

    #[test]
    fn test_view_messages() {
        let catalog = Catalog::new(vec![Drug::new("Amoxicillin", vec![SubDrug::new("")])]);
        let mut selection = Selection::default();

        let view = DetailsView::for_selection(&catalog, &selection);
        assert_eq!(view.message(), Some("Select a drug and subdrug"));

        selection.select_drug(&catalog, DrugKey(0), 200).unwrap();
        let view = DetailsView::for_selection(&catalog, &selection);
        assert_eq!(view.message(), Some("Select a subdrug to view details"));

        let key = SubdrugKey {
            drug: DrugKey(0),
            index: 0,
        };
        selection.select_subdrug(&catalog, key, 200).unwrap();
        let view = DetailsView::for_selection(&catalog, &selection);
        assert_eq!(view.message(), Some("No details available"));
        assert!(matches!(view, DetailsView::Rows { ref heading, .. } if heading == "Details"));
    }

    #[test]
    fn test_amoxicillin_scenario_text() {
        let subdrug = SubDrug::new("Amoxicillin 500mg")
            .with("sediaan", text("tablet"))
            .with("fpktp", FieldValue::Flag(true));

        let text = DetailsView::for_subdrug(&subdrug).to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Amoxicillin 500mg");
        assert_eq!(lines[1], "Nama     Amoxicillin 500mg");
        assert_eq!(lines[2], "Sediaan  tablet");
        assert_eq!(lines[3], "FPKTP    [x]");
    }
}
