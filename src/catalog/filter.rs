//! Filter engine
//!
//! Pure derivations from (dataset, letter, debounced query) to the visible
//! drug list. Order is always the dataset order; nothing here ranks or sorts.

use super::{Catalog, Drug, DrugKey};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;

/// Case-normalize a name or query for comparison
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

// ─────────────────────────────────────────────────────────────────────────────
// Letters
// ─────────────────────────────────────────────────────────────────────────────

/// An index letter, always an ASCII uppercase `A`..=`Z`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Letter(char);

impl Letter {
    /// Accepts either case; anything outside A–Z is rejected
    pub fn new(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        upper.is_ascii_uppercase().then_some(Self(upper))
    }

    pub fn all() -> impl Iterator<Item = Letter> {
        ('A'..='Z').map(Self)
    }

    #[cfg(test)]
    pub fn as_char(self) -> char {
        self.0
    }

    fn lower(self) -> char {
        self.0.to_ascii_lowercase()
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Letter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Letter::new(c).ok_or_else(|| format!("'{}' is not a letter A-Z", s)),
            _ => Err(format!("expected a single letter A-Z, got '{}'", s)),
        }
    }
}

/// Index letter a name files under, if any
fn index_letter(name: &str) -> Option<Letter> {
    let first = name.chars().next()?;
    let mut upper = first.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => Some(Letter(c)),
        _ => None,
    }
}

/// Letters with at least one drug filed under them. Letters missing from
/// the set are rendered disabled.
pub fn available_letters(drugs: &[Drug]) -> BTreeSet<Letter> {
    drugs
        .iter()
        .filter_map(|drug| index_letter(&drug.name))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Primary filter
// ─────────────────────────────────────────────────────────────────────────────

fn passes_letter(normalized_name: &str, letter: Option<Letter>) -> bool {
    letter.map_or(true, |l| normalized_name.starts_with(l.lower()))
}

/// Drugs passing both the letter filter and the (debounced) query filter.
///
/// The query test is skipped only for the literally empty string; a
/// whitespace query still has to appear in the name.
pub fn filter_drugs(catalog: &Catalog, letter: Option<Letter>, query: &str) -> Vec<DrugKey> {
    let needle = normalize(query);
    catalog
        .drugs()
        .iter()
        .enumerate()
        .filter(|(_, drug)| {
            let name = normalize(&drug.name);
            passes_letter(&name, letter) && (needle.is_empty() || name.contains(&needle))
        })
        .map(|(index, _)| DrugKey(index))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Display filter and highlighting
// ─────────────────────────────────────────────────────────────────────────────

/// A visible drug plus the byte span of its name to emphasize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch {
    pub key: DrugKey,
    pub highlight: Option<Range<usize>>,
}

/// Re-apply the text test to an already filtered list and attach highlights.
///
/// A blank query (after trimming) passes everything through unhighlighted.
pub fn display_matches(catalog: &Catalog, keys: &[DrugKey], query: &str) -> Vec<NameMatch> {
    if query.trim().is_empty() {
        return keys
            .iter()
            .map(|&key| NameMatch {
                key,
                highlight: None,
            })
            .collect();
    }

    let needle = normalize(query);
    keys.iter()
        .filter_map(|&key| {
            let drug = catalog.drug(key)?;
            normalize(&drug.name).contains(&needle).then(|| NameMatch {
                key,
                highlight: highlight_span(&drug.name, query),
            })
        })
        .collect()
}

/// Byte range in `text` of the first case-insensitive occurrence of `query`.
///
/// The search runs on the lower-cased text; the hit is mapped back onto the
/// source characters it came from, so the range always falls on char
/// boundaries of `text` even when lower-casing changes byte lengths.
pub fn highlight_span(text: &str, query: &str) -> Option<Range<usize>> {
    if query.trim().is_empty() {
        return None;
    }
    let needle = normalize(query);

    let mut lowered = String::with_capacity(text.len());
    // origin[i] = byte offset in `text` of the char that produced lowered byte i
    let mut origin = Vec::with_capacity(text.len());
    for (offset, ch) in text.char_indices() {
        for lower in ch.to_lowercase() {
            let before = lowered.len();
            lowered.push(lower);
            origin.resize(origin.len() + (lowered.len() - before), offset);
        }
    }

    let start = lowered.find(&needle)?;
    let end = start + needle.len();
    let first = origin[start];
    let last = origin[end - 1];
    let last_len = text[last..].chars().next().map_or(0, char::len_utf8);
    Some(first..last + last_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SubDrug;

    fn catalog(names: &[&str]) -> Catalog {
        Catalog::new(
            names
                .iter()
                .map(|name| Drug::new(*name, vec![SubDrug::new("x")]))
                .collect(),
        )
    }

    fn names(catalog: &Catalog, keys: &[DrugKey]) -> Vec<String> {
        keys.iter()
            .map(|&k| catalog.drug(k).unwrap().name.clone())
            .collect()
    }

    #[test]
    fn test_letter_parsing() {
        assert_eq!(Letter::new('a'), Some(Letter('A')));
        assert_eq!(Letter::new('Z'), Some(Letter('Z')));
        assert_eq!(Letter::new('1'), None);
        assert_eq!(Letter::new('é'), None);
        assert_eq!("b".parse::<Letter>(), Ok(Letter('B')));
        assert!("ab".parse::<Letter>().is_err());
        assert_eq!(Letter::all().count(), 26);
    }

    #[test]
    fn test_available_letters() {
        let c = catalog(&["Amoxicillin", "ambroxol", "Paracetamol", "5-FU", "", "Éter"]);
        let letters: Vec<char> = available_letters(c.drugs())
            .into_iter()
            .map(Letter::as_char)
            .collect();
        assert_eq!(letters, vec!['A', 'P']);
    }

    #[test]
    fn test_letter_filter_matches_first_character() {
        let c = catalog(&["Amoxicillin", "Paracetamol", "ambroxol", "Captopril"]);
        let keys = filter_drugs(&c, Letter::new('a'), "");
        assert_eq!(names(&c, &keys), vec!["Amoxicillin", "ambroxol"]);

        // Every drug under a letter is returned, nothing else
        for letter in Letter::all() {
            for key in filter_drugs(&c, Some(letter), "") {
                let name = &c.drug(key).unwrap().name;
                assert_eq!(index_letter(name), Some(letter));
            }
        }
    }

    #[test]
    fn test_query_is_case_insensitive_and_preserves_order() {
        let c = catalog(&["Paracetamol", "Amoxicillin", "Co-amoxiclav"]);
        let keys = filter_drugs(&c, None, "AmOx");
        assert_eq!(names(&c, &keys), vec!["Amoxicillin", "Co-amoxiclav"]);

        assert!(filter_drugs(&c, None, "zzz").is_empty());
    }

    #[test]
    fn test_empty_query_is_identity() {
        let c = catalog(&["Paracetamol", "Amoxicillin"]);
        let keys = filter_drugs(&c, None, "");
        assert_eq!(keys, vec![DrugKey(0), DrugKey(1)]);
        assert_eq!(filter_drugs(&c, None, ""), keys);
    }

    #[test]
    fn test_letter_and_query_combine() {
        let c = catalog(&["Amoxicillin", "Co-amoxiclav", "Ampicillin"]);
        let keys = filter_drugs(&c, Letter::new('A'), "cillin");
        assert_eq!(names(&c, &keys), vec!["Amoxicillin", "Ampicillin"]);
    }

    #[test]
    fn test_whitespace_query_primary_vs_display() {
        let c = catalog(&["Asam Mefenamat", "Amlodipine"]);

        // Primary filter only skips the literally empty query
        let keys = filter_drugs(&c, None, " ");
        assert_eq!(names(&c, &keys), vec!["Asam Mefenamat"]);

        // Display filter skips blank queries entirely
        let all = vec![DrugKey(0), DrugKey(1)];
        let shown = display_matches(&c, &all, "  ");
        assert_eq!(shown.len(), 2);
        assert!(shown.iter().all(|m| m.highlight.is_none()));
    }

    #[test]
    fn test_display_matches_highlight_first_occurrence() {
        let c = catalog(&["Amoxicillin"]);
        let shown = display_matches(&c, &[DrugKey(0)], "cil");
        assert_eq!(shown[0].highlight, Some(5..8));
        assert_eq!(&c.drug(DrugKey(0)).unwrap().name[5..8], "cil");
    }

    #[test]
    fn test_highlight_respects_char_boundaries() {
        let text = "ÉTER Ämox";
        let span = highlight_span(text, "ämo").unwrap();
        assert_eq!(&text[span], "Ämo");

        // 'İ' lower-cases to two chars; the hit maps back to the whole 'İ'
        let text = "xİy";
        let span = highlight_span(text, "i").unwrap();
        assert_eq!(&text[span], "İ");

        assert_eq!(highlight_span("Amoxicillin", "zzz"), None);
        assert_eq!(highlight_span("Amoxicillin", ""), None);
    }
}
