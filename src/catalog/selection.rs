//! Selection state
//!
//! Tracks (letter, drug, subdrug, query). Each transition clears whatever is
//! downstream of it, so a subdrug can only ever be selected under the drug
//! that owns it.

use super::filter::Letter;
use super::{Catalog, DrugKey, SubDrug, SubdrugKey};
use std::fmt;
use std::time::Duration;

/// Screen sections a narrow layout can jump to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Letters,
    Drugs,
    Subdrugs,
    Details,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Self::Letters => "Index",
            Self::Drugs => "Drugs",
            Self::Subdrugs => "Subdrugs",
            Self::Details => "Details",
        }
    }
}

/// Deferred request to bring a section into view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub section: Section,
    pub delay: Duration,
}

/// When (and how late) selections ask for an auto-scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPolicy {
    /// Viewports narrower than this many columns are "narrow"
    pub breakpoint: u16,
    pub delay: Duration,
}

impl Default for ScrollPolicy {
    fn default() -> Self {
        Self {
            breakpoint: 100,
            delay: Duration::from_millis(100),
        }
    }
}

impl ScrollPolicy {
    pub fn is_narrow(&self, viewport_width: u16) -> bool {
        viewport_width < self.breakpoint
    }

    fn request(&self, viewport_width: u16, section: Section) -> Option<ScrollRequest> {
        self.is_narrow(viewport_width).then_some(ScrollRequest {
            section,
            delay: self.delay,
        })
    }
}

/// Rejected transitions. State is left untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    UnknownDrug(DrugKey),
    NoDrugSelected,
    ForeignSubdrug(SubdrugKey),
    UnknownSubdrug(SubdrugKey),
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDrug(key) => write!(f, "No drug at index {}", key.0),
            Self::NoDrugSelected => write!(f, "Select a drug before choosing a subdrug"),
            Self::ForeignSubdrug(key) => write!(
                f,
                "Subdrug {} belongs to drug {}, which is not selected",
                key.index, key.drug.0
            ),
            Self::UnknownSubdrug(key) => {
                write!(f, "Drug {} has no subdrug {}", key.drug.0, key.index)
            }
        }
    }
}

impl std::error::Error for SelectionError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    letter: Option<Letter>,
    drug: Option<DrugKey>,
    subdrug: Option<SubdrugKey>,
    query: String,
    policy: ScrollPolicy,
}

impl Selection {
    pub fn new(policy: ScrollPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn letter(&self) -> Option<Letter> {
        self.letter
    }

    pub fn drug(&self) -> Option<DrugKey> {
        self.drug
    }

    pub fn subdrug(&self) -> Option<SubdrugKey> {
        self.subdrug
    }

    /// Raw, undebounced query text
    #[cfg(test)]
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn policy(&self) -> ScrollPolicy {
        self.policy
    }

    #[cfg(test)]
    pub fn selected_drug<'a>(&self, catalog: &'a Catalog) -> Option<&'a crate::catalog::Drug> {
        self.drug.and_then(|key| catalog.drug(key))
    }

    pub fn selected_subdrug<'a>(&self, catalog: &'a Catalog) -> Option<&'a SubDrug> {
        self.subdrug.and_then(|key| catalog.subdrug(key))
    }

    pub fn select_letter(&mut self, letter: Option<Letter>) {
        self.letter = letter;
        self.drug = None;
        self.subdrug = None;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.drug = None;
        self.subdrug = None;
    }

    /// Select a drug, clearing the subdrug. Narrow viewports get a request
    /// to bring the subdrug list into view.
    pub fn select_drug(
        &mut self,
        catalog: &Catalog,
        key: DrugKey,
        viewport_width: u16,
    ) -> Result<Option<ScrollRequest>, SelectionError> {
        if catalog.drug(key).is_none() {
            return Err(SelectionError::UnknownDrug(key));
        }
        self.drug = Some(key);
        self.subdrug = None;
        Ok(self.policy.request(viewport_width, Section::Subdrugs))
    }

    /// Select a variant of the currently selected drug
    pub fn select_subdrug(
        &mut self,
        catalog: &Catalog,
        key: SubdrugKey,
        viewport_width: u16,
    ) -> Result<Option<ScrollRequest>, SelectionError> {
        match self.drug {
            None => return Err(SelectionError::NoDrugSelected),
            Some(drug) if drug != key.drug => return Err(SelectionError::ForeignSubdrug(key)),
            Some(_) => {}
        }
        if catalog.subdrug(key).is_none() {
            return Err(SelectionError::UnknownSubdrug(key));
        }
        self.subdrug = Some(key);
        Ok(self.policy.request(viewport_width, Section::Details))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Drug;

    const WIDE: u16 = 160;
    const NARROW: u16 = 60;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Drug::new(
                "Amoxicillin",
                vec![SubDrug::new("Amoxicillin 500mg"), SubDrug::new("Amoxicillin sirup")],
            ),
            Drug::new("Paracetamol", vec![]),
        ])
    }

    fn sub(drug: usize, index: usize) -> SubdrugKey {
        SubdrugKey {
            drug: DrugKey(drug),
            index,
        }
    }

    fn with_subdrug(catalog: &Catalog) -> Selection {
        let mut selection = Selection::default();
        selection.select_drug(catalog, DrugKey(0), WIDE).unwrap();
        selection.select_subdrug(catalog, sub(0, 1), WIDE).unwrap();
        selection
    }

    #[test]
    fn test_initial_state_is_empty() {
        let selection = Selection::default();
        assert_eq!(selection.letter(), None);
        assert_eq!(selection.drug(), None);
        assert_eq!(selection.subdrug(), None);
        assert_eq!(selection.query(), "");
    }

    #[test]
    fn test_selecting_drug_clears_subdrug() {
        let c = catalog();
        let mut selection = with_subdrug(&c);
        selection.select_drug(&c, DrugKey(1), WIDE).unwrap();
        assert_eq!(selection.drug(), Some(DrugKey(1)));
        assert_eq!(selection.subdrug(), None);
    }

    #[test]
    fn test_letter_and_query_clear_drug_and_subdrug() {
        let c = catalog();

        let mut selection = with_subdrug(&c);
        selection.set_query("amox");
        assert_eq!(selection.letter(), None);
        assert_eq!((selection.drug(), selection.subdrug()), (None, None));

        let mut selection = with_subdrug(&c);
        selection.set_query("amox");
        selection.select_letter(Letter::new('A'));
        assert_eq!(selection.query(), "amox");
        assert_eq!((selection.drug(), selection.subdrug()), (None, None));
    }

    #[test]
    fn test_narrow_viewport_requests_scroll() {
        let c = catalog();
        let mut selection = Selection::default();

        assert_eq!(selection.select_drug(&c, DrugKey(0), WIDE), Ok(None));

        let request = selection.select_drug(&c, DrugKey(0), NARROW).unwrap();
        assert_eq!(
            request,
            Some(ScrollRequest {
                section: Section::Subdrugs,
                delay: Duration::from_millis(100),
            })
        );

        let request = selection.select_subdrug(&c, sub(0, 0), NARROW).unwrap();
        assert_eq!(request.map(|r| r.section), Some(Section::Details));
    }

    #[test]
    fn test_invalid_selections_leave_state_unchanged() {
        let c = catalog();
        let mut selection = Selection::default();

        assert_eq!(
            selection.select_subdrug(&c, sub(0, 0), WIDE),
            Err(SelectionError::NoDrugSelected)
        );
        assert_eq!(
            selection.select_drug(&c, DrugKey(9), WIDE),
            Err(SelectionError::UnknownDrug(DrugKey(9)))
        );

        let before = with_subdrug(&c);
        let mut selection = before.clone();
        assert_eq!(
            selection.select_subdrug(&c, sub(1, 0), WIDE),
            Err(SelectionError::ForeignSubdrug(sub(1, 0)))
        );
        assert_eq!(
            selection.select_subdrug(&c, sub(0, 7), WIDE),
            Err(SelectionError::UnknownSubdrug(sub(0, 7)))
        );
        assert_eq!(selection, before);
    }

    #[test]
    fn test_resolves_selected_records() {
        let c = catalog();
        let selection = with_subdrug(&c);
        assert_eq!(selection.selected_drug(&c).unwrap().name, "Amoxicillin");
        assert_eq!(
            selection.selected_subdrug(&c).unwrap().name,
            "Amoxicillin sirup"
        );
    }
}
