// Components module - UI building blocks
//
// Panels own their display state and implement the traits in
// `tui::traits`. The title and status bars are plain render functions
// over `App`, drawn in every view.

pub mod details_panel;
pub mod drug_list;
pub mod letter_index;
pub mod scrollbar;
pub mod search_bar;
pub mod status_bar;
pub mod subdrug_list;
pub mod title_bar;
pub mod toast;

pub use details_panel::DetailsPanel;
pub use drug_list::{DrugItem, DrugList};
pub use letter_index::LetterIndex;
pub use search_bar::SearchBar;
pub use subdrug_list::SubdrugList;
pub use toast::Toast;
