// Application state for the browser
//
// App owns every piece of UI state and is only ever mutated by the event
// loop in `tui::mod`. Panels report what the user asked for as intents;
// App applies them to the Selection and pushes the results back into the
// panels so each one renders from its own cached state.

use super::clipboard;
use super::components::{
    DetailsPanel, DrugItem, DrugList, LetterIndex, SearchBar, SubdrugList, Toast,
};
use super::input::InputHandler;
use super::layout::{self, Breakpoint};
use super::modal::Modal;
use super::theme::Theme;
use super::traits::{ComponentId, Copyable, Handled, Intent, Interactive};
use crate::catalog::details::DetailsView;
use crate::catalog::filter::{available_letters, display_matches, filter_drugs};
use crate::catalog::selection::{ScrollRequest, Section, Selection};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::loader::{DataLoader, LoadError, LoadHandle, LoadState};
use crate::logging::LogBuffer;
use crate::timers::{Debouncer, Deferred};
use crossterm::event::{KeyCode, KeyEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// Receivers the event loop waits on alongside terminal input
pub struct AppEvents {
    /// In-flight dataset load, if any
    pub load: Option<LoadHandle>,
    /// Search text once it has settled
    pub queries: UnboundedReceiver<String>,
    /// Narrow-layout section jumps
    pub scrolls: UnboundedReceiver<Section>,
}

pub struct App {
    pub theme: Theme,
    pub load_state: LoadState,
    pub selection: Selection,
    /// Query the filter currently reflects (debounced)
    pub applied_query: String,

    // Panels
    pub search: SearchBar,
    pub letters: LetterIndex,
    pub drugs: DrugList,
    pub subdrugs: SubdrugList,
    pub details: DetailsPanel,

    pub focus: ComponentId,
    /// Section on screen in the narrow layout
    pub section: Section,
    pub viewport_width: u16,
    /// Offer the "back to top" hint (set by drug/subdrug selection)
    pub show_back_to_top: bool,

    pub toast: Option<Toast>,
    pub modal: Option<Modal>,
    pub should_quit: bool,
    /// Animation frame counter for spinners
    pub animation_frame: usize,
    pub log_buffer: LogBuffer,

    loader: Arc<DataLoader>,
    /// A load task is running (initial or refresh)
    loading: bool,
    reload_requested: bool,
    stale_after: Duration,
    debouncer: Debouncer<String>,
    scroller: Deferred<Section>,
    input_handler: InputHandler,
}

impl App {
    pub fn new(config: &Config, loader: Arc<DataLoader>, log_buffer: LogBuffer) -> (Self, AppEvents) {
        let (debouncer, queries) = Debouncer::new(config.ui.debounce());
        let (scroller, scrolls) = Deferred::new();

        let app = Self {
            theme: Theme::by_name(&config.theme),
            load_state: LoadState::Loading,
            selection: Selection::new(config.ui.scroll_policy()),
            applied_query: String::new(),
            search: SearchBar::new(),
            letters: LetterIndex::new(),
            drugs: DrugList::new(),
            subdrugs: SubdrugList::new(),
            details: DetailsPanel::new(),
            focus: ComponentId::Search,
            section: Section::Letters,
            viewport_width: u16::MAX,
            show_back_to_top: false,
            toast: None,
            modal: None,
            should_quit: false,
            animation_frame: 0,
            log_buffer,
            loader,
            loading: false,
            reload_requested: false,
            stale_after: config.loader.options().stale_after,
            debouncer,
            scroller,
            input_handler: InputHandler::with_default_config(),
        };

        let events = AppEvents {
            load: None,
            queries,
            scrolls,
        };
        (app, events)
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.load_state.catalog()
    }

    pub fn source_label(&self) -> String {
        self.loader.source().to_string()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn breakpoint(&self) -> Breakpoint {
        Breakpoint::from_width(self.viewport_width, &self.selection.policy())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────

    /// Spawn a fetch; the caller keeps the handle alive
    pub fn start_load(&mut self) -> LoadHandle {
        self.loading = true;
        self.reload_requested = false;
        self.loader.spawn()
    }

    /// `r` reloads only stale data; `R` (force) always does
    pub fn request_reload(&mut self, force: bool) {
        if self.loading {
            self.show_toast("Already loading");
            return;
        }
        if let LoadState::Ready(cached) = &self.load_state {
            if !force && !cached.is_stale(self.stale_after) {
                let age = cached.age().as_secs();
                self.show_toast(format!("Data is fresh (loaded {}s ago)", age));
                return;
            }
        }
        tracing::info!("Reloading dataset from {}", self.loader.source());
        self.reload_requested = true;
    }

    /// Hand the pending reload request to the event loop
    pub fn take_reload_request(&mut self) -> bool {
        std::mem::take(&mut self.reload_requested)
    }

    pub fn on_load_result(&mut self, result: Result<Catalog, LoadError>) {
        self.loading = false;
        let refreshed = result.is_ok();

        if let Some(error) = self.load_state.apply(result) {
            if self.catalog().is_some() {
                self.toast = Some(Toast::error(format!("Refresh failed: {}", error)));
            }
            return;
        }

        if refreshed {
            // Keys may point elsewhere in the new dataset
            self.selection.select_letter(self.selection.letter());
            self.subdrugs.invalidate();
            if let Some(catalog) = self.catalog() {
                let letters = available_letters(catalog.drugs());
                // A letter with no drugs left falls back to All
                if let Some(letter) = self.selection.letter() {
                    if !letters.contains(&letter) {
                        tracing::debug!("Letter {:?} is empty after reload", letter);
                        self.selection.select_letter(None);
                    }
                }
                self.letters.set_available(letters);
            }
            self.letters.set_active(self.selection.letter());
            self.refilter();
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────

    /// Debounced search text arrived
    pub fn on_query_settled(&mut self, query: String) {
        if query != self.applied_query {
            self.applied_query = query;
            self.refilter();
        }
    }

    pub fn apply_intent(&mut self, intent: Intent) {
        let Some(catalog) = self.catalog().cloned() else {
            return;
        };

        match intent {
            Intent::SelectLetter(letter) => {
                self.selection.select_letter(letter);
                self.letters.set_active(letter);
                self.refilter();
            }
            Intent::QueryChanged(query) => {
                self.selection.set_query(query.clone());
                self.debouncer.push(query);
                self.sync_panels(&catalog);
            }
            Intent::SelectDrug { key, activate } => {
                match self.selection.select_drug(&catalog, key, self.viewport_width) {
                    Ok(request) => {
                        self.show_back_to_top = true;
                        self.sync_panels(&catalog);
                        self.drill_in(request, activate, Section::Subdrugs);
                    }
                    Err(e) => tracing::warn!("Ignoring drug selection: {}", e),
                }
            }
            Intent::SelectSubdrug { key, activate } => {
                match self.selection.select_subdrug(&catalog, key, self.viewport_width) {
                    Ok(request) => {
                        self.show_back_to_top = true;
                        self.sync_panels(&catalog);
                        self.drill_in(request, activate, Section::Details);
                    }
                    Err(e) => tracing::warn!("Ignoring subdrug selection: {}", e),
                }
            }
        }
    }

    /// Move on to `next`. Any selection in the stacked layout scrolls
    /// after the delay; in columns only activation moves focus.
    fn drill_in(&mut self, request: Option<ScrollRequest>, activate: bool, next: Section) {
        match request {
            Some(request) => self.scroller.schedule(request.delay, request.section),
            None if activate => self.set_focus(ComponentId::for_section(next)),
            None => {}
        }
    }

    /// A scheduled section jump came due
    pub fn on_scroll(&mut self, section: Section) {
        if self.breakpoint().is_narrow() {
            self.set_focus(ComponentId::for_section(section));
        }
    }

    /// Re-run the filter and rebuild every panel from the selection
    fn refilter(&mut self) {
        let Some(catalog) = self.catalog().cloned() else {
            return;
        };
        let keys = filter_drugs(&catalog, self.selection.letter(), &self.applied_query);
        let items = display_matches(&catalog, &keys, &self.applied_query)
            .iter()
            .filter_map(|m| DrugItem::from_match(&catalog, m))
            .collect();
        self.drugs.set_items(items, self.selection.drug());
        self.sync_panels(&catalog);
    }

    /// Push the selection into the list cursors and the details view
    fn sync_panels(&mut self, catalog: &Catalog) {
        self.drugs.sync_selected(self.selection.drug());
        self.subdrugs.set_drug(catalog, self.selection.drug());
        self.subdrugs.sync_selected(self.selection.subdrug());
        self.details
            .set_view(DetailsView::for_selection(catalog, &self.selection));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Focus and layout
    // ─────────────────────────────────────────────────────────────────────

    /// Focus a component; in the narrow layout its section comes along
    pub fn set_focus(&mut self, id: ComponentId) {
        self.focus = id;
        self.section = id.section();
    }

    pub fn focus_next(&mut self) {
        self.set_focus(self.focus.next_focus());
    }

    pub fn focus_prev(&mut self) {
        self.set_focus(self.focus.prev_focus());
    }

    /// Esc outside the search box: one section back, then to search
    pub fn back_one_section(&mut self) {
        match self.focus {
            ComponentId::Search => {}
            ComponentId::Letters => self.set_focus(ComponentId::Search),
            other => {
                if let Some(section) = layout::section_above(other.section()) {
                    self.set_focus(ComponentId::for_section(section));
                }
            }
        }
    }

    /// `g`: jump back to the letter index
    pub fn back_to_top(&mut self) {
        self.set_focus(ComponentId::Letters);
        self.show_back_to_top = false;
    }

    /// Record the terminal width. Falling into the narrow layout shows the
    /// section that has focus.
    pub fn set_viewport_width(&mut self, width: u16) {
        self.viewport_width = width;
        self.section = self.focus.section();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────

    pub fn handle_key_press(&mut self, key: KeyCode) -> bool {
        self.input_handler.handle_key_press(key)
    }

    pub fn handle_key_release(&mut self, key: KeyCode) {
        self.input_handler.handle_key_release(key);
    }

    /// Route a key to the focused panel and apply whatever it emits
    pub fn dispatch_to_focused(&mut self, key: KeyEvent) -> Handled {
        if self.catalog().is_none() {
            return Handled::No;
        }
        let handled = match self.focus {
            ComponentId::Search => self.search.handle_key(key),
            ComponentId::Letters => self.letters.handle_key(key),
            ComponentId::Drugs => self.drugs.handle_key(key),
            ComponentId::Subdrugs => self.subdrugs.handle_key(key),
            ComponentId::Details => self.details.handle_key(key),
        };
        if let Handled::Emit(intent) = &handled {
            self.apply_intent(intent.clone());
        }
        handled
    }

    /// Hint for the status bar
    pub fn focus_hint(&self) -> Option<&'static str> {
        match self.focus {
            ComponentId::Search => self.search.focus_hint(),
            ComponentId::Letters => self.letters.focus_hint(),
            ComponentId::Drugs => self.drugs.focus_hint(),
            ComponentId::Subdrugs => self.subdrugs.focus_hint(),
            ComponentId::Details => self.details.focus_hint(),
        }
    }

    pub fn copy_details(&mut self) {
        match self.details.copy_text() {
            Some(text) => {
                let what = self.details.copy_description();
                self.toast = Some(clipboard::copy_with_toast(&text, &what));
            }
            None => self.show_toast("Nothing to copy"),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Housekeeping
    // ─────────────────────────────────────────────────────────────────────

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message));
    }

    /// Advance spinners and expire the toast
    pub fn tick(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }
}
