//! Search page controller: owns the query state and decides which search
//! result is allowed to reach the screen.
//!
//! Every mutation funnels into one search runner. Each issued search bumps a
//! generation counter and cancels the previous in-flight call; a response is
//! only applied if its generation is still the latest. Free text goes through
//! a debounce window first, tracked with a separate keystroke counter.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use common::search_const::SEARCH_DEBOUNCE_MS;
use common::search_filter::{FacetVocabulary, Filter, FilterSet};
use common::search_query::{ResourceTypeFilter, SearchQuery, SearchRequest, SortOption};
use common::search_result::{RelatedPropertyPath, SearchResultFacets, SearchResultSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::api::search_api::SearchTransport;
use crate::data_definitions::page_cursor::PaginationCursor;
use crate::data_definitions::search_callbacks::{OnErrorCallback, OnSearchCallback, OnSearchParams};
use crate::data_definitions::usage_error::SearchUsageError;


pub struct SearchPageArgs {
    pub card_search_text: String,
    pub sort: SortOption,
    pub resource_type: Option<ResourceTypeFilter>,
    /// Merged into the card search filter last; wins on key collision.
    pub default_query_options: BTreeMap<String, String>,
    pub facet_vocabulary: FacetVocabulary,
    pub debounce_time: Duration,
    pub on_search: Option<OnSearchCallback>,
    pub on_error: Option<OnErrorCallback>,
}

impl Default for SearchPageArgs {
    fn default() -> Self {
        Self {
            card_search_text: String::new(),
            sort: SortOption::default(),
            resource_type: None,
            default_query_options: BTreeMap::new(),
            facet_vocabulary: FacetVocabulary::default(),
            debounce_time: Duration::from_millis(SEARCH_DEBOUNCE_MS),
            on_search: None,
            on_error: None,
        }
    }
}

impl SearchPageArgs {
    pub fn on_search(mut self, callback: impl Fn(&OnSearchParams) + 'static) -> Self {
        self.on_search = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&anyhow::Error) + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Idle,
    Debouncing,
    Searching,
}

/// How a single search call ended, from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Applied,
    /// A newer search or keystroke took over; nothing was written.
    Superseded,
    /// Reported through the error callback; previous results kept.
    Failed,
}

#[derive(Debug, Default)]
struct SearchPageState {
    card_search_text: String,
    active_filters: FilterSet,
    resource_type: Option<ResourceTypeFilter>,
    sort: SortOption,
    cursor: PaginationCursor,
    results: Option<Rc<SearchResultSet>>,
}

impl SearchPageState {
    fn query(&self) -> SearchQuery {
        SearchQuery {
            card_search_text: self.card_search_text.clone(),
            active_filters: self.active_filters.clone(),
            resource_type: self.resource_type,
            sort: self.sort,
            page_cursor: self.cursor.current().map(str::to_string),
        }
    }
}


/// Raises a status flag for as long as it lives. On drop the flag is lowered
/// only if no newer call took over the counter, so a dropped future never
/// leaves the page stuck in Debouncing or Searching.
struct StatusFlag<'a> {
    flag: &'a Cell<bool>,
    counter: &'a Cell<u64>,
    ticket: u64,
}

impl<'a> StatusFlag<'a> {
    fn raise(flag: &'a Cell<bool>, counter: &'a Cell<u64>, ticket: u64) -> Self {
        flag.set(true);
        Self { flag, counter, ticket }
    }
}

impl Drop for StatusFlag<'_> {
    fn drop(&mut self) {
        if self.counter.get() == self.ticket {
            self.flag.set(false);
        }
    }
}


pub struct SearchPage<T> {
    transport: T,
    vocabulary: FacetVocabulary,
    default_query_options: BTreeMap<String, String>,
    debounce_time: Duration,
    on_search: Option<OnSearchCallback>,
    on_error: Option<OnErrorCallback>,

    state: RefCell<SearchPageState>,
    generation: Cell<u64>,
    keystroke: Cell<u64>,
    in_flight: RefCell<Option<CancellationToken>>,
    searching: Cell<bool>,
    debouncing: Cell<bool>,
}

impl<T: SearchTransport> SearchPage<T> {
    /// Builds the page without searching; call [`SearchPage::search`] for the first page.
    pub fn new(transport: T, args: SearchPageArgs) -> Self {
        let state = SearchPageState {
            card_search_text: args.card_search_text,
            sort: args.sort,
            resource_type: args.resource_type,
            ..Default::default()
        };
        Self {
            transport,
            vocabulary: args.facet_vocabulary,
            default_query_options: args.default_query_options,
            debounce_time: args.debounce_time,
            on_search: args.on_search,
            on_error: args.on_error,
            state: RefCell::new(state),
            generation: Cell::new(0),
            keystroke: Cell::new(0),
            in_flight: RefCell::new(None),
            searching: Cell::new(false),
            debouncing: Cell::new(false),
        }
    }

    pub fn status(&self) -> SearchStatus {
        if self.searching.get() {
            SearchStatus::Searching
        } else if self.debouncing.get() {
            SearchStatus::Debouncing
        } else {
            SearchStatus::Idle
        }
    }

    pub fn query(&self) -> SearchQuery {
        self.state.borrow().query()
    }

    pub fn active_filters(&self) -> FilterSet {
        self.state.borrow().active_filters.clone()
    }

    pub fn page_cursor(&self) -> PaginationCursor {
        self.state.borrow().cursor.clone()
    }

    /// Snapshot of the last applied page; later searches replace it, never mutate it.
    pub fn results(&self) -> Option<Rc<SearchResultSet>> {
        self.state.borrow().results.clone()
    }

    pub fn related_properties(&self) -> Vec<RelatedPropertyPath> {
        self.results().map(|r| r.related_properties.clone()).unwrap_or_default()
    }

    pub fn total_result_count_display(&self) -> Option<String> {
        self.results().map(|r| r.total_result_count.to_string())
    }

    /// The request the current state would send.
    pub fn current_request(&self) -> SearchRequest {
        self.query().to_request(&self.vocabulary, &self.default_query_options)
    }

    /// Runs the current query as is.
    pub async fn search(&self) -> SearchOutcome {
        self.run_search().await
    }

    /// Re-runs the current query on the same page, typically after a failure.
    pub async fn retry(&self) -> SearchOutcome {
        self.run_search().await
    }

    pub async fn toggle_filter(&self, filter: Filter) -> Result<SearchOutcome, SearchUsageError> {
        {
            let mut state = self.state.borrow_mut();
            if !state.active_filters.contains(&filter) && !self.is_known_facet(&state, &filter) {
                return Err(SearchUsageError::UndeclaredFacet(filter.property_short_form_label));
            }
            state.active_filters.toggle(filter);
            state.cursor.reset_to_first();
        }
        Ok(self.run_search().await)
    }

    pub async fn update_sort(&self, sort: SortOption) -> SearchOutcome {
        {
            let mut state = self.state.borrow_mut();
            state.sort = sort;
            state.cursor.reset_to_first();
        }
        self.run_search().await
    }

    pub async fn update_resource_type(&self, resource_type: Option<ResourceTypeFilter>) -> SearchOutcome {
        {
            let mut state = self.state.borrow_mut();
            state.resource_type = resource_type;
            state.active_filters.clear();
            state.cursor.reset_to_first();
        }
        self.run_search().await
    }

    pub async fn switch_page(&self, cursor: &str) -> Result<SearchOutcome, SearchUsageError> {
        self.state.borrow_mut().cursor.select(cursor)?;
        Ok(self.run_search().await)
    }

    /// Records the text right away and searches once no newer text arrived
    /// within the debounce window. Superseded keystrokes never search.
    pub async fn submit_text(&self, text: impl Into<String>) -> SearchOutcome {
        let keystroke = self.keystroke.get() + 1;
        self.keystroke.set(keystroke);
        self.state.borrow_mut().card_search_text = text.into();
        let debouncing = StatusFlag::raise(&self.debouncing, &self.keystroke, keystroke);

        tokio::time::sleep(self.debounce_time).await;
        if self.keystroke.get() != keystroke {
            return SearchOutcome::Superseded;
        }
        drop(debouncing);
        self.state.borrow_mut().cursor.reset_to_first();
        self.run_search().await
    }

    /// Candidate values for a facet, counted against the current query.
    pub async fn facet_values(
        &self,
        property: &RelatedPropertyPath,
        value_search_text: &str,
    ) -> anyhow::Result<SearchResultFacets> {
        let request = self.current_request();
        self.transport
            .index_value_search(request, property.clone(), value_search_text.to_string())
            .await
    }

    fn is_known_facet(&self, state: &SearchPageState, filter: &Filter) -> bool {
        let label = filter.property_short_form_label.as_str();
        if self.vocabulary.is_declared(label) {
            return true;
        }
        state
            .results
            .as_ref()
            .is_some_and(|r| r.related_properties.iter().any(|p| p.short_form_label() == label))
    }

    async fn run_search(&self) -> SearchOutcome {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let token = CancellationToken::new();
        if let Some(previous) = self.in_flight.replace(Some(token.clone())) {
            previous.cancel();
        }

        let (request, params) = {
            let query = self.state.borrow().query();
            (
                query.to_request(&self.vocabulary, &self.default_query_options),
                OnSearchParams::from(&query),
            )
        };
        let searching = StatusFlag::raise(&self.searching, &self.generation, generation);
        debug!("search #{} issued: {:?}", generation, request);

        let response = tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("search #{} cancelled by a newer search", generation);
                return SearchOutcome::Superseded;
            }
            response = self.transport.index_card_search(request) => response,
        };
        if self.generation.get() != generation {
            debug!("search #{} finished after a newer search, dropping response", generation);
            return SearchOutcome::Superseded;
        }
        self.in_flight.replace(None);
        drop(searching);

        match response {
            Ok(result_set) => {
                info!(
                    "search #{}: {} results of {}",
                    generation,
                    result_set.results.len(),
                    result_set.total_result_count
                );
                {
                    let mut state = self.state.borrow_mut();
                    state.cursor.record_offered(result_set.cursors.clone());
                    state.results = Some(Rc::new(result_set));
                }
                if let Some(on_search) = &self.on_search {
                    on_search(&params);
                }
                SearchOutcome::Applied
            }
            Err(e) => {
                error!("search #{} failed: {:#}", generation, e);
                if let Some(on_error) = &self.on_error {
                    on_error(&e);
                }
                SearchOutcome::Failed
            }
        }
    }
}
