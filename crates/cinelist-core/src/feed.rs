//! Infinite-list controller for the home feed.
//!
//! Holds the category/sort selection, the search term and the pages fetched so
//! far. Fetches are split into `begin_fetch` / `PendingFetch::run` / `complete` so
//! the caller decides where the network call runs; only the completion of the most
//! recent fetch is ever applied.

use cinelist_api::{ApiError, MovieCatalog};
use cinelist_models::{Category, DiscoverSort, Identified, Movie, PagedResult, SelectList};
use futures::future::{AbortHandle, AbortRegistration, Abortable};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Merge a freshly fetched page into what is already shown.
///
/// Page 1 (or nothing shown yet) replaces everything. Later pages append the items
/// whose id has not been seen, keeping arrival order. Totals always come from the
/// latest page.
pub fn merge_page<T: Identified>(
    previous: Option<PagedResult<T>>,
    incoming: PagedResult<T>,
    page: u32,
) -> PagedResult<T> {
    let Some(mut merged) = previous.filter(|_| page > 1) else {
        return incoming;
    };

    let mut seen: HashSet<u64> = merged.results.iter().map(Identified::id).collect();
    for item in incoming.results {
        if seen.insert(item.id()) {
            merged.results.push(item);
        }
    }
    merged.page = incoming.page;
    merged.total_pages = incoming.total_pages;
    merged.total_results = incoming.total_results;
    merged
}

/// What the feed is currently listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedQuery {
    Discover { category: Category, sort_by: String },
    Search { term: String },
}

#[derive(Debug)]
pub enum FetchResult {
    Loaded(PagedResult<Movie>),
    Failed(ApiError),
    Aborted,
}

/// Result of running a [`PendingFetch`], to be handed back to [`MovieFeed::complete`].
#[derive(Debug)]
pub struct FetchOutcome {
    pub generation: u64,
    pub page: u32,
    pub result: FetchResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Applied,
    /// A newer fetch was started; the result was dropped
    Stale,
    Aborted,
    /// Logged and treated as no data
    Failed,
}

/// A fetch that has been registered with the feed but not yet run.
#[derive(Debug)]
pub struct PendingFetch {
    generation: u64,
    page: u32,
    query: FeedQuery,
    registration: AbortRegistration,
}

impl PendingFetch {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn query(&self) -> &FeedQuery {
        &self.query
    }

    pub async fn run(self, catalog: &dyn MovieCatalog) -> FetchOutcome {
        let PendingFetch {
            generation,
            page,
            query,
            registration,
        } = self;

        let request = async {
            match &query {
                FeedQuery::Discover { category, sort_by } => {
                    catalog.discover(*category, page, sort_by).await
                }
                FeedQuery::Search { term } => catalog.search(term, page).await,
            }
        };

        let result = match Abortable::new(request, registration).await {
            Ok(Ok(data)) => FetchResult::Loaded(data),
            Ok(Err(e)) => FetchResult::Failed(e),
            Err(_) => FetchResult::Aborted,
        };

        FetchOutcome {
            generation,
            page,
            result,
        }
    }
}

#[derive(Debug)]
pub struct MovieFeed {
    categories: SelectList,
    sorts: SelectList,
    search_input: String,
    search_term: Option<String>,
    page: u32,
    data: Option<PagedResult<Movie>>,
    loading: bool,
    loading_more: bool,
    generation: u64,
    in_flight: Option<AbortHandle>,
}

impl Default for MovieFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl MovieFeed {
    pub fn new() -> Self {
        Self {
            categories: Category::select_list(),
            sorts: DiscoverSort::select_list(),
            search_input: String::new(),
            search_term: None,
            page: 1,
            data: None,
            loading: false,
            loading_more: false,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn categories(&self) -> &SelectList {
        &self.categories
    }

    pub fn sorts(&self) -> &SelectList {
        &self.sorts
    }

    pub fn category(&self) -> Category {
        self.categories
            .selected_value()
            .and_then(Category::from_value)
            .unwrap_or_default()
    }

    pub fn sort_by(&self) -> &str {
        self.sorts
            .selected_value()
            .unwrap_or_else(|| DiscoverSort::default().value())
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn data(&self) -> Option<&PagedResult<Movie>> {
        self.data.as_ref()
    }

    pub fn movies(&self) -> &[Movie] {
        self.data.as_ref().map(|d| d.results.as_slice()).unwrap_or(&[])
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// More pages exist beyond the current one.
    pub fn has_more(&self) -> bool {
        self.data
            .as_ref()
            .is_some_and(|d| self.page < d.total_pages.max(1))
    }

    /// The committed search term wins over category browsing.
    pub fn query(&self) -> FeedQuery {
        match &self.search_term {
            Some(term) => FeedQuery::Search { term: term.clone() },
            None => FeedQuery::Discover {
                category: self.category(),
                sort_by: self.sort_by().to_string(),
            },
        }
    }

    /// Returns `true` when the selection changed and the feed was reset.
    pub fn set_category(&mut self, value: &str) -> bool {
        let changed = self.categories.select(value);
        if changed {
            debug!(category = value, "Feed category changed");
            self.reset();
        }
        changed
    }

    pub fn set_sort(&mut self, value: &str) -> bool {
        let changed = self.sorts.select(value);
        if changed {
            debug!(sort_by = value, "Feed sort changed");
            self.reset();
        }
        changed
    }

    /// Update the raw search box. Clearing it drops back to category browsing.
    pub fn set_search_input(&mut self, text: &str) -> bool {
        self.search_input = text.to_string();
        if text.trim().is_empty() && self.search_term.is_some() {
            self.search_term = None;
            self.reset();
            return true;
        }
        false
    }

    /// Commit the search box. Returns `true` when the listing changed.
    pub fn commit_search(&mut self) -> bool {
        let term = self.search_input.trim();
        let next = (!term.is_empty()).then(|| term.to_string());
        if next == self.search_term {
            return false;
        }
        self.search_term = next;
        self.reset();
        true
    }

    /// Back to page 1 with nothing loaded. Any fetch in flight is abandoned.
    pub fn reset(&mut self) {
        self.cancel();
        self.page = 1;
        self.data = None;
        self.loading = false;
        self.loading_more = false;
    }

    /// Abort the fetch in flight, if any, and make its completion stale.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
            self.generation += 1;
        }
    }

    /// Register a fetch of the current page, aborting the previous one.
    pub fn begin_fetch(&mut self) -> PendingFetch {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.generation += 1;
        self.loading = true;

        let (handle, registration) = AbortHandle::new_pair();
        self.in_flight = Some(handle);

        PendingFetch {
            generation: self.generation,
            page: self.page,
            query: self.query(),
            registration,
        }
    }

    /// Advance to the next page. `None` when nothing is loaded yet, a load is
    /// already running, or the last page has been reached.
    pub fn load_more(&mut self) -> Option<PendingFetch> {
        let data = self.data.as_ref()?;
        if self.loading_more || self.page >= data.total_pages.max(1) {
            return None;
        }
        self.page += 1;
        self.loading_more = true;
        Some(self.begin_fetch())
    }

    /// Apply a finished fetch if it is still the latest one.
    pub fn complete(&mut self, outcome: FetchOutcome) -> FetchStatus {
        if outcome.generation != self.generation {
            debug!(
                generation = outcome.generation,
                current = self.generation,
                "Dropping stale feed result"
            );
            return FetchStatus::Stale;
        }

        self.in_flight = None;
        self.loading = false;
        self.loading_more = false;

        match outcome.result {
            FetchResult::Loaded(incoming) => {
                self.page = outcome.page;
                self.data = Some(merge_page(self.data.take(), incoming, outcome.page));
                FetchStatus::Applied
            }
            FetchResult::Failed(e) => {
                warn!(page = outcome.page, "Failed to load movies: {}", e);
                self.rewind_page();
                FetchStatus::Failed
            }
            FetchResult::Aborted => {
                self.rewind_page();
                FetchStatus::Aborted
            }
        }
    }

    /// Fetch the current page and apply it.
    pub async fn refresh(&mut self, catalog: &dyn MovieCatalog) -> FetchStatus {
        let pending = self.begin_fetch();
        let outcome = pending.run(catalog).await;
        self.complete(outcome)
    }

    /// Fetch and apply the next page, if there is one.
    pub async fn fetch_more(&mut self, catalog: &dyn MovieCatalog) -> Option<FetchStatus> {
        let pending = self.load_more()?;
        let outcome = pending.run(catalog).await;
        Some(self.complete(outcome))
    }

    // A failed "load more" must not skip the page next time.
    fn rewind_page(&mut self) {
        self.page = self.data.as_ref().map(|d| d.page).unwrap_or(1);
    }
}
