//! Paginated, searchable, filterable list state.
//!
//! One controller drives one list view. Search and filter changes are
//! debounced on independent timers; every fetch is numbered and only the
//! most recently issued one may write its result.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::ApiError;
use crate::error::ConsoleError;
use crate::models::page_count;

/// Search terms shorter than this (after trimming) are sent as no search.
pub const MIN_SEARCH_CHARS: usize = 2;

/// How many items are offered as search suggestions.
pub const SUGGESTION_LIMIT: usize = 5;

/// A list's filter value.
pub trait ListFilter: Clone + Default + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    /// Whether this value narrows the list.
    fn is_active(&self) -> bool;

    /// Whether a change to this value waits for the debounce interval.
    /// Values that need no debounce are fetched immediately.
    fn needs_debounce(&self) -> bool;

    /// The value actually sent to the backend.
    #[must_use]
    fn normalized(&self) -> Self {
        self.clone()
    }
}

/// Messages a list shows when it has nothing to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMessages {
    /// Empty result while a search or filter was applied.
    pub no_results: &'static str,
    /// Empty result with nothing applied.
    pub no_data: &'static str,
    /// Fallback when a fetch fails without a server message.
    pub fetch_failed: &'static str,
}

/// One fetch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery<F> {
    pub page: u32,
    pub limit: u32,
    /// Trimmed search term sent to the backend, or empty.
    pub search: String,
    /// Trimmed search box text, kept even when too short to send.
    /// Sources that search locally match on this.
    pub typed_search: String,
    pub filter: F,
}

impl<F: ListFilter> ListQuery<F> {
    /// Whether typed text or a filter narrows this query.
    #[must_use]
    pub fn is_narrowed(&self) -> bool {
        !self.typed_search.is_empty() || self.filter.is_active()
    }
}

/// One page as returned by a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub pages: u32,
    pub page: u32,
}

/// What a successful mutation did to the item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome<T> {
    /// Swap the item for this updated copy.
    Replace(T),
    /// Take the item out of the list.
    Remove,
}

/// A backend collection the controller can page through and mutate.
pub trait ListSource: Send + Sync + 'static {
    type Item: Clone + std::fmt::Debug + Send + Sync + 'static;
    type Filter: ListFilter;
    type Mutation: std::fmt::Debug + Send + Sync;

    const MESSAGES: ListMessages;

    fn fetch(
        &self,
        query: &ListQuery<Self::Filter>,
    ) -> impl Future<Output = Result<ListPage<Self::Item>, ApiError>> + Send;

    fn mutate(
        &self,
        item: &Self::Item,
        mutation: &Self::Mutation,
    ) -> impl Future<Output = Result<MutationOutcome<Self::Item>, ApiError>> + Send;

    fn item_id(item: &Self::Item) -> &str;

    /// Fallback message when `mutation` fails without a server message.
    fn failure_message(mutation: &Self::Mutation) -> &'static str;
}

/// Snapshot of a list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState<T, F> {
    pub items: Vec<T>,
    /// Current page (1-based).
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    /// Always at least 1.
    pub pages: u32,
    /// Search box contents as typed.
    pub search: String,
    /// Filter as selected.
    pub filter: F,
    /// A fetch is in flight.
    pub loading: bool,
    /// Message from the last failed fetch.
    pub error: Option<String>,
    /// Set when the last applied fetch returned nothing.
    pub empty_message: Option<&'static str>,
    /// The query behind the items currently shown.
    pub last_query: Option<ListQuery<F>>,
}

impl<T, F: ListFilter> ListState<T, F> {
    fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            page_size,
            total: 0,
            pages: 1,
            search: String::new(),
            filter: F::default(),
            loading: false,
            error: None,
            empty_message: None,
            last_query: None,
        }
    }

    /// The query a fetch of `page` would send right now.
    #[must_use]
    pub fn query_for(&self, page: u32) -> ListQuery<F> {
        ListQuery {
            page,
            limit: self.page_size,
            search: effective_search(&self.search).to_string(),
            typed_search: self.search.trim().to_string(),
            filter: self.filter.normalized(),
        }
    }
}

/// How a controller call resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was written to the state.
    Applied,
    /// A newer fetch was issued first; this response was dropped.
    Superseded,
    /// A fetch will run after the debounce interval.
    Scheduled,
    /// Nothing was requested.
    Ignored,
}

/// The trimmed term if it is long enough to search on, else empty.
#[must_use]
pub fn effective_search(term: &str) -> &str {
    let term = term.trim();
    if term.chars().count() < MIN_SEARCH_CHARS {
        ""
    } else {
        term
    }
}

#[derive(Debug, Clone, Copy)]
enum TimerSlot {
    Search,
    Filter,
}

#[derive(Default)]
struct Timers {
    generation: u64,
    search: Option<(u64, JoinHandle<()>)>,
    filter: Option<(u64, JoinHandle<()>)>,
}

impl Timers {
    const fn slot(&mut self, slot: TimerSlot) -> &mut Option<(u64, JoinHandle<()>)> {
        match slot {
            TimerSlot::Search => &mut self.search,
            TimerSlot::Filter => &mut self.filter,
        }
    }

    fn cancel(&mut self, slot: TimerSlot) {
        if let Some((_, handle)) = self.slot(slot).take() {
            handle.abort();
        }
    }

    fn cancel_all(&mut self) {
        self.cancel(TimerSlot::Search);
        self.cancel(TimerSlot::Filter);
    }
}

/// Drives one list view against a [`ListSource`].
///
/// Cheap to clone; clones share state and timers. Pending timers are
/// aborted when the last clone is dropped.
pub struct ListController<S: ListSource> {
    inner: Arc<ControllerInner<S>>,
}

impl<S: ListSource> Clone for ListController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ControllerInner<S: ListSource> {
    source: S,
    state: watch::Sender<ListState<S::Item, S::Filter>>,
    seq: AtomicU64,
    debounce: Duration,
    timers: Mutex<Timers>,
}

impl<S: ListSource> Drop for ControllerInner<S> {
    fn drop(&mut self) {
        self.timers
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel_all();
    }
}

impl<S: ListSource> ListController<S> {
    #[must_use]
    pub fn new(source: S, page_size: u32, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                source,
                state: watch::Sender::new(ListState::new(page_size.max(1))),
                seq: AtomicU64::new(0),
                debounce,
                timers: Mutex::new(Timers::default()),
            }),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> ListState<S::Item, S::Filter> {
        self.inner.state.borrow().clone()
    }

    /// Observe every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListState<S::Item, S::Filter>> {
        self.inner.state.subscribe()
    }

    /// The first few items of the current page, for search suggestions.
    #[must_use]
    pub fn suggestions(&self) -> Vec<S::Item> {
        self.inner
            .state
            .borrow()
            .items
            .iter()
            .take(SUGGESTION_LIMIT)
            .cloned()
            .collect()
    }

    /// Fetch `page` with the current search and filter.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Api` if the fetch fails. Items are left as
    /// they were and the message is also kept in the state.
    pub async fn fetch(&self, page: u32) -> Result<FetchOutcome, ConsoleError> {
        self.inner.fetch(page).await
    }

    /// Fetch the current page again.
    ///
    /// # Errors
    ///
    /// See [`ListController::fetch`].
    pub async fn refresh(&self) -> Result<FetchOutcome, ConsoleError> {
        let page = self.inner.state.borrow().page;
        self.inner.fetch(page).await
    }

    /// Set the search box contents.
    ///
    /// Terms too short to search on fetch page 1 right away with no
    /// search. Longer terms fetch page 1 after the debounce interval,
    /// replacing any search fetch still waiting.
    ///
    /// # Errors
    ///
    /// See [`ListController::fetch`].
    pub async fn search(&self, term: &str) -> Result<FetchOutcome, ConsoleError> {
        let term = term.to_string();
        let immediate = effective_search(&term).is_empty();
        self.inner.state.send_modify(|state| state.search = term);

        if immediate {
            self.inner.cancel(TimerSlot::Search);
            return self.inner.fetch(1).await;
        }
        self.schedule(TimerSlot::Search);
        Ok(FetchOutcome::Scheduled)
    }

    /// Set the filter.
    ///
    /// Same discipline as [`ListController::search`], on its own timer.
    ///
    /// # Errors
    ///
    /// See [`ListController::fetch`].
    pub async fn change_filter(&self, filter: S::Filter) -> Result<FetchOutcome, ConsoleError> {
        let immediate = !filter.needs_debounce();
        self.inner.state.send_modify(|state| state.filter = filter);

        if immediate {
            self.inner.cancel(TimerSlot::Filter);
            return self.inner.fetch(1).await;
        }
        self.schedule(TimerSlot::Filter);
        Ok(FetchOutcome::Scheduled)
    }

    /// Move to `page`. Ignored when out of range or while a fetch is in
    /// flight.
    ///
    /// # Errors
    ///
    /// See [`ListController::fetch`].
    pub async fn change_page(&self, page: u32) -> Result<FetchOutcome, ConsoleError> {
        {
            let state = self.inner.state.borrow();
            if page < 1 || page > state.pages || state.loading {
                tracing::debug!(
                    page,
                    pages = state.pages,
                    loading = state.loading,
                    "Page change ignored"
                );
                return Ok(FetchOutcome::Ignored);
            }
        }
        self.inner.fetch(page).await
    }

    /// Apply `mutation` to the item with `id` and patch the list in place.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::UnknownItem` if the id is not on the current
    /// page, or `ConsoleError::Api` if the backend refuses. The state is
    /// unchanged on error.
    pub async fn mutate(&self, id: &str, mutation: S::Mutation) -> Result<(), ConsoleError> {
        let item = self
            .inner
            .state
            .borrow()
            .items
            .iter()
            .find(|item| S::item_id(item) == id)
            .cloned()
            .ok_or_else(|| ConsoleError::UnknownItem(id.to_string()))?;

        let outcome = self
            .inner
            .source
            .mutate(&item, &mutation)
            .await
            .map_err(|e| ConsoleError::api(e, S::failure_message(&mutation)))?;

        tracing::info!(id, ?mutation, "List item updated");
        self.inner.state.send_modify(|state| match outcome {
            MutationOutcome::Replace(updated) => {
                if let Some(slot) = state.items.iter_mut().find(|item| S::item_id(item) == id) {
                    *slot = updated;
                }
            }
            MutationOutcome::Remove => {
                state.items.retain(|item| S::item_id(item) != id);
                state.total = state.total.saturating_sub(1);
                state.pages = page_count(state.total, state.page_size);
                state.page = state.page.min(state.pages);
                if state.items.is_empty() {
                    let narrowed = state.last_query.as_ref().is_some_and(ListQuery::is_narrowed);
                    state.empty_message = Some(empty_message::<S>(narrowed));
                }
            }
        });
        Ok(())
    }

    /// Abort any search or filter fetch still waiting on its debounce.
    pub fn cancel_pending(&self) {
        self.inner
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel_all();
    }
}

impl<S: ListSource> ControllerInner<S> {
    async fn fetch(&self, page: u32) -> Result<FetchOutcome, ConsoleError> {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let query = self.state.borrow().query_for(page);
        self.state.send_modify(|state| state.loading = true);
        let _in_flight = InFlight { inner: self, seq };

        let result = self.source.fetch(&query).await;

        if self.seq.load(Ordering::SeqCst) != seq {
            tracing::debug!(seq, "Dropping superseded list response");
            return Ok(FetchOutcome::Superseded);
        }

        match result {
            Ok(fetched) => {
                let narrowed = query.is_narrowed();
                tracing::debug!(
                    page = fetched.page,
                    total = fetched.total,
                    count = fetched.items.len(),
                    "List page loaded"
                );
                self.state.send_modify(|state| {
                    state.pages = fetched.pages.max(1);
                    state.page = fetched.page.clamp(1, state.pages);
                    state.total = fetched.total;
                    state.empty_message = fetched
                        .items
                        .is_empty()
                        .then(|| empty_message::<S>(narrowed));
                    state.items = fetched.items;
                    state.loading = false;
                    state.error = None;
                    state.last_query = Some(query);
                });
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                let err = ConsoleError::api(e, S::MESSAGES.fetch_failed);
                let message = err.user_message();
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(message);
                });
                Err(err)
            }
        }
    }

    fn cancel(&self, slot: TimerSlot) {
        self.timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel(slot);
    }
}

/// Clears `loading` when the latest fetch ends without writing a result,
/// which happens when its future is dropped mid-request.
struct InFlight<'a, S: ListSource> {
    inner: &'a ControllerInner<S>,
    seq: u64,
}

impl<S: ListSource> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        if self.inner.seq.load(Ordering::SeqCst) != self.seq {
            return;
        }
        self.inner.state.send_if_modified(|state| {
            let was_loading = state.loading;
            state.loading = false;
            was_loading
        });
    }
}

impl<S: ListSource> ListController<S> {
    /// Replace the timer in `slot` with one that fetches page 1 after the
    /// debounce interval.
    fn schedule(&self, slot: TimerSlot) {
        let mut timers = self.inner.timers.lock().unwrap_or_else(PoisonError::into_inner);
        timers.cancel(slot);
        timers.generation += 1;
        let generation = timers.generation;

        let weak: Weak<ControllerInner<S>> = Arc::downgrade(&self.inner);
        let debounce = self.inner.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            {
                let mut timers = inner.timers.lock().unwrap_or_else(PoisonError::into_inner);
                let current = timers.slot(slot);
                if current.as_ref().is_none_or(|(g, _)| *g != generation) {
                    return;
                }
                // Leave the slot so a later schedule cannot abort this fetch.
                current.take();
            }
            if let Err(e) = inner.fetch(1).await {
                tracing::warn!(error = %e, "Debounced list fetch failed");
            }
        });
        *timers.slot(slot) = Some((generation, handle));
    }
}

fn empty_message<S: ListSource>(narrowed: bool) -> &'static str {
    if narrowed {
        S::MESSAGES.no_results
    } else {
        S::MESSAGES.no_data
    }
}
