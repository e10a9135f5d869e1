//! Generic paginated list store.
//!
//! [`PagedList`] is the plain state and its transitions. [`PaginatedStore`]
//! wraps it for async use: it enforces at most one in-flight `load_more` per
//! collection and drops responses that arrive after the collection was reset.
//! A reset never frees the in-flight slot; only the request holding it does.
//!
//! The fetch operation is passed to each call rather than stored, so one
//! store type serves every listing (groups, friends, members, ...).

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{BuddyError, Result};
use crate::types::Page;

/// State of one paginated collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    /// Index of the last page applied (0-based).
    pub current_page: u32,
    pub has_more: bool,
    pub is_loading_more: bool,
    /// User-facing message of the last failed request.
    pub error: Option<String>,
}

impl<T> Default for PagedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 0,
            has_more: true,
            is_loading_more: false,
            error: None,
        }
    }
}

/// The persisted subset of a [`PagedList`]: no loading or error flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSnapshot<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub has_more: bool,
}

impl<T> Default for ListSnapshot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 0,
            has_more: true,
        }
    }
}

impl<T> PagedList<T> {
    /// Replace everything with page 0. A `load_more` still in flight keeps
    /// its slot until it settles.
    pub fn apply_first_page(&mut self, page: Page<T>) {
        self.items = page.content;
        self.current_page = 0;
        self.has_more = !page.last;
        self.error = None;
    }

    /// Claim the in-flight slot and return the page index to fetch, or `None`
    /// if there is nothing more to load or a load is already running.
    pub fn begin_load_more(&mut self) -> Option<u32> {
        if !self.has_more || self.is_loading_more {
            return None;
        }
        self.is_loading_more = true;
        Some(self.current_page + 1)
    }

    /// Settle a load started by [`PagedList::begin_load_more`].
    ///
    /// Success appends in order and advances the cursor to `page_index`; failure
    /// records the error. The in-flight slot is released either way.
    pub fn finish_load_more(&mut self, page_index: u32, result: Result<Page<T>>) -> bool {
        self.is_loading_more = false;
        match result {
            Ok(page) => {
                self.items.extend(page.content);
                self.current_page = page_index;
                self.has_more = !page.last;
                self.error = None;
                true
            }
            Err(e) => {
                self.error = Some(e.user_message());
                false
            }
        }
    }

    pub fn snapshot(&self) -> ListSnapshot<T>
    where
        T: Clone,
    {
        ListSnapshot {
            items: self.items.clone(),
            current_page: self.current_page,
            has_more: self.has_more,
        }
    }

    pub fn from_snapshot(snapshot: ListSnapshot<T>) -> Self {
        Self {
            items: snapshot.items,
            current_page: snapshot.current_page,
            has_more: snapshot.has_more,
            ..Self::default()
        }
    }
}

/// What a fetch call did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page was applied.
    Applied,
    /// The guard refused to start a request.
    Skipped,
    /// The request failed; the error marker was set and items are unchanged.
    Failed,
    /// The collection was reset while the request was in flight; the
    /// response was discarded.
    Stale,
}

struct Inner<T> {
    list: PagedList<T>,
    /// Cancelled whenever the collection is reset, invalidating requests
    /// started before the reset.
    generation: CancellationToken,
}

pub struct PaginatedStore<T> {
    inner: Mutex<Inner<T>>,
}

impl<T> Default for PaginatedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PaginatedStore<T> {
    pub fn new() -> Self {
        Self::from_list(PagedList::default())
    }

    pub fn from_snapshot(snapshot: ListSnapshot<T>) -> Self {
        Self::from_list(PagedList::from_snapshot(snapshot))
    }

    fn from_list(list: PagedList<T>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                list,
                generation: CancellationToken::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch page 0 and replace the collection with it.
    ///
    /// On failure the items, cursor and `has_more` are left untouched and
    /// only the error marker is set. A successful first page supersedes any
    /// `load_more` still in flight.
    pub async fn fetch_first_page<F, Fut>(&self, fetch: F) -> LoadOutcome
    where
        F: FnOnce(u32) -> Fut,
        Fut: Future<Output = Result<Page<T>>>,
    {
        let generation = self.lock().generation.clone();
        let result = fetch(0).await;

        let mut inner = self.lock();
        if generation.is_cancelled() {
            debug!("discarding first page fetched before reset");
            return LoadOutcome::Stale;
        }
        match result {
            Ok(page) => {
                inner.generation.cancel();
                inner.generation = CancellationToken::new();
                inner.list.apply_first_page(page);
                LoadOutcome::Applied
            }
            Err(e) => {
                debug!(error = %e, "first page fetch failed");
                inner.list.error = Some(e.user_message());
                LoadOutcome::Failed
            }
        }
    }

    /// Fetch the next page and append it.
    ///
    /// A silent no-op when there are no more pages or a load is already in
    /// flight. The in-flight flag is released when the request settles, or
    /// when this future is dropped before it does.
    pub async fn load_more<F, Fut>(&self, fetch: F) -> LoadOutcome
    where
        F: FnOnce(u32) -> Fut,
        Fut: Future<Output = Result<Page<T>>>,
    {
        let (page_index, generation) = {
            let mut inner = self.lock();
            match inner.list.begin_load_more() {
                Some(page_index) => (page_index, inner.generation.clone()),
                None => return LoadOutcome::Skipped,
            }
        };
        let mut guard = InFlight {
            store: self,
            generation,
            armed: true,
        };

        debug!(page = page_index, "loading more");
        let result = fetch(page_index).await;

        guard.armed = false;
        let mut inner = self.lock();
        if guard.generation.is_cancelled() {
            debug!(page = page_index, "discarding page fetched before reset");
            inner.list.is_loading_more = false;
            return LoadOutcome::Stale;
        }
        if inner.list.finish_load_more(page_index, result) {
            LoadOutcome::Applied
        } else {
            LoadOutcome::Failed
        }
    }

    /// Reset to the initial empty state and invalidate in-flight requests.
    ///
    /// A `load_more` still in flight keeps `is_loading_more` set until it
    /// settles; its response is then discarded.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.generation.cancel();
        inner.generation = CancellationToken::new();
        let in_flight = inner.list.is_loading_more;
        inner.list = PagedList::default();
        inner.list.is_loading_more = in_flight;
    }

    /// Record an error that did not come from a page fetch.
    pub fn set_error(&self, error: &BuddyError) {
        self.lock().list.error = Some(error.user_message());
    }

    pub fn has_more(&self) -> bool {
        self.lock().list.has_more
    }

    pub fn is_loading_more(&self) -> bool {
        self.lock().list.is_loading_more
    }

    pub fn current_page(&self) -> u32 {
        self.lock().list.current_page
    }

    pub fn error(&self) -> Option<String> {
        self.lock().list.error.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().list.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().list.items.is_empty()
    }
}

impl<T: Clone> PaginatedStore<T> {
    pub fn items(&self) -> Vec<T> {
        self.lock().list.items.clone()
    }

    /// Copy of the full state, flags included.
    pub fn state(&self) -> PagedList<T> {
        self.lock().list.clone()
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        self.lock().list.snapshot()
    }
}

/// Releases the in-flight flag if a `load_more` future is dropped mid-request.
///
/// Only one `load_more` can hold the slot, so releasing it is correct even
/// after a reset.
struct InFlight<'a, T> {
    store: &'a PaginatedStore<T>,
    generation: CancellationToken,
    armed: bool,
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            self.store.lock().list.is_loading_more = false;
        }
    }
}
