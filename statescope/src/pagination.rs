use crate::{AsyncState, AsyncStateContainer, IntoOutcome, StateValue};
use futures_signals::signal::{Mutable, MutableSignal, MutableSignalCloned, SignalStream};
use std::future::Future;

/// One page-fetch response: the items plus the bookkeeping derived from it.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
    pub total: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, has_more: bool) -> Self {
        Page {
            items,
            has_more,
            total: None,
        }
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }
}

/// Page/has_more/total bookkeeping beside the accumulated list.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaginationState {
    pub page: u64,
    pub has_more: bool,
    pub total: u64,
}

impl Default for PaginationState {
    fn default() -> Self {
        PaginationState {
            page: 1,
            has_more: true,
            total: 0,
        }
    }
}

/// Paginated accumulation over an ordered-list container.
///
/// Each `fetch_page` invokes the page-fetch function exactly once; the single
/// response supplies both the new list and the metadata, applied in one state
/// transaction.
pub struct PaginatedContainer<T: StateValue> {
    inner: AsyncStateContainer<Vec<T>>,
    pagination: Mutable<PaginationState>,
}

impl<T: StateValue> Clone for PaginatedContainer<T> {
    fn clone(&self) -> Self {
        PaginatedContainer {
            inner: self.inner.clone(),
            pagination: self.pagination.clone(),
        }
    }
}

impl<T: StateValue> Default for PaginatedContainer<T> {
    fn default() -> Self {
        PaginatedContainer::new()
    }
}

impl<T: StateValue> PaginatedContainer<T> {
    pub fn new() -> Self {
        Self::over(AsyncStateContainer::new())
    }

    /// Wrap a pre-configured container (retry policy, callbacks, scope).
    pub fn over(inner: AsyncStateContainer<Vec<T>>) -> Self {
        PaginatedContainer {
            inner,
            pagination: Mutable::new(PaginationState::default()),
        }
    }

    pub fn container(&self) -> &AsyncStateContainer<Vec<T>> {
        &self.inner
    }

    pub fn state(&self) -> AsyncState<Vec<T>> {
        self.inner.state()
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination.get()
    }

    pub fn pagination_signal(&self) -> MutableSignal<PaginationState> {
        self.pagination.signal()
    }

    pub fn to_signal(&self) -> MutableSignalCloned<AsyncState<Vec<T>>> {
        self.inner.to_signal()
    }

    pub fn to_stream(&self) -> SignalStream<MutableSignalCloned<AsyncState<Vec<T>>>> {
        self.inner.to_stream()
    }

    pub fn dispose(&self) {
        self.inner.dispose();
    }

    /// Fetch one page. `append` concatenates onto the current list, otherwise
    /// the list is replaced. `has_more`, `total` (when provided) and `page`
    /// all come from the same response object as the items.
    pub async fn fetch_page<Op, Fut, R>(&self, fetch: Op, page: u64, append: bool) -> Option<Page<T>>
    where
        Op: Fn(u64) -> Fut,
        Fut: Future<Output = R>,
        R: IntoOutcome<Page<T>>,
    {
        let pagination = self.pagination.clone();
        self.inner
            .execute_with(
                || fetch(page),
                move |current, response: Page<T>| {
                    {
                        let mut meta = pagination.lock_mut();
                        meta.page = page;
                        meta.has_more = response.has_more;
                        if let Some(total) = response.total {
                            meta.total = total;
                        }
                    }
                    let mut items = if append {
                        current.unwrap_or_default()
                    } else {
                        Vec::new()
                    };
                    items.extend(response.items);
                    Some(items)
                },
            )
            .await
    }

    /// Fetch the next page and append it. No-op when there is nothing more
    /// to load or a fetch is already in flight.
    pub async fn load_more<Op, Fut, R>(&self, fetch: Op) -> Option<Page<T>>
    where
        Op: Fn(u64) -> Fut,
        Fut: Future<Output = R>,
        R: IntoOutcome<Page<T>>,
    {
        let meta = self.pagination.get();
        if !meta.has_more {
            tracing::trace!("load_more skipped, no further pages");
            return None;
        }
        if self.inner.state().is_loading() {
            tracing::trace!("load_more skipped, fetch in flight");
            return None;
        }
        self.fetch_page(fetch, meta.page + 1, true).await
    }

    /// Start over: page 1, `has_more` true, list replaced.
    pub async fn refresh<Op, Fut, R>(&self, fetch: Op) -> Option<Page<T>>
    where
        Op: Fn(u64) -> Fut,
        Fut: Future<Output = R>,
        R: IntoOutcome<Page<T>>,
    {
        if self.inner.scope().is_live() {
            let mut meta = self.pagination.lock_mut();
            meta.page = 1;
            meta.has_more = true;
        }
        self.fetch_page(fetch, 1, false).await
    }
}
