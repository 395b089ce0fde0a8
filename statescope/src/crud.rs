use crate::{AsyncState, AsyncStateContainer, IntoOutcome, StateValue};
use futures_signals::signal::{MutableSignalCloned, SignalStream};
use std::future::Future;

/// Identity seam for list elements. `update` and `remove` match on it.
pub trait Identify {
    type Id: PartialEq + Clone + Send + Sync + 'static;

    fn id(&self) -> Self::Id;
}

/// List-shaped convenience over one container holding an ordered `Vec<T>`.
///
/// Every operation runs the full execute lifecycle of the underlying
/// container; the list mutation happens strictly after the operation
/// resolves, inside the same state transaction. Concurrent calls race
/// last-write-wins exactly like overlapping executes.
pub struct CrudContainer<T: StateValue + Identify> {
    inner: AsyncStateContainer<Vec<T>>,
}

impl<T: StateValue + Identify> Clone for CrudContainer<T> {
    fn clone(&self) -> Self {
        CrudContainer {
            inner: self.inner.clone(),
        }
    }
}

impl<T: StateValue + Identify> Default for CrudContainer<T> {
    fn default() -> Self {
        CrudContainer::new()
    }
}

impl<T: StateValue + Identify> CrudContainer<T> {
    pub fn new() -> Self {
        CrudContainer {
            inner: AsyncStateContainer::new(),
        }
    }

    /// Wrap a pre-configured container (retry policy, callbacks, scope).
    pub fn over(inner: AsyncStateContainer<Vec<T>>) -> Self {
        CrudContainer { inner }
    }

    pub fn container(&self) -> &AsyncStateContainer<Vec<T>> {
        &self.inner
    }

    pub fn state(&self) -> AsyncState<Vec<T>> {
        self.inner.state()
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

    /// Execute a creation; on success the created element is prepended.
    pub async fn create<Op, Fut, R>(&self, op: Op) -> Option<T>
    where
        Op: Fn() -> Fut,
        Fut: Future<Output = R>,
        R: IntoOutcome<T>,
    {
        self.inner
            .execute_with(op, |current, created: T| {
                let current = current.unwrap_or_default();
                let mut items = Vec::with_capacity(current.len() + 1);
                items.push(created);
                items.extend(current);
                Some(items)
            })
            .await
    }

    /// Execute an update; on success the first element whose id matches is
    /// replaced in place. No match is a silent no-op.
    pub async fn update<Op, Fut, R>(&self, id: T::Id, op: Op) -> Option<T>
    where
        Op: Fn() -> Fut,
        Fut: Future<Output = R>,
        R: IntoOutcome<T>,
    {
        self.inner
            .execute_with(op, move |current, updated: T| {
                let mut items = current.unwrap_or_default();
                if let Some(slot) = items.iter_mut().find(|item| item.id() == id) {
                    *slot = updated;
                }
                Some(items)
            })
            .await
    }

    /// Execute a deletion (which yields no value); the element is filtered
    /// out locally only when the execute left no error. Returns whether the
    /// deletion succeeded.
    pub async fn remove<Op, Fut, R>(&self, id: T::Id, op: Op) -> bool
    where
        Op: Fn() -> Fut,
        Fut: Future<Output = R>,
        R: IntoOutcome<()>,
    {
        self.inner
            .execute_with(op, move |current, _: ()| {
                current.map(|mut items| {
                    items.retain(|item| item.id() != id);
                    items
                })
            })
            .await
            .is_some()
    }

    /// Fetch the whole list; delegates directly to execute.
    pub async fn fetch_all<Op, Fut, R>(&self, op: Op) -> Option<Vec<T>>
    where
        Op: Fn() -> Fut,
        Fut: Future<Output = R>,
        R: IntoOutcome<Vec<T>>,
    {
        self.inner.execute(op).await
    }
}
