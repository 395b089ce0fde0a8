use crate::AsyncState;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Type-erased snapshot of one member state, as fed to [`combine`]. Members
/// of an aggregate usually hold different data types; the data survives as
/// `Arc<dyn Any>` and is recovered typed through [`CombinedView::data_of`].
#[derive(Clone)]
pub struct ErasedState {
    data: Option<Arc<dyn Any + Send + Sync>>,
    loading: bool,
    error: Option<String>,
}

impl ErasedState {
    fn is_idle(&self) -> bool {
        !self.loading && self.error.is_none() && self.data.is_none()
    }

    fn is_error(&self) -> bool {
        !self.loading && self.error.is_some()
    }

    fn is_success(&self) -> bool {
        !self.loading && self.error.is_none() && self.data.is_some()
    }
}

impl<T: Clone + Send + Sync + 'static> AsyncState<T> {
    /// Erase the data type for aggregation.
    pub fn erased(&self) -> ErasedState {
        ErasedState {
            data: self
                .data
                .clone()
                .map(|value| Arc::new(value) as Arc<dyn Any + Send + Sync>),
            loading: self.loading,
            error: self.error.clone(),
        }
    }
}

/// Aggregate view over N member states: `loading`/`is_loading`/`is_error`
/// are any-member, `is_idle`/`is_success` are all-member, `error` joins the
/// non-null messages with `"; "` in member order, and `data` keeps each
/// member's raw data under its name.
pub struct CombinedView {
    pub loading: bool,
    pub error: Option<String>,
    pub is_idle: bool,
    pub is_loading: bool,
    pub is_error: bool,
    pub is_success: bool,
    data: HashMap<String, Option<Arc<dyn Any + Send + Sync>>>,
}

impl CombinedView {
    /// Typed access to one member's data.
    pub fn data_of<T: Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
        self.data
            .get(name)?
            .clone()?
            .downcast::<T>()
            .ok()
    }

    pub fn has_data(&self, name: &str) -> bool {
        self.data.get(name).is_some_and(|data| data.is_some())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for CombinedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedView")
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("is_idle", &self.is_idle)
            .field("is_loading", &self.is_loading)
            .field("is_error", &self.is_error)
            .field("is_success", &self.is_success)
            .field("members", &self.data.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Pure, stateless merge of named member states; recomputed fresh from
/// whatever snapshot is passed in. No subscription, no memoization.
pub fn combine<'a, I>(members: I) -> CombinedView
where
    I: IntoIterator<Item = (&'a str, ErasedState)>,
{
    let mut loading = false;
    let mut is_idle = true;
    let mut is_error = false;
    let mut is_success = true;
    let mut messages: Vec<String> = Vec::new();
    let mut data = HashMap::new();

    for (name, state) in members {
        loading |= state.loading;
        is_idle &= state.is_idle();
        is_error |= state.is_error();
        is_success &= state.is_success();
        if let Some(message) = &state.error {
            messages.push(message.clone());
        }
        data.insert(name.to_string(), state.data);
    }

    let error = if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    };

    CombinedView {
        loading,
        error,
        is_idle,
        is_loading: loading,
        is_error,
        is_success,
        data,
    }
}
