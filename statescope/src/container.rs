use crate::{AsyncState, IntoOutcome, OpError, RetryPolicy, ScopeToken, StateValue};
use futures_signals::signal::{Mutable, MutableSignalCloned, SignalExt, SignalStream};
use std::future::Future;
use std::sync::Arc;
use tokio::time::sleep;

type Hook = Arc<dyn Fn() + Send + Sync>;
type SuccessHook<T> = Arc<dyn Fn(&T) + Send + Sync>;
type ErrorHook = Arc<dyn Fn(&OpError) + Send + Sync>;

/// Lifecycle callbacks fired around `execute`. The only way to observe
/// success or failure synchronously with the attempt; everything else reads
/// the state afterwards.
pub struct Callbacks<T> {
    pub(crate) on_start: Option<Hook>,
    pub(crate) on_success: Option<SuccessHook<T>>,
    pub(crate) on_error: Option<ErrorHook>,
    pub(crate) on_finish: Option<Hook>,
}

impl<T> Default for Callbacks<T> {
    fn default() -> Self {
        Callbacks {
            on_start: None,
            on_success: None,
            on_error: None,
            on_finish: None,
        }
    }
}

impl<T> Clone for Callbacks<T> {
    fn clone(&self) -> Self {
        Callbacks {
            on_start: self.on_start.clone(),
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
            on_finish: self.on_finish.clone(),
        }
    }
}

/// State machine and retrying executor for one asynchronous operation.
///
/// Clones are shallow handles: they share the state cell, the scope token and
/// the configuration. Overlapping `execute` calls on one container run
/// unserialized; whichever settles last writes the final visible state.
pub struct AsyncStateContainer<T: StateValue> {
    state: Mutable<AsyncState<T>>,
    scope: ScopeToken,
    retry: RetryPolicy,
    reset_on_execute: bool,
    callbacks: Callbacks<T>,
}

impl<T: StateValue> Clone for AsyncStateContainer<T> {
    fn clone(&self) -> Self {
        AsyncStateContainer {
            state: self.state.clone(),
            scope: self.scope.clone(),
            retry: self.retry,
            reset_on_execute: self.reset_on_execute,
            callbacks: self.callbacks.clone(),
        }
    }
}

impl<T: StateValue> Default for AsyncStateContainer<T> {
    fn default() -> Self {
        AsyncStateContainer::new()
    }
}

impl<T: StateValue> AsyncStateContainer<T> {
    pub fn new() -> Self {
        Self::with_state(AsyncState::idle())
    }

    /// Start in the success phase with `value` already present.
    pub fn with_initial(value: T) -> Self {
        Self::with_state(AsyncState::success(value))
    }

    fn with_state(initial: AsyncState<T>) -> Self {
        AsyncStateContainer {
            state: Mutable::new(initial),
            scope: ScopeToken::new(),
            retry: RetryPolicy::none(),
            reset_on_execute: false,
            callbacks: Callbacks::default(),
        }
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Clear data as well as error before each execution, instead of keeping
    /// stale data visible while the next attempt loads.
    pub fn reset_on_execute(mut self) -> Self {
        self.reset_on_execute = true;
        self
    }

    /// Bind the container to an externally owned scope instead of its own.
    pub fn bind_scope(mut self, scope: &ScopeToken) -> Self {
        self.scope = scope.clone();
        self
    }

    pub fn on_start(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.callbacks.on_start = Some(Arc::new(hook));
        self
    }

    pub fn on_success(mut self, hook: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.callbacks.on_success = Some(Arc::new(hook));
        self
    }

    pub fn on_error(mut self, hook: impl Fn(&OpError) + Send + Sync + 'static) -> Self {
        self.callbacks.on_error = Some(Arc::new(hook));
        self
    }

    pub fn on_finish(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.callbacks.on_finish = Some(Arc::new(hook));
        self
    }

    pub fn scope(&self) -> &ScopeToken {
        &self.scope
    }

    /// Tear down the owning scope. Further mutations are no-ops; in-flight
    /// operations run to completion with their effects discarded.
    pub fn dispose(&self) {
        self.scope.release();
    }

    pub fn state(&self) -> AsyncState<T> {
        self.state.get_cloned()
    }

    pub fn to_signal(&self) -> MutableSignalCloned<AsyncState<T>> {
        self.state.signal_cloned()
    }

    pub fn to_stream(&self) -> SignalStream<MutableSignalCloned<AsyncState<T>>> {
        self.state.signal_cloned().to_stream()
    }

    /// Every mutation funnels through here; a released scope turns it into a
    /// no-op.
    fn apply(&self, mutate: impl FnOnce(&mut AsyncState<T>)) {
        if !self.scope.is_live() {
            tracing::trace!("state mutation after scope release ignored");
            return;
        }
        let mut state = self.state.lock_mut();
        mutate(&mut state);
    }

    pub fn set_data(&self, value: T) {
        self.apply(|state| state.finish_success(Some(value)));
    }

    pub fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.apply(|state| state.finish_failure(message));
    }

    pub fn set_loading(&self, loading: bool) {
        self.apply(|state| state.loading = loading);
    }

    pub fn reset(&self) {
        self.apply(|state| *state = AsyncState::idle());
    }

    /// Run `op` through the loading/retry/terminal lifecycle.
    ///
    /// Never returns an error: a terminal failure lands in the state's
    /// `error` field and resolves `None`. Overlapping calls race
    /// last-write-wins by design.
    pub async fn execute<Op, Fut, R>(&self, op: Op) -> Option<T>
    where
        Op: Fn() -> Fut,
        Fut: Future<Output = R>,
        R: IntoOutcome<T>,
    {
        self.execute_with(op, |_, value| Some(value)).await
    }

    /// Lifecycle core shared with the wrappers. `fold` merges the successful
    /// value into the previous data in the same state transaction that clears
    /// loading, so list-shaped wrappers mutate strictly after the operation
    /// resolves.
    pub(crate) async fn execute_with<Op, Fut, R, U, A>(&self, op: Op, fold: A) -> Option<U>
    where
        Op: Fn() -> Fut,
        Fut: Future<Output = R>,
        R: IntoOutcome<U>,
        U: Clone,
        A: FnOnce(Option<T>, U) -> Option<T>,
    {
        let clear_data = self.reset_on_execute;
        self.apply(|state| state.begin(clear_data));
        if let Some(hook) = &self.callbacks.on_start {
            hook();
        }
        tracing::trace!("execute started");

        let mut attempt: u32 = 0;
        loop {
            match op().await.into_outcome() {
                Ok(value) => {
                    let mut folded: Option<T> = None;
                    self.apply(|state| {
                        let next = fold(state.data.take(), value.clone());
                        folded = next.clone();
                        state.finish_success(next);
                    });
                    if let Some(hook) = &self.callbacks.on_success {
                        if let Some(data) = &folded {
                            hook(data);
                        }
                    }
                    if let Some(hook) = &self.callbacks.on_finish {
                        hook();
                    }
                    return Some(value);
                }
                Err(error) => {
                    if attempt < self.retry.max_attempts {
                        attempt += 1;
                        tracing::debug!(
                            attempt,
                            max_attempts = self.retry.max_attempts,
                            %error,
                            "attempt failed, retrying"
                        );
                        tokio::select! {
                            biased;
                            // Teardown clears the retry timer; nothing more fires.
                            _ = self.scope.cancelled() => return None,
                            _ = sleep(self.retry.delay) => {}
                        }
                    } else {
                        tracing::debug!(%error, "execute failed");
                        let message = error.to_string();
                        self.apply(|state| state.finish_failure(message));
                        if let Some(hook) = &self.callbacks.on_error {
                            hook(&error);
                        }
                        if let Some(hook) = &self.callbacks.on_finish {
                            hook();
                        }
                        return None;
                    }
                }
            }
        }
    }
}
