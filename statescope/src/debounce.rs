use crate::{AsyncState, AsyncStateContainer, IntoOutcome, ScopeToken, StateValue};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;

/// Settlement of one debounce window. `None` while the window is open.
type Settlement<T> = Option<Option<T>>;

/// One open debounce window: the single pending timer plus the settlement
/// channel every coalesced caller waits on. A superseding call replaces the
/// timer but keeps the channel, so all callers in the window observe the one
/// result.
struct Window<T> {
    generation: u64,
    timer: ScopeToken,
    tx: Arc<watch::Sender<Settlement<T>>>,
}

/// Trailing-edge debounce over one container's execute.
///
/// Each call (re)starts the wrapper's single timer; only the call whose timer
/// actually fires runs its operation, and every caller whose call fell within
/// the window resolves with that one result. Tearing the scope down before
/// the timer fires cancels the timer and settles all waiting callers with
/// `None`: silent cancellation, not an error.
pub struct DebouncedContainer<T: StateValue> {
    inner: AsyncStateContainer<T>,
    delay: Duration,
    window: Arc<Mutex<Option<Window<T>>>>,
    generation: Arc<AtomicU64>,
}

impl<T: StateValue> Clone for DebouncedContainer<T> {
    fn clone(&self) -> Self {
        DebouncedContainer {
            inner: self.inner.clone(),
            delay: self.delay,
            window: self.window.clone(),
            generation: self.generation.clone(),
        }
    }
}

impl<T: StateValue> DebouncedContainer<T> {
    pub fn new(delay: Duration) -> Self {
        Self::over(AsyncStateContainer::new(), delay)
    }

    /// Wrap a pre-configured container (retry policy, callbacks, scope).
    pub fn over(inner: AsyncStateContainer<T>, delay: Duration) -> Self {
        DebouncedContainer {
            inner,
            delay,
            window: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn container(&self) -> &AsyncStateContainer<T> {
        &self.inner
    }

    pub fn state(&self) -> AsyncState<T> {
        self.inner.state()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn dispose(&self) {
        self.inner.dispose();
    }

    /// Schedule `op` behind the shared timer and wait for the window to
    /// settle. The operation of the last call in the window is the one that
    /// runs; earlier callers share its result.
    pub async fn call<Op, Fut, R>(&self, op: Op) -> Option<T>
    where
        Op: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoOutcome<T> + Send + 'static,
    {
        let scope = self.inner.scope().clone();
        if !scope.is_live() {
            return None;
        }

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let timer = ScopeToken::new();
        let mut rx = {
            let mut slot = self.window.lock().unwrap();
            match slot.as_mut() {
                Some(window) => {
                    // Supersede the pending timer; the window and its
                    // waiters carry over.
                    window.timer.release();
                    window.timer = timer.clone();
                    window.generation = generation;
                    window.tx.subscribe()
                }
                None => {
                    let (tx, rx) = watch::channel(None);
                    *slot = Some(Window {
                        generation,
                        timer: timer.clone(),
                        tx: Arc::new(tx),
                    });
                    rx
                }
            }
        };
        tracing::trace!(generation, "debounce timer armed");

        let wrapper = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = timer.cancelled() => {
                    tracing::trace!(generation, "debounce timer superseded");
                }
                _ = scope.cancelled() => {
                    let mut slot = wrapper.window.lock().unwrap();
                    if slot.as_ref().map(|window| window.generation) == Some(generation) {
                        // Dropping the sender settles every waiter with None.
                        *slot = None;
                        tracing::trace!(generation, "debounce window cancelled at teardown");
                    }
                }
                _ = sleep(wrapper.delay) => {
                    let tx = {
                        let mut slot = wrapper.window.lock().unwrap();
                        match slot.take() {
                            Some(window) if window.generation == generation => window.tx,
                            other => {
                                *slot = other;
                                return;
                            }
                        }
                    };
                    tracing::trace!(generation, "debounce window fired");
                    let result = wrapper.inner.execute(op).await;
                    let _ = tx.send(Some(result));
                }
            }
        });

        let settled = match rx.wait_for(|settlement| settlement.is_some()).await {
            Ok(settlement) => (*settlement).clone().flatten(),
            Err(_) => None,
        };
        settled
    }
}
