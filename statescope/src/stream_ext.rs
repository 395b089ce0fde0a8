use crate::AsyncState;
use futures_core::stream::Stream;
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Extension trait for streams of [`AsyncState`] snapshots, as produced by a
/// container's `to_stream()`.
pub trait StateStreamExt<T: Clone>: Stream<Item = AsyncState<T>> {
    /// Yield states through the first settled one (success or error), then
    /// end. Lets a caller drive a state stream only as long as an operation
    /// is still in flight.
    fn until_settled(self) -> UntilSettled<Self>
    where
        Self: Sized,
    {
        UntilSettled {
            stream: self,
            done: false,
        }
    }
}

impl<T: Clone, S: ?Sized> StateStreamExt<T> for S where S: Stream<Item = AsyncState<T>> {}

/// Stream returned by [`StateStreamExt::until_settled`]. The settled state
/// itself is still yielded; everything after it is cut off.
#[pin_project(project = UntilSettledProj)]
#[derive(Debug)]
#[must_use = "Streams do nothing unless polled"]
pub struct UntilSettled<S> {
    #[pin]
    stream: S,
    done: bool,
}

impl<T, S> Stream for UntilSettled<S>
where
    T: Clone,
    S: Stream<Item = AsyncState<T>>,
{
    type Item = AsyncState<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let UntilSettledProj { stream, done } = self.project();

        if *done {
            return Poll::Ready(None);
        }

        match stream.poll_next(cx) {
            Poll::Ready(Some(state)) => {
                if state.is_settled() {
                    *done = true;
                }
                Poll::Ready(Some(state))
            }
            Poll::Ready(None) => {
                *done = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
