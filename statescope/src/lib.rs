mod async_state;
mod cache;
mod combine;
mod container;
mod crud;
mod debounce;
mod execution;
mod pagination;
mod scope;
mod stream_ext;
pub mod macros;

pub use async_state::*;
pub use cache::*;
pub use combine::*;
pub use container::*;
pub use crud::*;
pub use debounce::*;
pub use execution::*;
pub use pagination::*;
pub use scope::*;
pub use stream_ext::*;

/// Marker for values a container can hold. Blanket-implemented; containers
/// move snapshots across tasks, hence the bounds.
pub trait StateValue: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> StateValue for T {}
