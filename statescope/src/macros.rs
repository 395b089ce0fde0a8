/// Combine named container states into a [`CombinedView`](crate::CombinedView).
///
/// ```
/// use statescope::{combine_states, AsyncState};
///
/// let users = AsyncState::success(vec!["ada".to_string()]);
/// let posts: AsyncState<u32> = AsyncState::loading(None);
///
/// let view = combine_states!(users: users, posts: posts);
/// assert!(view.loading);
/// assert!(!view.is_success);
/// ```
#[macro_export]
macro_rules! combine_states {
    ($($name:ident : $state:expr),+ $(,)?) => {
        $crate::combine([
            $((stringify!($name), $state.erased())),+
        ])
    };
}
