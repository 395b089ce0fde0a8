use statescope::{combine, combine_states, AsyncStateContainer};

#[tokio::test]
async fn test_loading_member_dominates_the_aggregate() {
    let users: AsyncStateContainer<Vec<String>> = AsyncStateContainer::new();
    let posts: AsyncStateContainer<u32> = AsyncStateContainer::new();

    users.set_data(vec!["ada".to_string()]);
    posts.set_loading(true);

    let view = combine_states!(first: users.state(), second: posts.state());

    assert!(view.loading);
    assert!(view.is_loading);
    assert!(!view.is_success);
    assert_eq!(
        view.data_of::<Vec<String>>("first").as_deref(),
        Some(&vec!["ada".to_string()])
    );
    assert!(view.data_of::<u32>("second").is_none());
}

#[tokio::test]
async fn test_error_messages_join_with_semicolons() {
    let first: AsyncStateContainer<u32> = AsyncStateContainer::new();
    let second: AsyncStateContainer<u32> = AsyncStateContainer::new();

    first.set_error("Error 1");
    second.set_error("Error 2");

    let view = combine_states!(first: first.state(), second: second.state());

    assert_eq!(view.error.as_deref(), Some("Error 1; Error 2"));
    assert!(view.is_error);
    assert!(!view.is_success);
}

#[tokio::test]
async fn test_success_requires_every_member() {
    let first: AsyncStateContainer<u32> = AsyncStateContainer::new();
    let second: AsyncStateContainer<String> = AsyncStateContainer::new();

    first.set_data(1);
    second.set_data("done".to_string());

    let view = combine_states!(first: first.state(), second: second.state());

    assert!(view.is_success);
    assert!(view.error.is_none());
    assert_eq!(view.data_of::<u32>("first").as_deref(), Some(&1));
    assert_eq!(
        view.data_of::<String>("second").as_deref(),
        Some(&"done".to_string())
    );
}

#[tokio::test]
async fn test_combine_is_a_pure_snapshot() {
    let container: AsyncStateContainer<u32> = AsyncStateContainer::new();
    container.set_data(1);

    let snapshot = container.state();
    let before = combine([("only", snapshot.erased())]);

    // Later mutations do not bleed into an already-computed view.
    container.set_error("changed afterwards");
    assert!(before.is_success);
    assert!(before.error.is_none());

    let after = combine([("only", container.state().erased())]);
    assert!(after.is_error);
}

#[tokio::test]
async fn test_macro_accepts_trailing_comma() {
    let container: AsyncStateContainer<u32> = AsyncStateContainer::new();
    container.set_data(3);

    let view = combine_states!(only: container.state(),);
    assert!(view.is_success);
    assert_eq!(view.len(), 1);
}
