mod common;

use common::ScriptedOp;
use statescope::{CacheStore, CachedContainer};
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test]
async fn test_fresh_entry_serves_without_refetching() {
    let cached: CachedContainer<String> =
        CachedContainer::new("users", Duration::from_millis(200));
    let op = ScriptedOp::sequence(vec![Ok("one".to_string()), Ok("two".to_string())]);

    let first = cached.fetch_with_cache(|| op.invoke()).await;
    let second = cached.fetch_with_cache(|| op.invoke()).await;

    assert_eq!(first, Some("one".to_string()));
    assert_eq!(second, Some("one".to_string()));
    assert_eq!(op.calls(), 1);
}

#[tokio::test]
async fn test_expired_entry_refetches_newer_value() {
    let cached: CachedContainer<String> = CachedContainer::new("users", Duration::from_millis(40));
    let op = ScriptedOp::sequence(vec![Ok("one".to_string()), Ok("two".to_string())]);

    cached.fetch_with_cache(|| op.invoke()).await;
    cached.fetch_with_cache(|| op.invoke()).await;
    assert_eq!(op.calls(), 1);

    sleep(Duration::from_millis(60)).await;
    let third = cached.fetch_with_cache(|| op.invoke()).await;

    assert_eq!(third, Some("two".to_string()));
    assert_eq!(op.calls(), 2);
}

#[tokio::test]
async fn test_cache_hit_bypasses_execute_entirely() {
    let cached: CachedContainer<u32> = CachedContainer::new("count", Duration::from_millis(200));
    let op = ScriptedOp::always(7);

    cached.fetch_with_cache(|| op.invoke()).await;
    // Poke the container into an error state; a hit must not touch it.
    cached.container().set_error("unrelated");

    let hit = cached.fetch_with_cache(|| op.invoke()).await;

    assert_eq!(hit, Some(7));
    assert_eq!(op.calls(), 1);
    assert_eq!(cached.state().error_ref(), Some("unrelated"));
}

#[tokio::test]
async fn test_failure_is_not_cached() {
    let cached: CachedContainer<u32> = CachedContainer::new("count", Duration::from_millis(200));
    let op = ScriptedOp::sequence(vec![Err("offline".to_string()), Ok(3)]);

    let first = cached.fetch_with_cache(|| op.invoke()).await;
    assert_eq!(first, None);
    assert!(!cached.is_cache_valid());
    assert!(cached.state().is_error());

    let second = cached.fetch_with_cache(|| op.invoke()).await;
    assert_eq!(second, Some(3));
    assert_eq!(op.calls(), 2);
}

#[tokio::test]
async fn test_invalidate_cache_forces_refetch() {
    let cached: CachedContainer<String> =
        CachedContainer::new("users", Duration::from_millis(500));
    let op = ScriptedOp::sequence(vec![Ok("one".to_string()), Ok("two".to_string())]);

    cached.fetch_with_cache(|| op.invoke()).await;
    assert!(cached.is_cache_valid());

    cached.invalidate_cache();
    assert!(!cached.is_cache_valid());

    let refetched = cached.fetch_with_cache(|| op.invoke()).await;
    assert_eq!(refetched, Some("two".to_string()));
    assert_eq!(op.calls(), 2);
}

#[tokio::test]
async fn test_is_cache_valid_tracks_ttl() {
    let cached: CachedContainer<u32> = CachedContainer::new("count", Duration::from_millis(40));
    let op = ScriptedOp::always(1);

    assert!(!cached.is_cache_valid());
    cached.fetch_with_cache(|| op.invoke()).await;
    assert!(cached.is_cache_valid());

    sleep(Duration::from_millis(60)).await;
    assert!(!cached.is_cache_valid());
}

#[tokio::test]
async fn test_shared_store_is_an_explicit_opt_in() {
    let store: CacheStore<u32> = CacheStore::new();
    let first = CachedContainer::with_store("a", Duration::from_millis(500), store.clone());
    let second = CachedContainer::with_store("b", Duration::from_millis(500), store.clone());
    let op_a = ScriptedOp::always(1);
    let op_b = ScriptedOp::always(2);

    first.fetch_with_cache(|| op_a.invoke()).await;
    second.fetch_with_cache(|| op_b.invoke()).await;
    assert_eq!(store.len(), 2);

    // Clearing through one instance empties the shared store for both.
    first.clear_all_cache();
    assert!(store.is_empty());
    assert!(!first.is_cache_valid());
    assert!(!second.is_cache_valid());

    second.fetch_with_cache(|| op_b.invoke()).await;
    assert_eq!(op_b.calls(), 2);
}

#[tokio::test]
async fn test_private_stores_do_not_leak_across_instances() {
    let first: CachedContainer<u32> = CachedContainer::new("same-key", Duration::from_millis(500));
    let second: CachedContainer<u32> = CachedContainer::new("same-key", Duration::from_millis(500));
    let op = ScriptedOp::sequence(vec![Ok(1), Ok(2)]);

    first.fetch_with_cache(|| op.invoke()).await;
    // Same key, different instance: still a miss.
    let other = second.fetch_with_cache(|| op.invoke()).await;

    assert_eq!(other, Some(2));
    assert_eq!(op.calls(), 2);
}
