use crate::tracing_setup::tracing_init;
use futures::StreamExt;
use statescope::{CachedContainer, DebouncedContainer, StateStreamExt};
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

mod tracing_setup;

async fn api_search(query: String) -> Result<Vec<String>, String> {
    info!(%query, "network search");
    sleep(Duration::from_millis(120)).await;
    Ok(vec![
        format!("{query} tutorial"),
        format!("{query} by example"),
    ])
}

async fn api_load_profile(user: u64) -> Result<String, String> {
    info!(user, "network profile load");
    sleep(Duration::from_millis(120)).await;
    Ok(format!("profile of user #{user}"))
}

#[tokio::main]
async fn main() {
    tracing_init();

    // A typing burst: four keystrokes, one network search.
    let search: DebouncedContainer<Vec<String>> =
        DebouncedContainer::new(Duration::from_millis(250));

    let transitions = {
        let mut stream = search.container().to_stream().until_settled();
        tokio::spawn(async move {
            while let Some(state) = stream.next().await {
                info!(
                    loading = state.loading,
                    hits = state.data.as_ref().map_or(0, Vec::len),
                    "search state"
                );
            }
        })
    };

    let mut callers = Vec::new();
    for query in ["r", "ru", "rus", "rust"] {
        let search = search.clone();
        let query = query.to_string();
        callers.push(tokio::spawn(async move {
            let hits = search
                .call(move || api_search(query.clone()))
                .await;
            hits
        }));
        sleep(Duration::from_millis(60)).await;
    }

    for caller in callers {
        let hits = caller.await.expect("caller task");
        info!(?hits, "caller settled");
    }
    transitions.await.expect("transition watcher");

    // The same profile twice within the TTL costs one network round trip.
    let profile: CachedContainer<String> =
        CachedContainer::new("profile:42", Duration::from_secs(5));

    let first = profile.fetch_with_cache(|| api_load_profile(42)).await;
    info!(?first, "first load");
    let second = profile.fetch_with_cache(|| api_load_profile(42)).await;
    info!(?second, "second load (cached)");

    profile.dispose();
    search.dispose();
    info!("Finish");
}
