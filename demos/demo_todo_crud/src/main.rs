use crate::tracing_setup::tracing_init;
use futures_signals::signal::SignalExt;
use statescope::{CrudContainer, Identify};
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

mod tracing_setup;

#[derive(Clone, Debug)]
struct Todo {
    id: u64,
    text: String,
    completed: bool,
}

impl Identify for Todo {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

fn todo(id: u64, text: &str, completed: bool) -> Todo {
    Todo {
        id,
        text: text.to_string(),
        completed,
    }
}

async fn api_fetch_todos() -> Result<Vec<Todo>, String> {
    sleep(Duration::from_millis(300)).await;
    Ok(vec![
        todo(1, "Read the Rust book", false),
        todo(2, "Play a game", true),
    ])
}

async fn api_create_todo(id: u64, text: &str) -> Result<Todo, String> {
    sleep(Duration::from_millis(200)).await;
    Ok(todo(id, text, false))
}

async fn api_complete_todo(item: Todo) -> Result<Todo, String> {
    sleep(Duration::from_millis(200)).await;
    Ok(Todo {
        completed: true,
        ..item
    })
}

async fn api_delete_todo(_id: u64) -> Result<(), String> {
    sleep(Duration::from_millis(200)).await;
    Ok(())
}

fn show(label: &str, todos: &CrudContainer<Todo>) {
    let state = todos.state();
    let items = state.data.as_deref().unwrap_or(&[]);
    info!("--- {label} ---");
    for item in items {
        let mark = if item.completed { "x" } else { " " };
        info!("[{mark}] #{} {}", item.id, item.text);
    }
}

#[tokio::main]
async fn main() {
    tracing_init();

    let todos: CrudContainer<Todo> = CrudContainer::new();

    let watcher = tokio::spawn(todos.to_signal().for_each(|state| {
        info!(
            loading = state.loading,
            error = state.error.as_deref().unwrap_or("-"),
            items = state.data.as_ref().map_or(0, Vec::len),
            "state changed"
        );
        async {}
    }));

    todos.fetch_all(api_fetch_todos).await;
    show("after fetch", &todos);

    todos.create(|| api_create_todo(3, "Write a demo")).await;
    show("after create", &todos);

    let first = todos
        .state()
        .data
        .and_then(|items| items.first().cloned());
    if let Some(first) = first {
        let id = first.id();
        todos.update(id, move || api_complete_todo(first.clone())).await;
    }
    show("after update", &todos);

    todos.remove(2, || api_delete_todo(2)).await;
    show("after remove", &todos);

    sleep(Duration::from_millis(100)).await;
    todos.dispose();
    watcher.abort();
    info!("Finish");
}
