#![allow(dead_code)]

use statescope::Identify;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

/// Operation with preset outcomes: pops through the script and sticks on the
/// last entry, counting every invocation. Clones share the script.
pub struct ScriptedOp<T> {
    script: Arc<Mutex<VecDeque<Result<T, String>>>>,
    calls: Arc<Mutex<u32>>,
    delay: Option<Duration>,
}

impl<T> Clone for ScriptedOp<T> {
    fn clone(&self) -> Self {
        ScriptedOp {
            script: self.script.clone(),
            calls: self.calls.clone(),
            delay: self.delay,
        }
    }
}

impl<T: Clone> ScriptedOp<T> {
    pub fn sequence(outcomes: Vec<Result<T, String>>) -> Self {
        ScriptedOp {
            script: Arc::new(Mutex::new(outcomes.into())),
            calls: Arc::new(Mutex::new(0)),
            delay: None,
        }
    }

    pub fn always(value: T) -> Self {
        Self::sequence(vec![Ok(value)])
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }

    pub async fn invoke(&self) -> Result<T, String> {
        *self.calls.lock().unwrap() += 1;
        if let Some(delay) = self.delay {
            sleep(delay).await;
        }
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script
                .front()
                .cloned()
                .unwrap_or_else(|| Err("script exhausted".to_string()))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestItem {
    pub id: u64,
    pub name: String,
}

impl Identify for TestItem {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

pub fn item(id: u64, name: &str) -> TestItem {
    TestItem {
        id,
        name: name.to_string(),
    }
}
