#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use batchgen_core::api::{GenerationService, ParsedTask, QueueHandle, SharedContext};
use tokio::sync::oneshot;

pub fn parsed(id: &str, prompt: &str) -> ParsedTask {
    ParsedTask::new(id.to_string(), format!("Poster {id}"), prompt.to_string())
}

/// Queue whose tasks use the id as prompt, so fakes can key on either.
pub fn queue_of(ids: &[&str]) -> QueueHandle {
    let queue = QueueHandle::new();
    queue.import(ids.iter().map(|id| parsed(id, id)).collect());
    queue
}

/// Yields to the runtime until `cond` holds.
pub async fn wait_until<F: Fn() -> bool>(cond: F) {
    for _ in 0..10_000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

/// Answers immediately: prompts listed in `failures` fail, the rest succeed
/// with `img://{prompt}`.
#[derive(Default)]
pub struct ScriptedGenerator {
    failures: HashMap<String, String>,
    calls: Mutex<Vec<(String, Option<SharedContext>)>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, prompt: &str, message: &str) -> Self {
        self.failures.insert(prompt.to_string(), message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(String, Option<SharedContext>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls().into_iter().map(|(p, _)| p).collect()
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationService for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        prompt: &str,
        shared: Option<&SharedContext>,
    ) -> anyhow::Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), shared.cloned()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.failures.get(prompt) {
            Some(message) => Err(anyhow::anyhow!("{message}")),
            None => Ok(format!("img://{prompt}")),
        }
    }
}

/// Every call waits until the test releases its prompt's gate.
#[derive(Default)]
pub struct GatedGenerator {
    gates: Mutex<HashMap<String, oneshot::Receiver<Result<String, String>>>>,
}

impl GatedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gate(&self, prompt: &str) -> oneshot::Sender<Result<String, String>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(prompt.to_string(), rx);
        tx
    }
}

#[async_trait]
impl GenerationService for GatedGenerator {
    fn name(&self) -> &str {
        "gated"
    }

    async fn generate(
        &self,
        prompt: &str,
        _shared: Option<&SharedContext>,
    ) -> anyhow::Result<String> {
        let rx = self
            .gates
            .lock()
            .unwrap()
            .remove(prompt)
            .ok_or_else(|| anyhow::anyhow!("no gate for {prompt}"))?;

        match rx.await {
            Ok(Ok(url)) => Ok(url),
            Ok(Err(message)) => Err(anyhow::anyhow!("{message}")),
            Err(_) => Err(anyhow::anyhow!("gate dropped")),
        }
    }
}
