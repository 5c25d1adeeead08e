mod runner;

#[allow(unused_imports)]
use anyhow::{anyhow, bail, Error, Result};
use sr_automator::prelude::*;
use std::{
    future::Future,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use tokio::sync::Semaphore;

pub const INCLUDE_REPLY: &str =
    "Reason for exclusion: {None}\nFinal decision: {Include}\nReason for decision: None";
pub const ANIMAL_REPLY: &str =
    "Reason for exclusion: {1}\nFinal decision: {Exclude}\nReason for decision: We fed 30 rats a high-fat diet.";

/// Writes a table with the required header and one row per `[title, author, year, abstract]`.
pub fn write_articles(dir: &Path, name: &str, rows: &[[&str; 4]]) -> PathBuf {
    let path = dir.join(name);
    let mut writer = csv::Writer::from_path(&path).unwrap();
    writer
        .write_record(["title", "author", "year", "abstract"])
        .unwrap();
    for row in rows {
        writer.write_record(row).unwrap();
    }
    writer.flush().unwrap();
    path
}

pub fn numbered_articles(n: usize) -> Vec<[String; 4]> {
    (1..=n)
        .map(|i| {
            [
                format!("Article {i}"),
                "Kim J".to_string(),
                "2021".to_string(),
                format!("Abstract of article {i}."),
            ]
        })
        .collect()
}

pub fn write_numbered(dir: &Path, name: &str, n: usize) -> PathBuf {
    let rows = numbered_articles(n);
    let rows: Vec<[&str; 4]> = rows
        .iter()
        .map(|r| [r[0].as_str(), r[1].as_str(), r[2].as_str(), r[3].as_str()])
        .collect();
    write_articles(dir, name, &rows)
}

pub fn read_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

/// Replies with whatever the closure returns for each request.
pub struct FnBackend<F> {
    reply: F,
    calls: AtomicUsize,
}

impl<F> FnBackend<F>
where
    F: Fn(&ChatRequest) -> Result<String, CompletionError> + Send + Sync,
{
    pub fn new(reply: F) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<F> CompletionBackend for FnBackend<F>
where
    F: Fn(&ChatRequest) -> Result<String, CompletionError> + Send + Sync,
{
    fn model_id(&self) -> &str {
        "fake-model"
    }

    fn complete(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = (self.reply)(request);
        async move { reply }
    }
}

/// Holds every request until a permit is added to `gate`.
pub struct GatedBackend {
    pub gate: Arc<Semaphore>,
    pub started: AtomicUsize,
}

impl GatedBackend {
    pub fn closed() -> Arc<Self> {
        Arc::new(Self {
            gate: Arc::new(Semaphore::new(0)),
            started: AtomicUsize::new(0),
        })
    }

    pub fn open(&self, permits: usize) {
        self.gate.add_permits(permits);
    }
}

impl CompletionBackend for GatedBackend {
    fn model_id(&self) -> &str {
        "gated-model"
    }

    fn complete(
        &self,
        _request: &ChatRequest,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send {
        self.started.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.clone();
        async move {
            gate.acquire()
                .await
                .map_err(|e| CompletionError::RequestBuilderError(e.to_string()))?
                .forget();
            Ok(INCLUDE_REPLY.to_string())
        }
    }
}

/// Drains progress events, then waits for the outcome.
pub async fn finish(mut handle: RunHandle) -> (Vec<u8>, RunOutcome) {
    let mut progress = Vec::new();
    while let Some(percent) = handle.next_progress().await {
        progress.push(percent);
    }
    (progress, handle.outcome().await)
}
