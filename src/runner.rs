//! Runs one screening pass over a table in the background.
//!
//! A [`ReviewRunner`] owns a single run slot. [`ReviewRunner::start`] validates
//! the request, claims the slot and spawns a tokio task that reads the table,
//! classifies every row in order and writes the result file. The returned
//! [`RunHandle`] streams progress percentages, can cancel the run, and resolves
//! to exactly one [`RunOutcome`].

use crate::{
    llms::{CompletionBackend, LlmApiConfigTrait, OpenAiBackendBuilder},
    screening::Screener,
    table::{result_path, ReviewTable},
    Context,
};
use secrecy::{ExposeSecret, Secret};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{
    sync::{mpsc, OwnedSemaphorePermit, Semaphore},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug)]
pub struct ScreeningRequest {
    pub api_key: Secret<String>,
    pub input_path: PathBuf,
}

impl ScreeningRequest {
    pub fn new<K: Into<String>, P: Into<PathBuf>>(api_key: K, input_path: P) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            input_path: input_path.into(),
        }
    }

    /// Rejects a blank credential or an input path that is not an existing file.
    pub fn validate(&self) -> Result<(), RunError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(RunError::Validation("API key is required".to_string()));
        }
        validate_input_path(&self.input_path)
    }
}

fn validate_input_path(input_path: &Path) -> Result<(), RunError> {
    if input_path.as_os_str().is_empty() {
        return Err(RunError::Validation(
            "input file path is required".to_string(),
        ));
    }
    if !input_path.is_file() {
        return Err(RunError::Validation(format!(
            "input file not found: {}",
            input_path.display()
        )));
    }
    Ok(())
}

/// Errors raised by [`ReviewRunner`] before a run starts.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("{0}")]
    Validation(String),
    #[error("a screening run is already in progress")]
    RunInProgress,
    #[error("failed to set up completion backend: {0}")]
    Setup(String),
}

/// Terminal state of a run. Each run produces exactly one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { output_path: PathBuf, rows: usize },
    Failed { message: String },
    Cancelled,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutcome::Completed { output_path, rows } => write!(
                f,
                "Screening complete: {rows} rows written to {}",
                output_path.display()
            ),
            RunOutcome::Failed { message } => write!(f, "Error: {message}"),
            RunOutcome::Cancelled => f.write_str("Screening cancelled"),
        }
    }
}

/// Starts screening runs, at most one at a time.
///
/// Clones share the same run slot.
#[derive(Clone, Debug)]
pub struct ReviewRunner {
    slot: Arc<Semaphore>,
}

impl Default for ReviewRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewRunner {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Semaphore::new(1)),
        }
    }

    /// True while a started run has not yet finished.
    pub fn is_busy(&self) -> bool {
        self.slot.available_permits() == 0
    }

    /// Screens `request.input_path` with the default OpenAI backend.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, request: ScreeningRequest) -> Result<RunHandle, RunError> {
        self.start_openai(request, OpenAiBackendBuilder::default())
    }

    /// Like [`ReviewRunner::start`], with a preconfigured builder for model,
    /// base url or logging. The request's credential overrides any set on the builder.
    pub fn start_openai(
        &self,
        request: ScreeningRequest,
        builder: OpenAiBackendBuilder,
    ) -> Result<RunHandle, RunError> {
        request.validate()?;
        let permit = self.claim()?;
        let backend = builder
            .with_api_key(request.api_key.expose_secret().as_str())
            .init()
            .map_err(|e| RunError::Setup(format!("{e:#}")))?;
        Ok(spawn_run(permit, request.input_path, backend))
    }

    /// Screens `input_path` with any [`CompletionBackend`].
    pub fn start_with_backend<B, P>(&self, input_path: P, backend: Arc<B>) -> Result<RunHandle, RunError>
    where
        B: CompletionBackend + 'static,
        P: Into<PathBuf>,
    {
        let input_path = input_path.into();
        validate_input_path(&input_path)?;
        let permit = self.claim()?;
        Ok(spawn_run(permit, input_path, backend))
    }

    fn claim(&self) -> Result<OwnedSemaphorePermit, RunError> {
        self.slot
            .clone()
            .try_acquire_owned()
            .map_err(|_| RunError::RunInProgress)
    }
}

/// Handle to a run started by [`ReviewRunner`].
///
/// Dropping the handle detaches the run; it still finishes and writes its result.
pub struct RunHandle {
    input_path: PathBuf,
    progress: mpsc::UnboundedReceiver<u8>,
    cancel: CancellationToken,
    task: JoinHandle<RunOutcome>,
}

impl RunHandle {
    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    /// Next progress percentage, in order. `None` once the run has ended.
    pub async fn next_progress(&mut self) -> Option<u8> {
        self.progress.recv().await
    }

    /// Requests cancellation. An in-flight completion request is abandoned and no file is written.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the run to end.
    pub async fn outcome(self) -> RunOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => RunOutcome::Failed {
                message: format!("screening task ended unexpectedly: {e}"),
            },
        }
    }
}

/// Percentage after `completed` of `total` rows, rounded down.
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((completed as u64 * 100) / total as u64).min(100) as u8
}

fn spawn_run<B: CompletionBackend + 'static>(
    permit: OwnedSemaphorePermit,
    input_path: PathBuf,
    backend: Arc<B>,
) -> RunHandle {
    let (progress_tx, progress_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    let worker_cancel = cancel.clone();
    let worker_path = input_path.clone();

    let task = tokio::spawn(async move {
        // Released when the task ends, before the outcome is observable.
        let _permit = permit;
        let screener = Screener::new(backend);
        crate::info!(
            path = %worker_path.display(),
            model = screener.backend().model_id(),
            "screening run started"
        );
        match screen_table(&worker_path, &screener, &progress_tx, &worker_cancel).await {
            Ok(Some((output_path, rows))) => {
                crate::info!(path = %output_path.display(), rows, "screening run completed");
                RunOutcome::Completed { output_path, rows }
            }
            Ok(None) => {
                crate::info!(path = %worker_path.display(), "screening run cancelled");
                RunOutcome::Cancelled
            }
            Err(e) => {
                crate::error!(path = %worker_path.display(), error = %format!("{e:#}"), "screening run failed");
                RunOutcome::Failed {
                    message: format!("{e:#}"),
                }
            }
        }
    });

    RunHandle {
        input_path,
        progress: progress_rx,
        cancel,
        task,
    }
}

/// `Ok(None)` when cancelled.
async fn screen_table<B: CompletionBackend>(
    input_path: &Path,
    screener: &Screener<B>,
    progress: &mpsc::UnboundedSender<u8>,
    cancel: &CancellationToken,
) -> crate::Result<Option<(PathBuf, usize)>> {
    let read_path = input_path.to_path_buf();
    let table = tokio::task::spawn_blocking(move || ReviewTable::read(&read_path))
        .await
        .context("table reader task failed")??;

    let total = table.len();
    let mut classifications = Vec::with_capacity(total);
    for (i, record) in table.records().enumerate() {
        let classification = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(None),
            result = screener.classify(&record) => result
                .with_context(|| format!("row {} of {} ({:?})", i + 1, total, record.title))?,
        };
        classifications.push(classification);
        let percent = progress_percent(i + 1, total);
        crate::trace!(row = i + 1, total, percent, "row screened");
        // The receiver may already be gone.
        let _ = progress.send(percent);
    }

    if cancel.is_cancelled() {
        return Ok(None);
    }

    let output_path = result_path(input_path);
    let write_path = output_path.clone();
    tokio::task::spawn_blocking(move || {
        table.write_with_classifications(&write_path, &classifications)
    })
    .await
    .context("table writer task failed")??;
    Ok(Some((output_path, total)))
}
