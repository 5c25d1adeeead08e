//! Screens candidate articles for a systematic literature review.
//!
//! Each row of a CSV table (`title`, `author`, `year`, `abstract`) is sent to
//! an LLM completion backend with a fixed set of exclusion criteria. The reply
//! is parsed into an exclusion criterion, an include/exclude decision and the
//! supporting evidence, and the three values are appended to the table as new
//! columns in a `<name>_result.csv` file next to the input.
//!
//! ```no_run
//! use sr_automator::prelude::*;
//!
//! # async fn run() -> sr_automator::Result<()> {
//! let runner = ReviewRunner::new();
//! let request = ScreeningRequest::new("sk-...", "articles.csv");
//! let mut handle = runner.start(request)?;
//! while let Some(percent) = handle.next_progress().await {
//!     println!("{percent}%");
//! }
//! println!("{}", handle.outcome().await);
//! # Ok(())
//! # }
//! ```
#[allow(unused_imports)]
pub(crate) use anyhow::{anyhow, bail, Context};
pub use anyhow::{Error, Result};
#[allow(unused_imports)]
pub(crate) use tracing::{debug, error, info, trace, warn};

pub mod llms;
pub mod logging;
pub mod prelude;
pub mod runner;
pub mod screening;
pub mod shell;
pub mod table;

pub struct SrAutomator {}

impl SrAutomator {
    /// Creates a new [`llms::OpenAiBackendBuilder`]. Set the credential with
    /// [`llms::LlmApiConfigTrait::with_api_key`] and convert it into a backend with `init`.
    pub fn openai() -> llms::OpenAiBackendBuilder {
        llms::OpenAiBackendBuilder::default()
    }

    pub fn runner() -> runner::ReviewRunner {
        runner::ReviewRunner::new()
    }
}
