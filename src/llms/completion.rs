use std::future::Future;

/// One system + user exchange sent to a chat completion backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatRequest {
    pub model: String,
    pub system: String,
    pub user: String,
}

impl ChatRequest {
    pub fn new<M, S, U>(model: M, system: S, user: U) -> Self
    where
        M: Into<String>,
        S: Into<String>,
        U: Into<String>,
    {
        Self {
            model: model.into(),
            system: system.into(),
            user: user.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("RequestBuilderError: {0}")]
    RequestBuilderError(String),
    #[error("ClientError: {0}")]
    ClientError(#[from] crate::llms::api::error::ClientError),
    #[error("ResponseContentEmpty: Response had no content")]
    ResponseContentEmpty,
}

/// A text-in, text-out chat completion service.
///
/// Calls are made once per request: implementations do not retry, back off, or time out.
pub trait CompletionBackend: Send + Sync {
    /// Model identifier placed on every [`ChatRequest`] built for this backend.
    fn model_id(&self) -> &str;

    /// Returns the assistant's reply text.
    fn complete(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;
}
