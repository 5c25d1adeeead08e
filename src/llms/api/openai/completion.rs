use crate::llms::completion::{ChatRequest, CompletionError};
use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct OpenAiCompletionRequest {
    /// ID of the model to use.
    pub model: String,
    /// The system instruction followed by the user prompt.
    pub messages: Vec<CompletionRequestMessage>,
}

impl OpenAiCompletionRequest {
    pub fn new(req: &ChatRequest) -> crate::Result<Self, CompletionError> {
        if req.model.trim().is_empty() {
            return Err(CompletionError::RequestBuilderError(
                "model id is empty".to_string(),
            ));
        }
        Ok(Self {
            model: req.model.clone(),
            messages: vec![
                CompletionRequestMessage {
                    role: "system".to_string(),
                    content: req.system.clone(),
                },
                CompletionRequestMessage {
                    role: "user".to_string(),
                    content: req.user.clone(),
                },
            ],
        })
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CompletionRequestMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OpenAiCompletionResponse {
    /// A unique identifier for the chat completion.
    #[serde(default)]
    pub id: Option<String>,
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<CompletionUsage>,
}

impl OpenAiCompletionResponse {
    /// Content of the first choice.
    pub fn into_content(self) -> crate::Result<String, CompletionError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(CompletionError::ResponseContentEmpty)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChatChoice {
    #[serde(default)]
    pub index: u32,
    pub message: ChatCompletionResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChatCompletionResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    /// `null` when the model refused or only produced tool calls.
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CompletionUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
