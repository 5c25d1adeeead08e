// Public modules
pub mod api;
pub mod completion;

// Public exports
pub use api::{
    openai::{
        builder::OpenAiBackendBuilder,
        models::{ApiLlmModel, OpenAiModelTrait},
        OpenAiBackend,
        OpenAiConfig,
    },
    ApiConfig,
    ApiError,
    ClientError,
    LlmApiConfigTrait,
};
pub use completion::{ChatRequest, CompletionBackend, CompletionError};
