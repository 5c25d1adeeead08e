pub use crate::{
    llms::{
        ChatRequest,
        CompletionBackend,
        CompletionError,
        LlmApiConfigTrait,
        OpenAiBackend,
        OpenAiBackendBuilder,
        OpenAiModelTrait,
    },
    logging::{LoggingConfig, LoggingConfigTrait},
    runner::{ReviewRunner, RunError, RunHandle, RunOutcome, ScreeningRequest},
    screening::{
        ArticleRecord,
        Classification,
        ReplyParser,
        Screener,
        ScreeningDecision,
        TemplateReplyParser,
    },
    table::{result_path, ReviewTable, TableError},
    SrAutomator,
};
#[cfg(test)]
pub use serial_test::serial;
