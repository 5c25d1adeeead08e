use super::{
    parser::{ReplyParser, TemplateReplyParser},
    prompt::{build_screening_prompt, SYSTEM_PROMPT},
    record::{ArticleRecord, Classification},
};
use crate::llms::{ChatRequest, CompletionBackend, CompletionError};
use std::sync::Arc;

/// Classifies one article at a time through a [`CompletionBackend`].
pub struct Screener<B: CompletionBackend, P: ReplyParser = TemplateReplyParser> {
    backend: Arc<B>,
    parser: P,
}

impl<B: CompletionBackend> Screener<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            parser: TemplateReplyParser,
        }
    }
}

impl<B: CompletionBackend, P: ReplyParser> Screener<B, P> {
    pub fn with_parser<Q: ReplyParser>(self, parser: Q) -> Screener<B, Q> {
        Screener {
            backend: self.backend,
            parser,
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn request_for(&self, record: &ArticleRecord) -> ChatRequest {
        ChatRequest::new(
            self.backend.model_id(),
            SYSTEM_PROMPT,
            build_screening_prompt(record),
        )
    }

    /// One backend call per record. Backend failures are returned; a reply that
    /// does not follow the template degrades to [`Classification::not_formatted`].
    pub async fn classify(&self, record: &ArticleRecord) -> Result<Classification, CompletionError> {
        let request = self.request_for(record);
        let reply = self.backend.complete(&request).await?;
        let classification = self.parser.parse(&reply);
        if classification.is_formatted() {
            crate::debug!(title = %record.title, has_abstract = record.has_abstract(), %classification, "classified");
        } else {
            crate::warn!(
                title = %record.title,
                has_abstract = record.has_abstract(),
                reply = %reply,
                "reply did not follow the answer template"
            );
        }
        Ok(classification)
    }
}
