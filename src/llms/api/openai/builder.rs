use super::{
    models::{ApiLlmModel, OpenAiModelTrait},
    OpenAiBackend,
    OpenAiConfig,
};
use crate::{
    llms::api::config::{ApiConfig, LlmApiConfigTrait},
    logging::{LoggingConfig, LoggingConfigTrait},
};

pub struct OpenAiBackendBuilder {
    pub config: OpenAiConfig,
    pub model: ApiLlmModel,
}

impl Default for OpenAiBackendBuilder {
    fn default() -> Self {
        Self {
            config: Default::default(),
            model: ApiLlmModel::gpt_4_o_mini(),
        }
    }
}

impl OpenAiBackendBuilder {
    pub fn init(self) -> crate::Result<std::sync::Arc<OpenAiBackend>> {
        Ok(std::sync::Arc::new(OpenAiBackend::new(
            self.config,
            self.model,
        )?))
    }

    pub fn with_org_id<S: Into<String>>(mut self, org_id: S) -> Self {
        self.config = self.config.with_org_id(org_id);
        self
    }

    pub fn with_project_id<S: Into<String>>(mut self, project_id: S) -> Self {
        self.config = self.config.with_project_id(project_id);
        self
    }
}

impl LlmApiConfigTrait for OpenAiBackendBuilder {
    fn api_base_config_mut(&mut self) -> &mut ApiConfig {
        &mut self.config.api_config
    }

    fn api_config(&self) -> &ApiConfig {
        &self.config.api_config
    }
}

impl OpenAiModelTrait for OpenAiBackendBuilder {
    fn model(&mut self) -> &mut ApiLlmModel {
        &mut self.model
    }
}

impl LoggingConfigTrait for OpenAiBackendBuilder {
    fn logging_config_mut(&mut self) -> &mut LoggingConfig {
        &mut self.config.logging_config
    }
}
