pub const GPT_4O_MINI: &str = "gpt-4o-mini";
pub const GPT_4O: &str = "gpt-4o";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiLlmModel {
    pub model_id: String,
}

impl ApiLlmModel {
    pub fn new<S: Into<String>>(model_id: S) -> Self {
        Self {
            model_id: model_id.into(),
        }
    }

    pub fn gpt_4_o_mini() -> Self {
        Self::new(GPT_4O_MINI)
    }

    pub fn gpt_4_o() -> Self {
        Self::new(GPT_4O)
    }
}

impl Default for ApiLlmModel {
    fn default() -> Self {
        Self::gpt_4_o_mini()
    }
}

pub trait OpenAiModelTrait {
    fn model(&mut self) -> &mut ApiLlmModel;

    /// Set the model using the model_id string.
    fn model_id<S: Into<String>>(mut self, model_id: S) -> Self
    where
        Self: Sized,
    {
        *self.model() = ApiLlmModel::new(model_id);
        self
    }

    fn gpt_4_o_mini(mut self) -> Self
    where
        Self: Sized,
    {
        *self.model() = ApiLlmModel::gpt_4_o_mini();
        self
    }

    fn gpt_4_o(mut self) -> Self
    where
        Self: Sized,
    {
        *self.model() = ApiLlmModel::gpt_4_o();
        self
    }
}
