use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, Secret};

#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Scheme, host and version prefix, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub api_key: Option<Secret<String>>,
    pub api_key_env_var: String,
}

impl ApiConfig {
    /// Resolves the credential: the explicitly set key wins, otherwise `api_key_env_var`
    /// is read through `.env`/the process environment. The environment is never written.
    pub(crate) fn load_api_key(&self) -> crate::Result<Secret<String>> {
        if let Some(api_key) = self.api_key.as_ref() {
            crate::trace!("Using api_key from parameter");
            if api_key.expose_secret().trim().is_empty() {
                crate::bail!("api_key was set but is empty")
            }
            return Ok(api_key.to_owned());
        }
        crate::trace!("api_key not set. Attempting to load from .env");
        dotenvy::dotenv().ok();

        match dotenvy::var(&self.api_key_env_var) {
            Ok(api_key) if !api_key.trim().is_empty() => {
                crate::trace!("Successfully loaded api_key from .env");
                Ok(Secret::new(api_key))
            }
            _ => {
                crate::trace!(
                    "{} not found in dotenv, nor was it set manually",
                    self.api_key_env_var
                );
                crate::bail!(
                    "Failed to load api_key from parameter or {}",
                    self.api_key_env_var
                )
            }
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

pub trait LlmApiConfigTrait {
    fn api_base_config_mut(&mut self) -> &mut ApiConfig;

    fn api_config(&self) -> &ApiConfig;

    /// Point the backend at a different server, e.g. an OpenAI-compatible proxy.
    fn with_base_url<S: AsRef<str>>(mut self, base_url: S) -> Self
    where
        Self: Sized,
    {
        self.api_base_config_mut().base_url = base_url.as_ref().to_string();
        self
    }

    fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self
    where
        Self: Sized,
    {
        self.api_base_config_mut().api_key = Some(Secret::new(api_key.into()));
        self
    }

    /// Set the environment variable name for the API key. Default is set from the backend.
    fn with_api_key_env_var<S: Into<String>>(mut self, api_key_env_var: S) -> Self
    where
        Self: Sized,
    {
        self.api_base_config_mut().api_key_env_var = api_key_env_var.into();
        self
    }
}

pub(crate) trait ApiConfigTrait {
    fn headers(&self) -> HeaderMap;

    fn url(&self, path: &str) -> String;

    fn api_key(&self) -> &Option<Secret<String>>;
}
