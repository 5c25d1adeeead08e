use super::{
    config::ApiConfigTrait,
    error::{map_deserialization_error, map_serialization_error, ClientError, WrappedError},
};
use serde::{de::DeserializeOwned, Serialize};

#[derive(Debug, Clone)]
pub(crate) struct ApiClient<C: ApiConfigTrait> {
    http_client: reqwest::Client,
    pub config: C,
}

impl<C: ApiConfigTrait> ApiClient<C> {
    pub fn new(config: C) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            config,
        }
    }

    /// Make a POST request to {path} and deserialize the response body.
    ///
    /// The request is sent exactly once.
    pub(crate) async fn post<I, O>(&self, path: &str, request: I) -> Result<O, ClientError>
    where
        I: Serialize + std::fmt::Debug,
        O: DeserializeOwned,
    {
        let serialized_request =
            serde_json::to_string(&request).map_err(map_serialization_error)?;
        crate::trace!("Serialized request: {}", serialized_request);

        let request = self
            .http_client
            .post(self.config.url(path))
            .headers(self.config.headers())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(serialized_request)
            .build()?;

        let response = self.http_client.execute(request).await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        // Deserialize response body from either error object or actual response object
        if !status.is_success() {
            return Err(match serde_json::from_slice::<WrappedError>(bytes.as_ref()) {
                Ok(wrapped_error) => {
                    crate::warn!(
                        status = status.as_u16(),
                        "api error: {}",
                        wrapped_error.error
                    );
                    ClientError::ApiError(wrapped_error.error)
                }
                Err(_) => ClientError::UnexpectedStatus {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(bytes.as_ref()).into_owned(),
                },
            });
        }

        // Deserialize once into a generic Value
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| map_deserialization_error(e, &bytes))?;

        // Log the pretty-printed JSON
        let pretty_json = serde_json::to_string_pretty(&value).map_err(map_serialization_error)?;
        crate::trace!("Serialized response: {}", pretty_json);

        // Convert the Value into the target type
        let response: O =
            serde_json::from_value(value).map_err(|e| map_deserialization_error(e, &bytes))?;

        Ok(response)
    }
}
