//! HTTP client implementation

use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::{body_excerpt, DeployError};

/// HTTP client for Render API communication
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, DeployError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Make a GET request, returning the status and raw body
    pub(crate) async fn get_raw(&self, path: &str) -> Result<(StatusCode, String), DeployError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await?;

        Self::into_parts(response).await
    }

    /// Make a bodyless POST request, returning the status and raw body
    pub(crate) async fn post_raw(&self, path: &str) -> Result<(StatusCode, String), DeployError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await?;

        Self::into_parts(response).await
    }

    async fn into_parts(response: Response) -> Result<(StatusCode, String), DeployError> {
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// Parse a successful response body.
    ///
    /// A non-empty body that fails to parse is a malformed response; callers
    /// decide separately what an empty body means for their endpoint.
    pub(crate) fn parse_json<T: DeserializeOwned>(
        status: StatusCode,
        body: &str,
    ) -> Result<T, DeployError> {
        serde_json::from_str(body).map_err(|_| DeployError::MalformedResponse {
            status,
            body: body_excerpt(body),
        })
    }
}
