//! Deploy API client

use reqwest::StatusCode;
use tracing::error;

use crate::errors::{body_excerpt, DeployError};
use crate::http::client::ApiClient;
use crate::models::deploy::{Deploy, DeployListEntry};

impl ApiClient {
    /// Trigger a new deploy for a service.
    ///
    /// Returns `None` when the API accepted the request but queued the deploy
    /// without returning a body.
    pub async fn create_deploy(&self, service_id: &str) -> Result<Option<Deploy>, DeployError> {
        let path = format!("/v1/services/{}/deploys", service_id);
        let (status, body) = self.post_raw(&path).await?;

        if status == StatusCode::UNAUTHORIZED {
            error!("Deploy trigger rejected: {}", status);
            return Err(DeployError::Unauthorized);
        }

        if !status.is_success() {
            error!("Deploy trigger failed: {} - {}", status, body);
            return Err(DeployError::TriggerFailed {
                status,
                body: body_excerpt(&body),
            });
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        let deploy = Self::parse_json(status, &body)?;
        Ok(Some(deploy))
    }

    /// Fetch the most recent deploy for a service
    pub async fn latest_deploy(&self, service_id: &str) -> Result<Deploy, DeployError> {
        let path = format!("/v1/services/{}/deploys?limit=1", service_id);
        let (status, body) = self.get_raw(&path).await?;

        if !status.is_success() {
            error!("Deploy lookup failed: {} - {}", status, body);
            return Err(DeployError::FetchFailed {
                status,
                body: body_excerpt(&body),
            });
        }

        let mut entries: Vec<DeployListEntry> = Self::parse_json(status, &body)?;
        if entries.is_empty() {
            return Err(DeployError::NoDeploys);
        }

        Ok(entries.remove(0).deploy)
    }

    /// Fetch a single deploy by ID
    pub async fn get_deploy(
        &self,
        service_id: &str,
        deploy_id: &str,
    ) -> Result<Deploy, DeployError> {
        let path = format!("/v1/services/{}/deploys/{}", service_id, deploy_id);
        let (status, body) = self.get_raw(&path).await?;

        if !status.is_success() {
            error!("Deploy status fetch failed: {} - {}", status, body);
            return Err(DeployError::FetchFailed {
                status,
                body: body_excerpt(&body),
            });
        }

        Self::parse_json(status, &body)
    }
}
