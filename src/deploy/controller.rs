//! Deploy controller: trigger, resolve, wait

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::info;

use crate::config::Config;
use crate::deploy::outcome::DeployOutcome;
use crate::errors::DeployError;
use crate::http::client::ApiClient;
use crate::models::deploy::Deploy;

/// Wait-loop options
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Interval between status fetches
    pub interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
        }
    }
}

/// Drives one deploy cycle against the Render API
pub struct DeployController {
    client: ApiClient,
    config: Config,
    wait: WaitOptions,
}

impl DeployController {
    /// Create a controller with the default wait options
    pub fn new(client: ApiClient, config: Config) -> Self {
        Self {
            client,
            config,
            wait: WaitOptions::default(),
        }
    }

    /// Override the wait options
    pub fn with_wait_options(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Run one trigger-and-optionally-wait cycle
    pub async fn run<S, F>(
        &self,
        sleep_fn: S,
        shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
    ) -> Result<(), DeployError>
    where
        S: Fn(Duration) -> F,
        F: Future<Output = ()>,
    {
        let deploy = self.trigger().await?;

        if self.config.wait_for_success {
            self.wait_for_live(&deploy, sleep_fn, shutdown_signal)
                .await?;
        }

        Ok(())
    }

    /// Trigger a deploy.
    ///
    /// The trigger response must carry a deploy ID before polling can start;
    /// when the API answers with an empty body or an ID-less object, the
    /// deploy was queued anyway and the list endpoint is consulted instead.
    pub async fn trigger(&self) -> Result<Deploy, DeployError> {
        let created = self.client.create_deploy(&self.config.service_id).await?;

        let deploy = match created {
            Some(deploy) if !deploy.id.is_empty() => deploy,
            _ => self.client.latest_deploy(&self.config.service_id).await?,
        };

        info!("Deploy triggered for {}", deploy.source_description());
        info!("Status: {}", deploy.status);
        Ok(deploy)
    }

    /// Poll the deploy until it reaches a terminal state.
    ///
    /// One fetch is in flight at a time; each iteration suspends on
    /// `sleep_fn` first, raced against the shutdown signal. The loop has no
    /// iteration cap; the CI job timeout is the backstop.
    pub async fn wait_for_live<S, F>(
        &self,
        deploy: &Deploy,
        sleep_fn: S,
        mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
    ) -> Result<(), DeployError>
    where
        S: Fn(Duration) -> F,
        F: Future<Output = ()>,
    {
        info!("Waiting for deploy to succeed");

        let mut previous = deploy.status.clone();
        loop {
            tokio::select! {
                _ = &mut shutdown_signal => {
                    info!("Shutdown requested, abandoning deploy wait");
                    return Err(DeployError::Interrupted);
                }
                _ = sleep_fn(self.wait.interval) => {
                    // Continue with the status fetch
                }
            }

            let status = self
                .client
                .get_deploy(&self.config.service_id, &deploy.id)
                .await?
                .status;

            if status != previous {
                info!("Deploy status changed: {}", status);
                previous = status.clone();
            }

            let outcome = DeployOutcome::from_status(&status);
            if outcome.is_terminal() {
                if outcome.is_success() {
                    info!("Deploy finished successfully");
                    return Ok(());
                }
                return Err(DeployError::TerminalStatus(status));
            }
        }
    }
}
