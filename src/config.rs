//! Run configuration resolved from explicit inputs and the environment

use std::collections::HashMap;
use std::env;

use crate::errors::DeployError;
use crate::logs::LogLevel;

/// Default base URL of the Render API
pub const DEFAULT_API_URL: &str = "https://api.render.com";

/// Immutable configuration for a single deploy run
///
/// Resolved once at startup and passed by reference; nothing mutates it
/// afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Identifier of the service to deploy
    pub service_id: String,

    /// Render API key, sent as a bearer credential
    pub api_key: String,

    /// Base URL of the Render API
    pub api_url: String,

    /// Whether to poll the deploy until it reaches a terminal state
    pub wait_for_success: bool,

    /// Log level for the run
    pub log_level: LogLevel,
}

impl Config {
    /// Resolve the configuration, preferring explicit inputs over
    /// environment variables
    pub fn resolve(inputs: &HashMap<String, String>) -> Result<Self, DeployError> {
        let service_id = required(inputs, "service-id", "SERVICEID")?;
        let api_key = required(inputs, "api-key", "APIKEY")?;
        let api_url = lookup(inputs, "api-url", "RENDER_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        // Any non-empty value enables waiting, including "false"
        let wait_for_success = lookup(inputs, "wait-for-success", "WAIT_FOR_SUCCESS").is_some();

        let log_level = match lookup(inputs, "log-level", "LOG_LEVEL") {
            Some(value) => value.parse().map_err(DeployError::Config)?,
            None => LogLevel::default(),
        };

        Ok(Self {
            service_id,
            api_key,
            api_url,
            wait_for_success,
            log_level,
        })
    }
}

/// First non-empty value out of the explicit input and the environment
/// variable of the same semantic name
fn lookup(inputs: &HashMap<String, String>, input: &str, env_var: &str) -> Option<String> {
    if let Some(value) = inputs.get(input) {
        if !value.is_empty() {
            return Some(value.clone());
        }
    }

    env::var(env_var).ok().filter(|value| !value.is_empty())
}

fn required(
    inputs: &HashMap<String, String>,
    input: &str,
    env_var: &str,
) -> Result<String, DeployError> {
    lookup(inputs, input, env_var)
        .ok_or_else(|| DeployError::MissingInput(format!("{} (or {})", input, env_var)))
}
