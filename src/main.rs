//! render-deploy - Entry Point
//!
//! Triggers a deploy of a Render service and optionally waits for it to go
//! live. Runs as a single step inside a CI pipeline; the process exit status
//! is the failure signal.

use std::collections::HashMap;
use std::env;
use std::process;

use render_deploy::config::Config;
use render_deploy::deploy::controller::DeployController;
use render_deploy::http::client::ApiClient;
use render_deploy::logs::{init_logging, LogOptions};

use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut inputs: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            inputs.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            inputs.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    if inputs.contains_key("version") {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return;
    }

    // Resolve the run configuration
    let config = match Config::resolve(&inputs) {
        Ok(config) => config,
        Err(e) => {
            let _ = init_logging(LogOptions::default());
            error!("{}", e);
            process::exit(1);
        }
    };

    // Initialize logging
    let log_options = LogOptions {
        log_level: config.log_level.clone(),
        ..Default::default()
    };
    if let Err(e) = init_logging(log_options) {
        println!("Failed to initialize logging: {e}");
    }

    let client = match ApiClient::new(&config.api_url, &config.api_key) {
        Ok(client) => client,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let controller = DeployController::new(client, config);
    let result = controller
        .run(tokio::time::sleep, Box::pin(await_shutdown_signal()))
        .await;

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for Ctrl+C");
        info!("Ctrl+C received, shutting down...");
    }
}
