//! Wait-loop integration tests
//!
//! Exercises the polling loop against a mock Render API that serves a
//! scripted status sequence. Sleeps are injected as a recording closure so
//! the tests assert the 10-second cadence without real waiting.

use std::future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use render_deploy::config::Config;
use render_deploy::deploy::controller::{DeployController, WaitOptions};
use render_deploy::errors::DeployError;
use render_deploy::http::client::ApiClient;

const SERVICE_ID: &str = "srv-123";
const API_KEY: &str = "rnd_test_key";

fn controller(server: &MockServer) -> DeployController {
    let client = ApiClient::new(&server.uri(), API_KEY).unwrap();
    let config = Config {
        service_id: SERVICE_ID.to_string(),
        api_key: API_KEY.to_string(),
        api_url: server.uri(),
        wait_for_success: true,
        log_level: Default::default(),
    };
    DeployController::new(client, config)
}

fn deploys_path() -> String {
    format!("/v1/services/{}/deploys", SERVICE_ID)
}

async fn mount_trigger(server: &MockServer, initial_status: &str) {
    Mock::given(method("POST"))
        .and(path(deploys_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "dep-1",
            "status": initial_status,
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// Serves one status per fetch, repeating the last one once exhausted
struct StatusSequence {
    statuses: Vec<&'static str>,
    calls: AtomicUsize,
}

impl StatusSequence {
    fn new(statuses: &[&'static str]) -> Self {
        Self {
            statuses: statuses.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl Respond for StatusSequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let status = self.statuses[call.min(self.statuses.len() - 1)];
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "dep-1",
            "status": status,
        }))
    }
}

/// Sleep stand-in that records every requested interval
fn recording_sleep() -> (
    Arc<Mutex<Vec<Duration>>>,
    impl Fn(Duration) -> future::Ready<()>,
) {
    let sleeps: Arc<Mutex<Vec<Duration>>> = Arc::new(Mutex::new(Vec::new()));
    let recorded = sleeps.clone();
    let sleep_fn = move |interval: Duration| {
        recorded.lock().unwrap().push(interval);
        future::ready(())
    };
    (sleeps, sleep_fn)
}

#[tokio::test]
async fn deploy_goes_live_after_status_changes() {
    let server = MockServer::start().await;
    mount_trigger(&server, "created").await;

    Mock::given(method("GET"))
        .and(path(format!("{}/dep-1", deploys_path())))
        .respond_with(StatusSequence::new(&[
            "created",
            "build_in_progress",
            "live",
        ]))
        .expect(3)
        .mount(&server)
        .await;

    let (sleeps, sleep_fn) = recording_sleep();
    controller(&server)
        .run(sleep_fn, Box::pin(future::pending::<()>()))
        .await
        .unwrap();

    // Three fetches, each preceded by the full 10-second interval
    assert_eq!(*sleeps.lock().unwrap(), vec![Duration::from_secs(10); 3]);
}

#[tokio::test]
async fn custom_wait_interval_is_honored() {
    let server = MockServer::start().await;
    mount_trigger(&server, "created").await;

    Mock::given(method("GET"))
        .and(path(format!("{}/dep-1", deploys_path())))
        .respond_with(StatusSequence::new(&["live"]))
        .expect(1)
        .mount(&server)
        .await;

    let (sleeps, sleep_fn) = recording_sleep();
    controller(&server)
        .with_wait_options(WaitOptions {
            interval: Duration::from_secs(3),
        })
        .run(sleep_fn, Box::pin(future::pending::<()>()))
        .await
        .unwrap();

    assert_eq!(*sleeps.lock().unwrap(), vec![Duration::from_secs(3)]);
}

#[tokio::test]
async fn already_live_deploy_succeeds_on_first_fetch() {
    let server = MockServer::start().await;
    mount_trigger(&server, "live").await;

    Mock::given(method("GET"))
        .and(path(format!("{}/dep-1", deploys_path())))
        .respond_with(StatusSequence::new(&["live"]))
        .expect(1)
        .mount(&server)
        .await;

    let (sleeps, sleep_fn) = recording_sleep();
    controller(&server)
        .run(sleep_fn, Box::pin(future::pending::<()>()))
        .await
        .unwrap();

    assert_eq!(sleeps.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn failed_suffix_status_stops_with_failure() {
    let server = MockServer::start().await;
    mount_trigger(&server, "created").await;

    Mock::given(method("GET"))
        .and(path(format!("{}/dep-1", deploys_path())))
        .respond_with(StatusSequence::new(&["update_failed"]))
        .expect(1)
        .mount(&server)
        .await;

    let (_sleeps, sleep_fn) = recording_sleep();
    let err = controller(&server)
        .run(sleep_fn, Box::pin(future::pending::<()>()))
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::TerminalStatus(_)));
    assert!(err.to_string().contains("update_failed"));
}

#[tokio::test]
async fn canceled_deploy_stops_with_failure() {
    let server = MockServer::start().await;
    mount_trigger(&server, "created").await;

    Mock::given(method("GET"))
        .and(path(format!("{}/dep-1", deploys_path())))
        .respond_with(StatusSequence::new(&["created", "canceled"]))
        .expect(2)
        .mount(&server)
        .await;

    let (_sleeps, sleep_fn) = recording_sleep();
    let err = controller(&server)
        .run(sleep_fn, Box::pin(future::pending::<()>()))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("canceled"));
}

#[tokio::test]
async fn deactivated_deploy_stops_with_failure() {
    let server = MockServer::start().await;
    mount_trigger(&server, "created").await;

    Mock::given(method("GET"))
        .and(path(format!("{}/dep-1", deploys_path())))
        .respond_with(StatusSequence::new(&["deactivated"]))
        .expect(1)
        .mount(&server)
        .await;

    let (_sleeps, sleep_fn) = recording_sleep();
    let err = controller(&server)
        .run(sleep_fn, Box::pin(future::pending::<()>()))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("deactivated"));
}

#[tokio::test]
async fn status_fetch_error_aborts_the_wait() {
    let server = MockServer::start().await;
    mount_trigger(&server, "created").await;

    Mock::given(method("GET"))
        .and(path(format!("{}/dep-1", deploys_path())))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let (_sleeps, sleep_fn) = recording_sleep();
    let err = controller(&server)
        .run(sleep_fn, Box::pin(future::pending::<()>()))
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(matches!(err, DeployError::FetchFailed { .. }));
    assert!(message.contains("HTTP 503"));
    assert!(message.contains("unavailable"));
}

#[tokio::test]
async fn malformed_status_body_aborts_the_wait() {
    let server = MockServer::start().await;
    mount_trigger(&server, "created").await;

    Mock::given(method("GET"))
        .and(path(format!("{}/dep-1", deploys_path())))
        .respond_with(ResponseTemplate::new(200).set_body_string("deploying..."))
        .expect(1)
        .mount(&server)
        .await;

    let (_sleeps, sleep_fn) = recording_sleep();
    let err = controller(&server)
        .run(sleep_fn, Box::pin(future::pending::<()>()))
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::MalformedResponse { .. }));
}

#[tokio::test]
async fn shutdown_signal_interrupts_the_wait() {
    let server = MockServer::start().await;
    mount_trigger(&server, "created").await;

    // No fetch may happen once shutdown is requested
    Mock::given(method("GET"))
        .and(path(format!("{}/dep-1", deploys_path())))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "dep-1",
            "status": "live",
        })))
        .expect(0)
        .mount(&server)
        .await;

    let err = controller(&server)
        .run(
            |_: Duration| future::pending::<()>(),
            Box::pin(future::ready(())),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::Interrupted));
}
