use davpanel::cli::{ImportCertArgs, StartArgs};
use davpanel::commands::{config, server};
use davpanel::error::PanelError;
use davpanel::picker::PromptPicker;
use davpanel::state::AppState;

use control_core::config::PanelSettings;
use control_core::model::Liveness;
use control_core::rpc::http::HttpBackend;

use std::time::Duration;

use serde_json::json;
use tokio::io::BufReader;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Command handlers against a mocked HTTP backend
// ============================================================================

fn app_for(backend: &MockServer) -> AppState<HttpBackend> {
    let mut settings = PanelSettings::default();
    settings.backend.base_url = backend.uri();
    settings.backend.rpc_timeout_secs = 5;
    settings.bootstrap.max_elapsed_secs = 1;
    settings.polling.interval_ms = 100;
    AppState::connect(settings).expect("mock server URI should be valid")
}

async fn mount_get_config(backend: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/get_config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(backend)
        .await;
}

fn no_picker() -> PromptPicker<BufReader<&'static [u8]>> {
    PromptPicker::new(BufReader::new(&b""[..]))
}

#[tokio::test]
async fn given_running_backend_when_status_then_reports_running_with_address() {
    // GIVEN
    let backend = MockServer::start().await;
    mount_get_config(&backend, json!({ "ip": "0.0.0.0", "port": 80 })).await;
    Mock::given(method("POST"))
        .and(path("/check_server_status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("running")))
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    // WHEN
    let report = server::status(&app).await.unwrap();

    // THEN
    assert_eq!(report.liveness, Liveness::Running);
    assert_eq!(report.address, "0.0.0.0:80");
    assert_eq!(report.to_string(), "DAV server running (0.0.0.0:80)");
}

/// **VALUE**: Command line edits land on top of the backend's config before starting.
///
/// **WHY THIS MATTERS**: `davpanel start --port 8080` must not forget the root or
/// address already configured on the backend.
///
/// **BUG THIS CATCHES**: Would catch:
/// - Starting from an empty draft instead of the backend's config
/// - Edits being dropped, or login sent without the password
#[tokio::test]
async fn given_edits_when_start_then_merged_config_pushed_and_running() {
    // GIVEN: Backend has 0.0.0.0:80 serving /srv/old
    let backend = MockServer::start().await;
    mount_get_config(
        &backend,
        json!({ "ip": "0.0.0.0", "port": 80, "root": "/srv/old" }),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/update_config"))
        .and(body_json(json!({
            "ip": "0.0.0.0",
            "port": 8080,
            "root": "/srv/old",
            "auth": ["alice", "secret"]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/start_server"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    let args = StartArgs {
        port: Some(8080),
        user: Some(String::from("alice")),
        password: Some(String::from("secret")),
        ..Default::default()
    };

    // WHEN
    let report = server::start(&app, &args, &no_picker()).await.unwrap();

    // THEN
    assert_eq!(report.liveness, Liveness::Running);
    assert_eq!(report.address, "0.0.0.0:8080");
}

/// **VALUE**: "Port in use" comes back as an error notice and is acknowledged.
///
/// **BUG THIS CATCHES**: Would catch the backend message being lost, or the notice
/// being left queued on the controller after it was shown.
#[tokio::test]
async fn given_port_in_use_when_start_then_error_notice() {
    // GIVEN
    let backend = MockServer::start().await;
    mount_get_config(&backend, json!({ "port": 80 })).await;
    Mock::given(method("POST"))
        .and(path("/update_config"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/start_server"))
        .respond_with(ResponseTemplate::new(500).set_body_string("port in use"))
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    // WHEN
    let result = server::start(&app, &StartArgs::default(), &no_picker()).await;

    // THEN
    match result {
        Err(PanelError::Notice { title, message }) => {
            assert_eq!(title, "Error");
            assert_eq!(message, "port in use");
        }
        other => panic!("expected error notice, got {other:?}"),
    }
    let state = app.controller().state();
    assert_eq!(state.liveness, Liveness::Stopped);
    assert!(state.notice().is_none());
}

/// **VALUE**: An incomplete login pair is refused locally and nothing is sent.
#[tokio::test]
async fn given_password_without_user_when_start_then_warning_and_no_push() {
    // GIVEN
    let backend = MockServer::start().await;
    mount_get_config(&backend, json!({})).await;
    Mock::given(method("POST"))
        .and(path("/update_config"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    let args = StartArgs {
        password: Some(String::from("secret")),
        ..Default::default()
    };

    // WHEN
    let result = server::start(&app, &args, &no_picker()).await;

    // THEN
    assert!(matches!(
        result,
        Err(PanelError::Notice { ref title, ref message })
            if title == "Warning" && message == "User and Password must be set to enable login."
    ));
}

#[tokio::test]
async fn given_pick_root_when_start_then_picked_directory_served() {
    let dir = tempfile::TempDir::new().unwrap();
    let backend = MockServer::start().await;
    mount_get_config(&backend, json!({ "port": 80 })).await;
    Mock::given(method("POST"))
        .and(path("/update_config"))
        .and(body_json(json!({
            "port": 80,
            "root": dir.path().to_string_lossy()
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/start_server"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    let input = format!("{}\n", dir.path().display());
    let picker = PromptPicker::new(BufReader::new(input.as_bytes()));
    let args = StartArgs {
        pick_root: true,
        ..Default::default()
    };

    let report = server::start(&app, &args, &picker).await.unwrap();

    assert_eq!(report.liveness, Liveness::Running);
}

#[tokio::test]
async fn given_running_server_when_stop_then_reports_stopped() {
    let backend = MockServer::start().await;
    mount_get_config(&backend, json!({ "ip": "10.0.0.2", "port": 8080 })).await;
    Mock::given(method("POST"))
        .and(path("/stop_server"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    let report = server::stop(&app).await.unwrap();

    assert_eq!(report.liveness, Liveness::Stopped);
    assert_eq!(report.address, "10.0.0.2:8080");
}

/// **VALUE**: `config` shows who can log in but never the password.
///
/// **BUG THIS CATCHES**: Would catch the report embedding `Config` (and thus the
/// credential pair) directly.
#[tokio::test]
async fn given_login_configured_when_show_config_then_password_hidden() {
    // GIVEN
    let backend = MockServer::start().await;
    mount_get_config(
        &backend,
        json!({ "port": 443, "auth": ["alice", "hunter2"], "enableTls": true }),
    )
    .await;
    let app = app_for(&backend);

    // WHEN
    let report = config::show(&app).await.unwrap();

    // THEN
    assert_eq!(report.login.as_deref(), Some("alice"));
    assert!(report.tls);
    assert_eq!(report.address, "*:443");
    let rendered = format!("{report}\n{}", serde_json::to_string(&report).unwrap());
    assert!(!rendered.contains("hunter2"));
}

#[tokio::test]
async fn given_no_paths_when_import_cert_then_warning_and_nothing_sent() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/import_tls_or_cert_from_path"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    let result = config::import_cert(
        &app,
        &ImportCertArgs {
            cert: None,
            key: None,
        },
    )
    .await;

    assert!(matches!(
        result,
        Err(PanelError::Notice { ref title, .. }) if title == "Warning"
    ));
}

#[tokio::test]
async fn given_cert_path_when_import_cert_then_sent() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/import_tls_or_cert_from_path"))
        .and(body_json(json!({ "certPath": "/tls/cert.pem" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    let report = config::import_cert(
        &app,
        &ImportCertArgs {
            cert: Some(String::from("/tls/cert.pem")),
            key: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(report.cert_path.as_deref(), Some("/tls/cert.pem"));
    assert!(report.key_path.is_none());
}

/// **VALUE**: `watch` reports the current state right away and stops on shutdown.
///
/// **BUG THIS CATCHES**: Would catch the first report waiting for a change that may
/// never come, or the poller outliving the command.
#[tokio::test]
async fn given_running_backend_when_watch_then_reports_and_stops_on_shutdown() {
    // GIVEN
    let backend = MockServer::start().await;
    mount_get_config(&backend, json!({ "port": 80 })).await;
    Mock::given(method("POST"))
        .and(path("/check_server_status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("running")))
        .mount(&backend)
        .await;
    let app = app_for(&backend);
    let mut seen = Vec::new();

    // WHEN: Watching for a short while
    server::watch(
        &app,
        tokio::time::sleep(Duration::from_millis(300)),
        |state, config| seen.push((state.liveness, config.display_address())),
    )
    .await
    .unwrap();

    // THEN
    assert_eq!(
        seen.first(),
        Some(&(Liveness::Running, String::from("*:80")))
    );
}
