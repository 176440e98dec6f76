use control_core::bootstrap::load_initial_config;
use control_core::controller::ServerController;
use control_core::error::RpcError;
use control_core::model::{CertConfig, Config, Credentials, Liveness};
use control_core::rpc::BackendRpc;
use control_core::rpc::http::HttpBackend;
use control_core::store::ConfigStore;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Each call is a POST to `{base}/{call_name}` with a camelCase JSON body.
///
/// **WHY THIS MATTERS**: This is the backend contract. A renamed path or a
/// snake_case key is silently ignored by the backend, which then starts with
/// stale settings.
///
/// **BUG THIS CATCHES**: Would catch:
/// - Base URLs without a trailing slash swallowing the last path segment
/// - `enableTls` serialized as `enable_tls`
/// - The password missing from the `auth` pair
/// - Missing request id header
#[tokio::test]
async fn given_config_when_update_config_then_posts_camel_case_body() {
    // GIVEN: A backend expecting the exact body
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/update_config"))
        .and(header_exists("x-request-id"))
        .and(body_json(json!({
            "ip": "0.0.0.0",
            "port": 443,
            "auth": ["alice", "secret"],
            "enableTls": true
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri()).unwrap();
    let config = Config {
        ip: Some(String::from("0.0.0.0")),
        port: Some(443),
        auth: Some(Credentials::new("alice", "secret").unwrap()),
        enable_tls: Some(true),
        ..Default::default()
    };

    // WHEN / THEN
    backend.update_config(&config).await.unwrap();
}

#[tokio::test]
async fn given_base_url_with_path_when_calling_then_path_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rpc/stop_server"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&format!("{}/rpc", server.uri())).unwrap();

    assert!(backend.base_url().path().ends_with("/rpc/"));
    backend.stop_server().await.unwrap();
}

#[tokio::test]
async fn given_backend_answers_when_get_config_and_status_then_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get_config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ip": "127.0.0.1",
            "port": 8080,
            "root": "/srv/dav"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/check_server_status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("running")))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri()).unwrap();

    let config = backend.get_config().await.unwrap();
    assert_eq!(config.port, Some(8080));
    assert_eq!(config.root.as_deref(), Some("/srv/dav"));
    assert!(config.auth.is_none());
    assert_eq!(
        backend.check_server_status().await.unwrap(),
        Liveness::Running
    );
}

#[tokio::test]
async fn given_cert_paths_when_import_then_posts_both_paths() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/import_tls_or_cert_from_path"))
        .and(body_json(json!({
            "certPath": "/tls/cert.pem",
            "keyPath": "/tls/key.pem"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri()).unwrap();
    backend
        .import_tls_or_cert_from_path(&CertConfig::new(
            Some(String::from("/tls/cert.pem")),
            Some(String::from("/tls/key.pem")),
        ))
        .await
        .unwrap();
}

/// **VALUE**: A non-2xx answer becomes a rejection carrying the backend's text.
///
/// **BUG THIS CATCHES**: Would catch the response body being discarded, which would
/// leave the operator with "HTTP 500" instead of "port in use".
#[tokio::test]
async fn given_backend_rejects_when_start_server_then_backend_error_with_message() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start_server"))
        .respond_with(ResponseTemplate::new(500).set_body_string("port in use"))
        .mount(&server)
        .await;
    let backend = HttpBackend::new(&server.uri()).unwrap();

    // WHEN
    let err = backend.start_server().await.unwrap_err();

    // THEN
    assert!(matches!(err, RpcError::Backend { .. }));
    assert_eq!(err.status_code(), Some(500));
    assert_eq!(err.backend_message(), "port in use");
    assert!(!err.is_transient());
}

#[tokio::test]
async fn given_malformed_json_when_get_config_then_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get_config"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;
    let backend = HttpBackend::new(&server.uri()).unwrap();

    let err = backend.get_config().await.unwrap_err();

    assert!(matches!(err, RpcError::Json { .. }));
}

/// **BUG THIS CATCHES**: Would catch a blank stored password failing get_config,
/// which leaves bootstrap with nothing to show.
#[tokio::test]
async fn given_stored_auth_incomplete_when_get_config_then_loads_without_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get_config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ip": "0.0.0.0",
            "port": 8080,
            "root": "/srv",
            "auth": ["admin", ""]
        })))
        .mount(&server)
        .await;
    let backend = HttpBackend::new(&server.uri()).unwrap();
    let store = ConfigStore::new();

    load_initial_config(&backend, &store, Duration::from_secs(5))
        .await
        .unwrap();

    let config = store.get_config();
    assert_eq!(config.auth, None);
    assert_eq!(config.port, Some(8080));
    assert_eq!(config.root.as_deref(), Some("/srv"));
}

#[tokio::test]
async fn given_nothing_listening_when_calling_then_transient_connection_error() {
    let backend = HttpBackend::new("http://127.0.0.1:1").unwrap();

    let err = backend.check_server_status().await.unwrap_err();

    assert!(matches!(err, RpcError::Http { .. }));
    assert!(err.is_transient());
}

#[test]
fn given_invalid_url_when_creating_backend_then_url_error() {
    let result = HttpBackend::new("not a url");

    assert!(matches!(result, Err(RpcError::UrlParse { .. })));
}

/// **VALUE**: End to end over HTTP: load the backend's config, start, reach Running.
///
/// **WHY THIS MATTERS**: Exercises the store, bootstrap, controller and adapter together
/// against a real socket.
#[tokio::test]
async fn given_http_backend_when_bootstrap_then_start_then_running() {
    // GIVEN: A backend holding 0.0.0.0:80
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get_config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ip": "0.0.0.0",
            "port": 80
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/update_config"))
        .and(body_json(json!({ "ip": "0.0.0.0", "port": 80 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/start_server"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let backend = Arc::new(HttpBackend::new(&server.uri()).unwrap());
    let store = ConfigStore::new();

    // WHEN
    load_initial_config(backend.as_ref(), &store, Duration::from_secs(2))
        .await
        .unwrap();
    let controller = ServerController::new(backend);
    controller.start(store.get_config()).await.unwrap();

    // THEN
    assert_eq!(controller.state().liveness, Liveness::Running);
}
