use crate::helpers::{FakeBackend, sample_config};

use control_core::bootstrap::load_initial_config;
use control_core::error::RpcError;
use control_core::model::Config;
use control_core::rpc::RpcCall;
use control_core::store::ConfigStore;

use std::time::Duration;

/// **VALUE**: A backend that is still starting up is waited for.
///
/// **WHY THIS MATTERS**: The panel and the backend are often launched together. The
/// first get_config can land before the backend is ready and answer 503.
///
/// **BUG THIS CATCHES**: Would catch transient failures being treated as final,
/// leaving the operator with an empty form.
#[tokio::test]
async fn given_backend_starting_when_bootstrap_then_retries_until_loaded() {
    // GIVEN: Two 503 answers before the real one
    let backend = FakeBackend::with_config(sample_config());
    backend.fail_get_config_transiently(2);
    let store = ConfigStore::new();

    // WHEN
    load_initial_config(backend.as_ref(), &store, Duration::from_secs(10))
        .await
        .expect("bootstrap should succeed after retries");

    // THEN
    assert_eq!(backend.count(RpcCall::GetConfig), 3);
    assert_eq!(store.get_config(), sample_config());
}

/// **VALUE**: A permanent refusal is reported at once and leaves the draft empty.
///
/// **BUG THIS CATCHES**: Would catch retrying a 4xx until the deadline, or a partial
/// config being written on failure.
#[tokio::test]
async fn given_backend_refuses_when_bootstrap_then_error_and_store_untouched() {
    let backend = FakeBackend::with_config(sample_config());
    backend.reject_with_status(RpcCall::GetConfig, 400, "bad request");
    let store = ConfigStore::new();

    let err = load_initial_config(backend.as_ref(), &store, Duration::from_secs(10))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(400));
    assert_eq!(backend.count(RpcCall::GetConfig), 1);
    assert_eq!(store.get_config(), Config::default());
}

/// **VALUE**: A backend that accepts the call and never answers cannot hang startup.
///
/// **WHY THIS MATTERS**: `status`, `start` and `config` all load the backend's config
/// first. Without a bound on each attempt they would wait forever.
///
/// **BUG THIS CATCHES**: Would catch `get_config` being awaited without a timeout,
/// which keeps the retry deadline from ever being checked.
#[tokio::test]
async fn given_backend_never_answers_when_bootstrap_then_times_out_within_deadline() {
    // GIVEN: get_config held open forever
    let backend = FakeBackend::with_config(sample_config());
    let _gate = backend.gate(RpcCall::GetConfig);
    let store = ConfigStore::new();

    // WHEN: Bootstrapping with a short deadline
    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        load_initial_config(backend.as_ref(), &store, Duration::from_millis(300)),
    )
    .await
    .expect("bootstrap must give up on its own");

    // THEN: A transient timeout error, store untouched
    let err = outcome.unwrap_err();
    assert!(matches!(err, RpcError::Http { is_timeout: true, .. }));
    assert!(err.is_transient());
    assert!(backend.count(RpcCall::GetConfig) >= 1);
    assert_eq!(store.get_config(), Config::default());
}
