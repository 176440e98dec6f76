use crate::helpers::{FakeBackend, sample_config};

use control_core::controller::{Notice, ServerController};
use control_core::error::{CoreError, ServerError, ValidationError};
use control_core::model::{CertConfig, Liveness};
use control_core::rpc::RpcCall;
use control_core::store::ConfigStore;

use std::time::Duration;

/// **VALUE**: A second start while the first is in flight sends nothing.
///
/// **WHY THIS MATTERS**: A double-click on "Start" must not push the configuration
/// twice or ask the backend to bind the port twice.
///
/// **BUG THIS CATCHES**: Would catch:
/// - `pending` set after the first await instead of before it
/// - The guard check and set racing (check-then-act on two locks)
/// - `pending` staying set after the operation finished
#[tokio::test]
async fn given_start_in_flight_when_start_again_then_single_backend_sequence() {
    // GIVEN: start_server held open by the backend
    let backend = FakeBackend::new();
    let gate = backend.gate(RpcCall::StartServer);
    let controller = ServerController::new(backend.clone());

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.start(sample_config()).await }
    });
    gate.entered().await;
    assert!(controller.state().pending);

    // WHEN: A second start arrives
    controller.start(sample_config()).await.unwrap();

    // THEN: It was a no-op and the first start still owns the flag
    assert!(
        controller.state().pending,
        "An ignored duplicate must not release the in-flight operation"
    );

    // WHEN: A third start arrives
    controller.start(sample_config()).await.unwrap();
    assert!(controller.state().pending);

    // THEN: After release exactly one sequence went out
    gate.release();
    first.await.unwrap().unwrap();

    assert_eq!(
        backend.calls(),
        vec![RpcCall::UpdateConfig, RpcCall::StartServer]
    );
    let state = controller.state();
    assert_eq!(state.liveness, Liveness::Running);
    assert!(!state.pending);
}

/// **VALUE**: After an ignored duplicate start, polls stay fenced off.
///
/// **BUG THIS CATCHES**: Would catch a refused acquire clearing `pending`, which lets
/// the poll overwrite liveness while the first start is still in flight.
#[tokio::test]
async fn given_ignored_duplicate_start_when_poll_then_still_fenced() {
    // GIVEN: start_server held open, a duplicate start ignored
    let backend = FakeBackend::new();
    let gate = backend.gate(RpcCall::StartServer);
    let controller = ServerController::new(backend.clone());

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.start(sample_config()).await }
    });
    gate.entered().await;
    controller.start(sample_config()).await.unwrap();

    // WHEN: The backend reports Running and a poll runs
    backend.set_status(Liveness::Running);
    controller.poll_once().await;

    // THEN: The poll was skipped; the first start is still the only owner
    let state = controller.state();
    assert!(state.pending);
    assert_eq!(state.liveness, Liveness::Stopped);
    assert_eq!(backend.count(RpcCall::CheckServerStatus), 0);

    gate.release();
    first.await.unwrap().unwrap();
    assert!(!controller.state().pending);
}

#[tokio::test]
async fn given_stop_in_flight_when_start_requested_then_ignored() {
    let backend = FakeBackend::new();
    let gate = backend.gate(RpcCall::StopServer);
    let controller = ServerController::new(backend.clone());

    let stopping = tokio::spawn({
        let controller = controller.clone();
        async move { controller.stop().await }
    });
    gate.entered().await;

    controller.start(sample_config()).await.unwrap();

    gate.release();
    stopping.await.unwrap().unwrap();
    assert_eq!(backend.calls(), vec![RpcCall::StopServer]);
    assert_eq!(controller.state().liveness, Liveness::Stopped);
}

/// **VALUE**: "Port in use" surfaces as an error notice and leaves the server Stopped.
///
/// **WHY THIS MATTERS**: This is the most common start failure. The operator has to
/// see the backend's own words and be able to try again.
///
/// **BUG THIS CATCHES**: Would catch:
/// - Liveness flipped to Running before the backend confirmed
/// - `pending` stuck after a failure (every later start silently ignored)
/// - The backend message replaced by a generic one
#[tokio::test]
async fn given_port_in_use_when_start_then_error_shown_and_state_stopped() {
    // GIVEN: The backend refuses to bind
    let backend = FakeBackend::new();
    backend.reject(RpcCall::StartServer, "port in use");
    let controller = ServerController::new(backend.clone());

    // WHEN
    let result = controller.start(sample_config()).await;

    // THEN: Error returned and recorded, state unchanged, guard released
    let err = result.expect_err("start should fail");
    assert_eq!(err.call(), RpcCall::StartServer);
    assert_eq!(err.user_message(), "port in use");

    let state = controller.state();
    assert_eq!(state.liveness, Liveness::Stopped);
    assert!(!state.pending);
    assert_eq!(
        state.notice(),
        Some(Notice::Error(String::from("port in use")))
    );
}

#[tokio::test]
async fn given_update_config_rejected_when_start_then_start_server_not_called() {
    let backend = FakeBackend::new();
    backend.reject(RpcCall::UpdateConfig, "root does not exist");
    let controller = ServerController::new(backend.clone());

    let err = controller.start(sample_config()).await.unwrap_err();

    assert_eq!(err.call(), RpcCall::UpdateConfig);
    assert_eq!(backend.calls(), vec![RpcCall::UpdateConfig]);
    assert!(!controller.state().pending);
}

/// **VALUE**: The happy path from an empty store to a running server.
///
/// **WHY THIS MATTERS**: This is the whole product in one test: load what the backend
/// has, start with it, and show Running.
#[tokio::test]
async fn given_backend_config_when_loaded_and_started_then_running() {
    // GIVEN: The backend holds 0.0.0.0:80
    let backend = FakeBackend::with_config(sample_config());
    let store = ConfigStore::new();
    control_core::bootstrap::load_initial_config(
        backend.as_ref(),
        &store,
        Duration::from_secs(1),
    )
    .await
    .unwrap();

    // WHEN: Starting with the draft
    let controller = ServerController::new(backend.clone());
    controller.start(store.get_config()).await.unwrap();

    // THEN
    assert_eq!(controller.state().liveness, Liveness::Running);
    assert_eq!(backend.pushed_configs(), vec![sample_config()]);
}

/// **VALUE**: A poll issued while an operation is pending does not touch liveness.
///
/// **BUG THIS CATCHES**: Would catch the poll overwriting the optimistic view of an
/// in-flight start with the backend's pre-start status.
#[tokio::test]
async fn given_pending_start_when_poll_then_liveness_untouched() {
    // GIVEN: start_server held open, backend already reports Running
    let backend = FakeBackend::new();
    let gate = backend.gate(RpcCall::StartServer);
    backend.set_status(Liveness::Running);
    let controller = ServerController::new(backend.clone());

    let starting = tokio::spawn({
        let controller = controller.clone();
        async move { controller.start(sample_config()).await }
    });
    gate.entered().await;

    // WHEN
    controller.poll_once().await;

    // THEN: Poll skipped entirely
    assert_eq!(controller.state().liveness, Liveness::Stopped);
    assert_eq!(backend.count(RpcCall::CheckServerStatus), 0);

    gate.release();
    starting.await.unwrap().unwrap();
    assert_eq!(controller.state().liveness, Liveness::Running);
}

/// **VALUE**: A poll answer that was issued before a start and arrives after it is dropped.
///
/// **WHY THIS MATTERS**: Polling keeps running during operations. A slow status answer
/// from before the start would otherwise flip a freshly started server back to Stopped.
///
/// **BUG THIS CATCHES**: Would catch fencing on `pending` alone, which is already false
/// again by the time the stale answer lands.
#[tokio::test]
async fn given_poll_in_flight_when_start_completes_then_stale_result_discarded() {
    // GIVEN: A poll held open while the backend still says Stopped
    let backend = FakeBackend::new();
    let poll_gate = backend.gate(RpcCall::CheckServerStatus);
    let controller = ServerController::new(backend.clone());

    let polling = tokio::spawn({
        let controller = controller.clone();
        async move { controller.poll_once().await }
    });
    poll_gate.entered().await;

    // WHEN: A start runs to completion, then the stale poll answers
    controller.start(sample_config()).await.unwrap();
    backend.set_status(Liveness::Stopped);
    poll_gate.release();
    polling.await.unwrap();

    // THEN: Still Running
    assert_eq!(controller.state().liveness, Liveness::Running);
}

#[tokio::test]
async fn given_idle_controller_when_poll_reports_running_then_liveness_follows() {
    let backend = FakeBackend::new();
    backend.set_status(Liveness::Running);
    let controller = ServerController::new(backend.clone());
    let mut rx = controller.subscribe();

    controller.poll_once().await;

    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().liveness, Liveness::Running);
}

#[tokio::test]
async fn given_status_check_fails_when_poll_then_state_unchanged_and_no_notice() {
    let backend = FakeBackend::new();
    backend.reject(RpcCall::CheckServerStatus, "busy");
    let controller = ServerController::new(backend.clone());

    controller.poll_once().await;

    let state = controller.state();
    assert_eq!(state.liveness, Liveness::Stopped);
    assert!(state.notice().is_none());
}

/// **VALUE**: A backend that never answers cannot wedge the controller.
///
/// **BUG THIS CATCHES**: Would catch a missing timeout leaving `pending` set forever,
/// after which every start and stop is silently ignored.
#[tokio::test]
async fn given_hung_backend_when_start_then_times_out_and_releases_pending() {
    // GIVEN: start_server never answers, 50ms bound
    let backend = FakeBackend::new();
    let _gate = backend.gate(RpcCall::StartServer);
    let controller =
        ServerController::with_rpc_timeout(backend.clone(), Some(Duration::from_millis(50)));

    // WHEN
    let err = controller.start(sample_config()).await.unwrap_err();

    // THEN
    assert!(matches!(
        err,
        ServerError::Timeout {
            call: RpcCall::StartServer,
            ..
        }
    ));
    let state = controller.state();
    assert!(!state.pending);
    assert_eq!(state.liveness, Liveness::Stopped);
    assert!(state.last_error.is_some());
}

/// **VALUE**: Cancelling an operation future still releases `pending`.
///
/// **BUG THIS CATCHES**: Would catch `pending = false` written at the end of the
/// function body instead of in a drop guard.
#[tokio::test]
async fn given_start_cancelled_when_dropped_then_pending_released() {
    let backend = FakeBackend::new();
    let gate = backend.gate(RpcCall::StartServer);
    let controller = ServerController::with_rpc_timeout(backend.clone(), None);

    let starting = tokio::spawn({
        let controller = controller.clone();
        async move { controller.start(sample_config()).await }
    });
    gate.entered().await;
    assert!(controller.state().pending);

    starting.abort();
    assert!(starting.await.unwrap_err().is_cancelled());

    assert!(!controller.state().pending);
}

#[tokio::test]
async fn given_running_server_when_stop_then_stopped() {
    let backend = FakeBackend::new();
    let controller = ServerController::new(backend.clone());
    controller.start(sample_config()).await.unwrap();

    controller.stop().await.unwrap();

    assert_eq!(controller.state().liveness, Liveness::Stopped);
    assert_eq!(backend.count(RpcCall::StopServer), 1);
}

#[tokio::test]
async fn given_running_server_when_stop_rejected_then_still_running() {
    let backend = FakeBackend::new();
    let controller = ServerController::new(backend.clone());
    controller.start(sample_config()).await.unwrap();
    backend.reject(RpcCall::StopServer, "server busy");

    let err = controller.stop().await.unwrap_err();

    assert_eq!(err.user_message(), "server busy");
    let state = controller.state();
    assert_eq!(state.liveness, Liveness::Running);
    assert!(!state.pending);
}

/// **VALUE**: Importing with no paths is refused locally and shown as a warning.
///
/// **BUG THIS CATCHES**: Would catch an empty import reaching the backend, or the
/// refusal being reported as an error rather than a warning.
#[tokio::test]
async fn given_empty_cert_when_import_then_warning_and_nothing_sent() {
    let backend = FakeBackend::new();
    let controller = ServerController::new(backend.clone());

    let result = controller.import_cert(CertConfig::default()).await;

    assert!(matches!(
        result,
        Err(CoreError::Validation(ValidationError::EmptyCertPatch { .. }))
    ));
    assert!(backend.calls().is_empty());
    assert_eq!(
        controller.state().notice().map(|n| n.title()),
        Some("Warning")
    );
}

#[tokio::test]
async fn given_cert_paths_when_import_then_sent_to_backend() {
    let backend = FakeBackend::new();
    let controller = ServerController::new(backend.clone());
    let cert = CertConfig::new(
        Some(String::from("/tls/cert.pem")),
        Some(String::from("/tls/key.pem")),
    );

    controller.import_cert(cert.clone()).await.unwrap();

    assert_eq!(backend.imported_certs(), vec![cert]);
    assert!(controller.state().notice().is_none());
}

#[tokio::test]
async fn given_import_rejected_when_import_then_error_notice() {
    let backend = FakeBackend::new();
    backend.reject(RpcCall::ImportTlsOrCertFromPath, "key does not match certificate");
    let controller = ServerController::new(backend.clone());

    let result = controller
        .import_cert(CertConfig::new(Some(String::from("/tls/cert.pem")), None))
        .await;

    assert!(matches!(result, Err(CoreError::Server(_))));
    assert_eq!(
        controller.state().notice(),
        Some(Notice::Error(String::from(
            "key does not match certificate"
        )))
    );
}

/// **VALUE**: A successful import does not leave an earlier failure on screen.
///
/// **BUG THIS CATCHES**: Would catch a "port in use" notice surviving a later
/// import that worked, so the operator thinks the import failed.
#[tokio::test]
async fn given_failed_start_when_import_succeeds_then_previous_error_cleared() {
    // GIVEN: A failed start left an error notice
    let backend = FakeBackend::new();
    backend.reject(RpcCall::StartServer, "port in use");
    let controller = ServerController::new(backend.clone());
    let _ = controller.start(sample_config()).await;
    assert!(controller.state().last_error.is_some());

    // WHEN
    controller
        .import_cert(CertConfig::new(Some(String::from("/tls/cert.pem")), None))
        .await
        .unwrap();

    // THEN
    assert!(controller.state().notice().is_none());
    assert_eq!(backend.imported_certs().len(), 1);
}

#[tokio::test]
async fn given_notice_shown_when_acknowledged_then_cleared() {
    let backend = FakeBackend::new();
    backend.reject(RpcCall::StartServer, "port in use");
    let controller = ServerController::new(backend.clone());
    let _ = controller.start(sample_config()).await;
    controller.warn(ValidationError::auth_incomplete());

    controller.acknowledge();

    let state = controller.state();
    assert!(state.last_error.is_none());
    assert!(state.last_warning.is_none());
}

/// **VALUE**: Beginning a new operation clears the previous error.
///
/// **BUG THIS CATCHES**: Would catch an old "port in use" notice lingering on screen
/// while a retry is in flight.
#[tokio::test]
async fn given_failed_start_when_retry_begins_then_previous_error_cleared() {
    // GIVEN: A failed start
    let backend = FakeBackend::new();
    backend.reject(RpcCall::StartServer, "port in use");
    let controller = ServerController::new(backend.clone());
    let _ = controller.start(sample_config()).await;
    assert!(controller.state().last_error.is_some());

    // WHEN: A retry is in flight
    let gate = backend.gate(RpcCall::StartServer);
    let retry = tokio::spawn({
        let controller = controller.clone();
        async move { controller.start(sample_config()).await }
    });
    gate.entered().await;

    // THEN: No stale error while pending
    let state = controller.state();
    assert!(state.pending);
    assert!(state.last_error.is_none());

    // THEN: The retry's own failure is recorded once it settles
    gate.release();
    assert!(retry.await.unwrap().is_err());
    assert!(controller.state().last_error.is_some());
}
