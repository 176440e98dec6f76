use crate::helpers::FakeBackend;

use control_core::controller::ServerController;
use control_core::model::Liveness;
use control_core::rpc::RpcCall;

use std::time::Duration;

use tokio::time::{sleep, timeout};

const WAIT_LIMIT: Duration = Duration::from_secs(3);

/// **VALUE**: The poll loop picks up a server started outside the panel.
///
/// **WHY THIS MATTERS**: The backend can be started by another tool or restart on
/// its own. The panel must converge to what the backend reports.
///
/// **BUG THIS CATCHES**: Would catch:
/// - The spawned loop never ticking
/// - Shutdown not stopping the loop (status calls keep going)
#[tokio::test]
async fn given_poller_running_when_backend_starts_then_state_converges_and_shutdown_stops() {
    // GIVEN: The backend reports Running, the panel still thinks Stopped
    let backend = FakeBackend::new();
    backend.set_status(Liveness::Running);
    let controller = ServerController::new(backend.clone());
    let mut rx = controller.subscribe();

    // WHEN: The poller runs
    let poller = controller.spawn_poller(Duration::from_millis(100));

    // THEN: The state converges
    timeout(WAIT_LIMIT, rx.wait_for(|s| s.liveness == Liveness::Running))
        .await
        .expect("poller should observe Running")
        .expect("controller dropped");

    // WHEN: Shut down
    poller.shutdown().await;
    let calls_at_shutdown = backend.count(RpcCall::CheckServerStatus);

    // THEN: No further polls
    sleep(Duration::from_millis(300)).await;
    assert_eq!(
        backend.count(RpcCall::CheckServerStatus),
        calls_at_shutdown
    );
}

#[tokio::test]
async fn given_poller_when_handle_dropped_then_task_aborted() {
    let backend = FakeBackend::new();
    let controller = ServerController::new(backend.clone());

    let poller = controller.spawn_poller(Duration::from_millis(100));
    timeout(WAIT_LIMIT, async {
        while backend.count(RpcCall::CheckServerStatus) == 0 {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("poller should have polled once");
    assert!(!poller.is_finished());

    drop(poller);
    sleep(Duration::from_millis(50)).await;
    let calls_after_drop = backend.count(RpcCall::CheckServerStatus);

    sleep(Duration::from_millis(300)).await;
    assert_eq!(
        backend.count(RpcCall::CheckServerStatus),
        calls_after_drop
    );
}
