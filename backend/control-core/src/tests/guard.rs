// Unit tests for the crate-private pending guard.
// Public start/stop behaviour is covered in integration_tests/controller.

use crate::controller::state::ServerState;
use crate::controller::guard::PendingGuard;
use crate::error::ServerError;
use crate::rpc::RpcCall;

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

/// **VALUE**: The check-and-set of `pending` is the core concurrency guard.
///
/// **BUG THIS CATCHES**: Would catch a guard that lets a second start/stop in
/// while the first still holds the flag.
#[test]
fn given_held_guard_when_acquired_again_then_refused() {
    // GIVEN: A state with the guard held
    let state = watch::Sender::new(ServerState::default());
    let epoch = AtomicU64::new(0);
    let first = PendingGuard::acquire(&state, &epoch);
    assert!(first.is_some());

    // WHEN: Acquiring a second time
    let second = PendingGuard::acquire(&state, &epoch);

    // THEN: Refused, and the epoch only moved once
    assert!(second.is_none(), "Second acquire must be refused");
    assert!(state.borrow().pending);
    assert_eq!(epoch.load(Ordering::SeqCst), 1);
}

/// **VALUE**: Dropping the guard is the only release path, on every exit.
///
/// **BUG THIS CATCHES**: Would catch a stuck "processing" state after an early return.
#[test]
fn given_acquired_guard_when_dropped_then_pending_released() {
    let state = watch::Sender::new(ServerState::default());
    let epoch = AtomicU64::new(0);

    {
        let _guard = PendingGuard::acquire(&state, &epoch);
        assert!(state.borrow().pending);
    }

    assert!(!state.borrow().pending, "Drop must release pending");
    assert!(PendingGuard::acquire(&state, &epoch).is_some());
}

#[test]
fn given_previous_error_when_guard_acquired_then_error_cleared() {
    // GIVEN: A state holding an old failure
    let state = watch::Sender::new(ServerState {
        last_error: Some(ServerError::rejected(RpcCall::StartServer, "port in use")),
        ..Default::default()
    });
    let epoch = AtomicU64::new(0);

    // WHEN: A new attempt begins
    let _guard = PendingGuard::acquire(&state, &epoch);

    // THEN: The old error is gone
    assert_eq!(state.borrow().last_error, None);
}
