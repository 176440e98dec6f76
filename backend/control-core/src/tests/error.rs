use crate::error::{RpcError, ServerError};
use crate::rpc::RpcCall;

use std::time::Duration;

/// **VALUE**: Transient classification drives the bootstrap retry.
///
/// **BUG THIS CATCHES**: Would catch "port in use" (a 500) being retried, or
/// a 503 from a backend still starting being treated as permanent.
#[test]
fn given_backend_status_when_classified_then_only_gateway_codes_transient() {
    assert!(RpcError::backend(503, "starting").is_transient());
    assert!(RpcError::backend(429, "slow down").is_transient());
    assert!(!RpcError::backend(500, "port in use").is_transient());
    assert!(!RpcError::backend(400, "bad config").is_transient());
}

#[test]
fn given_rpc_rejection_when_wrapped_then_keeps_backend_message() {
    // GIVEN: A backend rejection
    let rpc_error = RpcError::backend(500, "port in use");
    assert_eq!(rpc_error.status_code(), Some(500));

    // WHEN: Converting at the call site
    let server_error = ServerError::from_rpc(RpcCall::StartServer, rpc_error);

    // THEN: The dialog text is the backend's message, not the debug rendering
    assert_eq!(server_error.user_message(), "port in use");
    assert_eq!(server_error.call(), RpcCall::StartServer);
    assert!(server_error.to_string().contains("start_server"));
}

/// **BUG THIS CATCHES**: Would catch the wrapped error pointing at the
/// conversion helper instead of where the backend call failed.
#[test]
fn given_rpc_error_when_wrapped_then_keeps_its_location() {
    let rpc_error = RpcError::backend(500, "port in use");
    let raised_at = rpc_error.location();

    let server_error = ServerError::from_rpc(RpcCall::StartServer, rpc_error);

    let ServerError::Rejected { location, .. } = server_error else {
        panic!("expected Rejected");
    };
    assert_eq!(location, raised_at);
    assert!(location.file().ends_with("error.rs"));
}

#[test]
fn given_timeout_when_formatted_then_names_call_and_limit() {
    let error = ServerError::timeout(RpcCall::StopServer, Duration::from_millis(250));

    assert_eq!(
        error.user_message(),
        "stop_server did not answer within 250ms"
    );
}
