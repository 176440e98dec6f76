use crate::HttpStatusCode;

#[test]
fn given_gateway_and_throttle_codes_when_checked_then_transient() {
    for code in [429, 502, 503, 504] {
        assert!(HttpStatusCode(code).is_transient(), "{code} should be transient");
    }
}

#[test]
fn given_port_in_use_rejection_when_checked_then_not_transient() {
    // The backend reports "port in use" as a 500; retrying it blindly would not help.
    let status = HttpStatusCode::from(500);

    assert!(status.is_server_error());
    assert!(!status.is_client_error());
    assert!(!status.is_transient());
}
