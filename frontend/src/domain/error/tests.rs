//! Tests for synchronisation error construction and serialisation.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(ErrorCode::Transport, "network request failed")]
#[case(ErrorCode::Api, "request was rejected by the server")]
#[case(ErrorCode::Decode, "unexpected response from the server")]
#[case(ErrorCode::Identity, "authentication failed")]
fn blank_messages_fall_back_per_code(#[case] code: ErrorCode, #[case] expected: &str) {
    let err = SyncError::new(code, "   ");
    assert_eq!(err.message(), expected);
    assert_eq!(err.code(), code);
}

#[test]
fn only_api_errors_carry_status() {
    assert_eq!(SyncError::api(422, "bad").status(), Some(422));
    assert_eq!(SyncError::transport("offline").status(), None);
    assert_eq!(SyncError::api(500, "").message(), "request was rejected by the server");
}

#[test]
fn serialises_with_camel_case_and_skips_missing_status() {
    let value = serde_json::to_value(SyncError::decode("bad shape")).expect("serialise");
    assert_eq!(value, json!({ "code": "decode", "message": "bad shape" }));

    let value = serde_json::to_value(SyncError::api(404, "gone")).expect("serialise");
    assert_eq!(
        value,
        json!({ "code": "api", "message": "gone", "status": 404 })
    );
}
