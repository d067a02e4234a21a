// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{TransportError, WatchError};

#[yare::parameterized(
    unauthorized = { "401::Unauthorized", true },
    forbidden    = { "403::Forbidden", true },
    bare_code    = { "401", true },
    bad_request  = { "400::Bad request", false },
    empty        = { "", false },
)]
fn protocol_auth_failure(server_error: &str, expected: bool) {
    let err = WatchError::Protocol {
        channel: "/meta/subscribe".to_owned(),
        error: server_error.to_owned(),
    };
    assert_eq!(err.is_auth_failure(), expected);
}

#[test]
fn revoked_is_auth_failure() {
    assert!(WatchError::Revoked.is_auth_failure());
    assert!(!WatchError::Io("reset".to_owned()).is_auth_failure());
}

#[test]
fn protocol_error_names_channel_and_server_text() {
    let err = WatchError::Protocol {
        channel: "/meta/subscribe".to_owned(),
        error: "403::Forbidden".to_owned(),
    };
    let msg = err.to_string();
    assert!(msg.contains("/meta/subscribe"), "{msg}");
    assert!(msg.contains("403::Forbidden"), "{msg}");
}

#[test]
fn transport_errors_map_to_watch_errors() {
    let connect = TransportError::Connect {
        url: "wss://events.example.com/stream".to_owned(),
        reason: "refused".to_owned(),
    };
    assert!(matches!(WatchError::from(connect), WatchError::Connect(_)));

    let io = TransportError::Io("broken pipe".to_owned());
    assert!(matches!(WatchError::from(io), WatchError::Io(_)));
}
