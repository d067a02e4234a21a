// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::Router;

use super::{origin_for, Transport, WsTransport};
use crate::bayeux::{Message, HANDSHAKE};
use crate::mock_server::serve;

#[yare::parameterized(
    wss        = { "wss://events.gb1.brightbox.com/stream", Some("https://events.gb1.brightbox.com") },
    ws_port    = { "ws://127.0.0.1:9000/stream", Some("http://127.0.0.1:9000") },
    no_path    = { "wss://events.example.com", Some("https://events.example.com") },
    with_query = { "wss://events.example.com?x=1", Some("https://events.example.com") },
    http       = { "https://events.example.com/stream", None },
    no_host    = { "wss:///stream", None },
    garbage    = { "events", None },
)]
fn origin(url: &str, expected: Option<&str>) {
    assert_eq!(origin_for(url).as_deref(), expected);
}

/// What the fake event server saw: the Origin header and each text frame.
#[derive(Clone, Default)]
struct Seen(Arc<Mutex<(Option<String>, Vec<String>)>>);

/// Reads one frame, answers with a handshake batch, then a bare-object
/// binary frame, then closes.
async fn fake_server(seen: Seen) -> String {
    let app = Router::new().route(
        "/stream",
        get(move |headers: HeaderMap, ws: WebSocketUpgrade| {
            let seen = seen.clone();
            async move {
                let origin =
                    headers.get("origin").and_then(|v| v.to_str().ok()).map(str::to_owned);
                seen.0.lock().unwrap_or_else(PoisonError::into_inner).0 = origin;
                ws.on_upgrade(move |socket| converse(socket, seen))
            }
        }),
    );
    let addr = serve(app).await;
    format!("ws://{addr}/stream")
}

async fn converse(mut socket: WebSocket, seen: Seen) {
    if let Some(Ok(WsMessage::Text(text))) = socket.recv().await {
        seen.0.lock().unwrap_or_else(PoisonError::into_inner).1.push(text.as_str().to_owned());
    }
    let reply = r#"[{"channel":"/meta/handshake","successful":true,"clientId":"abc"}]"#;
    let _ = socket.send(WsMessage::Text(reply.into())).await;
    let single = r#"{"channel":"/meta/connect","successful":true}"#;
    let _ = socket.send(WsMessage::Binary(single.as_bytes().to_vec().into())).await;
    let _ = socket.send(WsMessage::Close(None)).await;
}

#[tokio::test]
async fn websocket_round_trip() -> anyhow::Result<()> {
    let seen = Seen::default();
    let url = fake_server(seen.clone()).await;
    let mut transport = WsTransport::connect(&url).await?;

    transport.send(&[Message::handshake()]).await?;

    let first = transport.receive().await?.unwrap_or_default();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].channel, HANDSHAKE);
    assert_eq!(first[0].client_id.as_deref(), Some("abc"));

    let second = transport.receive().await?.unwrap_or_default();
    assert_eq!(second.len(), 1);
    assert!(second[0].is_successful());

    assert!(transport.receive().await?.is_none());

    let (origin, frames) = seen.0.lock().unwrap_or_else(PoisonError::into_inner).clone();
    let expected_origin = url.replace("ws://", "http://").replace("/stream", "");
    assert_eq!(origin.as_deref(), Some(expected_origin.as_str()));
    assert_eq!(frames.len(), 1);
    assert!(frames[0].starts_with(r#"[{"channel":"/meta/handshake""#), "{}", frames[0]);
    Ok(())
}

#[tokio::test]
async fn connect_failure_names_url() {
    // Nothing listens on port 1.
    crate::assert_err_contains!(WsTransport::connect("ws://127.0.0.1:1/stream").await, "127.0.0.1:1");
}
