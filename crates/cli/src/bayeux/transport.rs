// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::future::Future;
use std::pin::Pin;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::http::header::ORIGIN;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{self, Message as WsMessage};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::debug;

use super::{decode_frame, encode_frame, Message};
use crate::error::TransportError;

pub type TransportFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, TransportError>> + Send + 'a>>;

/// Frame-level duplex channel carrying Bayeux message batches.
///
/// Object-safe so sessions can run over a socket or a scripted peer.
pub trait Transport: Send {
    /// Write one frame holding `messages` as a JSON array.
    fn send<'a>(&'a mut self, messages: &'a [Message]) -> TransportFuture<'a, ()>;

    /// Next inbound frame. `None` once the peer has closed the connection.
    fn receive(&mut self) -> TransportFuture<'_, Option<Vec<Message>>>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send<'a>(&'a mut self, messages: &'a [Message]) -> TransportFuture<'a, ()> {
        (**self).send(messages)
    }

    fn receive(&mut self) -> TransportFuture<'_, Option<Vec<Message>>> {
        (**self).receive()
    }
}

/// Bayeux over a WebSocket, one JSON batch per text frame.
pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl std::fmt::Debug for WsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsTransport").finish_non_exhaustive()
    }
}

impl WsTransport {
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        let connect_err = |reason: String| TransportError::Connect { url: url.to_owned(), reason };

        let mut request = url.into_client_request().map_err(|e| connect_err(e.to_string()))?;
        if let Some(origin) = origin_for(url).and_then(|o| HeaderValue::from_str(&o).ok()) {
            request.headers_mut().insert(ORIGIN, origin);
        }

        let (stream, _) =
            tokio_tungstenite::connect_async(request).await.map_err(|e| connect_err(e.to_string()))?;
        debug!(url, "websocket connected");
        Ok(Self { stream })
    }
}

impl Transport for WsTransport {
    fn send<'a>(&'a mut self, messages: &'a [Message]) -> TransportFuture<'a, ()> {
        Box::pin(async move {
            let text = encode_frame(messages)?;
            self.stream
                .send(WsMessage::Text(text.into()))
                .await
                .map_err(|e| TransportError::Io(e.to_string()))
        })
    }

    fn receive(&mut self) -> TransportFuture<'_, Option<Vec<Message>>> {
        Box::pin(async move {
            loop {
                match self.stream.next().await {
                    Some(Ok(WsMessage::Text(text))) => {
                        return Ok(Some(decode_frame(text.as_bytes())?));
                    }
                    Some(Ok(WsMessage::Binary(bytes))) => {
                        return Ok(Some(decode_frame(&bytes)?));
                    }
                    Some(Ok(WsMessage::Close(_))) | None => return Ok(None),
                    Some(Ok(_)) => continue,
                    Some(Err(e)) if is_eof(&e) => return Ok(None),
                    Some(Err(e)) => return Err(TransportError::Io(e.to_string())),
                }
            }
        })
    }
}

/// Errors that mean the peer went away rather than the socket breaking.
fn is_eof(e: &tungstenite::Error) -> bool {
    matches!(
        e,
        tungstenite::Error::ConnectionClosed
            | tungstenite::Error::AlreadyClosed
            | tungstenite::Error::Protocol(ProtocolError::ResetWithoutClosingHandshake)
    )
}

/// `Origin` for a socket URL: `wss://host/path` → `https://host`.
pub fn origin_for(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    let scheme = match scheme {
        "wss" => "https",
        "ws" => "http",
        _ => return None,
    };
    let host = rest.split(['/', '?', '#']).next().filter(|h| !h.is_empty())?;
    Some(format!("{scheme}://{host}"))
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
