// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client side of a single Bayeux session.
//!
//! ```text
//! Disconnected ──handshake()──▶ Handshaking ──subscribe()──▶ Connecting
//!                                                               │ connect ack
//!                                                               ▼
//!                     Closed ◀──EOF / failure──── Streaming ◀── Subscribing
//!                                                   subscribe ack
//! ```
//!
//! At most one `/meta/connect` is outstanding at any time: a new one goes out
//! only when the previous one has been answered.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use super::{Advice, Kind, Message, Transport};
use crate::error::WatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Disconnected,
    Handshaking,
    Connecting,
    Subscribing,
    Streaming,
    Closed,
}

pub struct Session<T> {
    transport: T,
    state: State,
    client_id: Option<String>,
    subscription: Option<String>,
    outstanding_connects: usize,
    advice: Option<Advice>,
    /// Messages from a multi-message frame not yet dispatched.
    pending: VecDeque<Message>,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: State::Disconnected,
            client_id: None,
            subscription: None,
            outstanding_connects: 0,
            advice: None,
            pending: VecDeque::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn outstanding_connects(&self) -> usize {
        self.outstanding_connects
    }

    /// Most recent advice from the server.
    pub fn advice(&self) -> Option<&Advice> {
        self.advice.as_ref()
    }

    /// Send the handshake and wait for its reply. Returns the server-assigned
    /// client id.
    pub async fn handshake(&mut self) -> Result<String, WatchError> {
        self.state = State::Handshaking;
        if let Err(e) = self.transport.send(&[Message::handshake()]).await {
            return Err(self.close(WatchError::Connect(e.to_string())));
        }

        let mut frame = match self.transport.receive().await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                return Err(self.close(WatchError::Connect(
                    "connection closed during handshake".to_owned(),
                )));
            }
            Err(e) => return Err(self.close(WatchError::Connect(e.to_string()))),
        };

        let Some(at) = frame.iter().position(|m| m.kind() == Kind::Handshake) else {
            return Err(self.close(WatchError::Connect("no handshake reply".to_owned())));
        };
        let reply = frame.remove(at);
        self.pending.extend(frame);

        if !reply.is_successful() {
            let reason = format!("handshake rejected: {}", reply.error_text());
            return Err(self.close(WatchError::Connect(reason)));
        }
        let Some(client_id) = reply.client_id.filter(|id| !id.is_empty()) else {
            return Err(self.close(WatchError::Connect("handshake reply without clientId".to_owned())));
        };
        if let Some(advice) = reply.advice {
            self.advice = Some(advice);
        }

        info!(client_id, "bayeux handshake complete");
        self.client_id = Some(client_id.clone());
        Ok(client_id)
    }

    /// Open the connect loop and subscribe to `topic` in one frame.
    pub async fn subscribe(&mut self, topic: &str, auth_token: &str) -> Result<(), WatchError> {
        let Some(client_id) = self.client_id.clone() else {
            return Err(WatchError::Connect("subscribe before handshake".to_owned()));
        };
        self.state = State::Connecting;
        self.subscription = Some(topic.to_owned());
        self.send(&[Message::connect(&client_id), Message::subscribe(&client_id, topic, auth_token)])
            .await
    }

    /// Next application message on the subscribed channel.
    ///
    /// Meta replies are handled internally. `Ok(None)` means the server
    /// closed the connection; any error also closes the session.
    pub async fn next_message(&mut self) -> Result<Option<Message>, WatchError> {
        loop {
            if self.state == State::Closed {
                return Ok(None);
            }
            let Some(message) = self.pending.pop_front() else {
                match self.transport.receive().await {
                    Ok(Some(frame)) => {
                        self.pending.extend(frame);
                        continue;
                    }
                    Ok(None) => {
                        info!("event stream closed by server");
                        self.state = State::Closed;
                        return Ok(None);
                    }
                    Err(e) => return Err(self.close(e.into())),
                }
            };
            if let Some(message) = self.dispatch(message).await? {
                return Ok(Some(message));
            }
        }
    }

    async fn dispatch(&mut self, message: Message) -> Result<Option<Message>, WatchError> {
        match message.kind() {
            Kind::Connect => {
                self.outstanding_connects = self.outstanding_connects.saturating_sub(1);
                if !message.is_successful() {
                    return Err(self.reject(message));
                }
                if let Some(advice) = message.advice {
                    debug!(?advice, "server advice");
                    self.advice = Some(advice);
                }
                if self.state == State::Connecting {
                    self.state = State::Subscribing;
                }
                if self.outstanding_connects == 0 {
                    if let Some(client_id) = self.client_id.clone() {
                        self.send(&[Message::connect(&client_id)]).await?;
                    }
                }
                Ok(None)
            }
            Kind::Subscribe => {
                if !message.is_successful() {
                    return Err(self.reject(message));
                }
                info!(subscription = ?message.subscription, "subscribed");
                self.state = State::Streaming;
                Ok(None)
            }
            Kind::Publish if self.subscription.as_deref() == Some(message.channel.as_str()) => {
                if message.data.is_none() {
                    debug!(channel = %message.channel, "ignoring message without data");
                    return Ok(None);
                }
                Ok(Some(message))
            }
            _ => {
                debug!(channel = %message.channel, "ignoring message");
                Ok(None)
            }
        }
    }

    async fn send(&mut self, batch: &[Message]) -> Result<(), WatchError> {
        if let Err(e) = self.transport.send(batch).await {
            return Err(self.close(WatchError::Io(e.to_string())));
        }
        self.outstanding_connects += batch.iter().filter(|m| m.kind() == Kind::Connect).count();
        Ok(())
    }

    fn reject(&mut self, message: Message) -> WatchError {
        let error = message.error_text();
        self.close(WatchError::Protocol { channel: message.channel, error })
    }

    fn close(&mut self, err: WatchError) -> WatchError {
        warn!(err = %err, "bayeux session closed");
        self.state = State::Closed;
        err
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
