// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test infrastructure: builders, a scripted Bayeux peer, and
//! assertion helpers.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Duration, Utc};

use crate::bayeux::transport::TransportFuture;
use crate::bayeux::{Message, Payload, Transport, CONNECT, HANDSHAKE, SUBSCRIBE};
use crate::config::ClientConfig;
use crate::context::Context;
use crate::error::TransportError;
use crate::profile::CredentialProfile;
use crate::token::prompt::PasswordPrompt;
use crate::token::{Token, TokenStore};

/// Client-credentials profile named `cli-abc12` pointing at `api_url`.
pub fn test_profile(api_url: &str) -> CredentialProfile {
    CredentialProfile::from_client(
        "cli-abc12",
        &ClientConfig {
            client_id: "cli-abc12".to_owned(),
            secret: "s3cret".to_owned(),
            api_url: api_url.to_owned(),
            ..Default::default()
        },
    )
}

/// Context for [`test_profile`] with its token cache under `dir`.
pub fn test_context(api_url: &str, dir: &Path) -> anyhow::Result<Context> {
    Context::new(test_profile(api_url), TokenStore::new(dir))
}

/// A token valid for an hour.
pub fn test_token(access: &str) -> Token {
    Token {
        access_token: access.to_owned(),
        token_type: "Bearer".to_owned(),
        expiry: Some(Utc::now() + Duration::hours(1)),
        refresh_token: None,
    }
}

/// Password prompt that answers with a fixed string and counts calls.
#[derive(Debug, Clone, Default)]
pub struct StaticPassword {
    password: String,
    calls: Arc<AtomicU32>,
}

impl StaticPassword {
    pub fn new(password: &str) -> Self {
        Self { password: password.to_owned(), calls: Arc::new(AtomicU32::new(0)) }
    }

    pub fn calls(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.calls)
    }
}

impl PasswordPrompt for StaticPassword {
    fn password(&self, _username: &str) -> std::io::Result<String> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.password.clone())
    }
}

/// One observed frame in either direction.
#[derive(Debug, Clone, PartialEq)]
pub enum Exchange {
    Sent(Vec<Message>),
    Received(Vec<Message>),
    Eof,
}

/// Shared view of everything a [`ScriptedTransport`] sent and delivered,
/// in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptLog(Arc<Mutex<Vec<Exchange>>>);

impl ScriptLog {
    fn push(&self, exchange: Exchange) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).push(exchange);
    }

    pub fn exchanges(&self) -> Vec<Exchange> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Every message the client sent, flattened across frames.
    pub fn sent(&self) -> Vec<Message> {
        self.exchanges()
            .into_iter()
            .filter_map(|e| match e {
                Exchange::Sent(batch) => Some(batch),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn sent_on(&self, channel: &str) -> usize {
        self.sent().iter().filter(|m| m.channel == channel).count()
    }
}

enum Step {
    Frame(Vec<Message>),
    Fail(String),
    Hang,
}

/// In-memory Bayeux peer that replays a fixed script of inbound frames and
/// records outbound ones. An exhausted script reads as EOF.
#[derive(Default)]
pub struct ScriptedTransport {
    steps: VecDeque<Step>,
    fail_sends: bool,
    log: ScriptLog,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(mut self, messages: Vec<Message>) -> Self {
        self.steps.push_back(Step::Frame(messages));
        self
    }

    /// Queue a socket error.
    pub fn fail(mut self, reason: &str) -> Self {
        self.steps.push_back(Step::Fail(reason.to_owned()));
        self
    }

    /// Queue a receive that never completes.
    pub fn hang(mut self) -> Self {
        self.steps.push_back(Step::Hang);
        self
    }

    /// Make every send fail.
    pub fn fail_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    pub fn log(&self) -> ScriptLog {
        self.log.clone()
    }
}

impl Transport for ScriptedTransport {
    fn send<'a>(&'a mut self, messages: &'a [Message]) -> TransportFuture<'a, ()> {
        Box::pin(async move {
            if self.fail_sends {
                return Err(TransportError::Io("broken pipe".to_owned()));
            }
            self.log.push(Exchange::Sent(messages.to_vec()));
            Ok(())
        })
    }

    fn receive(&mut self) -> TransportFuture<'_, Option<Vec<Message>>> {
        Box::pin(async move {
            match self.steps.pop_front() {
                Some(Step::Frame(messages)) => {
                    self.log.push(Exchange::Received(messages.clone()));
                    Ok(Some(messages))
                }
                Some(Step::Fail(reason)) => Err(TransportError::Io(reason)),
                Some(Step::Hang) => std::future::pending().await,
                None => {
                    self.log.push(Exchange::Eof);
                    Ok(None)
                }
            }
        })
    }
}

pub fn handshake_ok(client_id: &str) -> Message {
    Message {
        channel: HANDSHAKE.to_owned(),
        successful: Some(true),
        client_id: Some(client_id.to_owned()),
        version: Some("1.0".to_owned()),
        ..Default::default()
    }
}

pub fn connect_ok() -> Message {
    Message { channel: CONNECT.to_owned(), successful: Some(true), ..Default::default() }
}

pub fn subscribe_ok(topic: &str) -> Message {
    Message {
        channel: SUBSCRIBE.to_owned(),
        successful: Some(true),
        subscription: Some(topic.to_owned()),
        ..Default::default()
    }
}

pub fn failed(channel: &str, error: &str) -> Message {
    Message {
        channel: channel.to_owned(),
        successful: Some(false),
        error: Some(error.to_owned()),
        ..Default::default()
    }
}

pub fn publish(channel: &str, data: serde_json::Value) -> Message {
    Message {
        channel: channel.to_owned(),
        data: Payload::from_value(&data).ok(),
        ..Default::default()
    }
}

/// Assert that a `Result` is `Err` and its message contains a substring.
#[macro_export]
macro_rules! assert_err_contains {
    ($expr:expr, $substr:expr) => {{
        let result = $expr;
        let err = result.expect_err(concat!("expected Err for: ", stringify!($expr)));
        let msg = format!("{err:#}");
        assert!(msg.contains($substr), "expected error containing {:?}, got: {msg:?}", $substr);
    }};
}
