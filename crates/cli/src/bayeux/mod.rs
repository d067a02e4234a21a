// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bayeux (Faye) client: message model, transport, and session state machine.

pub mod session;
pub mod transport;

pub use session::{Session, State};
pub use transport::{Transport, WsTransport};

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

pub const HANDSHAKE: &str = "/meta/handshake";
pub const CONNECT: &str = "/meta/connect";
pub const SUBSCRIBE: &str = "/meta/subscribe";
pub const UNSUBSCRIBE: &str = "/meta/unsubscribe";
pub const DISCONNECT: &str = "/meta/disconnect";

pub const VERSION: &str = "1.0";
pub const CONNECTION_TYPE: &str = "websocket";
pub const SUPPORTED_CONNECTION_TYPES: [&str; 2] = ["long-polling", "websocket"];

/// One Bayeux message. Absent fields are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_connection_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successful: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advice: Option<Advice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Payload>,
}

/// Application payload, kept byte for byte as the server sent it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Box<RawValue>);

impl Payload {
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::value::to_raw_value(value).map(Self)
    }

    pub fn get(&self) -> &str {
        self.0.get()
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

/// Server reconnect hints. Recorded, never acted on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reconnect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// Extension block carrying the bearer token on subscribe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ext {
    pub auth_token: String,
}

/// Message classification by channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Handshake,
    Connect,
    Subscribe,
    Unsubscribe,
    Disconnect,
    /// Some other `/meta/*` channel.
    Meta,
    /// Application data on a non-meta channel.
    Publish,
}

impl Message {
    pub fn handshake() -> Self {
        Self {
            channel: HANDSHAKE.to_owned(),
            version: Some(VERSION.to_owned()),
            supported_connection_types: Some(
                SUPPORTED_CONNECTION_TYPES.iter().map(|t| (*t).to_owned()).collect(),
            ),
            ..Default::default()
        }
    }

    pub fn connect(client_id: &str) -> Self {
        Self {
            channel: CONNECT.to_owned(),
            client_id: Some(client_id.to_owned()),
            connection_type: Some(CONNECTION_TYPE.to_owned()),
            ..Default::default()
        }
    }

    pub fn subscribe(client_id: &str, topic: &str, auth_token: &str) -> Self {
        Self {
            channel: SUBSCRIBE.to_owned(),
            client_id: Some(client_id.to_owned()),
            subscription: Some(topic.to_owned()),
            ext: Some(Ext { auth_token: auth_token.to_owned() }),
            ..Default::default()
        }
    }

    pub fn kind(&self) -> Kind {
        match self.channel.as_str() {
            HANDSHAKE => Kind::Handshake,
            CONNECT => Kind::Connect,
            SUBSCRIBE => Kind::Subscribe,
            UNSUBSCRIBE => Kind::Unsubscribe,
            DISCONNECT => Kind::Disconnect,
            c if c.starts_with("/meta/") => Kind::Meta,
            _ => Kind::Publish,
        }
    }

    pub fn is_successful(&self) -> bool {
        self.successful == Some(true)
    }

    /// Server error text, or a placeholder when the server sent none.
    pub fn error_text(&self) -> String {
        match self.error.as_deref() {
            Some(e) if !e.is_empty() => e.to_owned(),
            _ => "unspecified error".to_owned(),
        }
    }
}

/// A frame is a JSON array of messages; a bare object is a batch of one.
///
/// Dispatches on the first byte rather than an untagged enum, which would
/// buffer the frame and lose raw payloads.
pub fn decode_frame(bytes: &[u8]) -> Result<Vec<Message>, serde_json::Error> {
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => Ok(vec![serde_json::from_slice(bytes)?]),
        _ => serde_json::from_slice(bytes),
    }
}

/// Encode a batch. Always an array, even for a single message.
pub fn encode_frame(messages: &[Message]) -> Result<String, serde_json::Error> {
    serde_json::to_string(messages)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
