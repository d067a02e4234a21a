// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the token lifecycle and the event feed.
//!
//! Only [`DecodeError`] is recovered inline (one bad payload is skipped).
//! Everything else unwinds the watch loop and is reported once.

use thiserror::Error;

/// A grant exchange or credential prompt failed.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint could not be reached or returned an unreadable body.
    #[error("token request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The token endpoint answered with a non-success status.
    #[error("token request to {url} rejected ({status}): {body}")]
    Rejected { url: String, status: u16, body: String },

    /// The profile does not yield a usable token endpoint.
    #[error("invalid auth url for {profile}: {reason}")]
    InvalidUrl { profile: String, reason: String },

    /// Reading the password from the terminal failed.
    #[error("password prompt failed: {0}")]
    Prompt(#[from] std::io::Error),

    /// The operator entered an empty password.
    #[error("password not provided")]
    PasswordRequired,

    /// The server accepted the request but issued an empty access token.
    #[error("token endpoint returned an empty access token")]
    EmptyToken,
}

/// Socket-level failures reported by a Bayeux transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Opening the socket failed.
    #[error("connect to {url} failed: {reason}")]
    Connect { url: String, reason: String },

    /// A read or write on an open socket failed.
    #[error("socket error: {0}")]
    Io(String),

    /// A frame arrived that is not a JSON message batch.
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Fatal conditions that end a watch.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Socket open or handshake failed.
    #[error("connect failed: {0}")]
    Connect(String),

    /// The server answered a meta request with `successful: false`.
    #[error("{channel} rejected by server: {error}")]
    Protocol { channel: String, error: String },

    /// Socket read or write failed after the handshake.
    #[error("io error: {0}")]
    Io(String),

    /// The subscription topic could not be resolved.
    #[error("account lookup failed: {0:#}")]
    Account(anyhow::Error),

    /// The bearer token was rejected elsewhere while the watch was running.
    #[error("token revoked by the API while watching")]
    Revoked,
}

impl WatchError {
    /// True when the server refused the bearer token (`401::...` / `403::...`).
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Protocol { error, .. } => error.starts_with("401") || error.starts_with("403"),
            Self::Revoked => true,
            _ => false,
        }
    }
}

impl From<TransportError> for WatchError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Connect { .. } => Self::Connect(e.to_string()),
            TransportError::Io(_) | TransportError::Malformed(_) => Self::Io(e.to_string()),
        }
    }
}

/// One event payload could not be decoded.
#[derive(Debug, Error)]
#[error("undecodable event payload: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
