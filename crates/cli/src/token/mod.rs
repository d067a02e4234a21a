// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OAuth token lifecycle: acquire, cache, and invalidate bearer tokens.

pub mod grant;
pub mod prompt;
pub mod source;
pub mod store;

pub use source::TokenSource;
pub use store::TokenStore;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Seconds before its expiry at which a token is treated as expired.
pub const EXPIRY_MARGIN_SECS: i64 = 10;

/// A bearer token as issued by the token endpoint and cached on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_owned()
}

impl Token {
    pub fn from_response(resp: TokenResponse, now: DateTime<Utc>) -> Self {
        let expiry = resp
            .expires_in
            .filter(|secs| *secs > 0)
            .and_then(|secs| i64::try_from(secs).ok())
            .map(|secs| now + Duration::seconds(secs));
        Self {
            access_token: resp.access_token,
            token_type: resp.token_type.filter(|t| !t.is_empty()).unwrap_or_else(default_token_type),
            expiry,
            refresh_token: resp.refresh_token,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Non-empty and not within [`EXPIRY_MARGIN_SECS`] of its expiry. A token
    /// without an expiry never expires.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        match self.expiry {
            Some(expiry) => expiry - Duration::seconds(EXPIRY_MARGIN_SECS) > now,
            None => true,
        }
    }
}

/// Standard OAuth2 token response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
