// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named credential profiles.
//!
//! A profile is one `clients` entry from the config file, resolved into the
//! endpoints the token lifecycle and the event feed need.

use reqwest::Url;

use crate::config::ClientConfig;

/// Credentials and endpoints for one API client. Immutable for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialProfile {
    pub name: String,
    pub client_id: String,
    pub client_secret: String,
    pub api_url: String,
    pub auth_url: Option<String>,
    pub username: Option<String>,
    pub default_account: Option<String>,
}

impl CredentialProfile {
    pub fn from_client(name: &str, client: &ClientConfig) -> Self {
        Self {
            name: name.to_owned(),
            client_id: client.client_id.clone(),
            client_secret: client.secret.clone(),
            api_url: client.api_url.clone(),
            auth_url: client.auth_url.clone().filter(|u| !u.is_empty()),
            username: client.username.clone().filter(|u| !u.is_empty()),
            default_account: client.default_account.clone().filter(|a| !a.is_empty()),
        }
    }

    /// OAuth token endpoint: `/token` on the auth URL, else on the API URL.
    pub fn token_url(&self) -> Option<Url> {
        let base = self
            .auth_url
            .as_deref()
            .and_then(|u| Url::parse(u).ok())
            .or_else(|| Url::parse(&self.api_url).ok())?;
        base.join("/token").ok()
    }

    /// API host with its literal `api.` prefix removed (`api.gb1.brightbox.com`
    /// → `gb1.brightbox.com`). `None` when the host has no such prefix.
    pub fn region_domain(&self) -> Option<String> {
        let url = Url::parse(&self.api_url).ok()?;
        let domain = url.host_str()?.strip_prefix("api.")?;
        if domain.is_empty() {
            return None;
        }
        Some(domain.to_owned())
    }

    /// Event stream endpoint for this profile's region.
    pub fn events_url(&self) -> Option<String> {
        self.region_domain().map(|domain| format!("wss://events.{domain}/stream"))
    }
}

#[cfg(test)]
#[path = "profile_tests.rs"]
mod tests;
