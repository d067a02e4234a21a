// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-invocation shared state: the selected profile, its token cache, and
//! the HTTP client every request goes through.

use std::time::Duration;

use anyhow::Context as _;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::config::{Config, ConfigFile, UnauthorizedPolicy};
use crate::profile::CredentialProfile;
use crate::token::TokenStore;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Context {
    pub profile: CredentialProfile,
    pub store: TokenStore,
    /// Explicit `--account`, taking precedence over the profile's default.
    pub account: Option<String>,
    pub events_url: Option<String>,
    pub policy: UnauthorizedPolicy,
    pub http: reqwest::Client,
    revoked: CancellationToken,
}

impl Context {
    pub fn new(profile: CredentialProfile, store: TokenStore) -> anyhow::Result<Self> {
        crate::ensure_crypto_provider();
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("building http client")?;
        Ok(Self {
            profile,
            store,
            account: None,
            events_url: None,
            policy: UnauthorizedPolicy::default(),
            http,
            revoked: CancellationToken::new(),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let dir = config.config_dir();
        let file = ConfigFile::load(&dir)?;
        let profile = file.profile(config.client.as_deref())?;
        Ok(Self::new(profile, TokenStore::new(dir))?
            .with_account(config.account.clone())
            .with_events_url(config.events_url.clone())
            .with_policy(config.on_unauthorized))
    }

    pub fn with_account(mut self, account: Option<String>) -> Self {
        self.account = account.filter(|a| !a.is_empty());
        self
    }

    pub fn with_events_url(mut self, url: Option<String>) -> Self {
        self.events_url = url.filter(|u| !u.is_empty());
        self
    }

    pub fn with_policy(mut self, policy: UnauthorizedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Event stream endpoint: the override, else derived from the API URL.
    pub fn events_url(&self) -> Option<String> {
        self.events_url.clone().or_else(|| self.profile.events_url())
    }

    /// The API refused the bearer token. Clears the cached token and, under
    /// [`UnauthorizedPolicy::TearDown`], signals running watches to stop.
    pub fn reject_token(&self) {
        warn!(profile = %self.profile.name, "bearer token rejected, clearing token cache");
        self.store.clear(&self.profile.name);
        if self.policy == UnauthorizedPolicy::TearDown {
            self.revoked.cancel();
        }
    }

    /// Cancelled once a rejected token should tear down running watches.
    pub fn revoked(&self) -> CancellationToken {
        self.revoked.clone()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
