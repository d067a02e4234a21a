// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The small slice of the REST API the event feed and login need.

use std::sync::Arc;

use anyhow::Context as _;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::context::Context;
use crate::token::TokenSource;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub ram_used: u64,
}

#[derive(Debug, Deserialize)]
struct ApiClientRecord {
    #[serde(default)]
    account: Option<AccountRef>,
}

#[derive(Debug, Deserialize)]
struct AccountRef {
    id: String,
}

pub struct ApiClient {
    ctx: Arc<Context>,
    tokens: Arc<TokenSource>,
}

impl ApiClient {
    pub fn new(ctx: Arc<Context>, tokens: Arc<TokenSource>) -> Self {
        Self { ctx, tokens }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.ctx.profile.api_url.trim_end_matches('/'))
    }

    /// Authenticated GET. A 401/403 rejects the token before failing.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let token = self.tokens.token().await?;
        let url = self.url(path);
        debug!(url, "GET");
        let resp = self
            .ctx
            .http
            .get(&url)
            .bearer_auth(&token.access_token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            self.ctx.reject_token();
            anyhow::bail!("GET {url} refused the bearer token ({status})");
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("GET {url} failed ({status}): {body}");
        }
        resp.json().await.with_context(|| format!("decoding GET {url}"))
    }

    pub async fn accounts(&self) -> anyhow::Result<Vec<Account>> {
        self.get_json("/1.0/accounts").await
    }

    /// Account to act on: `--account`, else the profile's default account,
    /// else (for `cli-` API clients) the account that owns the client.
    pub async fn account_id(&self) -> anyhow::Result<String> {
        if let Some(id) = self.ctx.account.as_deref().or(self.ctx.profile.default_account.as_deref())
        {
            return Ok(id.to_owned());
        }
        let client_id = &self.ctx.profile.client_id;
        if client_id.starts_with("cli-") {
            let record: ApiClientRecord =
                self.get_json(&format!("/1.0/api_clients/{client_id}")).await?;
            if let Some(account) = record.account {
                return Ok(account.id);
            }
        }
        anyhow::bail!(
            "no account for client {}: pass --account or set a default account",
            self.ctx.profile.name
        )
    }
}

/// The active account with the most RAM in use, first wins on ties.
pub fn choose_default_account(accounts: &[Account]) -> Option<&Account> {
    accounts.iter().filter(|a| a.status == "active").fold(None, |best, a| match best {
        Some(b) if b.ram_used >= a.ram_used => Some(b),
        _ => Some(a),
    })
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
