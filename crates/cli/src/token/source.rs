// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use tracing::{debug, info};

use super::grant::{self, Grant};
use super::prompt::PasswordPrompt;
use super::Token;
use crate::context::Context;
use crate::error::AuthError;

/// Hands out a valid bearer token for the context's profile, from the cache
/// when possible and otherwise by a fresh grant.
pub struct TokenSource {
    ctx: Arc<Context>,
    prompt: Box<dyn PasswordPrompt>,
}

impl TokenSource {
    pub fn new(ctx: Arc<Context>, prompt: Box<dyn PasswordPrompt>) -> Self {
        Self { ctx, prompt }
    }

    /// A token valid for at least the expiry margin.
    ///
    /// Profiles with a username use the password grant (prompting once);
    /// the rest use client credentials. New tokens are written to the cache.
    pub async fn token(&self) -> Result<Token, AuthError> {
        let profile = &self.ctx.profile;
        if let Some(token) = self.ctx.store.read(&profile.name) {
            debug!(profile = %profile.name, "using cached token");
            return Ok(token);
        }

        let token_url = profile.token_url().ok_or_else(|| AuthError::InvalidUrl {
            profile: profile.name.clone(),
            reason: format!("no token endpoint derivable from {:?}", profile.api_url),
        })?;

        let token = match profile.username.as_deref() {
            Some(username) => {
                let password = self.prompt.password(username)?;
                if password.is_empty() {
                    return Err(AuthError::PasswordRequired);
                }
                let grant = Grant::Password { username, password: &password };
                grant::exchange(&self.ctx.http, &token_url, profile, grant).await?
            }
            None => {
                grant::exchange(&self.ctx.http, &token_url, profile, Grant::ClientCredentials)
                    .await?
            }
        };

        info!(profile = %profile.name, expiry = ?token.expiry, "obtained new token");
        self.ctx.store.write(&profile.name, &token);
        Ok(token)
    }

    /// Drop the cached token so the next [`token`](Self::token) call re-authenticates.
    pub fn clear(&self) {
        self.ctx.store.clear(&self.ctx.profile.name);
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
