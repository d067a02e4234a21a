// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `brightbox login`: password-grant login that saves a client profile.
//!
//! The profile is named after the email argument. `user@example.com/work`
//! logs in as `user@example.com` under a profile called `user@example.com/work`.

use std::sync::Arc;

use anyhow::Context as _;
use tracing::{info, warn};

use crate::api::{choose_default_account, ApiClient};
use crate::config::{Config, ConfigFile};
use crate::context::Context;
use crate::profile::CredentialProfile;
use crate::token::prompt::PasswordPrompt;
use crate::token::{TokenSource, TokenStore};

/// CLI arguments for `brightbox login`.
#[derive(Debug, Clone, clap::Args)]
pub struct LoginArgs {
    /// Your user's email address, optionally suffixed `/<name>` to keep
    /// several profiles for one user.
    pub email: String,
    /// URL of the Brightbox API.
    #[arg(long, default_value = "https://api.gb1.brightbox.com")]
    pub api_url: String,
    /// URL of the authentication endpoint (defaults to the API URL).
    #[arg(long)]
    pub auth_url: Option<String>,
    /// OAuth client identifier.
    #[arg(long, default_value = "app-12345")]
    pub client_id: String,
    /// OAuth client secret.
    #[arg(long, default_value = "mocbuipbiaa6k6c")]
    pub secret: String,
    /// Account to use by default with this profile.
    #[arg(long)]
    pub default_account: Option<String>,
}

/// Split `email[/suffix]` into (profile name, username).
pub fn split_login(email: &str) -> (String, String) {
    let username = email.split_once('/').map_or(email, |(user, _)| user);
    (email.to_owned(), username.to_owned())
}

pub async fn run(
    config: &Config,
    args: &LoginArgs,
    prompt: Box<dyn PasswordPrompt>,
) -> anyhow::Result<()> {
    let dir = config.config_dir();
    let mut file = ConfigFile::load(&dir)?;
    let (name, username) = split_login(&args.email);
    if username.is_empty() {
        anyhow::bail!("an email address is required");
    }

    let mut client = file.clients.get(&name).cloned().unwrap_or_default();
    client.client_id = args.client_id.clone();
    client.secret = args.secret.clone();
    client.api_url = args.api_url.clone();
    if let Some(ref auth_url) = args.auth_url {
        client.auth_url = Some(auth_url.clone());
    }
    client.username = Some(username.clone());
    if let Some(ref account) = args.default_account {
        client.default_account = Some(account.clone());
    }

    let profile = CredentialProfile::from_client(&name, &client);
    let ctx = Context::new(profile, TokenStore::new(&dir))?.with_policy(config.on_unauthorized);
    let ctx = Arc::new(ctx);
    let tokens = Arc::new(TokenSource::new(Arc::clone(&ctx), prompt));
    tokens.clear();
    tokens.token().await.with_context(|| format!("logging in as {username}"))?;

    if client.default_account.is_none() {
        let api = ApiClient::new(Arc::clone(&ctx), Arc::clone(&tokens));
        match api.accounts().await {
            Ok(accounts) => match choose_default_account(&accounts) {
                Some(account) => {
                    println!(
                        "Selected account \"{}\" ({}) as default account",
                        account.name, account.id
                    );
                    client.default_account = Some(account.id.clone());
                }
                None => warn!("no active accounts available to choose a default account"),
            },
            Err(e) => warn!(err = %format!("{e:#}"), "couldn't choose a default account"),
        }
    }

    file.clients.insert(name.clone(), client);
    if file.default_client.is_none() {
        file.default_client = Some(name.clone());
    }
    file.save(&dir)?;
    info!(profile = %name, "login saved");
    Ok(())
}

#[cfg(test)]
#[path = "login_tests.rs"]
mod tests;
