// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `brightbox token`: inspect and clear the cached OAuth token.

use std::sync::Arc;

use anyhow::Context as _;
use clap::{Subcommand, ValueEnum};

use crate::context::Context;
use crate::token::prompt::PasswordPrompt;
use crate::token::{Token, TokenSource};

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum TokenCommand {
    /// Print a valid token, fetching a new one when needed.
    Create {
        /// Discard any cached token first.
        #[arg(long)]
        clear: bool,
        /// Output format.
        #[arg(long, value_enum, default_value = "text")]
        format: TokenFormat,
    },
    /// Remove the cached token for the selected client.
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TokenFormat {
    Text,
    Json,
    /// A ready-to-run curl command against the API.
    Curl,
}

pub async fn run(
    ctx: Arc<Context>,
    command: TokenCommand,
    prompt: Box<dyn PasswordPrompt>,
) -> anyhow::Result<()> {
    let api_url = ctx.profile.api_url.clone();
    let tokens = TokenSource::new(ctx, prompt);
    match command {
        TokenCommand::Clear => {
            tokens.clear();
            Ok(())
        }
        TokenCommand::Create { clear, format } => {
            if clear {
                tokens.clear();
            }
            let token = tokens.token().await.context("obtaining token")?;
            print!("{}", format_token(&token, format, &api_url)?);
            Ok(())
        }
    }
}

pub fn format_token(token: &Token, format: TokenFormat, api_url: &str) -> anyhow::Result<String> {
    Ok(match format {
        TokenFormat::Text => {
            let expiry = token.expiry.map(|e| e.to_rfc3339()).unwrap_or_else(|| "-".to_owned());
            format!(
                "{:<14}{}\n{:<14}{}\n{:<14}{}\n",
                "access_token", token.access_token, "token_type", token.token_type, "expiry", expiry,
            )
        }
        TokenFormat::Json => format!("{}\n", serde_json::to_string_pretty(token)?),
        TokenFormat::Curl => {
            format!("curl -H 'Authorization: Bearer {}' {api_url}\n", token.access_token)
        }
    })
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
