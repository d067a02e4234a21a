// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

pub mod api;
pub mod bayeux;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
#[cfg(test)]
mod mock_server;
pub mod persist;
pub mod profile;
pub mod test_support;
pub mod token;
pub mod watch;

use std::sync::{Arc, Once};

use config::{Command, Config, EventsCommand};
use context::Context;
use token::prompt::TerminalPrompt;

static CRYPTO_INIT: Once = Once::new();

/// Install the rustls crypto provider (needed for reqwest even on plain HTTP).
pub fn ensure_crypto_provider() {
    CRYPTO_INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Dispatch a parsed command line.
pub async fn run(config: Config) -> anyhow::Result<()> {
    match &config.command {
        Command::Login(args) => {
            command::login::run(&config, args, Box::new(TerminalPrompt)).await
        }
        Command::Token { command } => {
            let ctx = Arc::new(Context::from_config(&config)?);
            command::token::run(ctx, *command, Box::new(TerminalPrompt)).await
        }
        Command::Events { command: EventsCommand::Watch } => {
            let ctx = Arc::new(Context::from_config(&config)?);
            command::events::watch(ctx, Box::new(TerminalPrompt)).await
        }
    }
}
