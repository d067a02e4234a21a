// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::command::login::LoginArgs;
use crate::command::token::TokenCommand;
use crate::persist::write_atomic;
use crate::profile::CredentialProfile;

/// What a running watch does when another component has the bearer token
/// rejected by the API.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnauthorizedPolicy {
    /// End the watch with an error; the next run authenticates afresh.
    #[default]
    TearDown,
    /// Keep streaming; only the token cache is cleared.
    Continue,
}

/// Command-line client for the Brightbox cloud API.
#[derive(Debug, Parser)]
#[command(name = "brightbox", version, about)]
pub struct Config {
    /// Client profile to use (defaults to the config file's default client).
    #[arg(long, global = true, env = "BRIGHTBOX_CLIENT")]
    pub client: Option<String>,

    /// Account id to act on.
    #[arg(long, global = true, env = "BRIGHTBOX_ACCOUNT")]
    pub account: Option<String>,

    /// Directory holding config.json and cached tokens (default: ~/.brightbox).
    #[arg(long, global = true, env = "BRIGHTBOX_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Event stream URL override (default: wss://events.<region>/stream).
    #[arg(long, global = true, env = "BRIGHTBOX_EVENTS_URL")]
    pub events_url: Option<String>,

    /// Reaction of a running watch to a token rejected elsewhere.
    #[arg(
        long,
        global = true,
        value_enum,
        env = "BRIGHTBOX_ON_UNAUTHORIZED",
        default_value = "tear-down"
    )]
    pub on_unauthorized: UnauthorizedPolicy,

    /// Log format (json or text).
    #[arg(long, global = true, env = "BRIGHTBOX_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, env = "BRIGHTBOX_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Live account events.
    Events {
        #[command(subcommand)]
        command: EventsCommand,
    },
    /// Manage the cached OAuth token.
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },
    /// Authenticate with a user's email and password and save the client.
    Login(LoginArgs),
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum EventsCommand {
    /// Print account events as they happen, one line each.
    Watch,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        match self.log_format.as_str() {
            "json" | "text" => {}
            other => anyhow::bail!("invalid log format: {other} (expected json or text)"),
        }
        if let Some(ref url) = self.events_url {
            if !url.starts_with("ws://") && !url.starts_with("wss://") {
                anyhow::bail!("--events-url must be a ws:// or wss:// URL, got {url}");
            }
        }
        if matches!(self.client.as_deref(), Some("")) {
            anyhow::bail!("--client must not be empty");
        }
        Ok(())
    }

    /// Resolved configuration directory.
    pub fn config_dir(&self) -> PathBuf {
        match self.config_dir {
            Some(ref dir) => dir.clone(),
            None => default_config_dir(),
        }
    }
}

/// `$HOME/.brightbox`, or `.brightbox` in the working directory without a home.
pub fn default_config_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(".brightbox"),
        _ => PathBuf::from(".brightbox"),
    }
}

/// On-disk client configuration (`<config_dir>/config.json`).
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_client: Option<String>,
    #[serde(default)]
    pub clients: BTreeMap<String, ClientConfig>,
}

/// One named API client.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub client_id: String,
    pub secret: String,
    pub api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_account: Option<String>,
}

impl ConfigFile {
    pub fn path(dir: &Path) -> PathBuf {
        dir.join("config.json")
    }

    /// Load the config file. A missing file is an empty config.
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let path = Self::path(dir);
        let contents = match std::fs::read(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => anyhow::bail!("failed to read {}: {e}", path.display()),
        };
        serde_json::from_slice(&contents)
            .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))
    }

    pub fn save(&self, dir: &Path) -> anyhow::Result<()> {
        let path = Self::path(dir);
        let json = serde_json::to_vec_pretty(self)?;
        write_atomic(&path, &json)
            .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))
    }

    /// Resolve the named client, or the default client when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> anyhow::Result<CredentialProfile> {
        let name = match name.or(self.default_client.as_deref()) {
            Some(n) => n,
            None => anyhow::bail!("no client selected: pass --client or run `brightbox login`"),
        };
        let client = self
            .clients
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("client {name:?} not found in config"))?;
        Ok(CredentialProfile::from_client(name, client))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
