// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `brightbox events watch`: stream account events to stdout.

use std::sync::Arc;

use anyhow::Context as _;

use crate::context::Context;
use crate::token::prompt::PasswordPrompt;
use crate::token::TokenSource;
use crate::watch::EventWatcher;

pub async fn watch(ctx: Arc<Context>, prompt: Box<dyn PasswordPrompt>) -> anyhow::Result<()> {
    let profile = ctx.profile.name.clone();
    let tokens = Arc::new(TokenSource::new(Arc::clone(&ctx), prompt));
    let watcher = EventWatcher::new(ctx, tokens);
    let mut stdout = std::io::stdout();
    watcher.watch(&mut stdout).await.with_context(|| format!("watching events for {profile}"))
}
