// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live account event watch: token → socket → subscribe → rendered lines.

use std::io::Write;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::bayeux::{Message, Payload, Session, Transport, WsTransport};
use crate::context::Context;
use crate::error::WatchError;
use crate::event;
use crate::token::{Token, TokenSource};

pub struct EventWatcher {
    ctx: Arc<Context>,
    tokens: Arc<TokenSource>,
    api: ApiClient,
}

impl EventWatcher {
    pub fn new(ctx: Arc<Context>, tokens: Arc<TokenSource>) -> Self {
        let api = ApiClient::new(Arc::clone(&ctx), Arc::clone(&tokens));
        Self { ctx, tokens, api }
    }

    /// Connect to the region's event stream and write one line per event to
    /// `sink` until the server closes the connection or a fatal error occurs.
    pub async fn watch<W: Write>(&self, sink: &mut W) -> Result<(), WatchError> {
        let url = self.ctx.events_url().ok_or_else(|| {
            WatchError::Connect(format!(
                "cannot derive an events url from {}; pass --events-url",
                self.ctx.profile.api_url
            ))
        })?;
        let token = self.tokens.token().await?;
        info!(profile = %self.ctx.profile.name, url, "connecting to event stream");
        let transport = WsTransport::connect(&url).await?;
        self.run(transport, &token, sink).await
    }

    /// Drive a session over an already-open transport.
    pub async fn run<T: Transport, W: Write>(
        &self,
        transport: T,
        token: &Token,
        sink: &mut W,
    ) -> Result<(), WatchError> {
        let mut session = Session::new(transport);

        let account = async { self.api.account_id().await.map_err(WatchError::Account) };
        let (account_id, _) = tokio::try_join!(account, session.handshake())?;

        let topic = format!("/account/{account_id}");
        session.subscribe(&topic, &token.access_token).await?;

        let revoked = self.ctx.revoked();
        let result = loop {
            let next = tokio::select! {
                biased;
                _ = revoked.cancelled() => Err(WatchError::Revoked),
                next = session.next_message() => next,
            };
            match next {
                Ok(Some(message)) => {
                    if let Err(e) = emit(&message, sink) {
                        break Err(e);
                    }
                }
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        if let Err(ref e) = result {
            if e.is_auth_failure() && !matches!(e, WatchError::Revoked) {
                self.ctx.reject_token();
            }
        }
        result
    }
}

/// Render one data message to `sink`. Undecodable payloads are skipped.
fn emit<W: Write>(message: &Message, sink: &mut W) -> Result<(), WatchError> {
    let raw = message.data.as_ref().map_or("", Payload::get);
    let event = match event::decode(raw.as_bytes()) {
        Ok(event) => event,
        Err(e) => {
            warn!(channel = %message.channel, err = %e, "skipping event");
            return Ok(());
        }
    };
    debug!(event = %event.id, "event");
    writeln!(sink, "{}", event::render(&event, raw))
        .and_then(|()| sink.flush())
        .map_err(|e| WatchError::Io(format!("writing event: {e}")))
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
