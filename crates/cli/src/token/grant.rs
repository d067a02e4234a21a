// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OAuth2 grant exchanges against the token endpoint.

use chrono::Utc;
use reqwest::Url;

use super::{Token, TokenResponse};
use crate::error::AuthError;
use crate::profile::CredentialProfile;

/// Which grant to request.
#[derive(Debug, Clone, Copy)]
pub enum Grant<'a> {
    ClientCredentials,
    Password { username: &'a str, password: &'a str },
}

impl Grant<'_> {
    fn form(&self) -> Vec<(&str, &str)> {
        match *self {
            Self::ClientCredentials => vec![("grant_type", "client_credentials")],
            Self::Password { username, password } => vec![
                ("grant_type", "password"),
                ("username", username),
                ("password", password),
            ],
        }
    }
}

/// Perform a single grant request. The client id and secret travel as HTTP
/// basic auth. No retries: a failure goes straight back to the caller.
pub async fn exchange(
    http: &reqwest::Client,
    token_url: &Url,
    profile: &CredentialProfile,
    grant: Grant<'_>,
) -> Result<Token, AuthError> {
    let url = token_url.to_string();
    let resp = http
        .post(token_url.clone())
        .basic_auth(&profile.client_id, Some(&profile.client_secret))
        .form(&grant.form())
        .send()
        .await
        .map_err(|source| AuthError::Request { url: url.clone(), source })?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(AuthError::Rejected { url, status: status.as_u16(), body });
    }

    let body: TokenResponse =
        resp.json().await.map_err(|source| AuthError::Request { url, source })?;
    if body.access_token.is_empty() {
        return Err(AuthError::EmptyToken);
    }
    Ok(Token::from_response(body, Utc::now()))
}

#[cfg(test)]
#[path = "grant_tests.rs"]
mod tests;
