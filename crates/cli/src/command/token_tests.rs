// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{TimeZone, Utc};

use super::{format_token, TokenFormat};
use crate::token::Token;

fn token() -> Token {
    Token {
        access_token: "abc123".to_owned(),
        token_type: "Bearer".to_owned(),
        expiry: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single(),
        refresh_token: None,
    }
}

#[test]
fn text_format() -> anyhow::Result<()> {
    let out = format_token(&token(), TokenFormat::Text, "https://api.gb1.brightbox.com")?;
    assert_eq!(
        out,
        "access_token  abc123\ntoken_type    Bearer\nexpiry        2026-03-01T12:00:00+00:00\n"
    );
    Ok(())
}

#[test]
fn text_format_without_expiry() -> anyhow::Result<()> {
    let mut t = token();
    t.expiry = None;
    let out = format_token(&t, TokenFormat::Text, "https://api.gb1.brightbox.com")?;
    assert!(out.ends_with("expiry        -\n"), "{out}");
    Ok(())
}

#[test]
fn json_format_matches_cache_shape() -> anyhow::Result<()> {
    let out = format_token(&token(), TokenFormat::Json, "https://api.gb1.brightbox.com")?;
    let parsed: Token = serde_json::from_str(&out)?;
    assert_eq!(parsed, token());
    assert!(out.contains("\"accessToken\""));
    Ok(())
}

#[test]
fn curl_format() -> anyhow::Result<()> {
    let out = format_token(&token(), TokenFormat::Curl, "https://api.gb1.brightbox.com")?;
    assert_eq!(out, "curl -H 'Authorization: Bearer abc123' https://api.gb1.brightbox.com\n");
    Ok(())
}
