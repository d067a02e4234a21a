// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk token cache, one file per profile.
//!
//! Every failure here is logged and swallowed: a broken cache only costs a
//! fresh grant on the next run. Tokens written in this process are also held
//! in memory, so an unwritable cache directory never forces a second grant
//! within one invocation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use super::Token;
use crate::persist::write_atomic;

#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
    memory: Arc<Mutex<HashMap<String, Token>>>,
}

impl TokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), memory: Arc::default() }
    }

    fn memory(&self) -> MutexGuard<'_, HashMap<String, Token>> {
        self.memory.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<key>.oauth_token.json`, with path separators in `key` replaced.
    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.oauth_token.json", sanitize_key(key)))
    }

    /// Cached token for `key`, if present and still valid. Expired entries
    /// are removed.
    pub fn read(&self, key: &str) -> Option<Token> {
        let held = self.memory().get(key).cloned();
        if let Some(token) = held {
            if token.is_valid() {
                return Some(token);
            }
            debug!(key, "cached token expired");
            self.clear(key);
            return None;
        }

        let path = self.path(key);
        let contents = match std::fs::read(&path) {
            Ok(c) => c,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    debug!(path = %path.display(), err = %e, "token cache unreadable");
                }
                return None;
            }
        };
        let token: Token = match serde_json::from_slice(&contents) {
            Ok(t) => t,
            Err(e) => {
                debug!(path = %path.display(), err = %e, "ignoring malformed token cache");
                return None;
            }
        };
        if !token.is_valid() {
            debug!(key, "cached token expired");
            self.clear(key);
            return None;
        }
        Some(token)
    }

    pub fn write(&self, key: &str, token: &Token) {
        self.memory().insert(key.to_owned(), token.clone());
        let path = self.path(key);
        let result = serde_json::to_vec_pretty(token)
            .map_err(std::io::Error::from)
            .and_then(|json| write_atomic(&path, &json));
        match result {
            Ok(()) => debug!(path = %path.display(), "token cached"),
            Err(e) => warn!(path = %path.display(), err = %e, "failed to cache token"),
        }
    }

    pub fn clear(&self, key: &str) {
        self.memory().remove(key);
        let path = self.path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "token cache cleared"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), err = %e, "failed to clear token cache"),
        }
    }
}

fn sanitize_key(key: &str) -> String {
    key.chars().map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c }).collect()
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
