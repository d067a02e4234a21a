// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI subcommands: `events`, `token`, `login`.

pub mod events;
pub mod login;
pub mod token;
