// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interactive password entry for the password grant.

use std::io::{self, BufRead, IsTerminal, Write};
use std::os::fd::AsFd;

use nix::sys::termios::{self, LocalFlags, SetArg, Termios};

/// Source of the user's password.
pub trait PasswordPrompt: Send + Sync {
    fn password(&self, username: &str) -> io::Result<String>;
}

/// Prompts on stderr and reads a line from stdin, with echo disabled when
/// stdin is a terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl PasswordPrompt for TerminalPrompt {
    fn password(&self, username: &str) -> io::Result<String> {
        let mut stderr = io::stderr();
        write!(stderr, "Password for {username}: ")?;
        stderr.flush()?;

        let stdin = io::stdin();
        let mut line = String::new();
        if stdin.is_terminal() {
            let _echo = EchoGuard::disable()?;
            stdin.lock().read_line(&mut line)?;
            writeln!(stderr)?;
        } else {
            stdin.lock().read_line(&mut line)?;
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }
}

/// RAII guard that restores terminal echo on drop.
struct EchoGuard {
    original: Termios,
}

impl EchoGuard {
    fn disable() -> io::Result<Self> {
        let stdin = io::stdin();
        let original = termios::tcgetattr(stdin.as_fd())?;
        let mut silent = original.clone();
        silent.local_flags.remove(LocalFlags::ECHO);
        termios::tcsetattr(stdin.as_fd(), SetArg::TCSANOW, &silent)?;
        Ok(Self { original })
    }
}

impl Drop for EchoGuard {
    fn drop(&mut self) {
        let _ = termios::tcsetattr(io::stdin().as_fd(), SetArg::TCSANOW, &self.original);
    }
}
