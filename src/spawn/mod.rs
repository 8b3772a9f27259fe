// spawn-join: async subprocess completion
//
// SPDX-FileCopyrightText: 2026 The spawn-join Authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning with a full-completion join.
//!
//! ```text
//! SpawnBuilder::new("grep")
//!   .args() .cwd() .env() .stdio() .extra()
//!   .spawn()
//!       --> Spawned (stdin, pid, kill, canceller)
//!       --> .await joins exit + stdout EOF + stderr EOF
//!       --> Outcome { code, signal, stdout, stderr, extra }
//! ```

pub mod builder;
mod io;
pub mod outcome;
pub mod runner;
pub mod stdio;
#[cfg(test)]
mod tests;
