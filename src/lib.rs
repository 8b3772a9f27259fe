// spawn-join: async subprocess completion
//
// SPDX-FileCopyrightText: 2026 The spawn-join Authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!        SpawnBuilder
//!   program, args, cwd, env
//!   uid/gid, stdio, extra fields
//!          |
//!          v
//!       spawn()
//!   tokio::process::Command
//!   launch error --> SpawnError::Launch
//!          |
//!          v
//!        Spawned         live handle: stdin, pid, kill, canceller
//!   eager reader tasks
//!          |
//!          v  .await / wait()
//!      join loop
//!   exit + stdout EOF + stderr EOF
//!   stream fault --> SpawnError::Stream
//!          |
//!          v
//!       Outcome
//!   { code, signal, stdout, stderr, extra }
//!   code 0, no signal --> Ok
//!   otherwise        --> SpawnError::Failed
//! ```

pub mod error;
pub mod spawn;

pub use error::{Result, SpawnError, StreamName};
pub use spawn::builder::SpawnBuilder;
pub use spawn::outcome::{Captured, Outcome};
pub use spawn::runner::Spawned;
pub use spawn::stdio::{StdioSlot, StdioSpec};
