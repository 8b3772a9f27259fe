// spawn-join: async subprocess completion
//
// SPDX-FileCopyrightText: 2026 The spawn-join Authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Stdio slot descriptors.
//!
//! ```text
//! StdioSpec { stdin, stdout, stderr }
//!   uniform: piped() / inherit() / null()
//!   per-slot: slots() / with_stdin() / with_stdout() / with_stderr()
//!
//! StdioSlot: Piped | Inherit | Null | Handle(Stdio)
//!   only Piped slots are owned (read/written) by this crate;
//!   every other slot surfaces as `None` in the outcome.
//! ```

use std::process::Stdio;

/// Configuration for one stdio slot of the child process.
#[derive(Debug, Default)]
pub enum StdioSlot {
    /// A local pipe owned by this crate. Output slots are accumulated into
    /// the outcome; the stdin slot is exposed for writing.
    #[default]
    Piped,
    /// Connected directly to the parent's equivalent stream.
    Inherit,
    /// Discarded (the bit bucket).
    Null,
    /// A pre-existing stream or descriptor, handed through unmodified.
    Handle(Stdio),
}

impl StdioSlot {
    /// Wraps an open file, pipe end, or other descriptor as a slot.
    pub fn handle(stdio: impl Into<Stdio>) -> Self {
        Self::Handle(stdio.into())
    }

    /// Returns true if this slot is a locally owned pipe.
    #[must_use]
    pub const fn is_piped(&self) -> bool {
        matches!(self, Self::Piped)
    }

    fn into_stdio(self) -> Stdio {
        match self {
            Self::Piped => Stdio::piped(),
            Self::Inherit => Stdio::inherit(),
            Self::Null => Stdio::null(),
            Self::Handle(stdio) => stdio,
        }
    }
}

/// The full 3-slot stdio descriptor for a spawn request.
///
/// Resolved once at spawn time; the join logic never re-inspects the
/// configuration, only the per-slot piped flags derived from it.
#[derive(Debug, Default)]
pub struct StdioSpec {
    stdin: StdioSlot,
    stdout: StdioSlot,
    stderr: StdioSlot,
}

impl StdioSpec {
    /// All three slots piped. This is the default.
    #[must_use]
    pub fn piped() -> Self {
        Self::default()
    }

    /// All three slots inherited from the parent.
    #[must_use]
    pub const fn inherit() -> Self {
        Self::slots(StdioSlot::Inherit, StdioSlot::Inherit, StdioSlot::Inherit)
    }

    /// All three slots discarded.
    #[must_use]
    pub const fn null() -> Self {
        Self::slots(StdioSlot::Null, StdioSlot::Null, StdioSlot::Null)
    }

    /// Per-slot configuration, in (stdin, stdout, stderr) order.
    #[must_use]
    pub const fn slots(stdin: StdioSlot, stdout: StdioSlot, stderr: StdioSlot) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
        }
    }

    /// Replaces the stdin slot.
    #[must_use]
    pub fn with_stdin(mut self, slot: StdioSlot) -> Self {
        self.stdin = slot;
        self
    }

    /// Replaces the stdout slot.
    #[must_use]
    pub fn with_stdout(mut self, slot: StdioSlot) -> Self {
        self.stdout = slot;
        self
    }

    /// Replaces the stderr slot.
    #[must_use]
    pub fn with_stderr(mut self, slot: StdioSlot) -> Self {
        self.stderr = slot;
        self
    }

    /// Returns true if the stdin slot is a locally owned pipe.
    #[must_use]
    pub const fn stdin_is_piped(&self) -> bool {
        self.stdin.is_piped()
    }

    /// Returns true if the stdout slot is a locally owned pipe.
    #[must_use]
    pub const fn stdout_is_piped(&self) -> bool {
        self.stdout.is_piped()
    }

    /// Returns true if the stderr slot is a locally owned pipe.
    #[must_use]
    pub const fn stderr_is_piped(&self) -> bool {
        self.stderr.is_piped()
    }

    pub(super) fn force_piped_stdin(&mut self) {
        self.stdin = StdioSlot::Piped;
    }

    pub(super) fn into_parts(self) -> (Stdio, Stdio, Stdio) {
        (
            self.stdin.into_stdio(),
            self.stdout.into_stdio(),
            self.stderr.into_stdio(),
        )
    }
}
