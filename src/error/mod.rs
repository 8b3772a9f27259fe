// spawn-join: async subprocess completion
//
// SPDX-FileCopyrightText: 2026 The spawn-join Authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              SpawnError
//!                  |
//!        +---------+---------+
//!        v         v         v
//!     Launch    Stream     Failed
//!   never ran  pipe fault  non-zero code / signal
//!   OS message stream msg  fixed "command failed"
//!
//! Every variant carries a Box<Outcome>: diagnostics and caller-supplied
//! extra fields ride along on every failure path, same as on success.
//! ```

use std::fmt;

use thiserror::Error;

use crate::spawn::outcome::Outcome;

/// Result type using [`SpawnError`].
pub type Result<T> = std::result::Result<T, SpawnError>;

/// Identifies one of the three stdio streams in stream-level faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamName {
    Stdin,
    Stdout,
    Stderr,
}

impl StreamName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdin => "stdin",
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

impl fmt::Display for StreamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure of a spawn request.
///
/// Outcomes are boxed to keep the enum small on the stack.
#[derive(Debug, Error)]
pub enum SpawnError {
    /// The executable never started (or could not be monitored). The
    /// display is the launcher's error message, verbatim.
    #[error("{source}")]
    Launch {
        source: std::io::Error,
        outcome: Box<Outcome>,
    },

    /// A piped stream faulted mid-run, independent of process state. The
    /// display is that stream's error message, verbatim.
    #[error("{source}")]
    Stream {
        stream: StreamName,
        source: std::io::Error,
        outcome: Box<Outcome>,
    },

    /// The process terminated with a non-zero code, on a signal, or with
    /// neither reported. The message is fixed; callers must inspect
    /// code/signal/stdout/stderr on the outcome for diagnostics.
    #[error("command failed")]
    Failed { outcome: Box<Outcome> },
}

impl SpawnError {
    /// Diagnostic fields for this failure. Populated on every variant;
    /// launch failures carry empty piped buffers and no code or signal.
    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        match self {
            Self::Launch { outcome, .. }
            | Self::Stream { outcome, .. }
            | Self::Failed { outcome } => outcome,
        }
    }

    /// Consumes the error, yielding the diagnostic fields.
    #[must_use]
    pub fn into_outcome(self) -> Outcome {
        match self {
            Self::Launch { outcome, .. }
            | Self::Stream { outcome, .. }
            | Self::Failed { outcome } => *outcome,
        }
    }

    /// The faulted stream, for [`SpawnError::Stream`] failures.
    #[must_use]
    pub const fn stream(&self) -> Option<StreamName> {
        match self {
            Self::Stream { stream, .. } => Some(*stream),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests;
