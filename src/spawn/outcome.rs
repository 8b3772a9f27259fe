// spawn-join: async subprocess completion
//
// SPDX-FileCopyrightText: 2026 The spawn-join Authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! The terminal outcome of a spawn request.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde_json::Value;

/// Accumulated output of one piped stream.
///
/// `Text` when the request asked for string output (decoded with the
/// default text encoding, UTF-8, lossily), `Binary` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Captured {
    Binary(Vec<u8>),
    Text(String),
}

impl Captured {
    pub(super) fn from_bytes(bytes: Vec<u8>, decode: bool) -> Self {
        if decode {
            Self::Text(String::from_utf8_lossy(&bytes).into_owned())
        } else {
            Self::Binary(bytes)
        }
    }

    /// Returns the raw captured bytes regardless of representation.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Binary(bytes) => bytes,
            Self::Text(text) => text.as_bytes(),
        }
    }

    /// Returns the decoded text, only if string output was requested.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Binary(_) => None,
            Self::Text(text) => Some(text),
        }
    }

    /// Returns the captured data as text, decoding lossily if needed.
    #[must_use]
    pub fn to_text_lossy(&self) -> Cow<'_, str> {
        match self {
            Self::Binary(bytes) => String::from_utf8_lossy(bytes),
            Self::Text(text) => Cow::Borrowed(text),
        }
    }

    /// Returns true if no data arrived on the stream.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// Terminal state of a completed spawn request.
///
/// Constructed exactly once, at the join point, and immutable thereafter.
/// The same record rides inside [`SpawnError`](crate::SpawnError) on the
/// failure paths, so both branches carry identical diagnostic fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    code: Option<i32>,
    signal: Option<i32>,
    stdout: Option<Captured>,
    stderr: Option<Captured>,
    extra: BTreeMap<String, Value>,
}

impl Outcome {
    pub(crate) const fn new(
        code: Option<i32>,
        signal: Option<i32>,
        stdout: Option<Captured>,
        stderr: Option<Captured>,
        extra: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            code,
            signal,
            stdout,
            stderr,
            extra,
        }
    }

    /// Exit code, if the process exited normally.
    #[must_use]
    pub const fn code(&self) -> Option<i32> {
        self.code
    }

    /// Terminating signal number, if the process was killed by one (unix).
    #[must_use]
    pub const fn signal(&self) -> Option<i32> {
        self.signal
    }

    /// Accumulated stdout. `None` when the slot was not piped; an empty
    /// capture when it was piped but silent.
    #[must_use]
    pub const fn stdout(&self) -> Option<&Captured> {
        self.stdout.as_ref()
    }

    /// Accumulated stderr. Same slot rules as [`Self::stdout`].
    #[must_use]
    pub const fn stderr(&self) -> Option<&Captured> {
        self.stderr.as_ref()
    }

    /// Caller-supplied extra fields, merged verbatim on every branch.
    #[must_use]
    pub const fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    /// Looks up one extra field.
    #[must_use]
    pub fn extra_value(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// True only for a clean exit: code 0 and no signal. A degenerate
    /// termination with neither code nor signal counts as failure.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0)) && self.signal.is_none()
    }
}
