// spawn-join: async subprocess completion
//
// SPDX-FileCopyrightText: 2026 The spawn-join Authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Spawn request builder.
//!
//! ```text
//! SpawnBuilder::new("cat")
//!   .args() .cwd() .env() .uid()/.gid()
//!   .stdio() .stdio_string() .input() .extra()
//!   .spawn()  --> Spawned (live handle, then .await)
//!   .run()    --> Outcome directly
//! ```

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::stdio::StdioSpec;

/// Builder for configuring and launching a subprocess.
///
/// Everything beyond the stdio descriptor and the string-output flag is
/// forwarded untouched to the launcher; this crate does no PATH lookup,
/// shell quoting, or argument interpretation.
#[derive(Debug)]
pub struct SpawnBuilder {
    /// Executable identifier (path or bare name, resolved by the OS)
    program: PathBuf,
    /// Command-line arguments
    args: Vec<String>,
    /// Working directory
    cwd: Option<PathBuf>,
    /// Environment additions, applied in insertion order
    envs: Vec<(String, String)>,
    /// Start from an empty environment
    env_clear: bool,
    /// User id for the child (unix)
    #[cfg(unix)]
    uid: Option<u32>,
    /// Group id for the child (unix)
    #[cfg(unix)]
    gid: Option<u32>,
    /// Stdio descriptor, resolved once at spawn
    stdio: StdioSpec,
    /// Decode accumulated output to text instead of raw bytes
    stdio_string: bool,
    /// Payload written to stdin by a background task, then closed
    input: Option<Vec<u8>>,
    /// Caller metadata merged verbatim into every outcome
    extra: BTreeMap<String, Value>,
}

impl SpawnBuilder {
    /// Creates a new `SpawnBuilder` for the given program.
    ///
    /// The program can be an absolute path, relative path, or a bare
    /// executable name left to the OS to resolve.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
            envs: Vec::new(),
            env_clear: false,
            #[cfg(unix)]
            uid: None,
            #[cfg(unix)]
            gid: None,
            stdio: StdioSpec::default(),
            stdio_string: false,
            input: None,
            extra: BTreeMap::new(),
        }
    }

    /// Adds an argument to the command.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Adds multiple arguments to the command.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string_lossy().into_owned());
        }
        self
    }

    /// Sets the working directory for the process.
    #[must_use]
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds one environment variable for the process.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Adds multiple environment variables for the process.
    #[must_use]
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in vars {
            self.envs.push((key.into(), value.into()));
        }
        self
    }

    /// Clears the inherited environment before applying additions.
    #[must_use]
    pub const fn env_clear(mut self) -> Self {
        self.env_clear = true;
        self
    }

    /// Sets the user id the child runs as.
    #[cfg(unix)]
    #[must_use]
    pub const fn uid(mut self, uid: u32) -> Self {
        self.uid = Some(uid);
        self
    }

    /// Sets the group id the child runs as.
    #[cfg(unix)]
    #[must_use]
    pub const fn gid(mut self, gid: u32) -> Self {
        self.gid = Some(gid);
        self
    }

    /// Sets the full stdio descriptor.
    #[must_use]
    pub fn stdio(mut self, spec: StdioSpec) -> Self {
        self.stdio = spec;
        self
    }

    /// Convenience: inherit all three stdio streams from the parent. The
    /// outcome's stdout and stderr are then `None`.
    #[must_use]
    pub fn inherit_stdio(mut self) -> Self {
        self.stdio = StdioSpec::inherit();
        self
    }

    /// Convenience: discard all output.
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.stdio = StdioSpec::null();
        self
    }

    /// When true, accumulated output is decoded to text with the default
    /// text encoding instead of being kept as raw bytes.
    #[must_use]
    pub const fn stdio_string(mut self, yes: bool) -> Self {
        self.stdio_string = yes;
        self
    }

    /// Sets a stdin payload, written by a background task and then closed.
    /// Forces the stdin slot to piped.
    #[must_use]
    pub fn input(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.input = Some(payload.into());
        self
    }

    /// Adds one extra field, merged verbatim into the outcome on every
    /// branch. Keys must not collide with the reserved outcome fields
    /// (code, signal, stdout, stderr); collisions are not validated here.
    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Adds multiple extra fields.
    #[must_use]
    pub fn extras<I, K>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (key, value) in fields {
            self.extra.insert(key.into(), value);
        }
        self
    }

    // Getters for field access within the spawn module

    /// Returns a reference to the program path.
    #[must_use]
    pub const fn program(&self) -> &PathBuf {
        &self.program
    }

    /// Returns a slice of the arguments.
    pub(super) fn args_slice(&self) -> &[String] {
        &self.args
    }

    /// Returns a reference to the working directory, if set.
    pub(super) const fn working_dir(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    /// Returns the environment additions.
    pub(super) fn env_pairs(&self) -> &[(String, String)] {
        &self.envs
    }

    /// Returns whether the inherited environment is cleared first.
    pub(super) const fn clears_env(&self) -> bool {
        self.env_clear
    }

    /// Returns the configured user id, if set.
    #[cfg(unix)]
    pub(super) const fn uid_value(&self) -> Option<u32> {
        self.uid
    }

    /// Returns the configured group id, if set.
    #[cfg(unix)]
    pub(super) const fn gid_value(&self) -> Option<u32> {
        self.gid
    }

    /// Returns a reference to the stdio descriptor.
    pub(super) const fn stdio_spec(&self) -> &StdioSpec {
        &self.stdio
    }

    /// Returns a mutable reference to the stdio descriptor.
    pub(super) const fn stdio_spec_mut(&mut self) -> &mut StdioSpec {
        &mut self.stdio
    }

    /// Takes the stdio descriptor, leaving the default in place.
    pub(super) fn take_stdio(&mut self) -> StdioSpec {
        std::mem::take(&mut self.stdio)
    }

    /// Returns whether output is decoded to text.
    pub(super) const fn stdio_string_flag(&self) -> bool {
        self.stdio_string
    }

    /// Returns whether a stdin payload is configured.
    pub(super) const fn has_input(&self) -> bool {
        self.input.is_some()
    }

    /// Takes the stdin payload, if configured.
    pub(super) fn take_input(&mut self) -> Option<Vec<u8>> {
        self.input.take()
    }

    /// Takes the extra-fields map.
    pub(super) fn take_extra(&mut self) -> BTreeMap<String, Value> {
        std::mem::take(&mut self.extra)
    }
}
