// spawn-join: async subprocess completion
//
// SPDX-FileCopyrightText: 2026 The spawn-join Authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process launch and the exit/close join.
//!
//! ```text
//! spawn()
//!   build_command()   args, cwd, env, uid/gid, stdio
//!   Command::spawn()  error --> SpawnError::Launch, no join
//!   eager reader/writer tasks
//!        |
//!        v
//! Spawned::wait()  (or .await)
//!   select loop:
//!     child exit        --> exit flag
//!     stdout reader EOF --> stdout-ended flag
//!     stderr reader EOF --> stderr-ended flag
//!     reader/writer fault --> immediate SpawnError::Stream
//!     cancellation      --> start_kill, ordinary join continues
//!   joined when exit observed and no reader remains
//!        |
//!        v
//!   Outcome  { code, signal, stdout, stderr, extra }
//! ```

use std::collections::BTreeMap;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::process::ExitStatus;

use serde_json::Value;
use tokio::process::{Child, ChildStdin, Command};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::builder::SpawnBuilder;
use super::io::{spawn_capture, spawn_input_writer};
use super::outcome::{Captured, Outcome};
use crate::error::{Result, SpawnError, StreamName};

impl SpawnBuilder {
    /// Returns the full command line as a string (for logging).
    fn command_line(&self) -> String {
        use std::fmt::Write as _;
        let mut cmd = format!("{}", self.program().display());
        for arg in self.args_slice() {
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Launches the process and returns the live [`Spawned`] handle.
    ///
    /// The handle is available synchronously: callers can write to stdin or
    /// terminate the process before awaiting the outcome. Accumulation of
    /// piped output starts here, not at await time.
    ///
    /// # Errors
    ///
    /// Returns [`SpawnError::Launch`] if the executable could not be
    /// started at all; the error carries the launcher's message verbatim
    /// plus an outcome with empty piped buffers and the extra fields.
    pub fn spawn(mut self) -> Result<Spawned> {
        if self.has_input() {
            self.stdio_spec_mut().force_piped_stdin();
        }

        let cmd_line = self.command_line();
        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let stdout_piped = self.stdio_spec().stdout_is_piped();
        let stderr_piped = self.stdio_spec().stderr_is_piped();
        let stdio_string = self.stdio_string_flag();
        let input = self.take_input();
        let extra = self.take_extra();

        let mut command = self.build_command();
        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(source) => {
                warn!(cmd = %cmd_line, error = %source, "launch failed");
                return Err(SpawnError::Launch {
                    source,
                    outcome: Box::new(Outcome::new(
                        None,
                        None,
                        captured(stdout_piped, None, stdio_string),
                        captured(stderr_piped, None, stdio_string),
                        extra,
                    )),
                });
            }
        };

        let pid = child.id();
        trace!(pid = ?pid, "spawned");

        let stdout_task = child
            .stdout
            .take()
            .map(|stream| spawn_capture(stream, StreamName::Stdout));
        let stderr_task = child
            .stderr
            .take()
            .map(|stream| spawn_capture(stream, StreamName::Stderr));

        let mut stdin = child.stdin.take();
        let stdin_task =
            input.and_then(|payload| stdin.take().map(|pipe| spawn_input_writer(pipe, payload)));

        Ok(Spawned {
            child,
            stdin,
            pid,
            cancel: CancellationToken::new(),
            stdout_task,
            stderr_task,
            stdin_task,
            stdout_piped,
            stderr_piped,
            stdio_string,
            extra,
        })
    }

    /// Spawns the process and waits for the full outcome.
    ///
    /// Convenience for callers that do not need the live handle.
    ///
    /// # Errors
    ///
    /// See [`SpawnBuilder::spawn`] and [`Spawned::wait`].
    pub async fn run(self) -> Result<Outcome> {
        self.spawn()?.wait().await
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&mut self) -> Command {
        let mut command = Command::new(self.program());
        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        if self.clears_env() {
            command.env_clear();
        }
        for (key, value) in self.env_pairs() {
            command.env(key, value);
        }

        #[cfg(unix)]
        {
            if let Some(uid) = self.uid_value() {
                command.uid(uid);
            }
            if let Some(gid) = self.gid_value() {
                command.gid(gid);
            }
        }

        let (stdin, stdout, stderr) = self.take_stdio().into_parts();
        command.stdin(stdin);
        command.stdout(stdout);
        command.stderr(stderr);

        // Safety net for handles dropped without awaiting
        command.kill_on_drop(true);

        command
    }
}

/// A launched process plus its eventual outcome.
///
/// The dual-interface value of this crate: awaiting it (or calling
/// [`Spawned::wait`]) resolves exactly once with the [`Outcome`], while the
/// plain accessors expose the live process in the meantime: [`Spawned::id`],
/// [`Spawned::stdin`] / [`Spawned::take_stdin`], [`Spawned::kill`], and
/// [`Spawned::canceller`] for terminating while an await is in flight.
#[derive(Debug)]
pub struct Spawned {
    child: Child,
    stdin: Option<ChildStdin>,
    pid: Option<u32>,
    cancel: CancellationToken,
    stdout_task: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    stderr_task: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    stdin_task: Option<JoinHandle<std::io::Result<()>>>,
    stdout_piped: bool,
    stderr_piped: bool,
    stdio_string: bool,
    extra: BTreeMap<String, Value>,
}

/// Reason the join loop bailed out before a clean finalization.
enum Fault {
    /// The launcher could not monitor the process.
    Monitor(std::io::Error),
    /// A piped stream faulted mid-run.
    Stream(StreamName, std::io::Error),
}

impl Spawned {
    /// OS process id, if the process is still believed to be running.
    #[must_use]
    pub const fn id(&self) -> Option<u32> {
        self.pid
    }

    /// The child's stdin pipe, if the slot is piped and no builder payload
    /// claimed it.
    pub fn stdin(&mut self) -> Option<&mut ChildStdin> {
        self.stdin.as_mut()
    }

    /// Takes ownership of the stdin pipe. Dropping the returned writer
    /// closes the pipe, which is how a filter process sees end-of-input.
    pub fn take_stdin(&mut self) -> Option<ChildStdin> {
        self.stdin.take()
    }

    /// A token that terminates the process when cancelled, usable while
    /// the outcome is being awaited. Termination proceeds through the
    /// ordinary join: the outcome reports a signal rather than a code.
    #[must_use]
    pub fn canceller(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Starts killing the process without waiting for it to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the kill signal could not be delivered (e.g.
    /// the process has already been reaped).
    pub fn kill(&mut self) -> std::io::Result<()> {
        self.child.start_kill()
    }

    /// Waits for the full completion join and finalizes the outcome.
    ///
    /// The process is done only when its exit has been observed *and*
    /// every locally piped output stream has reached end-of-stream;
    /// buffered output may drain arbitrarily late after the exit
    /// notification. Non-piped slots give no end-of-stream signal, so with
    /// one or both output streams unowned the join degenerates to
    /// exit-only.
    ///
    /// # Errors
    ///
    /// - [`SpawnError::Stream`] immediately on a piped-stream fault,
    ///   without waiting for exit or the other stream.
    /// - [`SpawnError::Launch`] if the process could not be monitored.
    /// - [`SpawnError::Failed`] after the join for a non-zero code, a
    ///   signal, or a termination reporting neither.
    pub async fn wait(mut self) -> Result<Outcome> {
        let mut exit: Option<ExitStatus> = None;
        let mut stdout_buf: Option<Vec<u8>> = None;
        let mut stderr_buf: Option<Vec<u8>> = None;
        let mut fault: Option<Fault> = None;
        let mut kill_sent = false;

        while fault.is_none()
            && (exit.is_none() || self.stdout_task.is_some() || self.stderr_task.is_some())
        {
            tokio::select! {
                status = self.child.wait(), if exit.is_none() => match status {
                    Ok(status) => {
                        trace!(code = ?status.code(), "exit observed");
                        exit = Some(status);
                    }
                    Err(source) => fault = Some(Fault::Monitor(source)),
                },
                res = finish(&mut self.stdout_task) => match res {
                    Ok(buf) => stdout_buf = Some(buf),
                    Err(source) => fault = Some(Fault::Stream(StreamName::Stdout, source)),
                },
                res = finish(&mut self.stderr_task) => match res {
                    Ok(buf) => stderr_buf = Some(buf),
                    Err(source) => fault = Some(Fault::Stream(StreamName::Stderr, source)),
                },
                res = finish(&mut self.stdin_task) => {
                    if let Err(source) = res {
                        fault = Some(Fault::Stream(StreamName::Stdin, source));
                    }
                }
                () = self.cancel.cancelled(), if !kill_sent => {
                    kill_sent = true;
                    debug!("termination requested");
                    let _ = self.child.start_kill();
                }
            }
        }

        self.release_tasks();

        let code = exit.as_ref().and_then(ExitStatus::code);
        let signal = exit.as_ref().and_then(terminal_signal);
        trace!(code = ?code, signal = ?signal, "finalized");

        let outcome = Box::new(Outcome::new(
            code,
            signal,
            captured(self.stdout_piped, stdout_buf, self.stdio_string),
            captured(self.stderr_piped, stderr_buf, self.stdio_string),
            std::mem::take(&mut self.extra),
        ));

        match fault {
            Some(Fault::Monitor(source)) => Err(SpawnError::Launch { source, outcome }),
            Some(Fault::Stream(stream, source)) => Err(SpawnError::Stream {
                stream,
                source,
                outcome,
            }),
            None if outcome.success() => Ok(*outcome),
            None => Err(SpawnError::Failed { outcome }),
        }
    }

    /// Deregisters any I/O task still attached to the handle.
    fn release_tasks(&mut self) {
        for task in [&mut self.stdout_task, &mut self.stderr_task] {
            if let Some(task) = task.take() {
                task.abort();
            }
        }
        if let Some(task) = self.stdin_task.take() {
            task.abort();
        }
    }
}

impl IntoFuture for Spawned {
    type Output = Result<Outcome>;
    type IntoFuture = Pin<Box<dyn Future<Output = Result<Outcome>> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.wait())
    }
}

/// Joins a finished I/O task, clearing its slot; pends forever on an empty
/// slot so disabled streams never satisfy (or wedge) the select.
async fn finish<T>(slot: &mut Option<JoinHandle<std::io::Result<T>>>) -> std::io::Result<T> {
    let Some(handle) = slot.as_mut() else {
        return std::future::pending().await;
    };
    let res = handle.await;
    *slot = None;
    res.unwrap_or_else(|err| Err(std::io::Error::other(err)))
}

/// Final representation of one output slot: `None` when not piped, the
/// accumulated (possibly empty) capture when piped.
fn captured(piped: bool, buf: Option<Vec<u8>>, decode: bool) -> Option<Captured> {
    piped.then(|| Captured::from_bytes(buf.unwrap_or_default(), decode))
}

fn terminal_signal(status: &ExitStatus) -> Option<i32> {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        status.signal()
    }
    #[cfg(not(unix))]
    {
        let _ = status;
        None
    }
}
