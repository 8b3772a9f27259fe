// spawn-join: async subprocess completion
//
// SPDX-FileCopyrightText: 2026 The spawn-join Authors
// SPDX-License-Identifier: GPL-3.0-or-later

use serde_json::json;

use super::builder::SpawnBuilder;
use super::outcome::Captured;
use super::stdio::{StdioSlot, StdioSpec};
use crate::error::{SpawnError, StreamName};

#[test]
fn test_stdio_spec_defaults_to_piped() {
    let spec = StdioSpec::default();
    assert!(spec.stdin_is_piped());
    assert!(spec.stdout_is_piped());
    assert!(spec.stderr_is_piped());
}

#[test]
fn test_stdio_spec_per_slot() {
    let spec = StdioSpec::slots(StdioSlot::Piped, StdioSlot::Inherit, StdioSlot::Null);
    assert!(spec.stdin_is_piped());
    assert!(!spec.stdout_is_piped());
    assert!(!spec.stderr_is_piped());

    let spec = StdioSpec::inherit().with_stderr(StdioSlot::Piped);
    assert!(!spec.stdin_is_piped());
    assert!(!spec.stdout_is_piped());
    assert!(spec.stderr_is_piped());
}

#[cfg(unix)]
#[tokio::test]
async fn test_pass_with_string_output() {
    let outcome = SpawnBuilder::new("sh")
        .arg("-c")
        .arg("printf 'OK :)'")
        .stdio_string(true)
        .extra("a", json!(1))
        .run()
        .await
        .expect("process should succeed");

    assert_eq!(outcome.code(), Some(0));
    assert_eq!(outcome.signal(), None);
    assert_eq!(outcome.stdout().and_then(Captured::as_text), Some("OK :)"));
    assert_eq!(outcome.stderr().and_then(Captured::as_text), Some(""));
    assert_eq!(outcome.extra_value("a"), Some(&json!(1)));
    assert!(outcome.success());
}

#[cfg(unix)]
#[tokio::test]
async fn test_pass_default_opts_keeps_bytes() {
    let outcome = SpawnBuilder::new("sh")
        .arg("-c")
        .arg("printf 'OK :)'")
        .run()
        .await
        .expect("process should succeed");

    assert_eq!(outcome.code(), Some(0));
    assert_eq!(
        outcome.stdout(),
        Some(&Captured::Binary(b"OK :)".to_vec()))
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_fail_reports_full_diagnostics() {
    let err = SpawnBuilder::new("sh")
        .arg("-c")
        .arg("printf 'not ok :(' && printf 'Some kind of helpful error' >&2; exit 1")
        .extra("a", json!(1))
        .run()
        .await
        .expect_err("exit 1 should fail");

    assert_eq!(err.to_string(), "command failed");
    assert!(matches!(err, SpawnError::Failed { .. }));

    let outcome = err.into_outcome();
    assert_eq!(outcome.code(), Some(1));
    assert_eq!(outcome.signal(), None);
    assert_eq!(
        outcome.stdout().map(Captured::as_bytes),
        Some(b"not ok :(".as_slice())
    );
    assert_eq!(
        outcome.stderr().map(Captured::as_bytes),
        Some(b"Some kind of helpful error".as_slice())
    );
    assert_eq!(outcome.extra_value("a"), Some(&json!(1)));
}

#[cfg(unix)]
#[tokio::test]
async fn test_signal_termination_keeps_buffers() {
    let err = SpawnBuilder::new("sh")
        .arg("-c")
        .arg("printf stdout; printf stderr >&2; kill -9 $$")
        .extra("a", json!(1))
        .run()
        .await
        .expect_err("killed process should fail");

    assert_eq!(err.to_string(), "command failed");

    let outcome = err.into_outcome();
    assert_eq!(outcome.code(), None);
    assert_eq!(outcome.signal(), Some(9));
    // Output written before the kill still drains through the join.
    assert_eq!(
        outcome.stdout().map(Captured::as_bytes),
        Some(b"stdout".as_slice())
    );
    assert_eq!(
        outcome.stderr().map(Captured::as_bytes),
        Some(b"stderr".as_slice())
    );
    assert_eq!(outcome.extra_value("a"), Some(&json!(1)));
}

#[cfg(unix)]
#[tokio::test]
async fn test_inherit_stdio_surfaces_null_slots() {
    let outcome = SpawnBuilder::new("sh")
        .arg("-c")
        .arg("exit 0")
        .inherit_stdio()
        .extra("a", json!(1))
        .run()
        .await
        .expect("process should succeed");

    assert_eq!(outcome.code(), Some(0));
    assert_eq!(outcome.stdout(), None);
    assert_eq!(outcome.stderr(), None);
    assert_eq!(outcome.extra_value("a"), Some(&json!(1)));
}

#[cfg(unix)]
#[tokio::test]
async fn test_shared_stdout_piped_stderr() {
    let outcome = SpawnBuilder::new("sh")
        .arg("-c")
        .arg("exit 0")
        .stdio(StdioSpec::piped().with_stdout(StdioSlot::Inherit))
        .stdio_string(true)
        .run()
        .await
        .expect("process should succeed");

    // Unowned slot is None; the piped-but-silent slot is empty, never None.
    assert_eq!(outcome.stdout(), None);
    assert_eq!(outcome.stderr().and_then(Captured::as_text), Some(""));
}

#[cfg(unix)]
#[tokio::test]
async fn test_quiet_discards_output() {
    let outcome = SpawnBuilder::new("sh")
        .arg("-c")
        .arg("printf noise; printf more >&2")
        .quiet()
        .run()
        .await
        .expect("process should succeed");

    assert_eq!(outcome.stdout(), None);
    assert_eq!(outcome.stderr(), None);
}

#[cfg(unix)]
#[tokio::test]
async fn test_empty_piped_buffers_are_not_null() {
    let outcome = SpawnBuilder::new("sh")
        .arg("-c")
        .arg("exit 0")
        .run()
        .await
        .expect("process should succeed");

    assert_eq!(outcome.stdout(), Some(&Captured::Binary(Vec::new())));
    assert_eq!(outcome.stderr(), Some(&Captured::Binary(Vec::new())));
    assert!(outcome.stdout().is_some_and(Captured::is_empty));
}

#[tokio::test]
async fn test_launch_failure_is_immediate() {
    let err = SpawnBuilder::new("this-command-does-not-exist-xyz")
        .stdio_string(true)
        .extra("a", json!(1))
        .spawn()
        .expect_err("unknown executable should not launch");

    let SpawnError::Launch { source, outcome } = err else {
        panic!("expected a launch failure, got: {err:?}");
    };
    assert_eq!(source.kind(), std::io::ErrorKind::NotFound);

    // No process ever ran, but piped slots are still empty-not-null and
    // the extra fields are still merged.
    assert_eq!(outcome.code(), None);
    assert_eq!(outcome.signal(), None);
    assert_eq!(outcome.stdout().and_then(Captured::as_text), Some(""));
    assert_eq!(outcome.stderr().and_then(Captured::as_text), Some(""));
    assert_eq!(outcome.extra_value("a"), Some(&json!(1)));
}

#[cfg(unix)]
#[tokio::test]
async fn test_input_payload_feeds_stdin() {
    let outcome = SpawnBuilder::new("cat")
        .input("hello")
        .stdio_string(true)
        .run()
        .await
        .expect("cat should succeed");

    assert_eq!(outcome.code(), Some(0));
    assert_eq!(outcome.stdout().and_then(Captured::as_text), Some("hello"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_stdin_pipe_fault_fails_immediately() {
    // The child closes its end of the stdin pipe right away while the
    // payload is far too large to fit in the pipe buffer, so the writer
    // task hits a broken pipe mid-run. That fault must surface as a
    // stream failure without waiting for the child to exit.
    let err = SpawnBuilder::new("sh")
        .arg("-c")
        .arg("exec 0<&-; sleep 0.2")
        .input(vec![b'x'; 1 << 20])
        .extra("a", json!(1))
        .run()
        .await
        .expect_err("broken stdin pipe should fail");

    let SpawnError::Stream {
        stream,
        source,
        outcome,
    } = err
    else {
        panic!("expected a stream failure, got: {err:?}");
    };
    assert_eq!(stream, StreamName::Stdin);
    assert_eq!(source.kind(), std::io::ErrorKind::BrokenPipe);
    assert_eq!(outcome.extra_value("a"), Some(&json!(1)));
}

#[cfg(unix)]
#[tokio::test]
async fn test_env_passes_through() {
    let outcome = SpawnBuilder::new("sh")
        .arg("-c")
        .arg("printf \"$SPAWN_JOIN_TEST_VAR\"")
        .env("SPAWN_JOIN_TEST_VAR", "test_value")
        .stdio_string(true)
        .run()
        .await
        .expect("process should succeed");

    assert_eq!(
        outcome.stdout().and_then(Captured::as_text),
        Some("test_value")
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_cwd_passes_through() {
    let outcome = SpawnBuilder::new("sh")
        .arg("-c")
        .arg("pwd")
        .cwd("/")
        .stdio_string(true)
        .run()
        .await
        .expect("process should succeed");

    assert_eq!(
        outcome
            .stdout()
            .and_then(Captured::as_text)
            .map(str::trim),
        Some("/")
    );
}
