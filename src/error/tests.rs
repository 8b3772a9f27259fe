// spawn-join: async subprocess completion
//
// SPDX-FileCopyrightText: 2026 The spawn-join Authors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::BTreeMap;

use super::{SpawnError, StreamName};
use crate::spawn::outcome::Outcome;

fn empty_outcome() -> Box<Outcome> {
    Box::new(Outcome::new(None, None, None, None, BTreeMap::new()))
}

#[test]
fn test_launch_display_is_launcher_message() {
    let err = SpawnError::Launch {
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "command not found"),
        outcome: empty_outcome(),
    };
    assert_eq!(err.to_string(), "command not found");
}

#[test]
fn test_stream_display_is_stream_message() {
    let err = SpawnError::Stream {
        stream: StreamName::Stdout,
        source: std::io::Error::other("stdout error"),
        outcome: empty_outcome(),
    };
    assert_eq!(err.to_string(), "stdout error");
    assert_eq!(err.stream(), Some(StreamName::Stdout));
}

#[test]
fn test_failed_display_is_fixed() {
    let err = SpawnError::Failed {
        outcome: Box::new(Outcome::new(
            Some(1),
            None,
            None,
            None,
            BTreeMap::new(),
        )),
    };
    assert_eq!(err.to_string(), "command failed");
    assert_eq!(err.outcome().code(), Some(1));
}

#[test]
fn test_outcome_rides_every_variant() {
    let mut extra = BTreeMap::new();
    extra.insert("a".to_string(), serde_json::json!(1));
    let outcome = Box::new(Outcome::new(None, Some(9), None, None, extra));

    let err = SpawnError::Failed { outcome };
    assert_eq!(err.outcome().extra_value("a"), Some(&serde_json::json!(1)));
    assert_eq!(err.into_outcome().signal(), Some(9));
}

#[test]
fn test_spawn_error_size() {
    // All variants box their Outcome; the enum stays pointer-scale.
    let size = std::mem::size_of::<SpawnError>();
    assert!(size <= 32, "SpawnError is {size} bytes, expected <= 32");
}

#[test]
fn test_stream_name_display() {
    assert_eq!(StreamName::Stdin.to_string(), "stdin");
    assert_eq!(StreamName::Stdout.as_str(), "stdout");
    assert_eq!(StreamName::Stderr.to_string(), "stderr");
}
