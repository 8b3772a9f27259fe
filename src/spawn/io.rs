// spawn-join: async subprocess completion
//
// SPDX-FileCopyrightText: 2026 The spawn-join Authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Eager I/O tasks for piped streams.
//!
//! ```text
//! spawn_capture()        one per piped output stream, started at spawn
//!   chunked reads --> Vec<u8>, lossless, arrival order
//!   EOF   --> Ok(buffer)      (the stream-ended join flag)
//!   fault --> Err(io::Error)  (immediate Stream failure upstream)
//!
//! spawn_input_writer()   optional, for a builder-supplied stdin payload
//!   write_all + shutdown, closing the pipe
//! ```

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::ChildStdin;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use crate::error::StreamName;

/// Spawns an accumulator task for one piped output stream.
///
/// Started eagerly at spawn time, not at await time, so output is captured
/// for the entire process lifetime and pipe buffers never fill up behind a
/// caller that has not awaited yet.
pub(super) fn spawn_capture<R>(stream: R, name: StreamName) -> JoinHandle<std::io::Result<Vec<u8>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut captured = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            match reader.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => {
                    captured.extend_from_slice(&chunk[..n]);
                    trace!(stream = %name, bytes = n, "captured chunk");
                }
                Err(e) => {
                    warn!(stream = %name, error = %e, "error reading stream");
                    return Err(e);
                }
            }
        }

        trace!(stream = %name, total = captured.len(), "stream ended");
        Ok(captured)
    })
}

/// Spawns a writer task that feeds a fixed payload to the child's stdin and
/// closes the pipe. A write fault (e.g. a broken pipe) surfaces as an
/// immediate stream failure upstream.
pub(super) fn spawn_input_writer(
    mut stdin: ChildStdin,
    payload: Vec<u8>,
) -> JoinHandle<std::io::Result<()>> {
    tokio::spawn(async move {
        if let Err(e) = stdin.write_all(&payload).await {
            warn!(stream = %StreamName::Stdin, error = %e, "error writing stream");
            return Err(e);
        }
        stdin.shutdown().await?;
        trace!(stream = %StreamName::Stdin, total = payload.len(), "payload written");
        Ok(())
    })
}
