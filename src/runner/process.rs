//! @ai:module:intent Blocking subprocess call with stdin payload and a deadline
//! @ai:module:layer infrastructure
//! @ai:module:public_api run_with_deadline, ProcessOutcome, truncate_chars
//! @ai:module:stateless true

use std::io::ErrorKind;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// @ai:intent Result of a deadline-bounded invocation
#[derive(Debug)]
pub enum ProcessOutcome {
    Finished(Output),
    TimedOut,
}

/// @ai:intent Run a command to completion, feeding `input` on stdin
/// @ai:post the child is killed if the deadline elapses
/// @ai:effects io
pub async fn run_with_deadline(
    mut command: Command,
    input: &[u8],
    deadline: Duration,
) -> std::io::Result<ProcessOutcome> {
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn()?;
    let stdin = child.stdin.take();

    let feed = async move {
        if let Some(mut stdin) = stdin {
            stdin.write_all(input).await?;
            stdin.shutdown().await?;
        }
        Ok::<(), std::io::Error>(())
    };

    let run = async {
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        // The child may exit before consuming all of its input.
        if let Err(e) = fed {
            if e.kind() != ErrorKind::BrokenPipe {
                tracing::debug!("Writing subprocess stdin failed: {}", e);
            }
        }

        output
    };

    match tokio::time::timeout(deadline, run).await {
        Ok(output) => Ok(ProcessOutcome::Finished(output?)),
        Err(_) => Ok(ProcessOutcome::TimedOut),
    }
}

/// @ai:intent Truncate to a character count without splitting a code point
/// @ai:effects pure
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
