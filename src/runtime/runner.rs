/// Process runner for triggered commands
///
/// Spawns the configured executable directly (no shell, no arguments), streams
/// its stdout line by line into the log while a separate wait on the child
/// runs, and reports how the process ended.

use std::{
    process::{ExitStatus, Stdio},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};
use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::{ChildStdout, Command},
    task::JoinHandle,
};
use tracing::Instrument;

/// How long to keep draining stdout after the child exited. Only matters when
/// a descendant process inherited the pipe and keeps it open.
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Per-request failure of a triggered command
///
/// None of these are fatal to the server; the request handler logs them and
/// still answers the caller.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("error starting command '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error attaching stdout of command '{command}'")]
    StdoutUnavailable { command: String },

    #[error("error waiting for command '{command}'")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command '{command}' failed: {status}")]
    ExitStatus { command: String, status: ExitStatus },

    #[error("command '{command}' timed out after {timeout:?}")]
    TimedOut { command: String, timeout: Duration },
}

/// Outcome of one successful command invocation
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Exit status of the child (always a success status)
    pub status: ExitStatus,
    /// Number of stdout lines forwarded to the log
    pub lines: usize,
    /// Wall-clock time from spawn to exit
    pub duration: Duration,
}

/// Runs trigger commands, one child process per invocation
///
/// Holds no per-run state, so a single instance is shared by every request.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    /// Optional kill deadline; `None` waits for the child indefinitely
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run a command, forwarding each stdout line to the log
    pub async fn run(&self, command: &str) -> Result<ExecutionResult, RunnerError> {
        let source = command.to_string();
        self.run_with(command, move |line| {
            tracing::info!(command = %source, "📤 {}", line);
        })
        .await
    }

    /// Run a command, handing each stdout line to `on_line` as it arrives
    ///
    /// Returns once the child has exited and its output has been drained, so
    /// every line has been delivered before the caller sees the result.
    pub async fn run_with<F>(&self, command: &str, on_line: F) -> Result<ExecutionResult, RunnerError>
    where
        F: FnMut(&str) + Send + 'static,
    {
        let start_time = Instant::now();
        tracing::debug!("🚀 Spawning command: {}", command);

        let mut child = Command::new(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            // stderr is not forwarded to the log
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let Some(stdout) = child.stdout.take() else {
            if let Err(e) = child.kill().await {
                tracing::warn!("⚠️ Failed to kill command '{}' without stdout: {}", command, e);
            }
            return Err(RunnerError::StdoutUnavailable {
                command: command.to_string(),
            });
        };

        // Reader starts before the wait so a full pipe can never block the child
        let forwarded = Arc::new(AtomicUsize::new(0));
        let reader = tokio::spawn(
            forward_lines(stdout, on_line, Arc::clone(&forwarded))
                .instrument(tracing::Span::current()),
        );

        let waited = match self.timeout {
            None => child.wait().await,
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(waited) => waited,
                Err(_elapsed) => {
                    tracing::warn!("⏱️ Command '{}' exceeded {:?}, killing it", command, limit);
                    if let Err(e) = child.kill().await {
                        tracing::warn!("⚠️ Failed to kill command '{}': {}", command, e);
                    }
                    drain(reader, &forwarded, command).await;
                    return Err(RunnerError::TimedOut {
                        command: command.to_string(),
                        timeout: limit,
                    });
                }
            },
        };

        let status = match waited {
            Ok(status) => status,
            Err(source) => {
                reader.abort();
                return Err(RunnerError::Wait {
                    command: command.to_string(),
                    source,
                });
            }
        };

        let lines = drain(reader, &forwarded, command).await;
        let duration = start_time.elapsed();

        if !status.success() {
            return Err(RunnerError::ExitStatus {
                command: command.to_string(),
                status,
            });
        }

        tracing::debug!(
            "✅ Command '{}' finished in {:?} ({} lines of output)",
            command,
            duration,
            lines
        );

        Ok(ExecutionResult {
            status,
            lines,
            duration,
        })
    }
}

/// Read stdout to EOF, one line at a time
///
/// Lines are decoded lossily; line terminators (`\n` or `\r\n`) are stripped.
/// `forwarded` counts delivered lines and stays valid if this task is aborted.
async fn forward_lines<F>(stdout: ChildStdout, mut on_line: F, forwarded: Arc<AtomicUsize>)
where
    F: FnMut(&str),
{
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                on_line(&String::from_utf8_lossy(&buf));
                forwarded.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::warn!("⚠️ Error reading command output: {}", e);
                break;
            }
        }
    }
}

/// Wait for the reader task to finish, giving up after the drain grace period
///
/// Returns the number of lines forwarded so far, whether or not the reader
/// reached EOF.
async fn drain(mut reader: JoinHandle<()>, forwarded: &AtomicUsize, command: &str) -> usize {
    match tokio::time::timeout(OUTPUT_DRAIN_GRACE, &mut reader).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!("⚠️ Output reader for '{}' failed: {}", command, e);
        }
        Err(_elapsed) => {
            tracing::warn!(
                "⚠️ Output of '{}' still open {:?} after exit, detaching reader",
                command,
                OUTPUT_DRAIN_GRACE
            );
            reader.abort();
        }
    }

    forwarded.load(Ordering::Relaxed)
}
