/// Runtime Execution Layer
///
/// This module runs the commands bound to triggers. It handles:
/// - Spawning one child process per triggered request
/// - Streaming child stdout into the log while waiting for exit
/// - Classifying spawn, wait, exit-status and timeout failures

// Child process spawning and output streaming
pub mod runner;

// Re-export main types
pub use runner::{ExecutionResult, ProcessRunner, RunnerError};
