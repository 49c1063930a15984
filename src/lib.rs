/// remote-trigger: local webhook relay
///
/// This library maps HTTP paths to local commands. A request to a registered
/// path runs the bound command to completion, streams its output into the
/// server log and acknowledges the caller.

// Core configuration and command-line flags
pub mod config;

// Trigger definitions and the immutable registry
pub mod trigger;

// Process runner - child spawning and output streaming
pub mod runtime;

// HTTP API layer - catch-all trigger endpoints
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use runtime::{ExecutionResult, ProcessRunner, RunnerError};
pub use server::{build_app, create_app, start_server};
pub use trigger::{ConfigError, TriggerDefinition, TriggerRegistry};
