/// Trigger Management Layer
///
/// This module handles trigger definitions and the immutable registry that
/// maps request paths to the commands they fire:
/// - Type definitions (TriggerDefinition)
/// - JSON config file loading
/// - First-match lookup by path key

// Core trigger type definitions
pub mod types;

// Loaded-once registry with path lookup
pub mod registry;

// Re-export commonly used types
pub use registry::{ConfigError, TriggerRegistry};
pub use types::TriggerDefinition;
