/// HTTP API Layer
///
/// This module provides the catch-all trigger endpoints. It handles:
/// - Mapping request paths to registry keys
/// - Running the bound command for the duration of the request
/// - Acknowledgement responses and trigger logging

// Trigger execution endpoints (any path, any method)
pub mod triggers;

// Re-export router builder
pub use triggers::{create_trigger_routes, TriggerAppState};
