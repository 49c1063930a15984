/// Trigger execution endpoints
///
/// Every path is a potential trigger: the request path (minus its leading
/// slash) is looked up in the registry and, on a hit, the bound command runs to
/// completion before the response is written. The HTTP method is not checked.

use crate::runtime::ProcessRunner;
use crate::trigger::TriggerRegistry;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{any, Router},
};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Shared state for trigger requests
///
/// Both members are immutable after startup, so handlers read them without
/// locking.
#[derive(Clone)]
pub struct TriggerAppState {
    /// Loaded trigger definitions
    pub registry: Arc<TriggerRegistry>,
    /// Runner used to execute bound commands
    pub runner: Arc<ProcessRunner>,
}

/// Create the trigger routes
///
/// `/` maps to the empty key; `/{*key}` captures everything after the first
/// slash, including further slashes.
pub fn create_trigger_routes() -> Router<TriggerAppState> {
    Router::new()
        .route("/", any(trigger_root))
        .route("/{*key}", any(trigger_path))
}

async fn trigger_root(State(state): State<TriggerAppState>) -> Response {
    fire_trigger(state, String::new()).await
}

/// A path that cannot be decoded into a key (e.g. `%FF`) cannot name a
/// trigger, so it is answered like any other unknown path.
async fn trigger_path(
    State(state): State<TriggerAppState>,
    key: Result<Path<String>, PathRejection>,
) -> Response {
    match key {
        Ok(Path(key)) => fire_trigger(state, key).await,
        Err(rejection) => {
            tracing::debug!("🔍 Undecodable trigger path: {}", rejection);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Look up the trigger for `key`, run its command and build the response
///
/// - unknown key: 404 with an empty body
/// - command failed: 200 with an empty body, failure only visible in the log
/// - command succeeded: 200 with `Access to <key>`
async fn fire_trigger(state: TriggerAppState, key: String) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("trigger_request", %request_id, path = %key);

    async move {
        let Some(trigger) = state.registry.lookup(&key) else {
            tracing::debug!("🔍 No trigger registered for path: '{}'", key);
            return StatusCode::NOT_FOUND.into_response();
        };
        let trigger = trigger.clone();
        tracing::debug!("✅ Trigger found: '{}' -> {}", trigger.name, trigger.command);

        // The command runs in its own task; a fault in it surfaces here as a
        // JoinError instead of tearing down the connection task.
        let runner = Arc::clone(&state.runner);
        let command = trigger.command.clone();
        let execution = tokio::spawn(
            async move { runner.run(&command).await }.instrument(tracing::Span::current()),
        );

        match execution.await {
            Ok(Ok(result)) => {
                tracing::debug!(
                    "📊 Command for '{}' exited with {} after {:?}, {} lines of output",
                    key,
                    result.status,
                    result.duration,
                    result.lines
                );
            }
            Ok(Err(e)) => {
                tracing::error!(
                    path = %key,
                    name = %trigger.name,
                    command = %trigger.command,
                    error = %error_chain(&e),
                    "❌ Error running triggered command"
                );
                return StatusCode::OK.into_response();
            }
            Err(e) => {
                tracing::error!(
                    path = %key,
                    error = %e,
                    "❌ Trigger execution aborted unexpectedly"
                );
                return StatusCode::OK.into_response();
            }
        }

        tracing::info!(
            path = %key,
            name = %trigger.name,
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "🎯 URL triggered"
        );

        (StatusCode::OK, format!("Access to {}", key)).into_response()
    }
    .instrument(span)
    .await
}

/// Render an error and its sources as `outer → inner → root`
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    std::iter::successors(Some(err), |err| err.source())
        .map(|err| err.to_string())
        .collect::<Vec<_>>()
        .join(" → ")
}
