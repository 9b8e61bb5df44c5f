//! The single side-effect boundary between call descriptors and the API.
//!
//! The gateway reduces an operation's request event before the call starts,
//! so the UI sees the pending flag before any network latency. The call then
//! runs as a runtime task that reduces exactly one success or failure event,
//! whether or not anyone awaits it. A single-entity fetch whose id is already
//! in flight is skipped. Failures are terminal for the call; callers
//! re-dispatch to retry.

use std::sync::Arc;

use futures_util::FutureExt;
use mockable::Clock;
use serde_json::Value;
use tracing::{debug, trace, warn};

use super::call::{CallDescriptor, Operation};
use super::store::{Dispatched, Pending, Store, detach, settled};
use crate::domain::SyncError;
use crate::domain::ports::{ApiResponse, ApiTransport, ApiTransportError};

/// Executes call descriptors against an [`ApiTransport`].
#[derive(Clone)]
pub struct Gateway {
    transport: Arc<dyn ApiTransport>,
    clock: Arc<dyn Clock>,
}

impl Gateway {
    /// Create a gateway over `transport`, stamping receipts with `clock`.
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use frontend::domain::ports::FixtureApiTransport;
    /// # use mockable::DefaultClock;
    /// let gateway = frontend::state::Gateway::new(
    ///     Arc::new(FixtureApiTransport::default()),
    ///     Arc::new(DefaultClock),
    /// );
    /// let _store = frontend::state::Store::new(gateway);
    /// ```
    pub fn new(transport: Arc<dyn ApiTransport>, clock: Arc<dyn Clock>) -> Self {
        Self { transport, clock }
    }

    pub(crate) fn begin(&self, store: &Store, call: CallDescriptor) -> Pending {
        let operation = call.operation().clone();
        if !store.claim(&operation) {
            trace!(
                operation = operation.name(),
                endpoint = call.endpoint(),
                "fetch already in flight; skipping call"
            );
            return settled(Dispatched::Skipped);
        }
        debug!(
            operation = operation.name(),
            method = %call.method(),
            endpoint = call.endpoint(),
            authenticated = call.is_authenticated(),
            "issuing api call"
        );

        let request = call.into_request();
        let transport = Arc::clone(&self.transport);
        let clock = Arc::clone(&self.clock);
        let store = store.clone();
        detach(
            async move {
                let outcome = match transport.send(&request).await {
                    Ok(response) if response.is_success() => {
                        operation.success_event(response.body, clock.utc())
                    }
                    Ok(response) => {
                        Err(SyncError::api(response.status, error_message(&response)))
                    }
                    Err(err) => Err(map_transport_error(&err)),
                };
                settle(&store, &operation, outcome)
            }
            .boxed(),
        )
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway").finish_non_exhaustive()
    }
}

fn settle(
    store: &Store,
    operation: &Operation,
    outcome: Result<super::event::Event, SyncError>,
) -> Dispatched {
    match outcome {
        Ok(event) => {
            store.reduce(&event);
            Dispatched::Succeeded
        }
        Err(error) => {
            warn!(
                operation = operation.name(),
                code = ?error.code(),
                status = error.status(),
                message = error.message(),
                "api call failed"
            );
            store.reduce(&operation.failure_event(error.clone()));
            Dispatched::Failed { error }
        }
    }
}

/// Human-readable message for a non-2xx response.
///
/// Prefers the body's `message`, then a string `error`, then a plain string
/// body, and finally names the status.
pub(crate) fn error_message(response: &ApiResponse) -> String {
    let field = |name: &str| {
        response
            .body
            .get(name)
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
    };
    field("message")
        .or_else(|| field("error"))
        .or_else(|| response.body.as_str().filter(|text| !text.trim().is_empty()))
        .map_or_else(
            || format!("request failed with status {}", response.status),
            str::to_owned,
        )
}

fn map_transport_error(error: &ApiTransportError) -> SyncError {
    debug!(kind = error.kind(), "transport error");
    match error {
        ApiTransportError::Decode { .. } => SyncError::decode(error.to_string()),
        ApiTransportError::Transport { .. }
        | ApiTransportError::Timeout { .. }
        | ApiTransportError::InvalidRequest { .. } => SyncError::transport(error.to_string()),
    }
}

#[cfg(test)]
mod tests;
