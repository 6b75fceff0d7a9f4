//! Outbound telemetry events.
//!
//! The [`ControlService`](super::service::ControlService) generates one
//! event per reconciliation that touched the device, and hands it to the
//! [`ClientService`](super::ports::ClientService) port once the link allows.
//! Ownership transfers on publish; the control loop only keeps events while
//! they sit in the bounded buffer.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::actor::OutputState;

/// A point-in-time snapshot of one actor's reconciliation outcome,
/// destined for the cloud endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetryEvent {
    /// Actor identity.
    pub actor_id: String,
    /// The state that was applied (or attempted, when `error` is set).
    pub state: OutputState,
    /// Local wall-clock time of the reconciliation.
    pub at: NaiveDateTime,
    /// Set when the device apply failed; the state above was not reached.
    pub error: Option<String>,
}

impl TelemetryEvent {
    pub fn applied(actor_id: &str, state: OutputState, at: NaiveDateTime) -> Self {
        Self {
            actor_id: actor_id.to_owned(),
            state,
            at,
            error: None,
        }
    }

    pub fn failed(actor_id: &str, state: OutputState, at: NaiveDateTime, error: String) -> Self {
        Self {
            actor_id: actor_id.to_owned(),
            state,
            at,
            error: Some(error),
        }
    }
}
