//! Port traits — the hexagonal boundary between the control loop and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Concrete adapters (GPIO relay boards, UMTS modem supervision, the cloud
//! client) implement these traits. The control service consumes them via
//! generics, so the core never touches hardware or sockets directly;
//! harmless simulated implementations slot in for local development and
//! tests.
//!
//! ## Timeouts
//!
//! Every port call must resolve within the configured per-call timeout
//! (`device_call_timeout_ms`). Implementations bound their own I/O and
//! report an expired call as [`DeviceError::Timeout`] /
//! [`PublishError::Timeout`] — a call is never left pending into the next
//! tick.

use core::fmt;

use crate::actor::OutputState;

use super::events::TelemetryEvent;

// ───────────────────────────────────────────────────────────────
// Device-control port (domain → physical outputs)
// ───────────────────────────────────────────────────────────────

/// Drives a physical output for one actor.
pub trait DeviceController {
    /// Command the output identified by `actor_id` into `state`.
    fn apply(&mut self, actor_id: &str, state: OutputState) -> Result<(), DeviceError>;
}

/// Errors from [`DeviceController::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// The device layer is not reachable at all.
    Unreachable,
    /// The command was rejected by the device.
    Rejected,
    /// The device signalled a hardware fault.
    HardwareFault,
    /// The call exceeded the per-call timeout.
    Timeout,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => write!(f, "device unreachable"),
            Self::Rejected => write!(f, "command rejected"),
            Self::HardwareFault => write!(f, "hardware fault"),
            Self::Timeout => write!(f, "device call timed out"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Network-supervision port (observed by the domain)
// ───────────────────────────────────────────────────────────────

/// Wide-area link status as reported by the network controller.
///
/// The control loop only ever *reads* this state; transitions are owned by
/// the network controller. `Reconnecting` must never block the loop — it
/// buffers telemetry and re-checks on the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    Connected,
    Disconnected,
    Reconnecting,
}

/// Supervises the wide-area (cellular/UMTS) link.
pub trait NetworkController {
    /// Current link status.
    fn connectivity(&self) -> ConnectivityState;

    /// Fire-and-forget hint to attempt recovery. The reconnection protocol
    /// itself is internal to the implementation.
    fn request_reconnect(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Cloud-telemetry port (domain → cloud endpoint)
// ───────────────────────────────────────────────────────────────

/// Publishes telemetry events to the cloud endpoint, one at a time.
pub trait ClientService {
    fn publish(&mut self, event: &TelemetryEvent) -> Result<(), PublishError>;
}

/// Errors from [`ClientService::publish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishError {
    /// The endpoint rejected the event.
    Rejected,
    /// The call exceeded the per-call timeout.
    Timeout,
    /// The link dropped mid-publish.
    LinkLost,
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected => write!(f, "endpoint rejected event"),
            Self::Timeout => write!(f, "publish timed out"),
            Self::LinkLost => write!(f, "link lost during publish"),
        }
    }
}
