//! System configuration parameters
//!
//! All tunable parameters for the GreenGate controller. Loaded once at
//! startup from a JSON file; the repository shape never changes after that.

use serde::{Deserialize, Serialize};

/// Core system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Actor definitions, in evaluation order.
    pub actors: Vec<ActorConfig>,

    // --- Timing ---
    /// Control loop tick interval (milliseconds).
    pub tick_interval_ms: u64,
    /// Per-call timeout for device and cloud operations (milliseconds).
    /// Enforced by the port adapters; a timed-out call fails the tick.
    pub device_call_timeout_ms: u64,

    // --- Network ---
    /// How long the link may stay Disconnected before the loop hints the
    /// network controller to attempt a reconnect (milliseconds).
    pub reconnect_grace_ms: u64,

    // --- Telemetry ---
    /// Maximum buffered telemetry events while the link is down.
    /// Oldest events are dropped once the buffer is full.
    pub telemetry_buffer_capacity: usize,
}

/// A single timed actuator definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorConfig {
    /// Stable identity, unique within the configuration (e.g. "valve-1").
    pub id: String,
    /// Daily activity windows. May be empty (actor exists but is never
    /// scheduled) and may overlap (overlap resolves to plain "active").
    pub windows: Vec<WindowConfig>,
}

/// One daily time window, local wall-clock, "HH:MM" 24-hour format.
/// `start > end` spans midnight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    pub start: String,
    pub end: String,
}

impl SystemConfig {
    /// Parse configuration from a JSON document.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|_| crate::Error::Config("malformed configuration JSON"))
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            actors: Vec::new(),
            tick_interval_ms: 5_000,       // 0.2 Hz — valves, not motors
            device_call_timeout_ms: 2_000, // must resolve within one tick
            reconnect_grace_ms: 60_000,    // UMTS links flap; give them a minute
            telemetry_buffer_capacity: 256,
        }
    }
}
