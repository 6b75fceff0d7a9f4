//! Unified error types for the GreenGate controller.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! control loop's error handling uniform. Connectivity loss is deliberately
//! absent: it is an observed state ([`ConnectivityState`]), not an error.
//!
//! [`ConnectivityState`]: crate::app::ports::ConnectivityState

use core::fmt;

use crate::app::ports::{DeviceError, PublishError};

// ---------------------------------------------------------------------------
// Top-level controller error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A device-control command failed. Retried on the next tick.
    Device(DeviceError),
    /// A telemetry publish failed. The event stays buffered for retry.
    Publish(PublishError),
    /// Configuration is invalid. Fatal to the affected actor only, unless
    /// no actor survives validation.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(e) => write!(f, "device: {e}"),
            Self::Publish(e) => write!(f, "publish: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<DeviceError> for Error {
    fn from(e: DeviceError) -> Self {
        Self::Device(e)
    }
}

impl From<PublishError> for Error {
    fn from(e: PublishError) -> Self {
        Self::Publish(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Controller-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
