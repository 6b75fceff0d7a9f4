//! Control-loop driver.
//!
//! [`ControlLoop`] is the one active component of the process: an explicitly
//! constructed, explicitly owned service object with a start/stop lifecycle
//! — not a global singleton. It drives [`ControlService::tick`] on a fixed
//! interval from a sleep-based timer, sampling local wall-clock time once
//! per tick.
//!
//! Shutdown is cooperative: a [`ShutdownHandle`] flips an atomic flag, the
//! in-flight tick runs to completion (or definitive failure), and the loop
//! exits between ticks — an actuator is never left mid-apply.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::Local;
use log::info;

use crate::app::ports::{ClientService, DeviceController, NetworkController};
use crate::app::service::ControlService;
use crate::config::SystemConfig;

/// Granularity of the stop-flag poll while sleeping between ticks.
const STOP_POLL: Duration = Duration::from_millis(50);

// ───────────────────────────────────────────────────────────────
// Shutdown handle
// ───────────────────────────────────────────────────────────────

/// Cloneable handle that requests a graceful stop of the owning loop.
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Ask the loop to stop after the current tick completes.
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

// ───────────────────────────────────────────────────────────────
// ControlLoop
// ───────────────────────────────────────────────────────────────

/// Owns the [`ControlService`] and its periodic timer.
pub struct ControlLoop {
    service: ControlService,
    tick_interval: Duration,
    stop: Arc<AtomicBool>,
}

impl ControlLoop {
    /// Build the loop from configuration.
    ///
    /// Fails when no actor survives validation: with nothing to actuate the
    /// process has no purpose, and that is a condition the operator must
    /// see rather than an idle loop spinning forever.
    pub fn new(config: &SystemConfig) -> Result<Self> {
        let service = ControlService::new(config);
        if service.actor_count() == 0 {
            bail!("no valid actor configured — nothing to control");
        }
        info!(
            "Control loop ready: {} actor(s), tick every {} ms",
            service.actor_count(),
            config.tick_interval_ms
        );
        Ok(Self {
            service,
            tick_interval: Duration::from_millis(config.tick_interval_ms),
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Handle for requesting a stop from another thread (e.g. a signal
    /// handler installed by the host binary).
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.stop),
        }
    }

    /// The owned service (read-only; for status queries).
    pub fn service(&self) -> &ControlService {
        &self.service
    }

    /// Run ticks until a stop is requested. Ticks are strictly serialized;
    /// the sleep between them polls the stop flag so shutdown is prompt
    /// without ever interrupting a tick.
    pub fn run(
        &mut self,
        device: &mut impl DeviceController,
        network: &mut impl NetworkController,
        client: &mut impl ClientService,
    ) -> Result<()> {
        info!("Entering control loop");

        while !self.stop.load(Ordering::SeqCst) {
            let now = Local::now().naive_local();
            self.service.tick(now, device, network, client);

            let mut slept = Duration::ZERO;
            while slept < self.tick_interval && !self.stop.load(Ordering::SeqCst) {
                let slice = STOP_POLL.min(self.tick_interval - slept);
                thread::sleep(slice);
                slept += slice;
            }
        }

        info!(
            "Control loop stopped after {} tick(s), {} telemetry event(s) still buffered",
            self.service.tick_count(),
            self.service.pending_telemetry()
        );
        Ok(())
    }
}
