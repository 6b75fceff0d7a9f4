//! Control service — the scheduling/orchestration core.
//!
//! [`ControlService`] owns the actor repository and the telemetry buffer,
//! and runs one reconciliation cycle per tick. All I/O flows through port
//! traits injected at call sites, making the entire service testable with
//! mock adapters.
//!
//! ```text
//!                    ┌─────────────────────────┐ ──▶ ClientService
//! DeviceController ◀─│      ControlService      │
//!                    │  reconcile · buffer ·    │ ◀── NetworkController
//!                    │  flush                   │     (observed only)
//!                    └─────────────────────────┘
//! ```
//!
//! Per-tick contract:
//! 1. every actor is evaluated in repository order, independently — one
//!    actor's device failure never blocks or skips the others;
//! 2. device calls are never gated on connectivity — actuator correctness
//!    is independent of cloud reachability;
//! 3. only after all actors complete does telemetry flushing begin, gated
//!    on the observed connectivity state.

use chrono::NaiveDateTime;
use log::{info, warn};

use crate::actor::ActorRepository;
use crate::config::SystemConfig;
use crate::telemetry::TelemetryBuffer;

use super::events::TelemetryEvent;
use super::ports::{ClientService, ConnectivityState, DeviceController, NetworkController};

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

/// The control-loop core: schedule evaluation, device reconciliation, and
/// connectivity-gated telemetry publishing.
pub struct ControlService {
    repo: ActorRepository,
    buffer: TelemetryBuffer,
    /// Disconnected ticks before a reconnect hint is issued.
    grace_ticks: u64,
    disconnected_ticks: u64,
    tick_count: u64,
}

impl ControlService {
    /// Construct the service from configuration.
    ///
    /// Per-actor configuration errors are isolated inside
    /// [`ActorRepository::from_config`]; the caller checks
    /// [`actor_count`](Self::actor_count) if an empty repository is fatal.
    pub fn new(config: &SystemConfig) -> Self {
        let repo = ActorRepository::from_config(config);
        let grace_ticks = (config.reconnect_grace_ms / config.tick_interval_ms.max(1)).max(1);
        Self {
            repo,
            buffer: TelemetryBuffer::new(config.telemetry_buffer_capacity),
            grace_ticks,
            disconnected_ticks: 0,
            tick_count: 0,
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: reconcile every actor, then flush
    /// telemetry as connectivity allows.
    ///
    /// Ticks are serialized by the caller; a new tick never starts before
    /// the previous one finishes.
    pub fn tick(
        &mut self,
        now: NaiveDateTime,
        device: &mut impl DeviceController,
        network: &mut impl NetworkController,
        client: &mut impl ClientService,
    ) {
        self.tick_count += 1;

        self.reconcile_actors(now, device);
        self.flush_telemetry(network, client);
    }

    /// Compare each actor's schedule-derived desired state against its
    /// last-applied state and drive any difference through the device port.
    fn reconcile_actors(&mut self, now: NaiveDateTime, device: &mut impl DeviceController) {
        let t = now.time();

        for actor in self.repo.iter_mut() {
            let desired = actor.desired_at(t);
            if !actor.needs_apply(desired) {
                continue;
            }

            actor.begin_apply();
            match device.apply(actor.id(), desired) {
                Ok(()) => {
                    info!("Actor '{}' applied {:?}", actor.id(), desired);
                    actor.complete_apply(desired, now);
                    self.buffer
                        .push(TelemetryEvent::applied(actor.id(), desired, now));
                }
                Err(e) => {
                    // Last-applied stays unchanged; the mismatch re-arms the
                    // apply on the next tick. One failure event per tick,
                    // not per retry attempt.
                    warn!("Actor '{}' apply {:?} failed: {}", actor.id(), desired, e);
                    actor.fail_apply();
                    self.buffer
                        .push(TelemetryEvent::failed(actor.id(), desired, now, e.to_string()));
                }
            }
        }

        for actor in self.repo.iter_mut() {
            actor.finish_tick();
        }
    }

    /// Drain the telemetry buffer in order while the link is up. A publish
    /// failure leaves the event at the head for the next Connected tick.
    fn flush_telemetry(&mut self, network: &mut impl NetworkController, client: &mut impl ClientService) {
        match network.connectivity() {
            ConnectivityState::Connected => {
                self.disconnected_ticks = 0;
                while let Some(event) = self.buffer.front() {
                    match client.publish(event) {
                        Ok(()) => {
                            let _ = self.buffer.pop_front();
                        }
                        Err(e) => {
                            warn!("Telemetry publish failed, retrying next tick: {}", e);
                            break;
                        }
                    }
                }
            }
            ConnectivityState::Disconnected => {
                self.disconnected_ticks += 1;
                if self.disconnected_ticks >= self.grace_ticks {
                    info!(
                        "Link down for {} ticks, hinting reconnect",
                        self.disconnected_ticks
                    );
                    network.request_reconnect();
                    self.disconnected_ticks = 0;
                }
            }
            // Recovery is in progress; keep buffering, never block on it.
            ConnectivityState::Reconnecting => {}
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Actors that survived configuration validation.
    pub fn actor_count(&self) -> usize {
        self.repo.len()
    }

    /// The actor repository (read-only).
    pub fn repository(&self) -> &ActorRepository {
        &self.repo
    }

    /// Telemetry events waiting for a network path.
    pub fn pending_telemetry(&self) -> usize {
        self.buffer.len()
    }

    /// Telemetry events lost to buffer overflow since startup.
    pub fn dropped_telemetry(&self) -> u64 {
        self.buffer.dropped()
    }
}
