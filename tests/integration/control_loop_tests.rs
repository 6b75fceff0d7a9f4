//! Scenario tests for the ControlService reconciliation path.
//!
//! Drive the service tick-by-tick with explicit wall-clock timestamps and
//! assert on the device command history and actor state.

use crate::mock_ports::{MockClient, MockDevice, MockNetwork};

use chrono::NaiveDateTime;
use greengate::actor::OutputState;
use greengate::app::ports::{ConnectivityState, DeviceError};
use greengate::app::service::ControlService;
use greengate::config::{ActorConfig, SystemConfig, WindowConfig};

fn window(start: &str, end: &str) -> WindowConfig {
    WindowConfig {
        start: start.into(),
        end: end.into(),
    }
}

fn config(actors: Vec<(&str, Vec<WindowConfig>)>) -> SystemConfig {
    SystemConfig {
        actors: actors
            .into_iter()
            .map(|(id, windows)| ActorConfig {
                id: id.into(),
                windows,
            })
            .collect(),
        ..SystemConfig::default()
    }
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

struct Harness {
    svc: ControlService,
    device: MockDevice,
    network: MockNetwork,
    client: MockClient,
}

impl Harness {
    fn new(cfg: &SystemConfig) -> Self {
        Self {
            svc: ControlService::new(cfg),
            device: MockDevice::new(),
            network: MockNetwork::fixed(ConnectivityState::Connected),
            client: MockClient::new(),
        }
    }

    fn tick(&mut self, now: NaiveDateTime) {
        self.svc
            .tick(now, &mut self.device, &mut self.network, &mut self.client);
    }
}

// ── Scheduled activation ──────────────────────────────────────

#[test]
fn valve_applies_active_once_inside_window() {
    let cfg = config(vec![("valve-1", vec![window("08:00", "08:30")])]);
    let mut h = Harness::new(&cfg);

    // First tick before the window forces the output into a known state.
    h.tick(at(7, 0));
    assert_eq!(h.device.last_state_for("valve-1"), Some(OutputState::Inactive));

    // 08:05, last applied = inactive → exactly one apply(active).
    h.tick(at(8, 5));
    assert_eq!(h.device.applies_for("valve-1"), 2);
    assert_eq!(h.device.last_state_for("valve-1"), Some(OutputState::Active));

    let actor = h.svc.repository().get("valve-1").unwrap();
    assert_eq!(actor.last_applied().unwrap().state, OutputState::Active);
    assert_eq!(actor.last_applied().unwrap().at, at(8, 5));

    // Still inside the window — no redundant device call.
    h.tick(at(8, 10));
    assert_eq!(h.device.applies_for("valve-1"), 2);
}

#[test]
fn valve_deactivates_when_window_ends() {
    let cfg = config(vec![("valve-1", vec![window("08:00", "08:30")])]);
    let mut h = Harness::new(&cfg);

    h.tick(at(8, 5));
    assert_eq!(h.device.last_state_for("valve-1"), Some(OutputState::Active));

    // End is exclusive: 08:30 is already outside.
    h.tick(at(8, 30));
    assert_eq!(h.device.last_state_for("valve-1"), Some(OutputState::Inactive));
}

#[test]
fn overnight_window_active_across_midnight() {
    let cfg = config(vec![("lamp-1", vec![window("22:00", "05:00")])]);
    let mut h = Harness::new(&cfg);

    h.tick(at(23, 30));
    assert_eq!(h.device.last_state_for("lamp-1"), Some(OutputState::Active));

    h.tick(at(6, 0));
    assert_eq!(h.device.last_state_for("lamp-1"), Some(OutputState::Inactive));
}

// ── Device failure handling ───────────────────────────────────

#[test]
fn failed_apply_is_retried_on_next_tick() {
    let cfg = config(vec![("valve-1", vec![window("08:00", "08:30")])]);
    let mut h = Harness::new(&cfg);
    h.device.fail_actor("valve-1", DeviceError::Unreachable);

    h.tick(at(8, 5));
    let actor = h.svc.repository().get("valve-1").unwrap();
    assert!(actor.last_applied().is_none(), "failed call must not commit");

    // 08:10 tick retries automatically, no external nudge needed.
    h.tick(at(8, 10));
    assert_eq!(h.device.applies_for("valve-1"), 2);

    // Fault clears; the retry finally lands.
    h.device.clear_failures();
    h.tick(at(8, 15));
    assert_eq!(h.device.applies_for("valve-1"), 3);
    let actor = h.svc.repository().get("valve-1").unwrap();
    assert_eq!(actor.last_applied().unwrap().state, OutputState::Active);
    assert_eq!(actor.last_applied().unwrap().at, at(8, 15));
}

#[test]
fn one_failing_actor_does_not_block_the_others() {
    let cfg = config(vec![
        ("valve-1", vec![window("08:00", "08:30")]),
        ("valve-2", vec![window("08:00", "08:45")]),
    ]);
    let mut h = Harness::new(&cfg);
    h.device.fail_actor("valve-1", DeviceError::HardwareFault);

    h.tick(at(8, 5));
    assert_eq!(h.device.last_state_for("valve-2"), Some(OutputState::Active));
    let valve2 = h.svc.repository().get("valve-2").unwrap();
    assert_eq!(valve2.last_applied().unwrap().state, OutputState::Active);
}

#[test]
fn at_most_one_failure_event_per_actor_per_tick() {
    let cfg = config(vec![("valve-1", vec![window("08:00", "08:30")])]);
    let mut h = Harness::new(&cfg);
    h.device.fail_actor("valve-1", DeviceError::Timeout);
    h.client.fail_with = Some(greengate::app::ports::PublishError::Rejected);

    h.tick(at(8, 5));
    assert_eq!(h.svc.pending_telemetry(), 1, "one failure event, not one per attempt");

    let ev = {
        h.client.fail_with = None;
        h.tick(at(8, 6));
        h.client.published.first().cloned().unwrap()
    };
    assert_eq!(ev.actor_id, "valve-1");
    assert_eq!(ev.state, OutputState::Active);
    assert!(ev.error.is_some());
}

// ── Telemetry content ─────────────────────────────────────────

#[test]
fn successful_apply_publishes_snapshot() {
    let cfg = config(vec![("valve-1", vec![window("08:00", "08:30")])]);
    let mut h = Harness::new(&cfg);

    h.tick(at(8, 5));
    assert_eq!(h.client.published.len(), 1);
    let ev = &h.client.published[0];
    assert_eq!(ev.actor_id, "valve-1");
    assert_eq!(ev.state, OutputState::Active);
    assert_eq!(ev.at, at(8, 5));
    assert!(ev.error.is_none());
}
