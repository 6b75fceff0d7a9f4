//! Actors and the actor repository.
//!
//! An [`Actor`] is a timed actuator definition (identity + schedule) plus its
//! last-known applied state. The [`ActorRepository`] is the single source of
//! truth for "what actuators exist": built once at startup from
//! configuration, immutable in shape afterwards, mutable only in the
//! per-actor state fields driven by the control loop.

use chrono::{NaiveDateTime, NaiveTime};
use log::warn;
use serde::Serialize;

use crate::config::SystemConfig;
use crate::schedule::{parse_hhmm, Schedule, Window};

// ───────────────────────────────────────────────────────────────
// Output state
// ───────────────────────────────────────────────────────────────

/// The physical state of an actuator output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputState {
    Active,
    Inactive,
}

impl OutputState {
    /// Map a schedule verdict onto an output state.
    pub fn from_scheduled(active: bool) -> Self {
        if active {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Per-actor apply phase
// ───────────────────────────────────────────────────────────────

/// Per-tick reconciliation phase of a single actor.
///
/// ```text
/// Idle ──desired != last applied──▶ Applying ──ok──▶ Applied ─┐
///                                      │                      │ tick ends
///                                      └──err──▶ Failed ──────┤
/// Idle ◀──────────────────────────────────────────────────────┘
/// ```
///
/// `Failed` leaves the last-applied state untouched, so the mismatch is
/// still visible on the next tick and the apply is retried automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyPhase {
    Idle,
    Applying,
    Applied,
    Failed,
}

/// The state most recently *successfully* sent to the device controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedState {
    pub state: OutputState,
    pub at: NaiveDateTime,
}

// ───────────────────────────────────────────────────────────────
// Actor
// ───────────────────────────────────────────────────────────────

/// A scheduled physical actuator (valve, lamp) with on/off state driven by
/// daily time windows.
#[derive(Debug, Clone)]
pub struct Actor {
    id: String,
    schedule: Schedule,
    phase: ApplyPhase,
    last_applied: Option<AppliedState>,
}

impl Actor {
    pub fn new(id: String, schedule: Schedule) -> Self {
        Self {
            id,
            schedule,
            phase: ApplyPhase::Idle,
            last_applied: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn phase(&self) -> ApplyPhase {
        self.phase
    }

    pub fn last_applied(&self) -> Option<AppliedState> {
        self.last_applied
    }

    /// What the schedule wants this actor to be at `t`.
    pub fn desired_at(&self, t: NaiveTime) -> OutputState {
        OutputState::from_scheduled(self.schedule.is_active_at(t))
    }

    /// Whether `desired` differs from the last successfully applied state.
    /// An actor that has never been applied always needs an apply, so the
    /// physical output is forced into a known state on the first tick.
    pub fn needs_apply(&self, desired: OutputState) -> bool {
        self.last_applied.map(|a| a.state) != Some(desired)
    }

    /// Begin an apply. The phase machine admits at most one in-flight apply.
    pub fn begin_apply(&mut self) {
        debug_assert!(self.phase != ApplyPhase::Applying, "apply already in flight");
        self.phase = ApplyPhase::Applying;
    }

    /// The device call succeeded; commit the new applied state.
    pub fn complete_apply(&mut self, state: OutputState, at: NaiveDateTime) {
        self.phase = ApplyPhase::Applied;
        self.last_applied = Some(AppliedState { state, at });
    }

    /// The device call failed; last-applied stays as it was.
    pub fn fail_apply(&mut self) {
        self.phase = ApplyPhase::Failed;
    }

    /// Tick finished — return to Idle awaiting the next evaluation.
    pub fn finish_tick(&mut self) {
        self.phase = ApplyPhase::Idle;
    }
}

// ───────────────────────────────────────────────────────────────
// Repository
// ───────────────────────────────────────────────────────────────

/// In-memory collection of actors, keyed by identity.
///
/// Iteration order is configuration insertion order, so schedule evaluation
/// and logging are deterministic across runs.
pub struct ActorRepository {
    actors: Vec<Actor>,
}

impl ActorRepository {
    /// Build the repository from static configuration.
    ///
    /// A malformed actor definition (unparsable window, duplicate identity)
    /// excludes only that actor; the rest continue. The caller decides
    /// whether an empty result is fatal.
    pub fn from_config(config: &SystemConfig) -> Self {
        let mut actors: Vec<Actor> = Vec::with_capacity(config.actors.len());

        'next_actor: for ac in &config.actors {
            if actors.iter().any(|a| a.id() == ac.id) {
                warn!("Actor '{}': duplicate identity, skipping", ac.id);
                continue;
            }

            let mut windows = Vec::with_capacity(ac.windows.len());
            for wc in &ac.windows {
                let (Some(start), Some(end)) = (parse_hhmm(&wc.start), parse_hhmm(&wc.end)) else {
                    warn!(
                        "Actor '{}': bad window '{}'–'{}', skipping actor",
                        ac.id, wc.start, wc.end
                    );
                    continue 'next_actor;
                };
                windows.push(Window { start, end });
            }

            actors.push(Actor::new(ac.id.clone(), Schedule::new(windows)));
        }

        Self { actors }
    }

    /// Look up an actor by identity.
    pub fn get(&self, id: &str) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id() == id)
    }

    /// All actors in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.actors.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}
