//! Schedule evaluation.
//!
//! A schedule is a set of daily time windows. Evaluation is a pure function
//! of (schedule, timestamp) — no hidden state — so it is independently
//! testable and the control loop stays deterministic.
//!
//! Window semantics:
//! - inclusive start, exclusive end, so back-to-back windows across days
//!   never double-fire at the shared boundary;
//! - `start > end` wraps past midnight (the window spans two calendar days);
//! - `start == end` is empty, never active;
//! - overlapping windows resolve to plain "active" (union).

use chrono::NaiveTime;

/// One daily activity window, local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Window {
    /// Whether `t` falls inside this window.
    pub fn contains(&self, t: NaiveTime) -> bool {
        use core::cmp::Ordering;
        match self.start.cmp(&self.end) {
            // Plain daytime window, e.g. 08:00–08:30.
            Ordering::Less => t >= self.start && t < self.end,
            // Overnight window, e.g. 22:00–05:00.
            Ordering::Greater => t >= self.start || t < self.end,
            // Degenerate window — treat as empty rather than always-on.
            Ordering::Equal => false,
        }
    }
}

/// The full schedule of one actor.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    windows: Vec<Window>,
}

impl Schedule {
    pub fn new(windows: Vec<Window>) -> Self {
        Self { windows }
    }

    /// Whether the actor should be active at `t` (union over windows).
    pub fn is_active_at(&self, t: NaiveTime) -> bool {
        self.windows.iter().any(|w| w.contains(t))
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }
}

/// Parse an "HH:MM" 24-hour wall-clock string.
pub fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}
