//! Bounded telemetry buffer.
//!
//! Holds cloud-bound events while the wide-area link is down. The buffer is
//! the only shared mutable resource between the evaluation path and the
//! publish path, and it is owned exclusively by the control service — no
//! locking, single-owner discipline.
//!
//! Overflow policy: oldest-dropped. Under a sustained outage the freshest
//! state is worth more than a complete history.

use std::collections::VecDeque;

use log::warn;

use crate::app::events::TelemetryEvent;

/// FIFO of pending telemetry events with a hard capacity.
pub struct TelemetryBuffer {
    queue: VecDeque<TelemetryEvent>,
    capacity: usize,
    dropped: u64,
}

impl TelemetryBuffer {
    /// `capacity` of zero is clamped to one so a push is never a silent no-op.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    /// Append an event, dropping the oldest one if the buffer is full.
    pub fn push(&mut self, event: TelemetryEvent) {
        if self.queue.len() == self.capacity {
            if let Some(lost) = self.queue.pop_front() {
                self.dropped += 1;
                warn!(
                    "Telemetry buffer full ({}), dropping oldest event for '{}'",
                    self.capacity, lost.actor_id
                );
            }
        }
        self.queue.push_back(event);
    }

    /// The oldest pending event, left in place until [`pop_front`] confirms
    /// a successful publish.
    ///
    /// [`pop_front`]: TelemetryBuffer::pop_front
    pub fn front(&self) -> Option<&TelemetryEvent> {
        self.queue.front()
    }

    /// Remove the oldest pending event after it was published.
    pub fn pop_front(&mut self) -> Option<TelemetryEvent> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total events lost to overflow since startup.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
