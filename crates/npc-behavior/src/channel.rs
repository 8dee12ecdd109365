//! Per-tick buffer of outbound events.
//!
//! Events are emitted while agents are being stepped and delivered to the
//! decision-maker and observers only at the end of the tick, so a callback
//! that mutates a schedule never runs while that schedule is mid-update.

use std::collections::VecDeque;

use tracing::trace;

use crate::{FeedbackRecord, PerceptionEvent};

#[derive(Clone, Debug, PartialEq)]
pub enum OutboundEvent {
    Feedback(FeedbackRecord),
    Perception(PerceptionEvent),
}

/// FIFO of events emitted during the current tick.
#[derive(Debug, Default)]
pub struct EventChannel {
    queue: VecDeque<OutboundEvent>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire-and-forget: never blocks, never fails.
    pub fn emit_feedback(&mut self, record: FeedbackRecord) {
        trace!(agent = %record.agent, activity = %record.activity, success = record.success, "feedback queued");
        self.queue.push_back(OutboundEvent::Feedback(record));
    }

    pub fn emit_perception(&mut self, event: PerceptionEvent) {
        trace!(agent = %event.agent, kind = %event.kind, "perception queued");
        self.queue.push_back(OutboundEvent::Perception(event));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Remove and return everything queued, oldest first.
    pub fn drain(&mut self) -> std::collections::vec_deque::Drain<'_, OutboundEvent> {
        self.queue.drain(..)
    }
}
