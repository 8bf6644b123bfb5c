//! Destinations for stage events.

use notetube_core::StageEvent;
use tokio::sync::mpsc::UnboundedSender;

/// Receives stage events in order. `emit` returns `false` once the consumer
/// is gone; the pipeline stops at the next stage boundary.
pub trait StageSink: Send {
    fn emit(&mut self, event: StageEvent) -> bool;

    fn is_closed(&self) -> bool {
        false
    }
}

/// Streaming transport: the HTTP body drains the receiver.
impl StageSink for UnboundedSender<StageEvent> {
    fn emit(&mut self, event: StageEvent) -> bool {
        self.send(event).is_ok()
    }

    fn is_closed(&self) -> bool {
        UnboundedSender::is_closed(self)
    }
}

/// Aggregate mode: events are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StageSink for NullSink {
    fn emit(&mut self, _event: StageEvent) -> bool {
        true
    }
}

/// Collects events in memory.
impl StageSink for Vec<StageEvent> {
    fn emit(&mut self, event: StageEvent) -> bool {
        self.push(event);
        true
    }
}
