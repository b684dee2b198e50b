use crate::frame::Frame;

/// Event kinds emitted by the view loop.
///
/// Kept as plain constants so log filters and tests can match on them
/// without a dependency on the emitting crate.
pub mod kinds {
    pub const SESSION: &str = "session";
    pub const SNAPSHOT: &str = "snapshot";
    pub const FILTER: &str = "filter";
    pub const TRANSITION: &str = "transition";
    pub const SUBMISSION: &str = "submission";
}

/// Frame-stamped structured event for traceability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame: Frame, kind: &'static str, message: impl Into<String>) {
        self.events.push(Event {
            frame_index: frame.index,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
