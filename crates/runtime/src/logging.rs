#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunLogEventKind {
    RunStarted,
    RunResumed,
    RunCompleted,
    RunStopped,
    ArtifactWritten,
}

/// One structured run-log entry, stamped with how many trade events the run
/// had processed when it was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLogEvent {
    pub events_processed: u64,
    pub kind: RunLogEventKind,
}

impl RunLogEvent {
    pub fn new(events_processed: u64, kind: RunLogEventKind) -> Self {
        Self {
            events_processed,
            kind,
        }
    }
}

pub trait RunLogWriter {
    fn write(&mut self, event: RunLogEvent);
}

#[derive(Debug, Default)]
pub struct InMemoryRunLogWriter {
    events: Vec<RunLogEvent>,
}

impl InMemoryRunLogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RunLogEvent] {
        &self.events
    }
}

impl RunLogWriter for InMemoryRunLogWriter {
    fn write(&mut self, event: RunLogEvent) {
        self.events.push(event);
    }
}
