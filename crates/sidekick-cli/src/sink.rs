use std::io::Write;

use sidekick_core::{Event, NotificationSink, SinkError};

/// Writes each event as one JSON line on stderr.
pub struct StderrSink;

impl NotificationSink for StderrSink {
    fn notify(&self, event: &Event) -> Result<(), SinkError> {
        let line = serde_json::to_string(event).map_err(|e| SinkError(e.to_string()))?;
        let mut err = std::io::stderr().lock();
        writeln!(err, "{line}").map_err(|e| SinkError(e.to_string()))
    }
}
