//! Application telemetry events and sinks.
//!
//! The archives room runs unattended for long stretches, so each refresh and
//! batch assignment emits a small structured event. Events never leave the
//! machine; the stderr sink is meant for local debugging.

use std::io;

use serde::{Deserialize, Serialize};

/// A structured telemetry event emitted by the desk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A queue reload replaced the list.
    QueueRefreshed {
        /// Queue label (`pull`, `create`, `assigned-pull`, `assigned-create`
        /// or `merge`).
        queue: String,
        /// Number of records after the reload.
        record_count: usize,
        /// Wall-clock time spent on the fetch, in milliseconds.
        latency_ms: u64,
    },
    /// A queue reload failed and the previous list was kept.
    QueueRefreshFailed {
        /// Queue label.
        queue: String,
    },
    /// A batch of requests was assigned to the current user.
    RequestsAssigned {
        /// Label of the queue the requests were taken from.
        queue: String,
        /// Number of requests in the batch.
        count: usize,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Test doubles for telemetry sinks.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use std::sync::Mutex;

    use super::{TelemetryEvent, TelemetrySink};

    /// Sink that keeps every event for later assertions.
    #[derive(Debug, Default)]
    pub struct RecordingTelemetrySink {
        events: Mutex<Vec<TelemetryEvent>>,
    }

    impl RecordingTelemetrySink {
        /// Returns a copy of the events recorded so far.
        #[must_use]
        pub fn events(&self) -> Vec<TelemetryEvent> {
            self.events
                .lock()
                .map(|guard| guard.clone())
                .unwrap_or_default()
        }
    }

    impl TelemetrySink for RecordingTelemetrySink {
        fn record(&self, event: TelemetryEvent) {
            if let Ok(mut guard) = self.events.lock() {
                guard.push(event);
            }
        }
    }
}
