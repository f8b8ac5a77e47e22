//! Queue reloads and the refresh-all pass.

use std::sync::Arc;

use tokio::time::Instant;

use super::ArchivesRoom;
use crate::archives::endpoint::QueueKind;
use crate::archives::error::DeskError;
use crate::telemetry::TelemetryEvent;

const MERGE_QUEUE_LABEL: &str = "merge";

/// Which queues one refresh pass managed to reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Labels of the queues that reloaded, in refresh order.
    pub refreshed: Vec<&'static str>,
    /// Labels of the queues that kept their previous contents.
    pub failed: Vec<&'static str>,
}

impl RefreshReport {
    /// Returns true when every queue reloaded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn push(&mut self, label: &'static str, succeeded: bool) {
        if succeeded {
            self.refreshed.push(label);
        } else {
            self.failed.push(label);
        }
    }
}

impl ArchivesRoom {
    /// Reloads pull, create, assigned create, assigned pull, and merge, in
    /// that order.
    ///
    /// A queue that fails keeps its contents and shows one error; the
    /// remaining queues still reload.
    pub async fn refresh_all_queues(&mut self) -> RefreshReport {
        let mut report = RefreshReport::default();

        for kind in QueueKind::ALL {
            let reloaded = self.reload_queue(kind).await.is_ok();
            report.push(kind.label(), reloaded);
        }

        let merges_reloaded = self.reload_merge_queue().await.is_ok();
        report.push(MERGE_QUEUE_LABEL, merges_reloaded);

        tracing::debug!(
            refreshed = report.refreshed.len(),
            failed = report.failed.len(),
            "queues refreshed"
        );
        report
    }

    /// Reloads one request queue and records its latency.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after the queue has notified the user.
    pub async fn reload_queue(&mut self, kind: QueueKind) -> Result<usize, DeskError> {
        let gateway = Arc::clone(&self.gateway);
        let notifier = Arc::clone(&self.notifier);
        let started = Instant::now();

        let result = self
            .queue_mut(kind)
            .load(gateway.as_ref(), notifier.as_ref())
            .await
            .map(|summary| summary.record_count);

        self.record_refresh(kind.label(), started, result.as_ref().ok().copied());
        result
    }

    async fn reload_merge_queue(&mut self) -> Result<usize, DeskError> {
        let started = Instant::now();
        let result = self
            .merges
            .load(self.gateway.as_ref(), self.notifier.as_ref())
            .await;

        self.record_refresh(MERGE_QUEUE_LABEL, started, result.as_ref().ok().copied());
        result
    }

    fn record_refresh(&self, queue: &str, started: Instant, record_count: Option<usize>) {
        let event = record_count.map_or_else(
            || TelemetryEvent::QueueRefreshFailed {
                queue: queue.to_owned(),
            },
            |count| TelemetryEvent::QueueRefreshed {
                queue: queue.to_owned(),
                record_count: count,
                latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            },
        );
        self.telemetry.record(event);
    }
}
