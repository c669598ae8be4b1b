//! Single-writer tracker worker.
//!
//! One task owns every mutation of a [`SharedTracker`]: it drains the inbound
//! share queue and runs [`ShareTracker::maintain`] on a timer. Readers keep
//! querying through the shared handle; the latest maintenance report is
//! published on a `watch` channel for the networking layer, which uses
//! `desired` to request missing parents.

use std::time::Duration;

use sharechain_types::{Clock, ShareSummary};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

use crate::maintenance::MaintenanceReport;
use crate::shared::SharedTracker;
use crate::tracker::ShareTracker;
use crate::TrackerError;

/// Handle to a running tracker service.
pub struct TrackerService<C: Clock> {
    tracker: SharedTracker<C>,
    inbound: mpsc::Sender<ShareSummary>,
    reports: watch::Receiver<MaintenanceReport>,
    shutdown: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl<C> TrackerService<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Spawn the worker, using the interval and queue size from the tracker's config.
    pub fn spawn(tracker: ShareTracker<C>) -> Self {
        let interval = tracker.config().maintenance_interval();
        let capacity = tracker.config().inbound_capacity.max(1);
        Self::spawn_with(SharedTracker::new(tracker), interval, capacity)
    }

    /// Spawn the worker around an existing shared tracker.
    pub fn spawn_with(tracker: SharedTracker<C>, period: Duration, capacity: usize) -> Self {
        let (inbound, mut inbound_rx) = mpsc::channel::<ShareSummary>(capacity.max(1));
        let (report_tx, reports) = watch::channel(MaintenanceReport::default());
        let (shutdown, _) = broadcast::channel(1);
        let mut shutdown_rx = shutdown.subscribe();

        let worker = tracker.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => {
                        // Shares queued before shutdown was requested still count.
                        let mut drained = 0usize;
                        while let Ok(share) = inbound_rx.try_recv() {
                            accept(&worker, share);
                            drained += 1;
                        }
                        tracing::info!(drained, "tracker service shutting down");
                        break;
                    }
                    share = inbound_rx.recv() => {
                        let Some(share) = share else {
                            tracing::info!("inbound share queue closed, tracker service stopping");
                            break;
                        };
                        accept(&worker, share);
                    }
                    _ = interval.tick() => {
                        match worker.write(|t| t.maintain()) {
                            Ok(report) => {
                                let _ = report_tx.send(report);
                            }
                            Err(e) => tracing::warn!("tracker maintenance failed: {e}"),
                        }
                    }
                }
            }
        });

        Self {
            tracker,
            inbound,
            reports,
            shutdown,
            task,
        }
    }

    /// Queue a share for the worker to add.
    pub async fn submit(&self, share: ShareSummary) -> Result<(), TrackerError> {
        self.inbound
            .send(share)
            .await
            .map_err(|_| TrackerError::ServiceStopped)
    }

    /// A sender for producers that outlive a borrow of the service.
    pub fn sender(&self) -> mpsc::Sender<ShareSummary> {
        self.inbound.clone()
    }

    /// Receiver of the most recent maintenance report.
    pub fn reports(&self) -> watch::Receiver<MaintenanceReport> {
        self.reports.clone()
    }

    pub fn tracker(&self) -> &SharedTracker<C> {
        &self.tracker
    }

    /// Stop the worker and wait for it to finish.
    pub async fn shutdown(self) -> Result<(), TrackerError> {
        let _ = self.shutdown.send(());
        self.task.await.map_err(|_| TrackerError::ServiceStopped)
    }
}

/// Add one inbound share, logging anything other than success.
fn accept<C: Clock>(worker: &SharedTracker<C>, share: ShareSummary) {
    let hash = share.hash;
    match worker.write(|t| t.add(share)) {
        Ok(()) => {}
        Err(e) if e.is_soft() => tracing::debug!(%hash, "{e}"),
        Err(e) => tracing::warn!(%hash, "share rejected: {e}"),
    }
}
