//! Asynchronous report-recompute dispatcher.
//!
//! Mutations return [`RecomputeJob`] values; the caller hands them to this
//! dispatcher instead of anything firing implicitly on save. The worker
//! drains the queue and refreshes the latest report rows for each affected
//! account. Jobs are idempotent and at-least-once: a job that runs after a
//! newer mutation simply recomputes to the same final state, and a failed
//! job is re-enqueued by whichever mutation touches the account next.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use cambio_core::reports::RecomputeJob;

use super::report::ReportRepository;

/// Sending half of the recompute queue.
pub type RecomputeSender = mpsc::Sender<RecomputeJob>;

/// Spawns the recompute worker.
///
/// Returns the queue sender and the worker handle; dropping every sender
/// drains the queue and ends the worker.
#[must_use]
pub fn spawn_recompute_worker(
    reports: ReportRepository,
    queue_size: usize,
) -> (RecomputeSender, JoinHandle<()>) {
    let (sender, mut receiver) = mpsc::channel::<RecomputeJob>(queue_size);

    let handle = tokio::spawn(async move {
        while let Some(job) = receiver.recv().await {
            let account_id = job.account_id.into_inner();
            match reports.recompute_latest_for_account(account_id).await {
                Ok(()) => debug!(%account_id, "reports recomputed"),
                Err(error) => {
                    warn!(%account_id, %error, "report recompute failed");
                }
            }
        }
    });

    (sender, handle)
}

/// Enqueues jobs, logging when the queue is saturated.
///
/// A dropped job is not lost work forever: recomputation always re-derives
/// from current ledger state, so the next mutation on the account catches
/// the reports up.
pub async fn enqueue_jobs(sender: &RecomputeSender, jobs: Vec<RecomputeJob>) {
    for job in jobs {
        if let Err(error) = sender.send(job).await {
            warn!(%error, "recompute queue closed; job dropped");
        }
    }
}
