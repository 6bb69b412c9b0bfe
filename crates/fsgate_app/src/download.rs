use fsgate_domain::{DownloadEvent, DownloadResult, Error};
use tokio::sync::{mpsc, oneshot};

/// Caller side of a running download: a subscription for intermediate events
/// and a single settlement.
///
/// The event buffer is bounded. Progress events that arrive while it is full
/// are dropped.
///
/// Dropping the handle cancels the job.
#[derive(Debug)]
pub struct DownloadHandle {
    job_id: u64,
    events: mpsc::Receiver<DownloadEvent>,
    result: oneshot::Receiver<anyhow::Result<DownloadResult>>,
}

impl DownloadHandle {
    pub fn new(
        job_id: u64,
        events: mpsc::Receiver<DownloadEvent>,
        result: oneshot::Receiver<anyhow::Result<DownloadResult>>,
    ) -> Self {
        Self { job_id, events, result }
    }

    pub fn job_id(&self) -> u64 {
        self.job_id
    }

    /// Next begin/progress event. `None` once the job has settled and every
    /// queued event was delivered.
    pub async fn next_event(&mut self) -> Option<DownloadEvent> {
        self.events.recv().await
    }

    /// Waits for the settlement, discarding events not yet read.
    pub async fn wait(self) -> anyhow::Result<DownloadResult> {
        let job_id = self.job_id;
        self.result
            .await
            .map_err(|_| Error::provider(format!("Download job {job_id} ended without settling")))?
    }

    /// Collects every remaining event, then the settlement.
    pub async fn finish(mut self) -> (Vec<DownloadEvent>, anyhow::Result<DownloadResult>) {
        let mut events = Vec::new();
        while let Some(event) = self.events.recv().await {
            events.push(event);
        }
        (events, self.wait().await)
    }
}
