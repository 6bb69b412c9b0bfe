use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use fsgate_app::{
    DownloadHandle, DownloadInfra, EnvironmentInfra, FileDirectoryInfra, FileInfoInfra,
    FileRemoverInfra,
};
use fsgate_domain::{
    DownloadEvent, DownloadJob, DownloadResult, DownloadSignal, DownloadState, Error,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::FsGatePathResolver;

type Outcome = anyhow::Result<DownloadResult>;

/// Events buffered for a caller that is not reading them yet.
pub(crate) const EVENT_BUFFER: usize = 16;

/// Registry slot of a running job. `generation` tells apart successive jobs
/// that reuse the same id.
#[derive(Debug, Clone, Copy)]
struct JobEntry {
    generation: u64,
    state: DownloadState,
}

/// Running jobs keyed by id.
#[derive(Default)]
struct JobRegistry {
    jobs: DashMap<u64, JobEntry>,
    generations: AtomicU64,
}

impl JobRegistry {
    /// Claims `job_id` for a new job, failing while another job holds it.
    fn reserve(&self, job_id: u64) -> anyhow::Result<u64> {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed);
        match self.jobs.entry(job_id) {
            Entry::Occupied(_) => {
                Err(Error::InvalidArgument(format!("Download job {job_id} is already running")).into())
            }
            Entry::Vacant(slot) => {
                slot.insert(JobEntry { generation, state: DownloadState::Pending });
                Ok(generation)
            }
        }
    }

    fn update(&self, job_id: u64, generation: u64, state: DownloadState) {
        if let Some(mut entry) = self.jobs.get_mut(&job_id)
            && entry.generation == generation
        {
            entry.state = state;
        }
    }

    /// Frees `job_id` unless it already belongs to a later job.
    fn release(&self, job_id: u64, generation: u64) {
        self.jobs.remove_if(&job_id, |_, entry| entry.generation == generation);
    }

    fn state(&self, job_id: u64) -> Option<DownloadState> {
        self.jobs.get(&job_id).map(|entry| entry.state)
    }
}

/// Drives download jobs from submission to their single settlement.
///
/// Jobs are tracked only while they run; a job's entry disappears once it
/// reaches a terminal state.
pub struct FsGateDownloadCoordinator<F> {
    infra: Arc<F>,
    paths: FsGatePathResolver<F>,
    jobs: Arc<JobRegistry>,
}

impl<F> FsGateDownloadCoordinator<F>
where
    F: EnvironmentInfra + FileInfoInfra + FileDirectoryInfra + FileRemoverInfra + DownloadInfra,
{
    pub fn new(infra: Arc<F>) -> Self {
        Self {
            paths: FsGatePathResolver::new(infra.clone()),
            infra,
            jobs: Arc::new(JobRegistry::default()),
        }
    }

    /// Current state of a job that has not settled yet.
    pub fn state(&self, job_id: u64) -> Option<DownloadState> {
        self.jobs.state(job_id)
    }

    pub async fn download(&self, job: DownloadJob) -> anyhow::Result<DownloadHandle> {
        let job_id = job.job_id;
        url::Url::parse(&job.from_url)
            .map_err(|e| Error::InvalidArgument(format!("Invalid download url {}: {e}", job.from_url)))?;

        let generation = self.jobs.reserve(job_id)?;
        match self.start(job, generation).await {
            Ok(handle) => Ok(handle),
            Err(err) => {
                self.jobs.release(job_id, generation);
                Err(err)
            }
        }
    }

    async fn start(&self, job: DownloadJob, generation: u64) -> anyhow::Result<DownloadHandle> {
        let job_id = job.job_id;
        let to_file = self.paths.resolve(&job.to_file);
        self.clear_destination(&to_file).await?;

        let job = self.with_defaults(job.to_file(to_file));
        let (begin, progress) = (job.begin, job.progress);
        let mut state = DownloadState::Pending;

        info!(job_id, url = %job.from_url, "Submitting download");
        let signals = match self.infra.submit(job).await {
            Ok(signals) => signals,
            Err(err) => {
                let failed = state.advance(job_id, DownloadState::Failed)?;
                warn!(job_id, state = %failed, error = %err, "Download submission failed");
                return Err(err);
            }
        };
        state = state.advance(job_id, DownloadState::Active)?;
        self.jobs.update(job_id, generation, state);

        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (result_tx, result_rx) = oneshot::channel();
        let task = DownloadTask {
            job_id,
            generation,
            begin,
            progress,
            state,
            events: Some(event_tx),
            result: Some(result_tx),
            jobs: self.jobs.clone(),
        };
        tokio::spawn(task.run(signals));

        Ok(DownloadHandle::new(job_id, event_rx, result_rx))
    }

    /// Deletes a file already sitting at the destination. Directories and the
    /// sandbox root itself are refused untouched.
    async fn clear_destination(&self, to_file: &Path) -> anyhow::Result<()> {
        if to_file == self.infra.get_config().sandbox_root.as_path() {
            return Err(Error::InvalidArgument(format!(
                "Download destination {} is the sandbox root",
                to_file.display()
            ))
            .into());
        }
        if !self.infra.exists(to_file).await? {
            return Ok(());
        }
        if self.infra.meta(to_file).await?.is_dir {
            return Err(Error::expected_file(to_file).into());
        }

        debug!(path = %to_file.display(), "Removing existing download destination");
        self.infra
            .remove(to_file)
            .await
            .with_context(|| format!("Failed to replace {}", to_file.display()))
    }

    fn with_defaults(&self, mut job: DownloadJob) -> DownloadJob {
        let defaults = self.infra.get_config().download;
        job.connection_timeout.get_or_insert(defaults.connection_timeout_ms);
        job.read_timeout.get_or_insert(defaults.read_timeout_ms);
        job.progress_interval.get_or_insert(defaults.progress_interval_ms);
        job
    }
}

/// Owns one active job: maps provider signals to caller events and settles
/// the outward result exactly once.
struct DownloadTask {
    job_id: u64,
    generation: u64,
    begin: bool,
    progress: bool,
    state: DownloadState,
    events: Option<mpsc::Sender<DownloadEvent>>,
    result: Option<oneshot::Sender<Outcome>>,
    jobs: Arc<JobRegistry>,
}

impl DownloadTask {
    async fn run(mut self, mut signals: mpsc::Receiver<DownloadSignal>) {
        while let Some(signal) = self.next_signal(&mut signals).await {
            self.handle(signal);
        }
        self.jobs.release(self.job_id, self.generation);
        debug!(job_id = self.job_id, state = %self.state, "Download task finished");
    }

    /// Waits for the next provider signal while the job is unsettled. Once
    /// settled, only signals already queued are drained so late arrivals are
    /// observed and ignored.
    async fn next_signal(
        &mut self,
        signals: &mut mpsc::Receiver<DownloadSignal>,
    ) -> Option<DownloadSignal> {
        let Some(result) = self.result.as_mut() else {
            return signals.try_recv().ok();
        };

        tokio::select! {
            _ = result.closed() => {
                self.transition(DownloadState::Cancelled);
                info!(job_id = self.job_id, "Download cancelled by caller");
                None
            }
            signal = signals.recv() => {
                if signal.is_none() {
                    let message = format!("Download job {} ended without completion", self.job_id);
                    self.settle(DownloadState::Failed, Err(Error::provider(message).into()));
                }
                signal
            }
        }
    }

    fn handle(&mut self, signal: DownloadSignal) {
        let job_id = self.job_id;
        match signal {
            DownloadSignal::Begin { status_code, content_length, headers } => {
                debug!(job_id, status_code, content_length, "Download began");
                if self.begin {
                    self.emit(DownloadEvent::Begin { job_id, status_code, content_length, headers });
                }
            }
            DownloadSignal::Progress { content_length, bytes_written } => {
                if self.progress && content_length > 0 {
                    self.emit(DownloadEvent::Progress { job_id, content_length, bytes_written });
                }
            }
            DownloadSignal::Complete { status_code, bytes_written } => {
                let outcome = Ok(DownloadResult { job_id, status_code, bytes_written });
                self.settle(DownloadState::Completed, outcome);
            }
            DownloadSignal::Fail { message } => {
                self.settle(DownloadState::Failed, Err(Error::provider(message).into()));
            }
            DownloadSignal::Pause | DownloadSignal::Remove => {
                debug!(job_id, ?signal, "Ignoring lifecycle signal");
            }
        }
    }

    fn emit(&self, event: DownloadEvent) {
        let Some(events) = &self.events else {
            return;
        };
        // A closed channel means the caller stopped listening; the settlement
        // still matters.
        if let Err(mpsc::error::TrySendError::Full(event)) = events.try_send(event) {
            debug!(job_id = self.job_id, ?event, "Event buffer full, dropping event");
        }
    }

    fn settle(&mut self, next: DownloadState, outcome: Outcome) {
        if !self.transition(next) {
            return;
        }
        self.events = None;
        self.jobs.release(self.job_id, self.generation);
        if let Some(result) = self.result.take() {
            info!(job_id = self.job_id, state = %next, "Download settled");
            let _ = result.send(outcome);
        }
    }

    fn transition(&mut self, next: DownloadState) -> bool {
        match self.state.advance(self.job_id, next) {
            Ok(state) => {
                self.state = state;
                self.jobs.update(self.job_id, self.generation, state);
                true
            }
            Err(err) => {
                warn!(job_id = self.job_id, error = %err, attempted = %next, "Ignoring late download signal");
                false
            }
        }
    }
}
