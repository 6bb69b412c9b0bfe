use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use anyhow::Context;
use fsgate_app::DownloadInfra;
use fsgate_domain::{DownloadConfig, DownloadJob, DownloadSignal};
use http::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{debug, info};

const SIGNAL_BUFFER: usize = 32;

/// Download provider streaming a GET response body into the destination
/// file and reporting its lifecycle as `DownloadSignal`s.
///
/// The transfer stops as soon as the receiving side is dropped.
pub struct FsGateHttpInfra {
    defaults: DownloadConfig,
}

impl FsGateHttpInfra {
    pub fn new(defaults: DownloadConfig) -> Self {
        Self { defaults }
    }

    /// Provider defaults overlaid with the job's own timeouts.
    fn timeouts(&self, job: &DownloadJob) -> DownloadConfig {
        DownloadConfig {
            connection_timeout_ms: job.connection_timeout.unwrap_or(self.defaults.connection_timeout_ms),
            read_timeout_ms: job.read_timeout.unwrap_or(self.defaults.read_timeout_ms),
            ..self.defaults.clone()
        }
    }

    fn client(&self, job: &DownloadJob) -> anyhow::Result<Client> {
        let timeouts = self.timeouts(job);
        Client::builder()
            .connect_timeout(timeouts.connection_timeout())
            .read_timeout(timeouts.read_timeout())
            .build()
            .context("Failed to build download client")
    }
}

#[async_trait::async_trait]
impl DownloadInfra for FsGateHttpInfra {
    async fn submit(&self, job: DownloadJob) -> anyhow::Result<mpsc::Receiver<DownloadSignal>> {
        let client = self.client(&job)?;
        let headers = header_map(&job.headers)?;
        let (tx, rx) = mpsc::channel(SIGNAL_BUFFER);

        tokio::spawn(async move {
            let job_id = job.job_id;
            let signal = match transfer(&client, headers, &job, &tx).await {
                Ok(Some(signal)) => signal,
                Ok(None) => {
                    info!(job_id, "Download receiver dropped, transfer stopped");
                    return;
                }
                Err(err) => DownloadSignal::Fail { message: format!("{err:#}") },
            };
            let _ = tx.send(signal).await;
        });

        Ok(rx)
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> anyhow::Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .with_context(|| format!("Invalid header name: {name}"))?;
        let value = HeaderValue::from_str(value)
            .with_context(|| format!("Invalid value for header {name}"))?;
        map.insert(name, value);
    }
    Ok(map)
}

fn response_headers(response: &Response) -> BTreeMap<String, String> {
    response
        .headers()
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect()
}

/// Runs one transfer. `Ok(None)` means the receiver went away mid-transfer.
async fn transfer(
    client: &Client,
    headers: HeaderMap,
    job: &DownloadJob,
    signals: &mpsc::Sender<DownloadSignal>,
) -> anyhow::Result<Option<DownloadSignal>> {
    let mut response = client
        .get(&job.from_url)
        .headers(headers)
        .send()
        .await
        .with_context(|| format!("Failed to request {}", job.from_url))?;

    let status_code = response.status().as_u16();
    let content_length = response.content_length().unwrap_or(0);
    debug!(job_id = job.job_id, status_code, content_length, "Download response received");

    let begin = DownloadSignal::Begin {
        status_code,
        content_length,
        headers: response_headers(&response),
    };
    if signals.send(begin).await.is_err() {
        return Ok(None);
    }

    let mut file = tokio::fs::File::create(&job.to_file)
        .await
        .with_context(|| format!("Failed to create {}", job.to_file.display()))?;
    let mut gate = ProgressGate::new(job);
    let mut bytes_written = 0u64;

    while let Some(chunk) = response
        .chunk()
        .await
        .with_context(|| format!("Failed to read response body of {}", job.from_url))?
    {
        file.write_all(&chunk)
            .await
            .with_context(|| format!("Failed to write {}", job.to_file.display()))?;
        bytes_written += chunk.len() as u64;

        if gate.should_report(bytes_written, content_length) {
            let progress = DownloadSignal::Progress { content_length, bytes_written };
            if signals.send(progress).await.is_err() {
                return Ok(None);
            }
        }
    }

    file.flush()
        .await
        .with_context(|| format!("Failed to flush {}", job.to_file.display()))?;
    drop(file);

    Ok(Some(DownloadSignal::Complete { status_code, bytes_written }))
}

/// Throttles progress reports. A non-zero interval limits reports to one per
/// interval; otherwise a non-zero divider reports every `100 / divider`
/// percent; otherwise every chunk is reported.
struct ProgressGate {
    interval: Duration,
    divider: u32,
    last_report: Option<Instant>,
    last_percent: u64,
}

impl ProgressGate {
    fn new(job: &DownloadJob) -> Self {
        Self {
            interval: Duration::from_millis(job.progress_interval.unwrap_or(0)),
            divider: job.progress_divider.unwrap_or(0),
            last_report: None,
            last_percent: 0,
        }
    }

    fn should_report(&mut self, written: u64, total: u64) -> bool {
        if !self.interval.is_zero() {
            let due = self.last_report.is_none_or(|at| at.elapsed() >= self.interval);
            if due {
                self.last_report = Some(Instant::now());
            }
            return due;
        }

        if self.divider > 0 && total > 0 {
            let step = u64::from((100 / self.divider).max(1));
            let percent = written.saturating_mul(100) / total;
            if percent >= self.last_percent + step || written >= total {
                self.last_percent = percent;
                return true;
            }
            return false;
        }

        true
    }
}
