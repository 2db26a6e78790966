// Transfer engine
//
// Starting -> Transferring -> {Completed | Failed}
//
// The body is streamed to disk by a background task. The caller loops on a
// 500 ms ticker (progress report) and a one-shot completion channel until the
// task reports its outcome. Completion comes from that signal only; the total
// size may be unknown for chunked responses.

use futures::StreamExt;
use reqwest::{Client, Response, StatusCode};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::oneshot;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::errors::DownloadError;
use super::models::{DownloadProgress, TransferEvent};
use super::traits::ProgressEmitter;

pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);
/// Shortest accepted reporting interval; the ticker cannot run with a zero period
pub const MIN_PROGRESS_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPhase {
    Starting,
    Transferring,
    Completed,
    Failed,
}

/// Counters shared between the streaming task and the reporting loop
#[derive(Debug)]
pub struct TransferState {
    total: Option<u64>,
    bytes_complete: AtomicU64,
}

impl TransferState {
    pub fn new(total: Option<u64>) -> Self {
        Self {
            total,
            bytes_complete: AtomicU64::new(0),
        }
    }

    fn add(&self, bytes: u64) {
        self.bytes_complete.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DownloadProgress {
        let bytes_complete = self.bytes_complete.load(Ordering::Relaxed);
        let percent = match self.total {
            Some(total) if total > 0 => bytes_complete as f64 * 100.0 / total as f64,
            _ => 0.0,
        };
        DownloadProgress {
            bytes_complete,
            total: self.total,
            percent,
        }
    }
}

pub struct TransferEngine {
    client: Client,
    interval: Duration,
}

impl TransferEngine {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            interval: PROGRESS_INTERVAL,
        }
    }

    /// Override the reporting interval, clamped to `MIN_PROGRESS_INTERVAL`
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_PROGRESS_INTERVAL);
        self
    }

    /// Stream `url` into `dest`, creating or truncating it.
    ///
    /// Every error returned from here is a transfer error and therefore fatal.
    pub async fn download(
        &self,
        url: &str,
        dest: &Path,
        emitter: &dyn ProgressEmitter,
    ) -> Result<PathBuf, DownloadError> {
        let result = self.run(url, dest, emitter).await;

        match &result {
            Ok(path) => {
                log_phase(TransferPhase::Completed, url);
                emitter.emit(TransferEvent::Saved { path: path.clone() });
            }
            Err(e) => {
                log_phase(TransferPhase::Failed, url);
                emitter.emit(TransferEvent::Failed { cause: e.to_string() });
            }
        }

        result
    }

    async fn run(
        &self,
        url: &str,
        dest: &Path,
        emitter: &dyn ProgressEmitter,
    ) -> Result<PathBuf, DownloadError> {
        log_phase(TransferPhase::Starting, url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::Transfer(format!("request failed: {}", e)))?;

        let status = response.status();
        emitter.emit(TransferEvent::Started {
            url: url.to_string(),
            status: status.to_string(),
        });
        if !status.is_success() {
            return Err(DownloadError::Transfer(format!("server responded {}", status)));
        }

        let file = tokio::fs::File::create(dest).await.map_err(|e| {
            DownloadError::Transfer(format!("could not open {}: {}", dest.display(), e))
        })?;

        let state = Arc::new(TransferState::new(expected_length(&response)));
        let (done_tx, mut done_rx) = oneshot::channel();

        log_phase(TransferPhase::Transferring, url);
        let task_state = Arc::clone(&state);
        tokio::spawn(async move {
            let result = stream_body(response, file, &task_state).await;
            let _ = done_tx.send(result);
        });

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let outcome = loop {
            tokio::select! {
                _ = ticker.tick() => {
                    emitter.emit(TransferEvent::Progress(state.snapshot()));
                }
                result = &mut done_rx => {
                    break result.unwrap_or_else(|_| {
                        Err(DownloadError::Transfer("transfer task ended without a result".to_string()))
                    });
                }
            }
        };

        outcome?;
        tracing::debug!(
            "[Transfer] {} bytes written to {}",
            state.snapshot().bytes_complete,
            dest.display()
        );
        Ok(dest.to_path_buf())
    }
}

/// Content length when the server announced one; `None` for chunked or empty-length-less bodies
fn expected_length(response: &Response) -> Option<u64> {
    if response.status() == StatusCode::NO_CONTENT {
        return Some(0);
    }
    response.content_length()
}

async fn stream_body(
    response: Response,
    file: tokio::fs::File,
    state: &TransferState,
) -> Result<(), DownloadError> {
    let mut body = response.bytes_stream();
    let mut out = BufWriter::new(file);

    while let Some(chunk) = body.next().await {
        let chunk =
            chunk.map_err(|e| DownloadError::Transfer(format!("error reading response: {}", e)))?;
        out.write_all(&chunk)
            .await
            .map_err(|e| DownloadError::Transfer(format!("error writing file: {}", e)))?;
        state.add(chunk.len() as u64);
    }

    out.flush()
        .await
        .map_err(|e| DownloadError::Transfer(format!("error writing file: {}", e)))?;
    Ok(())
}

fn log_phase(phase: TransferPhase, url: &str) {
    tracing::debug!("[Transfer] {:?}: {}", phase, url);
}
