// Collaborator traits: page fetching and progress reporting

use async_trait::async_trait;

use super::errors::DownloadError;
use super::models::{DownloadProgress, TransferEvent};

/// Fetches a URL and returns the whole body as text
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Name of the fetcher (for logging)
    fn name(&self) -> &'static str;

    /// Any status other than 200 OK is an error
    async fn fetch_page(&self, url: &str) -> Result<String, DownloadError>;
}

/// Receives transfer events as they happen
pub trait ProgressEmitter: Send + Sync {
    fn emit(&self, event: TransferEvent);
}

/// Prints transfer events to the console
#[derive(Debug, Default)]
pub struct ConsoleEmitter;

impl ConsoleEmitter {
    pub fn new() -> Self {
        Self
    }

    fn render(event: &TransferEvent) -> String {
        match event {
            TransferEvent::Started { url, status } => format!("Downloading {}...\n  {}", url, status),
            TransferEvent::Progress(progress) => Self::render_progress(progress),
            TransferEvent::Saved { path } => format!("Download saved to {}", path.display()),
            TransferEvent::Failed { cause } => format!("Download failed: {}", cause),
        }
    }

    fn render_progress(progress: &DownloadProgress) -> String {
        let total = progress
            .total
            .map(|t| t.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        format!(
            "  transferred {} / {} bytes ({:.2}%)",
            progress.bytes_complete, total, progress.percent
        )
    }
}

impl ProgressEmitter for ConsoleEmitter {
    fn emit(&self, event: TransferEvent) {
        let line = Self::render(&event);
        match event {
            TransferEvent::Failed { .. } => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }
}
