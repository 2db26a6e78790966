// Downloader module: format catalog resolution and media transfer

pub mod backends;
pub mod catalog;
pub mod errors;
pub mod format_table;
pub mod formats;
pub mod fragments;
pub mod manifest;
pub mod models;
pub mod orchestrator;
pub mod traits;
pub mod transfer;
pub mod utils;

pub use backends::HttpFetcher;
pub use catalog::{FormatCatalog, ResolvedFormat};
pub use errors::DownloadError;
pub use models::{
    DownloadOptions, DownloadProgress, NetworkConfig, TransferEvent, VideoInfo, VideoMetadata,
};
pub use orchestrator::{Downloader, VideoOutcome};
pub use traits::{ConsoleEmitter, PageFetcher, ProgressEmitter};
pub use transfer::TransferEngine;
