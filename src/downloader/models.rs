// Common data models for the downloader

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use super::catalog::FormatCatalog;

/// Flat, possibly multi-valued key/value metadata as served by the video info endpoint
#[derive(Debug, Clone, Default)]
pub struct VideoMetadata {
    values: HashMap<String, Vec<String>>,
}

impl VideoMetadata {
    /// Decode a URL-encoded query string body
    pub fn from_query(raw: &str) -> Self {
        url::form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// First value for `key`, if any
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// First value for `key` when present and non-empty
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

impl FromIterator<(String, String)> for VideoMetadata {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in iter {
            values.entry(key).or_default().push(value);
        }
        Self { values }
    }
}

/// Video information together with its resolved format catalog
#[derive(Debug, Clone, Serialize)]
pub struct VideoInfo {
    pub video_id: String,
    pub title: String,
    pub author: String,
    pub duration: String,
    pub view_count: u64,
    pub formats: FormatCatalog,
}

/// Per-run download options
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Format id to download
    pub format: Option<u32>,
    /// Print the catalog instead of downloading
    pub list_formats: bool,
    pub json: bool,
    pub pretty_json: bool,
    /// Fetch metadata over HTTPS
    pub secure: bool,
    pub output_dir: PathBuf,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            format: None,
            list_formats: false,
            json: false,
            pretty_json: false,
            secure: false,
            output_dir: PathBuf::from("."),
        }
    }
}

/// Network configuration for the HTTP backend
#[derive(Debug, Clone, Default)]
pub struct NetworkConfig {
    /// HTTP or SOCKS5 proxy URL (e.g., "socks5://127.0.0.1:1080")
    pub proxy: Option<String>,
}

/// Snapshot of an in-flight transfer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DownloadProgress {
    pub bytes_complete: u64,
    /// Unknown for chunked responses
    pub total: Option<u64>,
    pub percent: f64,
}

/// Observable side effects of the transfer engine
#[derive(Debug, Clone, PartialEq)]
pub enum TransferEvent {
    Started { url: String, status: String },
    Progress(DownloadProgress),
    Saved { path: PathBuf },
    Failed { cause: String },
}
