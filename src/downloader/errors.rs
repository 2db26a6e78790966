// Error types for format resolution and transfers

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// URL does not contain a recognisable video id
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Connection-level failure while fetching a page
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Page fetch answered with anything but 200 OK
    #[error("HTTP status {0}")]
    HttpStatus(StatusCode),

    /// Metadata or manifest could not be decoded
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Requested format id is not in the resolved catalog
    #[error("Format {0} is not available for this video")]
    FormatNotAvailable(String),

    /// Failure after a transfer has started
    #[error("{0}")]
    Transfer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    /// Transfer failures end the process; everything else only skips the current video.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Transfer(_))
    }
}

impl From<quick_xml::Error> for DownloadError {
    fn from(e: quick_xml::Error) -> Self {
        Self::ParseError(format!("manifest: {}", e))
    }
}
