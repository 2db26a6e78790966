// Per-video pipeline: info fetch -> resolve -> select -> transfer

use std::path::{Path, PathBuf};

use super::catalog::{FormatCatalog, ResolvedFormat};
use super::errors::DownloadError;
use super::fragments::parse_fragments;
use super::manifest::fetch_manifest;
use super::models::{DownloadOptions, VideoInfo, VideoMetadata};
use super::traits::{PageFetcher, ProgressEmitter};
use super::transfer::TransferEngine;
use super::utils::{extract_video_id, parse_or_zero, to_safe_filename};

const VIDEO_INFO_HOST: &str = "www.youtube.com/get_video_info";
const MANIFEST_FIELD: &str = "dashmpd";

/// What processing one video produced
#[derive(Debug)]
pub enum VideoOutcome {
    /// `--list-formats`: the resolved catalog, for the presentation layer
    Listed(VideoInfo),
    /// A format was downloaded to this path
    Saved(PathBuf),
}

pub struct Downloader {
    fetcher: Box<dyn PageFetcher>,
    transfer: TransferEngine,
}

impl Downloader {
    pub fn new(fetcher: Box<dyn PageFetcher>, transfer: TransferEngine) -> Self {
        Self { fetcher, transfer }
    }

    /// Metadata endpoint for `video_id`
    pub fn video_info_url(video_id: &str, secure: bool) -> String {
        let scheme = if secure { "https" } else { "http" };
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("video_id", video_id)
            .append_pair("el", "info")
            .append_pair("ps", "default")
            .append_pair("eurl", "")
            .append_pair("gl", "US")
            .append_pair("hl", "en")
            .finish();
        format!("{}://{}?{}", scheme, VIDEO_INFO_HOST, query)
    }

    /// Fetch metadata for `video_url` and resolve its format catalog.
    ///
    /// Fragment formats are resolved first, then the manifest (when announced).
    /// A manifest that cannot be fetched or parsed is logged and skipped.
    pub async fn get_video_info(
        &self,
        video_url: &str,
        secure: bool,
    ) -> Result<VideoInfo, DownloadError> {
        let video_id = extract_video_id(video_url)?;
        let info_url = Self::video_info_url(&video_id, secure);

        tracing::debug!("[Downloader] Fetching video info via {}: {}", self.fetcher.name(), info_url);
        let body = self.fetcher.fetch_page(&info_url).await?;
        let metadata = VideoMetadata::from_query(&body);

        let fragments = parse_fragments(&metadata);
        let mut formats = FormatCatalog::new();
        formats.resolve_fragments(&fragments.fragments);

        match metadata.get_non_empty(MANIFEST_FIELD) {
            Some(manifest_url) => match fetch_manifest(self.fetcher.as_ref(), manifest_url).await {
                Ok(representations) => formats.resolve_manifest(&representations),
                Err(e) => tracing::warn!("[Downloader] Unable to use DASH manifest: {}", e),
            },
            None => tracing::debug!("[Downloader] No DASH manifest announced"),
        }

        let view_count = fragments
            .view_count
            .unwrap_or_else(|| parse_or_zero(metadata.get("view_count")));

        tracing::info!("[Downloader] {} formats resolved for {}", formats.len(), video_id);

        Ok(VideoInfo {
            title: metadata.get("title").unwrap_or_default().to_string(),
            author: metadata.get("author").unwrap_or_default().to_string(),
            duration: metadata.get("length_seconds").unwrap_or_default().to_string(),
            video_id,
            view_count,
            formats,
        })
    }

    /// Look up the requested format in the resolved catalog
    pub fn select_format<'a>(
        info: &'a VideoInfo,
        format_id: u32,
    ) -> Result<&'a ResolvedFormat, DownloadError> {
        let key = format_id.to_string();
        info.formats
            .get(&key)
            .ok_or(DownloadError::FormatNotAvailable(key))
    }

    /// `<output_dir>/<title>.<ext>`, the title made safe for the filesystem
    pub fn destination(info: &VideoInfo, format: &ResolvedFormat, output_dir: &Path) -> PathBuf {
        let stem = to_safe_filename(&info.title, &info.video_id);
        let file_name = if format.ext.is_empty() {
            stem
        } else {
            format!("{}.{}", stem, format.ext)
        };
        output_dir.join(file_name)
    }

    /// Run the whole pipeline for one requested video
    pub async fn process(
        &self,
        video_url: &str,
        options: &DownloadOptions,
        emitter: &dyn ProgressEmitter,
    ) -> Result<VideoOutcome, DownloadError> {
        tracing::info!("[Downloader] Download video: {}", video_url);

        let info = self.get_video_info(video_url, options.secure).await?;
        if options.list_formats {
            return Ok(VideoOutcome::Listed(info));
        }

        let format_id = options
            .format
            .ok_or_else(|| DownloadError::FormatNotAvailable("(none selected)".to_string()))?;
        let format = Self::select_format(&info, format_id)?;
        if format.url.is_empty() {
            return Err(DownloadError::FormatNotAvailable(format_id.to_string()));
        }

        let dest = Self::destination(&info, format, &options.output_dir);
        tracing::debug!("[Downloader] Format {} -> {}", format_id, dest.display());

        let saved = self.transfer.download(&format.url, &dest, emitter).await?;
        Ok(VideoOutcome::Saved(saved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::models::TransferEvent;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::collections::HashMap;

    const VIDEO_ID: &str = "dQw4w9WgXcQ";
    const VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    /// Serves canned pages; any other URL answers 404
    #[derive(Default)]
    struct MemoryFetcher {
        pages: HashMap<String, String>,
    }

    impl MemoryFetcher {
        fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }
    }

    #[async_trait]
    impl PageFetcher for MemoryFetcher {
        fn name(&self) -> &'static str {
            "memory"
        }

        async fn fetch_page(&self, url: &str) -> Result<String, DownloadError> {
            self.pages
                .get(url)
                .cloned()
                .ok_or(DownloadError::HttpStatus(StatusCode::NOT_FOUND))
        }
    }

    struct SilentEmitter;

    impl ProgressEmitter for SilentEmitter {
        fn emit(&self, _event: TransferEvent) {}
    }

    fn info_body(fields: &[(&str, &str)]) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in fields {
            query.append_pair(key, value);
        }
        query.finish()
    }

    fn downloader(fetcher: MemoryFetcher) -> Downloader {
        Downloader::new(Box::new(fetcher), TransferEngine::new(reqwest::Client::new()))
    }

    fn info_url() -> String {
        Downloader::video_info_url(VIDEO_ID, false)
    }

    #[test]
    fn test_video_info_url() {
        assert_eq!(
            Downloader::video_info_url(VIDEO_ID, false),
            "http://www.youtube.com/get_video_info?video_id=dQw4w9WgXcQ&el=info&ps=default&eurl=&gl=US&hl=en"
        );
        assert!(Downloader::video_info_url(VIDEO_ID, true).starts_with("https://"));
    }

    #[tokio::test]
    async fn test_fragments_only_catalog() {
        let body = info_body(&[
            ("title", "Never Gonna"),
            ("author", "Rick"),
            ("length_seconds", "212"),
            ("url_encoded_fmt_stream_map", "itag=18&url=http://x&bitrate=500000&clen=1000"),
        ]);
        let d = downloader(MemoryFetcher::default().with_page(&info_url(), &body));

        let info = d.get_video_info(VIDEO_URL, false).await.unwrap();
        assert_eq!(info.video_id, VIDEO_ID);
        assert_eq!(info.title, "Never Gonna");
        assert_eq!(info.author, "Rick");
        assert_eq!(info.duration, "212");

        assert_eq!(info.formats.len(), 1);
        let f = info.formats.get("18").unwrap();
        assert_eq!(f.ext, "mp4");
        assert_eq!(f.url, "http://x");
        assert_eq!(f.tbr, 500_000);
        assert_eq!(f.filesize, 1000);
        assert_eq!(f.vcodec, "h264");
        assert_eq!(f.acodec, "aac");
    }

    #[tokio::test]
    async fn test_manifest_resolved_after_fragments() {
        let manifest_url = "http://manifest.example/api/manifest/dash/s/ABC.123/expire/1";
        let rewritten = "http://manifest.example/api/manifest/dash/signature/ABC.123/expire/1";
        let mpd = r#"<MPD><Period><AdaptationSet>
            <Representation id="18" bandwidth="700000"><BaseURL>http://from-manifest</BaseURL></Representation>
            <Representation id="140" audioSamplingRate="44100"><BaseURL>http://audio</BaseURL></Representation>
        </AdaptationSet></Period></MPD>"#;
        let body = info_body(&[
            ("title", "t"),
            ("url_encoded_fmt_stream_map", "itag=18&url=http://from-fragment&clen=1000"),
            ("dashmpd", manifest_url),
        ]);
        let d = downloader(
            MemoryFetcher::default()
                .with_page(&info_url(), &body)
                .with_page(rewritten, mpd),
        );

        let info = d.get_video_info(VIDEO_URL, false).await.unwrap();
        assert_eq!(info.formats.len(), 2);

        let f = info.formats.get("18").unwrap();
        assert_eq!(f.url, "http://from-manifest");
        assert_eq!(f.tbr, 700_000);
        assert_eq!(f.filesize, 0);
        assert_eq!(info.formats.get("140").unwrap().asr, 44100);
    }

    #[tokio::test]
    async fn test_broken_manifest_keeps_fragment_formats() {
        let body = info_body(&[
            ("url_encoded_fmt_stream_map", "itag=22&url=http://a"),
            ("dashmpd", "http://manifest.example/mpd"),
        ]);
        let d = downloader(
            MemoryFetcher::default()
                .with_page(&info_url(), &body)
                .with_page("http://manifest.example/mpd", "<MPD><Period>"),
        );

        let info = d.get_video_info(VIDEO_URL, false).await.unwrap();
        assert_eq!(info.formats.len(), 1);
        assert_eq!(info.formats.get("22").unwrap().url, "http://a");
    }

    #[tokio::test]
    async fn test_view_count_sources() {
        let body = info_body(&[
            ("view_count", "7"),
            ("url_encoded_fmt_stream_map", "itag=18&url=http://x&view_count=99"),
        ]);
        let d = downloader(MemoryFetcher::default().with_page(&info_url(), &body));
        assert_eq!(d.get_video_info(VIDEO_URL, false).await.unwrap().view_count, 99);

        let body = info_body(&[("view_count", "7")]);
        let d = downloader(MemoryFetcher::default().with_page(&info_url(), &body));
        assert_eq!(d.get_video_info(VIDEO_URL, false).await.unwrap().view_count, 7);
    }

    #[tokio::test]
    async fn test_fetch_errors_are_recoverable() {
        let d = downloader(MemoryFetcher::default());

        let err = d.get_video_info(VIDEO_URL, false).await.unwrap_err();
        assert!(matches!(err, DownloadError::HttpStatus(StatusCode::NOT_FOUND)));
        assert!(!err.is_fatal());

        let err = d.get_video_info("https://example.com/clip", false).await.unwrap_err();
        assert!(matches!(err, DownloadError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_list_formats_skips_transfer() {
        let body = info_body(&[("url_encoded_fmt_stream_map", "itag=18&url=http://unreachable.invalid")]);
        let d = downloader(MemoryFetcher::default().with_page(&info_url(), &body));
        let options = DownloadOptions {
            list_formats: true,
            ..DownloadOptions::default()
        };

        let outcome = d.process(VIDEO_URL, &options, &SilentEmitter).await.unwrap();
        assert!(matches!(outcome, VideoOutcome::Listed(info) if info.formats.len() == 1));
    }

    #[tokio::test]
    async fn test_missing_format_is_not_available() {
        let body = info_body(&[("url_encoded_fmt_stream_map", "itag=18&url=http://x")]);
        let d = downloader(MemoryFetcher::default().with_page(&info_url(), &body));
        let options = DownloadOptions {
            format: Some(22),
            ..DownloadOptions::default()
        };

        let err = d.process(VIDEO_URL, &options, &SilentEmitter).await.unwrap_err();
        assert!(matches!(err, DownloadError::FormatNotAvailable(ref id) if id == "22"));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_process_downloads_selected_format() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videoplayback"))
            .respond_with(ResponseTemplate::new(200).set_body_string("payload"))
            .mount(&server)
            .await;

        let fragment = info_body(&[
            ("itag", "18"),
            ("url", format!("{}/videoplayback", server.uri()).as_str()),
        ]);
        let body = info_body(&[
            ("title", "My/Video"),
            ("url_encoded_fmt_stream_map", fragment.as_str()),
        ]);
        let d = downloader(MemoryFetcher::default().with_page(&info_url(), &body));

        let dir = tempfile::tempdir().unwrap();
        let options = DownloadOptions {
            format: Some(18),
            output_dir: dir.path().to_path_buf(),
            ..DownloadOptions::default()
        };

        let outcome = d.process(VIDEO_URL, &options, &SilentEmitter).await.unwrap();
        let expected = dir.path().join("My_Video.mp4");
        assert!(matches!(outcome, VideoOutcome::Saved(ref p) if *p == expected));
        assert_eq!(std::fs::read_to_string(&expected).unwrap(), "payload");
    }

    #[test]
    fn test_destination_falls_back_to_video_id() {
        let info = VideoInfo {
            video_id: VIDEO_ID.to_string(),
            title: String::new(),
            author: String::new(),
            duration: String::new(),
            view_count: 0,
            formats: FormatCatalog::new(),
        };
        let format = ResolvedFormat {
            ext: "webm".to_string(),
            ..ResolvedFormat::default()
        };
        assert_eq!(
            Downloader::destination(&info, &format, Path::new("out")),
            Path::new("out").join("dQw4w9WgXcQ.webm")
        );
    }
}
