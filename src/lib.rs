pub mod cli;
pub mod downloader;

use std::process::ExitCode;

use cli::Cli;
use downloader::format_table::{render_json, render_table};
use downloader::{
    ConsoleEmitter, DownloadError, DownloadOptions, Downloader, HttpFetcher, ProgressEmitter,
    TransferEngine, VideoInfo, VideoOutcome,
};

/// Install the stderr log subscriber. `RUST_LOG` wins over the flags.
pub fn init_logging(verbose: bool, json: bool) {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if json {
            "tube_downloader=warn".to_string()
        } else if verbose {
            "tube_downloader=debug".to_string()
        } else {
            "tube_downloader=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Tally of one run over the requested videos
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// A transfer failed and the remaining videos were not attempted
    pub aborted: bool,
}

impl RunSummary {
    pub fn is_success(&self, ignore_errors: bool) -> bool {
        !self.aborted && (self.failed == 0 || ignore_errors)
    }

    pub fn exit_code(&self, ignore_errors: bool) -> ExitCode {
        if self.is_success(ignore_errors) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Entry point of the `tube-dl` binary
pub async fn run(cli: Cli) -> ExitCode {
    let options = cli.download_options();

    let fetcher = match HttpFetcher::new(&cli.network_config()) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            tracing::error!("[Network] Unable to set up HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let transfer = TransferEngine::new(fetcher.client().clone());
    let downloader = Downloader::new(Box::new(fetcher), transfer);

    let summary = process_videos(&downloader, &cli.urls, &options, &ConsoleEmitter::new()).await;
    tracing::debug!("[Downloader] Finished: {:?}", summary);
    summary.exit_code(cli.ignore_errors)
}

/// Process every URL in order, one at a time.
///
/// Recoverable failures are logged and the next video is attempted; a failed
/// transfer stops the run.
pub async fn process_videos(
    downloader: &Downloader,
    urls: &[String],
    options: &DownloadOptions,
    emitter: &dyn ProgressEmitter,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for video_url in urls {
        let result = match downloader.process(video_url, options, emitter).await {
            Ok(VideoOutcome::Listed(info)) => print_formats(&info, options),
            Ok(VideoOutcome::Saved(path)) => {
                tracing::debug!("[Downloader] {} saved to {}", video_url, path.display());
                Ok(())
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => summary.succeeded += 1,
            Err(e) if e.is_fatal() => {
                // The emitter has already reported the cause
                summary.failed += 1;
                summary.aborted = true;
                break;
            }
            Err(e) => {
                tracing::error!("[Downloader] {}: {}", video_url, e);
                summary.failed += 1;
            }
        }
    }

    summary
}

fn print_formats(info: &VideoInfo, options: &DownloadOptions) -> Result<(), DownloadError> {
    if options.json {
        println!("{}", render_json(&info.formats, options.pretty_json)?);
    } else {
        println!("{}", render_table(&info.formats));
    }
    Ok(())
}
