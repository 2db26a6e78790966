use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::downloader::{DownloadOptions, NetworkConfig};

#[derive(Parser, Debug)]
#[command(name = "tube-dl")]
#[command(author, version, about = "Resolve the formats of hosted videos and download one of them")]
#[command(group(ArgGroup::new("mode").required(true).args(["list_formats", "format"])))]
pub struct Cli {
    /// List all available formats of the requested videos
    #[arg(short = 'F', long)]
    pub list_formats: bool,

    /// Format id to download
    #[arg(short = 'f', long, value_name = "ID")]
    pub format: Option<u32>,

    /// Output only JSON (with --list-formats)
    #[arg(long)]
    pub json: bool,

    /// Prettify JSON output
    #[arg(long)]
    pub pretty_json: bool,

    /// Fetch video metadata over HTTPS
    #[arg(short, long)]
    pub secure: bool,

    /// Exit successfully even if some videos could not be processed
    #[arg(short, long)]
    pub ignore_errors: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Directory downloads are saved to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// HTTP or SOCKS5 proxy for every request
    #[arg(long, env = "TUBE_DL_PROXY", value_name = "URL")]
    pub proxy: Option<String>,

    /// Video URLs, processed one after another
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,
}

impl Cli {
    pub fn download_options(&self) -> DownloadOptions {
        DownloadOptions {
            format: self.format,
            list_formats: self.list_formats,
            json: self.json || self.pretty_json,
            pretty_json: self.pretty_json,
            secure: self.secure,
            output_dir: self.output_dir.clone(),
        }
    }

    pub fn network_config(&self) -> NetworkConfig {
        NetworkConfig {
            proxy: self.proxy.clone().filter(|p| !p.is_empty()),
        }
    }
}
