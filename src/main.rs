use clap::Parser;
use std::process::ExitCode;

use tube_downloader::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    tube_downloader::init_logging(cli.verbose, cli.json || cli.pretty_json);

    tube_downloader::run(cli).await
}
