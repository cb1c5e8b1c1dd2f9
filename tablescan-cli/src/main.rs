mod cli;
mod commands;
mod paths;
mod render;

use std::fs;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;
use tablescan_lib::error::Notice;

use crate::cli::Cli;

fn init_logging(verbose: bool) {
    let path = paths::log_file()
        .filter(|path| path.parent().is_none_or(|dir| fs::create_dir_all(dir).is_ok()))
        .unwrap_or_else(|| PathBuf::from(paths::FALLBACK_LOG_FILE));

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    match File::create(&path) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(level, Config::default(), file) {
                eprintln!("Failed to initialize logger: {e}");
            }
        }
        Err(e) => eprintln!("Failed to create log file {}: {e}", path.display()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Environment first, so `.env` values reach clap's `env` fallbacks.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let notice = Notice::from_error(&e);
            eprintln!("{notice}");
            if notice.retryable {
                eprintln!("(可重试)");
            }
            ExitCode::FAILURE
        }
    }
}
