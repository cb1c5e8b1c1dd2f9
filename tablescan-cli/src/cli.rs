//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap::Subcommand;
use tablescan_lib::TablescanClient;
use tablescan_lib::error::Error;
use tablescan_lib::poll::PollConfig;

#[derive(Debug, Parser)]
#[command(name = "tablescan")]
#[command(
    version,
    about = "Turn photographed tables into editable spreadsheets"
)]
pub struct Cli {
    /// Base URL of the recognition service
    #[arg(
        long,
        global = true,
        env = "TABLESCAN_URL",
        default_value = "http://localhost:8000"
    )]
    pub url: String,

    /// Maximum number of OCR status checks
    #[arg(long, global = true, env = "TABLESCAN_POLL_ATTEMPTS", default_value_t = 30)]
    pub poll_attempts: u32,

    /// Delay between OCR status checks, in milliseconds
    #[arg(long, global = true, env = "TABLESCAN_POLL_INTERVAL_MS", default_value_t = 2000)]
    pub poll_interval_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload an image, run OCR and wait for the result
    Process {
        /// Image file (png, jpg, jpeg, gif, bmp, webp)
        image: PathBuf,

        /// Print the first recognized table when done
        #[arg(long)]
        show: bool,
    },

    /// Show the status of a task
    Status {
        /// Task ID
        task: String,
    },

    /// Print a recognized table
    Show {
        /// Task ID
        task: String,

        /// Sheet index (0-based)
        #[arg(short, long, default_value_t = 0)]
        sheet: usize,
    },

    /// Change the text of one cell and save
    Edit {
        /// Task ID
        task: String,

        /// Sheet index (0-based)
        #[arg(short, long, default_value_t = 0)]
        sheet: usize,

        /// Row of the cell's anchor
        #[arg(long)]
        row: usize,

        /// Column of the cell's anchor
        #[arg(long)]
        col: usize,

        /// New text
        text: String,
    },

    /// Download the spreadsheet, generating it if needed
    Download {
        /// Task ID
        task: String,

        /// Output file (default: name suggested by the service)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Builds the service client from the global options.
    pub fn client(&self) -> Result<TablescanClient, Error> {
        let mut builder = TablescanClient::builder()
            .url(&self.url)
            .connect_timeout(Duration::from_secs(10));
        if let Some(secs) = self.timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig::default()
            .max_attempts(self.poll_attempts)
            .interval(Duration::from_millis(self.poll_interval_ms))
    }
}
