use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "stellenparser", about = "Job posting extractor for German job portals")]
pub struct Config {
    /// HTTP request timeout in seconds
    #[arg(long, env = "FETCH_TIMEOUT", default_value = "10")]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Extract a job posting and print it as JSON
    Extract {
        /// URL of the job posting
        url: String,

        /// Parse a local HTML file instead of fetching the URL
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Print which portal parser would handle a URL
    Detect {
        /// URL of the job posting
        url: String,
    },
}
