//! Command-line argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::api::MediaFormat;
use crate::config::{Config, TransferStrategy};

/// Media search and download client.
#[derive(Parser, Debug)]
#[command(
    name = "flux",
    version,
    about = "Search, preview and download media from a flux backend",
    long_about = "A client for a media search service.\n\n\
                  Lists trending results, runs searches, downloads audio or video \
                  and keeps the static app assets available offline."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file.
    #[arg(short, long, env = "FLUX_CONFIG", default_value = "flux.toml", global = true)]
    pub config: PathBuf,

    /// Backend origin (e.g. http://localhost:5000).
    #[arg(short = 'b', long = "base-url", env = "FLUX_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Transfer strategy for downloads.
    #[arg(long, value_enum, global = true)]
    pub strategy: Option<StrategyArg>,

    /// Directory downloads are saved into.
    #[arg(short = 'd', long = "directory", global = true)]
    pub download_directory: Option<PathBuf>,

    /// Also write the rendered container markup to this file.
    #[arg(long, global = true)]
    pub html: Option<PathBuf>,

    /// Keep the offline cache in memory for this run only.
    #[arg(long, global = true)]
    pub no_disk_cache: bool,

    /// Hide progress bars.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the trending list.
    Trending,

    /// Search the backend.
    Search {
        /// Search terms.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Download one result.
    Download {
        /// Result id.
        id: String,

        /// Format to download.
        #[arg(short, long, value_enum, default_value = "mp3")]
        format: FormatArg,

        /// Title used for the saved file name (defaults to the id).
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Populate the offline asset cache.
    InstallCache,
}

impl Command {
    /// The search query, joined with single spaces.
    pub fn query(&self) -> Option<String> {
        match self {
            Command::Search { query } => Some(query.join(" ")),
            _ => None,
        }
    }
}

/// CLI transfer strategy argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// Stream the body and report byte progress.
    Tracked,
    /// Hand the URL off and show simulated progress.
    Navigational,
}

impl From<StrategyArg> for TransferStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Tracked => TransferStrategy::Tracked,
            StrategyArg::Navigational => TransferStrategy::Navigational,
        }
    }
}

/// CLI media format argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Mp3,
    Mp4,
}

impl From<FormatArg> for MediaFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Mp3 => MediaFormat::Mp3,
            FormatArg::Mp4 => MediaFormat::Mp4,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(base_url) = &self.base_url {
            config.backend.base_url = base_url.clone();
        }

        if let Some(strategy) = self.strategy {
            config.download.strategy = strategy.into();
        }

        if let Some(dir) = &self.download_directory {
            config.download.directory = Some(dir.clone());
        }

        // Only override if set to non-default
        if self.no_disk_cache {
            config.cache.in_memory = true;
        }
    }
}
