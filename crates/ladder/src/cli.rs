use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{CrawlOverrides, DEFAULT_CONFIG_FILE};

#[derive(Clone, Debug, Parser)]
#[command(name = "ladder", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Crawl one target until interrupted, resuming from its checkpoint.
    #[command(alias = "c", name = "crawl")]
    Crawl(CrawlArg),
    /// List configured targets.
    #[command(alias = "ls", name = "targets")]
    Targets(ConfigArg),
}

#[derive(Clone, Debug, Args)]
pub struct ConfigArg {
    /// Configuration file; a missing file is an error only when given explicitly.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ConfigArg {
    pub fn path(&self) -> PathBuf { self.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)) }
}

#[derive(Clone, Debug, Args)]
pub struct CrawlArg {
    /// Target name, e.g. `www`, `br` or `friends`.
    pub target: String,

    #[command(flatten)]
    pub config: ConfigArg,

    #[arg(long, value_name = "DIR")]
    pub data_root: Option<PathBuf>,

    #[arg(long, short = 'w', value_name = "N")]
    pub workers: Option<usize>,

    #[arg(long, short = 'p', value_name = "N")]
    pub prefetch: Option<usize>,
}

impl CrawlArg {
    pub fn overrides(&self) -> CrawlOverrides {
        CrawlOverrides {
            data_root: self.data_root.clone(),
            workers:   self.workers,
            prefetch:  self.prefetch,
        }
    }
}
