use anyhow::{Context, Result, bail};
use clap::Parser;
use ladder_crawl::Crawler;
use ladder_fetch::ReqwestClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{App, Commands, ConfigArg, CrawlArg};
use crate::config::{Config, CrawlOverrides};

mod cli;
mod config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match App::parse().cmd {
        Commands::Crawl(arg) => crawl(arg).await,
        Commands::Targets(arg) => targets(&arg),
    }
}

fn load_config(arg: &ConfigArg, overrides: &CrawlOverrides) -> Result<Config> {
    let path = arg.path();
    if arg.config.is_some() && !path.is_file() {
        bail!("config file {} does not exist", path.display());
    }
    Config::load(&path, overrides).with_context(|| format!("failed to load configuration from {}", path.display()))
}

async fn crawl(arg: CrawlArg) -> Result<()> {
    let config = load_config(&arg.config, &arg.overrides())?;
    let target = config.registry().resolve(&arg.target)?;
    let settings = config.crawl;

    let client = ReqwestClient::new(&settings.client_settings()).context("failed to build HTTP client")?;
    let crawler = Crawler::open(target, settings, client).context("failed to prepare crawl")?;

    let summary = crawler.run(shutdown_signal()).await?;
    info!(
        first_page = summary.first_page,
        next_page = summary.next_page,
        records = summary.records,
        "done"
    );
    Ok(())
}

fn targets(arg: &ConfigArg) -> Result<()> {
    let config = load_config(arg, &CrawlOverrides::default())?;
    for (name, base_url) in config.registry().iter() {
        println!("{name:<12} {base_url}");
    }
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
