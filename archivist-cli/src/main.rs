//! `archivist`: scans a directory of video files, recognizes each by its
//! catalog identifier, and runs the crawl-merge-materialize pipeline
//! against every one it finds.

mod cli;
mod config;
mod report;
mod scan;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sources::{builtin, AdapterRegistry};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut pipeline_config = config::load(args.config.as_deref())
        .with_context(|| "loading config")?;
    config::apply_overrides(&mut pipeline_config, &args).with_context(|| "applying CLI overrides")?;

    if args.save_config {
        config::save(&pipeline_config, args.config.as_deref()).with_context(|| "saving config")?;
        if let Some(path) = args.config.as_deref().map(ToOwned::to_owned).or_else(config::default_config_path) {
            println!("{} {}", "Wrote config to".green(), path.display());
        }
        return Ok(());
    }

    if !args.input_dir.is_dir() {
        anyhow::bail!("input directory does not exist or is not a directory: {}", args.input_dir.display());
    }

    let mut registry = AdapterRegistry::new();
    registry.register(Arc::new(builtin::AggregatorAdapter::default()));
    registry.register(Arc::new(builtin::StudioDbAdapter::default()));
    registry.register(Arc::new(builtin::FallbackWikiAdapter::default()));

    let driver = pipeline::PipelineDriver::new(registry, pipeline_config)
        .with_context(|| "constructing HTTP client from config")?;

    info!(input_dir = %args.input_dir.display(), "scanning for video files");
    let videos = scan::scan(&args.input_dir);
    if videos.is_empty() {
        println!("{}", "No recognizable video files found.".yellow());
        return Ok(());
    }

    let progress = ProgressBar::new(videos.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{pos}/{len}] {msg}")
            .unwrap()
            .tick_strings(&["▹▹▹▹▹", "▸▹▹▹▹", "▹▸▹▹▹", "▹▹▸▹▹", "▹▹▹▸▹", "▹▹▹▹▸", "▪▪▪▪▪"]),
    );

    let cancellation = CancellationToken::new();
    let cancel_on_ctrl_c = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_on_ctrl_c.cancel();
        }
    });

    for video in &videos {
        progress.set_message(video.identifier.to_string());
        if cancellation.is_cancelled() {
            warn!(identifier = %video.identifier, "cancelled before processing");
            break;
        }
        let outcome = driver
            .process_identifier(&video.identifier, &video.path, &cancellation)
            .await;
        progress.inc(1);
        progress.suspend(|| report::print_outcome(&outcome));
    }
    progress.finish_and_clear();

    report::print_summary(&driver.counters());

    Ok(())
}
