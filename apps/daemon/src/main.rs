#![warn(
	clippy::all,
	clippy::pedantic,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::nursery,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	trivial_casts,
	trivial_numeric_casts,
	unused_allocation,
	clippy::unnecessary_cast,
	clippy::cast_lossless,
	clippy::cast_possible_truncation,
	clippy::cast_possible_wrap,
	clippy::cast_precision_loss,
	clippy::cast_sign_loss,
	clippy::dbg_macro,
	clippy::deprecated_cfg_attr,
	clippy::separated_literal_suffix,
	deprecated
)]
#![forbid(deprecated_in_future)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

use std::{env, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use nv_actions::ActionStream;
use nv_vcs_detect::{ChangeDetectionEffect, DetectionConfig, GitCliScanner};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod config;
mod consumer;
mod features;
mod logging;
mod watcher;

use config::{default_data_dir, DaemonConfig};
use watcher::WorkspaceWatcher;

#[derive(Parser, Debug)]
#[command(name = "nv-daemon", version, about = "Keeps a notes workspace's VCS view up to date")]
struct Cli {
	/// Workspace to watch, defaults to the current directory
	#[arg(long)]
	workspace: Option<PathBuf>,

	/// Where config and logs live, defaults to the platform data directory
	#[arg(long)]
	data_dir: Option<PathBuf>,

	/// Overrides the configured quiet period before a scan starts
	#[arg(long)]
	quiet_period_ms: Option<u64>,

	/// Print every published VCS view as a JSON line on stdout
	#[arg(long)]
	json: bool,

	/// Don't watch the filesystem, only application actions trigger scans
	#[arg(long)]
	no_watch: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	let data_dir = match cli.data_dir {
		Some(data_dir) => data_dir,
		None => default_data_dir()?,
	};

	let (mut config, config_origin) = DaemonConfig::load_or_create(&data_dir)?;
	if let Some(quiet_period_ms) = cli.quiet_period_ms {
		config.detection.quiet_period_ms = quiet_period_ms;
	}

	// The log level comes from the config, so the load is reported only now
	let _log_guard = logging::init(&data_dir, &config.log_level)?;
	config_origin.report(&DaemonConfig::path_in(&data_dir));

	let workspace = match cli.workspace {
		Some(workspace) => workspace,
		None => env::current_dir().context("failed to read the current directory")?,
	};
	let workspace = workspace
		.canonicalize()
		.with_context(|| format!("workspace {} is not accessible", workspace.display()))?;

	let detection = Arc::new(DetectionConfig::assemble(
		features::contributions(),
		config.detection,
	)?);

	let stream = ActionStream::default();

	let consumer_cancel = CancellationToken::new();
	let consumer = consumer::spawn_consumer(&stream, cli.json, consumer_cancel.clone());

	let scanner = GitCliScanner::new()
		.with_program(&config.git_binary)
		.with_all_untracked_files(config.all_untracked_files);

	let effect = ChangeDetectionEffect::spawn(
		detection,
		Arc::new(scanner),
		stream.clone(),
		workspace.clone(),
	);

	let watcher = if config.watch_filesystem && !cli.no_watch {
		Some(WorkspaceWatcher::start(&workspace, stream.clone())?)
	} else {
		None
	};

	stream.dispatch(features::workspace::WORKSPACE_OPENED);

	info!(
		workspace = %workspace.display(),
		data_dir = %data_dir.display(),
		watching = watcher.is_some(),
		"Daemon started, press Ctrl-C to stop;"
	);

	if let Err(e) = tokio::signal::ctrl_c().await {
		error!(?e, "Failed to listen for the shutdown signal;");
	}

	info!("Shutting down...");

	if let Some(watcher) = watcher {
		watcher.stop().await;
	}

	let stats = effect.stats();
	effect.shutdown().await;

	consumer_cancel.cancel();
	if let Err(e) = consumer.await {
		error!(?e, "Failed to join completion consumer;");
	}

	info!(
		scans_started = stats.scans_started,
		scans_failed = stats.scans_failed,
		completions_emitted = stats.completions_emitted,
		"Daemon stopped;"
	);

	Ok(())
}
