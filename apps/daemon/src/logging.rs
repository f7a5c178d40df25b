use std::{fs, io, path::Path};

use anyhow::{Context, Result};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "nv-daemon.log";

/// Our own crates log at `log_level`, everything else at `warn`
fn default_directives(log_level: &str) -> String {
	["nv_daemon", "nv_vcs_detect", "nv_vcs_items", "nv_actions"]
		.into_iter()
		.fold("warn".to_string(), |directives, target| {
			format!("{directives},{target}={log_level}")
		})
}

/// Console logs go to stderr, stdout carries `--json` output.
///
/// The returned guard flushes the log file when dropped, keep it alive until exit.
pub fn init(data_dir: &Path, log_level: &str) -> Result<WorkerGuard> {
	let logs_dir = data_dir.join("logs");
	fs::create_dir_all(&logs_dir)
		.with_context(|| format!("failed to create logs directory {}", logs_dir.display()))?;

	let (non_blocking, guard) =
		tracing_appender::non_blocking(rolling::daily(&logs_dir, LOG_FILE_PREFIX));

	let env_filter = match EnvFilter::try_from_default_env() {
		Ok(filter) => filter,
		Err(_) => EnvFilter::try_new(default_directives(log_level))
			.with_context(|| format!("invalid log level in config: {log_level}"))?,
	};

	tracing_subscriber::registry()
		.with(env_filter)
		.with(fmt::layer().with_target(true).with_writer(io::stderr))
		.with(
			fmt::layer()
				.with_target(true)
				.with_ansi(false)
				.with_writer(non_blocking),
		)
		.try_init()
		.context("failed to initialize tracing")?;

	Ok(guard)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn directives_cover_every_workspace_crate() {
		assert_eq!(
			default_directives("debug"),
			"warn,nv_daemon=debug,nv_vcs_detect=debug,nv_vcs_items=debug,nv_actions=debug"
		);
	}

	#[test]
	fn directives_parse_as_env_filter() {
		assert!(EnvFilter::try_new(default_directives("info")).is_ok());
	}
}
