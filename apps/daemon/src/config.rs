//! Daemon configuration

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use nv_vcs_detect::DetectionSettings;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const CONFIG_FILE_NAME: &str = "nv-daemon.json";

/// How [`DaemonConfig::load_or_create`] came up with its config.
///
/// Loading happens before logging is set up, so the outcome is reported afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
	Loaded,
	Created,
	Migrated { from: u32 },
}

impl ConfigOrigin {
	pub fn report(self, config_path: &Path) {
		match self {
			Self::Loaded => info!(path = %config_path.display(), "Loaded config;"),
			Self::Created => {
				warn!(path = %config_path.display(), "No config found, created default;");
			}
			Self::Migrated { from } => info!(
				path = %config_path.display(),
				from,
				to = DaemonConfig::target_version(),
				"Migrated config;"
			),
		}
	}
}

/// Persisted daemon settings, one JSON file per data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
	/// Config schema version, files written before versioning read as 0
	#[serde(default)]
	pub version: u32,

	/// Log level for our own crates, `RUST_LOG` takes precedence
	pub log_level: String,

	pub detection: DetectionSettings,

	/// Dispatch `workspace-files-changed` from a filesystem watcher
	pub watch_filesystem: bool,

	pub git_binary: PathBuf,

	/// List every untracked file instead of one entry per untracked directory
	pub all_untracked_files: bool,
}

impl DaemonConfig {
	pub const fn target_version() -> u32 {
		1
	}

	pub fn path_in(data_dir: &Path) -> PathBuf {
		data_dir.join(CONFIG_FILE_NAME)
	}

	/// Load the config stored in `data_dir`, writing a default one if there is none yet.
	pub fn load_or_create(data_dir: &Path) -> Result<(Self, ConfigOrigin)> {
		let config_path = Self::path_in(data_dir);

		if !config_path.exists() {
			let config = Self::default();
			config.save(data_dir)?;
			return Ok((config, ConfigOrigin::Created));
		}

		let json = fs::read_to_string(&config_path)
			.with_context(|| format!("failed to read {}", config_path.display()))?;
		let mut config = serde_json::from_str::<Self>(&json)
			.with_context(|| format!("failed to parse {}", config_path.display()))?;

		if config.version > Self::target_version() {
			return Err(anyhow!(
				"config version {} is newer than this daemon supports ({})",
				config.version,
				Self::target_version()
			));
		}

		if config.version < Self::target_version() {
			let from = config.version;
			config.migrate()?;
			config.save(data_dir)?;
			return Ok((config, ConfigOrigin::Migrated { from }));
		}

		Ok((config, ConfigOrigin::Loaded))
	}

	pub fn save(&self, data_dir: &Path) -> Result<()> {
		fs::create_dir_all(data_dir)
			.with_context(|| format!("failed to create {}", data_dir.display()))?;

		let config_path = Self::path_in(data_dir);
		fs::write(&config_path, serde_json::to_string_pretty(self)?)
			.with_context(|| format!("failed to write {}", config_path.display()))?;

		Ok(())
	}

	fn migrate(&mut self) -> Result<()> {
		match self.version {
			0 => {
				// v0 files predate the schema version field, every other field has a default
				self.version = 1;
				Ok(())
			}
			1 => Ok(()),
			v => Err(anyhow!("Unknown config version: {v}")),
		}
	}
}

impl Default for DaemonConfig {
	fn default() -> Self {
		Self {
			version: Self::target_version(),
			log_level: "info".to_string(),
			detection: DetectionSettings::default(),
			watch_filesystem: true,
			git_binary: PathBuf::from("git"),
			all_untracked_files: false,
		}
	}
}

/// Where the daemon keeps its config and logs when `--data-dir` isn't given
pub fn default_data_dir() -> Result<PathBuf> {
	dirs::data_dir()
		.map(|dir| dir.join("nv-daemon"))
		.ok_or_else(|| anyhow!("Failed to determine the platform data directory"))
}

#[cfg(test)]
mod tests {
	use super::*;

	use tempfile::tempdir;
	use tracing_test::traced_test;

	#[test]
	fn creates_default_config_when_missing() {
		let dir = tempdir().unwrap();

		let (config, origin) = DaemonConfig::load_or_create(dir.path()).unwrap();

		assert_eq!(config, DaemonConfig::default());
		assert_eq!(origin, ConfigOrigin::Created);
		assert!(DaemonConfig::path_in(dir.path()).exists());
	}

	#[test]
	#[traced_test]
	fn load_outcome_is_logged_once_reported() {
		let dir = tempdir().unwrap();
		let config_path = DaemonConfig::path_in(dir.path());

		let (_, origin) = DaemonConfig::load_or_create(dir.path()).unwrap();
		assert!(!logs_contain("No config found"));

		origin.report(&config_path);
		assert!(logs_contain("No config found, created default"));

		let (_, origin) = DaemonConfig::load_or_create(dir.path()).unwrap();
		origin.report(&config_path);
		assert!(logs_contain("Loaded config"));
	}

	#[test]
	fn saved_config_round_trips_through_disk() {
		let dir = tempdir().unwrap();

		let mut config = DaemonConfig::default();
		config.log_level = "debug".to_string();
		config.watch_filesystem = false;
		config.detection.quiet_period_ms = 200;
		config.save(dir.path()).unwrap();

		assert_eq!(
			DaemonConfig::load_or_create(dir.path()).unwrap(),
			(config, ConfigOrigin::Loaded)
		);
	}

	#[test]
	fn unversioned_config_is_migrated_and_rewritten() {
		let dir = tempdir().unwrap();
		fs::write(
			DaemonConfig::path_in(dir.path()),
			r#"{ "log_level": "trace", "detection": { "quiet_period_ms": 75 } }"#,
		)
		.unwrap();

		let (config, origin) = DaemonConfig::load_or_create(dir.path()).unwrap();

		assert_eq!(origin, ConfigOrigin::Migrated { from: 0 });
		assert_eq!(config.version, DaemonConfig::target_version());
		assert_eq!(config.log_level, "trace");
		assert_eq!(config.detection.quiet_period_ms, 75);
		assert_eq!(
			config.detection.max_delay_ms,
			DetectionSettings::default().max_delay_ms
		);
		assert!(config.watch_filesystem);

		let on_disk = fs::read_to_string(DaemonConfig::path_in(dir.path())).unwrap();
		assert!(on_disk.contains(r#""version": 1"#));
	}

	#[test]
	fn newer_config_versions_are_rejected() {
		let dir = tempdir().unwrap();
		fs::write(DaemonConfig::path_in(dir.path()), r#"{ "version": 7 }"#).unwrap();

		assert!(DaemonConfig::load_or_create(dir.path()).is_err());
	}

	#[test]
	fn malformed_config_is_an_error() {
		let dir = tempdir().unwrap();
		fs::write(DaemonConfig::path_in(dir.path()), "not json").unwrap();

		let e = DaemonConfig::load_or_create(dir.path()).unwrap_err();

		assert!(e.to_string().contains("failed to parse"));
	}
}
