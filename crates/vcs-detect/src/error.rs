use std::{io, path::Path, str::Utf8Error, time::Duration};

use nv_vcs_items::RegistryError;
use thiserror::Error;

/// Startup-time defects in the detection wiring.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("no feature contributed a trigger action kind, but detection is required")]
	EmptyTriggerSet,
	#[error("contribution <name='{0}'> lists the completion kind as a trigger")]
	SelfTriggering(String),
	#[error("max delay <ms={max_delay_ms}> is below the quiet period <ms={quiet_period_ms}>")]
	MaxDelayBelowQuietPeriod {
		quiet_period_ms: u64,
		max_delay_ms: u64,
	},
	#[error(transparent)]
	Registry(#[from] RegistryError),
}

#[derive(Debug, Error)]
pub enum ScanError {
	#[error("workspace root doesn't exist or isn't a directory: <path='{}'>", .0.display())]
	MissingWorkspace(Box<Path>),
	#[error("file I/O error: {source}; path: '{}'", .path.display())]
	Io {
		path: Box<Path>,
		#[source]
		source: io::Error,
	},
	#[error("failed to spawn vcs backend <program='{program}'>: {source}")]
	Spawn {
		program: String,
		#[source]
		source: io::Error,
	},
	#[error("vcs backend failed <code={code:?}>: {stderr}")]
	BackendFailed { code: Option<i32>, stderr: String },
	#[error("vcs backend reported a non UTF-8 path: {0}")]
	NonUtf8Output(#[from] Utf8Error),
	#[error("malformed vcs backend output: {0}")]
	MalformedOutput(String),
	#[error("scan timed out after {0:?}")]
	TimedOut(Duration),
	#[error("scanner panicked: {0}")]
	Panicked(String),
	#[error(transparent)]
	Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
