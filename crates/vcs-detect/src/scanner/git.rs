//! Scanner backed by the `git` command line.
//!
//! Runs `git status --porcelain=v1 -z` in the workspace and parses its NUL separated records,
//! keeping git's own path order.

use std::{
	io,
	path::{Path, PathBuf},
	process::Stdio,
	str,
};

use async_trait::async_trait;
use nv_vcs_items::{PorcelainCode, RawChangeEntry, ScanResult, StatusCode};
use tokio::{fs, process::Command};
use tracing::{instrument, trace};

use super::{ScanError, VcsScanner};

#[derive(Debug, Clone)]
pub struct GitCliScanner {
	program: PathBuf,
	all_untracked_files: bool,
}

impl GitCliScanner {
	#[must_use]
	pub fn new() -> Self {
		Self {
			program: PathBuf::from("git"),
			all_untracked_files: false,
		}
	}

	/// Use another `git` binary than the one on `PATH`
	#[must_use]
	pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
		self.program = program.into();
		self
	}

	/// List every untracked file instead of collapsing untracked directories into one entry
	#[must_use]
	pub const fn with_all_untracked_files(mut self, all: bool) -> Self {
		self.all_untracked_files = all;
		self
	}

	async fn check_workspace(root: &Path) -> Result<(), ScanError> {
		match fs::metadata(root).await {
			Ok(metadata) if metadata.is_dir() => Ok(()),
			Ok(_) => Err(ScanError::MissingWorkspace(root.into())),
			Err(e) if e.kind() == io::ErrorKind::NotFound => {
				Err(ScanError::MissingWorkspace(root.into()))
			}
			Err(source) => Err(ScanError::Io {
				path: root.into(),
				source,
			}),
		}
	}
}

impl Default for GitCliScanner {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl VcsScanner for GitCliScanner {
	#[instrument(skip(self), fields(root = %root.display()), err)]
	async fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
		Self::check_workspace(root).await?;

		let output = Command::new(&self.program)
			.arg("-C")
			.arg(root)
			.args([
				"status",
				"--porcelain=v1",
				"-z",
				if self.all_untracked_files {
					"--untracked-files=all"
				} else {
					"--untracked-files=normal"
				},
			])
			// Don't fight the user's own git commands for the index lock
			.env("GIT_OPTIONAL_LOCKS", "0")
			.stdin(Stdio::null())
			.kill_on_drop(true)
			.output()
			.await
			.map_err(|source| ScanError::Spawn {
				program: self.program.display().to_string(),
				source,
			})?;

		if !output.status.success() {
			return Err(ScanError::BackendFailed {
				code: output.status.code(),
				stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
			});
		}

		let scan = parse_porcelain(&output.stdout)?;
		trace!(entries = scan.len(), "Parsed git status;");

		Ok(scan)
	}
}

/// Parse `git status --porcelain=v1 -z` output.
///
/// Each record is `XY <path>`. Renames and copies are followed by one more record holding the
/// source path. Ignored entries (`!!`) are skipped.
pub fn parse_porcelain(stdout: &[u8]) -> Result<ScanResult, ScanError> {
	let mut records = stdout.split(|byte| *byte == 0).filter(|record| !record.is_empty());
	let mut scan = ScanResult::new();

	while let Some(record) = records.next() {
		let [index, worktree, b' ', path @ ..] = record else {
			return Err(ScanError::MalformedOutput(format!(
				"unexpected status record <record='{}'>",
				String::from_utf8_lossy(record)
			)));
		};

		if path.is_empty() {
			return Err(ScanError::MalformedOutput(
				"status record without a path".to_string(),
			));
		}

		let code = PorcelainCode::new(char::from(*index), char::from(*worktree));
		if code.index == '!' {
			continue;
		}

		let path = str::from_utf8(path)?;
		let mut entry = RawChangeEntry::new(path, status_of(code)).with_code(code);

		if matches!(code.index, 'R' | 'C') || matches!(code.worktree, 'R' | 'C') {
			let original = records.next().ok_or_else(|| {
				ScanError::MalformedOutput(format!("missing source path for <path='{path}'>"))
			})?;
			entry = entry.with_original_path(str::from_utf8(original)?);
		}

		scan.push(entry);
	}

	Ok(scan)
}

const fn status_of(code: PorcelainCode) -> StatusCode {
	if code.is_unmerged() {
		StatusCode::Conflicted
	} else if code.index == '?' {
		StatusCode::Untracked
	} else if code.index == 'R' || code.worktree == 'R' {
		StatusCode::Renamed
	} else if code.index != ' ' {
		StatusCode::Staged
	} else {
		StatusCode::Unstaged
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(output: &str) -> Vec<RawChangeEntry> {
		parse_porcelain(output.as_bytes()).unwrap().into_inner()
	}

	#[test]
	fn statuses_in_git_order() {
		let entries = parse(" M a.md\0M  b.md\0UU c.md\0?? d/\0AM e.md\0");

		assert_eq!(
			entries
				.iter()
				.map(|entry| (entry.path.as_str(), entry.status))
				.collect::<Vec<_>>(),
			[
				("a.md", StatusCode::Unstaged),
				("b.md", StatusCode::Staged),
				("c.md", StatusCode::Conflicted),
				("d/", StatusCode::Untracked),
				("e.md", StatusCode::Staged),
			]
		);
		assert_eq!(entries[4].code, Some(PorcelainCode::new('A', 'M')));
	}

	#[test]
	fn rename_carries_source_path() {
		let entries = parse("R  notes/new name.md\0notes/old name.md\0 M z.md\0");

		assert_eq!(entries.len(), 2);
		assert_eq!(entries[0].status, StatusCode::Renamed);
		assert_eq!(entries[0].path, "notes/new name.md");
		assert_eq!(entries[0].original_path.as_deref(), Some("notes/old name.md"));
		assert_eq!(entries[1].path, "z.md");
	}

	#[test]
	fn copy_is_staged_with_source() {
		let entries = parse("C  copy.md\0original.md\0");

		assert_eq!(entries[0].status, StatusCode::Staged);
		assert_eq!(entries[0].original_path.as_deref(), Some("original.md"));
	}

	#[test]
	fn ignored_entries_are_skipped() {
		assert!(parse("!! target/\0").is_empty());
	}

	#[test]
	fn truncated_rename_is_malformed() {
		assert!(matches!(
			parse_porcelain(b"R  new.md\0"),
			Err(ScanError::MalformedOutput(_))
		));
	}

	#[test]
	fn garbage_is_malformed() {
		assert!(matches!(
			parse_porcelain(b"nonsense\0"),
			Err(ScanError::MalformedOutput(_))
		));
	}

	#[test]
	fn non_utf8_path() {
		assert!(matches!(
			parse_porcelain(b"?? \xff\xfe.md\0"),
			Err(ScanError::NonUtf8Output(_))
		));
	}

	#[test]
	fn empty_output_is_a_clean_workspace() {
		assert!(parse_porcelain(b"").unwrap().is_empty());
	}
}
