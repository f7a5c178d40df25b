use std::{fmt, slice, vec};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The VCS state of a single path, as reported by the scanner.
#[derive(
	Debug,
	Clone,
	Copy,
	PartialEq,
	Eq,
	Hash,
	Serialize,
	Deserialize,
	Display,
	EnumString,
	EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StatusCode {
	Staged,
	Unstaged,
	Untracked,
	Conflicted,
	Renamed,
}

/// The two status columns of a porcelain status line: `index` is the staging area, `worktree`
/// the working copy. A blank column is a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PorcelainCode {
	pub index: char,
	pub worktree: char,
}

impl PorcelainCode {
	#[must_use]
	pub const fn new(index: char, worktree: char) -> Self {
		Self { index, worktree }
	}

	#[must_use]
	pub const fn is_unmerged(&self) -> bool {
		matches!(
			(self.index, self.worktree),
			('D', 'D') | ('A', 'U') | ('U', 'D') | ('U', 'A') | ('D', 'U') | ('A', 'A') | ('U', 'U')
		)
	}

	#[must_use]
	pub const fn has_worktree_change(&self) -> bool {
		!matches!(self.worktree, ' ' | '.')
	}
}

impl fmt::Display for PorcelainCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}", self.index, self.worktree)
	}
}

/// One path's status in a single scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawChangeEntry {
	pub path: String,
	pub status: StatusCode,
	/// Source path of a rename or copy
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub original_path: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code: Option<PorcelainCode>,
}

impl RawChangeEntry {
	pub fn new(path: impl Into<String>, status: StatusCode) -> Self {
		Self {
			path: path.into(),
			status,
			original_path: None,
			code: None,
		}
	}

	#[must_use]
	pub fn with_original_path(mut self, original_path: impl Into<String>) -> Self {
		self.original_path = Some(original_path.into());
		self
	}

	#[must_use]
	pub const fn with_code(mut self, code: PorcelainCode) -> Self {
		self.code = Some(code);
		self
	}
}

/// The ordered entries produced by one scanner invocation.
///
/// Order is the scanner's own path order and is kept all the way to the view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanResult(Vec<RawChangeEntry>);

impl ScanResult {
	#[must_use]
	pub const fn new() -> Self {
		Self(Vec::new())
	}

	pub fn iter(&self) -> slice::Iter<'_, RawChangeEntry> {
		self.0.iter()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn push(&mut self, entry: RawChangeEntry) {
		self.0.push(entry);
	}

	#[must_use]
	pub fn into_inner(self) -> Vec<RawChangeEntry> {
		self.0
	}
}

impl From<Vec<RawChangeEntry>> for ScanResult {
	fn from(entries: Vec<RawChangeEntry>) -> Self {
		Self(entries)
	}
}

impl FromIterator<RawChangeEntry> for ScanResult {
	fn from_iter<I: IntoIterator<Item = RawChangeEntry>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl IntoIterator for ScanResult {
	type Item = RawChangeEntry;
	type IntoIter = vec::IntoIter<RawChangeEntry>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<'a> IntoIterator for &'a ScanResult {
	type Item = &'a RawChangeEntry;
	type IntoIter = slice::Iter<'a, RawChangeEntry>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_code_names() {
		assert_eq!(StatusCode::Conflicted.to_string(), "conflicted");
		assert_eq!("untracked".parse::<StatusCode>().ok(), Some(StatusCode::Untracked));
		assert_eq!(
			serde_json::to_string(&StatusCode::Renamed).unwrap(),
			"\"renamed\""
		);
	}

	#[test]
	fn unmerged_pairs() {
		for (index, worktree) in [
			('D', 'D'),
			('A', 'U'),
			('U', 'D'),
			('U', 'A'),
			('D', 'U'),
			('A', 'A'),
			('U', 'U'),
		] {
			assert!(PorcelainCode::new(index, worktree).is_unmerged());
		}

		assert!(!PorcelainCode::new('M', ' ').is_unmerged());
		assert!(!PorcelainCode::new('A', 'M').is_unmerged());
	}

	#[test]
	fn scan_result_keeps_insertion_order() {
		let scan = ["c.md", "a.md", "b.md"]
			.into_iter()
			.map(|path| RawChangeEntry::new(path, StatusCode::Unstaged))
			.collect::<ScanResult>();

		assert_eq!(
			scan.iter().map(|entry| entry.path.as_str()).collect::<Vec<_>>(),
			["c.md", "a.md", "b.md"]
		);
	}
}
