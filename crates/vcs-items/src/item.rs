use serde::{Deserialize, Serialize};

use super::entry::{PorcelainCode, StatusCode};

/// What happened to a path in one status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
	Added,
	Modified,
	Deleted,
	TypeChanged,
	Copied,
	Unknown,
}

impl ChangeKind {
	#[must_use]
	pub const fn from_column(column: char) -> Self {
		match column {
			'A' => Self::Added,
			'M' | 'R' => Self::Modified,
			'D' => Self::Deleted,
			'T' => Self::TypeChanged,
			'C' => Self::Copied,
			_ => Self::Unknown,
		}
	}
}

/// Which side of a merge left a path unmerged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictKind {
	BothDeleted,
	AddedByUs,
	DeletedByThem,
	AddedByThem,
	DeletedByUs,
	BothAdded,
	BothModified,
	Unknown,
}

impl From<PorcelainCode> for ConflictKind {
	fn from(PorcelainCode { index, worktree }: PorcelainCode) -> Self {
		match (index, worktree) {
			('D', 'D') => Self::BothDeleted,
			('A', 'U') => Self::AddedByUs,
			('U', 'D') => Self::DeletedByThem,
			('U', 'A') => Self::AddedByThem,
			('D', 'U') => Self::DeletedByUs,
			('A', 'A') => Self::BothAdded,
			('U', 'U') => Self::BothModified,
			_ => Self::Unknown,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedItem {
	pub path: String,
	pub status: StatusCode,
	pub change: ChangeKind,
	/// The path also has changes in the working copy that are not staged yet
	pub also_modified_in_worktree: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnstagedItem {
	pub path: String,
	pub status: StatusCode,
	pub change: ChangeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UntrackedItem {
	pub path: String,
	pub status: StatusCode,
	pub is_directory: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictItem {
	pub path: String,
	pub status: StatusCode,
	pub conflict: ConflictKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamedItem {
	pub path: String,
	pub status: StatusCode,
	pub from: String,
	pub also_modified_in_worktree: bool,
}

/// Produced by the fallback factory for entries no specialised factory claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownItem {
	pub path: String,
	pub status: StatusCode,
}

/// A classified, renderable VCS entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum VcsViewItem {
	Staged(StagedItem),
	Unstaged(UnstagedItem),
	Untracked(UntrackedItem),
	Conflicted(ConflictItem),
	Renamed(RenamedItem),
	Unknown(UnknownItem),
}

impl VcsViewItem {
	#[must_use]
	pub fn path(&self) -> &str {
		match self {
			Self::Staged(StagedItem { path, .. })
			| Self::Unstaged(UnstagedItem { path, .. })
			| Self::Untracked(UntrackedItem { path, .. })
			| Self::Conflicted(ConflictItem { path, .. })
			| Self::Renamed(RenamedItem { path, .. })
			| Self::Unknown(UnknownItem { path, .. }) => path,
		}
	}

	#[must_use]
	pub fn status(&self) -> StatusCode {
		match self {
			Self::Staged(StagedItem { status, .. })
			| Self::Unstaged(UnstagedItem { status, .. })
			| Self::Untracked(UntrackedItem { status, .. })
			| Self::Conflicted(ConflictItem { status, .. })
			| Self::Renamed(RenamedItem { status, .. })
			| Self::Unknown(UnknownItem { status, .. }) => *status,
		}
	}

	/// Last path component, ignoring the trailing slash git puts on untracked directories
	#[must_use]
	pub fn file_name(&self) -> &str {
		let path = self.path().trim_end_matches('/');
		path.rsplit_once('/').map_or(path, |(_, name)| name)
	}

	#[must_use]
	pub const fn kind_name(&self) -> &'static str {
		match self {
			Self::Staged(_) => "staged",
			Self::Unstaged(_) => "unstaged",
			Self::Untracked(_) => "untracked",
			Self::Conflicted(_) => "conflicted",
			Self::Renamed(_) => "renamed",
			Self::Unknown(_) => "unknown",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn file_name_of_nested_and_directory_paths() {
		let file = VcsViewItem::Unknown(UnknownItem {
			path: "notes/2024/todo.md".to_string(),
			status: StatusCode::Staged,
		});
		let dir = VcsViewItem::Untracked(UntrackedItem {
			path: "attachments/".to_string(),
			status: StatusCode::Untracked,
			is_directory: true,
		});

		assert_eq!(file.file_name(), "todo.md");
		assert_eq!(dir.file_name(), "attachments");
		assert_eq!(file.status(), StatusCode::Staged);
	}

	#[test]
	fn serialized_items_are_tagged() {
		let item = VcsViewItem::Conflicted(ConflictItem {
			path: "a.txt".to_string(),
			status: StatusCode::Conflicted,
			conflict: ConflictKind::BothModified,
		});

		let json = serde_json::to_value(&item).unwrap();
		assert_eq!(json["kind"], "conflicted");
		assert_eq!(json["conflict"], "both-modified");
		assert_eq!(json["path"], "a.txt");
	}
}
