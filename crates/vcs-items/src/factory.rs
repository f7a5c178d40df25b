use std::fmt;

use super::{
	entry::{RawChangeEntry, StatusCode},
	error::FactoryError,
	item::{
		ChangeKind, ConflictItem, ConflictKind, RenamedItem, StagedItem, UnknownItem, UnstagedItem,
		UntrackedItem, VcsViewItem,
	},
};

/// Recognizes one category of raw entries and turns them into view items.
///
/// `can_handle` must be a pure predicate. Claiming an entry is exclusive: once a factory returns
/// `true` no other factory is consulted, so `create` must succeed for every entry the factory
/// claims. An `Err` from `create` is a bug in the factory and is reported as such.
pub trait VcsItemFactory: Send + Sync + fmt::Debug {
	/// Name used in diagnostics and contract violation reports
	fn name(&self) -> &str {
		std::any::type_name::<Self>()
	}

	fn can_handle(&self, entry: &RawChangeEntry) -> bool;

	fn create(&self, entry: &RawChangeEntry) -> Result<VcsViewItem, FactoryError>;

	/// Whether this is the catch-all fallback.
	///
	/// Wrappers around [`BaseVcsItemFactory`] must forward it.
	fn is_fallback(&self) -> bool {
		false
	}
}

fn expect_status(entry: &RawChangeEntry, expected: StatusCode) -> Result<(), FactoryError> {
	if entry.status == expected {
		Ok(())
	} else {
		Err(FactoryError::StatusMismatch {
			expected,
			found: entry.status,
		})
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StagedItemFactory;

impl VcsItemFactory for StagedItemFactory {
	fn name(&self) -> &str {
		"staged"
	}

	fn can_handle(&self, entry: &RawChangeEntry) -> bool {
		entry.status == StatusCode::Staged
	}

	fn create(&self, entry: &RawChangeEntry) -> Result<VcsViewItem, FactoryError> {
		expect_status(entry, StatusCode::Staged)?;

		Ok(VcsViewItem::Staged(StagedItem {
			path: entry.path.clone(),
			status: entry.status,
			change: entry
				.code
				.map_or(ChangeKind::Unknown, |code| ChangeKind::from_column(code.index)),
			also_modified_in_worktree: entry.code.is_some_and(|code| code.has_worktree_change()),
		}))
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnstagedItemFactory;

impl VcsItemFactory for UnstagedItemFactory {
	fn name(&self) -> &str {
		"unstaged"
	}

	fn can_handle(&self, entry: &RawChangeEntry) -> bool {
		entry.status == StatusCode::Unstaged
	}

	fn create(&self, entry: &RawChangeEntry) -> Result<VcsViewItem, FactoryError> {
		expect_status(entry, StatusCode::Unstaged)?;

		Ok(VcsViewItem::Unstaged(UnstagedItem {
			path: entry.path.clone(),
			status: entry.status,
			change: entry.code.map_or(ChangeKind::Unknown, |code| {
				ChangeKind::from_column(code.worktree)
			}),
		}))
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UntrackedItemFactory;

impl VcsItemFactory for UntrackedItemFactory {
	fn name(&self) -> &str {
		"untracked"
	}

	fn can_handle(&self, entry: &RawChangeEntry) -> bool {
		entry.status == StatusCode::Untracked
	}

	fn create(&self, entry: &RawChangeEntry) -> Result<VcsViewItem, FactoryError> {
		expect_status(entry, StatusCode::Untracked)?;

		Ok(VcsViewItem::Untracked(UntrackedItem {
			path: entry.path.clone(),
			status: entry.status,
			is_directory: entry.path.ends_with('/'),
		}))
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictItemFactory;

impl VcsItemFactory for ConflictItemFactory {
	fn name(&self) -> &str {
		"conflicted"
	}

	fn can_handle(&self, entry: &RawChangeEntry) -> bool {
		entry.status == StatusCode::Conflicted
	}

	fn create(&self, entry: &RawChangeEntry) -> Result<VcsViewItem, FactoryError> {
		expect_status(entry, StatusCode::Conflicted)?;

		Ok(VcsViewItem::Conflicted(ConflictItem {
			path: entry.path.clone(),
			status: entry.status,
			conflict: entry.code.map_or(ConflictKind::Unknown, ConflictKind::from),
		}))
	}
}

/// Claims renames that carry their source path; a rename reported without one is left to the
/// fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenamedItemFactory;

impl VcsItemFactory for RenamedItemFactory {
	fn name(&self) -> &str {
		"renamed"
	}

	fn can_handle(&self, entry: &RawChangeEntry) -> bool {
		entry.status == StatusCode::Renamed && entry.original_path.is_some()
	}

	fn create(&self, entry: &RawChangeEntry) -> Result<VcsViewItem, FactoryError> {
		expect_status(entry, StatusCode::Renamed)?;

		Ok(VcsViewItem::Renamed(RenamedItem {
			path: entry.path.clone(),
			status: entry.status,
			from: entry
				.original_path
				.clone()
				.ok_or(FactoryError::MissingField("original_path"))?,
			also_modified_in_worktree: entry.code.is_some_and(|code| code.has_worktree_change()),
		}))
	}
}

/// The unconditional fallback, always evaluated after every registered factory.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseVcsItemFactory;

impl BaseVcsItemFactory {
	pub const NAME: &'static str = "base";
}

impl VcsItemFactory for BaseVcsItemFactory {
	fn name(&self) -> &str {
		Self::NAME
	}

	fn can_handle(&self, _: &RawChangeEntry) -> bool {
		true
	}

	fn create(&self, entry: &RawChangeEntry) -> Result<VcsViewItem, FactoryError> {
		Ok(VcsViewItem::Unknown(UnknownItem {
			path: entry.path.clone(),
			status: entry.status,
		}))
	}

	fn is_fallback(&self) -> bool {
		true
	}
}
