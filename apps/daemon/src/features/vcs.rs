use nv_vcs_detect::Contribution;
use nv_vcs_items::{
	ConflictItemFactory, RenamedItemFactory, StagedItemFactory, UnstagedItemFactory,
	UntrackedItemFactory,
};

/// The built-in item kinds.
///
/// Conflicts come first so an unmerged entry is never shown as a plain edit.
pub fn contribution() -> Contribution {
	Contribution::new("vcs")
		.factory(ConflictItemFactory)
		.factory(RenamedItemFactory)
		.factory(StagedItemFactory)
		.factory(UnstagedItemFactory)
		.factory(UntrackedItemFactory)
}
