use nv_actions::ActionKind;
use nv_vcs_detect::Contribution;

pub const NOTE_ADDED: ActionKind = ActionKind::from_static("note-added");
pub const NOTE_SAVED: ActionKind = ActionKind::from_static("note-saved");
pub const NOTE_DELETED: ActionKind = ActionKind::from_static("note-deleted");

/// Every persisted note edit may show up as a worktree change
pub fn contribution() -> Contribution {
	Contribution::new("notes").triggers([NOTE_ADDED, NOTE_SAVED, NOTE_DELETED])
}
