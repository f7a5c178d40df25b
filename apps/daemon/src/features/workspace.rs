use std::path::PathBuf;

use nv_actions::ActionKind;
use nv_vcs_detect::Contribution;

/// Dispatched once at startup so the first view doesn't wait for an edit
pub const WORKSPACE_OPENED: ActionKind = ActionKind::from_static("workspace-opened");
pub const WORKSPACE_FILES_CHANGED: ActionKind = ActionKind::from_static("workspace-files-changed");
pub const VCS_COMMIT_COMPLETED: ActionKind = ActionKind::from_static("vcs-commit-completed");

/// Payload of [`WORKSPACE_FILES_CHANGED`]
#[derive(Debug, Clone)]
pub struct WorkspaceFilesChanged {
	pub paths: Vec<PathBuf>,
}

pub fn contribution() -> Contribution {
	Contribution::new("workspace").triggers([
		WORKSPACE_OPENED,
		WORKSPACE_FILES_CHANGED,
		VCS_COMMIT_COMPLETED,
	])
}
