use nv_actions::ActionKind;
use nv_vcs_detect::Contribution;

pub const COLLECTION_LOADED: ActionKind = ActionKind::from_static("collection-loaded");
pub const COLLECTION_ITEM_ADDED: ActionKind = ActionKind::from_static("collection-item-added");

pub fn contribution() -> Contribution {
	Contribution::new("collections").triggers([COLLECTION_LOADED, COLLECTION_ITEM_ADDED])
}
