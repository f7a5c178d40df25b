//! Change detection contributions of every feature area, gathered once at bootstrap.

use nv_vcs_detect::Contribution;

pub mod collections;
pub mod notes;
pub mod vcs;
pub mod workspace;

pub fn contributions() -> Vec<Contribution> {
	vec![
		notes::contribution(),
		collections::contribution(),
		workspace::contribution(),
		vcs::contribution(),
	]
}

#[cfg(test)]
mod tests {
	use super::*;

	use nv_vcs_detect::{DetectionConfig, DetectionSettings, VCS_CHANGES_DETECTED};
	use nv_vcs_items::{PorcelainCode, RawChangeEntry, StatusCode, VcsViewItem};
	use tracing_test::traced_test;

	fn assembled() -> DetectionConfig {
		DetectionConfig::assemble(
			contributions(),
			DetectionSettings {
				require_triggers: true,
				..DetectionSettings::default()
			},
		)
		.unwrap()
	}

	#[test]
	#[traced_test]
	fn every_feature_trigger_arms_detection() {
		let config = assembled();

		for kind in [
			notes::NOTE_ADDED,
			notes::NOTE_SAVED,
			notes::NOTE_DELETED,
			collections::COLLECTION_LOADED,
			collections::COLLECTION_ITEM_ADDED,
			workspace::WORKSPACE_OPENED,
			workspace::WORKSPACE_FILES_CHANGED,
			workspace::VCS_COMMIT_COMPLETED,
		] {
			assert!(config.triggers().is_trigger(kind.as_str()), "{kind}");
		}

		assert_eq!(config.triggers().len(), 8);
		assert!(!config
			.triggers()
			.is_trigger(VCS_CHANGES_DETECTED.as_str()));
	}

	#[test]
	#[traced_test]
	fn conflicts_are_classified_before_staged_changes() {
		let config = assembled();

		let names = config.registry().factory_names().collect::<Vec<_>>();
		assert_eq!(
			names,
			["conflicted", "renamed", "staged", "unstaged", "untracked", "base"]
		);

		let item = config
			.registry()
			.classify(
				&RawChangeEntry::new("notes/a.md", StatusCode::Conflicted)
					.with_code(PorcelainCode::new('U', 'U')),
			)
			.unwrap();

		assert!(matches!(item, VcsViewItem::Conflicted(_)));
	}
}
