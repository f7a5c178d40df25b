use std::collections::{hash_set, HashSet};

use nv_actions::ActionKind;

/// The frozen set of action kinds that arm a VCS scan.
///
/// Only built through [`FromIterator`], usually by
/// [`DetectionConfig::assemble`](crate::DetectionConfig::assemble); there is no way to add kinds
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct TriggerSet(HashSet<ActionKind>);

impl TriggerSet {
	#[must_use]
	pub fn is_trigger(&self, kind: &str) -> bool {
		self.0.contains(kind)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// An empty set never triggers, detection is effectively disabled
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> hash_set::Iter<'_, ActionKind> {
		self.0.iter()
	}
}

impl FromIterator<ActionKind> for TriggerSet {
	fn from_iter<I: IntoIterator<Item = ActionKind>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}
