use std::{borrow::Cow, fmt};

use serde::{Deserialize, Serialize};

/// Identity of an [`Action`](crate::Action).
///
/// Kinds are compared by content, so a kind declared as a `const` by one feature area matches the
/// same string built at runtime by another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionKind(Cow<'static, str>);

impl ActionKind {
	#[must_use]
	pub const fn from_static(kind: &'static str) -> Self {
		Self(Cow::Borrowed(kind))
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ActionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for ActionKind {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl std::borrow::Borrow<str> for ActionKind {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl From<&'static str> for ActionKind {
	fn from(kind: &'static str) -> Self {
		Self::from_static(kind)
	}
}

impl From<String> for ActionKind {
	fn from(kind: String) -> Self {
		Self(Cow::Owned(kind))
	}
}

impl PartialEq<str> for ActionKind {
	fn eq(&self, other: &str) -> bool {
		self.0 == other
	}
}

impl PartialEq<&str> for ActionKind {
	fn eq(&self, other: &&str) -> bool {
		self.0 == *other
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	#[test]
	fn static_and_owned_kinds_are_equal() {
		const SAVED: ActionKind = ActionKind::from_static("note-saved");

		assert_eq!(SAVED, ActionKind::from("note-saved".to_string()));

		let set = [SAVED, ActionKind::from("note-saved".to_string())]
			.into_iter()
			.collect::<HashSet<_>>();
		assert_eq!(set.len(), 1);
		assert!(set.contains("note-saved"));
	}
}
