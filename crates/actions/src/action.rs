use std::{fmt, sync::Arc};

use downcast_rs::{impl_downcast, DowncastSync};

use super::kind::ActionKind;

/// A trait that represents any kind of payload an action can carry.
///
/// The stream never looks inside a payload; consumers downcast it to the concrete type they expect
/// for a given [`ActionKind`].
pub trait ActionPayload: DowncastSync + fmt::Debug {}

impl_downcast!(sync ActionPayload);

/// Blanket implementation for all types that are `Send + Sync + Debug + 'static`
impl<T: Send + Sync + fmt::Debug + 'static> ActionPayload for T {}

/// A tagged event on the [`ActionStream`](crate::ActionStream).
///
/// Cloning an action is cheap, the payload is shared between every subscriber.
#[derive(Clone)]
pub struct Action {
	kind: ActionKind,
	payload: Option<Arc<dyn ActionPayload>>,
}

impl Action {
	#[must_use]
	pub const fn new(kind: ActionKind) -> Self {
		Self {
			kind,
			payload: None,
		}
	}

	pub fn with_payload(kind: ActionKind, payload: impl ActionPayload) -> Self {
		Self {
			kind,
			payload: Some(Arc::new(payload)),
		}
	}

	#[must_use]
	pub const fn kind(&self) -> &ActionKind {
		&self.kind
	}

	#[must_use]
	pub fn payload(&self) -> Option<&Arc<dyn ActionPayload>> {
		self.payload.as_ref()
	}

	/// Borrow the payload as `T`, returns `None` if there is no payload or it holds another type.
	#[must_use]
	pub fn payload_as<T: ActionPayload>(&self) -> Option<&T> {
		self.payload
			.as_deref()
			.and_then(|payload| payload.downcast_ref::<T>())
	}
}

impl fmt::Debug for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Action")
			.field("kind", &self.kind)
			.field("payload", &self.payload.as_ref().map(|_| "<ActionPayload>"))
			.finish()
	}
}

impl From<ActionKind> for Action {
	fn from(kind: ActionKind) -> Self {
		Self::new(kind)
	}
}
