use tokio::sync::broadcast;
use tracing::trace;

use super::action::Action;

pub const DEFAULT_CAPACITY: usize = 1024;

/// Ordered, multi-subscriber action bus.
///
/// Cloning the stream yields another handle to the same bus. Every subscriber receives every action
/// dispatched after it subscribed, in dispatch order.
#[derive(Debug, Clone)]
pub struct ActionStream {
	sender: broadcast::Sender<Action>,
}

impl ActionStream {
	/// Create a new stream buffering at most `capacity` actions per lagging subscriber.
	///
	/// A `capacity` of 0 is raised to 1.
	#[must_use]
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity.max(1));
		Self { sender }
	}

	/// Dispatch an action to every current subscriber
	pub fn dispatch(&self, action: impl Into<Action>) {
		let action = action.into();
		if self.sender.send(action).is_err() {
			// No subscribers, nobody to tell
			trace!("Dispatched action with no subscribers;");
		}
	}

	#[must_use]
	pub fn subscribe(&self) -> broadcast::Receiver<Action> {
		self.sender.subscribe()
	}

	#[must_use]
	pub fn receiver_count(&self) -> usize {
		self.sender.receiver_count()
	}
}

impl Default for ActionStream {
	fn default() -> Self {
		Self::new(DEFAULT_CAPACITY)
	}
}

#[cfg(test)]
mod tests {
	use tokio::sync::broadcast::error::RecvError;
	use tracing_test::traced_test;

	use crate::ActionKind;

	use super::*;

	const LOADED: ActionKind = ActionKind::from_static("collection-loaded");
	const ADDED: ActionKind = ActionKind::from_static("note-added");
	const SAVED: ActionKind = ActionKind::from_static("note-saved");

	#[tokio::test]
	#[traced_test]
	async fn subscribers_see_dispatch_order() {
		let stream = ActionStream::default();
		let mut first = stream.subscribe();
		let mut second = stream.subscribe();

		for kind in [LOADED, ADDED, SAVED] {
			stream.dispatch(kind);
		}

		for rx in [&mut first, &mut second] {
			let kinds = [
				rx.recv().await.unwrap(),
				rx.recv().await.unwrap(),
				rx.recv().await.unwrap(),
			]
			.map(|action| action.kind().clone());

			assert_eq!(kinds, [LOADED, ADDED, SAVED]);
		}
	}

	#[tokio::test]
	#[traced_test]
	async fn dispatch_without_subscribers_is_a_no_op() {
		let stream = ActionStream::default();
		stream.dispatch(SAVED);

		let mut late = stream.subscribe();
		stream.dispatch(ADDED);

		assert_eq!(late.recv().await.unwrap().kind(), &ADDED);
		assert_eq!(stream.receiver_count(), 1);
	}

	#[tokio::test]
	async fn slow_subscriber_lags() {
		let stream = ActionStream::new(2);
		let mut rx = stream.subscribe();

		for kind in [LOADED, ADDED, SAVED] {
			stream.dispatch(kind);
		}

		assert!(matches!(rx.recv().await, Err(RecvError::Lagged(1))));
		assert_eq!(rx.recv().await.unwrap().kind(), &ADDED);
	}

	#[tokio::test]
	async fn zero_capacity_still_delivers() {
		let stream = ActionStream::new(0);
		let mut rx = stream.subscribe();

		stream.dispatch(SAVED);

		assert_eq!(rx.recv().await.unwrap().kind(), &SAVED);
	}
}
