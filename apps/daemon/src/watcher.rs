use std::{
	path::{Path, PathBuf},
	pin::pin,
};

use async_channel as chan;
use futures::StreamExt;
use futures_concurrency::stream::Merge;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use nv_actions::{Action, ActionStream};
use tokio::{spawn, task::JoinHandle};
use tracing::{debug, error, info, instrument, trace, Instrument};

use crate::features::workspace::{WorkspaceFilesChanged, WORKSPACE_FILES_CHANGED};

/// Files under `.git/` that still change what `git status` reports
const TRACKED_GIT_FILES: [&str; 2] = ["index", "HEAD"];

/// Turns filesystem events under the workspace root into `workspace-files-changed` actions.
#[derive(Debug)]
pub struct WorkspaceWatcher {
	root: PathBuf,
	// Dropping it stops the notify backend and closes the events channel
	_watcher: RecommendedWatcher,
	handle: Option<JoinHandle<()>>,
	stop_tx: chan::Sender<()>,
}

impl WorkspaceWatcher {
	#[instrument(name = "workspace_watcher", skip(root, stream), fields(root = %root.display()))]
	pub fn start(root: &Path, stream: ActionStream) -> notify::Result<Self> {
		let (events_tx, events_rx) = chan::unbounded();
		let (stop_tx, stop_rx) = chan::bounded(1);

		let mut watcher = RecommendedWatcher::new(
			move |result| {
				if events_tx.is_closed() {
					error!("Tried to send file system events to a closed channel;");
				} else if events_tx.send_blocking(result).is_err() {
					// Never blocks, the channel is unbounded
					error!("Unable to send watcher event to the workspace watcher;");
				}
			},
			Config::default(),
		)?;

		watcher.watch(root, RecursiveMode::Recursive)?;

		let handle = spawn(
			Self::handle_watch_events(root.to_path_buf(), stream, events_rx, stop_rx)
				.in_current_span(),
		);

		info!("Watching workspace for file changes");

		Ok(Self {
			root: root.to_path_buf(),
			_watcher: watcher,
			handle: Some(handle),
			stop_tx,
		})
	}

	async fn handle_watch_events(
		root: PathBuf,
		stream: ActionStream,
		events_rx: chan::Receiver<notify::Result<Event>>,
		stop_rx: chan::Receiver<()>,
	) {
		enum StreamMessage {
			NewEvent(notify::Result<Event>),
			Stop,
		}

		let mut msg_stream = pin!((
			events_rx.map(StreamMessage::NewEvent),
			stop_rx.map(|()| StreamMessage::Stop),
		)
			.merge());

		while let Some(msg) = msg_stream.next().await {
			match msg {
				StreamMessage::NewEvent(Ok(event)) => {
					if !is_relevant(&root, &event) {
						trace!(?event, "Ignoring file system event;");
						continue;
					}

					let changed = WorkspaceFilesChanged { paths: event.paths };
					trace!(kind = ?event.kind, paths = ?changed.paths, "Workspace files changed;");

					stream.dispatch(Action::with_payload(WORKSPACE_FILES_CHANGED, changed));
				}

				StreamMessage::NewEvent(Err(e)) => error!(?e, "Watcher error;"),

				StreamMessage::Stop => {
					debug!("Workspace watcher received shutdown signal and will exit...");
					break;
				}
			}
		}
	}

	pub async fn stop(mut self) {
		if self.stop_tx.send(()).await.is_err() {
			error!("Failed to send stop signal to workspace watcher;");
		}

		if let Some(handle) = self.handle.take() {
			if let Err(e) = handle.await {
				error!(?e, "Failed to join workspace watcher task;");
			}
		}

		info!(root = %self.root.display(), "Workspace watcher gracefully shutdown;");
	}
}

/// Only content changes count, and only those git can see.
fn is_relevant(root: &Path, event: &Event) -> bool {
	matches!(
		event.kind,
		EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
	) && event.paths.iter().any(|path| !is_git_internal(root, path))
}

fn is_git_internal(root: &Path, path: &Path) -> bool {
	path.strip_prefix(root)
		.ok()
		.and_then(|relative| relative.strip_prefix(".git").ok())
		.is_some_and(|inside| {
			!TRACKED_GIT_FILES
				.iter()
				.any(|tracked| inside == Path::new(tracked))
		})
}
