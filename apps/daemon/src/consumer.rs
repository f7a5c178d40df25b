use std::{collections::BTreeMap, io::Write, path::Path};

use chrono::{DateTime, Utc};
use nv_actions::{Action, ActionStream, Receiver, RecvError};
use nv_vcs_detect::{VcsChangesDetected, VCS_CHANGES_DETECTED};
use nv_vcs_items::VcsViewItem;
use serde::Serialize;
use tokio::{spawn, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn, Instrument};

/// One line of `--json` output
#[derive(Debug, Serialize)]
struct CompletionLine<'a> {
	generation: u64,
	root: &'a Path,
	detected_at: DateTime<Utc>,
	items: &'a [VcsViewItem],
}

impl<'a> From<&'a VcsChangesDetected> for CompletionLine<'a> {
	fn from(detected: &'a VcsChangesDetected) -> Self {
		Self {
			generation: detected.generation,
			root: &detected.root,
			detected_at: detected.detected_at,
			items: &detected.items,
		}
	}
}

fn count_by_kind(items: &[VcsViewItem]) -> BTreeMap<&'static str, usize> {
	items.iter().fold(BTreeMap::new(), |mut counts, item| {
		*counts.entry(item.kind_name()).or_default() += 1;
		counts
	})
}

fn report(detected: &VcsChangesDetected, json: bool, out: &mut impl Write) {
	info!(
		generation = detected.generation,
		items = detected.items.len(),
		by_kind = ?count_by_kind(&detected.items),
		"Workspace VCS view updated;"
	);

	if !json {
		return;
	}

	let res = serde_json::to_writer(&mut *out, &CompletionLine::from(detected))
		.map_err(std::io::Error::from)
		.and_then(|()| writeln!(out))
		.and_then(|()| out.flush());

	if let Err(e) = res {
		error!(?e, "Failed to write completion as JSON;");
	}
}

/// Logs every published VCS view, and prints it as a JSON line on stdout when asked to.
pub fn spawn_consumer(
	stream: &ActionStream,
	json: bool,
	cancel_token: CancellationToken,
) -> JoinHandle<()> {
	let actions_rx = stream.subscribe();

	spawn(consume(actions_rx, json, cancel_token).in_current_span())
}

async fn consume(
	mut actions_rx: Receiver<Action>,
	json: bool,
	cancel_token: CancellationToken,
) {
	loop {
		let res = tokio::select! {
			() = cancel_token.cancelled() => break,
			res = actions_rx.recv() => res,
		};

		match res {
			Ok(action) if action.kind() == &VCS_CHANGES_DETECTED => {
				match action.payload_as::<VcsChangesDetected>() {
					Some(detected) => report(detected, json, &mut std::io::stdout().lock()),
					None => warn!(?action, "Completion without a VCS changes payload;"),
				}
			}
			Ok(_) => {}
			Err(RecvError::Lagged(skipped)) => {
				warn!(skipped, "Completion consumer lagged behind the action stream;");
			}
			Err(RecvError::Closed) => break,
		}
	}

	debug!("Completion consumer stopped");
}

#[cfg(test)]
mod tests {
	use super::*;

	use std::{path::PathBuf, sync::Arc};

	use nv_vcs_items::{StatusCode, UnknownItem, UntrackedItem};
	use tracing_test::traced_test;

	fn detected() -> VcsChangesDetected {
		VcsChangesDetected {
			root: PathBuf::from("/notes"),
			generation: 3,
			items: Arc::from(vec![
				VcsViewItem::Untracked(UntrackedItem {
					path: "drafts/".to_string(),
					status: StatusCode::Untracked,
					is_directory: true,
				}),
				VcsViewItem::Unknown(UnknownItem {
					path: "a.md".to_string(),
					status: StatusCode::Staged,
				}),
				VcsViewItem::Untracked(UntrackedItem {
					path: "b.md".to_string(),
					status: StatusCode::Untracked,
					is_directory: false,
				}),
			]),
			detected_at: Utc::now(),
		}
	}

	#[test]
	fn counts_items_per_kind() {
		let counts = count_by_kind(&detected().items);

		assert_eq!(counts.get("untracked"), Some(&2));
		assert_eq!(counts.get("unknown"), Some(&1));
		assert_eq!(counts.len(), 2);
	}

	#[test]
	#[traced_test]
	fn json_output_is_one_line_per_completion() {
		let mut out = Vec::new();

		report(&detected(), true, &mut out);
		report(&detected(), true, &mut out);

		let text = String::from_utf8(out).unwrap();
		let lines = text.lines().collect::<Vec<_>>();
		assert_eq!(lines.len(), 2);

		let line = serde_json::from_str::<serde_json::Value>(lines[0]).unwrap();
		assert_eq!(line["generation"], 3);
		assert_eq!(line["root"], "/notes");
		assert_eq!(line["items"][0]["kind"], "untracked");
		assert_eq!(line["items"][0]["path"], "drafts/");
		assert_eq!(line["items"][1]["status"], "staged");

		assert!(logs_contain("Workspace VCS view updated"));
	}

	#[test]
	#[traced_test]
	fn plain_mode_only_logs() {
		let mut out = Vec::new();

		report(&detected(), false, &mut out);

		assert!(out.is_empty());
		assert!(logs_contain("Workspace VCS view updated"));
	}

	#[tokio::test]
	#[traced_test]
	async fn stops_on_cancellation() {
		let stream = ActionStream::default();
		let cancel_token = CancellationToken::new();
		let handle = spawn_consumer(&stream, false, cancel_token.clone());

		stream.dispatch(Action::new(VCS_CHANGES_DETECTED));
		cancel_token.cancel();

		handle.await.unwrap();
		assert!(logs_contain("Completion consumer stopped"));
	}
}
