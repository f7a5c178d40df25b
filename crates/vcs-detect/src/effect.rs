use std::{
	any::Any,
	panic::AssertUnwindSafe,
	path::PathBuf,
	sync::{
		atomic::{AtomicU64, Ordering},
		Arc,
	},
};

use chrono::{DateTime, Utc};
use futures::{
	future::{BoxFuture, OptionFuture},
	FutureExt,
};
use nv_actions::{Action, ActionStream, Receiver, RecvError};
use nv_vcs_items::{ScanResult, VcsViewItem};
use tokio::{
	spawn,
	task::JoinHandle,
	time::{sleep_until, timeout, Instant},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, trace, warn, Instrument};

use super::{
	config::DetectionConfig, error::ScanError, scanner::VcsScanner, VCS_CHANGES_DETECTED,
};

type ScanFuture = BoxFuture<'static, Result<ScanResult, ScanError>>;

/// Payload of every [`VCS_CHANGES_DETECTED`] action.
///
/// Each cycle publishes a brand new item list, previous lists are never patched.
#[derive(Debug, Clone)]
pub struct VcsChangesDetected {
	pub root: PathBuf,
	/// Starts at 1 and grows by one with each published list
	pub generation: u64,
	pub items: Arc<[VcsViewItem]>,
	pub detected_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Counters {
	scans_started: AtomicU64,
	scans_failed: AtomicU64,
	completions_emitted: AtomicU64,
}

/// A snapshot of what the effect did so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectStats {
	pub scans_started: u64,
	pub scans_failed: u64,
	pub completions_emitted: u64,
}

/// Coalescing window opened by the first trigger of a burst
#[derive(Debug, Clone, Copy)]
struct Window {
	opened_at: Instant,
	deadline: Instant,
}

/// Bridges the action stream to the VCS scanner.
///
/// Runs as a single task for as long as its [`EffectHandle`] lives.
pub struct ChangeDetectionEffect {
	config: Arc<DetectionConfig>,
	scanner: Arc<dyn VcsScanner>,
	stream: ActionStream,
	root: PathBuf,
	counters: Arc<Counters>,
	generation: u64,
}

impl ChangeDetectionEffect {
	/// Subscribe to the stream and start the detection loop.
	///
	/// The subscription is taken before this function returns, so every action dispatched
	/// afterwards is seen by the effect.
	#[instrument(
		name = "change_detection",
		skip(config, scanner, stream, workspace_root),
		fields(root = %workspace_root.display()),
	)]
	pub fn spawn(
		config: Arc<DetectionConfig>,
		scanner: Arc<dyn VcsScanner>,
		stream: ActionStream,
		workspace_root: PathBuf,
	) -> EffectHandle {
		let actions_rx = stream.subscribe();
		let cancel_token = CancellationToken::new();
		let counters = Arc::<Counters>::default();

		let effect = Self {
			config,
			scanner,
			stream,
			root: workspace_root,
			counters: Arc::clone(&counters),
			generation: 0,
		};

		let handle = spawn(
			effect
				.run(actions_rx, cancel_token.clone())
				.in_current_span(),
		);

		EffectHandle {
			cancel_token,
			handle: Some(handle),
			counters,
		}
	}

	async fn run(mut self, mut actions_rx: Receiver<Action>, cancel_token: CancellationToken) {
		let quiet_period = self.config.settings().quiet_period();
		let max_delay = self.config.settings().max_delay();

		let mut window = None::<Window>;
		let mut in_flight = None::<ScanFuture>;
		let mut owed = false;

		debug!("Change detection started");

		loop {
			let deadline = window.map(|window| window.deadline);

			tokio::select! {
				biased;

				() = cancel_token.cancelled() => {
					debug!("Change detection received shutdown signal and will exit...");
					break;
				}

				Some(outcome) = OptionFuture::from(in_flight.as_mut()), if in_flight.is_some() => {
					in_flight = None;
					self.finish_cycle(outcome);

					if owed {
						owed = false;
						trace!("Running the scan owed to triggers received mid-scan");
						in_flight = Some(self.start_scan());
					}
				}

				() = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
					window = None;
					in_flight = Some(self.start_scan());
				}

				res = actions_rx.recv() => {
					let triggered = match res {
						Ok(action) => self.config.triggers().is_trigger(action.kind().as_str()),
						Err(RecvError::Lagged(skipped)) => {
							// Whatever we skipped may have been a trigger
							warn!(skipped, "Change detection lagged behind the action stream;");
							true
						}
						Err(RecvError::Closed) => {
							// Unreachable while `self.stream` holds a sender, cancellation is the
							// only way out
							debug!("Action stream closed, change detection will exit...");
							break;
						}
					};

					if !triggered {
						continue;
					}

					if in_flight.is_some() {
						if !owed {
							trace!("Scan in flight, one more scan is owed");
						}
						owed = true;
						continue;
					}

					let now = Instant::now();
					window = Some(window.map_or(
						Window {
							opened_at: now,
							deadline: now + quiet_period,
						},
						|Window { opened_at, .. }| Window {
							opened_at,
							deadline: (now + quiet_period).min(opened_at + max_delay),
						},
					));
				}
			}
		}

		if window.is_some() || in_flight.is_some() {
			debug!(
				pending = window.is_some(),
				in_flight = in_flight.is_some(),
				"Discarding unfinished detection cycle;"
			);
		}
	}

	fn start_scan(&self) -> ScanFuture {
		self.counters.scans_started.fetch_add(1, Ordering::Relaxed);

		let scanner = Arc::clone(&self.scanner);
		let root = self.root.clone();
		let scan_timeout = self.config.settings().scan_timeout();

		debug!("Starting VCS scan");

		async move {
			let scan = AssertUnwindSafe(scanner.scan(&root)).catch_unwind();

			let outcome = match scan_timeout {
				Some(limit) => match timeout(limit, scan).await {
					Ok(outcome) => outcome,
					Err(_) => return Err(ScanError::TimedOut(limit)),
				},
				None => scan.await,
			};

			match outcome {
				Ok(res) => res,
				Err(panic) => Err(ScanError::Panicked(describe_panic(panic.as_ref()))),
			}
		}
		.boxed()
	}

	fn finish_cycle(&mut self, outcome: Result<ScanResult, ScanError>) {
		let scan = match outcome {
			Ok(scan) => scan,
			Err(e) => {
				self.counters.scans_failed.fetch_add(1, Ordering::Relaxed);
				error!(?e, "VCS scan failed, keeping the previously published items;");
				return;
			}
		};

		let items = match self.config.registry().materialize(&scan) {
			Ok(items) => items,
			Err(e) => {
				self.counters.scans_failed.fetch_add(1, Ordering::Relaxed);
				error!(?e, "Failed to materialize VCS items;");
				return;
			}
		};

		self.generation += 1;

		debug!(
			generation = self.generation,
			items = items.len(),
			"VCS changes detected;"
		);

		self.stream.dispatch(Action::with_payload(
			VCS_CHANGES_DETECTED,
			VcsChangesDetected {
				root: self.root.clone(),
				generation: self.generation,
				items: items.into(),
				detected_at: Utc::now(),
			},
		));

		self.counters
			.completions_emitted
			.fetch_add(1, Ordering::Relaxed);
	}
}

fn describe_panic(panic: &(dyn Any + Send)) -> String {
	panic
		.downcast_ref::<&str>()
		.map(ToString::to_string)
		.or_else(|| panic.downcast_ref::<String>().cloned())
		.unwrap_or_else(|| "<unknown panic payload>".to_string())
}

/// Owner of a running [`ChangeDetectionEffect`].
///
/// Dropping the handle stops the effect, a pending coalescing window and any in-flight scan are
/// discarded. Use [`EffectHandle::shutdown`] to also wait for the task to finish.
#[derive(Debug)]
pub struct EffectHandle {
	cancel_token: CancellationToken,
	handle: Option<JoinHandle<()>>,
	counters: Arc<Counters>,
}

impl EffectHandle {
	#[must_use]
	pub fn stats(&self) -> EffectStats {
		EffectStats {
			scans_started: self.counters.scans_started.load(Ordering::Relaxed),
			scans_failed: self.counters.scans_failed.load(Ordering::Relaxed),
			completions_emitted: self.counters.completions_emitted.load(Ordering::Relaxed),
		}
	}

	#[must_use]
	pub fn is_finished(&self) -> bool {
		self.handle.as_ref().map_or(true, JoinHandle::is_finished)
	}

	pub async fn shutdown(mut self) {
		self.cancel_token.cancel();

		if let Some(handle) = self.handle.take() {
			if let Err(e) = handle.await {
				error!(?e, "Failed to join change detection task;");
			}
		}
	}
}

impl Drop for EffectHandle {
	fn drop(&mut self) {
		self.cancel_token.cancel();
	}
}
