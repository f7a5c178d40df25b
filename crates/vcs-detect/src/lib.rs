//!
//! # VCS Change Detection
//!
//! Decides, from the application's [`ActionStream`](nv_actions::ActionStream), when the on-disk VCS
//! state must be scanned again, and turns each scan into a list of typed view items.
//!
//! - A [`TriggerSet`] assembled once at bootstrap from every feature area's [`Contribution`] names
//!   the action kinds that may have changed VCS-visible state.
//! - The [`ChangeDetectionEffect`] filters the stream against that set, coalesces bursts of
//!   triggers into a single scan after a quiet period, and never lets more than one
//!   [`VcsScanner`] call run at a time. Triggers that arrive mid-scan are remembered as exactly
//!   one more scan owed.
//! - Each successful scan is materialized through the configured
//!   [`FactoryRegistry`](nv_vcs_items::FactoryRegistry) and published back onto the stream as a
//!   [`VCS_CHANGES_DETECTED`] action carrying [`VcsChangesDetected`].
//!
//! Failed scans are logged and dropped, the previous items stay the latest published ones and the
//! effect keeps waiting for the next trigger.

#![warn(
	clippy::all,
	clippy::pedantic,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::nursery,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	trivial_casts,
	trivial_numeric_casts,
	unused_allocation,
	clippy::unnecessary_cast,
	clippy::cast_lossless,
	clippy::cast_possible_truncation,
	clippy::cast_possible_wrap,
	clippy::cast_precision_loss,
	clippy::cast_sign_loss,
	clippy::dbg_macro,
	clippy::deprecated_cfg_attr,
	clippy::separated_literal_suffix,
	deprecated
)]
#![forbid(deprecated_in_future)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

use nv_actions::ActionKind;

mod config;
mod effect;
mod error;
mod scanner;
mod trigger;

pub use config::{Contribution, DetectionConfig, DetectionSettings};
pub use effect::{ChangeDetectionEffect, EffectHandle, EffectStats, VcsChangesDetected};
pub use error::{ConfigError, ScanError};
pub use scanner::{git::GitCliScanner, VcsScanner};
pub use trigger::TriggerSet;

/// Kind of the action published after every successful detection cycle.
///
/// Its payload is a [`VcsChangesDetected`].
pub const VCS_CHANGES_DETECTED: ActionKind = ActionKind::from_static("vcs-changes-detected");
