use std::{sync::Arc, time::Duration};

use nv_actions::ActionKind;
use nv_vcs_items::{FactoryRegistry, VcsItemFactory};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{error::ConfigError, trigger::TriggerSet, VCS_CHANGES_DETECTED};

/// What one feature area brings to change detection at bootstrap.
#[derive(Debug, Clone)]
pub struct Contribution {
	name: &'static str,
	triggers: Vec<ActionKind>,
	factories: Vec<Arc<dyn VcsItemFactory>>,
}

impl Contribution {
	#[must_use]
	pub const fn new(name: &'static str) -> Self {
		Self {
			name,
			triggers: Vec::new(),
			factories: Vec::new(),
		}
	}

	#[must_use]
	pub fn trigger(mut self, kind: ActionKind) -> Self {
		self.triggers.push(kind);
		self
	}

	#[must_use]
	pub fn triggers(mut self, kinds: impl IntoIterator<Item = ActionKind>) -> Self {
		self.triggers.extend(kinds);
		self
	}

	#[must_use]
	pub fn factory(mut self, factory: impl VcsItemFactory + 'static) -> Self {
		self.factories.push(Arc::new(factory));
		self
	}

	#[must_use]
	pub const fn name(&self) -> &'static str {
		self.name
	}
}

/// Tunables for the change detection effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
	/// How long the stream must stay free of triggers before a scan starts
	pub quiet_period_ms: u64,
	/// Upper bound on how far a stream of triggers can push a scan back
	pub max_delay_ms: u64,
	/// Scans running longer than this are abandoned as failed, `None` waits forever
	pub scan_timeout_ms: Option<u64>,
	/// Refuse to start without any trigger kind instead of running with detection disabled
	pub require_triggers: bool,
}

impl DetectionSettings {
	#[must_use]
	pub const fn quiet_period(&self) -> Duration {
		Duration::from_millis(self.quiet_period_ms)
	}

	#[must_use]
	pub const fn max_delay(&self) -> Duration {
		Duration::from_millis(self.max_delay_ms)
	}

	#[must_use]
	pub fn scan_timeout(&self) -> Option<Duration> {
		self.scan_timeout_ms.map(Duration::from_millis)
	}

	#[must_use]
	pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
		self.quiet_period_ms = duration_to_ms(quiet_period);
		self
	}

	#[must_use]
	pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
		self.max_delay_ms = duration_to_ms(max_delay);
		self
	}

	#[must_use]
	pub fn with_scan_timeout(mut self, scan_timeout: Option<Duration>) -> Self {
		self.scan_timeout_ms = scan_timeout.map(duration_to_ms);
		self
	}

	#[must_use]
	pub const fn with_required_triggers(mut self, require_triggers: bool) -> Self {
		self.require_triggers = require_triggers;
		self
	}
}

impl Default for DetectionSettings {
	fn default() -> Self {
		Self {
			quiet_period_ms: 50,
			max_delay_ms: 1_000,
			scan_timeout_ms: Some(30_000),
			require_triggers: false,
		}
	}
}

fn duration_to_ms(duration: Duration) -> u64 {
	u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Everything the effect needs, assembled once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
	triggers: TriggerSet,
	registry: FactoryRegistry,
	settings: DetectionSettings,
}

impl DetectionConfig {
	/// Merge every feature area's contribution.
	///
	/// Trigger kinds are deduplicated. Factories keep contribution order, then each
	/// contribution's own order, and the fallback is appended last.
	pub fn assemble(
		contributions: impl IntoIterator<Item = Contribution>,
		settings: DetectionSettings,
	) -> Result<Self, ConfigError> {
		if settings.max_delay_ms < settings.quiet_period_ms {
			return Err(ConfigError::MaxDelayBelowQuietPeriod {
				quiet_period_ms: settings.quiet_period_ms,
				max_delay_ms: settings.max_delay_ms,
			});
		}

		let mut triggers = Vec::new();
		let mut registry = FactoryRegistry::builder();

		for Contribution {
			name,
			triggers: contributed_triggers,
			factories,
		} in contributions
		{
			if contributed_triggers.contains(&VCS_CHANGES_DETECTED) {
				return Err(ConfigError::SelfTriggering(name.to_string()));
			}

			debug!(
				contribution = name,
				triggers = contributed_triggers.len(),
				factories = factories.len(),
				"Collected change detection contribution;"
			);

			triggers.extend(contributed_triggers);
			registry = registry.extend(factories);
		}

		let triggers = triggers.into_iter().collect::<TriggerSet>();
		let registry = registry.build()?;

		if triggers.is_empty() {
			if settings.require_triggers {
				return Err(ConfigError::EmptyTriggerSet);
			}
			warn!("No trigger action kinds were contributed, VCS change detection is disabled");
		}

		info!(
			triggers = triggers.len(),
			factories = ?registry.factory_names().collect::<Vec<_>>(),
			quiet_period_ms = settings.quiet_period_ms,
			"Change detection configured;"
		);

		Ok(Self {
			triggers,
			registry,
			settings,
		})
	}

	#[must_use]
	pub const fn triggers(&self) -> &TriggerSet {
		&self.triggers
	}

	#[must_use]
	pub const fn registry(&self) -> &FactoryRegistry {
		&self.registry
	}

	#[must_use]
	pub const fn settings(&self) -> &DetectionSettings {
		&self.settings
	}
}

#[cfg(test)]
mod tests {
	use nv_vcs_items::{
		BaseVcsItemFactory, ConflictItemFactory, RegistryError, StagedItemFactory,
		UntrackedItemFactory,
	};
	use tracing_test::traced_test;

	use super::*;

	const NOTE_SAVED: ActionKind = ActionKind::from_static("note-saved");
	const COLLECTION_LOADED: ActionKind = ActionKind::from_static("collection-loaded");

	#[test]
	#[traced_test]
	fn contributions_merge_in_order() {
		let config = DetectionConfig::assemble(
			[
				Contribution::new("notes")
					.trigger(NOTE_SAVED)
					.factory(ConflictItemFactory),
				Contribution::new("collections")
					.triggers([COLLECTION_LOADED, NOTE_SAVED])
					.factory(StagedItemFactory)
					.factory(UntrackedItemFactory),
			],
			DetectionSettings::default(),
		)
		.unwrap();

		assert_eq!(config.triggers().len(), 2);
		assert!(config.triggers().is_trigger("note-saved"));
		assert!(config.triggers().is_trigger("collection-loaded"));
		assert_eq!(
			config.registry().factory_names().collect::<Vec<_>>(),
			["conflicted", "staged", "untracked", BaseVcsItemFactory::NAME]
		);
	}

	#[test]
	fn completion_kind_cannot_be_a_trigger() {
		let result = DetectionConfig::assemble(
			[Contribution::new("loopy").trigger(VCS_CHANGES_DETECTED)],
			DetectionSettings::default(),
		);

		assert!(matches!(result, Err(ConfigError::SelfTriggering(name)) if name == "loopy"));
	}

	#[test]
	#[traced_test]
	fn empty_trigger_set_disables_detection() {
		let config =
			DetectionConfig::assemble([Contribution::new("silent")], DetectionSettings::default())
				.unwrap();

		assert!(config.triggers().is_empty());
		assert!(logs_contain("VCS change detection is disabled"));
	}

	#[test]
	fn empty_trigger_set_fails_when_required() {
		let result = DetectionConfig::assemble(
			[Contribution::new("silent").factory(StagedItemFactory)],
			DetectionSettings::default().with_required_triggers(true),
		);

		assert!(matches!(result, Err(ConfigError::EmptyTriggerSet)));
	}

	#[test]
	fn fallback_contribution_is_rejected() {
		let result = DetectionConfig::assemble(
			[Contribution::new("rogue")
				.trigger(NOTE_SAVED)
				.factory(BaseVcsItemFactory)],
			DetectionSettings::default(),
		);

		assert!(matches!(
			result,
			Err(ConfigError::Registry(RegistryError::FallbackRegistered(0)))
		));
	}

	#[test]
	fn max_delay_must_cover_quiet_period() {
		let result = DetectionConfig::assemble(
			[Contribution::new("notes").trigger(NOTE_SAVED)],
			DetectionSettings::default()
				.with_quiet_period(Duration::from_millis(200))
				.with_max_delay(Duration::from_millis(100)),
		);

		assert!(matches!(
			result,
			Err(ConfigError::MaxDelayBelowQuietPeriod {
				quiet_period_ms: 200,
				max_delay_ms: 100,
			})
		));
	}

	#[test]
	fn settings_deserialize_with_defaults() {
		let settings =
			serde_json::from_str::<DetectionSettings>(r#"{ "quiet_period_ms": 20 }"#).unwrap();

		assert_eq!(settings.quiet_period(), Duration::from_millis(20));
		assert_eq!(settings.max_delay(), Duration::from_secs(1));
		assert_eq!(settings.scan_timeout(), Some(Duration::from_secs(30)));
	}
}
