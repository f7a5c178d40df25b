use std::sync::Arc;

use tracing::trace;

use super::{
	entry::{RawChangeEntry, ScanResult},
	error::{Error, RegistryError},
	factory::{BaseVcsItemFactory, VcsItemFactory},
	item::VcsViewItem,
	materialize::materialize,
};

/// Ordered set of item factories, with [`BaseVcsItemFactory`] always evaluated last.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct FactoryRegistry {
	factories: Vec<Arc<dyn VcsItemFactory>>,
	fallback: BaseVcsItemFactory,
}

impl FactoryRegistry {
	#[must_use]
	pub fn builder() -> FactoryRegistryBuilder {
		FactoryRegistryBuilder::default()
	}

	/// A registry with only the fallback, every entry becomes an unknown item
	#[must_use]
	pub const fn fallback_only() -> Self {
		Self {
			factories: Vec::new(),
			fallback: BaseVcsItemFactory,
		}
	}

	/// Classify one entry with the first factory that claims it.
	///
	/// Never fails for lack of a factory, as the fallback claims everything. A claimed entry that
	/// its factory then fails to create is reported, never handed to the next factory.
	pub fn classify(&self, entry: &RawChangeEntry) -> Result<VcsViewItem, Error> {
		let factory: &dyn VcsItemFactory = match self
			.factories
			.iter()
			.find(|factory| factory.can_handle(entry))
		{
			Some(factory) => &**factory,
			None => &self.fallback,
		};

		trace!(factory = factory.name(), path = %entry.path, "Entry claimed;");

		factory
			.create(entry)
			.map_err(|source| Error::FactoryContract {
				factory: factory.name().to_string(),
				path: entry.path.clone(),
				source,
			})
	}

	pub fn materialize(&self, scan: &ScanResult) -> Result<Vec<VcsViewItem>, Error> {
		materialize(scan, self)
	}

	/// Factory names in evaluation order, the fallback included
	pub fn factory_names(&self) -> impl Iterator<Item = &str> + '_ {
		self.factories
			.iter()
			.map(|factory| factory.name())
			.chain([self.fallback.name()])
	}

	/// Number of registered factories, not counting the fallback
	#[must_use]
	pub fn len(&self) -> usize {
		self.factories.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.factories.is_empty()
	}
}

impl Default for FactoryRegistry {
	fn default() -> Self {
		Self::fallback_only()
	}
}

#[derive(Debug, Default)]
pub struct FactoryRegistryBuilder {
	factories: Vec<Arc<dyn VcsItemFactory>>,
}

impl FactoryRegistryBuilder {
	#[must_use]
	pub fn register(mut self, factory: impl VcsItemFactory + 'static) -> Self {
		self.factories.push(Arc::new(factory));
		self
	}

	#[must_use]
	pub fn register_shared(mut self, factory: Arc<dyn VcsItemFactory>) -> Self {
		self.factories.push(factory);
		self
	}

	#[must_use]
	pub fn extend(mut self, factories: impl IntoIterator<Item = Arc<dyn VcsItemFactory>>) -> Self {
		self.factories.extend(factories);
		self
	}

	pub fn build(self) -> Result<FactoryRegistry, RegistryError> {
		if let Some(position) = self
			.factories
			.iter()
			.position(|factory| factory.is_fallback())
		{
			return Err(RegistryError::FallbackRegistered(position));
		}

		Ok(FactoryRegistry {
			factories: self.factories,
			fallback: BaseVcsItemFactory,
		})
	}
}
