use super::{entry::ScanResult, error::Error, item::VcsViewItem, registry::FactoryRegistry};

/// Classify every entry of a scan, in scan order.
///
/// No reordering, deduplication or filtering happens here. Each call returns a fresh list.
pub fn materialize(
	scan: &ScanResult,
	registry: &FactoryRegistry,
) -> Result<Vec<VcsViewItem>, Error> {
	scan.iter().map(|entry| registry.classify(entry)).collect()
}
