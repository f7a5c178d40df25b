use std::{fmt, path::Path};

use async_trait::async_trait;
use nv_vcs_items::ScanResult;

use super::error::ScanError;

pub mod git;

/// The external VCS backend that inspects a workspace and reports its changes.
///
/// A scan may take arbitrary time and may fail. The change detection effect guarantees it never
/// calls `scan` concurrently, implementations don't need their own locking for that.
#[async_trait]
pub trait VcsScanner: Send + Sync + fmt::Debug + 'static {
	async fn scan(&self, root: &Path) -> Result<ScanResult, ScanError>;
}
