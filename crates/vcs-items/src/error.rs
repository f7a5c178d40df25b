use thiserror::Error;

use super::entry::StatusCode;

/// A factory failed to create an item for an entry it claimed.
#[derive(Debug, Error)]
pub enum FactoryError {
	#[error("entry is missing required field: {0}")]
	MissingField(&'static str),
	#[error("entry status <found='{found}'> does not match factory <expected='{expected}'>")]
	StatusMismatch {
		expected: StatusCode,
		found: StatusCode,
	},
	#[error(transparent)]
	Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug, Error)]
pub enum RegistryError {
	#[error("the fallback factory is appended automatically <position={0}>")]
	FallbackRegistered(usize),
}

#[derive(Debug, Error)]
pub enum Error {
	#[error("factory <name='{factory}'> failed to create claimed entry <path='{path}'>: {source}")]
	FactoryContract {
		factory: String,
		path: String,
		#[source]
		source: FactoryError,
	},
}
