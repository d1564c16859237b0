use thiserror::Error;

pub use crate::backend::BackendError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
	/// `collect_all` runs exactly once; later calls and late session
	/// registrations land here.
	#[error("checkpoint results were already collected")]
	AlreadyCollected,

	#[error(transparent)]
	Backend(#[from] BackendError),
}
