use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies the group of checkpoints belonging to one suite run.
///
/// Batches are how the backend groups a run's results for reporting, so the
/// name should be meaningful to a human reading the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchInfo {
	pub id: String,
	pub name: String,
}

impl BatchInfo {
	/// Creates a batch with a fresh id.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			id: Uuid::new_v4().to_string(),
			name: name.into(),
		}
	}

	/// Creates a batch with a caller-supplied id, e.g. from a CI run number.
	pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
		}
	}
}

impl std::fmt::Display for BatchInfo {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.name)
	}
}
