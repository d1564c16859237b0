use serde::{Deserialize, Serialize};

/// Comparison strictness applied to one checkpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchLevel {
	/// Content and structure must match; anti-aliasing noise is ignored.
	#[default]
	Strict,
	/// Structure must match; text and content drift is tolerated.
	Layout,
	/// Exact pixel equality.
	Exact,
}

impl std::fmt::Display for MatchLevel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			MatchLevel::Strict => write!(f, "strict"),
			MatchLevel::Layout => write!(f, "layout"),
			MatchLevel::Exact => write!(f, "exact"),
		}
	}
}

/// Capture area for one checkpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckpointScope {
	/// Only the visible viewport.
	#[default]
	Viewport,
	/// The full scrollable page.
	FullPage,
}

/// One named visual checkpoint request.
///
/// Built fluently the way a test body reads:
///
/// `Checkpoint::window("Login page").fully().layout()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
	pub name: String,
	pub scope: CheckpointScope,
	pub match_level: MatchLevel,
}

impl Checkpoint {
	/// Viewport-scoped checkpoint with strict matching.
	pub fn window(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			scope: CheckpointScope::Viewport,
			match_level: MatchLevel::Strict,
		}
	}

	/// Captures the full scrollable page instead of the viewport.
	pub fn fully(mut self) -> Self {
		self.scope = CheckpointScope::FullPage;
		self
	}

	/// Tolerates content drift, flagging structural changes only.
	pub fn layout(mut self) -> Self {
		self.match_level = MatchLevel::Layout;
		self
	}

	/// Requires exact pixel equality.
	pub fn exact(mut self) -> Self {
		self.match_level = MatchLevel::Exact;
		self
	}

	/// Sets an explicit match level.
	pub fn match_level(mut self, level: MatchLevel) -> Self {
		self.match_level = level;
		self
	}
}
