use serde::{Deserialize, Serialize};

use crate::batch::BatchInfo;
use crate::checkpoint::{CheckpointScope, MatchLevel};
use crate::viewport::Viewport;

/// Resolved status of one checkpoint comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckpointStatus {
	/// Matched the stored baseline.
	Passed,
	/// A visual difference was detected.
	Diff,
	/// Comparison finished but a human has not accepted or rejected it.
	Unresolved,
	/// The checkpoint never reached the backend or the backend failed it.
	Error { message: String },
	/// The aggregation barrier gave up waiting for this comparison.
	TimedOut,
}

impl CheckpointStatus {
	pub fn is_passed(&self) -> bool {
		matches!(self, CheckpointStatus::Passed)
	}

	pub fn is_diff(&self) -> bool {
		matches!(self, CheckpointStatus::Diff)
	}

	pub fn is_error(&self) -> bool {
		matches!(self, CheckpointStatus::Error { .. } | CheckpointStatus::TimedOut)
	}
}

impl std::fmt::Display for CheckpointStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			CheckpointStatus::Passed => write!(f, "passed"),
			CheckpointStatus::Diff => write!(f, "diff"),
			CheckpointStatus::Unresolved => write!(f, "unresolved"),
			CheckpointStatus::Error { message } => write!(f, "error: {message}"),
			CheckpointStatus::TimedOut => write!(f, "timed out"),
		}
	}
}

/// Final report for one checkpoint of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointReport {
	pub name: String,
	pub status: CheckpointStatus,
	pub match_level: MatchLevel,
	pub scope: CheckpointScope,
}

/// Final report for one closed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
	pub app_name: String,
	pub test_name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub viewport: Option<Viewport>,
	pub checkpoints: Vec<CheckpointReport>,
	/// Session-level failure (close error, result task panic, barrier timeout).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl SessionReport {
	pub fn passed(&self) -> bool {
		self.error.is_none() && self.checkpoints.iter().all(|c| c.status.is_passed())
	}
}

/// Everything the suite learned at the aggregation barrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
	pub batch: BatchInfo,
	pub sessions: Vec<SessionReport>,
}

impl RunSummary {
	pub fn total_checkpoints(&self) -> usize {
		self.sessions.iter().map(|s| s.checkpoints.len()).sum()
	}

	pub fn diff_count(&self) -> usize {
		self.sessions
			.iter()
			.flat_map(|s| &s.checkpoints)
			.filter(|c| c.status.is_diff())
			.count()
	}

	pub fn error_count(&self) -> usize {
		let checkpoint_errors = self
			.sessions
			.iter()
			.flat_map(|s| &s.checkpoints)
			.filter(|c| c.status.is_error())
			.count();
		let session_errors = self.sessions.iter().filter(|s| s.error.is_some()).count();
		checkpoint_errors + session_errors
	}

	pub fn passed(&self) -> bool {
		self.sessions.iter().all(SessionReport::passed)
	}
}

impl std::fmt::Display for RunSummary {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(
			f,
			"batch {:?} ({}): {} session(s), {} checkpoint(s), {} diff(s), {} error(s)",
			self.batch.name,
			self.batch.id,
			self.sessions.len(),
			self.total_checkpoints(),
			self.diff_count(),
			self.error_count()
		)?;
		for session in &self.sessions {
			match session.viewport {
				Some(viewport) => writeln!(f, "  {} ({})", session.test_name, viewport)?,
				None => writeln!(f, "  {}", session.test_name)?,
			}
			for checkpoint in &session.checkpoints {
				writeln!(
					f,
					"    {:?} [{}, {}]: {}",
					checkpoint.name,
					checkpoint.match_level,
					match checkpoint.scope {
						CheckpointScope::Viewport => "viewport",
						CheckpointScope::FullPage => "full page",
					},
					checkpoint.status
				)?;
			}
			if let Some(error) = &session.error {
				writeln!(f, "    session error: {error}")?;
			}
		}
		Ok(())
	}
}
