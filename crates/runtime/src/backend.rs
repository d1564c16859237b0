use async_trait::async_trait;
use thiserror::Error;
use vista_protocol::{BatchInfo, Checkpoint, CheckpointReport, RenderTarget, Viewport};

/// Failure reported by the checkpoint backend.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct BackendError {
	message: String,
}

impl BackendError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

/// Everything the backend needs to open one checkpoint-recording session.
#[derive(Debug, Clone)]
pub struct OpenRequest {
	/// Credential for the remote service. When `None` the backend is expected
	/// to resolve one from its own environment.
	pub api_key: Option<String>,
	/// Constant across every test of the same application; backend trend
	/// features key on it.
	pub app_name: String,
	/// Varies per test case.
	pub test_name: String,
	/// Local browser viewport the captures were taken at.
	pub viewport: Option<Viewport>,
	/// Batch grouping this run's checkpoints.
	pub batch: BatchInfo,
	/// Cross-browser render matrix; empty for single-render runs.
	pub render_targets: Vec<RenderTarget>,
	/// Auto-accept baselines for test names the backend has never seen.
	pub save_new_tests: bool,
}

/// Opaque handle to one open backend session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
	/// Backend-assigned session id.
	pub id: String,
	pub app_name: String,
	pub test_name: String,
}

/// The remote visual-diffing service boundary.
///
/// The harness never sees pixels or diff output; it only promises call
/// ordering: open before capture, capture before close, close before the
/// collector observes the session's reports.
#[async_trait]
pub trait CheckpointBackend: Send + Sync + 'static {
	/// Opens a checkpoint-recording session.
	async fn open_session(&self, request: OpenRequest) -> std::result::Result<SessionHandle, BackendError>;

	/// Captures the current page state and enqueues one comparison job.
	/// Returns once the job is enqueued, not once it is compared.
	async fn capture(&self, session: &SessionHandle, checkpoint: Checkpoint) -> std::result::Result<(), BackendError>;

	/// Closes the session. Resolves only when every comparison enqueued for
	/// this session has settled server-side; the collector parks this future
	/// until the aggregation barrier.
	async fn close_session(&self, session: SessionHandle) -> std::result::Result<Vec<CheckpointReport>, BackendError>;
}
