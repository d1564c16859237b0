use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;
use vista_protocol::{Checkpoint, CheckpointReport, CheckpointStatus, SessionReport, Viewport};

use crate::backend::{BackendError, SessionHandle};
use crate::collector::{PendingSession, ResultCollector};
use crate::error::Result;

struct Capture {
	meta: Checkpoint,
	task: JoinHandle<std::result::Result<(), BackendError>>,
}

/// Per-test capture queue bound to one open backend session.
///
/// `check` is fire-and-forget: each capture runs on its own task, gated by
/// the collector's comparison-concurrency semaphore, so callers never wait
/// on the backend and excess submissions queue instead of dropping.
pub struct CheckpointSession {
	collector: Arc<ResultCollector>,
	handle: SessionHandle,
	viewport: Option<Viewport>,
	captures: Mutex<Vec<Capture>>,
}

impl CheckpointSession {
	pub(crate) fn new(collector: Arc<ResultCollector>, handle: SessionHandle, viewport: Option<Viewport>) -> Self {
		Self {
			collector,
			handle,
			viewport,
			captures: Mutex::new(Vec::new()),
		}
	}

	/// Backend handle for this session.
	pub fn handle(&self) -> &SessionHandle {
		&self.handle
	}

	/// Number of checkpoints submitted so far.
	pub fn submitted(&self) -> usize {
		self.captures.lock().len()
	}

	/// Enqueues one checkpoint capture.
	///
	/// Returns immediately; capture errors are recorded per checkpoint and
	/// surface as `Error` entries in the final summary rather than failing
	/// the session.
	pub fn check(&self, checkpoint: Checkpoint) {
		let backend = self.collector.backend();
		let gate = self.collector.gate();
		let handle = self.handle.clone();
		let meta = checkpoint.clone();

		debug!(
			target = "vista.runner",
			session = %handle.id,
			checkpoint = %checkpoint.name,
			"submitting checkpoint"
		);

		let task = tokio::spawn(async move {
			let _permit = gate
				.acquire_owned()
				.await
				.map_err(|_| BackendError::new("comparison gate closed"))?;
			backend.capture(&handle, checkpoint).await
		});

		self.captures.lock().push(Capture { meta, task });
	}

	/// Closes the session: drains the capture queue, then parks the backend
	/// close future with the collector.
	///
	/// This does not wait for comparisons; only the collector's barrier does.
	pub fn close(self) -> Result<()> {
		let CheckpointSession {
			collector,
			handle,
			viewport,
			captures,
		} = self;
		let captures = captures.into_inner();
		let checkpoints: Vec<Checkpoint> = captures.iter().map(|c| c.meta.clone()).collect();
		let backend = collector.backend();
		let app_name = handle.app_name.clone();
		let test_name = handle.test_name.clone();
		let report_app_name = app_name.clone();
		let report_test_name = test_name.clone();

		debug!(
			target = "vista.runner",
			session = %handle.id,
			submitted = captures.len(),
			"closing checkpoint session"
		);

		let result_task = tokio::spawn(async move {
			let mut report = SessionReport {
				app_name: report_app_name,
				test_name: report_test_name,
				viewport,
				checkpoints: Vec::new(),
				error: None,
			};

			// Flush the capture queue before asking the backend to close.
			let mut failed = Vec::new();
			for capture in captures {
				let status = match capture.task.await {
					Ok(Ok(())) => continue,
					Ok(Err(err)) => CheckpointStatus::Error {
						message: err.to_string(),
					},
					Err(join_err) => CheckpointStatus::Error {
						message: format!("capture task failed: {join_err}"),
					},
				};
				failed.push(CheckpointReport {
					name: capture.meta.name,
					status,
					match_level: capture.meta.match_level,
					scope: capture.meta.scope,
				});
			}

			match backend.close_session(handle).await {
				Ok(mut reports) => report.checkpoints.append(&mut reports),
				Err(err) => report.error = Some(err.to_string()),
			}
			report.checkpoints.extend(failed);
			report
		});

		collector.register(PendingSession {
			app_name,
			test_name,
			viewport,
			checkpoints,
			handle: result_task,
		})
	}
}
