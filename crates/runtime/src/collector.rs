use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use vista_protocol::{Checkpoint, CheckpointReport, CheckpointStatus, SessionReport, Viewport};

use crate::backend::{CheckpointBackend, OpenRequest};
use crate::error::{Result, RuntimeError};
use crate::session::CheckpointSession;

/// One closed session whose verdicts are still pending server-side.
pub(crate) struct PendingSession {
	pub app_name: String,
	pub test_name: String,
	pub viewport: Option<Viewport>,
	/// Checkpoints submitted before close, used for timeout placeholders.
	pub checkpoints: Vec<Checkpoint>,
	pub handle: JoinHandle<SessionReport>,
}

/// Shared runner: accumulates one pending result per closed session and
/// exposes the blocking `collect_all` barrier.
///
/// The semaphore is the suite's only backpressure control; it bounds how
/// many comparison jobs are in flight across every session at once.
pub struct ResultCollector {
	backend: Arc<dyn CheckpointBackend>,
	gate: Arc<Semaphore>,
	collect_timeout: Option<Duration>,
	/// `None` once collected; late registrations are rejected.
	pending: Mutex<Option<Vec<PendingSession>>>,
}

impl ResultCollector {
	pub fn new(backend: Arc<dyn CheckpointBackend>, concurrency: NonZeroUsize, collect_timeout: Option<Duration>) -> Self {
		Self {
			backend,
			gate: Arc::new(Semaphore::new(concurrency.get())),
			collect_timeout,
			pending: Mutex::new(Some(Vec::new())),
		}
	}

	pub(crate) fn backend(&self) -> Arc<dyn CheckpointBackend> {
		self.backend.clone()
	}

	pub(crate) fn gate(&self) -> Arc<Semaphore> {
		self.gate.clone()
	}

	/// Opens a checkpoint-recording session against the backend.
	pub async fn open_session(self: &Arc<Self>, request: OpenRequest) -> Result<CheckpointSession> {
		let viewport = request.viewport;
		debug!(
			target = "vista.runner",
			app = %request.app_name,
			test = %request.test_name,
			batch = %request.batch.name,
			"opening checkpoint session"
		);
		let handle = self.backend.open_session(request).await?;
		Ok(CheckpointSession::new(self.clone(), handle, viewport))
	}

	/// Parks one closed session's result future until the barrier.
	///
	/// Safe under concurrent registration from parallel test cases.
	pub(crate) fn register(&self, session: PendingSession) -> Result<()> {
		let mut guard = self.pending.lock();
		match guard.as_mut() {
			Some(pending) => {
				pending.push(session);
				Ok(())
			}
			None => Err(RuntimeError::AlreadyCollected),
		}
	}

	/// Number of sessions closed but not yet collected.
	pub fn pending_sessions(&self) -> usize {
		self.pending.lock().as_ref().map_or(0, Vec::len)
	}

	/// The aggregation barrier: waits for every parked session result.
	///
	/// Runs exactly once. With no collect timeout configured this waits
	/// indefinitely for the remote comparisons; with one, a session that
	/// outlives the bound yields `TimedOut` placeholders for its
	/// checkpoints instead of hanging the suite.
	pub async fn collect_all(&self) -> Result<Vec<SessionReport>> {
		let pending = self.pending.lock().take().ok_or(RuntimeError::AlreadyCollected)?;
		debug!(target = "vista.runner", sessions = pending.len(), "collecting all checkpoint results");

		let mut reports = Vec::with_capacity(pending.len());
		for session in pending {
			let PendingSession {
				app_name,
				test_name,
				viewport,
				checkpoints,
				mut handle,
			} = session;

			let joined = match self.collect_timeout {
				Some(limit) => match tokio::time::timeout(limit, &mut handle).await {
					Ok(joined) => joined,
					Err(_) => {
						handle.abort();
						warn!(
							target = "vista.runner",
							test = %test_name,
							timeout_ms = limit.as_millis() as u64,
							"gave up waiting for session results"
						);
						reports.push(timed_out_report(app_name, test_name, viewport, checkpoints, limit));
						continue;
					}
				},
				None => handle.await,
			};

			reports.push(match joined {
				Ok(report) => report,
				Err(join_err) => SessionReport {
					app_name,
					test_name,
					viewport,
					checkpoints: Vec::new(),
					error: Some(format!("result task failed: {join_err}")),
				},
			});
		}
		Ok(reports)
	}
}

fn timed_out_report(
	app_name: String,
	test_name: String,
	viewport: Option<Viewport>,
	checkpoints: Vec<Checkpoint>,
	limit: Duration,
) -> SessionReport {
	SessionReport {
		app_name,
		test_name,
		viewport,
		checkpoints: checkpoints
			.into_iter()
			.map(|c| CheckpointReport {
				name: c.name,
				status: CheckpointStatus::TimedOut,
				match_level: c.match_level,
				scope: c.scope,
			})
			.collect(),
		error: Some(format!("timed out after {}ms waiting for comparisons", limit.as_millis())),
	}
}
