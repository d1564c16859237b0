use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error};
use vista_protocol::{Checkpoint, Viewport};
use vista_runtime::CheckpointSession;

use crate::driver::{BrowserDriver, Locator};
use crate::error::{Error, Result};

/// Options for opening one per-test session. The application name is fixed
/// by the fixture; only per-test identity lives here.
#[derive(Debug, Clone)]
pub struct SessionOptions {
	/// Identifier of the running test case. Injected explicitly by the test
	/// (or the fixture helper); must vary per test.
	pub test_name: String,
	/// Viewport the local browser is resized to before capturing. Optional
	/// but encouraged: without it layouts vary across environments.
	pub viewport: Option<Viewport>,
}

impl SessionOptions {
	pub fn new(test_name: impl Into<String>) -> Self {
		Self {
			test_name: test_name.into(),
			viewport: None,
		}
	}

	pub fn with_viewport(mut self, viewport: Viewport) -> Self {
		self.viewport = Some(viewport);
		self
	}
}

/// Lifecycle position of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
	Created,
	Opened,
	Active,
	Closed,
}

impl std::fmt::Display for SessionState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SessionState::Created => write!(f, "created"),
			SessionState::Opened => write!(f, "opened"),
			SessionState::Active => write!(f, "active"),
			SessionState::Closed => write!(f, "closed"),
		}
	}
}

struct SessionInner {
	driver: Arc<dyn BrowserDriver>,
	checkpoints: Mutex<Option<CheckpointSession>>,
	state: Mutex<SessionState>,
	test_name: String,
}

/// One test case's browser plus checkpoint-recording session.
///
/// Transitions `Created -> Opened -> Active -> Closed`; `check` is valid in
/// `Opened`/`Active` (the first call activates), `close` from
/// `Opened`/`Active`, and nothing is valid after `Closed`. Out-of-order
/// operations, double close included, are rejected with
/// [`Error::InvalidState`].
///
/// Clones share the same underlying session; [`Fixture::run_test`] relies on
/// this to keep a handle for guaranteed close while the body owns another.
///
/// [`Fixture::run_test`]: crate::Fixture::run_test
#[derive(Clone)]
pub struct Session {
	inner: Arc<SessionInner>,
}

impl std::fmt::Debug for Session {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Session")
			.field("test_name", &self.inner.test_name)
			.field("state", &*self.inner.state.lock())
			.finish_non_exhaustive()
	}
}

impl Session {
	pub(crate) fn new(driver: Arc<dyn BrowserDriver>, checkpoints: CheckpointSession, test_name: String) -> Self {
		Self {
			inner: Arc::new(SessionInner {
				driver,
				checkpoints: Mutex::new(Some(checkpoints)),
				state: Mutex::new(SessionState::Opened),
				test_name,
			}),
		}
	}

	pub fn state(&self) -> SessionState {
		*self.inner.state.lock()
	}

	pub fn test_name(&self) -> &str {
		&self.inner.test_name
	}

	/// Navigates the browser to a URL.
	pub async fn goto(&self, url: &str) -> Result<()> {
		self.ensure_open("navigate")?;
		self.inner.driver.goto(url).await
	}

	/// Types into the element matched by `locator`.
	pub async fn type_text(&self, locator: &Locator, text: &str) -> Result<()> {
		self.ensure_open("type")?;
		self.inner.driver.type_text(locator, text).await
	}

	/// Clicks the element matched by `locator`.
	pub async fn click(&self, locator: &Locator) -> Result<()> {
		self.ensure_open("click")?;
		self.inner.driver.click(locator).await
	}

	/// Submits one named visual checkpoint.
	///
	/// Fire-and-forget: the comparison job is enqueued against the batch and
	/// the call returns without waiting on the verdict.
	pub fn check(&self, checkpoint: Checkpoint) -> Result<()> {
		{
			let mut state = self.inner.state.lock();
			match *state {
				SessionState::Opened => *state = SessionState::Active,
				SessionState::Active => {}
				other => {
					return Err(Error::InvalidState {
						operation: "checkpoint",
						state: other,
					});
				}
			}
		}

		let guard = self.inner.checkpoints.lock();
		let Some(checkpoints) = guard.as_ref() else {
			return Err(Error::InvalidState {
				operation: "checkpoint",
				state: SessionState::Closed,
			});
		};
		checkpoints.check(checkpoint);
		Ok(())
	}

	/// Closes the checkpoint session (registering its future result with the
	/// shared collector) and quits the browser.
	///
	/// Does not wait for comparisons; only the fixture's teardown barrier
	/// does. Exactly one close per session: later calls are rejected.
	pub async fn close(&self) -> Result<()> {
		{
			let mut state = self.inner.state.lock();
			match *state {
				SessionState::Opened | SessionState::Active => *state = SessionState::Closed,
				other => {
					return Err(Error::InvalidState {
						operation: "close",
						state: other,
					});
				}
			}
		}

		debug!(target = "vista.session", test = %self.inner.test_name, "closing session");

		let checkpoints = self.inner.checkpoints.lock().take();
		let register_result = match checkpoints {
			Some(checkpoints) => checkpoints.close().map_err(Error::from),
			None => Ok(()),
		};

		// Quit the browser even when result registration failed.
		let quit_result = self.inner.driver.quit().await;
		register_result?;
		quit_result
	}

	fn ensure_open(&self, operation: &'static str) -> Result<()> {
		match self.state() {
			SessionState::Opened | SessionState::Active => Ok(()),
			other => Err(Error::InvalidState {
				operation,
				state: other,
			}),
		}
	}
}

impl Drop for SessionInner {
	fn drop(&mut self) {
		let state = *self.state.lock();
		if state != SessionState::Closed {
			error!(
				target = "vista.session",
				test = %self.test_name,
				%state,
				"session dropped without close; quitting browser best-effort"
			);
			if let Ok(handle) = tokio::runtime::Handle::try_current() {
				let driver = self.driver.clone();
				handle.spawn(async move {
					let _ = driver.quit().await;
				});
			}
		}
	}
}
