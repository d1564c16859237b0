use thiserror::Error;

use crate::session::SessionState;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// Structurally invalid suite configuration. Fatal at fixture
	/// construction, before any session opens.
	#[error("configuration error: {0}")]
	Config(String),

	#[error("browser launch failed: {0}")]
	BrowserLaunch(String),

	#[error("navigation failed: {url}")]
	Navigation {
		url: String,
		#[source]
		source: anyhow::Error,
	},

	/// Element lookup exhausted the implicit wait window. Fails the test
	/// body, never the harness.
	#[error("element not found: {selector}")]
	ElementNotFound { selector: String },

	/// Operation issued outside the session's `Created -> Opened -> Active
	/// -> Closed` contract (double close included).
	#[error("invalid session state: cannot {operation} while {state}")]
	InvalidState {
		operation: &'static str,
		state: SessionState,
	},

	/// Teardown verdict under [`FailurePolicy::FailTeardown`].
	///
	/// [`FailurePolicy::FailTeardown`]: crate::FailurePolicy::FailTeardown
	#[error("visual differences detected: {diffs} diff(s), {errors} error(s)")]
	VisualDifferences { diffs: usize, errors: usize },

	#[error(transparent)]
	Runtime(vista_runtime::RuntimeError),

	#[error(transparent)]
	Backend(#[from] vista_runtime::BackendError),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

impl From<vista_runtime::RuntimeError> for Error {
	fn from(err: vista_runtime::RuntimeError) -> Self {
		// Backend failures keep their own variant so callers can tell a
		// remote-service fault from harness misuse.
		match err {
			vista_runtime::RuntimeError::Backend(backend) => Error::Backend(backend),
			other => Error::Runtime(other),
		}
	}
}
