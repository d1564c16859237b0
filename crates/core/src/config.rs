use std::num::NonZeroUsize;
use std::time::Duration;

use vista_protocol::{BatchInfo, BrowserFamily, DeviceName, RenderTarget, ScreenOrientation};

use crate::error::{Error, Result};

/// Credential for the remote checkpoint service. Optional at the fixture
/// level; the backend may resolve one from its own environment.
pub const API_KEY_VAR: &str = "VISTA_API_KEY";
/// `"true"` (any case) launches browsers headless; anything else is headed.
pub const HEADLESS_VAR: &str = "HEADLESS";
/// Upper bound on comparison jobs in flight at once. Must parse as a
/// positive integer when set.
pub const CONCURRENCY_VAR: &str = "VISTA_CONCURRENCY";
/// Remote execution endpoint for browser launches. Local launch when unset.
pub const EXECUTION_ENDPOINT_VAR: &str = "VISTA_EXECUTION_ENDPOINT";

pub const DEFAULT_CONCURRENCY: NonZeroUsize = NonZeroUsize::new(5).unwrap();
const DEFAULT_IMPLICIT_WAIT: Duration = Duration::from_secs(10);

/// Which execution coordinator the fixture builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunnerMode {
	/// Concurrency-bounded runner rendering every checkpoint across the
	/// configured browser/device matrix.
	#[default]
	Grid,
	/// Single-render runner: one comparison at a time, no matrix.
	Classic,
}

impl RunnerMode {
	pub fn label(&self) -> &'static str {
		match self {
			RunnerMode::Grid => "grid runner",
			RunnerMode::Classic => "classic runner",
		}
	}
}

impl std::fmt::Display for RunnerMode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.label())
	}
}

/// Where browsers run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExecutionMode {
	/// Local browser process.
	#[default]
	Local,
	/// Remote execution endpoint.
	Remote(String),
}

/// Whether visual verdicts fail the suite or only the summary.
///
/// This makes an explicit choice out of what the classic SDKs leave implicit
/// in which close call a suite happens to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
	/// Diffs and errors appear in the teardown summary only.
	#[default]
	SummaryOnly,
	/// Teardown returns an error when the summary contains diffs or errors.
	FailTeardown,
}

/// Immutable per-suite configuration, read once at fixture construction.
#[derive(Debug, Clone)]
pub struct RunConfig {
	/// Application under test. Constant across every test of the suite;
	/// backend trend features key on it.
	pub app_name: String,
	/// Credential forwarded to the backend; `None` lets the backend resolve
	/// its own.
	pub api_key: Option<String>,
	/// Whether browsers launch headless.
	pub headless: bool,
	/// Upper bound on comparison jobs in flight (grid mode).
	pub concurrency: NonZeroUsize,
	/// Execution coordinator selection.
	pub runner_mode: RunnerMode,
	/// Local vs remote browser execution.
	pub execution: ExecutionMode,
	/// Implicit wait bound applied to element lookups.
	pub implicit_wait: Duration,
	/// Optional bound on how long teardown waits per session result.
	pub collect_timeout: Option<Duration>,
	/// Whether diffs fail teardown or only the summary.
	pub failure_policy: FailurePolicy,
	/// Explicit batch name; derived from app name and runner mode when unset.
	pub batch_name: Option<String>,
	/// Cross-browser render matrix (grid mode only).
	pub render_targets: Vec<RenderTarget>,
	/// Auto-accept baselines for never-seen test names.
	pub save_new_tests: bool,
}

impl RunConfig {
	/// Baseline configuration with defaults for the given runner mode.
	pub fn new(app_name: impl Into<String>, runner_mode: RunnerMode) -> Self {
		let render_targets = match runner_mode {
			RunnerMode::Grid => default_render_targets(),
			RunnerMode::Classic => Vec::new(),
		};
		Self {
			app_name: app_name.into(),
			api_key: None,
			headless: true,
			concurrency: DEFAULT_CONCURRENCY,
			runner_mode,
			execution: ExecutionMode::Local,
			implicit_wait: DEFAULT_IMPLICIT_WAIT,
			collect_timeout: None,
			failure_policy: FailurePolicy::default(),
			batch_name: None,
			render_targets,
			save_new_tests: true,
		}
	}

	/// Reads suite configuration from the environment.
	///
	/// A missing credential is tolerated; a malformed concurrency value is
	/// fatal so the suite aborts before any session opens.
	pub fn from_env(app_name: impl Into<String>) -> Result<Self> {
		let mut config = Self::new(app_name, RunnerMode::default());

		config.api_key = read_var(API_KEY_VAR);
		config.headless = read_var(HEADLESS_VAR).is_some_and(|v| v.eq_ignore_ascii_case("true"));
		if let Some(raw) = read_var(CONCURRENCY_VAR) {
			config.concurrency = raw
				.parse::<NonZeroUsize>()
				.map_err(|_| Error::Config(format!("malformed {CONCURRENCY_VAR} value: {raw:?}")))?;
		}
		if let Some(endpoint) = read_var(EXECUTION_ENDPOINT_VAR) {
			config.execution = ExecutionMode::Remote(endpoint);
		}

		Ok(config)
	}

	/// Switches runner mode, resetting the matrix to match.
	pub fn with_runner_mode(mut self, runner_mode: RunnerMode) -> Self {
		self.render_targets = match runner_mode {
			RunnerMode::Grid => default_render_targets(),
			RunnerMode::Classic => Vec::new(),
		};
		self.runner_mode = runner_mode;
		self
	}

	/// Sets an explicit render matrix.
	pub fn with_render_targets(mut self, targets: Vec<RenderTarget>) -> Self {
		self.render_targets = targets;
		self
	}

	/// Sets an explicit batch name.
	pub fn with_batch_name(mut self, name: impl Into<String>) -> Self {
		self.batch_name = Some(name.into());
		self
	}

	/// Sets the teardown failure policy.
	pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
		self.failure_policy = policy;
		self
	}

	/// Bounds how long teardown waits per session result.
	pub fn with_collect_timeout(mut self, timeout: Duration) -> Self {
		self.collect_timeout = Some(timeout);
		self
	}

	/// Sets the comparison concurrency bound.
	pub fn with_concurrency(mut self, concurrency: NonZeroUsize) -> Self {
		self.concurrency = concurrency;
		self
	}

	/// Comparison bound actually applied: classic mode runs one at a time.
	pub fn effective_concurrency(&self) -> NonZeroUsize {
		match self.runner_mode {
			RunnerMode::Grid => self.concurrency,
			RunnerMode::Classic => NonZeroUsize::MIN,
		}
	}

	/// Batch for this run, tagged with a human-readable label.
	pub fn batch(&self) -> BatchInfo {
		match &self.batch_name {
			Some(name) => BatchInfo::new(name.clone()),
			None => BatchInfo::new(format!("{} [{}]", self.app_name, self.runner_mode.label())),
		}
	}
}

/// Default grid matrix: three desktop browsers and two emulated devices.
pub fn default_render_targets() -> Vec<RenderTarget> {
	vec![
		RenderTarget::desktop(800, 600, BrowserFamily::Chromium),
		RenderTarget::desktop(1600, 1200, BrowserFamily::Firefox),
		RenderTarget::desktop(1024, 768, BrowserFamily::Webkit),
		RenderTarget::device(DeviceName::Pixel2, ScreenOrientation::Portrait),
		RenderTarget::device(DeviceName::Nexus10, ScreenOrientation::Landscape),
	]
}

fn read_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
	use std::sync::{Mutex, MutexGuard};

	use super::*;

	// Env mutations are process-wide; serialize the tests that touch them.
	static ENV_LOCK: Mutex<()> = Mutex::new(());

	fn lock_env() -> MutexGuard<'static, ()> {
		ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
	}

	fn clear_suite_vars() {
		for var in [API_KEY_VAR, HEADLESS_VAR, CONCURRENCY_VAR, EXECUTION_ENDPOINT_VAR] {
			unsafe { std::env::remove_var(var) };
		}
	}

	#[test]
	fn from_env_defaults_tolerate_missing_credential() {
		let _guard = lock_env();
		clear_suite_vars();

		let config = RunConfig::from_env("demo app").unwrap();
		assert_eq!(config.api_key, None);
		assert!(!config.headless);
		assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
		assert_eq!(config.execution, ExecutionMode::Local);
		assert_eq!(config.render_targets.len(), 5);
	}

	#[test]
	fn from_env_reads_credential_headless_and_endpoint() {
		let _guard = lock_env();
		clear_suite_vars();
		unsafe {
			std::env::set_var(API_KEY_VAR, "secret");
			std::env::set_var(HEADLESS_VAR, "TRUE");
			std::env::set_var(EXECUTION_ENDPOINT_VAR, "https://grid.example.com");
		}

		let config = RunConfig::from_env("demo app").unwrap();
		assert_eq!(config.api_key.as_deref(), Some("secret"));
		assert!(config.headless);
		assert_eq!(config.execution, ExecutionMode::Remote("https://grid.example.com".into()));

		clear_suite_vars();
	}

	#[test]
	fn malformed_concurrency_is_fatal() {
		let _guard = lock_env();
		clear_suite_vars();
		unsafe { std::env::set_var(CONCURRENCY_VAR, "lots") };

		let err = RunConfig::from_env("demo app").unwrap_err();
		assert!(matches!(err, Error::Config(_)));
		assert!(err.to_string().contains(CONCURRENCY_VAR));

		unsafe { std::env::set_var(CONCURRENCY_VAR, "0") };
		assert!(RunConfig::from_env("demo app").is_err());

		clear_suite_vars();
	}

	#[test]
	fn classic_mode_has_no_matrix_and_single_concurrency() {
		let config = RunConfig::new("demo app", RunnerMode::Classic);
		assert!(config.render_targets.is_empty());
		assert_eq!(config.effective_concurrency().get(), 1);

		let grid = config.with_runner_mode(RunnerMode::Grid);
		assert_eq!(grid.render_targets.len(), 5);
		assert_eq!(grid.effective_concurrency(), DEFAULT_CONCURRENCY);
	}

	#[test]
	fn batch_label_names_the_runner_mode() {
		let config = RunConfig::new("demo app", RunnerMode::Grid);
		assert_eq!(config.batch().name, "demo app [grid runner]");

		let named = config.with_batch_name("nightly");
		assert_eq!(named.batch().name, "nightly");
	}
}
