use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tracing::{debug, info};
use vista_protocol::{BatchInfo, RunSummary};
use vista_runtime::{CheckpointBackend, OpenRequest, ResultCollector};

use crate::config::{FailurePolicy, RunConfig};
use crate::driver::{BrowserDriver, BrowserLauncher, LaunchOptions};
use crate::error::{Error, Result};
use crate::session::{Session, SessionOptions};

/// Suite-scoped state shared by every test case: configuration, the batch
/// grouping this run's checkpoints, and the result collector.
///
/// Construct once per suite; call [`Fixture::teardown`] once after the last
/// test. Teardown is the only point where checkpoint verdicts surface.
pub struct Fixture {
	config: RunConfig,
	batch: BatchInfo,
	collector: Arc<ResultCollector>,
	launcher: Arc<dyn BrowserLauncher>,
}

impl Fixture {
	pub fn builder() -> FixtureBuilder {
		FixtureBuilder::default()
	}

	/// Environment-configured fixture. Fails fast on structurally invalid
	/// configuration; a missing credential is tolerated.
	pub fn from_env(
		app_name: impl Into<String>,
		backend: Arc<dyn CheckpointBackend>,
		launcher: Arc<dyn BrowserLauncher>,
	) -> Result<Self> {
		Self::builder()
			.config(RunConfig::from_env(app_name)?)
			.backend(backend)
			.launcher(launcher)
			.build()
	}

	pub fn config(&self) -> &RunConfig {
		&self.config
	}

	pub fn batch(&self) -> &BatchInfo {
		&self.batch
	}

	pub fn collector(&self) -> &Arc<ResultCollector> {
		&self.collector
	}

	/// Opens one per-test session: launches a browser, applies the implicit
	/// wait and requested viewport, then opens a checkpoint-recording
	/// session against the shared collector.
	///
	/// The browser is quit on every failure path past its launch; a session
	/// is either fully open or fully released.
	pub async fn open_session(&self, options: SessionOptions) -> Result<Session> {
		debug!(
			target = "vista.fixture",
			test = %options.test_name,
			viewport = ?options.viewport,
			"opening session"
		);

		let driver = self
			.launcher
			.launch(LaunchOptions {
				headless: self.config.headless,
				execution: self.config.execution.clone(),
			})
			.await?;
		let driver: Arc<dyn BrowserDriver> = Arc::from(driver);

		let test_name = options.test_name.clone();
		match self.bind_session(&driver, options).await {
			Ok(checkpoints) => Ok(Session::new(driver, checkpoints, test_name)),
			Err(err) => {
				let _ = driver.quit().await;
				Err(err)
			}
		}
	}

	async fn bind_session(
		&self,
		driver: &Arc<dyn BrowserDriver>,
		options: SessionOptions,
	) -> Result<vista_runtime::CheckpointSession> {
		driver.set_implicit_wait(self.config.implicit_wait).await?;
		if let Some(viewport) = options.viewport {
			driver.set_viewport(viewport).await?;
		}

		let request = OpenRequest {
			api_key: self.config.api_key.clone(),
			app_name: self.config.app_name.clone(),
			test_name: options.test_name,
			viewport: options.viewport,
			batch: self.batch.clone(),
			render_targets: self.config.render_targets.clone(),
			save_new_tests: self.config.save_new_tests,
		};
		Ok(self.collector.open_session(request).await?)
	}

	/// Scoped session acquisition: opens a session, runs the test body, and
	/// closes exactly once on every exit path — body error, panic, or
	/// success.
	///
	/// Panics are re-raised after cleanup so the host test framework still
	/// records the failure.
	pub async fn run_test<F, Fut>(&self, options: SessionOptions, body: F) -> Result<()>
	where
		F: FnOnce(Session) -> Fut,
		Fut: Future<Output = Result<()>>,
	{
		let session = self.open_session(options).await?;

		let outcome = AssertUnwindSafe(body(session.clone())).catch_unwind().await;
		let close_result = session.close().await;

		match outcome {
			Ok(body_result) => {
				body_result?;
				close_result
			}
			Err(panic) => {
				let _ = close_result;
				std::panic::resume_unwind(panic)
			}
		}
	}

	/// The suite's synchronization barrier: waits for every session's
	/// comparisons to resolve, renders the summary, and applies the
	/// configured failure policy.
	pub async fn teardown(self) -> Result<RunSummary> {
		info!(target = "vista.fixture", batch = %self.batch.name, "collecting checkpoint results");
		let sessions = self.collector.collect_all().await?;
		let summary = RunSummary {
			batch: self.batch,
			sessions,
		};
		info!(target = "vista.fixture", "suite results:\n{summary}");

		match self.config.failure_policy {
			FailurePolicy::SummaryOnly => Ok(summary),
			FailurePolicy::FailTeardown => {
				let diffs = summary.diff_count();
				let errors = summary.error_count();
				if diffs + errors > 0 {
					Err(Error::VisualDifferences { diffs, errors })
				} else {
					Ok(summary)
				}
			}
		}
	}
}

/// Builder for [`Fixture`] with explicit configuration and collaborator
/// injection.
#[derive(Default)]
pub struct FixtureBuilder {
	config: Option<RunConfig>,
	backend: Option<Arc<dyn CheckpointBackend>>,
	launcher: Option<Arc<dyn BrowserLauncher>>,
}

impl FixtureBuilder {
	pub fn config(mut self, config: RunConfig) -> Self {
		self.config = Some(config);
		self
	}

	pub fn backend(mut self, backend: Arc<dyn CheckpointBackend>) -> Self {
		self.backend = Some(backend);
		self
	}

	pub fn launcher(mut self, launcher: Arc<dyn BrowserLauncher>) -> Self {
		self.launcher = Some(launcher);
		self
	}

	pub fn build(self) -> Result<Fixture> {
		let config = self.config.ok_or_else(|| Error::Config("missing run configuration".into()))?;
		let backend = self.backend.ok_or_else(|| Error::Config("missing checkpoint backend".into()))?;
		let launcher = self.launcher.ok_or_else(|| Error::Config("missing browser launcher".into()))?;

		let batch = config.batch();
		let collector = Arc::new(ResultCollector::new(
			backend,
			config.effective_concurrency(),
			config.collect_timeout,
		));

		debug!(
			target = "vista.fixture",
			mode = %config.runner_mode,
			concurrency = config.effective_concurrency().get(),
			targets = config.render_targets.len(),
			batch = %batch.name,
			"fixture ready"
		);

		Ok(Fixture {
			config,
			batch,
			collector,
			launcher,
		})
	}
}
