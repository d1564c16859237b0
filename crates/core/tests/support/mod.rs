//! Shared fakes for harness integration tests: an observable browser driver
//! and a scripted checkpoint backend.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;
use vista::{
	BackendError, BrowserDriver, BrowserLauncher, Checkpoint, CheckpointBackend, CheckpointReport,
	CheckpointStatus, Error, LaunchOptions, Locator, OpenRequest, Result, SessionHandle, Viewport,
};

/// Observable state of one fake browser instance.
#[derive(Default)]
pub struct DriverProbe {
	log: Mutex<Vec<String>>,
	quit_count: AtomicUsize,
}

impl DriverProbe {
	pub fn log_lines(&self) -> Vec<String> {
		self.log.lock().unwrap().clone()
	}

	pub fn saw(&self, entry: &str) -> bool {
		self.log.lock().unwrap().iter().any(|line| line == entry)
	}

	pub fn quits(&self) -> usize {
		self.quit_count.load(Ordering::SeqCst)
	}

	fn record(&self, line: String) {
		self.log.lock().unwrap().push(line);
	}
}

struct FakeDriver {
	probe: Arc<DriverProbe>,
	missing_elements: Vec<Locator>,
}

impl FakeDriver {
	fn find(&self, locator: &Locator) -> Result<()> {
		if self.missing_elements.contains(locator) {
			return Err(Error::ElementNotFound {
				selector: locator.to_string(),
			});
		}
		Ok(())
	}
}

#[async_trait]
impl BrowserDriver for FakeDriver {
	async fn goto(&self, url: &str) -> Result<()> {
		self.probe.record(format!("goto {url}"));
		Ok(())
	}

	async fn type_text(&self, locator: &Locator, text: &str) -> Result<()> {
		self.find(locator)?;
		self.probe.record(format!("type {locator} {text}"));
		Ok(())
	}

	async fn click(&self, locator: &Locator) -> Result<()> {
		self.find(locator)?;
		self.probe.record(format!("click {locator}"));
		Ok(())
	}

	async fn set_implicit_wait(&self, wait: Duration) -> Result<()> {
		self.probe.record(format!("implicit_wait {}ms", wait.as_millis()));
		Ok(())
	}

	async fn set_viewport(&self, viewport: Viewport) -> Result<()> {
		self.probe.record(format!("viewport {viewport}"));
		Ok(())
	}

	async fn quit(&self) -> Result<()> {
		self.probe.quit_count.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}
}

/// Launcher handing out observable fake drivers.
#[derive(Default)]
pub struct FakeLauncher {
	probes: Mutex<Vec<Arc<DriverProbe>>>,
	missing_elements: Mutex<Vec<Locator>>,
	fail_launch: AtomicBool,
}

impl FakeLauncher {
	/// Makes every subsequent launch fail.
	pub fn refuse_launches(&self) {
		self.fail_launch.store(true, Ordering::SeqCst);
	}

	/// Makes lookups for `locator` fail on subsequently launched drivers.
	pub fn remove_element(&self, locator: Locator) {
		self.missing_elements.lock().unwrap().push(locator);
	}

	pub fn launched(&self) -> usize {
		self.probes.lock().unwrap().len()
	}

	pub fn probe(&self, index: usize) -> Arc<DriverProbe> {
		self.probes.lock().unwrap()[index].clone()
	}

	pub fn total_quits(&self) -> usize {
		self.probes.lock().unwrap().iter().map(|p| p.quits()).sum()
	}
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
	async fn launch(&self, options: LaunchOptions) -> Result<Box<dyn BrowserDriver>> {
		if self.fail_launch.load(Ordering::SeqCst) {
			return Err(Error::BrowserLaunch("driver executable not found".into()));
		}

		let probe = Arc::new(DriverProbe::default());
		probe.record(format!(
			"launch headless={} execution={:?}",
			options.headless, options.execution
		));
		self.probes.lock().unwrap().push(probe.clone());

		Ok(Box::new(FakeDriver {
			probe,
			missing_elements: self.missing_elements.lock().unwrap().clone(),
		}))
	}
}

/// Scripted in-memory checkpoint backend.
#[derive(Default)]
pub struct FakeBackend {
	capture_delay: Option<Duration>,
	fail_open: AtomicBool,
	opens: Mutex<Vec<OpenRequest>>,
	captured: Mutex<HashMap<String, Vec<Checkpoint>>>,
	/// Verdict per checkpoint name; anything else passes.
	statuses: Mutex<HashMap<String, CheckpointStatus>>,
	closed_sessions: AtomicUsize,
}

impl FakeBackend {
	pub fn with_capture_delay(delay: Duration) -> Self {
		Self {
			capture_delay: Some(delay),
			..Default::default()
		}
	}

	/// Makes every subsequent open fail.
	pub fn refuse_opens(&self) {
		self.fail_open.store(true, Ordering::SeqCst);
	}

	/// Scripts the verdict for one checkpoint name.
	pub fn script_status(&self, name: &str, status: CheckpointStatus) {
		self.statuses.lock().unwrap().insert(name.to_string(), status);
	}

	pub fn open_requests(&self) -> Vec<OpenRequest> {
		self.opens.lock().unwrap().clone()
	}

	pub fn closed_sessions(&self) -> usize {
		self.closed_sessions.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl CheckpointBackend for FakeBackend {
	async fn open_session(&self, request: OpenRequest) -> std::result::Result<SessionHandle, BackendError> {
		if self.fail_open.load(Ordering::SeqCst) {
			return Err(BackendError::new("invalid api key"));
		}
		let handle = SessionHandle {
			id: Uuid::new_v4().to_string(),
			app_name: request.app_name.clone(),
			test_name: request.test_name.clone(),
		};
		self.opens.lock().unwrap().push(request);
		Ok(handle)
	}

	async fn capture(&self, session: &SessionHandle, checkpoint: Checkpoint) -> std::result::Result<(), BackendError> {
		if let Some(delay) = self.capture_delay {
			tokio::time::sleep(delay).await;
		}
		self.captured
			.lock()
			.unwrap()
			.entry(session.id.clone())
			.or_default()
			.push(checkpoint);
		Ok(())
	}

	async fn close_session(&self, session: SessionHandle) -> std::result::Result<Vec<CheckpointReport>, BackendError> {
		self.closed_sessions.fetch_add(1, Ordering::SeqCst);
		let captured = self.captured.lock().unwrap().get(&session.id).cloned().unwrap_or_default();
		let statuses = self.statuses.lock().unwrap();
		Ok(captured
			.into_iter()
			.map(|c| CheckpointReport {
				status: statuses.get(&c.name).cloned().unwrap_or(CheckpointStatus::Passed),
				name: c.name,
				match_level: c.match_level,
				scope: c.scope,
			})
			.collect())
	}
}
