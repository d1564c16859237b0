use std::time::Duration;

use async_trait::async_trait;
use vista_protocol::Viewport;

use crate::config::ExecutionMode;
use crate::error::Result;

/// Element locator for driver lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
	/// Element id attribute.
	Id(String),
	/// CSS selector.
	Css(String),
}

impl Locator {
	pub fn id(id: impl Into<String>) -> Self {
		Self::Id(id.into())
	}

	pub fn css(selector: impl Into<String>) -> Self {
		Self::Css(selector.into())
	}
}

impl std::fmt::Display for Locator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Locator::Id(id) => write!(f, "#{id}"),
			Locator::Css(selector) => f.write_str(selector),
		}
	}
}

/// Options for one browser launch.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
	pub headless: bool,
	pub execution: ExecutionMode,
}

/// The browser-automation capability set the harness depends on.
///
/// Any conforming implementation is acceptable: a local process, a remote
/// endpoint, or an in-memory fake in tests. Element operations are expected
/// to retry lookups within the configured implicit wait and return
/// [`Error::ElementNotFound`] once it is exhausted.
///
/// [`Error::ElementNotFound`]: crate::Error::ElementNotFound
#[async_trait]
pub trait BrowserDriver: Send + Sync {
	async fn goto(&self, url: &str) -> Result<()>;
	async fn type_text(&self, locator: &Locator, text: &str) -> Result<()>;
	async fn click(&self, locator: &Locator) -> Result<()>;
	async fn set_implicit_wait(&self, wait: Duration) -> Result<()>;
	async fn set_viewport(&self, viewport: Viewport) -> Result<()>;
	async fn quit(&self) -> Result<()>;
}

/// Launches browsers for per-test sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
	/// Launch failures are fatal for the requesting session only.
	async fn launch(&self, options: LaunchOptions) -> Result<Box<dyn BrowserDriver>>;
}
