//! Visual-checkpoint test harness.
//!
//! A suite owns one [`Fixture`] (environment-derived configuration, a batch
//! id, and the shared result collector); each test case opens one
//! [`Session`] binding a browser to a checkpoint-recording session, drives
//! the page, issues named checkpoints, and closes. Verdicts only become
//! observable at [`Fixture::teardown`], the suite's single synchronization
//! barrier.
//!
//! Both external collaborators stay behind traits: [`BrowserDriver`] for the
//! automation capability set and [`CheckpointBackend`] for the remote
//! visual-diffing service.

mod config;
mod driver;
mod error;
mod fixture;
pub mod logging;
mod session;

pub use config::{
	API_KEY_VAR, CONCURRENCY_VAR, DEFAULT_CONCURRENCY, EXECUTION_ENDPOINT_VAR, ExecutionMode, FailurePolicy,
	HEADLESS_VAR, RunConfig, RunnerMode, default_render_targets,
};
pub use driver::{BrowserDriver, BrowserLauncher, LaunchOptions, Locator};
pub use error::{Error, Result};
pub use fixture::{Fixture, FixtureBuilder};
pub use session::{Session, SessionOptions, SessionState};
pub use vista_protocol::{
	BatchInfo, BrowserFamily, Checkpoint, CheckpointReport, CheckpointScope, CheckpointStatus, DeviceName,
	MatchLevel, RenderTarget, RunSummary, ScreenOrientation, SessionReport, Viewport,
};
pub use vista_runtime::{BackendError, CheckpointBackend, OpenRequest, ResultCollector, SessionHandle};
