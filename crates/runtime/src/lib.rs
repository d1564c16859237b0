//! Execution coordination for visual checkpoints.
//!
//! This crate owns everything between "a test issued a checkpoint" and "the
//! suite read its summary": the [`CheckpointBackend`] boundary trait, the
//! per-test [`CheckpointSession`] capture queue, and the shared
//! [`ResultCollector`] whose `collect_all` barrier is the only point where
//! comparison verdicts become observable.

mod backend;
mod collector;
mod error;
mod session;

pub use backend::{BackendError, CheckpointBackend, OpenRequest, SessionHandle};
pub use collector::ResultCollector;
pub use error::{Result, RuntimeError};
pub use session::CheckpointSession;
