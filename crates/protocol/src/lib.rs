//! Wire-shape types shared across the vista harness.
//!
//! These types describe the shape of every call that crosses the checkpoint
//! backend boundary: viewports and render targets, checkpoint requests, and
//! the reports that come back at the aggregation barrier. The backend's wire
//! protocol itself is out of scope; this crate only pins down the data the
//! harness hands over and receives.

mod batch;
mod checkpoint;
mod summary;
mod viewport;

pub use batch::BatchInfo;
pub use checkpoint::{Checkpoint, CheckpointScope, MatchLevel};
pub use summary::{CheckpointReport, CheckpointStatus, RunSummary, SessionReport};
pub use viewport::{BrowserFamily, DeviceName, RenderTarget, ScreenOrientation, Viewport};
