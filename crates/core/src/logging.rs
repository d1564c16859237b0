//! Tracing setup for suite binaries.

use std::sync::Once;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

static INIT: Once = Once::new();

/// Installs a compact stderr subscriber honoring `RUST_LOG`.
///
/// Idempotent, and tolerant of another subscriber already being installed,
/// so every test in a suite binary may call it.
pub fn init() {
	INIT.call_once(|| {
		let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
		let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

		let _ = tracing_subscriber::fmt()
			.with_env_filter(env_filter)
			.with_writer(stderr)
			.with_target(true)
			.with_level(true)
			.compact()
			.try_init();
	});
}
