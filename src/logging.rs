//! Subscriber setup for the binary.
//!
//! Human-readable events go to stderr, filtered by `RUST_LOG`. When `TODO_ISSUES_TRACE_FILE` is set,
//! every `info`-and-above event is additionally written there as one JSON object per line;
//! the integration tests read that file to see which remote calls were made.

use std::{fs::File, sync::Mutex};

use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const TRACE_FILE_ENV: &str = "TODO_ISSUES_TRACE_FILE";

/// Directive used when `RUST_LOG` is unset. Overridable at build time via `.cargo/log_directives`.
fn default_directives() -> &'static str {
	option_env!("LOG_DIRECTIVES").unwrap_or("warn")
}

pub fn init() -> Result<()> {
	let stderr_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives()));
	let stderr_layer = fmt::layer().compact().with_target(false).with_writer(std::io::stderr).with_filter(stderr_filter);

	let file_layer = match std::env::var_os(TRACE_FILE_ENV).filter(|p| !p.is_empty()) {
		Some(path) => {
			let file = File::create(&path).wrap_err_with(|| format!("Failed to create trace file {}", path.to_string_lossy()))?;
			Some(fmt::layer().json().with_ansi(false).with_writer(Mutex::new(file)).with_filter(EnvFilter::new("info")))
		}
		None => None,
	};

	tracing_subscriber::registry()
		.with(stderr_layer)
		.with(file_layer)
		.try_init()
		.wrap_err("Failed to install the tracing subscriber")?;
	Ok(())
}
