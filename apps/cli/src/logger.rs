use anyhow::Result;
use std::{env, io, path::Path};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
	filter::LevelFilter,
	fmt::{self, Layer},
	prelude::*,
	EnvFilter,
};

#[cfg(debug_assertions)]
const CONSOLE_LOG_FILTER: LevelFilter = LevelFilter::DEBUG;

#[cfg(not(debug_assertions))]
const CONSOLE_LOG_FILTER: LevelFilter = LevelFilter::WARN;

/// Directives for the configured level, followed by `RUST_LOG` so its directives win.
fn directives(level: &str, rust_log: Option<&str>) -> String {
	let mut directives = format!("warn,sd_leaderboard={level},leaderboard={level}");
	if let Some(rust_log) = rust_log.filter(|rust_log| !rust_log.trim().is_empty()) {
		directives.push(',');
		directives.push_str(rust_log);
	}

	directives
}

/// Console logs go to stderr so they never mix with the board on stdout. The returned guard
/// flushes the file writer and must live until exit.
pub fn init(data_dir: &Path, level: &str) -> Result<WorkerGuard> {
	let (non_blocking, guard) =
		tracing_appender::non_blocking(rolling::daily(data_dir.join("logs"), "log"));

	tracing_subscriber::registry()
		.with(EnvFilter::try_new(directives(
			level,
			env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
		))?)
		.with(
			fmt::layer()
				.with_writer(io::stderr)
				.with_filter(CONSOLE_LOG_FILTER),
		)
		.with(
			Layer::default()
				.with_writer(non_blocking)
				.with_ansi(false)
				.with_filter(LevelFilter::DEBUG),
		)
		.try_init()?;

	Ok(guard)
}
