use tracing_subscriber::{EnvFilter, fmt};

/// Tracing target for verbose (-v, -vv) cross-stage timing and diagnostics.
pub const APPV: &str = "appverbose";

#[cfg(test)]
pub(crate) fn init_tracing_test() {
	use std::sync::Once;
	static INIT: Once = Once::new();
	INIT.call_once(|| {
		init_tracing(false, 0);
	});
}

pub fn init_tracing(quiet: bool, verbosity: u8) {
	use tracing_subscriber::prelude::*;

	if std::env::var("RUST_LOG").is_ok() {
		let rust_log_env = std::env::var("RUST_LOG").unwrap_or_default();
		let full_filter = EnvFilter::new(&rust_log_env);
		let subscriber = tracing_subscriber::registry().with(fmt::layer().with_target(true)).with(full_filter);
		tracing::subscriber::set_global_default(subscriber).expect("failed to set tracing subscriber");
		return;
	}

	let level = match (quiet, verbosity) {
		(true, _) => None,
		(false, 0) => Some("info"),
		(false, 1) => Some("debug"),
		(false, _) => Some("trace"),
	};

	let env_filter = if let Some(level) = level {
		EnvFilter::new(format!("warn,{}={level}", APPV))
	} else {
		EnvFilter::new("warn")
	};

	let fmt_layer = fmt::layer().without_time().with_target(false).with_level(true);
	let subscriber = tracing_subscriber::registry().with(fmt_layer).with(env_filter);
	tracing::subscriber::set_global_default(subscriber).expect("failed to set tracing subscriber");
}
