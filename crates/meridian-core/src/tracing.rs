use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Env var selecting the log format: `json` (default) or `pretty`.
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

fn wants_json(format: Option<&str>) -> bool {
    !matches!(format.map(str::trim), Some(f) if f.eq_ignore_ascii_case("pretty"))
}

/// Install the global subscriber: JSON lines on stdout, or human-readable
/// output when `LOG_FORMAT=pretty`. Filtered by `RUST_LOG` (default `info`).
///
/// Later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let format = std::env::var(LOG_FORMAT_VAR).ok();
    let registry = tracing_subscriber::registry().with(filter);
    let _ = if wants_json(format.as_deref()) {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().pretty()).try_init()
    };
}
