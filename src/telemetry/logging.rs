use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing with an env-driven level filter.
///
/// `level` overrides the default filter; `RUST_LOG` still wins when the
/// override does not parse.
pub fn init_tracing(level: Option<&str>) {
    let env = level.unwrap_or("info");
    let filter = EnvFilter::try_new(env).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
}
