use time::format_description::well_known::Rfc3339;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, EnvFilter};

/// UTC timestamps in RFC 3339 for every log line.
pub fn log_timer() -> UtcTime<Rfc3339> {
    UtcTime::new(Rfc3339)
}

/// Install the global subscriber. `RUST_LOG` wins over `log_level`.
pub fn init(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(log_timer())
        .init();
}
