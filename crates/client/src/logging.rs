//! Log filter for the `arena` binary.

use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset, empty or unparsable.
pub const DEFAULT_DIRECTIVES: &str = "info";

/// Filter built from `RUST_LOG`, falling back to [`DEFAULT_DIRECTIVES`].
pub fn env_filter() -> EnvFilter {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

/// Filter built from explicit directives. `RUST_LOG=debug` yields debug, not info.
pub fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}
