//! # coach-telemetry
//!
//! Structured logging setup shared by the coach's binaries and tests.
//!
//! [`init`] installs a `tracing-subscriber` registry with an environment
//! filter and a compact fmt layer. Installation is fallible rather than
//! panicking: callers that may race on the global subscriber (test
//! harnesses especially) can ignore the error from a second install.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use coach_core::{CoachError, Result};

/// Install the global subscriber with the default `info` filter.
///
/// `RUST_LOG` overrides the default when set.
///
/// # Errors
///
/// Returns [`CoachError::Config`] when a global subscriber is already
/// installed.
pub fn init() -> Result<()> {
    init_with_filter("info")
}

/// Install the global subscriber with an explicit fallback filter
/// directive, e.g. `"coach_vam=debug,info"`.
///
/// `RUST_LOG` overrides the fallback when set.
///
/// # Errors
///
/// Returns [`CoachError::Config`] when the directive is invalid or a
/// global subscriber is already installed.
pub fn init_with_filter(filter: &str) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => EnvFilter::try_new(filter)
            .map_err(|e| CoachError::Config(format!("invalid filter directive: {e}")))?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| CoachError::Config(format!("failed to install subscriber: {e}")))
}
