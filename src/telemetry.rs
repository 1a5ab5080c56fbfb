//! Opt-in tracing setup for hosts embedding `baseline-pane`.
//!
//! Hosts that already own a subscriber should skip this and keep their own
//! filters; every event in the crate is emitted through `tracing`.

/// Default directive used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "baseline_pane=info";

/// Installs a compact `tracing` subscriber when the `telemetry` feature is enabled.
///
/// Returns `false` when the feature is disabled or a global subscriber is
/// already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
