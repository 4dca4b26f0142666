//! Logging facilities for Horizon Flow.
//!
//! Horizon Flow uses the `tracing` crate for instrumentation and never
//! installs a subscriber itself. To see logs, install one in your
//! application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_flow=debug,horizon_flow_core=info")
//!     .init();
//! ```
//!
//! The constants below name the targets and spans used by each subsystem,
//! for use in filter directives.

/// Span names used throughout Horizon Flow for tracing.
pub mod span_names {
    /// One full run of the window loop.
    pub const RUN_LOOP: &str = "horizon_flow::run_loop";
    /// View activation.
    pub const SHOW_VIEW: &str = "horizon_flow::show_view";
}

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_flow_core";
    /// Handler registration.
    pub const REGISTRY: &str = "horizon_flow_core::registry";
    /// Event dispatch.
    pub const DISPATCH: &str = "horizon_flow_core::dispatch";
    /// Timers and scheduling.
    pub const TIMER: &str = "horizon_flow_core::timer";
    /// Custom event allocation.
    pub const CUSTOM: &str = "horizon_flow_core::custom";
    /// Window lifecycle and run loop.
    pub const WINDOW: &str = "horizon_flow::window";
    /// View binding and activation.
    pub const VIEW: &str = "horizon_flow::view";
    /// Platform backends.
    pub const BACKEND: &str = "horizon_flow::backend";
    /// Application context.
    pub const APP: &str = "horizon_flow::app";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_share_crate_prefix() {
        for target in [targets::REGISTRY, targets::DISPATCH, targets::TIMER, targets::CUSTOM] {
            assert!(target.starts_with(targets::CORE));
        }
        for target in [targets::WINDOW, targets::VIEW, targets::BACKEND, targets::APP] {
            assert!(target.starts_with("horizon_flow::"));
        }
    }
}
