//! Process-level helpers for the `kitpay` binary.
//!
//! - [`sig_down`] - Graceful shutdown on SIGTERM / SIGINT
//! - [`telemetry`] - Tracing subscriber and optional OpenTelemetry export

pub mod sig_down;
pub mod telemetry;

pub use sig_down::*;
pub use telemetry::*;
