//! Zero-cost tracing helpers.
//!
//! With the `tracing` feature enabled these macros forward to the `tracing`
//! crate. Without it (the default) they expand to nothing, so the engines pay
//! no cost in benchmark builds that don't ask for per-operation events.
//!
//! ```bash
//! # Watch every probe of the open-addressing table
//! RUST_LOG=keyset::probing=trace cargo run -p keyset-bench -- demo
//! ```

#![allow(unused_macros, unused_imports)]

/// Trace-level event. No-op without the `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

/// Debug-level event. No-op without the `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

/// Warn-level event. No-op without the `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! warn_log {
    ($($arg:tt)*) => {};
}

pub(crate) use debug_log;
pub(crate) use trace_log;
pub(crate) use warn_log;
