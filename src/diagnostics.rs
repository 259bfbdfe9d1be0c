//! Diagnostic output hooks
//!
//! The library never writes diagnostics directly. Every call site goes through
//! [`Platform::log`](crate::Platform::log), whose default body forwards to the
//! hook selected by cargo features:
//!
//! - no feature: [`Silent`], messages are discarded
//! - `log-stderr`: [`Stderr`], one line per message on standard error
//! - `log-tracing`: [`Tracing`], one `tracing` event per message
//!
//! Message text is opaque; callers must not depend on its wording.

use std::fmt;
use std::io::Write;

#[cfg(all(
    feature = "logging",
    not(any(feature = "log-stderr", feature = "log-tracing"))
))]
compile_error!(
    "To log you have to set a logging function! Enable `log-stderr` or `log-tracing`, \
     or drop `logging` and override `Platform::log` on your own platform type."
);

#[cfg(all(feature = "log-stderr", feature = "log-tracing"))]
compile_error!("Select exactly one diagnostic hook: `log-stderr` and `log-tracing` are both enabled.");

/// Target used for diagnostics emitted through the tracing hook
pub const TRACING_TARGET: &str = "mxml";

/// A sink for library-internal diagnostic text
pub trait Diagnostics {
    /// Emits one diagnostic message
    fn emit(message: fmt::Arguments<'_>);

    /// Identifier reported in the build configuration
    const NAME: &'static str;
}

/// Discards every message
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Diagnostics for Silent {
    #[inline(always)]
    fn emit(_message: fmt::Arguments<'_>) {}

    const NAME: &'static str = "silent";
}

/// Writes each message as one line on standard error
#[derive(Debug, Clone, Copy, Default)]
pub struct Stderr;

impl Diagnostics for Stderr {
    fn emit(message: fmt::Arguments<'_>) {
        let mut stderr = std::io::stderr().lock();
        // Diagnostics have no caller to report a failed write to
        let _ = writeln!(stderr, "{}", message);
    }

    const NAME: &'static str = "stderr";
}

/// Emits each message as a `tracing` event at DEBUG level
#[derive(Debug, Clone, Copy, Default)]
pub struct Tracing;

impl Diagnostics for Tracing {
    fn emit(message: fmt::Arguments<'_>) {
        tracing::debug!(target: TRACING_TARGET, "{}", message);
    }

    const NAME: &'static str = "tracing";
}

/// Hook bound for this build
#[cfg(not(feature = "logging"))]
pub type DefaultDiagnostics = Silent;

/// Hook bound for this build
#[cfg(feature = "log-stderr")]
pub type DefaultDiagnostics = Stderr;

/// Hook bound for this build
#[cfg(all(feature = "log-tracing", not(feature = "log-stderr")))]
pub type DefaultDiagnostics = Tracing;

/// Emits a diagnostic through a platform's hook
///
/// ```
/// use mxml_platform::{mxml_log, System};
///
/// mxml_log!(System, "unable to read {} bytes", 42);
/// ```
#[macro_export]
macro_rules! mxml_log {
    ($platform:ty, $($arg:tt)+) => {
        <$platform as $crate::Platform>::log(::std::format_args!($($arg)+))
    };
}
