//! Operator-facing progress output.
//!
//! Stage banners, per-statement echoes, and wait indicators go to standard
//! output so an operator watching a run sees the same shape of output every
//! time. Structured diagnostics go through `tracing` instead.

use std::io::{self, Write};

use tracing_subscriber::EnvFilter;

/// Sink for human-readable progress output.
pub trait Reporter: Send + Sync {
    /// Prints a labelled banner announcing a stage.
    fn banner(&self, title: &str);

    /// Prints a single line of progress or result output.
    fn line(&self, message: &str);

    /// Starts an in-place progress indicator without a trailing newline.
    fn progress_start(&self, message: &str);

    /// Emits one indicator for a wait attempt that did not finish.
    fn progress_tick(&self);

    /// Terminates the in-place progress indicator.
    fn progress_end(&self);
}

/// Width of the hash rule on each side of a banner title.
const BANNER_RULE: &str = "####################";

/// Formats a stage banner.
#[must_use]
pub fn banner_text(title: &str) -> String {
    format!("{BANNER_RULE} {title} {BANNER_RULE}")
}

/// Reporter that writes to the process standard output.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutReporter;

impl StdoutReporter {
    fn write(text: &str, newline: bool) {
        let mut stdout = io::stdout().lock();
        if newline {
            writeln!(stdout, "{text}").ok();
        } else {
            write!(stdout, "{text}").ok();
        }
        stdout.flush().ok();
    }
}

impl Reporter for StdoutReporter {
    fn banner(&self, title: &str) {
        Self::write(&banner_text(title), true);
    }

    fn line(&self, message: &str) {
        Self::write(message, true);
    }

    fn progress_start(&self, message: &str) {
        Self::write(message, false);
    }

    fn progress_tick(&self) {
        Self::write(".", false);
    }

    fn progress_end(&self) {
        Self::write("", true);
    }
}

/// Installs the process-wide `tracing` subscriber.
///
/// Diagnostics go to standard error so they never interleave with the
/// progress output on standard output. The filter comes from `RUST_LOG` and
/// defaults to `info`. Calling this more than once is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}
