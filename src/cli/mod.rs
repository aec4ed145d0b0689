//! Command-line interface definitions for the `snapshot-sanitizer` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::Parser;

/// Top-level CLI for the `snapshot-sanitizer` binary.
///
/// Everything else is configured through `SANITIZER_*` environment variables
/// or `snapshot-sanitizer.toml`.
#[derive(Debug, Parser)]
#[command(
    name = "snapshot-sanitizer",
    about = "Clone the latest production snapshot, sanitize it, and share the result",
    version
)]
pub(crate) struct Cli {
    /// Connect to the temporary cluster through `localhost`, for example over
    /// an SSH tunnel, instead of its endpoint.
    #[arg(long)]
    pub(crate) local: bool,
    /// Read the sanitization policy from this file instead of the configured
    /// one.
    #[arg(long, value_name = "PATH")]
    pub(crate) policy: Option<String>,
    /// Skip the retention sweep even when it is enabled in configuration.
    #[arg(long)]
    pub(crate) skip_sweep: bool,
}
