//! Standalone retention sweep.
//!
//! Deletes shared snapshots of the configured source cluster that are older
//! than the configured number of days, without running the pipeline.

use std::io::Write as _;

use chrono::Utc;
use clap::Parser;

use snapshot_sanitizer::cloud::rds::RdsClusterApi;
use snapshot_sanitizer::{
    AwsContext, RetentionRule, RetentionSweep, SanitizerConfig, StdoutReporter, init_tracing,
};

#[derive(Debug, Parser)]
#[command(
    name = "snapshot-sanitizer-sweep",
    about = "Delete shared sanitized snapshots older than the retention threshold"
)]
struct Cli {
    /// Override the configured age threshold in days.
    #[arg(long, value_name = "DAYS")]
    days: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();
    let cli = Cli::parse();
    let config = SanitizerConfig::load_without_cli_args().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    let rule = cli.days.map_or_else(
        || config.retention_rule(),
        |days| RetentionRule::new(config.rds_cluster_id.trim(), days),
    );

    let context = AwsContext::load().await;
    let cloud = RdsClusterApi::new(&context);
    let summary = RetentionSweep::new(&cloud, &StdoutReporter, config.wait_policy())
        .run(&rule, Utc::now())
        .await
        .map_err(|err| err.to_string())?;

    writeln!(
        std::io::stdout(),
        "retention sweep complete: deleted={}, failed={}",
        summary.deleted.len(),
        summary.failed.len()
    )
    .map_err(|err| err.to_string())?;
    if summary.failed.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "{} snapshot(s) could not be deleted",
            summary.failed.len()
        ))
    }
}
