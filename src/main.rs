//! Binary entry point for the snapshot sanitizer.

mod cli;

use std::io::{self, Write};
use std::process;

use camino::Utf8PathBuf;
use chrono::Utc;
use clap::Parser;
use thiserror::Error;
use tracing::{info, warn};

use snapshot_sanitizer::cloud::rds::RdsClusterApi;
use snapshot_sanitizer::cloud::ssm::SsmSecretStore;
use snapshot_sanitizer::{
    AwsContext, ConfigError, PgConnector, PipelineError, PipelineOrchestrator, PolicyError,
    RetentionSweep, SanitizationPolicy, SanitizerConfig, StdoutReporter, SweepError,
    init_tracing,
};

use cli::Cli;

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),
    #[error("{0}")]
    Pipeline(#[from] PipelineError),
    #[error("retention sweep failed: {0}")]
    Sweep(#[from] SweepError),
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = SanitizerConfig::load_without_cli_args()?;
    config.validate()?;
    let policy_path = cli
        .policy
        .map_or_else(|| config.policy_path(), Utf8PathBuf::from);
    let policy = SanitizationPolicy::load(&policy_path)?;
    let (indexes, constraints, tables) = policy.statement_counts();
    info!(
        path = %policy_path,
        indexes,
        constraints,
        tables,
        "loaded sanitization policy"
    );

    let context = AwsContext::load().await;
    let cloud = RdsClusterApi::new(&context);
    let orchestrator = PipelineOrchestrator::new(
        cloud.clone(),
        SsmSecretStore::new(&context),
        PgConnector,
        StdoutReporter,
        config.pipeline_settings(cli.local),
    );
    let run = orchestrator.execute(&policy).await?;
    info!(
        shared_snapshot = %run.shared_snapshot.id,
        rows = run.sanitization.total_rows(),
        "pipeline complete"
    );

    if config.delete_old_snapshots && !cli.skip_sweep {
        let summary = RetentionSweep::new(&cloud, &StdoutReporter, config.wait_policy())
            .run(&config.retention_rule(), Utc::now())
            .await?;
        if !summary.failed.is_empty() {
            warn!(
                failed = summary.failed.len(),
                deleted = summary.deleted.len(),
                "retention sweep left snapshots behind"
            );
        }
    }
    Ok(())
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
