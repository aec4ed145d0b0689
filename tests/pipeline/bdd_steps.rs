//! BDD step definitions for pipeline behaviour.

use chrono::Utc;
use rstest_bdd_macros::{given, then, when};
use snapshot_sanitizer::cloud::SnapshotType;
use snapshot_sanitizer::test_support::{RecordingExecutor, snapshot, source_cluster};
use tokio::runtime::Runtime;

use super::test_helpers::{PipelineContext, PipelineOutcome, policy};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("a production cluster \"{cluster}\" with an automated snapshot \"{snapshot_id}\"")]
fn cluster_with_snapshot(
    mut pipeline_context: PipelineContext,
    cluster: String,
    snapshot_id: String,
) -> PipelineContext {
    let cluster_id = cluster.trim();
    pipeline_context.cloud.add_cluster(source_cluster(cluster_id));
    pipeline_context.cloud.add_snapshot(
        snapshot(snapshot_id.trim(), cluster_id, Utc::now()),
        SnapshotType::Automated,
    );
    pipeline_context.source_cluster = Some(cluster_id.to_owned());
    pipeline_context
        .source_snapshots
        .push(snapshot_id.trim().to_owned());
    pipeline_context
}

#[given("a production cluster \"{cluster}\" without snapshots")]
fn cluster_without_snapshots(
    mut pipeline_context: PipelineContext,
    cluster: String,
) -> PipelineContext {
    pipeline_context
        .cloud
        .add_cluster(source_cluster(cluster.trim()));
    pipeline_context.source_cluster = Some(cluster.trim().to_owned());
    pipeline_context
}

#[given("sanitization statements fail")]
fn statements_fail(mut pipeline_context: PipelineContext) -> PipelineContext {
    pipeline_context.executor = RecordingExecutor::new().failing_on("UPDATE");
    pipeline_context
}

#[when("I run the pipeline for \"{cluster}\"")]
fn run_pipeline(
    mut pipeline_context: PipelineContext,
    cluster: String,
) -> Result<PipelineContext, StepError> {
    let runtime = Runtime::new().map_err(|err| StepError::Assertion(err.to_string()))?;
    let orchestrator = pipeline_context.orchestrator(cluster.trim());
    let policy = policy();
    let result = runtime.block_on(async { orchestrator.execute(&policy).await });
    pipeline_context.outcome = Some(match result {
        Ok(run) => PipelineOutcome::Success(Box::new(run)),
        Err(err) => PipelineOutcome::Failure(err.to_string()),
    });
    Ok(pipeline_context)
}

#[then("the shared snapshot \"{snapshot_id}\" exists")]
fn shared_snapshot_exists(
    pipeline_context: &PipelineContext,
    snapshot_id: String,
) -> Result<(), StepError> {
    let wanted = snapshot_id.trim();
    match pipeline_context.outcome.as_ref() {
        Some(PipelineOutcome::Success(run)) if run.shared_snapshot.id == wanted => {}
        other => {
            return Err(StepError::Assertion(format!(
                "expected a run producing {wanted}, got {other:?}"
            )));
        }
    }
    if pipeline_context
        .cloud
        .snapshot_ids()
        .iter()
        .any(|id| id == wanted)
    {
        Ok(())
    } else {
        Err(StepError::Assertion(format!("{wanted} is missing")))
    }
}

#[then("no temporary resources remain")]
fn no_temporary_resources(pipeline_context: &PipelineContext) -> Result<(), StepError> {
    let source = pipeline_context
        .source_cluster
        .clone()
        .ok_or_else(|| StepError::Assertion(String::from("no source cluster configured")))?;
    let clusters = pipeline_context.cloud.cluster_ids();
    if clusters != vec![source] {
        return Err(StepError::Assertion(format!(
            "unexpected clusters: {clusters:?}"
        )));
    }
    let instances = pipeline_context.cloud.instance_ids();
    if !instances.is_empty() {
        return Err(StepError::Assertion(format!(
            "unexpected instances: {instances:?}"
        )));
    }
    let secrets = pipeline_context.secrets.names();
    if !secrets.is_empty() {
        return Err(StepError::Assertion(format!(
            "unexpected secrets: {secrets:?}"
        )));
    }
    let leftovers: Vec<String> = pipeline_context
        .cloud
        .snapshot_ids()
        .into_iter()
        .filter(|id| !pipeline_context.source_snapshots.contains(id) && !id.ends_with("-shared"))
        .collect();
    if leftovers.is_empty() {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "unexpected snapshots: {leftovers:?}"
        )))
    }
}

#[then("the run fails with \"{text}\"")]
fn run_fails_with(pipeline_context: &PipelineContext, text: String) -> Result<(), StepError> {
    match pipeline_context.outcome.as_ref() {
        Some(PipelineOutcome::Failure(message)) if message.contains(text.trim()) => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected failure containing {text:?}, got {other:?}"
        ))),
    }
}
