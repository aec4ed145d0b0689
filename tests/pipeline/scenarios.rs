//! BDD scenarios for the pipeline.

use rstest_bdd_macros::scenario;

use super::test_helpers::{PipelineContext, pipeline_context};

#[scenario(
    path = "tests/features/pipeline.feature",
    name = "Produce a shared sanitized snapshot and clean up"
)]
fn scenario_produce_shared_snapshot(pipeline_context: PipelineContext) {
    let _ = pipeline_context;
}

#[scenario(
    path = "tests/features/pipeline.feature",
    name = "Fail when the cluster has no automated snapshots"
)]
fn scenario_fail_without_snapshots(pipeline_context: PipelineContext) {
    let _ = pipeline_context;
}

#[scenario(
    path = "tests/features/pipeline.feature",
    name = "Tear down temporary resources when sanitization fails"
)]
fn scenario_teardown_on_failure(pipeline_context: PipelineContext) {
    let _ = pipeline_context;
}
