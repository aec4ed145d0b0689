//! Shared fixtures and helpers for pipeline BDD scenarios.

use std::time::Duration;

use rstest::fixture;
use snapshot_sanitizer::generators::GeneratorKind;
use snapshot_sanitizer::policy::{ColumnRule, Sanitizer, TableRule};
use snapshot_sanitizer::test_support::{
    FakeCloud, MemorySecretStore, RecordingConnector, RecordingExecutor, RecordingReporter,
};
use snapshot_sanitizer::{
    PipelineOrchestrator, PipelineRun, PipelineSettings, SanitizationPolicy, WaitPolicy,
};

#[derive(Clone, Debug)]
pub enum PipelineOutcome {
    Success(Box<PipelineRun>),
    Failure(String),
}

#[derive(Clone, Debug)]
pub struct PipelineContext {
    pub cloud: FakeCloud,
    pub secrets: MemorySecretStore,
    pub executor: RecordingExecutor,
    pub reporter: RecordingReporter,
    pub source_cluster: Option<String>,
    pub source_snapshots: Vec<String>,
    pub outcome: Option<PipelineOutcome>,
}

#[fixture]
pub fn pipeline_context() -> PipelineContext {
    PipelineContext {
        cloud: FakeCloud::new(),
        secrets: MemorySecretStore::new(),
        executor: RecordingExecutor::new(),
        reporter: RecordingReporter::default(),
        source_cluster: None,
        source_snapshots: Vec::new(),
        outcome: None,
    }
}

pub type TestOrchestrator =
    PipelineOrchestrator<FakeCloud, MemorySecretStore, RecordingConnector, RecordingReporter>;

impl PipelineContext {
    pub fn orchestrator(&self, cluster_id: &str) -> TestOrchestrator {
        let settings = PipelineSettings {
            share_account_ids: vec![String::from("123456789012")],
            wait: WaitPolicy::new(Duration::ZERO, 3),
            ..PipelineSettings::new(cluster_id)
        };
        PipelineOrchestrator::new(
            self.cloud.clone(),
            self.secrets.clone(),
            RecordingConnector::new(self.executor.clone()),
            self.reporter.clone(),
            settings,
        )
    }
}

pub fn policy() -> SanitizationPolicy {
    let kind = GeneratorKind::parse("safe_email")
        .unwrap_or_else(|err| panic!("generator should exist: {err}"));
    SanitizationPolicy {
        drop_indexes: vec![String::from("users_email_idx")],
        tables: vec![TableRule {
            name: String::from("users"),
            schema: None,
            columns: vec![ColumnRule {
                name: String::from("email"),
                sanitizer: Sanitizer::Generated { kind },
            }],
            drop_constraints: Vec::new(),
        }],
    }
}
