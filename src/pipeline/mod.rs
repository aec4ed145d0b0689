//! Production-to-sanitized snapshot pipeline.
//!
//! The pipeline is a fixed sequence of stages, each taking the previous
//! stage's output: locate the latest automated snapshot, restore it into a
//! temporary cluster, rotate its credentials, attach an instance, sanitize,
//! snapshot, share, and clean up. Every stage that mutates provider state
//! waits for the resource to settle before the next stage starts.

mod error;

use std::time::Duration;

use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::{info, warn};

pub use error::{PipelineError, Stage};

use crate::cloud::{
    Cluster, ClusterApi, ClusterModification, CopySnapshotRequest, CreateInstanceRequest,
    Instance, RestoreClusterRequest, Secret, SecretStore, Snapshot, SnapshotQuery, Waiter,
};
use crate::policy::SanitizationPolicy;
use crate::report::Reporter;
use crate::sanitize::{SanitizationEngine, SanitizationReport};
use crate::sql::{ConnectionParams, Connector};
use crate::wait::{WaitError, WaitPolicy, await_terminal};

/// Serverless capacity floor for temporary clusters.
pub const MIN_CAPACITY: f64 = 0.5;

/// Instance class attached to temporary clusters.
pub const INSTANCE_CLASS: &str = "db.serverless";

/// Length of generated master passwords.
pub const PASSWORD_LENGTH: usize = 32;

/// Database used when the source cluster does not name one.
pub const DEFAULT_DATABASE: &str = "postgres";

/// Host used with `--local`, for example through a secure tunnel.
pub const LOCAL_HOST: &str = "localhost";

/// Name under which a cluster's generated password is stored.
#[must_use]
pub fn secret_name(cluster_id: &str) -> String {
    format!("/RDS/{cluster_id}/password")
}

/// Identifier of the sanitized snapshot taken from a temporary cluster.
#[must_use]
pub fn sanitized_snapshot_id(cluster_id: &str) -> String {
    format!("{cluster_id}-sanitized")
}

/// Identifier of the shareable copy of a sanitized snapshot.
#[must_use]
pub fn shared_snapshot_id(sanitized_snapshot_id: &str) -> String {
    format!("{sanitized_snapshot_id}-shared")
}

/// Instance identifier attached to a temporary cluster.
#[must_use]
pub fn instance_id(cluster_id: &str) -> String {
    format!("{cluster_id}-inst")
}

/// Knobs for one pipeline run.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineSettings {
    /// Production cluster whose latest automated snapshot is cloned.
    pub source_cluster_id: String,
    /// Serverless capacity ceiling of the temporary cluster.
    pub max_capacity: f64,
    /// Connection pool size used while sanitizing.
    pub max_connections: u32,
    /// Encryption key for the shared copy.
    pub share_kms_key_id: Option<String>,
    /// Accounts granted restore permission on the shared copy.
    pub share_account_ids: Vec<String>,
    /// Region the sanitized snapshot is copied from.
    pub source_region: Option<String>,
    /// Connect to [`LOCAL_HOST`] instead of the cluster endpoint.
    pub local: bool,
    /// Polling budget for every wait.
    pub wait: WaitPolicy,
    /// Optional server-side statement timeout while sanitizing.
    pub statement_timeout: Option<Duration>,
    /// Tear down temporary resources when a stage fails.
    pub cleanup_on_failure: bool,
}

impl PipelineSettings {
    /// Settings with the defaults for everything but the source cluster.
    #[must_use]
    pub fn new(source_cluster_id: impl Into<String>) -> Self {
        Self {
            source_cluster_id: source_cluster_id.into(),
            max_capacity: 2.0,
            max_connections: 20,
            share_kms_key_id: None,
            share_account_ids: Vec::new(),
            source_region: None,
            local: false,
            wait: WaitPolicy::default(),
            statement_timeout: None,
            cleanup_on_failure: true,
        }
    }
}

/// Temporary resources created so far, recorded as soon as each create call
/// returns.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TemporaryResources {
    /// Sanitized snapshot identifier.
    pub sanitized_snapshot: Option<String>,
    /// Instance identifier.
    pub instance: Option<String>,
    /// Cluster identifier.
    pub cluster: Option<String>,
    /// Secret name.
    pub secret: Option<String>,
}

impl TemporaryResources {
    /// Whether nothing has been created yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sanitized_snapshot.is_none()
            && self.instance.is_none()
            && self.cluster.is_none()
            && self.secret.is_none()
    }
}

/// One cleanup step that did not complete.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CleanupFailure {
    /// Resource description, for example `instance 'tmp-inst'`.
    pub resource: String,
    /// Failure text.
    pub message: String,
}

/// Outcome of a cleanup pass.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CleanupReport {
    /// Resources deleted, in deletion order.
    pub deleted: Vec<String>,
    /// Steps that failed.
    pub failures: Vec<CleanupFailure>,
}

impl CleanupReport {
    /// Whether every step succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Joins every failure into one line, or `None` when clean.
    #[must_use]
    pub fn failure_summary(&self) -> Option<String> {
        if self.is_clean() {
            return None;
        }
        Some(
            self.failures
                .iter()
                .map(|failure| format!("{}: {}", failure.resource, failure.message))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Everything a successful run produced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PipelineRun {
    /// Snapshot the run started from.
    pub source_snapshot: Snapshot,
    /// Temporary cluster, as last described.
    pub cluster: Cluster,
    /// Temporary instance, as described once available.
    pub instance: Instance,
    /// Name of the secret holding the generated password.
    pub secret_name: String,
    /// Sanitized snapshot (deleted by cleanup).
    pub sanitized_snapshot: Snapshot,
    /// Shared copy that survives the run.
    pub shared_snapshot: Snapshot,
    /// Per-table sanitization output.
    pub sanitization: SanitizationReport,
    /// Cleanup outcome.
    pub cleanup: CleanupReport,
}

/// Cluster with its stored credential.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SecuredCluster {
    /// Cluster after the password change.
    pub cluster: Cluster,
    /// Secret name holding the password.
    pub secret_name: String,
}

/// Drives the stages against a provider, a secret store, and a database
/// connector.
#[derive(Debug)]
pub struct PipelineOrchestrator<C, S, K, R> {
    cloud: C,
    secrets: S,
    connector: K,
    reporter: R,
    settings: PipelineSettings,
}

impl<C, S, K, R> PipelineOrchestrator<C, S, K, R>
where
    C: ClusterApi,
    S: SecretStore,
    K: Connector,
    R: Reporter,
{
    /// Creates an orchestrator.
    #[must_use]
    pub const fn new(
        cloud: C,
        secrets: S,
        connector: K,
        reporter: R,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            cloud,
            secrets,
            connector,
            reporter,
            settings,
        }
    }

    /// Settings this orchestrator runs with.
    #[must_use]
    pub const fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Runs every stage and then cleans up.
    ///
    /// When a stage fails and `cleanup_on_failure` is set, temporary resources
    /// created so far are torn down best-effort and any teardown failure is
    /// appended to the error. The shared snapshot is never removed.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] for the first failing stage, or
    /// [`PipelineError::Teardown`] when the run succeeded but cleanup left
    /// resources behind.
    pub async fn execute(&self, policy: &SanitizationPolicy) -> Result<PipelineRun, PipelineError> {
        let mut created = TemporaryResources::default();
        let outcome = self.run_stages(policy, &mut created).await;

        match outcome {
            Ok(mut run) => {
                self.reporter.banner("Cleaning up resources");
                run.cleanup = self.cleanup(&created).await;
                self.reporter.line("");
                match run.cleanup.failure_summary() {
                    Some(message) => Err(PipelineError::Teardown {
                        shared_snapshot_id: run.shared_snapshot.id,
                        message,
                    }),
                    None => Ok(run),
                }
            }
            Err(err) if self.settings.cleanup_on_failure && !created.is_empty() => {
                warn!(stage = %err.stage(), error = %err, "stage failed; tearing down temporary resources");
                self.reporter.banner("Cleaning up after failure");
                let report = self.cleanup(&created).await;
                Err(err.with_teardown_note(report.failure_summary()))
            }
            Err(err) => Err(err),
        }
    }

    async fn run_stages(
        &self,
        policy: &SanitizationPolicy,
        created: &mut TemporaryResources,
    ) -> Result<PipelineRun, PipelineError> {
        self.reporter.banner("Finding latest snapshot");
        let source_snapshot = self.locate_latest_snapshot().await?;
        self.reporter
            .line(&format!("Latest snapshot: {}", source_snapshot.id));
        self.reporter.line("");

        self.reporter.banner("Restoring snapshot");
        let restored = self.restore_cluster(&source_snapshot, created).await?;
        self.reporter
            .line(&format!("Temporary cluster: {}", restored.id));
        self.reporter.line("");

        self.reporter.banner("Rotating password");
        let secured = self.rotate_credentials(restored, created).await?;
        self.reporter
            .line(&format!("Secret name: {}", secured.secret_name));
        self.reporter.line("");

        self.reporter.banner("Creating instance");
        let instance = self.create_instance(&secured.cluster, created).await?;
        self.reporter
            .line(&format!("Temporary instance: {}", instance.id));
        self.reporter.line("");

        self.reporter.banner("Sanitizing");
        let sanitization = self.sanitize(&secured, &instance, policy).await?;
        for table in &sanitization.tables {
            self.reporter.line(&format!(
                "{} rows sanitized in table '{}'",
                table.rows, table.table
            ));
        }
        self.reporter.line("");

        self.reporter.banner("Creating sanitized snapshot");
        let sanitized_snapshot = self
            .create_sanitized_snapshot(&secured.cluster, created)
            .await?;
        self.reporter
            .line(&format!("Sanitized snapshot: {}", sanitized_snapshot.id));
        self.reporter.line("");

        self.reporter.banner("Creating shared snapshot");
        let shared_snapshot = self.share_snapshot(&sanitized_snapshot).await?;
        self.reporter
            .line(&format!("Shared snapshot: {}", shared_snapshot.id));
        self.reporter.line("");

        Ok(PipelineRun {
            source_snapshot,
            cluster: secured.cluster,
            instance,
            secret_name: secured.secret_name,
            sanitized_snapshot,
            shared_snapshot,
            sanitization,
            cleanup: CleanupReport::default(),
        })
    }

    async fn wait_for(
        &self,
        stage: Stage,
        waiter: Waiter,
        resource_id: &str,
        label: &str,
        timeout_message: &str,
    ) -> Result<(), PipelineError> {
        self.settle(waiter, resource_id, label, timeout_message)
            .await
            .map_err(|err| PipelineError::wait(stage, err))
    }

    async fn settle(
        &self,
        waiter: Waiter,
        resource_id: &str,
        label: &str,
        timeout_message: &str,
    ) -> Result<(), WaitError> {
        let interval = self.settings.wait.interval;
        await_terminal(
            &self.reporter,
            label,
            timeout_message,
            self.settings.wait,
            || self.cloud.wait_until(waiter, resource_id, interval),
        )
        .await
        .map(|_| ())
    }

    /// Returns the automated snapshot of the source cluster with the newest
    /// creation time. Equal timestamps keep listing order, so the last one
    /// listed wins.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NotFound`] when the cluster has no automated
    /// snapshots.
    pub async fn locate_latest_snapshot(&self) -> Result<Snapshot, PipelineError> {
        let query = SnapshotQuery::automated_for(&self.settings.source_cluster_id);
        let mut snapshots = self
            .cloud
            .list_snapshots(&query)
            .await
            .map_err(|err| PipelineError::provider(Stage::LocateSnapshot, err))?;
        snapshots.sort_by_key(|snapshot| snapshot.created_at);
        let latest = snapshots.pop().ok_or_else(|| PipelineError::NotFound {
            cluster_id: self.settings.source_cluster_id.clone(),
        })?;
        info!(snapshot = %latest.id, created_at = %latest.created_at, "located latest snapshot");
        Ok(latest)
    }

    /// Restores `snapshot` into a temporary cluster configured like the
    /// source cluster, waits for it, and applies hardening settings.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when a provider call fails or the cluster
    /// does not become available.
    pub async fn restore_cluster(
        &self,
        snapshot: &Snapshot,
        created: &mut TemporaryResources,
    ) -> Result<Cluster, PipelineError> {
        let source = self
            .cloud
            .describe_cluster(&snapshot.cluster_id)
            .await
            .map_err(|err| PipelineError::provider(Stage::Restore, err))?;

        let request = RestoreClusterRequest {
            cluster_id: snapshot.restored_cluster_id().to_owned(),
            snapshot_id: snapshot.id.clone(),
            engine: snapshot.engine.clone(),
            engine_version: snapshot.engine_version.clone(),
            availability_zones: snapshot.availability_zones.clone(),
            subnet_group: source.subnet_group,
            database_name: source.database_name,
            security_group_ids: source.security_group_ids,
            parameter_group: source.parameter_group,
            tags: snapshot.tags.clone(),
            min_capacity: MIN_CAPACITY,
            max_capacity: self.settings.max_capacity,
        };
        let restored = self
            .cloud
            .restore_cluster(&request)
            .await
            .map_err(|err| PipelineError::provider(Stage::Restore, err))?;
        created.cluster = Some(restored.id.clone());
        info!(cluster = %restored.id, snapshot = %snapshot.id, "restore started");

        self.wait_for(
            Stage::Restore,
            Waiter::ClusterAvailable,
            &restored.id,
            "Restoring to temporary cluster",
            "Timed out when restoring cluster",
        )
        .await?;

        self.cloud
            .modify_cluster(&ClusterModification::hardening(&restored.id))
            .await
            .map_err(|err| PipelineError::provider(Stage::Restore, err))
    }

    /// Generates a password, stores it, waits for the cluster, and applies
    /// the password.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when storing the secret or modifying the
    /// cluster fails, or the cluster does not become available.
    pub async fn rotate_credentials(
        &self,
        cluster: Cluster,
        created: &mut TemporaryResources,
    ) -> Result<SecuredCluster, PipelineError> {
        let password = generate_password();
        let name = secret_name(&cluster.id);
        let description = format!("Password for {} RDS cluster", cluster.id);
        self.secrets
            .put_secret(&name, &password, &description)
            .await
            .map_err(|err| PipelineError::provider(Stage::RotateCredentials, err))?;
        created.secret = Some(name.clone());
        info!(cluster = %cluster.id, secret = %name, "stored generated password");

        self.wait_for(
            Stage::RotateCredentials,
            Waiter::ClusterAvailable,
            &cluster.id,
            "Waiting until cluster is available",
            "Timed out waiting for cluster to become available",
        )
        .await?;

        let updated = self
            .cloud
            .modify_cluster(&ClusterModification::password(&cluster.id, password))
            .await
            .map_err(|err| PipelineError::provider(Stage::RotateCredentials, err))?;
        Ok(SecuredCluster {
            cluster: merge_cluster(cluster, updated),
            secret_name: name,
        })
    }

    /// Attaches a serverless instance and returns its settled descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when a provider call fails or the instance
    /// does not become available.
    pub async fn create_instance(
        &self,
        cluster: &Cluster,
        created: &mut TemporaryResources,
    ) -> Result<Instance, PipelineError> {
        let request = CreateInstanceRequest {
            instance_id: instance_id(&cluster.id),
            cluster_id: cluster.id.clone(),
            instance_class: INSTANCE_CLASS.to_owned(),
            engine: cluster.engine.clone(),
            subnet_group: cluster.subnet_group.clone(),
            backup_retention_days: 0,
            auto_minor_version_upgrade: false,
        };
        let pending = self
            .cloud
            .create_instance(&request)
            .await
            .map_err(|err| PipelineError::provider(Stage::CreateInstance, err))?;
        created.instance = Some(pending.id.clone());
        info!(instance = %pending.id, cluster = %cluster.id, "instance creation started");

        self.wait_for(
            Stage::CreateInstance,
            Waiter::InstanceAvailable,
            &pending.id,
            "Creating instance",
            "Timed out when creating instance",
        )
        .await?;

        self.cloud
            .describe_instance(&pending.id)
            .await
            .map_err(|err| PipelineError::provider(Stage::CreateInstance, err))
    }

    /// Opens a pool against the temporary cluster and applies `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when the password cannot be read, the
    /// cluster is unreachable, or a statement fails.
    pub async fn sanitize(
        &self,
        secured: &SecuredCluster,
        instance: &Instance,
        policy: &SanitizationPolicy,
    ) -> Result<SanitizationReport, PipelineError> {
        let password = self
            .secrets
            .get_secret(&secured.secret_name)
            .await
            .map_err(|err| PipelineError::provider(Stage::Sanitize, err))?;
        let params = self.connection_params(&secured.cluster, instance, password)?;
        info!(
            host = %params.host,
            port = params.port,
            database = %params.database,
            "connecting to temporary cluster"
        );

        let executor = self
            .connector
            .connect(&params)
            .await
            .map_err(|source| PipelineError::Connect {
                message: source.to_string(),
                source,
            })?;
        SanitizationEngine::new(&executor, &self.reporter)
            .run(policy)
            .await
            .map_err(|source| PipelineError::Sanitize {
                message: source.to_string(),
                source,
            })
    }

    fn connection_params(
        &self,
        cluster: &Cluster,
        instance: &Instance,
        password: Secret,
    ) -> Result<ConnectionParams, PipelineError> {
        let missing = |field: &'static str| {
            PipelineError::provider(
                Stage::Sanitize,
                crate::cloud::ProviderError::MissingField {
                    operation: "DescribeDBClusters",
                    field,
                },
            )
        };
        let host = if self.settings.local {
            LOCAL_HOST.to_owned()
        } else {
            cluster
                .endpoint
                .clone()
                .or_else(|| instance.endpoint.clone())
                .ok_or_else(|| missing("Endpoint"))?
        };
        let port = cluster
            .port
            .or(instance.port)
            .ok_or_else(|| missing("Port"))?;
        let username = cluster
            .master_username
            .clone()
            .ok_or_else(|| missing("MasterUsername"))?;
        Ok(ConnectionParams {
            host,
            port,
            database: cluster
                .database_name
                .clone()
                .unwrap_or_else(|| DEFAULT_DATABASE.to_owned()),
            username,
            password,
            max_connections: self.settings.max_connections,
            statement_timeout: self.settings.statement_timeout,
        })
    }

    /// Snapshots the sanitized cluster under `<cluster>-sanitized`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when the snapshot cannot be created or does
    /// not become available.
    pub async fn create_sanitized_snapshot(
        &self,
        cluster: &Cluster,
        created: &mut TemporaryResources,
    ) -> Result<Snapshot, PipelineError> {
        let snapshot = self
            .cloud
            .create_snapshot(&cluster.id, &sanitized_snapshot_id(&cluster.id))
            .await
            .map_err(|err| PipelineError::provider(Stage::Snapshot, err))?;
        created.sanitized_snapshot = Some(snapshot.id.clone());

        self.wait_for(
            Stage::Snapshot,
            Waiter::SnapshotAvailable,
            &snapshot.id,
            "Creating snapshot",
            "Timed out waiting for snapshot to become available",
        )
        .await?;
        Ok(snapshot)
    }

    /// Copies the sanitized snapshot to `<snapshot>-shared` and grants
    /// restore permission to the configured accounts.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when the copy or share fails, or the copy
    /// does not become available.
    pub async fn share_snapshot(&self, sanitized: &Snapshot) -> Result<Snapshot, PipelineError> {
        let request = CopySnapshotRequest {
            source_snapshot_id: sanitized.id.clone(),
            target_snapshot_id: shared_snapshot_id(&sanitized.id),
            kms_key_id: self.settings.share_kms_key_id.clone(),
            source_region: self.settings.source_region.clone(),
        };
        let copy = self
            .cloud
            .copy_snapshot(&request)
            .await
            .map_err(|err| PipelineError::provider(Stage::Share, err))?;

        self.wait_for(
            Stage::Share,
            Waiter::SnapshotAvailable,
            &copy.id,
            "Copying snapshot",
            "Timed out when copying snapshot",
        )
        .await?;

        if self.settings.share_account_ids.is_empty() {
            info!(snapshot = %copy.id, "no accounts configured; skipping share");
        } else {
            self.cloud
                .share_snapshot(&copy.id, &self.settings.share_account_ids)
                .await
                .map_err(|err| PipelineError::provider(Stage::Share, err))?;
            info!(snapshot = %copy.id, accounts = ?self.settings.share_account_ids, "snapshot shared");
        }
        Ok(copy)
    }

    /// Deletes the recorded temporary resources: sanitized snapshot, then
    /// instance, then cluster, then secret. Failed steps are reported and do
    /// not stop later steps.
    pub async fn cleanup(&self, created: &TemporaryResources) -> CleanupReport {
        let mut report = CleanupReport::default();

        if let Some(id) = &created.sanitized_snapshot {
            let outcome = self
                .delete_and_wait(
                    self.cloud.delete_snapshot(id),
                    Waiter::SnapshotDeleted,
                    id,
                    "Deleting sanitized snapshot",
                    "Timed out when deleting sanitized snapshot",
                )
                .await;
            self.record(&mut report, format!("snapshot '{id}'"), outcome);
        }
        if let Some(id) = &created.instance {
            let outcome = self
                .delete_and_wait(
                    self.cloud.delete_instance(id),
                    Waiter::InstanceDeleted,
                    id,
                    "Deleting temporary instance",
                    "Timed out when deleting temporary instance",
                )
                .await;
            self.record(&mut report, format!("instance '{id}'"), outcome);
        }
        if let Some(id) = &created.cluster {
            let outcome = self
                .delete_and_wait(
                    self.cloud.delete_cluster(id),
                    Waiter::ClusterDeleted,
                    id,
                    "Deleting temporary cluster",
                    "Timed out when deleting temporary cluster",
                )
                .await;
            self.record(&mut report, format!("cluster '{id}'"), outcome);
        }
        if let Some(name) = &created.secret {
            let outcome = self
                .secrets
                .delete_secret(name)
                .await
                .map_err(|err| err.to_string());
            self.record(&mut report, format!("secret '{name}'"), outcome);
        }
        report
    }

    async fn delete_and_wait(
        &self,
        delete: crate::cloud::CloudFuture<'_, ()>,
        waiter: Waiter,
        id: &str,
        label: &str,
        timeout_message: &str,
    ) -> Result<(), String> {
        match delete.await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => return Ok(()),
            Err(err) => return Err(err.to_string()),
        }
        self.settle(waiter, id, label, timeout_message)
            .await
            .map_err(|err| err.to_string())
    }

    fn record(&self, report: &mut CleanupReport, resource: String, outcome: Result<(), String>) {
        match outcome {
            Ok(()) => {
                self.reporter.line(&format!("Deleted {resource}"));
                info!(%resource, "deleted temporary resource");
                report.deleted.push(resource);
            }
            Err(message) => {
                self.reporter
                    .line(&format!("Failed to delete {resource}: {message}"));
                warn!(%resource, error = %message, "cleanup step failed");
                report.failures.push(CleanupFailure { resource, message });
            }
        }
    }
}

/// Keeps descriptor fields a modify response may omit.
fn merge_cluster(previous: Cluster, updated: Cluster) -> Cluster {
    Cluster {
        endpoint: updated.endpoint.or(previous.endpoint),
        port: updated.port.or(previous.port),
        master_username: updated.master_username.or(previous.master_username),
        database_name: updated.database_name.or(previous.database_name),
        subnet_group: updated.subnet_group.or(previous.subnet_group),
        ..updated
    }
}

fn generate_password() -> Secret {
    let mut rng = rand::rng();
    Secret::new(
        (0..PASSWORD_LENGTH)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect(),
    )
}
