//! Test support utilities shared across unit and integration tests.
//!
//! The doubles here stand in for the provider, the secret store, the SQL
//! driver and standard output so pipeline behaviour can be driven without
//! touching real infrastructure.

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::ffi::OsString;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard as StdMutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};

use crate::cloud::{
    CloudFuture, Cluster, ClusterApi, ClusterModification, CopySnapshotRequest,
    CreateInstanceRequest, Instance, ProviderError, RestoreClusterRequest, Secret, SecretStore,
    Snapshot, SnapshotQuery, SnapshotType, Waiter,
};
use crate::report::{Reporter, banner_text};
use crate::sql::{
    ColumnTypes, ConnectionParams, Connector, SqlFuture, Statement, StatementError,
    StatementExecutor, TableRef,
};
use crate::wait::PollOutcome;

fn locked<T>(mutex: &StdMutex<T>) -> StdMutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Port reported for every fake endpoint.
pub const FAKE_PORT: u16 = 5432;

#[derive(Debug, Default)]
struct CloudState {
    clusters: BTreeMap<String, Cluster>,
    instances: BTreeMap<String, Instance>,
    snapshots: BTreeMap<String, (Snapshot, SnapshotType)>,
    shares: BTreeMap<String, Vec<String>>,
    passwords: BTreeMap<String, Secret>,
    failures: BTreeMap<String, ProviderError>,
    stalled: BTreeSet<(String, String)>,
    copies: Vec<CopySnapshotRequest>,
    calls: Vec<String>,
}

/// In-memory provider that applies every mutation immediately.
///
/// Waits succeed as soon as the resource is in the awaited state unless the
/// wait was stalled with [`FakeCloud::stall`].
#[derive(Clone, Debug, Default)]
pub struct FakeCloud {
    state: Arc<StdMutex<CloudState>>,
}

impl FakeCloud {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a cluster.
    pub fn add_cluster(&self, cluster: Cluster) {
        locked(&self.state)
            .clusters
            .insert(cluster.id.clone(), cluster);
    }

    /// Seeds a snapshot of the given type.
    pub fn add_snapshot(&self, snapshot: Snapshot, snapshot_type: SnapshotType) {
        locked(&self.state)
            .snapshots
            .insert(snapshot.id.clone(), (snapshot, snapshot_type));
    }

    /// Makes every call of `operation` fail with `error`.
    ///
    /// Delete operations can be scoped to one resource with
    /// `delete_snapshot:<id>`.
    pub fn fail_on(&self, operation: &str, error: ProviderError) {
        locked(&self.state)
            .failures
            .insert(operation.to_owned(), error);
    }

    /// Makes every wait for `waiter` on `resource_id` report pending.
    pub fn stall(&self, waiter: Waiter, resource_id: &str) {
        locked(&self.state)
            .stalled
            .insert((waiter.as_str().to_owned(), resource_id.to_owned()));
    }

    /// Operations issued so far, as `operation:resource` strings.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        locked(&self.state).calls.clone()
    }

    /// Identifiers of the snapshots that currently exist.
    #[must_use]
    pub fn snapshot_ids(&self) -> Vec<String> {
        locked(&self.state).snapshots.keys().cloned().collect()
    }

    /// Identifiers of the clusters that currently exist.
    #[must_use]
    pub fn cluster_ids(&self) -> Vec<String> {
        locked(&self.state).clusters.keys().cloned().collect()
    }

    /// Identifiers of the instances that currently exist.
    #[must_use]
    pub fn instance_ids(&self) -> Vec<String> {
        locked(&self.state).instances.keys().cloned().collect()
    }

    /// Accounts a snapshot has been shared with.
    #[must_use]
    pub fn shared_accounts(&self, snapshot_id: &str) -> Vec<String> {
        locked(&self.state)
            .shares
            .get(snapshot_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Copy requests received, in order.
    #[must_use]
    pub fn copy_requests(&self) -> Vec<CopySnapshotRequest> {
        locked(&self.state).copies.clone()
    }

    /// Whether a master password was applied to the cluster.
    #[must_use]
    pub fn password_applied(&self, cluster_id: &str) -> Option<Secret> {
        locked(&self.state).passwords.get(cluster_id).cloned()
    }

    fn begin(&self, operation: &str, resource: &str) -> Result<StdMutexGuard<'_, CloudState>, ProviderError> {
        let mut state = locked(&self.state);
        state.calls.push(format!("{operation}:{resource}"));
        let scoped = format!("{operation}:{resource}");
        if let Some(error) = state
            .failures
            .get(&scoped)
            .or_else(|| state.failures.get(operation))
        {
            return Err(error.clone());
        }
        Ok(state)
    }
}

fn not_found(resource: &'static str, id: &str) -> ProviderError {
    ProviderError::NotFound {
        resource,
        id: id.to_owned(),
    }
}

fn already_exists(id: &str) -> ProviderError {
    ProviderError::Sdk {
        code: Some(String::from("AlreadyExistsFault")),
        message: format!("{id} already exists"),
    }
}

impl ClusterApi for FakeCloud {
    fn list_snapshots<'a>(&'a self, query: &'a SnapshotQuery) -> CloudFuture<'a, Vec<Snapshot>> {
        Box::pin(async move {
            let scope = query.cluster_id.as_deref().unwrap_or("*");
            let state = self.begin("list_snapshots", scope)?;
            Ok(state
                .snapshots
                .values()
                .filter(|(_, kind)| *kind == query.snapshot_type)
                .filter(|(snapshot, _)| {
                    query
                        .cluster_id
                        .as_ref()
                        .is_none_or(|cluster| &snapshot.cluster_id == cluster)
                })
                .map(|(snapshot, _)| snapshot.clone())
                .collect())
        })
    }

    fn describe_cluster<'a>(&'a self, cluster_id: &'a str) -> CloudFuture<'a, Cluster> {
        Box::pin(async move {
            let state = self.begin("describe_cluster", cluster_id)?;
            state
                .clusters
                .get(cluster_id)
                .cloned()
                .ok_or_else(|| not_found("cluster", cluster_id))
        })
    }

    fn restore_cluster<'a>(
        &'a self,
        request: &'a RestoreClusterRequest,
    ) -> CloudFuture<'a, Cluster> {
        Box::pin(async move {
            let mut state = self.begin("restore_cluster", &request.cluster_id)?;
            if !state.snapshots.contains_key(&request.snapshot_id) {
                return Err(not_found("snapshot", &request.snapshot_id));
            }
            if state.clusters.contains_key(&request.cluster_id) {
                return Err(already_exists(&request.cluster_id));
            }
            let cluster = Cluster {
                id: request.cluster_id.clone(),
                engine: request.engine.clone(),
                engine_version: request.engine_version.clone(),
                subnet_group: request.subnet_group.clone(),
                database_name: request.database_name.clone(),
                security_group_ids: request.security_group_ids.clone(),
                parameter_group: request.parameter_group.clone(),
                master_username: Some(String::from("postgres")),
                endpoint: Some(format!("{}.cluster.local", request.cluster_id)),
                port: Some(FAKE_PORT),
                status: Some(String::from("available")),
            };
            state
                .clusters
                .insert(cluster.id.clone(), cluster.clone());
            Ok(cluster)
        })
    }

    fn modify_cluster<'a>(
        &'a self,
        modification: &'a ClusterModification,
    ) -> CloudFuture<'a, Cluster> {
        Box::pin(async move {
            let mut state = self.begin("modify_cluster", &modification.cluster_id)?;
            let cluster = state
                .clusters
                .get(&modification.cluster_id)
                .cloned()
                .ok_or_else(|| not_found("cluster", &modification.cluster_id))?;
            if let Some(password) = &modification.master_password {
                state
                    .passwords
                    .insert(modification.cluster_id.clone(), password.clone());
            }
            Ok(cluster)
        })
    }

    fn create_instance<'a>(
        &'a self,
        request: &'a CreateInstanceRequest,
    ) -> CloudFuture<'a, Instance> {
        Box::pin(async move {
            let mut state = self.begin("create_instance", &request.instance_id)?;
            if !state.clusters.contains_key(&request.cluster_id) {
                return Err(not_found("cluster", &request.cluster_id));
            }
            if state.instances.contains_key(&request.instance_id) {
                return Err(already_exists(&request.instance_id));
            }
            let created = Instance {
                id: request.instance_id.clone(),
                cluster_id: Some(request.cluster_id.clone()),
                endpoint: None,
                port: None,
                status: Some(String::from("creating")),
            };
            let settled = Instance {
                endpoint: Some(format!("{}.instance.local", request.instance_id)),
                port: Some(FAKE_PORT),
                status: Some(String::from("available")),
                ..created.clone()
            };
            state.instances.insert(settled.id.clone(), settled);
            Ok(created)
        })
    }

    fn describe_instance<'a>(&'a self, instance_id: &'a str) -> CloudFuture<'a, Instance> {
        Box::pin(async move {
            let state = self.begin("describe_instance", instance_id)?;
            state
                .instances
                .get(instance_id)
                .cloned()
                .ok_or_else(|| not_found("instance", instance_id))
        })
    }

    fn create_snapshot<'a>(
        &'a self,
        cluster_id: &'a str,
        snapshot_id: &'a str,
    ) -> CloudFuture<'a, Snapshot> {
        Box::pin(async move {
            let mut state = self.begin("create_snapshot", snapshot_id)?;
            let cluster = state
                .clusters
                .get(cluster_id)
                .cloned()
                .ok_or_else(|| not_found("cluster", cluster_id))?;
            if state.snapshots.contains_key(snapshot_id) {
                return Err(already_exists(snapshot_id));
            }
            let snapshot = Snapshot {
                id: snapshot_id.to_owned(),
                cluster_id: cluster.id,
                created_at: Utc::now(),
                engine: cluster.engine,
                engine_version: cluster.engine_version,
                availability_zones: Vec::new(),
                tags: Vec::new(),
            };
            state.snapshots.insert(
                snapshot.id.clone(),
                (snapshot.clone(), SnapshotType::Manual),
            );
            Ok(snapshot)
        })
    }

    fn copy_snapshot<'a>(&'a self, request: &'a CopySnapshotRequest) -> CloudFuture<'a, Snapshot> {
        Box::pin(async move {
            let mut state = self.begin("copy_snapshot", &request.target_snapshot_id)?;
            state.copies.push(request.clone());
            let (source, _) = state
                .snapshots
                .get(&request.source_snapshot_id)
                .cloned()
                .ok_or_else(|| not_found("snapshot", &request.source_snapshot_id))?;
            if state.snapshots.contains_key(&request.target_snapshot_id) {
                return Err(already_exists(&request.target_snapshot_id));
            }
            let copy = Snapshot {
                id: request.target_snapshot_id.clone(),
                created_at: Utc::now(),
                ..source
            };
            state
                .snapshots
                .insert(copy.id.clone(), (copy.clone(), SnapshotType::Manual));
            Ok(copy)
        })
    }

    fn share_snapshot<'a>(
        &'a self,
        snapshot_id: &'a str,
        account_ids: &'a [String],
    ) -> CloudFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.begin("share_snapshot", snapshot_id)?;
            if !state.snapshots.contains_key(snapshot_id) {
                return Err(not_found("snapshot", snapshot_id));
            }
            state
                .shares
                .entry(snapshot_id.to_owned())
                .or_default()
                .extend(account_ids.iter().cloned());
            Ok(())
        })
    }

    fn delete_snapshot<'a>(&'a self, snapshot_id: &'a str) -> CloudFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.begin("delete_snapshot", snapshot_id)?;
            state
                .snapshots
                .remove(snapshot_id)
                .map(|_| ())
                .ok_or_else(|| not_found("snapshot", snapshot_id))
        })
    }

    fn delete_instance<'a>(&'a self, instance_id: &'a str) -> CloudFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.begin("delete_instance", instance_id)?;
            state
                .instances
                .remove(instance_id)
                .map(|_| ())
                .ok_or_else(|| not_found("instance", instance_id))
        })
    }

    fn delete_cluster<'a>(&'a self, cluster_id: &'a str) -> CloudFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.begin("delete_cluster", cluster_id)?;
            let has_instances = state
                .instances
                .values()
                .any(|instance| instance.cluster_id.as_deref() == Some(cluster_id));
            if has_instances {
                return Err(ProviderError::Sdk {
                    code: Some(String::from("InvalidDBClusterStateFault")),
                    message: format!("cluster {cluster_id} still has instances"),
                });
            }
            state
                .clusters
                .remove(cluster_id)
                .map(|_| ())
                .ok_or_else(|| not_found("cluster", cluster_id))
        })
    }

    fn wait_until<'a>(
        &'a self,
        waiter: Waiter,
        resource_id: &'a str,
        _interval: Duration,
    ) -> CloudFuture<'a, PollOutcome> {
        Box::pin(async move {
            let state = self.begin(waiter.as_str(), resource_id)?;
            if state
                .stalled
                .contains(&(waiter.as_str().to_owned(), resource_id.to_owned()))
            {
                return Ok(PollOutcome::Pending);
            }
            let exists = match waiter.resource() {
                "cluster" => state.clusters.contains_key(resource_id),
                "instance" => state.instances.contains_key(resource_id),
                _ => state.snapshots.contains_key(resource_id),
            };
            if exists == waiter.awaits_deletion() {
                Ok(PollOutcome::Pending)
            } else {
                Ok(PollOutcome::Reached)
            }
        })
    }
}

/// Secret store that keeps values in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySecretStore {
    secrets: Arc<StdMutex<BTreeMap<String, Secret>>>,
    fail_deletes: Arc<StdMutex<bool>>,
}

impl MemorySecretStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names currently stored.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        locked(&self.secrets).keys().cloned().collect()
    }

    /// Makes every delete fail.
    pub fn fail_deletes(&self) {
        *locked(&self.fail_deletes) = true;
    }
}

impl SecretStore for MemorySecretStore {
    fn put_secret<'a>(
        &'a self,
        name: &'a str,
        value: &'a Secret,
        _description: &'a str,
    ) -> CloudFuture<'a, ()> {
        Box::pin(async move {
            locked(&self.secrets).insert(name.to_owned(), value.clone());
            Ok(())
        })
    }

    fn get_secret<'a>(&'a self, name: &'a str) -> CloudFuture<'a, Secret> {
        Box::pin(async move {
            locked(&self.secrets)
                .get(name)
                .cloned()
                .ok_or_else(|| not_found("parameter", name))
        })
    }

    fn delete_secret<'a>(&'a self, name: &'a str) -> CloudFuture<'a, ()> {
        Box::pin(async move {
            if *locked(&self.fail_deletes) {
                return Err(ProviderError::Sdk {
                    code: Some(String::from("InternalServerError")),
                    message: String::from("simulated delete failure"),
                });
            }
            locked(&self.secrets)
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| not_found("parameter", name))
        })
    }
}

/// Lifecycle event recorded by [`RecordingExecutor`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExecutorEvent {
    /// A statement was submitted.
    Started(String),
    /// A statement completed.
    Finished(String),
}

#[derive(Debug, Default)]
struct ExecutorState {
    statements: Vec<Statement>,
    events: Vec<ExecutorEvent>,
    rows: Vec<(String, u64)>,
    failures: Vec<String>,
    delays: Vec<(String, Duration)>,
    column_types: BTreeMap<String, ColumnTypes>,
}

impl ExecutorState {
    fn lookup<T: Copy>(entries: &[(String, T)], text: &str) -> Option<T> {
        entries
            .iter()
            .find(|(fragment, _)| text.contains(fragment.as_str()))
            .map(|(_, value)| *value)
    }
}

/// Executor that records statements and returns scripted row counts.
#[derive(Clone, Debug, Default)]
pub struct RecordingExecutor {
    state: Arc<StdMutex<ExecutorState>>,
}

impl RecordingExecutor {
    /// Creates an executor that reports zero rows for every statement.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `rows` for statements whose text contains `fragment`.
    #[must_use]
    pub fn with_rows(self, fragment: &str, rows: u64) -> Self {
        locked(&self.state).rows.push((fragment.to_owned(), rows));
        self
    }

    /// Fails statements whose text contains `fragment`.
    #[must_use]
    pub fn failing_on(self, fragment: &str) -> Self {
        locked(&self.state).failures.push(fragment.to_owned());
        self
    }

    /// Delays completion of statements whose text contains `fragment`.
    #[must_use]
    pub fn with_delay(self, fragment: &str, delay: Duration) -> Self {
        locked(&self.state)
            .delays
            .push((fragment.to_owned(), delay));
        self
    }

    /// Reports `types` as the columns of `table`, keyed by its unquoted name.
    #[must_use]
    pub fn with_column_types(self, table: &str, types: &[(&str, &str)]) -> Self {
        locked(&self.state).column_types.insert(
            table.to_owned(),
            types
                .iter()
                .map(|(column, type_name)| ((*column).to_owned(), (*type_name).to_owned()))
                .collect(),
        );
        self
    }

    /// Statements submitted so far, in submission order.
    #[must_use]
    pub fn statements(&self) -> Vec<Statement> {
        locked(&self.state).statements.clone()
    }

    /// Start and finish events, in the order they happened.
    #[must_use]
    pub fn events(&self) -> Vec<ExecutorEvent> {
        locked(&self.state).events.clone()
    }
}

impl StatementExecutor for RecordingExecutor {
    fn execute<'a>(&'a self, statement: &'a Statement) -> SqlFuture<'a, u64> {
        Box::pin(async move {
            let (delay, rows, fails) = {
                let mut state = locked(&self.state);
                state.statements.push(statement.clone());
                state
                    .events
                    .push(ExecutorEvent::Started(statement.text.clone()));
                (
                    ExecutorState::lookup(&state.delays, &statement.text),
                    ExecutorState::lookup(&state.rows, &statement.text).unwrap_or(0),
                    state
                        .failures
                        .iter()
                        .any(|fragment| statement.text.contains(fragment.as_str())),
                )
            };
            if let Some(pause) = delay {
                tokio::time::sleep(pause).await;
            }
            locked(&self.state)
                .events
                .push(ExecutorEvent::Finished(statement.text.clone()));
            if fails {
                return Err(StatementError::Execute {
                    statement: statement.text.clone(),
                    source: sqlx::Error::Protocol(String::from("simulated statement failure")),
                });
            }
            Ok(rows)
        })
    }

    fn column_types<'a>(&'a self, table: TableRef<'a>) -> SqlFuture<'a, ColumnTypes> {
        Box::pin(async move {
            Ok(locked(&self.state)
                .column_types
                .get(table.name)
                .cloned()
                .unwrap_or_default())
        })
    }
}

/// Connector that hands out a shared [`RecordingExecutor`].
#[derive(Clone, Debug, Default)]
pub struct RecordingConnector {
    executor: RecordingExecutor,
    connections: Arc<StdMutex<Vec<ConnectionParams>>>,
}

impl RecordingConnector {
    /// Wraps an executor.
    #[must_use]
    pub fn new(executor: RecordingExecutor) -> Self {
        Self {
            executor,
            connections: Arc::default(),
        }
    }

    /// Parameters of every connection opened so far.
    #[must_use]
    pub fn connections(&self) -> Vec<ConnectionParams> {
        locked(&self.connections).clone()
    }

    /// The executor handed to callers.
    #[must_use]
    pub const fn executor(&self) -> &RecordingExecutor {
        &self.executor
    }
}

impl Connector for RecordingConnector {
    type Executor = RecordingExecutor;

    fn connect<'a>(&'a self, params: &'a ConnectionParams) -> SqlFuture<'a, Self::Executor> {
        Box::pin(async move {
            locked(&self.connections).push(params.clone());
            Ok(self.executor.clone())
        })
    }
}

#[derive(Debug, Default)]
struct ReporterState {
    banners: Vec<String>,
    lines: Vec<String>,
    ticks: u32,
}

/// Reporter that captures output for assertions.
#[derive(Clone, Debug, Default)]
pub struct RecordingReporter {
    state: Arc<StdMutex<ReporterState>>,
}

impl RecordingReporter {
    /// Banner titles, in order.
    #[must_use]
    pub fn banners(&self) -> Vec<String> {
        locked(&self.state).banners.clone()
    }

    /// Result lines, in order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        locked(&self.state).lines.clone()
    }

    /// Progress indicators emitted.
    #[must_use]
    pub fn ticks(&self) -> u32 {
        locked(&self.state).ticks
    }

    /// Everything printed, rendered as an operator would see it.
    #[must_use]
    pub fn transcript(&self) -> String {
        let state = locked(&self.state);
        state
            .banners
            .iter()
            .map(|title| banner_text(title))
            .chain(state.lines.iter().cloned())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Reporter for RecordingReporter {
    fn banner(&self, title: &str) {
        locked(&self.state).banners.push(title.to_owned());
    }

    fn line(&self, message: &str) {
        locked(&self.state).lines.push(message.to_owned());
    }

    fn progress_start(&self, _message: &str) {}

    fn progress_tick(&self) {
        locked(&self.state).ticks += 1;
    }

    fn progress_end(&self) {}
}

/// Global mutex used to serialise environment mutation in tests.
pub static ENV_LOCK: Mutex<()> = Mutex::const_new(());

/// Guard that holds the env mutex and cleans up variables on drop.
pub struct EnvGuard {
    previous: Vec<(String, Option<OsString>)>,
    _guard: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Sets and clears environment variables while holding a global mutex.
    ///
    /// `None` values remove the variable for the lifetime of the guard.
    pub async fn set_vars(pairs: &[(&str, Option<&str>)]) -> Self {
        debug_assert!(
            {
                let mut seen = BTreeSet::new();
                pairs.iter().all(|(key, _)| seen.insert(*key))
            },
            "duplicate environment variable keys passed to EnvGuard::set_vars"
        );

        let guard = ENV_LOCK.lock().await;
        let mut previous = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let old = env::var_os(key);
            // SAFETY: Environment mutation is serialised by `ENV_LOCK`, preventing races.
            unsafe {
                match value {
                    Some(val) => env::set_var(key, val),
                    None => env::remove_var(key),
                }
            };
            previous.push(((*key).to_owned(), old));
        }

        Self {
            previous,
            _guard: guard,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, old) in &self.previous {
            // SAFETY: Environment mutation is serialised by holding `_guard`.
            unsafe {
                match old {
                    Some(val) => env::set_var(key, val),
                    None => env::remove_var(key),
                }
            }
        }
    }
}

/// Builds a snapshot descriptor for tests.
#[must_use]
pub fn snapshot(id: &str, cluster_id: &str, created_at: DateTime<Utc>) -> Snapshot {
    Snapshot {
        id: id.to_owned(),
        cluster_id: cluster_id.to_owned(),
        created_at,
        engine: String::from("aurora-postgresql"),
        engine_version: Some(String::from("15.4")),
        availability_zones: vec![String::from("eu-west-1a")],
        tags: Vec::new(),
    }
}

/// Builds a source cluster descriptor for tests.
#[must_use]
pub fn source_cluster(id: &str) -> Cluster {
    Cluster {
        id: id.to_owned(),
        engine: String::from("aurora-postgresql"),
        engine_version: Some(String::from("15.4")),
        subnet_group: Some(String::from("private")),
        database_name: Some(String::from("app")),
        security_group_ids: vec![String::from("sg-123")],
        parameter_group: Some(String::from("default.aurora-postgresql15")),
        master_username: Some(String::from("postgres")),
        endpoint: Some(format!("{id}.cluster.local")),
        port: Some(FAKE_PORT),
        status: Some(String::from("available")),
    }
}
