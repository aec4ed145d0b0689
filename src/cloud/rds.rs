//! [`ClusterApi`] backed by the AWS database service SDK.

use std::time::Duration;

use aws_sdk_rds::Client;
use aws_sdk_rds::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_rds::types::{
    DbCluster, DbClusterSnapshot, DbInstance, ServerlessV2ScalingConfiguration, Tag as RdsTag,
};
use chrono::{DateTime, Utc};
use tokio::time::sleep;
use tracing::debug;

use super::{
    AwsContext, CloudFuture, Cluster, ClusterApi, ClusterModification, CopySnapshotRequest,
    CreateInstanceRequest, Instance, ProviderError, RestoreClusterRequest, Snapshot,
    SnapshotQuery, Tag, Waiter, classify_provider_error,
};
use crate::wait::PollOutcome;

/// Status checks performed by one short provider-side wait.
const CHECKS_PER_WAIT: u32 = 2;

/// Engine mode used for restored clusters.
const ENGINE_MODE: &str = "provisioned";

/// Snapshot attribute that controls cross-account restore permission.
const RESTORE_ATTRIBUTE: &str = "restore";

/// States an `available` waiter can never recover from.
const AVAILABLE_FAILURE_STATES: &[&str] = &[
    "deleted",
    "deleting",
    "failed",
    "incompatible-restore",
    "incompatible-parameters",
    "incompatible-network",
];

/// What a single status check observed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Observation {
    /// The resource does not exist.
    Missing,
    /// The resource exists with the given status.
    Status(String),
}

/// Decides whether an observation satisfies a waiter.
///
/// # Errors
///
/// Returns [`ProviderError::TerminalState`] when an availability waiter
/// observes a state the resource cannot leave.
pub fn evaluate_observation(
    waiter: Waiter,
    resource_id: &str,
    observation: &Observation,
) -> Result<bool, ProviderError> {
    match observation {
        Observation::Missing => Ok(waiter.awaits_deletion()),
        Observation::Status(status) if waiter.awaits_deletion() => Ok(status == "deleted"),
        Observation::Status(status) if status == "available" => Ok(true),
        Observation::Status(status) if AVAILABLE_FAILURE_STATES.contains(&status.as_str()) => {
            Err(ProviderError::TerminalState {
                resource: waiter.resource(),
                id: resource_id.to_owned(),
                status: status.clone(),
            })
        }
        Observation::Status(_) => Ok(false),
    }
}

/// Cluster operations issued through the AWS SDK.
#[derive(Clone, Debug)]
pub struct RdsClusterApi {
    client: Client,
}

impl RdsClusterApi {
    /// Builds the API from a loaded SDK context.
    #[must_use]
    pub fn new(context: &AwsContext) -> Self {
        Self {
            client: context.rds_client(),
        }
    }

    async fn observe(&self, waiter: Waiter, id: &str) -> Result<Observation, ProviderError> {
        let status = match waiter {
            Waiter::ClusterAvailable | Waiter::ClusterDeleted => {
                match self.fetch_cluster(id).await {
                    Ok(cluster) => cluster.status,
                    Err(err) if err.is_not_found() => return Ok(Observation::Missing),
                    Err(err) => return Err(err),
                }
            }
            Waiter::InstanceAvailable | Waiter::InstanceDeleted => {
                match self.fetch_instance(id).await {
                    Ok(instance) => instance.status,
                    Err(err) if err.is_not_found() => return Ok(Observation::Missing),
                    Err(err) => return Err(err),
                }
            }
            Waiter::SnapshotAvailable | Waiter::SnapshotDeleted => {
                let response = self
                    .client
                    .describe_db_cluster_snapshots()
                    .db_cluster_snapshot_identifier(id)
                    .send()
                    .await;
                match response {
                    Ok(output) => match output.db_cluster_snapshots().first() {
                        Some(snapshot) => snapshot.status().map(str::to_owned),
                        None => return Ok(Observation::Missing),
                    },
                    Err(err) => {
                        let classified = provider_error("snapshot", id, &err);
                        if classified.is_not_found() {
                            return Ok(Observation::Missing);
                        }
                        return Err(classified);
                    }
                }
            }
        };
        Ok(Observation::Status(status.unwrap_or_default()))
    }

    async fn fetch_cluster(&self, cluster_id: &str) -> Result<Cluster, ProviderError> {
        let response = self
            .client
            .describe_db_clusters()
            .db_cluster_identifier(cluster_id)
            .send()
            .await
            .map_err(|err| provider_error("cluster", cluster_id, &err))?;
        let cluster = response
            .db_clusters()
            .first()
            .ok_or_else(|| ProviderError::NotFound {
                resource: "cluster",
                id: cluster_id.to_owned(),
            })?;
        cluster_from(cluster, "DescribeDBClusters")
    }

    async fn fetch_instance(&self, instance_id: &str) -> Result<Instance, ProviderError> {
        let response = self
            .client
            .describe_db_instances()
            .db_instance_identifier(instance_id)
            .send()
            .await
            .map_err(|err| provider_error("instance", instance_id, &err))?;
        let instance = response
            .db_instances()
            .first()
            .ok_or_else(|| ProviderError::NotFound {
                resource: "instance",
                id: instance_id.to_owned(),
            })?;
        instance_from(instance, "DescribeDBInstances")
    }

    async fn fetch_snapshots(&self, query: &SnapshotQuery) -> Result<Vec<Snapshot>, ProviderError> {
        let scope = query.cluster_id.as_deref().unwrap_or("*");
        let mut snapshots = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let mut request = self
                .client
                .describe_db_cluster_snapshots()
                .snapshot_type(query.snapshot_type.as_str());
            if let Some(cluster_id) = &query.cluster_id {
                request = request.db_cluster_identifier(cluster_id);
            }
            if let Some(next) = &marker {
                request = request.marker(next);
            }

            let response = request
                .send()
                .await
                .map_err(|err| provider_error("snapshot", scope, &err))?;

            for item in response.db_cluster_snapshots() {
                if item.snapshot_create_time().is_none() {
                    debug!(
                        snapshot = item.db_cluster_snapshot_identifier().unwrap_or_default(),
                        "skipping snapshot without a creation time"
                    );
                    continue;
                }
                snapshots.push(snapshot_from(item, "DescribeDBClusterSnapshots")?);
            }

            match response.marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_owned()),
                _ => break,
            }
        }

        Ok(snapshots)
    }
}

impl ClusterApi for RdsClusterApi {
    fn list_snapshots<'a>(&'a self, query: &'a SnapshotQuery) -> CloudFuture<'a, Vec<Snapshot>> {
        Box::pin(async move { self.fetch_snapshots(query).await })
    }

    fn describe_cluster<'a>(&'a self, cluster_id: &'a str) -> CloudFuture<'a, Cluster> {
        Box::pin(async move { self.fetch_cluster(cluster_id).await })
    }

    fn restore_cluster<'a>(
        &'a self,
        request: &'a RestoreClusterRequest,
    ) -> CloudFuture<'a, Cluster> {
        Box::pin(async move {
            let scaling = ServerlessV2ScalingConfiguration::builder()
                .min_capacity(request.min_capacity)
                .max_capacity(request.max_capacity)
                .build();
            let tags = request
                .tags
                .iter()
                .map(|tag| RdsTag::builder().key(&tag.key).value(&tag.value).build())
                .collect::<Vec<_>>();

            let response = self
                .client
                .restore_db_cluster_from_snapshot()
                .db_cluster_identifier(&request.cluster_id)
                .snapshot_identifier(&request.snapshot_id)
                .engine(&request.engine)
                .set_engine_version(request.engine_version.clone())
                .set_availability_zones(Some(request.availability_zones.clone()))
                .set_db_subnet_group_name(request.subnet_group.clone())
                .set_database_name(request.database_name.clone())
                .set_vpc_security_group_ids(Some(request.security_group_ids.clone()))
                .set_db_cluster_parameter_group_name(request.parameter_group.clone())
                .set_tags(Some(tags))
                .engine_mode(ENGINE_MODE)
                .copy_tags_to_snapshot(true)
                .publicly_accessible(false)
                .serverless_v2_scaling_configuration(scaling)
                .send()
                .await
                .map_err(|err| provider_error("cluster", &request.cluster_id, &err))?;

            let cluster = response.db_cluster().ok_or(ProviderError::MissingField {
                operation: "RestoreDBClusterFromSnapshot",
                field: "DBCluster",
            })?;
            cluster_from(cluster, "RestoreDBClusterFromSnapshot")
        })
    }

    fn modify_cluster<'a>(
        &'a self,
        modification: &'a ClusterModification,
    ) -> CloudFuture<'a, Cluster> {
        Box::pin(async move {
            let mut request = self
                .client
                .modify_db_cluster()
                .db_cluster_identifier(&modification.cluster_id)
                .apply_immediately(true)
                .set_auto_minor_version_upgrade(modification.auto_minor_version_upgrade)
                .set_backup_retention_period(modification.backup_retention_days)
                .set_preferred_backup_window(modification.backup_window.clone());
            if let Some(password) = &modification.master_password {
                request = request.master_user_password(password.expose());
            }

            let response = request
                .send()
                .await
                .map_err(|err| provider_error("cluster", &modification.cluster_id, &err))?;
            let cluster = response.db_cluster().ok_or(ProviderError::MissingField {
                operation: "ModifyDBCluster",
                field: "DBCluster",
            })?;
            cluster_from(cluster, "ModifyDBCluster")
        })
    }

    fn create_instance<'a>(
        &'a self,
        request: &'a CreateInstanceRequest,
    ) -> CloudFuture<'a, Instance> {
        Box::pin(async move {
            let response = self
                .client
                .create_db_instance()
                .db_instance_identifier(&request.instance_id)
                .db_cluster_identifier(&request.cluster_id)
                .db_instance_class(&request.instance_class)
                .engine(&request.engine)
                .set_db_subnet_group_name(request.subnet_group.clone())
                .backup_retention_period(request.backup_retention_days)
                .auto_minor_version_upgrade(request.auto_minor_version_upgrade)
                .send()
                .await
                .map_err(|err| provider_error("instance", &request.instance_id, &err))?;
            let instance = response.db_instance().ok_or(ProviderError::MissingField {
                operation: "CreateDBInstance",
                field: "DBInstance",
            })?;
            instance_from(instance, "CreateDBInstance")
        })
    }

    fn describe_instance<'a>(&'a self, instance_id: &'a str) -> CloudFuture<'a, Instance> {
        Box::pin(async move { self.fetch_instance(instance_id).await })
    }

    fn create_snapshot<'a>(
        &'a self,
        cluster_id: &'a str,
        snapshot_id: &'a str,
    ) -> CloudFuture<'a, Snapshot> {
        Box::pin(async move {
            let response = self
                .client
                .create_db_cluster_snapshot()
                .db_cluster_identifier(cluster_id)
                .db_cluster_snapshot_identifier(snapshot_id)
                .send()
                .await
                .map_err(|err| provider_error("snapshot", snapshot_id, &err))?;
            let snapshot = response
                .db_cluster_snapshot()
                .ok_or(ProviderError::MissingField {
                    operation: "CreateDBClusterSnapshot",
                    field: "DBClusterSnapshot",
                })?;
            snapshot_from(snapshot, "CreateDBClusterSnapshot")
        })
    }

    fn copy_snapshot<'a>(&'a self, request: &'a CopySnapshotRequest) -> CloudFuture<'a, Snapshot> {
        Box::pin(async move {
            let response = self
                .client
                .copy_db_cluster_snapshot()
                .source_db_cluster_snapshot_identifier(&request.source_snapshot_id)
                .target_db_cluster_snapshot_identifier(&request.target_snapshot_id)
                .copy_tags(true)
                .set_kms_key_id(request.kms_key_id.clone())
                .set_source_region(request.source_region.clone())
                .send()
                .await
                .map_err(|err| provider_error("snapshot", &request.target_snapshot_id, &err))?;
            let snapshot = response
                .db_cluster_snapshot()
                .ok_or(ProviderError::MissingField {
                    operation: "CopyDBClusterSnapshot",
                    field: "DBClusterSnapshot",
                })?;
            snapshot_from(snapshot, "CopyDBClusterSnapshot")
        })
    }

    fn share_snapshot<'a>(
        &'a self,
        snapshot_id: &'a str,
        account_ids: &'a [String],
    ) -> CloudFuture<'a, ()> {
        Box::pin(async move {
            self.client
                .modify_db_cluster_snapshot_attribute()
                .db_cluster_snapshot_identifier(snapshot_id)
                .attribute_name(RESTORE_ATTRIBUTE)
                .set_values_to_add(Some(account_ids.to_vec()))
                .send()
                .await
                .map_err(|err| provider_error("snapshot", snapshot_id, &err))?;
            Ok(())
        })
    }

    fn delete_snapshot<'a>(&'a self, snapshot_id: &'a str) -> CloudFuture<'a, ()> {
        Box::pin(async move {
            self.client
                .delete_db_cluster_snapshot()
                .db_cluster_snapshot_identifier(snapshot_id)
                .send()
                .await
                .map_err(|err| provider_error("snapshot", snapshot_id, &err))?;
            Ok(())
        })
    }

    fn delete_instance<'a>(&'a self, instance_id: &'a str) -> CloudFuture<'a, ()> {
        Box::pin(async move {
            self.client
                .delete_db_instance()
                .db_instance_identifier(instance_id)
                .skip_final_snapshot(true)
                .delete_automated_backups(true)
                .send()
                .await
                .map_err(|err| provider_error("instance", instance_id, &err))?;
            Ok(())
        })
    }

    fn delete_cluster<'a>(&'a self, cluster_id: &'a str) -> CloudFuture<'a, ()> {
        Box::pin(async move {
            self.client
                .delete_db_cluster()
                .db_cluster_identifier(cluster_id)
                .skip_final_snapshot(true)
                .delete_automated_backups(true)
                .send()
                .await
                .map_err(|err| provider_error("cluster", cluster_id, &err))?;
            Ok(())
        })
    }

    fn wait_until<'a>(
        &'a self,
        waiter: Waiter,
        resource_id: &'a str,
        interval: Duration,
    ) -> CloudFuture<'a, PollOutcome> {
        Box::pin(async move {
            for check in 0..CHECKS_PER_WAIT {
                if check > 0 {
                    sleep(interval).await;
                }
                let observation = self.observe(waiter, resource_id).await?;
                debug!(%waiter, resource = resource_id, ?observation, "waiter check");
                if evaluate_observation(waiter, resource_id, &observation)? {
                    return Ok(PollOutcome::Reached);
                }
            }
            Ok(PollOutcome::Pending)
        })
    }
}

fn provider_error<E>(resource: &'static str, id: &str, err: &E) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let message = err
        .message()
        .map_or_else(|| DisplayErrorContext(err).to_string(), str::to_owned);
    classify_provider_error(resource, id, err.code(), Some(&message))
}

fn timestamp(value: &aws_sdk_rds::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
}

fn port(value: Option<i32>) -> Option<u16> {
    value.and_then(|raw| u16::try_from(raw).ok())
}

fn snapshot_from(
    snapshot: &DbClusterSnapshot,
    operation: &'static str,
) -> Result<Snapshot, ProviderError> {
    let id = snapshot
        .db_cluster_snapshot_identifier()
        .ok_or(ProviderError::MissingField {
            operation,
            field: "DBClusterSnapshotIdentifier",
        })?;
    Ok(Snapshot {
        id: id.to_owned(),
        cluster_id: snapshot.db_cluster_identifier().unwrap_or_default().to_owned(),
        created_at: snapshot
            .snapshot_create_time()
            .and_then(timestamp)
            .unwrap_or_else(Utc::now),
        engine: snapshot.engine().unwrap_or_default().to_owned(),
        engine_version: snapshot.engine_version().map(str::to_owned),
        availability_zones: snapshot.availability_zones().to_vec(),
        tags: snapshot
            .tag_list()
            .iter()
            .map(|tag| {
                Tag::new(
                    tag.key().unwrap_or_default(),
                    tag.value().unwrap_or_default(),
                )
            })
            .collect(),
    })
}

fn cluster_from(cluster: &DbCluster, operation: &'static str) -> Result<Cluster, ProviderError> {
    let id = cluster
        .db_cluster_identifier()
        .ok_or(ProviderError::MissingField {
            operation,
            field: "DBClusterIdentifier",
        })?;
    Ok(Cluster {
        id: id.to_owned(),
        engine: cluster.engine().unwrap_or_default().to_owned(),
        engine_version: cluster.engine_version().map(str::to_owned),
        subnet_group: cluster.db_subnet_group().map(str::to_owned),
        database_name: cluster.database_name().map(str::to_owned),
        security_group_ids: cluster
            .vpc_security_groups()
            .iter()
            .filter_map(|group| group.vpc_security_group_id().map(str::to_owned))
            .collect(),
        parameter_group: cluster.db_cluster_parameter_group().map(str::to_owned),
        master_username: cluster.master_username().map(str::to_owned),
        endpoint: cluster.endpoint().map(str::to_owned),
        port: port(cluster.port()),
        status: cluster.status().map(str::to_owned),
    })
}

fn instance_from(
    instance: &DbInstance,
    operation: &'static str,
) -> Result<Instance, ProviderError> {
    let id = instance
        .db_instance_identifier()
        .ok_or(ProviderError::MissingField {
            operation,
            field: "DBInstanceIdentifier",
        })?;
    let endpoint = instance.endpoint();
    Ok(Instance {
        id: id.to_owned(),
        cluster_id: instance.db_cluster_identifier().map(str::to_owned),
        endpoint: endpoint.and_then(|value| value.address().map(str::to_owned)),
        port: port(endpoint.and_then(|value| value.port())),
        status: instance.db_instance_status().map(str::to_owned),
    })
}
