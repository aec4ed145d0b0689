//! Narrow interfaces onto the managed database provider and secret store.
//!
//! The orchestrator only ever talks to [`ClusterApi`] and [`SecretStore`];
//! the AWS-backed implementations live in [`rds`] and [`ssm`].

mod context;
mod error;
pub mod rds;
pub mod ssm;
mod types;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub use context::AwsContext;
pub use error::{ProviderError, classify_provider_error};
pub use types::{
    AUTOMATED_SNAPSHOT_PREFIX, Cluster, ClusterModification, CopySnapshotRequest,
    CreateInstanceRequest, Instance, RestoreClusterRequest, Secret, Snapshot, SnapshotQuery,
    SnapshotType, Tag, Waiter,
};

use crate::wait::PollOutcome;

/// Future returned by provider operations.
pub type CloudFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ProviderError>> + Send + 'a>>;

/// Cluster, instance, and snapshot operations consumed by the pipeline.
pub trait ClusterApi: Send + Sync {
    /// Lists every snapshot matching the query, following pagination.
    fn list_snapshots<'a>(&'a self, query: &'a SnapshotQuery) -> CloudFuture<'a, Vec<Snapshot>>;

    /// Describes one cluster.
    fn describe_cluster<'a>(&'a self, cluster_id: &'a str) -> CloudFuture<'a, Cluster>;

    /// Starts restoring a new cluster from a snapshot.
    fn restore_cluster<'a>(
        &'a self,
        request: &'a RestoreClusterRequest,
    ) -> CloudFuture<'a, Cluster>;

    /// Applies an immediate modification to a cluster.
    fn modify_cluster<'a>(
        &'a self,
        modification: &'a ClusterModification,
    ) -> CloudFuture<'a, Cluster>;

    /// Starts creating an instance inside a cluster.
    fn create_instance<'a>(
        &'a self,
        request: &'a CreateInstanceRequest,
    ) -> CloudFuture<'a, Instance>;

    /// Describes one instance.
    fn describe_instance<'a>(&'a self, instance_id: &'a str) -> CloudFuture<'a, Instance>;

    /// Starts a manual snapshot of a cluster.
    fn create_snapshot<'a>(
        &'a self,
        cluster_id: &'a str,
        snapshot_id: &'a str,
    ) -> CloudFuture<'a, Snapshot>;

    /// Starts copying a snapshot.
    fn copy_snapshot<'a>(&'a self, request: &'a CopySnapshotRequest) -> CloudFuture<'a, Snapshot>;

    /// Grants restore permission on a snapshot to external accounts.
    fn share_snapshot<'a>(
        &'a self,
        snapshot_id: &'a str,
        account_ids: &'a [String],
    ) -> CloudFuture<'a, ()>;

    /// Starts deleting a snapshot.
    fn delete_snapshot<'a>(&'a self, snapshot_id: &'a str) -> CloudFuture<'a, ()>;

    /// Starts deleting an instance without a final snapshot.
    fn delete_instance<'a>(&'a self, instance_id: &'a str) -> CloudFuture<'a, ()>;

    /// Starts deleting a cluster without a final snapshot.
    fn delete_cluster<'a>(&'a self, cluster_id: &'a str) -> CloudFuture<'a, ()>;

    /// Performs one short provider-side wait for `waiter` on `resource_id`.
    ///
    /// Returns [`PollOutcome::Pending`] when the short wait ran out before the
    /// resource reached the state; callers retry through
    /// [`crate::wait::await_terminal`].
    fn wait_until<'a>(
        &'a self,
        waiter: Waiter,
        resource_id: &'a str,
        interval: Duration,
    ) -> CloudFuture<'a, PollOutcome>;
}

/// Secret storage for generated credentials.
pub trait SecretStore: Send + Sync {
    /// Stores a secret, overwriting any previous value.
    fn put_secret<'a>(
        &'a self,
        name: &'a str,
        value: &'a Secret,
        description: &'a str,
    ) -> CloudFuture<'a, ()>;

    /// Reads a secret.
    fn get_secret<'a>(&'a self, name: &'a str) -> CloudFuture<'a, Secret>;

    /// Deletes a secret.
    fn delete_secret<'a>(&'a self, name: &'a str) -> CloudFuture<'a, ()>;
}
