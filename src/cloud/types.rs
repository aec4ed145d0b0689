//! Provider-neutral descriptors for the resources a pipeline run touches.

use std::fmt;

use chrono::{DateTime, Utc};

/// Prefix the provider puts on automated snapshot identifiers.
pub const AUTOMATED_SNAPSHOT_PREFIX: &str = "rds:";

/// Key/value tag attached to a provider resource.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

impl Tag {
    /// Creates a tag.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Point-in-time backup of a cluster.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Snapshot {
    /// Unique snapshot identifier.
    pub id: String,
    /// Identifier of the cluster the snapshot was taken from.
    pub cluster_id: String,
    /// Creation timestamp reported by the provider.
    pub created_at: DateTime<Utc>,
    /// Database engine name.
    pub engine: String,
    /// Database engine version, when reported.
    pub engine_version: Option<String>,
    /// Availability zones the snapshot can be restored into.
    pub availability_zones: Vec<String>,
    /// Tags carried by the snapshot.
    pub tags: Vec<Tag>,
}

impl Snapshot {
    /// Returns the identifier a cluster restored from this snapshot receives:
    /// the snapshot identifier without the automated-snapshot prefix.
    #[must_use]
    pub fn restored_cluster_id(&self) -> &str {
        self.id
            .strip_prefix(AUTOMATED_SNAPSHOT_PREFIX)
            .unwrap_or(&self.id)
    }
}

/// Database cluster descriptor.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Cluster {
    /// Cluster identifier.
    pub id: String,
    /// Database engine name.
    pub engine: String,
    /// Database engine version.
    pub engine_version: Option<String>,
    /// Subnet group the cluster lives in.
    pub subnet_group: Option<String>,
    /// Name of the initial database.
    pub database_name: Option<String>,
    /// VPC security group identifiers.
    pub security_group_ids: Vec<String>,
    /// Cluster parameter group name.
    pub parameter_group: Option<String>,
    /// Master user name.
    pub master_username: Option<String>,
    /// Writer endpoint host name.
    pub endpoint: Option<String>,
    /// Listener port.
    pub port: Option<u16>,
    /// Provider status string.
    pub status: Option<String>,
}

/// Compute instance attached to a cluster.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Instance {
    /// Instance identifier.
    pub id: String,
    /// Owning cluster identifier.
    pub cluster_id: Option<String>,
    /// Endpoint host name, populated once the instance is available.
    pub endpoint: Option<String>,
    /// Endpoint port, populated once the instance is available.
    pub port: Option<u16>,
    /// Provider status string.
    pub status: Option<String>,
}

/// Snapshot origin used to filter listings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SnapshotType {
    /// Snapshots taken by the provider's backup schedule.
    Automated,
    /// Snapshots created explicitly, including copies.
    Manual,
}

impl SnapshotType {
    /// Provider spelling of the snapshot type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Automated => "automated",
            Self::Manual => "manual",
        }
    }
}

/// Filter for snapshot listings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SnapshotQuery {
    /// Restrict to snapshots of this cluster.
    pub cluster_id: Option<String>,
    /// Restrict to this snapshot type.
    pub snapshot_type: SnapshotType,
}

impl SnapshotQuery {
    /// Automated snapshots of one cluster.
    #[must_use]
    pub fn automated_for(cluster_id: impl Into<String>) -> Self {
        Self {
            cluster_id: Some(cluster_id.into()),
            snapshot_type: SnapshotType::Automated,
        }
    }

    /// All manual snapshots visible to the account.
    #[must_use]
    pub const fn manual() -> Self {
        Self {
            cluster_id: None,
            snapshot_type: SnapshotType::Manual,
        }
    }
}

/// Parameters for restoring a new cluster from a snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct RestoreClusterRequest {
    /// Identifier of the new cluster.
    pub cluster_id: String,
    /// Snapshot to restore from.
    pub snapshot_id: String,
    /// Engine name copied from the snapshot.
    pub engine: String,
    /// Engine version copied from the snapshot.
    pub engine_version: Option<String>,
    /// Availability zones copied from the snapshot.
    pub availability_zones: Vec<String>,
    /// Subnet group copied from the source cluster.
    pub subnet_group: Option<String>,
    /// Database name copied from the source cluster.
    pub database_name: Option<String>,
    /// Security groups copied from the source cluster.
    pub security_group_ids: Vec<String>,
    /// Parameter group copied from the source cluster.
    pub parameter_group: Option<String>,
    /// Tags copied from the snapshot.
    pub tags: Vec<Tag>,
    /// Serverless capacity floor.
    pub min_capacity: f64,
    /// Serverless capacity ceiling.
    pub max_capacity: f64,
}

/// Immediate modification applied to a cluster.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClusterModification {
    /// Cluster to modify.
    pub cluster_id: String,
    /// Toggle automatic minor-version upgrades.
    pub auto_minor_version_upgrade: Option<bool>,
    /// Backup retention in days.
    pub backup_retention_days: Option<i32>,
    /// Preferred daily backup window (`hh24:mi-hh24:mi`, UTC).
    pub backup_window: Option<String>,
    /// New master password.
    pub master_password: Option<Secret>,
}

impl ClusterModification {
    /// Backup window applied to temporary clusters.
    pub const HARDENING_BACKUP_WINDOW: &'static str = "22:00-22:30";

    /// Disables minor upgrades and keeps a one-day backup retention.
    #[must_use]
    pub fn hardening(cluster_id: impl Into<String>) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            auto_minor_version_upgrade: Some(false),
            backup_retention_days: Some(1),
            backup_window: Some(Self::HARDENING_BACKUP_WINDOW.to_owned()),
            master_password: None,
        }
    }

    /// Replaces the master password.
    #[must_use]
    pub fn password(cluster_id: impl Into<String>, password: Secret) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            master_password: Some(password),
            ..Self::default()
        }
    }
}

/// Parameters for attaching a compute instance to a cluster.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreateInstanceRequest {
    /// Identifier of the new instance.
    pub instance_id: String,
    /// Owning cluster.
    pub cluster_id: String,
    /// Instance class (for example `db.serverless`).
    pub instance_class: String,
    /// Engine name, matching the cluster.
    pub engine: String,
    /// Subnet group, matching the cluster.
    pub subnet_group: Option<String>,
    /// Backup retention in days.
    pub backup_retention_days: i32,
    /// Toggle automatic minor-version upgrades.
    pub auto_minor_version_upgrade: bool,
}

/// Parameters for copying a snapshot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CopySnapshotRequest {
    /// Snapshot to copy.
    pub source_snapshot_id: String,
    /// Identifier of the copy.
    pub target_snapshot_id: String,
    /// Encryption key for the copy; the source key is kept when unset.
    pub kms_key_id: Option<String>,
    /// Region holding the source snapshot, for cross-region copies.
    pub source_region: Option<String>,
}

/// Ephemeral credential value.
///
/// `Debug` is redacted and there is no `Display`, so the value only leaves
/// the process through [`Secret::expose`].
#[derive(Clone, Eq, PartialEq)]
pub struct Secret(String);

impl Secret {
    /// Wraps a credential value.
    #[must_use]
    pub const fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns the raw credential for handing to a provider or driver.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Secret(<redacted>)")
    }
}

/// Provider-side terminal states a caller can wait for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Waiter {
    /// Cluster reports `available`.
    ClusterAvailable,
    /// Instance reports `available`.
    InstanceAvailable,
    /// Snapshot reports `available`.
    SnapshotAvailable,
    /// Cluster no longer exists.
    ClusterDeleted,
    /// Instance no longer exists.
    InstanceDeleted,
    /// Snapshot no longer exists.
    SnapshotDeleted,
}

impl Waiter {
    /// Waiter name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClusterAvailable => "cluster-available",
            Self::InstanceAvailable => "instance-available",
            Self::SnapshotAvailable => "snapshot-available",
            Self::ClusterDeleted => "cluster-deleted",
            Self::InstanceDeleted => "instance-deleted",
            Self::SnapshotDeleted => "snapshot-deleted",
        }
    }

    /// Kind of resource the waiter observes.
    #[must_use]
    pub const fn resource(self) -> &'static str {
        match self {
            Self::ClusterAvailable | Self::ClusterDeleted => "cluster",
            Self::InstanceAvailable | Self::InstanceDeleted => "instance",
            Self::SnapshotAvailable | Self::SnapshotDeleted => "snapshot",
        }
    }

    /// Whether the waiter completes when the resource disappears.
    #[must_use]
    pub const fn awaits_deletion(self) -> bool {
        matches!(
            self,
            Self::ClusterDeleted | Self::InstanceDeleted | Self::SnapshotDeleted
        )
    }
}

impl fmt::Display for Waiter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn snapshot(id: &str) -> Snapshot {
        Snapshot {
            id: id.to_owned(),
            cluster_id: String::from("prod"),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            engine: String::from("aurora-postgresql"),
            engine_version: None,
            availability_zones: Vec::new(),
            tags: Vec::new(),
        }
    }

    #[rstest]
    #[case("rds:prod-2024-05-01-03-10", "prod-2024-05-01-03-10")]
    #[case("prod-manual", "prod-manual")]
    fn restored_cluster_id_strips_automated_prefix(#[case] id: &str, #[case] expected: &str) {
        assert_eq!(snapshot(id).restored_cluster_id(), expected);
    }

    #[test]
    fn secret_debug_is_redacted() {
        let secret = Secret::new(String::from("hunter2"));
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("hunter2"), "leaked secret: {rendered}");
    }

    #[test]
    fn hardening_sets_retention_and_window() {
        let modification = ClusterModification::hardening("tmp");
        assert_eq!(modification.auto_minor_version_upgrade, Some(false));
        assert_eq!(modification.backup_retention_days, Some(1));
        assert_eq!(modification.backup_window.as_deref(), Some("22:00-22:30"));
        assert!(modification.master_password.is_none());
    }
}
