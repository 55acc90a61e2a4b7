use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Equipment, EquipmentClass, OperatingStatus};

use crate::{Pagination, RecordId, Result, Version};

/// An aggregate as held by a repository, with its storage metadata.
#[derive(Debug, Clone)]
pub struct Stored<T> {
    /// Storage identifier assigned on `create`.
    pub record_id: RecordId,

    pub aggregate: T,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl<T> Stored<T> {
    pub fn into_aggregate(self) -> T {
        self.aggregate
    }
}

/// Storage port for equipment aggregates.
///
/// Aggregates are stored and returned wholesale. All reads ignore
/// soft-deleted records, and listings are in insertion order.
#[async_trait]
pub trait EquipmentRepository: Send + Sync {
    /// Stores a new aggregate and returns its record ID.
    ///
    /// Fails with `EquipmentAlreadyExists` if live equipment with the same
    /// external ID is present.
    async fn create(&self, equipment: &Equipment) -> Result<RecordId>;

    /// Loads equipment by record ID, restoring its persisted version.
    async fn get_by_id(&self, id: RecordId) -> Result<Stored<Equipment>>;

    /// Loads equipment by external (B2MML) ID.
    async fn get_by_external_id(&self, external_id: &str) -> Result<Stored<Equipment>>;

    async fn list(&self, page: Pagination) -> Result<Vec<Stored<Equipment>>>;

    /// Lists equipment whose operating status equals `status`.
    async fn list_by_status(
        &self,
        status: OperatingStatus,
        page: Pagination,
    ) -> Result<Vec<Stored<Equipment>>>;

    /// Replaces the stored aggregate with the same external ID.
    ///
    /// `expected` is the version read at load time. The update fails with
    /// `ConcurrencyConflict` if the stored version differs from it; on success
    /// the stored version becomes `equipment.version()`.
    async fn update(&self, equipment: &Equipment, expected: Version) -> Result<()>;

    /// Soft-deletes a record. Deleting twice reports not found.
    async fn delete(&self, id: RecordId) -> Result<()>;
}

/// Storage port for equipment classes.
///
/// Classes are handed out as shared handles so that every piece of
/// equipment loaded in one unit of work refers to the same class instance.
#[async_trait]
pub trait EquipmentClassRepository: Send + Sync {
    async fn create(&self, class: Arc<EquipmentClass>) -> Result<RecordId>;

    async fn get_by_id(&self, id: RecordId) -> Result<Stored<Arc<EquipmentClass>>>;

    async fn get_by_external_id(&self, external_id: &str) -> Result<Stored<Arc<EquipmentClass>>>;

    async fn list(&self, page: Pagination) -> Result<Vec<Stored<Arc<EquipmentClass>>>>;

    /// Looks a class up anywhere in the stored class trees.
    ///
    /// A registered class is returned as its stored handle. A class nested
    /// inside a registered one is returned as a handle to a copy of that
    /// subtree.
    async fn resolve(&self, external_id: &str) -> Result<Arc<EquipmentClass>>;

    /// Replaces the stored class with the same external ID.
    async fn update(&self, class: Arc<EquipmentClass>) -> Result<()>;

    async fn delete(&self, id: RecordId) -> Result<()>;
}

/// Transactional boundary around the repositories.
///
/// A unit of work obtained from `begin` sees its own writes immediately and
/// publishes them to everybody else only on `commit`. Outside a transaction
/// every write is visible at once.
#[async_trait]
pub trait UnitOfWork: Sized + Send + Sync {
    type Equipment: EquipmentRepository;
    type EquipmentClasses: EquipmentClassRepository;

    fn equipment(&self) -> &Self::Equipment;

    fn equipment_classes(&self) -> &Self::EquipmentClasses;

    /// Starts a transaction over the current committed state.
    async fn begin(&self) -> Result<Self>;

    /// Publishes the transaction's writes.
    ///
    /// Fails with `TransactionConflict` if another writer committed since
    /// `begin`; the writes are then discarded.
    async fn commit(self) -> Result<()>;

    /// Discards the transaction's writes.
    async fn rollback(self) -> Result<()>;
}
