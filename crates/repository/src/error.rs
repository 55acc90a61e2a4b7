use thiserror::Error;

use crate::{RecordId, Version};

/// Errors that can occur when interacting with the catalogue store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// No live equipment matches the given identifier.
    #[error("Equipment not found: {0}")]
    EquipmentNotFound(String),

    /// No live equipment class matches the given identifier.
    #[error("Equipment class not found: {0}")]
    EquipmentClassNotFound(String),

    /// Live equipment with the same external ID already exists.
    #[error("Equipment already exists: {0}")]
    EquipmentAlreadyExists(String),

    /// A live equipment class with the same external ID already exists.
    #[error("Equipment class already exists: {0}")]
    EquipmentClassAlreadyExists(String),

    /// The stored version moved on since the aggregate was loaded.
    #[error(
        "Concurrency conflict for equipment {external_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        external_id: String,
        expected: Version,
        actual: Version,
    },

    /// Another transaction committed after this one began.
    #[error("Transaction conflict: the store changed since the transaction began")]
    TransactionConflict,

    /// Commit or rollback was called outside a transaction.
    #[error("No transaction in progress")]
    NoTransaction,
}

impl RepositoryError {
    pub(crate) fn equipment_not_found(id: RecordId) -> Self {
        RepositoryError::EquipmentNotFound(id.to_string())
    }

    pub(crate) fn class_not_found(id: RecordId) -> Self {
        RepositoryError::EquipmentClassNotFound(id.to_string())
    }

    /// Returns true for the not-found variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RepositoryError::EquipmentNotFound(_) | RepositoryError::EquipmentClassNotFound(_)
        )
    }

    /// Returns true if retrying the whole unit of work may succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            RepositoryError::ConcurrencyConflict { .. } | RepositoryError::TransactionConflict
        )
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
