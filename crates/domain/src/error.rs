//! Domain error types.

use thiserror::Error;

/// The kind of identifier that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Equipment,
    EquipmentClass,
    EquipmentProperty,
    EquipmentClassProperty,
}

impl IdKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdKind::Equipment => "equipment",
            IdKind::EquipmentClass => "equipment class",
            IdKind::EquipmentProperty => "equipment property",
            IdKind::EquipmentClassProperty => "equipment class property",
        }
    }
}

impl std::fmt::Display for IdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur in the equipment domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// An identifier was constructed from an empty string.
    #[error("{0} id cannot be empty")]
    EmptyId(IdKind),

    /// A required argument was not provided.
    #[error("{0} must be provided")]
    MissingArgument(&'static str),

    /// Equipment was requested but not provided or not found.
    #[error("equipment not found")]
    EquipmentNotFound,

    /// Equipment with the same identifier already exists.
    #[error("equipment already exists")]
    EquipmentAlreadyExists,

    /// An operating status could not be parsed.
    #[error("invalid equipment status: {0}")]
    InvalidStatus(String),

    /// An equipment class was requested but not provided or not found.
    #[error("equipment class not found")]
    EquipmentClassNotFound,

    /// An equipment class with the same identifier already exists.
    #[error("equipment class already exists")]
    EquipmentClassAlreadyExists,

    /// The external record carries no effective start date.
    #[error("effective dates not set")]
    EffectiveDatesNotSet,

    /// No B2MML document was supplied to the adapter.
    #[error("b2mml data must be provided")]
    MissingDocument,
}

impl DomainError {
    /// Returns true for the not-found family of errors.
    ///
    /// Missing arguments belong here: asking an aggregate to adopt a child
    /// that was never supplied is reported the same way as a lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::EquipmentNotFound
                | DomainError::EquipmentClassNotFound
                | DomainError::EffectiveDatesNotSet
                | DomainError::MissingArgument(_)
        )
    }

    /// Returns true for construction-time validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyId(_) | DomainError::InvalidStatus(_) | DomainError::MissingDocument
        )
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
