//! Domain layer for the equipment catalogue.
//!
//! This crate provides:
//! - `AggregateRoot` and `DomainEvent` traits
//! - the `Equipment` and `EquipmentClass` aggregates with their value objects
//! - the lenient builder that turns B2MML documents into aggregates

pub mod aggregate;
pub mod equipment;
pub mod error;

pub use aggregate::{AggregateRoot, DomainEvent};
pub use error::{DomainError, IdKind};
pub use equipment::{
    Built, DataType, Equipment, EquipmentClass, EquipmentClassEvent, EquipmentClassId,
    EquipmentClassProperty, EquipmentClassPropertyId, EquipmentEvent, EquipmentId,
    EquipmentProperty, EquipmentPropertyId, NodeKind, OperatingStatus, PropertyValue, SkippedNode,
};
