//! B2MML (ISA-95) equipment document model.
//!
//! Covers the subset of the schema the catalogue reads and writes:
//! equipment, equipment classes, their properties and the scalar types they
//! are built from. Documents are exchanged as JSON with PascalCase element
//! names.

pub mod common;
pub mod equipment;

pub use common::{
    DateTimeType, DescriptionType, EquipmentLevelType, HierarchyScopeType, IdentifierType,
    ValueType,
};
pub use equipment::{
    EquipmentClassPropertyType, EquipmentClassType, EquipmentInformation, EquipmentPropertyType,
    EquipmentType,
};
