//! Equipment aggregate, equipment class aggregate and their B2MML adapter.

mod aggregate;
mod b2mml_adapter;
mod class;
mod events;
mod ids;
mod status;
mod value_objects;

pub use aggregate::Equipment;
pub use b2mml_adapter::{Built, NodeKind, SkippedNode};
pub use class::{EquipmentClass, EquipmentClassProperty};
pub use events::{
    EquipmentClassCreatedData, EquipmentClassEvent, EquipmentCreatedData, EquipmentEvent,
    EquipmentStatusChangedData,
};
pub use ids::{EquipmentClassId, EquipmentClassPropertyId, EquipmentId, EquipmentPropertyId};
pub use status::OperatingStatus;
pub use value_objects::{DataType, EquipmentProperty, PropertyValue};
