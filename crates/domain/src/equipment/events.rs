//! Equipment domain events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::{EquipmentClassId, EquipmentId, OperatingStatus};

/// Events raised by the equipment aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EquipmentEvent {
    /// Equipment was created.
    EquipmentCreated(EquipmentCreatedData),

    /// The operating status was assigned.
    EquipmentStatusChanged(EquipmentStatusChangedData),
}

impl DomainEvent for EquipmentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            EquipmentEvent::EquipmentCreated(_) => "EquipmentCreated",
            EquipmentEvent::EquipmentStatusChanged(_) => "EquipmentStatusChanged",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            EquipmentEvent::EquipmentCreated(data) => &data.aggregate_id,
            EquipmentEvent::EquipmentStatusChanged(data) => &data.aggregate_id,
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            EquipmentEvent::EquipmentCreated(data) => data.occurred_at,
            EquipmentEvent::EquipmentStatusChanged(data) => data.occurred_at,
        }
    }
}

/// Data for EquipmentCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentCreatedData {
    /// External ID of the aggregate.
    pub aggregate_id: String,

    /// When the equipment was created.
    pub occurred_at: DateTime<Utc>,

    pub equipment_id: EquipmentId,

    /// Class the equipment was created with, if any.
    pub class_id: Option<EquipmentClassId>,
}

/// Data for EquipmentStatusChanged event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentStatusChangedData {
    pub aggregate_id: String,

    pub occurred_at: DateTime<Utc>,

    pub equipment_id: EquipmentId,

    /// Status before the change; `None` when no status had been assigned.
    pub old_status: Option<OperatingStatus>,

    pub new_status: OperatingStatus,
}

impl EquipmentEvent {
    /// Creates an EquipmentCreated event.
    pub fn equipment_created(equipment_id: EquipmentId, class_id: Option<EquipmentClassId>) -> Self {
        EquipmentEvent::EquipmentCreated(EquipmentCreatedData {
            aggregate_id: equipment_id.to_string(),
            occurred_at: Utc::now(),
            equipment_id,
            class_id,
        })
    }

    /// Creates an EquipmentStatusChanged event.
    pub fn status_changed(
        equipment_id: EquipmentId,
        old_status: Option<OperatingStatus>,
        new_status: OperatingStatus,
    ) -> Self {
        EquipmentEvent::EquipmentStatusChanged(EquipmentStatusChangedData {
            aggregate_id: equipment_id.to_string(),
            occurred_at: Utc::now(),
            equipment_id,
            old_status,
            new_status,
        })
    }
}

/// Events raised by the equipment class aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EquipmentClassEvent {
    /// An equipment class was created.
    EquipmentClassCreated(EquipmentClassCreatedData),
}

impl DomainEvent for EquipmentClassEvent {
    fn event_type(&self) -> &'static str {
        match self {
            EquipmentClassEvent::EquipmentClassCreated(_) => "EquipmentClassCreated",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            EquipmentClassEvent::EquipmentClassCreated(data) => &data.aggregate_id,
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            EquipmentClassEvent::EquipmentClassCreated(data) => data.occurred_at,
        }
    }
}

/// Data for EquipmentClassCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentClassCreatedData {
    pub aggregate_id: String,

    pub occurred_at: DateTime<Utc>,

    pub class_id: EquipmentClassId,
}

impl EquipmentClassEvent {
    /// Creates an EquipmentClassCreated event.
    pub fn class_created(class_id: EquipmentClassId) -> Self {
        EquipmentClassEvent::EquipmentClassCreated(EquipmentClassCreatedData {
            aggregate_id: class_id.to_string(),
            occurred_at: Utc::now(),
            class_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equipment_id() -> EquipmentId {
        EquipmentId::new("EQ-100").unwrap()
    }

    #[test]
    fn test_event_type() {
        let event = EquipmentEvent::equipment_created(equipment_id(), None);
        assert_eq!(event.event_type(), "EquipmentCreated");

        let event = EquipmentEvent::status_changed(equipment_id(), None, OperatingStatus::Active);
        assert_eq!(event.event_type(), "EquipmentStatusChanged");

        let event = EquipmentClassEvent::class_created(EquipmentClassId::new("PUMP").unwrap());
        assert_eq!(event.event_type(), "EquipmentClassCreated");
    }

    #[test]
    fn test_aggregate_id_is_external_id() {
        let event = EquipmentEvent::equipment_created(
            equipment_id(),
            Some(EquipmentClassId::new("PUMP").unwrap()),
        );
        assert_eq!(event.aggregate_id(), "EQ-100");

        let event = EquipmentClassEvent::class_created(EquipmentClassId::new("PUMP").unwrap());
        assert_eq!(event.aggregate_id(), "PUMP");
    }

    #[test]
    fn test_occurred_at_is_recent() {
        let before = Utc::now();
        let event = EquipmentEvent::status_changed(
            equipment_id(),
            Some(OperatingStatus::Active),
            OperatingStatus::Maintenance,
        );
        let after = Utc::now();

        assert!(event.occurred_at() >= before);
        assert!(event.occurred_at() <= after);
    }

    #[test]
    fn test_status_changed_serialization() {
        let event = EquipmentEvent::status_changed(
            equipment_id(),
            Some(OperatingStatus::Active),
            OperatingStatus::Maintenance,
        );

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("EquipmentStatusChanged"));
        assert!(json.contains("\"maintenance\""));

        let deserialized: EquipmentEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);

        if let EquipmentEvent::EquipmentStatusChanged(data) = deserialized {
            assert_eq!(data.old_status, Some(OperatingStatus::Active));
            assert_eq!(data.new_status, OperatingStatus::Maintenance);
        } else {
            panic!("Expected EquipmentStatusChanged event");
        }
    }
}
