//! Equipment class aggregate and its property tree.

use std::sync::Arc;

use b2mml::{EquipmentClassPropertyType, EquipmentClassType};

use crate::aggregate::AggregateRoot;
use crate::error::{DomainError, Result};

use super::{EquipmentClassEvent, EquipmentClassId, EquipmentClassPropertyId};

/// A classification node in the equipment taxonomy.
///
/// Classes are shared by reference between many pieces of equipment once
/// registered. Apart from growing their property and child trees they do not
/// change, so they carry neither a status nor a version.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentClass {
    id: EquipmentClassId,
    data: Option<Arc<EquipmentClassType>>,
    properties: Vec<EquipmentClassProperty>,
    children: Vec<EquipmentClass>,
}

impl AggregateRoot for EquipmentClass {
    fn aggregate_type() -> &'static str {
        "EquipmentClass"
    }

    fn external_id(&self) -> &str {
        self.id.as_str()
    }
}

impl EquipmentClass {
    pub fn new(id: EquipmentClassId, data: Option<Arc<EquipmentClassType>>) -> Self {
        Self {
            id,
            data,
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    pub(super) fn from_parts(
        id: EquipmentClassId,
        data: Arc<EquipmentClassType>,
        properties: Vec<EquipmentClassProperty>,
        children: Vec<EquipmentClass>,
    ) -> Self {
        Self {
            id,
            data: Some(data),
            properties,
            children,
        }
    }

    /// Creates a class together with its creation event.
    pub fn create(
        id: EquipmentClassId,
        data: Option<Arc<EquipmentClassType>>,
    ) -> (Self, EquipmentClassEvent) {
        let class = Self::new(id, data);
        let event = class.created_event();
        (class, event)
    }

    pub fn created_event(&self) -> EquipmentClassEvent {
        EquipmentClassEvent::class_created(self.id.clone())
    }

    pub fn id(&self) -> &EquipmentClassId {
        &self.id
    }

    /// Returns the stored B2MML element.
    pub fn b2mml_data(&self) -> Option<&Arc<EquipmentClassType>> {
        self.data.as_ref()
    }

    /// Class properties in insertion order.
    pub fn properties(&self) -> &[EquipmentClassProperty] {
        &self.properties
    }

    pub fn children(&self) -> &[EquipmentClass] {
        &self.children
    }

    /// Attaches a class property. Passing `None` is rejected.
    pub fn add_property(
        &mut self,
        property: impl Into<Option<EquipmentClassProperty>>,
    ) -> Result<()> {
        let property = property
            .into()
            .ok_or(DomainError::MissingArgument("property"))?;
        self.properties.push(property);
        Ok(())
    }

    /// Adopts a child class. Passing `None` is rejected.
    pub fn add_child(&mut self, child: impl Into<Option<EquipmentClass>>) -> Result<()> {
        let child = child.into().ok_or(DomainError::EquipmentClassNotFound)?;
        self.children.push(child);
        Ok(())
    }

    /// Depth-first search of this class and its descendants.
    pub fn find(&self, id: &EquipmentClassId) -> Option<&EquipmentClass> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// A property defined on an equipment class. Class properties nest.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentClassProperty {
    id: EquipmentClassPropertyId,
    data: Option<Arc<EquipmentClassPropertyType>>,
    children: Vec<EquipmentClassProperty>,
}

impl EquipmentClassProperty {
    pub fn new(
        id: EquipmentClassPropertyId,
        data: Option<Arc<EquipmentClassPropertyType>>,
    ) -> Self {
        Self {
            id,
            data,
            children: Vec::new(),
        }
    }

    pub(super) fn from_parts(
        id: EquipmentClassPropertyId,
        data: Arc<EquipmentClassPropertyType>,
        children: Vec<EquipmentClassProperty>,
    ) -> Self {
        Self {
            id,
            data: Some(data),
            children,
        }
    }

    pub fn id(&self) -> &EquipmentClassPropertyId {
        &self.id
    }

    pub fn b2mml_data(&self) -> Option<&Arc<EquipmentClassPropertyType>> {
        self.data.as_ref()
    }

    pub fn children(&self) -> &[EquipmentClassProperty] {
        &self.children
    }

    /// Nests a child property. Passing `None` is rejected.
    pub fn add_child(&mut self, child: impl Into<Option<EquipmentClassProperty>>) -> Result<()> {
        let child = child
            .into()
            .ok_or(DomainError::MissingArgument("child property"))?;
        self.children.push(child);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::DomainEvent;

    fn class(id: &str) -> EquipmentClass {
        EquipmentClass::new(EquipmentClassId::new(id).unwrap(), None)
    }

    fn class_property(id: &str) -> EquipmentClassProperty {
        EquipmentClassProperty::new(EquipmentClassPropertyId::new(id).unwrap(), None)
    }

    #[test]
    fn test_new_class_is_empty() {
        let pump = class("PUMP");
        assert_eq!(pump.external_id(), "PUMP");
        assert!(pump.properties().is_empty());
        assert!(pump.children().is_empty());
        assert!(pump.b2mml_data().is_none());
    }

    #[test]
    fn test_properties_keep_insertion_order() {
        let mut pump = class("PUMP");
        pump.add_property(class_property("FLOW")).unwrap();
        pump.add_property(class_property("HEAD")).unwrap();

        let ids: Vec<_> = pump.properties().iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, ["FLOW", "HEAD"]);
    }

    #[test]
    fn test_missing_arguments_are_rejected() {
        let mut pump = class("PUMP");
        assert_eq!(
            pump.add_child(None),
            Err(DomainError::EquipmentClassNotFound)
        );
        assert_eq!(
            pump.add_property(None),
            Err(DomainError::MissingArgument("property"))
        );

        let mut flow = class_property("FLOW");
        assert_eq!(
            flow.add_child(None),
            Err(DomainError::MissingArgument("child property"))
        );
        assert!(pump.children().is_empty());
        assert!(flow.children().is_empty());
    }

    #[test]
    fn test_find_descends_into_children() {
        let mut rotating = class("ROTATING");
        let mut pump = class("PUMP");
        pump.add_child(class("CENTRIFUGAL-PUMP")).unwrap();
        rotating.add_child(pump).unwrap();

        let target = EquipmentClassId::new("CENTRIFUGAL-PUMP").unwrap();
        assert_eq!(rotating.find(&target).unwrap().id(), &target);
        assert!(
            rotating
                .find(&EquipmentClassId::new("VALVE").unwrap())
                .is_none()
        );
    }

    #[test]
    fn test_nested_class_properties() {
        let mut flow = class_property("FLOW");
        flow.add_child(class_property("FLOW-MAX")).unwrap();
        flow.add_child(class_property("FLOW-MIN")).unwrap();
        assert_eq!(flow.children().len(), 2);
        assert_eq!(flow.children()[1].id().as_str(), "FLOW-MIN");
    }

    #[test]
    fn test_create_returns_event() {
        let (pump, event) = EquipmentClass::create(EquipmentClassId::new("PUMP").unwrap(), None);
        assert_eq!(event.event_type(), "EquipmentClassCreated");
        assert_eq!(event.aggregate_id(), pump.id().as_str());
    }
}
