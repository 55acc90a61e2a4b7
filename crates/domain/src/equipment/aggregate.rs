//! Equipment aggregate implementation.

use std::sync::Arc;

use b2mml::{DateTimeType, EquipmentLevelType, EquipmentType, HierarchyScopeType, IdentifierType};
use common::Version;

use crate::aggregate::AggregateRoot;
use crate::error::{DomainError, Result};

use super::{
    EquipmentClass, EquipmentEvent, EquipmentId, EquipmentProperty, OperatingStatus,
};

/// Equipment aggregate root.
///
/// Represents one physical asset. It owns its properties and its child
/// equipment exclusively and refers to its class through a shared handle.
/// Every structural or status mutation advances `version`.
#[derive(Debug, Clone)]
pub struct Equipment {
    id: EquipmentId,

    /// The B2MML element this aggregate was built from, kept verbatim.
    data: Option<Arc<EquipmentType>>,

    class: Option<Arc<EquipmentClass>>,

    properties: Vec<EquipmentProperty>,

    children: Vec<Equipment>,

    operating_status: Option<OperatingStatus>,

    version: Version,
}

impl AggregateRoot for Equipment {
    fn aggregate_type() -> &'static str {
        "Equipment"
    }

    fn external_id(&self) -> &str {
        self.id.as_str()
    }
}

impl Equipment {
    /// Creates a fresh aggregate at version 1 with no status.
    pub fn new(
        id: EquipmentId,
        data: Option<Arc<EquipmentType>>,
        class: Option<Arc<EquipmentClass>>,
    ) -> Self {
        Self {
            id,
            data,
            class,
            properties: Vec::new(),
            children: Vec::new(),
            operating_status: None,
            version: Version::first(),
        }
    }

    /// Creates a fresh aggregate together with its creation event.
    pub fn create(
        id: EquipmentId,
        data: Option<Arc<EquipmentType>>,
        class: Option<Arc<EquipmentClass>>,
    ) -> (Self, EquipmentEvent) {
        let equipment = Self::new(id, data, class);
        let event = equipment.created_event();
        (equipment, event)
    }

    /// Builds the creation event for this aggregate.
    ///
    /// Used when the aggregate came out of the B2MML adapter and is being
    /// stored for the first time.
    pub fn created_event(&self) -> EquipmentEvent {
        EquipmentEvent::equipment_created(
            self.id.clone(),
            self.class.as_ref().map(|class| class.id().clone()),
        )
    }

    /// Assembles an aggregate whose trees were built elsewhere, at version 1.
    pub(super) fn from_parts(
        id: EquipmentId,
        data: Arc<EquipmentType>,
        class: Option<Arc<EquipmentClass>>,
        properties: Vec<EquipmentProperty>,
        children: Vec<Equipment>,
    ) -> Self {
        Self {
            properties,
            children,
            ..Self::new(id, Some(data), class)
        }
    }

    /// Restores the version read from storage.
    ///
    /// For persistence code rebuilding an aggregate from its stored document;
    /// anything built by the adapter starts at version 1.
    pub fn restore_version(&mut self, version: Version) {
        self.version = version;
    }
}

// Query methods
impl Equipment {
    pub fn id(&self) -> &EquipmentId {
        &self.id
    }

    /// Returns the class this equipment belongs to.
    pub fn class(&self) -> Option<&Arc<EquipmentClass>> {
        self.class.as_ref()
    }

    /// Returns the stored B2MML element.
    pub fn b2mml_data(&self) -> Option<&Arc<EquipmentType>> {
        self.data.as_ref()
    }

    pub fn properties(&self) -> &[EquipmentProperty] {
        &self.properties
    }

    pub fn children(&self) -> &[Equipment] {
        &self.children
    }

    pub fn operating_status(&self) -> Option<OperatingStatus> {
        self.operating_status
    }

    /// Returns the version used for optimistic locking.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns true if the operating status is `Active`.
    pub fn is_active(&self) -> bool {
        self.operating_status == Some(OperatingStatus::Active)
    }

    /// Returns the validity window from the stored record.
    ///
    /// The end date is optional; a missing record or start date is an error.
    pub fn effective_date(&self) -> Result<(&DateTimeType, Option<&DateTimeType>)> {
        let data = self.data.as_deref().ok_or(DomainError::EffectiveDatesNotSet)?;
        let start = data
            .effective_start_date
            .as_ref()
            .ok_or(DomainError::EffectiveDatesNotSet)?;
        Ok((start, data.effective_end_date.as_ref()))
    }

    /// Returns the physical asset reference from the stored record.
    pub fn physical_asset_ref(&self) -> Option<&IdentifierType> {
        self.data.as_deref()?.physical_asset_id.as_ref()
    }

    /// Returns the hierarchy scope from the stored record.
    pub fn hierarchy_scope(&self) -> Option<&HierarchyScopeType> {
        self.data.as_deref()?.hierarchy_scope.as_ref()
    }

    /// Returns the equipment level from the stored record.
    pub fn equipment_level(&self) -> Option<&EquipmentLevelType> {
        self.data.as_deref()?.equipment_level.as_ref()
    }

    /// Counts this node and all of its descendants.
    pub fn tree_size(&self) -> usize {
        1 + self.children.iter().map(Equipment::tree_size).sum::<usize>()
    }
}

// Command methods
impl Equipment {
    /// Adopts a child piece of equipment.
    ///
    /// Duplicates are not detected. Passing `None` is rejected and leaves the
    /// aggregate unchanged.
    pub fn add_child(&mut self, child: impl Into<Option<Equipment>>) -> Result<()> {
        let child = child.into().ok_or(DomainError::EquipmentNotFound)?;
        self.children.push(child);
        self.bump_version();
        Ok(())
    }

    /// Attaches a property. Passing `None` is rejected.
    pub fn add_property(&mut self, property: impl Into<Option<EquipmentProperty>>) -> Result<()> {
        let property = property
            .into()
            .ok_or(DomainError::MissingArgument("property"))?;
        self.properties.push(property);
        self.bump_version();
        Ok(())
    }

    /// Assigns the operating status and returns the event it raises.
    ///
    /// Any status may follow any other; assigning the current status again
    /// still counts as a mutation.
    pub fn set_operating_status(&mut self, status: OperatingStatus) -> EquipmentEvent {
        let old_status = self.operating_status.replace(status);
        self.bump_version();
        EquipmentEvent::status_changed(self.id.clone(), old_status, status)
    }

    fn bump_version(&mut self) {
        self.version = self.version.next();
    }
}
