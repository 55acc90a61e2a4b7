//! Conversion between B2MML documents and the equipment aggregates.
//!
//! Documents coming from other plant systems are often partially malformed,
//! typically nested elements without an `ID`. Building is therefore lenient:
//! a node whose identifier cannot be derived is skipped together with its
//! subtree, the rest of the document is still ingested, and every omission
//! is reported back to the caller in [`Built::skipped`].

use std::sync::Arc;

use b2mml::{EquipmentClassPropertyType, EquipmentClassType, EquipmentPropertyType, EquipmentType};

use crate::error::{DomainError, Result};

use super::{
    DataType, Equipment, EquipmentClass, EquipmentClassId, EquipmentClassProperty,
    EquipmentClassPropertyId, EquipmentId, EquipmentProperty, EquipmentPropertyId, PropertyValue,
};

/// The kind of document node that was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    EquipmentProperty,
    Equipment,
    EquipmentClassProperty,
    EquipmentClass,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::EquipmentProperty => "EquipmentProperty",
            NodeKind::Equipment => "Equipment",
            NodeKind::EquipmentClassProperty => "EquipmentClassProperty",
            NodeKind::EquipmentClass => "EquipmentClass",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document node that was left out of the built aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedNode {
    pub kind: NodeKind,

    /// Location in the document, e.g. `EQ-100/Equipment[0]:EQ-101/EquipmentProperty[2]`.
    pub path: String,

    pub reason: DomainError,
}

impl std::fmt::Display for SkippedNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// An aggregate built from a document, with the nodes that were skipped.
#[derive(Debug, Clone)]
pub struct Built<T> {
    pub value: T,
    pub skipped: Vec<SkippedNode>,
}

impl<T> Built<T> {
    /// Returns true if no node was skipped.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (T, Vec<SkippedNode>) {
        (self.value, self.skipped)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Built<U> {
        Built {
            value: f(self.value),
            skipped: self.skipped,
        }
    }
}

struct Skips {
    nodes: Vec<SkippedNode>,
}

impl Skips {
    fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn record(&mut self, kind: NodeKind, path: String, reason: DomainError) {
        tracing::debug!(%kind, %path, %reason, "skipping malformed b2mml node");
        self.nodes.push(SkippedNode { kind, path, reason });
    }
}

fn indexed(parent: &str, kind: NodeKind, index: usize) -> String {
    format!("{parent}/{kind}[{index}]")
}

/// Path of a built child. The index keeps siblings with equal IDs apart.
fn child_node_path(
    parent: &str,
    kind: NodeKind,
    index: usize,
    id: &impl std::fmt::Display,
) -> String {
    format!("{}:{id}", indexed(parent, kind, index))
}

// Equipment
impl Equipment {
    /// Builds an equipment tree from a B2MML element.
    ///
    /// Fails only if no document is given. Properties and child equipment
    /// whose ID is missing or empty are skipped individually; child
    /// equipment share `class` with their parent. The result is at version 1
    /// whatever the number of attached nodes.
    pub fn from_b2mml(
        id: EquipmentId,
        data: Option<Arc<EquipmentType>>,
        class: Option<Arc<EquipmentClass>>,
    ) -> Result<Built<Equipment>> {
        let data = data.ok_or(DomainError::MissingDocument)?;
        let mut skips = Skips::new();
        let path = id.to_string();
        let value = build_equipment(id, data, class, &path, &mut skips);
        Ok(Built {
            value,
            skipped: skips.nodes,
        })
    }

    /// Builds an equipment tree, taking the root ID from the document itself.
    pub fn from_document(
        data: Arc<EquipmentType>,
        class: Option<Arc<EquipmentClass>>,
    ) -> Result<Built<Equipment>> {
        let id = EquipmentId::new(data.id_value().unwrap_or_default())?;
        Self::from_b2mml(id, Some(data), class)
    }

    /// Returns the B2MML element exactly as it was stored on the aggregate.
    ///
    /// The element is not regenerated from the aggregate's current state:
    /// status changes and attached properties or children do not show up in
    /// it unless the stored element is replaced as well.
    pub fn to_b2mml(&self) -> Option<Arc<EquipmentType>> {
        self.b2mml_data().cloned()
    }
}

impl EquipmentProperty {
    /// Builds a property from a B2MML element.
    ///
    /// The value comes from the element's first `Value` entry. Elements
    /// without one get their ID as a `string` value.
    pub fn from_b2mml(data: Arc<EquipmentPropertyType>) -> Result<EquipmentProperty> {
        let id = EquipmentPropertyId::new(data.id_value().unwrap_or_default())?;
        let value = property_value(&data, &id);
        Ok(EquipmentProperty::new(id, Some(data), value))
    }
}

fn property_value(data: &EquipmentPropertyType, id: &EquipmentPropertyId) -> PropertyValue {
    let value = match data.value.first() {
        Some(entry) => {
            let data_type = entry
                .data_type
                .as_deref()
                .map(DataType::from)
                .unwrap_or_default();
            match &entry.unit_of_measure {
                Some(unit) => {
                    PropertyValue::with_unit(entry.value_string.clone(), data_type, unit.clone())
                }
                None => PropertyValue::new(entry.value_string.clone(), data_type),
            }
        }
        None => PropertyValue::new(id.as_str(), DataType::String),
    };

    match data.description.first() {
        Some(description) => value.with_description(description.value.clone()),
        None => value,
    }
}

fn build_equipment(
    id: EquipmentId,
    data: Arc<EquipmentType>,
    class: Option<Arc<EquipmentClass>>,
    path: &str,
    skips: &mut Skips,
) -> Equipment {
    let mut properties = Vec::with_capacity(data.equipment_property.len());
    for (index, node) in data.equipment_property.iter().enumerate() {
        match EquipmentProperty::from_b2mml(Arc::new(node.clone())) {
            Ok(property) => properties.push(property),
            Err(reason) => skips.record(
                NodeKind::EquipmentProperty,
                indexed(path, NodeKind::EquipmentProperty, index),
                reason,
            ),
        }
    }

    let mut children = Vec::with_capacity(data.equipment_child.len());
    for (index, node) in data.equipment_child.iter().enumerate() {
        match EquipmentId::new(node.id_value().unwrap_or_default()) {
            Ok(child_id) => {
                let child_path = child_node_path(path, NodeKind::Equipment, index, &child_id);
                children.push(build_equipment(
                    child_id,
                    Arc::new(node.clone()),
                    class.clone(),
                    &child_path,
                    skips,
                ));
            }
            Err(reason) => skips.record(
                NodeKind::Equipment,
                indexed(path, NodeKind::Equipment, index),
                reason,
            ),
        }
    }

    Equipment::from_parts(id, data, class, properties, children)
}

// Equipment class
impl EquipmentClass {
    /// Builds a class tree from a B2MML element.
    ///
    /// Class properties are built recursively. A class property or child
    /// class without a usable ID is skipped together with its subtree; its
    /// siblings are still built.
    pub fn from_b2mml(
        id: EquipmentClassId,
        data: Option<Arc<EquipmentClassType>>,
    ) -> Result<Built<EquipmentClass>> {
        let data = data.ok_or(DomainError::MissingDocument)?;
        let mut skips = Skips::new();
        let path = id.to_string();
        let value = build_class(id, data, &path, &mut skips);
        Ok(Built {
            value,
            skipped: skips.nodes,
        })
    }

    /// Builds a class tree, taking the root ID from the document itself.
    pub fn from_document(data: Arc<EquipmentClassType>) -> Result<Built<EquipmentClass>> {
        let id = EquipmentClassId::new(data.id_value().unwrap_or_default())?;
        Self::from_b2mml(id, Some(data))
    }

    /// Returns the B2MML element exactly as it was stored on the class.
    pub fn to_b2mml(&self) -> Option<Arc<EquipmentClassType>> {
        self.b2mml_data().cloned()
    }
}

fn build_class(
    id: EquipmentClassId,
    data: Arc<EquipmentClassType>,
    path: &str,
    skips: &mut Skips,
) -> EquipmentClass {
    let properties = build_class_properties(&data.equipment_class_property, path, skips);

    let mut children = Vec::with_capacity(data.equipment_class_child.len());
    for (index, node) in data.equipment_class_child.iter().enumerate() {
        match EquipmentClassId::new(node.id_value().unwrap_or_default()) {
            Ok(child_id) => {
                let child_path = child_node_path(path, NodeKind::EquipmentClass, index, &child_id);
                children.push(build_class(
                    child_id,
                    Arc::new(node.clone()),
                    &child_path,
                    skips,
                ));
            }
            Err(reason) => skips.record(
                NodeKind::EquipmentClass,
                indexed(path, NodeKind::EquipmentClass, index),
                reason,
            ),
        }
    }

    EquipmentClass::from_parts(id, data, properties, children)
}

fn build_class_properties(
    nodes: &[EquipmentClassPropertyType],
    path: &str,
    skips: &mut Skips,
) -> Vec<EquipmentClassProperty> {
    let mut properties = Vec::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        match EquipmentClassPropertyId::new(node.id_value().unwrap_or_default()) {
            Ok(id) => {
                let child_path =
                    child_node_path(path, NodeKind::EquipmentClassProperty, index, &id);
                let children =
                    build_class_properties(&node.equipment_class_property, &child_path, skips);
                properties.push(EquipmentClassProperty::from_parts(
                    id,
                    Arc::new(node.clone()),
                    children,
                ));
            }
            Err(reason) => skips.record(
                NodeKind::EquipmentClassProperty,
                indexed(path, NodeKind::EquipmentClassProperty, index),
                reason,
            ),
        }
    }
    properties
}
