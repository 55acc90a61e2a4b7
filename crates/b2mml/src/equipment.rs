//! Equipment and equipment class documents.

use serde::{Deserialize, Serialize};

use crate::common::{
    DateTimeType, DescriptionType, EquipmentLevelType, HierarchyScopeType, IdentifierType,
    ValueType,
};

/// A single piece of equipment, possibly with nested child equipment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EquipmentType {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IdentifierType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<DescriptionType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_level: Option<EquipmentLevelType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy_scope: Option<HierarchyScopeType>,

    #[serde(
        rename = "PhysicalAssetID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub physical_asset_id: Option<IdentifierType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_start_date: Option<DateTimeType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_end_date: Option<DateTimeType>,

    #[serde(
        rename = "EquipmentClassID",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub equipment_class_id: Vec<IdentifierType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equipment_property: Vec<EquipmentPropertyType>,

    #[serde(rename = "Equipment", default, skip_serializing_if = "Vec::is_empty")]
    pub equipment_child: Vec<EquipmentType>,
}

impl EquipmentType {
    /// Creates an otherwise empty document carrying only an ID.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(IdentifierType::new(id)),
            ..Default::default()
        }
    }

    /// Returns the ID text, if the element carries one.
    pub fn id_value(&self) -> Option<&str> {
        self.id.as_ref().map(|id| id.value.as_str())
    }

    /// Returns the first referenced equipment class ID.
    pub fn primary_class_id(&self) -> Option<&str> {
        self.equipment_class_id.first().map(|id| id.value.as_str())
    }
}

/// A property attached to a piece of equipment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EquipmentPropertyType {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IdentifierType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<DescriptionType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value: Vec<ValueType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equipment_property: Vec<EquipmentPropertyType>,
}

impl EquipmentPropertyType {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(IdentifierType::new(id)),
            ..Default::default()
        }
    }

    pub fn id_value(&self) -> Option<&str> {
        self.id.as_ref().map(|id| id.value.as_str())
    }
}

/// An equipment class definition, possibly with nested child classes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EquipmentClassType {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IdentifierType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<DescriptionType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_level: Option<EquipmentLevelType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy_scope: Option<HierarchyScopeType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equipment_class_property: Vec<EquipmentClassPropertyType>,

    #[serde(
        rename = "EquipmentClass",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub equipment_class_child: Vec<EquipmentClassType>,
}

impl EquipmentClassType {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(IdentifierType::new(id)),
            ..Default::default()
        }
    }

    pub fn id_value(&self) -> Option<&str> {
        self.id.as_ref().map(|id| id.value.as_str())
    }
}

/// A property defined on an equipment class. Class properties nest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EquipmentClassPropertyType {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IdentifierType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<DescriptionType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value: Vec<ValueType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equipment_class_property: Vec<EquipmentClassPropertyType>,
}

impl EquipmentClassPropertyType {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(IdentifierType::new(id)),
            ..Default::default()
        }
    }

    pub fn id_value(&self) -> Option<&str> {
        self.id.as_ref().map(|id| id.value.as_str())
    }
}

/// Root of an equipment information exchange: classes and equipment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EquipmentInformation {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IdentifierType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equipment_class: Vec<EquipmentClassType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equipment: Vec<EquipmentType>,
}

impl EquipmentInformation {
    /// Parses a JSON-encoded document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parses a JSON-encoded document from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Encodes the document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
