//! Scalar building blocks shared by the B2MML document types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A B2MML identifier element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdentifierType {
    /// The identifier text. May be empty in malformed documents.
    pub value: String,

    #[serde(rename = "SchemeID", default, skip_serializing_if = "Option::is_none")]
    pub scheme_id: Option<String>,

    #[serde(
        rename = "SchemeAgencyID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub scheme_agency_id: Option<String>,
}

impl IdentifierType {
    /// Creates an identifier without scheme attributes.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }
}

impl From<&str> for IdentifierType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Free-text description, optionally tagged with a language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescriptionType {
    pub value: String,

    #[serde(rename = "LanguageID", default, skip_serializing_if = "Option::is_none")]
    pub language_id: Option<String>,
}

impl DescriptionType {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language_id: None,
        }
    }
}

/// A point in time as carried by B2MML (`EffectiveStartDate`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DateTimeType {
    pub value: DateTime<Utc>,
}

impl DateTimeType {
    pub fn new(value: DateTime<Utc>) -> Self {
        Self { value }
    }
}

/// A property value entry (`Value` element).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValueType {
    pub value_string: String,

    /// Declared data type such as `string`, `integer`, `float`, `dateTime`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measure: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl ValueType {
    pub fn new(value_string: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            value_string: value_string.into(),
            data_type: Some(data_type.into()),
            ..Default::default()
        }
    }

    /// Sets the unit of measure.
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit_of_measure = Some(unit.into());
        self
    }
}

/// ISA-95 equipment element level (`Site`, `Area`, `WorkCell`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EquipmentLevelType {
    pub value: String,

    /// Set when `value` is `Other`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_value: Option<String>,
}

impl EquipmentLevelType {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            other_value: None,
        }
    }
}

/// Position of an element in the role-based equipment hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HierarchyScopeType {
    #[serde(rename = "EquipmentID")]
    pub equipment_id: IdentifierType,

    pub equipment_element_level: EquipmentLevelType,

    /// Nested scope, innermost last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy_scope: Option<Box<HierarchyScopeType>>,
}

impl HierarchyScopeType {
    pub fn new(equipment_id: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            equipment_id: IdentifierType::new(equipment_id),
            equipment_element_level: EquipmentLevelType::new(level),
            hierarchy_scope: None,
        }
    }

    /// Returns the nesting depth of this scope (1 for a scope without children).
    pub fn depth(&self) -> usize {
        1 + self.hierarchy_scope.as_ref().map_or(0, |inner| inner.depth())
    }
}
