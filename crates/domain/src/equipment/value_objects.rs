//! Property values and equipment properties.

use std::str::FromStr;
use std::sync::Arc;

use b2mml::EquipmentPropertyType;
use serde::{Deserialize, Serialize};

use super::EquipmentPropertyId;

/// Declared data type of a property value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum DataType {
    #[default]
    String,
    Integer,
    Float,
    DateTime,
    /// Any tag outside the known set, kept verbatim.
    Other(String),
}

impl DataType {
    pub fn as_str(&self) -> &str {
        match self {
            DataType::String => "string",
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::DateTime => "datetime",
            DataType::Other(tag) => tag,
        }
    }
}

impl FromStr for DataType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for DataType {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "string" => DataType::String,
            "integer" | "int" => DataType::Integer,
            "float" | "double" | "decimal" => DataType::Float,
            "datetime" => DataType::DateTime,
            _ => DataType::Other(s.to_string()),
        }
    }
}

impl From<String> for DataType {
    fn from(s: String) -> Self {
        DataType::from(s.as_str())
    }
}

impl From<DataType> for String {
    fn from(data_type: DataType) -> Self {
        data_type.as_str().to_string()
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed scalar attached to an equipment property.
///
/// Compared by value. Once built it never changes; `with_description`
/// produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyValue {
    value: String,
    data_type: DataType,
    unit: Option<String>,
    description: Option<String>,
}

impl PropertyValue {
    /// Creates a value without a unit of measure.
    pub fn new(value: impl Into<String>, data_type: impl Into<DataType>) -> Self {
        Self {
            value: value.into(),
            data_type: data_type.into(),
            unit: None,
            description: None,
        }
    }

    /// Creates a value with a unit of measure.
    pub fn with_unit(
        value: impl Into<String>,
        data_type: impl Into<DataType>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            unit: Some(unit.into()),
            ..Self::new(value, data_type)
        }
    }

    /// Returns a copy of this value carrying the given description.
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.unit {
            Some(unit) => write!(f, "{} {}", self.value, unit),
            None => f.write_str(&self.value),
        }
    }
}

/// A property of one specific piece of equipment.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentProperty {
    id: EquipmentPropertyId,
    data: Option<Arc<EquipmentPropertyType>>,
    value: PropertyValue,
}

impl EquipmentProperty {
    pub fn new(
        id: EquipmentPropertyId,
        data: Option<Arc<EquipmentPropertyType>>,
        value: PropertyValue,
    ) -> Self {
        Self { id, data, value }
    }

    pub fn id(&self) -> &EquipmentPropertyId {
        &self.id
    }

    /// Returns the B2MML element this property was read from.
    pub fn b2mml_data(&self) -> Option<&Arc<EquipmentPropertyType>> {
        self.data.as_ref()
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }
}
