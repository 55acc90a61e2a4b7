//! Identifier value objects.
//!
//! Each identifier is its own type so that an equipment ID can never be used
//! where a class ID is expected. All of them wrap a non-empty string.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, IdKind};

macro_rules! text_id {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates the identifier, rejecting empty input.
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                if value.is_empty() {
                    return Err(DomainError::EmptyId($kind));
                }
                Ok(Self(value))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = DomainError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

text_id!(
    /// Identifier of a piece of equipment.
    EquipmentId,
    IdKind::Equipment
);

text_id!(
    /// Identifier of an equipment class.
    EquipmentClassId,
    IdKind::EquipmentClass
);

text_id!(
    /// Identifier of a property attached to a piece of equipment.
    EquipmentPropertyId,
    IdKind::EquipmentProperty
);

text_id!(
    /// Identifier of a property defined on an equipment class.
    EquipmentClassPropertyId,
    IdKind::EquipmentClassProperty
);
