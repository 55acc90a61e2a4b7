//! Operating status of a piece of equipment.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The operating status of a physical asset.
///
/// There is no transition table: any status can be assigned from any other.
/// A freshly created aggregate has no status until one is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingStatus {
    /// In service.
    Active,

    /// Out of service.
    Inactive,

    /// Undergoing maintenance.
    Maintenance,
}

impl OperatingStatus {
    /// All statuses, in declaration order.
    pub const ALL: [OperatingStatus; 3] = [
        OperatingStatus::Active,
        OperatingStatus::Inactive,
        OperatingStatus::Maintenance,
    ];

    /// Returns the status name as stored and exchanged.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingStatus::Active => "active",
            OperatingStatus::Inactive => "inactive",
            OperatingStatus::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for OperatingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::InvalidStatus(s.to_string()))
    }
}
