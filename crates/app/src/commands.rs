//! Inputs and reports of the equipment use cases.

use b2mml::EquipmentType;
use domain::{NodeKind, OperatingStatus, SkippedNode};

use crate::error::AppError;

/// Request to create equipment from a B2MML element.
#[derive(Debug, Clone)]
pub struct CreateEquipment {
    /// The equipment element; its `ID` becomes the external ID.
    pub document: EquipmentType,

    /// External ID of the class to attach. Falls back to the element's first
    /// `EquipmentClassID` when absent.
    pub class_id: Option<String>,

    /// Status assigned right after creation.
    pub status: Option<OperatingStatus>,
}

impl CreateEquipment {
    pub fn new(document: EquipmentType) -> Self {
        Self {
            document,
            class_id: None,
            status: None,
        }
    }

    pub fn with_class(mut self, class_id: impl Into<String>) -> Self {
        self.class_id = Some(class_id.into());
        self
    }

    pub fn with_status(mut self, status: OperatingStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// The class to resolve, explicit or taken from the document.
    pub fn resolved_class_id(&self) -> Option<&str> {
        self.class_id
            .as_deref()
            .or_else(|| self.document.primary_class_id())
            .filter(|id| !id.is_empty())
    }
}

/// A top-level element that could not be imported.
#[derive(Debug)]
pub struct ImportFailure {
    /// `Equipment` or `EquipmentClass`.
    pub kind: NodeKind,

    /// Position among the document's elements of that kind.
    pub index: usize,

    pub external_id: Option<String>,

    pub error: AppError,
}

/// Outcome of importing an `EquipmentInformation` document.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// External IDs of the registered classes, in document order.
    pub classes_registered: Vec<String>,

    /// External IDs of the created equipment, in document order.
    pub equipment_created: Vec<String>,

    pub failures: Vec<ImportFailure>,

    /// Nested nodes left out of otherwise imported elements.
    pub skipped: Vec<SkippedNode>,
}

impl ImportReport {
    /// Returns true if every element and every nested node was imported.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.skipped.is_empty()
    }

    pub fn imported_count(&self) -> usize {
        self.classes_registered.len() + self.equipment_created.len()
    }
}
