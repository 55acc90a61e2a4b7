//! Shared types for the equipment catalogue workspace.

mod types;

pub use types::{RecordId, Version};
