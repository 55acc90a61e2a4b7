pub mod error;
pub mod memory;
pub mod query;
pub mod store;

pub use common::{RecordId, Version};
pub use error::{RepositoryError, Result};
pub use memory::InMemoryUnitOfWork;
pub use query::Pagination;
pub use store::{EquipmentClassRepository, EquipmentRepository, Stored, UnitOfWork};
