use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{AggregateRoot, Equipment, EquipmentClass, EquipmentClassId, OperatingStatus};
use tokio::sync::RwLock;

use crate::{
    Pagination, RecordId, RepositoryError, Result, Version,
    store::{EquipmentClassRepository, EquipmentRepository, Stored, UnitOfWork},
};

#[derive(Debug, Clone)]
struct Row<T> {
    stored: Stored<T>,
    deleted_at: Option<DateTime<Utc>>,
}

impl<T: Clone> Row<T> {
    fn new(aggregate: T) -> Self {
        let now = Utc::now();
        Self {
            stored: Stored {
                record_id: RecordId::new(),
                aggregate,
                created_at: now,
                updated_at: now,
            },
            deleted_at: None,
        }
    }

    fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Everything the store holds. `generation` advances on every write so a
/// transaction can tell whether the state it copied is still current.
#[derive(Debug, Clone, Default)]
struct CatalogState {
    generation: u64,
    equipment: Vec<Row<Equipment>>,
    classes: Vec<Row<Arc<EquipmentClass>>>,
}

impl CatalogState {
    fn touch(&mut self) {
        self.generation += 1;
    }
}

fn live<T: Clone>(rows: &[Row<T>]) -> impl Iterator<Item = &Row<T>> {
    rows.iter().filter(|row| row.is_live())
}

fn live_mut<T: Clone>(rows: &mut [Row<T>]) -> impl Iterator<Item = &mut Row<T>> {
    rows.iter_mut().filter(|row| row.is_live())
}

type SharedState = Arc<RwLock<CatalogState>>;

/// In-memory equipment repository.
///
/// Obtained from an [`InMemoryUnitOfWork`]; it reads and writes the state
/// of the unit of work it came from.
#[derive(Clone)]
pub struct InMemoryEquipmentRepository {
    state: SharedState,
}

#[async_trait]
impl EquipmentRepository for InMemoryEquipmentRepository {
    async fn create(&self, equipment: &Equipment) -> Result<RecordId> {
        let mut state = self.state.write().await;
        let external_id = equipment.external_id();

        if live(&state.equipment).any(|row| row.stored.aggregate.external_id() == external_id) {
            return Err(RepositoryError::EquipmentAlreadyExists(
                external_id.to_string(),
            ));
        }

        let row = Row::new(equipment.clone());
        let record_id = row.stored.record_id;
        state.equipment.push(row);
        state.touch();

        tracing::debug!(%record_id, external_id, "equipment stored");
        Ok(record_id)
    }

    async fn get_by_id(&self, id: RecordId) -> Result<Stored<Equipment>> {
        let state = self.state.read().await;
        live(&state.equipment)
            .find(|row| row.stored.record_id == id)
            .map(|row| row.stored.clone())
            .ok_or_else(|| RepositoryError::equipment_not_found(id))
    }

    async fn get_by_external_id(&self, external_id: &str) -> Result<Stored<Equipment>> {
        let state = self.state.read().await;
        live(&state.equipment)
            .find(|row| row.stored.aggregate.external_id() == external_id)
            .map(|row| row.stored.clone())
            .ok_or_else(|| RepositoryError::EquipmentNotFound(external_id.to_string()))
    }

    async fn list(&self, page: Pagination) -> Result<Vec<Stored<Equipment>>> {
        let state = self.state.read().await;
        Ok(page
            .apply(live(&state.equipment))
            .map(|row| row.stored.clone())
            .collect())
    }

    async fn list_by_status(
        &self,
        status: OperatingStatus,
        page: Pagination,
    ) -> Result<Vec<Stored<Equipment>>> {
        let state = self.state.read().await;
        let matching = live(&state.equipment)
            .filter(|row| row.stored.aggregate.operating_status() == Some(status));
        Ok(page.apply(matching).map(|row| row.stored.clone()).collect())
    }

    async fn update(&self, equipment: &Equipment, expected: Version) -> Result<()> {
        let mut state = self.state.write().await;
        let external_id = equipment.external_id();

        let row = live_mut(&mut state.equipment)
            .find(|row| row.stored.aggregate.external_id() == external_id)
            .ok_or_else(|| RepositoryError::EquipmentNotFound(external_id.to_string()))?;

        let actual = row.stored.aggregate.version();
        if actual != expected {
            tracing::debug!(external_id, %expected, %actual, "stale equipment update rejected");
            return Err(RepositoryError::ConcurrencyConflict {
                external_id: external_id.to_string(),
                expected,
                actual,
            });
        }

        row.stored.aggregate = equipment.clone();
        row.stored.updated_at = Utc::now();
        state.touch();

        tracing::debug!(external_id, version = %equipment.version(), "equipment updated");
        Ok(())
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        let mut state = self.state.write().await;
        let row = live_mut(&mut state.equipment)
            .find(|row| row.stored.record_id == id)
            .ok_or_else(|| RepositoryError::equipment_not_found(id))?;

        row.deleted_at = Some(Utc::now());
        state.touch();

        tracing::debug!(record_id = %id, "equipment soft-deleted");
        Ok(())
    }
}

/// In-memory equipment class repository.
#[derive(Clone)]
pub struct InMemoryEquipmentClassRepository {
    state: SharedState,
}

#[async_trait]
impl EquipmentClassRepository for InMemoryEquipmentClassRepository {
    async fn create(&self, class: Arc<EquipmentClass>) -> Result<RecordId> {
        let mut state = self.state.write().await;
        let external_id = class.external_id();

        if live(&state.classes).any(|row| row.stored.aggregate.external_id() == external_id) {
            return Err(RepositoryError::EquipmentClassAlreadyExists(
                external_id.to_string(),
            ));
        }

        let external_id = external_id.to_string();
        let row = Row::new(class);
        let record_id = row.stored.record_id;
        state.classes.push(row);
        state.touch();

        tracing::debug!(%record_id, %external_id, "equipment class stored");
        Ok(record_id)
    }

    async fn get_by_id(&self, id: RecordId) -> Result<Stored<Arc<EquipmentClass>>> {
        let state = self.state.read().await;
        live(&state.classes)
            .find(|row| row.stored.record_id == id)
            .map(|row| row.stored.clone())
            .ok_or_else(|| RepositoryError::class_not_found(id))
    }

    async fn get_by_external_id(&self, external_id: &str) -> Result<Stored<Arc<EquipmentClass>>> {
        let state = self.state.read().await;
        live(&state.classes)
            .find(|row| row.stored.aggregate.external_id() == external_id)
            .map(|row| row.stored.clone())
            .ok_or_else(|| RepositoryError::EquipmentClassNotFound(external_id.to_string()))
    }

    async fn list(&self, page: Pagination) -> Result<Vec<Stored<Arc<EquipmentClass>>>> {
        let state = self.state.read().await;
        Ok(page
            .apply(live(&state.classes))
            .map(|row| row.stored.clone())
            .collect())
    }

    async fn resolve(&self, external_id: &str) -> Result<Arc<EquipmentClass>> {
        let not_found = || RepositoryError::EquipmentClassNotFound(external_id.to_string());
        let id = EquipmentClassId::new(external_id).map_err(|_| not_found())?;

        let state = self.state.read().await;
        if let Some(row) = live(&state.classes).find(|row| row.stored.aggregate.id() == &id) {
            return Ok(row.stored.aggregate.clone());
        }

        let nested = live(&state.classes)
            .find_map(|row| row.stored.aggregate.find(&id))
            .ok_or_else(not_found)?;
        tracing::debug!(%external_id, "resolved nested equipment class");
        Ok(Arc::new(nested.clone()))
    }

    async fn update(&self, class: Arc<EquipmentClass>) -> Result<()> {
        let mut state = self.state.write().await;
        let external_id = class.external_id().to_string();

        let row = live_mut(&mut state.classes)
            .find(|row| row.stored.aggregate.external_id() == external_id)
            .ok_or(RepositoryError::EquipmentClassNotFound(external_id))?;

        row.stored.aggregate = class;
        row.stored.updated_at = Utc::now();
        state.touch();
        Ok(())
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        let mut state = self.state.write().await;
        let row = live_mut(&mut state.classes)
            .find(|row| row.stored.record_id == id)
            .ok_or_else(|| RepositoryError::class_not_found(id))?;

        row.deleted_at = Some(Utc::now());
        state.touch();

        tracing::debug!(record_id = %id, "equipment class soft-deleted");
        Ok(())
    }
}

/// In-memory unit of work for tests and the importer.
///
/// A handle created with `new` writes straight to the shared state. `begin`
/// returns a handle working on a private copy, which `commit` swaps in if
/// nothing else was committed in the meantime. Cloned handles share state.
#[derive(Clone)]
pub struct InMemoryUnitOfWork {
    committed: SharedState,

    /// Generation of the committed state when the transaction began.
    base_generation: Option<u64>,

    equipment: InMemoryEquipmentRepository,
    classes: InMemoryEquipmentClassRepository,
}

impl InMemoryUnitOfWork {
    /// Creates an empty store.
    pub fn new() -> Self {
        let state = SharedState::default();
        Self::over(state.clone(), state, None)
    }

    fn over(committed: SharedState, working: SharedState, base_generation: Option<u64>) -> Self {
        Self {
            committed,
            base_generation,
            equipment: InMemoryEquipmentRepository {
                state: working.clone(),
            },
            classes: InMemoryEquipmentClassRepository { state: working },
        }
    }

    /// Returns true if this handle is a transaction.
    pub fn in_transaction(&self) -> bool {
        self.base_generation.is_some()
    }

    /// Returns the number of stored equipment records, deleted ones included.
    pub async fn equipment_count(&self) -> usize {
        self.equipment.state.read().await.equipment.len()
    }
}

impl Default for InMemoryUnitOfWork {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    type Equipment = InMemoryEquipmentRepository;
    type EquipmentClasses = InMemoryEquipmentClassRepository;

    fn equipment(&self) -> &Self::Equipment {
        &self.equipment
    }

    fn equipment_classes(&self) -> &Self::EquipmentClasses {
        &self.classes
    }

    async fn begin(&self) -> Result<Self> {
        let snapshot = self.committed.read().await.clone();
        let base_generation = snapshot.generation;
        let working = Arc::new(RwLock::new(snapshot));

        Ok(Self::over(
            self.committed.clone(),
            working,
            Some(base_generation),
        ))
    }

    async fn commit(self) -> Result<()> {
        let base = self.base_generation.ok_or(RepositoryError::NoTransaction)?;

        let mut committed = self.committed.write().await;
        let mut working = std::mem::take(&mut *self.equipment.state.write().await);
        if working.generation == base {
            return Ok(());
        }

        if committed.generation != base {
            tracing::debug!(
                base,
                current = committed.generation,
                "transaction conflict on commit"
            );
            return Err(RepositoryError::TransactionConflict);
        }

        working.generation = base + 1;
        *committed = working;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        self.base_generation
            .map(|_| ())
            .ok_or(RepositoryError::NoTransaction)
    }
}
