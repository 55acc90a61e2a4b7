//! Equipment use cases.

use std::sync::Arc;

use b2mml::{EquipmentClassType, EquipmentInformation, EquipmentPropertyType, EquipmentType};
use domain::{
    AggregateRoot, Built, Equipment, EquipmentClass, EquipmentProperty, NodeKind, OperatingStatus,
};
use repository::{
    EquipmentClassRepository, EquipmentRepository, Pagination, Stored, UnitOfWork,
};

use crate::commands::{CreateEquipment, ImportFailure, ImportReport};
use crate::error::{AppError, Result};
use crate::outbox::{EventSink, Outbox};

/// Service for managing equipment and equipment classes.
///
/// Each mutating method opens a unit of work, applies the change, commits,
/// and then hands the raised events to the sink. Nothing reaches the sink if
/// the unit of work is rolled back.
pub struct EquipmentService<U: UnitOfWork, S: EventSink> {
    uow: U,
    sink: S,
}

impl<U: UnitOfWork, S: EventSink> EquipmentService<U, S> {
    pub fn new(uow: U, sink: S) -> Self {
        Self { uow, sink }
    }

    /// Returns a reference to the underlying unit of work.
    pub fn unit_of_work(&self) -> &U {
        &self.uow
    }

    /// Returns a reference to the event sink.
    pub fn event_sink(&self) -> &S {
        &self.sink
    }

    /// Lists equipment in insertion order.
    ///
    /// A `limit` of zero or less means 10, anything above 100 means 100, and a
    /// negative `offset` means 0.
    #[tracing::instrument(skip(self))]
    pub async fn list_equipment(&self, limit: i64, offset: i64) -> Result<Vec<Equipment>> {
        let page = Pagination::clamped(limit, offset);
        let stored = self.uow.equipment().list(page).await?;
        Ok(stored.into_iter().map(Stored::into_aggregate).collect())
    }

    /// Lists equipment with the given status, paginated like `list_equipment`.
    #[tracing::instrument(skip(self))]
    pub async fn list_equipment_by_status(
        &self,
        status: OperatingStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Equipment>> {
        let page = Pagination::clamped(limit, offset);
        let stored = self.uow.equipment().list_by_status(status, page).await?;
        Ok(stored.into_iter().map(Stored::into_aggregate).collect())
    }

    /// Loads equipment by its external ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_equipment(&self, external_id: &str) -> Result<Equipment> {
        if external_id.is_empty() {
            return Err(AppError::Validation("external_id is required".to_string()));
        }
        let stored = self.uow.equipment().get_by_external_id(external_id).await?;
        Ok(stored.into_aggregate())
    }

    /// Builds a class tree from a B2MML element and registers it.
    #[tracing::instrument(skip(self, document), fields(class_id = ?document.id_value()))]
    pub async fn register_class(
        &self,
        document: EquipmentClassType,
    ) -> Result<Built<Arc<EquipmentClass>>> {
        let built = EquipmentClass::from_document(Arc::new(document))?.map(Arc::new);
        record_skips(&built);

        let tx = self.uow.begin().await?;
        let outcome = register_class_in(&tx, built).await;
        let built = self.finish(tx, outcome).await?;

        metrics::counter!("equipment_classes_registered_total").increment(1);
        tracing::info!(class_id = %built.value.id(), "equipment class registered");
        Ok(built)
    }

    /// Builds equipment from a B2MML element and stores it.
    ///
    /// The class is looked up by external ID and must already be registered.
    #[tracing::instrument(skip(self, cmd), fields(equipment_id = ?cmd.document.id_value()))]
    pub async fn create_equipment(&self, cmd: CreateEquipment) -> Result<Built<Equipment>> {
        if cmd.document.id_value().unwrap_or_default().is_empty() {
            return Err(AppError::Validation("equipment ID is required".to_string()));
        }

        let tx = self.uow.begin().await?;
        let outcome = create_equipment_in(&tx, cmd).await;
        let built = self.finish(tx, outcome).await?;

        record_skips(&built);
        metrics::counter!("equipment_created_total").increment(1);
        tracing::info!(
            equipment_id = %built.value.id(),
            nodes = built.value.tree_size(),
            "equipment created"
        );
        Ok(built)
    }

    /// Assigns the operating status of stored equipment.
    #[tracing::instrument(skip(self))]
    pub async fn change_status(
        &self,
        external_id: &str,
        status: OperatingStatus,
    ) -> Result<Equipment> {
        let tx = self.uow.begin().await?;
        let outcome = change_status_in(&tx, external_id, status).await;
        let equipment = self.finish(tx, outcome).await?;

        metrics::counter!("equipment_status_changes_total", "status" => status.as_str())
            .increment(1);
        Ok(equipment)
    }

    /// Attaches a property built from a B2MML element to stored equipment.
    #[tracing::instrument(skip(self, document), fields(property_id = ?document.id_value()))]
    pub async fn add_property(
        &self,
        external_id: &str,
        document: EquipmentPropertyType,
    ) -> Result<Equipment> {
        let property = EquipmentProperty::from_b2mml(Arc::new(document))?;

        let tx = self.uow.begin().await?;
        let outcome = add_property_in(&tx, external_id, property).await;
        self.finish(tx, outcome).await
    }

    /// Builds child equipment from a B2MML element and attaches it to stored
    /// equipment. The child shares the parent's class.
    #[tracing::instrument(skip(self, document), fields(child_id = ?document.id_value()))]
    pub async fn add_child(
        &self,
        external_id: &str,
        document: EquipmentType,
    ) -> Result<Built<Equipment>> {
        let tx = self.uow.begin().await?;
        let outcome = add_child_in(&tx, external_id, document).await;
        let built = self.finish(tx, outcome).await?;
        record_skips(&built);
        Ok(built)
    }

    /// Soft-deletes stored equipment.
    #[tracing::instrument(skip(self))]
    pub async fn delete_equipment(&self, external_id: &str) -> Result<()> {
        if external_id.is_empty() {
            return Err(AppError::Validation("external_id is required".to_string()));
        }

        let tx = self.uow.begin().await?;
        let outcome = delete_equipment_in(&tx, external_id).await;
        self.finish(tx, outcome).await?;

        metrics::counter!("equipment_deleted_total").increment(1);
        Ok(())
    }

    /// Imports a whole `EquipmentInformation` document.
    ///
    /// Classes are registered first so that equipment can refer to them. Each
    /// top-level element is imported in its own unit of work; one that fails
    /// is reported and the import carries on with the next.
    #[tracing::instrument(
        skip(self, information),
        fields(
            classes = information.equipment_class.len(),
            equipment = information.equipment.len()
        )
    )]
    pub async fn import(&self, information: EquipmentInformation) -> ImportReport {
        let mut report = ImportReport::default();

        for (index, document) in information.equipment_class.into_iter().enumerate() {
            let external_id = document.id_value().map(str::to_string);
            match self.register_class(document).await {
                Ok(built) => {
                    report.classes_registered.push(built.value.id().to_string());
                    report.skipped.extend(built.skipped);
                }
                Err(error) => {
                    tracing::warn!(index, ?external_id, %error, "equipment class not imported");
                    report.failures.push(ImportFailure {
                        kind: NodeKind::EquipmentClass,
                        index,
                        external_id,
                        error,
                    });
                }
            }
        }

        for (index, document) in information.equipment.into_iter().enumerate() {
            let external_id = document.id_value().map(str::to_string);
            match self.create_equipment(CreateEquipment::new(document)).await {
                Ok(built) => {
                    report.equipment_created.push(built.value.id().to_string());
                    report.skipped.extend(built.skipped);
                }
                Err(error) => {
                    tracing::warn!(index, ?external_id, %error, "equipment not imported");
                    report.failures.push(ImportFailure {
                        kind: NodeKind::Equipment,
                        index,
                        external_id,
                        error,
                    });
                }
            }
        }

        metrics::counter!("equipment_import_failures_total").increment(report.failures.len() as u64);
        report
    }

    /// Commits or rolls back `tx` depending on `outcome`, then dispatches the
    /// collected events.
    async fn finish<T>(&self, tx: U, outcome: Result<(T, Outbox)>) -> Result<T> {
        match outcome {
            Ok((value, outbox)) => {
                tx.commit().await?;
                self.dispatch(outbox).await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn dispatch(&self, outbox: Outbox) -> Result<()> {
        if outbox.is_empty() {
            return Ok(());
        }
        let count = outbox.len();
        if let Err(err) = self.sink.publish(outbox.into_messages()).await {
            tracing::error!(error = %err, count, "committed events were not delivered");
            return Err(err);
        }
        metrics::counter!("domain_events_dispatched_total").increment(count as u64);
        Ok(())
    }
}

fn record_skips<T>(built: &Built<T>) {
    if !built.skipped.is_empty() {
        metrics::counter!("b2mml_nodes_skipped_total").increment(built.skipped.len() as u64);
    }
}

async fn register_class_in<U: UnitOfWork>(
    tx: &U,
    built: Built<Arc<EquipmentClass>>,
) -> Result<(Built<Arc<EquipmentClass>>, Outbox)> {
    let mut outbox = Outbox::new();
    tx.equipment_classes().create(built.value.clone()).await?;
    outbox.record::<EquipmentClass, _>(&built.value.created_event())?;
    Ok((built, outbox))
}

async fn create_equipment_in<U: UnitOfWork>(
    tx: &U,
    cmd: CreateEquipment,
) -> Result<(Built<Equipment>, Outbox)> {
    let class = match cmd.resolved_class_id() {
        Some(class_id) => Some(tx.equipment_classes().resolve(class_id).await?),
        None => None,
    };

    let mut outbox = Outbox::new();
    let mut built = Equipment::from_document(Arc::new(cmd.document), class)?;
    outbox.record::<Equipment, _>(&built.value.created_event())?;

    if let Some(status) = cmd.status {
        let event = built.value.set_operating_status(status);
        outbox.record::<Equipment, _>(&event)?;
    }

    tx.equipment().create(&built.value).await?;
    Ok((built, outbox))
}

async fn change_status_in<U: UnitOfWork>(
    tx: &U,
    external_id: &str,
    status: OperatingStatus,
) -> Result<(Equipment, Outbox)> {
    let mut equipment = tx
        .equipment()
        .get_by_external_id(external_id)
        .await?
        .into_aggregate();
    let loaded = equipment.version();

    let mut outbox = Outbox::new();
    let event = equipment.set_operating_status(status);
    outbox.record::<Equipment, _>(&event)?;

    tx.equipment().update(&equipment, loaded).await?;
    Ok((equipment, outbox))
}

async fn add_property_in<U: UnitOfWork>(
    tx: &U,
    external_id: &str,
    property: EquipmentProperty,
) -> Result<(Equipment, Outbox)> {
    let mut equipment = tx
        .equipment()
        .get_by_external_id(external_id)
        .await?
        .into_aggregate();
    let loaded = equipment.version();

    equipment.add_property(property)?;
    tx.equipment().update(&equipment, loaded).await?;
    Ok((equipment, Outbox::new()))
}

async fn add_child_in<U: UnitOfWork>(
    tx: &U,
    external_id: &str,
    document: EquipmentType,
) -> Result<(Built<Equipment>, Outbox)> {
    let mut parent = tx
        .equipment()
        .get_by_external_id(external_id)
        .await?
        .into_aggregate();
    let loaded = parent.version();

    let (child, skipped) =
        Equipment::from_document(Arc::new(document), parent.class().cloned())?.into_parts();
    parent.add_child(child)?;
    tx.equipment().update(&parent, loaded).await?;

    tracing::debug!(parent = parent.external_id(), "child equipment attached");
    Ok((
        Built {
            value: parent,
            skipped,
        },
        Outbox::new(),
    ))
}

async fn delete_equipment_in<U: UnitOfWork>(tx: &U, external_id: &str) -> Result<((), Outbox)> {
    let stored = tx.equipment().get_by_external_id(external_id).await?;
    tx.equipment().delete(stored.record_id).await?;
    Ok(((), Outbox::new()))
}
