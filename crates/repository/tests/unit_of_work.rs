//! Integration tests for storing adapter-built aggregates.

use std::sync::Arc;

use b2mml::{EquipmentClassType, EquipmentPropertyType, EquipmentType};
use domain::{AggregateRoot, Equipment, EquipmentClass, OperatingStatus};
use repository::{
    EquipmentClassRepository, EquipmentRepository, InMemoryUnitOfWork, Pagination,
    RepositoryError, UnitOfWork, Version,
};

fn pump_class() -> Arc<EquipmentClass> {
    let doc = Arc::new(EquipmentClassType::with_id("PUMP"));
    Arc::new(EquipmentClass::from_document(doc).unwrap().into_inner())
}

fn pump(id: &str, class: Arc<EquipmentClass>) -> Equipment {
    let mut doc = EquipmentType::with_id(id);
    doc.equipment_property = vec![EquipmentPropertyType::with_id("RPM")];
    doc.equipment_child = vec![EquipmentType::with_id(format!("{id}-MOTOR"))];
    Equipment::from_document(Arc::new(doc), Some(class))
        .unwrap()
        .into_inner()
}

#[tokio::test]
async fn stored_equipment_keeps_its_tree_and_class() {
    let uow = InMemoryUnitOfWork::new();
    let class = pump_class();

    let tx = uow.begin().await.unwrap();
    tx.equipment_classes().create(class.clone()).await.unwrap();
    tx.equipment().create(&pump("EQ-100", class.clone())).await.unwrap();
    tx.commit().await.unwrap();

    let stored = uow
        .equipment()
        .get_by_external_id("EQ-100")
        .await
        .unwrap()
        .into_aggregate();
    assert_eq!(stored.properties().len(), 1);
    assert_eq!(stored.children()[0].external_id(), "EQ-100-MOTOR");
    assert!(Arc::ptr_eq(stored.class().unwrap(), &class));
    assert!(Arc::ptr_eq(stored.children()[0].class().unwrap(), &class));
}

#[tokio::test]
async fn load_mutate_update_cycle_tracks_versions() {
    let uow = InMemoryUnitOfWork::new();
    uow.equipment().create(&pump("EQ-1", pump_class())).await.unwrap();

    for (n, status) in OperatingStatus::ALL.into_iter().enumerate() {
        let tx = uow.begin().await.unwrap();
        let mut eq = tx
            .equipment()
            .get_by_external_id("EQ-1")
            .await
            .unwrap()
            .into_aggregate();
        let loaded = eq.version();
        assert_eq!(loaded, Version::new(1 + n as i64));

        eq.set_operating_status(status);
        tx.equipment().update(&eq, loaded).await.unwrap();
        tx.commit().await.unwrap();
    }

    let maintenance = uow
        .equipment()
        .list_by_status(OperatingStatus::Maintenance, Pagination::default())
        .await
        .unwrap();
    assert_eq!(maintenance.len(), 1);
    assert_eq!(maintenance[0].aggregate.version(), Version::new(4));
}

#[tokio::test]
async fn conflicting_transaction_discards_its_writes() {
    let uow = InMemoryUnitOfWork::new();
    uow.equipment().create(&pump("EQ-1", pump_class())).await.unwrap();

    let slow = uow.begin().await.unwrap();
    let mut eq = slow
        .equipment()
        .get_by_external_id("EQ-1")
        .await
        .unwrap()
        .into_aggregate();

    // Another writer gets in first.
    let fast = uow.begin().await.unwrap();
    let mut other = fast
        .equipment()
        .get_by_external_id("EQ-1")
        .await
        .unwrap()
        .into_aggregate();
    other.set_operating_status(OperatingStatus::Inactive);
    fast.equipment()
        .update(&other, Version::first())
        .await
        .unwrap();
    fast.commit().await.unwrap();

    eq.set_operating_status(OperatingStatus::Active);
    slow.equipment().update(&eq, Version::first()).await.unwrap();
    assert_eq!(
        slow.commit().await,
        Err(RepositoryError::TransactionConflict)
    );

    let current = uow.equipment().get_by_external_id("EQ-1").await.unwrap();
    assert_eq!(
        current.aggregate.operating_status(),
        Some(OperatingStatus::Inactive)
    );
}

#[tokio::test]
async fn rebuilt_aggregate_updates_with_restored_version() {
    let uow = InMemoryUnitOfWork::new();
    let class = pump_class();
    let mut eq = pump("EQ-1", class.clone());
    eq.set_operating_status(OperatingStatus::Active);
    uow.equipment().create(&eq).await.unwrap();

    // Rebuild the aggregate from its stored document, as a row-based store would.
    let stored = uow.equipment().get_by_external_id("EQ-1").await.unwrap();
    let persisted = stored.aggregate.version();
    let document = stored.aggregate.to_b2mml().unwrap();
    let mut rebuilt = Equipment::from_document(document, Some(class))
        .unwrap()
        .into_inner();
    assert_eq!(rebuilt.version(), Version::first());

    // Without the restored version the update is stale.
    let mut stale = rebuilt.clone();
    stale.set_operating_status(OperatingStatus::Inactive);
    assert!(
        uow.equipment()
            .update(&stale, rebuilt.version())
            .await
            .unwrap_err()
            .is_conflict()
    );

    rebuilt.restore_version(persisted);
    rebuilt.set_operating_status(OperatingStatus::Maintenance);
    assert_eq!(rebuilt.version(), persisted.next());
    uow.equipment().update(&rebuilt, persisted).await.unwrap();

    let current = uow.equipment().get_by_external_id("EQ-1").await.unwrap();
    assert_eq!(current.aggregate.version(), Version::new(3));
}
