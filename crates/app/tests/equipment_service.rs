//! Integration tests for the equipment service.
//!
//! These tests run the use cases against the in-memory unit of work and
//! check what ends up stored and which events reach the sink.

use app::{AppError, CreateEquipment, EquipmentService, InMemoryEventSink};
use b2mml::{
    EquipmentClassType, EquipmentInformation, EquipmentPropertyType, EquipmentType,
    IdentifierType, ValueType,
};
use domain::{AggregateRoot, DomainError, EquipmentEvent, NodeKind, OperatingStatus};
use repository::{InMemoryUnitOfWork, RepositoryError, Version};

type Service = EquipmentService<InMemoryUnitOfWork, InMemoryEventSink>;

fn create_service() -> Service {
    EquipmentService::new(InMemoryUnitOfWork::new(), InMemoryEventSink::new())
}

fn equipment_doc(id: &str) -> EquipmentType {
    EquipmentType::with_id(id)
}

async fn seed(service: &Service, count: usize) {
    for n in 0..count {
        service
            .create_equipment(CreateEquipment::new(equipment_doc(&format!("EQ-{n:03}"))))
            .await
            .unwrap();
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn test_non_positive_limit_defaults_to_ten() {
        let service = create_service();
        seed(&service, 15).await;

        assert_eq!(service.list_equipment(0, 0).await.unwrap().len(), 10);
        assert_eq!(service.list_equipment(-3, 0).await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_limit_is_capped_at_one_hundred() {
        let service = create_service();
        seed(&service, 120).await;

        assert_eq!(service.list_equipment(500, 0).await.unwrap().len(), 100);
        assert_eq!(service.list_equipment(100, 0).await.unwrap().len(), 100);
    }

    #[tokio::test]
    async fn test_negative_offset_starts_at_beginning() {
        let service = create_service();
        seed(&service, 3).await;

        let page = service.list_equipment(2, -7).await.unwrap();
        let ids: Vec<_> = page.iter().map(|e| e.external_id().to_string()).collect();
        assert_eq!(ids, ["EQ-000", "EQ-001"]);

        let page = service.list_equipment(2, 2).await.unwrap();
        assert_eq!(page[0].external_id(), "EQ-002");
    }

    #[tokio::test]
    async fn test_list_by_status() {
        let service = create_service();
        seed(&service, 4).await;
        service
            .change_status("EQ-001", OperatingStatus::Maintenance)
            .await
            .unwrap();
        service
            .change_status("EQ-003", OperatingStatus::Maintenance)
            .await
            .unwrap();

        let page = service
            .list_equipment_by_status(OperatingStatus::Maintenance, 0, 0)
            .await
            .unwrap();
        let ids: Vec<_> = page.iter().map(|e| e.external_id().to_string()).collect();
        assert_eq!(ids, ["EQ-001", "EQ-003"]);
    }
}

mod lookups {
    use super::*;

    #[tokio::test]
    async fn test_empty_external_id_is_a_validation_error() {
        let service = create_service();
        let err = service.get_equipment("").await.unwrap_err();

        assert!(matches!(err, AppError::Validation(ref msg) if msg == "external_id is required"));
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_unknown_equipment_is_not_found() {
        let service = create_service();
        let err = service.get_equipment("EQ-404").await.unwrap_err();
        assert!(err.is_not_found());
    }
}

mod creation {
    use super::*;

    #[tokio::test]
    async fn test_create_with_class_and_status() {
        let service = create_service();
        let class = service
            .register_class(EquipmentClassType::with_id("PUMP"))
            .await
            .unwrap()
            .into_inner();

        let mut doc = equipment_doc("EQ-100");
        doc.equipment_property = vec![
            EquipmentPropertyType::default(),
            EquipmentPropertyType::with_id("RPM"),
        ];
        let built = service
            .create_equipment(
                CreateEquipment::new(doc)
                    .with_class("PUMP")
                    .with_status(OperatingStatus::Active),
            )
            .await
            .unwrap();

        assert_eq!(built.skipped.len(), 1);
        assert_eq!(built.skipped[0].kind, NodeKind::EquipmentProperty);

        let stored = service.get_equipment("EQ-100").await.unwrap();
        assert!(std::sync::Arc::ptr_eq(stored.class().unwrap(), &class));
        assert!(stored.is_active());
        assert_eq!(stored.version(), Version::new(2));
        assert_eq!(stored.properties().len(), 1);

        assert_eq!(
            service.event_sink().event_types().await,
            [
                "EquipmentClassCreated",
                "EquipmentCreated",
                "EquipmentStatusChanged"
            ]
        );
    }

    #[tokio::test]
    async fn test_class_is_taken_from_document_reference() {
        let service = create_service();
        service
            .register_class(EquipmentClassType::with_id("VALVE"))
            .await
            .unwrap();

        let mut doc = equipment_doc("EQ-7");
        doc.equipment_class_id = vec![IdentifierType::new("VALVE")];
        service
            .create_equipment(CreateEquipment::new(doc))
            .await
            .unwrap();

        let stored = service.get_equipment("EQ-7").await.unwrap();
        assert_eq!(stored.class().unwrap().id().as_str(), "VALVE");
    }

    #[tokio::test]
    async fn test_unknown_class_rolls_back() {
        let service = create_service();
        let err = service
            .create_equipment(CreateEquipment::new(equipment_doc("EQ-1")).with_class("NOPE"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Repository(RepositoryError::EquipmentClassNotFound(_))
        ));
        assert!(service.get_equipment("EQ-1").await.is_err());
        assert!(service.event_sink().messages().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_document_id_is_rejected() {
        let service = create_service();
        let err = service
            .create_equipment(CreateEquipment::new(EquipmentType::default()))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_duplicate_equipment_is_rejected() {
        let service = create_service();
        seed(&service, 1).await;

        let err = service
            .create_equipment(CreateEquipment::new(equipment_doc("EQ-000")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Repository(RepositoryError::EquipmentAlreadyExists(_))
        ));
        assert_eq!(service.event_sink().messages().await.len(), 1);
    }
}

mod mutations {
    use super::*;

    #[tokio::test]
    async fn test_change_status_emits_old_and_new() {
        let service = create_service();
        seed(&service, 1).await;

        service
            .change_status("EQ-000", OperatingStatus::Active)
            .await
            .unwrap();
        let updated = service
            .change_status("EQ-000", OperatingStatus::Inactive)
            .await
            .unwrap();
        assert_eq!(updated.version(), Version::new(3));

        let messages = service.event_sink().messages().await;
        let last: EquipmentEvent = messages.last().unwrap().decode().unwrap();
        match last {
            EquipmentEvent::EquipmentStatusChanged(data) => {
                assert_eq!(data.old_status, Some(OperatingStatus::Active));
                assert_eq!(data.new_status, OperatingStatus::Inactive);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_add_property_builds_value_from_document() {
        let service = create_service();
        seed(&service, 1).await;

        let mut property = EquipmentPropertyType::with_id("PRESSURE");
        property.value = vec![ValueType::new("6", "integer").unit("bar")];
        let updated = service.add_property("EQ-000", property).await.unwrap();

        assert_eq!(updated.version(), Version::new(2));
        assert_eq!(updated.properties()[0].value().to_string(), "6 bar");
    }

    #[tokio::test]
    async fn test_add_property_without_id_is_rejected() {
        let service = create_service();
        seed(&service, 1).await;

        let err = service
            .add_property("EQ-000", EquipmentPropertyType::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::EmptyId(_))));
        assert_eq!(
            service.get_equipment("EQ-000").await.unwrap().version(),
            Version::first()
        );
    }

    #[tokio::test]
    async fn test_add_child_shares_parent_class() {
        let service = create_service();
        service
            .register_class(EquipmentClassType::with_id("PUMP"))
            .await
            .unwrap();
        service
            .create_equipment(CreateEquipment::new(equipment_doc("EQ-1")).with_class("PUMP"))
            .await
            .unwrap();

        let built = service
            .add_child("EQ-1", equipment_doc("EQ-1-MOTOR"))
            .await
            .unwrap();
        let parent = built.value;
        assert_eq!(parent.children().len(), 1);
        assert!(std::sync::Arc::ptr_eq(
            parent.children()[0].class().unwrap(),
            parent.class().unwrap()
        ));
        assert_eq!(parent.version(), Version::new(2));
    }

    #[tokio::test]
    async fn test_delete_hides_equipment() {
        let service = create_service();
        seed(&service, 2).await;

        service.delete_equipment("EQ-000").await.unwrap();
        assert!(service.get_equipment("EQ-000").await.unwrap_err().is_not_found());
        assert_eq!(service.list_equipment(0, 0).await.unwrap().len(), 1);
        assert!(service.delete_equipment("EQ-000").await.is_err());
    }

    #[tokio::test]
    async fn test_sink_failure_is_reported_after_commit() {
        let service = create_service();
        seed(&service, 1).await;
        service.event_sink().set_fail_on_publish(true).await;

        let err = service
            .change_status("EQ-000", OperatingStatus::Maintenance)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EventSink(_)));

        // The change itself was committed.
        let stored = service.get_equipment("EQ-000").await.unwrap();
        assert_eq!(stored.operating_status(), Some(OperatingStatus::Maintenance));
    }
}

mod import {
    use super::*;

    const DOCUMENT: &str = r#"{
        "EquipmentClass": [
            { "ID": { "Value": "PUMP" } },
            { "Description": [{ "Value": "class without id" }] }
        ],
        "Equipment": [
            {
                "ID": { "Value": "EQ-100" },
                "EquipmentClassID": [{ "Value": "PUMP" }],
                "EquipmentProperty": [
                    { "Description": [{ "Value": "no id" }] },
                    { "ID": { "Value": "RPM" } }
                ]
            },
            {
                "ID": { "Value": "EQ-200" },
                "EquipmentClassID": [{ "Value": "UNKNOWN" }]
            },
            { "ID": { "Value": "EQ-300" } }
        ]
    }"#;

    #[tokio::test]
    async fn test_import_reports_failures_and_skips() {
        let service = create_service();
        let information = EquipmentInformation::from_json(DOCUMENT).unwrap();

        let report = service.import(information).await;

        assert_eq!(report.classes_registered, ["PUMP"]);
        assert_eq!(report.equipment_created, ["EQ-100", "EQ-300"]);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].kind, NodeKind::EquipmentClass);
        assert_eq!(report.failures[0].index, 1);
        assert!(report.failures[0].error.is_validation());
        assert_eq!(report.failures[1].kind, NodeKind::Equipment);
        assert_eq!(report.failures[1].external_id.as_deref(), Some("EQ-200"));
        assert!(report.failures[1].error.is_not_found());

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, "EQ-100/EquipmentProperty[0]");
        assert!(!report.is_clean());
        assert_eq!(report.imported_count(), 3);

        let stored = service.get_equipment("EQ-100").await.unwrap();
        assert_eq!(stored.class().unwrap().id().as_str(), "PUMP");
        assert_eq!(stored.properties().len(), 1);
    }

    #[tokio::test]
    async fn test_equipment_may_reference_nested_class() {
        let service = create_service();
        let information = EquipmentInformation::from_json(
            r#"{
                "EquipmentClass": [
                    {
                        "ID": { "Value": "PUMP" },
                        "EquipmentClass": [{ "ID": { "Value": "CENTRIFUGAL-PUMP" } }]
                    }
                ],
                "Equipment": [
                    {
                        "ID": { "Value": "EQ-1" },
                        "EquipmentClassID": [{ "Value": "CENTRIFUGAL-PUMP" }]
                    }
                ]
            }"#,
        )
        .unwrap();

        let report = service.import(information).await;

        assert!(report.failures.is_empty());
        assert_eq!(report.equipment_created, ["EQ-1"]);
        let stored = service.get_equipment("EQ-1").await.unwrap();
        assert_eq!(stored.class().unwrap().id().as_str(), "CENTRIFUGAL-PUMP");
    }
}
