//! Integration tests for loading documents from disk.

use std::path::PathBuf;

use importer::{Config, ImporterError};

const DOCUMENT: &str = r#"{
    "ID": { "Value": "PLANT-A" },
    "EquipmentClass": [
        {
            "ID": { "Value": "PUMP" },
            "EquipmentClassProperty": [{ "ID": { "Value": "FLOW" } }]
        }
    ],
    "Equipment": [
        {
            "ID": { "Value": "EQ-100" },
            "EquipmentClassID": [{ "Value": "PUMP" }],
            "EquipmentProperty": [
                { "ID": { "Value": "RPM" }, "Value": [{ "ValueString": "1450", "DataType": "integer" }] },
                { "Description": [{ "Value": "missing id" }] }
            ],
            "Equipment": [{ "ID": { "Value": "EQ-101" } }]
        }
    ]
}"#;

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("importer-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

fn config_for(path: PathBuf) -> Config {
    Config {
        import_path: Some(path),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_imports_document_from_disk() {
    let path = scratch_file("plant.json", DOCUMENT);

    let report = importer::run(&config_for(path.clone())).await.unwrap();
    std::fs::remove_file(path).unwrap();

    assert_eq!(report.classes_registered, ["PUMP"]);
    assert_eq!(report.equipment_created, ["EQ-100"]);
    assert!(report.failures.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, "EQ-100/EquipmentProperty[1]");
}

#[tokio::test]
async fn test_missing_path_is_rejected() {
    let err = importer::run(&Config::default()).await.unwrap_err();
    assert!(matches!(err, ImporterError::MissingPath));
}

#[tokio::test]
async fn test_unreadable_file_is_an_io_error() {
    let path = std::env::temp_dir().join("importer-does-not-exist.json");
    let err = importer::run(&config_for(path)).await.unwrap_err();
    assert!(matches!(err, ImporterError::Io { .. }));
}

#[tokio::test]
async fn test_malformed_json_is_a_parse_error() {
    let path = scratch_file("broken.json", "{ \"Equipment\": [");

    let err = importer::run(&config_for(path.clone())).await.unwrap_err();
    std::fs::remove_file(path).unwrap();

    assert!(matches!(err, ImporterError::Parse { .. }));
    assert!(err.to_string().starts_with("failed to parse"));
}
