//! Loads a B2MML `EquipmentInformation` document into the equipment catalogue.

pub mod config;

use std::path::{Path, PathBuf};

use app::{EquipmentService, EventSink, ImportReport, TracingEventSink};
use b2mml::EquipmentInformation;
use repository::{InMemoryUnitOfWork, UnitOfWork};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use config::{Config, LogFormat};

/// Errors that stop an import before any element is processed.
#[derive(Debug, Error)]
pub enum ImporterError {
    #[error("no document given; pass a path or set IMPORT_PATH")]
    MissingPath,

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ImporterError>;

/// Installs the global tracing subscriber.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

/// Reads and parses the document at `path`.
pub async fn read_document(path: &Path) -> Result<EquipmentInformation> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ImporterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    EquipmentInformation::from_slice(&bytes).map_err(|source| ImporterError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Imports `information` through `service` and logs the outcome.
pub async fn import_document<U, S>(
    service: &EquipmentService<U, S>,
    information: EquipmentInformation,
) -> ImportReport
where
    U: UnitOfWork,
    S: EventSink,
{
    let report = service.import(information).await;

    for node in &report.skipped {
        tracing::warn!(kind = %node.kind, path = %node.path, reason = %node.reason, "skipped node");
    }
    for failure in &report.failures {
        tracing::warn!(
            kind = %failure.kind,
            index = failure.index,
            external_id = ?failure.external_id,
            error = %failure.error,
            "element not imported"
        );
    }
    tracing::info!(
        classes = report.classes_registered.len(),
        equipment = report.equipment_created.len(),
        failures = report.failures.len(),
        skipped = report.skipped.len(),
        "import finished"
    );
    report
}

/// Runs one import against a fresh in-memory catalogue.
pub async fn run(config: &Config) -> Result<ImportReport> {
    let path = config
        .import_path
        .as_deref()
        .ok_or(ImporterError::MissingPath)?;
    tracing::info!(path = %path.display(), "importing document");

    let information = read_document(path).await?;
    let service = EquipmentService::new(InMemoryUnitOfWork::new(), TracingEventSink);
    Ok(import_document(&service, information).await)
}
