//! Importer entry point.

use std::process::ExitCode;

use importer::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::from_env().with_args(std::env::args().skip(1));
    importer::init_tracing(&config);

    match importer::run(&config).await {
        Ok(report) if report.is_clean() => ExitCode::SUCCESS,
        Ok(report) => {
            tracing::info!(
                imported = report.imported_count(),
                "document imported with omissions"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "import failed");
            ExitCode::FAILURE
        }
    }
}
