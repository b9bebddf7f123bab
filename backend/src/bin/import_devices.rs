//! Import devices from a spreadsheet export into the registry.
//!
//! ```text
//! import-devices --database-url postgres://localhost/calibration thiet_bi.xlsx
//! import-devices --preview --mapping mapping.json thiet_bi.csv
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use calibration_tracker::domain::DeviceImportService;
use calibration_tracker::domain::ports::{DeviceImportCommand, SpreadsheetUpload};
use calibration_tracker::outbound::memory::InMemoryDeviceRepository;
use calibration_tracker::outbound::persistence::{
    DbPool, DieselDeviceRepository, PoolConfig, run_pending_migrations,
};
use calibration_tracker::outbound::spreadsheet::SpreadsheetFileReader;
use calibration_tracker::settings::{AppSettings, load_import_mapping, read_file};
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `import-devices` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "import-devices",
    about = "Import medical devices from a CSV or workbook export",
    version
)]
struct CliArgs {
    /// Spreadsheet to import (`.csv`, `.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`).
    #[arg(value_name = "path")]
    file: PathBuf,
    /// Database connection URL. Falls back to `CALIBRATION_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// JSON field mapping. Falls back to `CALIBRATION_IMPORT_MAPPING_PATH`.
    #[arg(long = "mapping", value_name = "path")]
    mapping: Option<PathBuf>,
    /// Print how the first rows would import without writing anything.
    #[arg(long)]
    preview: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = AppSettings::load_from_iter([OsString::from("import-devices")])
        .map_err(|error| eyre!("failed to load settings: {error}"))?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(run(args, settings))
}

async fn run(args: CliArgs, settings: AppSettings) -> Result<()> {
    let mapping = Arc::new(match args.mapping.as_deref() {
        Some(path) => load_import_mapping(path)?,
        None => settings.import_mapping()?,
    });
    let upload = read_upload(&args.file)?;
    let reader = Arc::new(SpreadsheetFileReader);
    let clock = Arc::new(DefaultClock);

    if args.preview {
        let service = DeviceImportService::new(
            Arc::new(InMemoryDeviceRepository::new()),
            reader,
            mapping,
            clock,
        );
        let preview = service.preview(&upload).await?;
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    let database_url = resolve_database_url(args.database_url, &settings)?;
    let migration_url = database_url.clone();
    tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
        .await
        .wrap_err("migration task panicked")??;
    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.pool_max_size()),
    )
    .await?;

    let service = DeviceImportService::new(
        Arc::new(DieselDeviceRepository::new(pool)),
        reader,
        mapping,
        clock,
    );
    let outcome = service.import(&upload).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    match outcome.failure {
        Some(failure) => Err(eyre!(
            "import stopped at row {} after creating {} devices: {}",
            failure.row_number,
            outcome.created,
            failure.message
        )),
        None => {
            info!(created = outcome.created, skipped = outcome.skipped, "import complete");
            Ok(())
        }
    }
}

fn read_upload(path: &Path) -> Result<SpreadsheetUpload> {
    let bytes =
        read_file(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| eyre!("{} does not name a file", path.display()))?;
    Ok(SpreadsheetUpload::new(file_name, bytes))
}

fn resolve_database_url(explicit: Option<String>, settings: &AppSettings) -> Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(eyre!("--database-url must not be empty when provided"));
        }
        return Ok(value);
    }
    settings
        .database_url()
        .map(str::to_owned)
        .ok_or_else(|| eyre!("database URL missing: set --database-url or CALIBRATION_DATABASE_URL"))
}
