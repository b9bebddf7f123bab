//! Application configuration loaded via OrthoConfig.
//!
//! Every value can be set through a `CALIBRATION_*` environment variable (for
//! example `CALIBRATION_DATABASE_URL`); unset values fall back to the defaults
//! documented on each accessor.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::ImportFieldMapping;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 4;

/// Largest upload body accepted when none is configured.
pub const DEFAULT_UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Runtime settings shared by the server and the import command.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CALIBRATION")]
pub struct AppSettings {
    /// PostgreSQL connection string. Without it the server keeps devices in
    /// memory.
    pub database_url: Option<String>,
    /// Socket address the HTTP server binds to.
    pub bind_address: Option<String>,
    /// JSON file overriding the default import field mapping.
    pub import_mapping_path: Option<PathBuf>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Largest accepted upload body.
    pub upload_limit_bytes: Option<usize>,
}

impl AppSettings {
    /// Configured database URL, if any, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_address(&self) -> &str {
        self.bind_address.as_deref().unwrap_or(DEFAULT_BIND_ADDRESS)
    }

    /// Pool size, defaulting to 4 connections.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Upload cap, defaulting to [`DEFAULT_UPLOAD_LIMIT_BYTES`].
    pub fn upload_limit_bytes(&self) -> usize {
        self.upload_limit_bytes.unwrap_or(DEFAULT_UPLOAD_LIMIT_BYTES)
    }

    /// The import mapping from [`Self::import_mapping_path`], or the built-in
    /// default when no path is configured.
    ///
    /// # Errors
    /// Returns [`SettingsError`] when the file cannot be read or parsed.
    pub fn import_mapping(&self) -> Result<ImportFieldMapping, SettingsError> {
        match &self.import_mapping_path {
            Some(path) => load_import_mapping(path),
            None => Ok(ImportFieldMapping::default()),
        }
    }
}

/// Errors raised while resolving file-backed settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid mapping document.
    #[error("invalid import mapping in {}: {source}", path.display())]
    Mapping {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load an import mapping from a JSON file; absent keys keep their defaults.
///
/// # Errors
/// Returns [`SettingsError::Read`] for I/O failures and
/// [`SettingsError::Mapping`] for malformed JSON.
pub fn load_import_mapping(path: &Path) -> Result<ImportFieldMapping, SettingsError> {
    let bytes = read_file(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ImportFieldMapping::from_json_slice(&bytes).map_err(|source| SettingsError::Mapping {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a whole file through a capability handle on its parent directory.
///
/// # Errors
/// Returns the underlying I/O error, or `InvalidInput` when `path` names no
/// file.
pub fn read_file(path: &Path) -> std::io::Result<Vec<u8>> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "path must name a file")
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read(Path::new(file_name))
}
