use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::errors::LoadError;
use crate::params::RunParams;
use crate::save::{FORMAT_VERSION, JOB_FORMAT};

/// The top-level file structure for deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct JobFileRaw {
    pub format: String,
    pub version: u32,
    #[serde(default)]
    pub params: RunParams,
}

/// Deserialize run parameters from a job file's JSON text.
///
/// Validates the format identifier and version. Missing parameters take
/// their defaults.
pub fn load_job(json: &str) -> Result<RunParams, LoadError> {
    let raw: JobFileRaw =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if raw.format != JOB_FORMAT {
        return Err(LoadError::UnknownFormat(raw.format));
    }

    if raw.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: raw.version,
            supported_version: FORMAT_VERSION,
        });
    }

    // Version 1 is the first format; anything older has no migration.
    if raw.version < FORMAT_VERSION {
        return Err(LoadError::MigrationFailed {
            from: raw.version,
            to: FORMAT_VERSION,
        });
    }

    Ok(raw.params)
}

/// Read and parse a job file from disk.
pub fn load_job_file(path: &Path) -> Result<RunParams, LoadError> {
    let json = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    debug!(path = %path.display(), bytes = json.len(), "job file read");
    load_job(&json)
}
