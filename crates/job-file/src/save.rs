use serde::Serialize;

use crate::errors::LoadError;
use crate::params::RunParams;

/// Format identifier written to every job file.
pub const JOB_FORMAT: &str = "dualtext-job";

/// Current job file version.
pub const FORMAT_VERSION: u32 = 1;

/// The top-level file structure.
#[derive(Debug, Clone, Serialize)]
pub struct JobFile<'a> {
    /// Format identifier.
    pub format: &'a str,
    /// Format version number.
    pub version: u32,
    pub params: &'a RunParams,
}

/// Serialize run parameters to a pretty-printed job file.
pub fn save_job(params: &RunParams) -> Result<String, LoadError> {
    let file = JobFile {
        format: JOB_FORMAT,
        version: FORMAT_VERSION,
        params,
    };
    serde_json::to_string_pretty(&file).map_err(|e| LoadError::ParseError(e.to_string()))
}
