/// Errors while reading or writing a job file.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse job file: {0}")]
    ParseError(String),

    #[error("unknown file format: {0}")]
    UnknownFormat(String),

    #[error("file version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("no migration from version {from} to {to}")]
    MigrationFailed { from: u32, to: u32 },
}

/// Errors while resolving a font from the font library.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FontError {
    #[error("cannot list {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("font family {0:?} not found")]
    NoSuchFamily(String),

    #[error("style {style:?} not found in family {family:?}")]
    NoSuchStyle { family: String, style: String },

    #[error("font family {0:?} has no .ttf files")]
    EmptyFamily(String),

    #[error("font path {0:?} has no usable file name")]
    BadPath(String),
}
