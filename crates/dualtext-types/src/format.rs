use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output file formats supported by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Triangulated mesh (binary STL).
    #[default]
    Stl,
    /// Boundary representation (STEP AP203).
    Step,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Stl, OutputFormat::Step];

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Stl => "stl",
            OutputFormat::Step => "step",
        }
    }

    /// MIME type used when the artifact is offered for download.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Stl => "model/stl",
            OutputFormat::Step => "model/step",
        }
    }

    pub fn is_mesh(self) -> bool {
        matches!(self, OutputFormat::Stl)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown output format: {0} (expected stl or step)")]
pub struct UnknownFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stl" => Ok(OutputFormat::Stl),
            "step" | "stp" => Ok(OutputFormat::Step),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}
