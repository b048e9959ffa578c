use std::io::Write;
use std::path::{Path, PathBuf};

use geom_kernel::{Aabb, Axis, Kernel, MeshStats, OutputFormat, SolidHandle};
use tracing::{info, instrument, warn};

use crate::types::{Assembly, ExportError, ExportReport, IllusionError, TargetReport};

/// File name of the preview mesh written next to every artifact.
pub const PREVIEW_FILE: &str = "file_display.stl";

/// Request-scoped location of a run's output files.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub work_dir: PathBuf,
}

impl RunContext {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    pub fn preview_path(&self) -> PathBuf {
        self.work_dir.join(PREVIEW_FILE)
    }

    pub fn artifact_path(&self, export_name: &str, format: OutputFormat) -> PathBuf {
        self.work_dir
            .join(format!("{}.{}", export_name, format.extension()))
    }

    /// Create the working directory if it does not exist yet.
    pub fn prepare(&self) -> Result<(), IllusionError> {
        std::fs::create_dir_all(&self.work_dir).map_err(|source| IllusionError::WorkDir {
            path: self.work_dir.clone(),
            source,
        })
    }
}

/// Flattened, recentered model with the outcome of both export targets.
#[derive(Debug)]
pub struct ExportOutcome {
    pub model_bounds: Aabb,
    pub mesh_stats: Option<MeshStats>,
    pub report: ExportReport,
}

/// Flatten the assembly, center it on the layout axis and write the preview
/// mesh plus the artifact in `format`.
///
/// Failing to flatten the assembly is fatal. After that both targets are
/// always attempted and reported independently, and a model that cannot be
/// meshed for statistics is still exported.
#[instrument(skip(kernel, assembly, ctx), fields(parts = assembly.len(), dir = %ctx.work_dir.display()))]
pub fn export_assembly(
    kernel: &mut dyn Kernel,
    assembly: Assembly,
    ctx: &RunContext,
    format: OutputFormat,
    export_name: &str,
) -> Result<ExportOutcome, IllusionError> {
    let handles = assembly.parts.into_iter().map(|p| p.handle).collect();
    let compound = kernel.to_compound(handles)?;

    let bb = match kernel.bounding_box(&compound) {
        Ok(bb) => bb,
        Err(e) => {
            kernel.release(compound);
            return Err(e.into());
        }
    };
    let offset = Axis::LAYOUT.offset(-bb.mid(Axis::LAYOUT));
    let compound = kernel.translate(compound, offset)?;
    let model_bounds = bb.translated(offset);

    let mesh_stats = kernel
        .mesh_stats(&compound)
        .map_err(|e| warn!(error = %e, "mesh statistics unavailable"))
        .ok();

    let preview = write_target(kernel, &compound, OutputFormat::Stl, ctx.preview_path());
    let artifact = write_target(
        kernel,
        &compound,
        format,
        ctx.artifact_path(export_name, format),
    );
    kernel.release(compound);

    Ok(ExportOutcome {
        model_bounds,
        mesh_stats,
        report: ExportReport { preview, artifact },
    })
}

fn write_target(
    kernel: &mut dyn Kernel,
    solid: &SolidHandle,
    format: OutputFormat,
    path: PathBuf,
) -> TargetReport {
    let result = kernel
        .export(solid, format)
        .map_err(ExportError::from)
        .and_then(|bytes| write_atomically(&path, &bytes));
    match &result {
        Ok(len) => info!(path = %path.display(), bytes = len, "export written"),
        Err(e) => warn!(path = %path.display(), error = %e, "export failed"),
    }
    TargetReport { path, result }
}

/// Write `bytes` to `path` through a temporary file in the same directory,
/// so a failure never leaves a partial file under the final name.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<u64, ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(bytes.len() as u64)
}
