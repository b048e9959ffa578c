use serde::{Deserialize, Serialize};

pub use dualtext_types::{Aabb, Axis, OutputFormat, VerticalAlign};

/// Opaque handle to a solid in the geometry kernel.
/// NEVER persisted. Valid only for the kernel session that issued it.
///
/// Handles are deliberately not `Copy`: operations that replace a solid
/// (translate, rotate, intersect, fillet, compound) take the handle by value
/// so a stale handle cannot be reused after its solid was consumed.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SolidHandle(pub(crate) u64);

impl SolidHandle {
    pub(crate) fn id(&self) -> u64 {
        self.0
    }

    /// Numeric id, for logging only.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Errors from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("glyph {ch:?} has no renderable outline: {reason}")]
    GlyphRender { ch: char, reason: String },

    #[error("font {path} could not be loaded: {reason}")]
    FontLoad { path: String, reason: String },

    #[error("{operation} produced an empty solid")]
    EmptyResult { operation: String },

    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("fillet radius {radius} is infeasible (largest possible is {max})")]
    FilletInfeasible { radius: f64, max: f64 },

    #[error("fillet failed: {reason}")]
    FilletFailed { reason: String },

    #[error("tessellation failed: {reason}")]
    TessellationFailed { reason: String },

    #[error("{format} export failed: {reason}")]
    ExportFailed { format: OutputFormat, reason: String },

    #[error("solid not found: #{id}")]
    SolidNotFound { id: u64 },

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },

    #[error("kernel error: {message}")]
    Other { message: String },
}

impl KernelError {
    /// True for the outcomes a caller may treat as "no geometry here"
    /// rather than as a failure: a glyph without outline, or an empty result.
    pub fn is_no_geometry(&self) -> bool {
        matches!(
            self,
            KernelError::GlyphRender { .. } | KernelError::EmptyResult { .. }
        )
    }
}

/// Tessellated triangle mesh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderMesh {
    /// Flat array of vertex positions [x0, y0, z0, x1, y1, z1, ...].
    pub vertices: Vec<f32>,
    /// Flat array of vertex normals [nx0, ny0, nz0, nx1, ny1, nz1, ...].
    pub normals: Vec<f32>,
    /// Triangle indices into the vertex array.
    pub indices: Vec<u32>,
}

impl RenderMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Size summary of a solid's tessellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshStats {
    pub vertices: usize,
    pub triangles: usize,
}
