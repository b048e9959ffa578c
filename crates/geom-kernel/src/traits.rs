use std::path::Path;

use crate::types::*;

/// Geometry kernel contract used by the illusion pipeline.
/// Implemented by TruckKernel (real B-rep geometry) and MockKernel
/// (deterministic box-based test double).
///
/// Operations that produce a replacement solid consume their input handles;
/// read-only queries borrow them.
pub trait Kernel {
    /// Extrude `text` drawn on the XZ plane by `depth` along -Y.
    ///
    /// `font_size` is the em size in model units. Fails with
    /// [`KernelError::GlyphRender`] when the text has no outline in the font.
    fn extrude_text(
        &mut self,
        text: &str,
        depth: f64,
        font_size: f64,
        font_path: &Path,
        align: VerticalAlign,
    ) -> Result<SolidHandle, KernelError>;

    /// Axis-aligned bounding box of a solid.
    fn bounding_box(&self, solid: &SolidHandle) -> Result<Aabb, KernelError>;

    /// Move a solid by `offset`.
    fn translate(
        &mut self,
        solid: SolidHandle,
        offset: [f64; 3],
    ) -> Result<SolidHandle, KernelError>;

    /// Rotate a solid about the axis through `axis_point` along `axis_dir`.
    fn rotate(
        &mut self,
        solid: SolidHandle,
        axis_point: [f64; 3],
        axis_dir: [f64; 3],
        angle_degrees: f64,
    ) -> Result<SolidHandle, KernelError>;

    /// Boolean intersection of two solids.
    /// Fails with [`KernelError::EmptyResult`] when they share no volume.
    fn intersect(&mut self, a: SolidHandle, b: SolidHandle) -> Result<SolidHandle, KernelError>;

    /// Axis-aligned box of size `dims`. On axes flagged in `centered` the box
    /// spans `[-d/2, d/2]`, elsewhere `[0, d]`.
    fn make_box(&mut self, dims: [f64; 3], centered: [bool; 3])
        -> Result<SolidHandle, KernelError>;

    /// Round the edges of a box that run parallel to Z.
    /// Fails with [`KernelError::FilletInfeasible`] when `radius` exceeds
    /// half of the smaller horizontal dimension.
    fn fillet_vertical_edges(
        &mut self,
        solid: SolidHandle,
        radius: f64,
    ) -> Result<SolidHandle, KernelError>;

    /// Flatten several solids into one compound solid, without fusing them.
    fn to_compound(&mut self, solids: Vec<SolidHandle>) -> Result<SolidHandle, KernelError>;

    /// Serialize a solid in the given format.
    fn export(&mut self, solid: &SolidHandle, format: OutputFormat) -> Result<Vec<u8>, KernelError>;

    /// Vertex and triangle counts of the solid's export mesh.
    fn mesh_stats(&mut self, solid: &SolidHandle) -> Result<MeshStats, KernelError>;

    /// Drop a solid the caller no longer needs.
    fn release(&mut self, solid: SolidHandle);
}
