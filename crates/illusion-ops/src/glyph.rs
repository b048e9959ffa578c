use std::path::Path;

use dualtext_types::ViewAngle;
use geom_kernel::{Axis, Kernel, KernelError, SolidHandle, VerticalAlign};
use tracing::{debug, instrument};

/// Extrude a single character and turn it to its viewing angle.
///
/// The glyph is drawn on the XZ plane with its bottom on Z = 0, centered on
/// X = 0 and on the extrusion midline Y = 0, then rotated about the Z axis.
#[instrument(skip(kernel, font_path), fields(font = %font_path.display()))]
pub fn extrude_glyph(
    kernel: &mut dyn Kernel,
    ch: char,
    font_path: &Path,
    font_size: f64,
    depth: f64,
    angle: ViewAngle,
) -> Result<SolidHandle, KernelError> {
    let mut buf = [0u8; 4];
    let solid = kernel.extrude_text(
        ch.encode_utf8(&mut buf),
        depth,
        font_size,
        font_path,
        VerticalAlign::Bottom,
    )?;

    let bb = kernel.bounding_box(&solid)?;
    let offset = [-bb.mid(Axis::X), -bb.mid(Axis::LAYOUT), 0.0];
    let solid = kernel.translate(solid, offset)?;
    debug!(width = bb.len(Axis::X), height = bb.len(Axis::Z), "glyph centered");

    kernel.rotate(solid, [0.0; 3], Axis::VERTICAL.unit(), angle.degrees())
}
