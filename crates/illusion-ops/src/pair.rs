use std::path::Path;

use dualtext_types::ViewAngle;
use geom_kernel::{Axis, Kernel, KernelError, SolidHandle};
use tracing::{debug, instrument};

use crate::glyph::extrude_glyph;
use crate::types::{GapReason, IllusionError, PairResult, PairSide, PairSolid};

/// Glyph dimensions shared by both letters of every pair.
#[derive(Debug, Clone, Copy)]
pub struct GlyphSpec<'a> {
    pub font_path: &'a Path,
    pub font_size: f64,
    pub depth: f64,
}

/// Build the dual-reading solid for one pair of characters.
///
/// `first` is seen from the 45° side and `second` from the 135° side. A
/// character without outline, or an empty intersection, gives a gap; any
/// other kernel failure is returned as an error. A solid result rests on
/// Z = 0 and starts at 0 on the layout axis.
#[instrument(skip(kernel, glyph))]
pub fn intersect_pair(
    kernel: &mut dyn Kernel,
    index: usize,
    first: char,
    second: char,
    glyph: &GlyphSpec<'_>,
) -> Result<PairResult, IllusionError> {
    let a = match extrude(kernel, first, ViewAngle::First, glyph) {
        Ok(h) => h,
        Err(e) if e.is_no_geometry() => return Ok(missing(PairSide::First, first, e)),
        Err(e) => return Err(e.into()),
    };
    let b = match extrude(kernel, second, ViewAngle::Second, glyph) {
        Ok(h) => h,
        Err(e) if e.is_no_geometry() => {
            kernel.release(a);
            return Ok(missing(PairSide::Second, second, e));
        }
        Err(e) => {
            kernel.release(a);
            return Err(e.into());
        }
    };

    let solid = match kernel.intersect(a, b) {
        Ok(h) => h,
        Err(e) if e.is_no_geometry() => {
            return Ok(PairResult::Gap(GapReason::EmptyIntersection {
                detail: e.to_string(),
            }))
        }
        Err(e) => return Err(e.into()),
    };

    let bb = match kernel.bounding_box(&solid) {
        Ok(bb) => bb,
        Err(e) => {
            kernel.release(solid);
            return Err(e.into());
        }
    };
    if bb.is_degenerate() {
        kernel.release(solid);
        return Ok(PairResult::Gap(GapReason::EmptyIntersection {
            detail: "intersection has no horizontal extent".to_string(),
        }));
    }

    let offset = [0.0, -bb.min_on(Axis::LAYOUT), -bb.min_on(Axis::VERTICAL)];
    let handle = kernel.translate(solid, offset)?;
    let bounds = bb.translated(offset);
    debug!(?bounds, "pair intersected");

    Ok(PairResult::Solid(PairSolid {
        index,
        handle,
        bounds,
    }))
}

fn extrude(
    kernel: &mut dyn Kernel,
    ch: char,
    angle: ViewAngle,
    glyph: &GlyphSpec<'_>,
) -> Result<SolidHandle, KernelError> {
    extrude_glyph(kernel, ch, glyph.font_path, glyph.font_size, glyph.depth, angle)
}

fn missing(side: PairSide, ch: char, err: KernelError) -> PairResult {
    PairResult::Gap(GapReason::MissingGlyph {
        side,
        ch,
        detail: err.to_string(),
    })
}
