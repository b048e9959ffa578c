//! TruckKernel: real geometry kernel wrapping truck's API.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::outline;
use crate::primitives;
use crate::step;
use crate::stl;
use crate::tessellation;
use crate::traits::Kernel;
use crate::types::*;

// Import truck types selectively to avoid shadowing std::result::Result
use truck_modeling::builder;
use truck_modeling::topology::{Shell, Solid};
use truck_modeling::{InnerSpace, Point3, Rad, Vector3};

/// Tolerance handed to truck's boolean operations.
pub const BOOLEAN_TOLERANCE: f64 = 0.05;
/// Chordal tolerance for STL tessellation.
pub const MESH_TOLERANCE: f64 = 0.01;

/// Real geometry kernel backed by the truck BREP library.
/// Glyph outlines come from TrueType/OpenType fonts via ttf-parser.
pub struct TruckKernel {
    next_handle: u64,
    solids: HashMap<u64, Solid>,
    /// Font files read so far, keyed by path.
    fonts: HashMap<PathBuf, Vec<u8>>,
    mesh_tolerance: f64,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            solids: HashMap::new(),
            fonts: HashMap::new(),
            mesh_tolerance: MESH_TOLERANCE,
        }
    }

    /// Use a coarser or finer tessellation for mesh export.
    pub fn with_mesh_tolerance(mut self, tolerance: f64) -> Self {
        self.mesh_tolerance = tolerance;
        self
    }

    fn alloc_handle(&mut self) -> SolidHandle {
        let h = SolidHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    pub(crate) fn store_solid(&mut self, solid: Solid) -> SolidHandle {
        let handle = self.alloc_handle();
        self.solids.insert(handle.id(), solid);
        handle
    }

    pub(crate) fn get_solid(&self, handle: &SolidHandle) -> Result<&Solid, KernelError> {
        self.solids
            .get(&handle.id())
            .ok_or(KernelError::SolidNotFound { id: handle.id() })
    }

    fn take_solid(&mut self, handle: SolidHandle) -> Result<Solid, KernelError> {
        self.solids
            .remove(&handle.id())
            .ok_or(KernelError::SolidNotFound { id: handle.id() })
    }

    fn font_data(&mut self, path: &Path) -> Result<&[u8], KernelError> {
        if !self.fonts.contains_key(path) {
            let bytes = std::fs::read(path).map_err(|e| KernelError::FontLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            self.fonts.insert(path.to_path_buf(), bytes);
        }
        Ok(self.fonts.get(path).map(Vec::as_slice).unwrap_or_default())
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

fn to_aabb(bounds: [[f64; 3]; 2]) -> Aabb {
    Aabb::new(bounds[0], bounds[1])
}

/// Vertical overshoot below and above, in multiples of BOOLEAN_TOLERANCE.
/// Unequal steps move the fixed plane of the stretch off the midpoint.
const OVERSHOOT_STEPS: [(f64, f64); 3] = [(2.0, 2.0), (2.0, 3.0), (3.0, 2.0)];

fn covers_z(outer: &Aabb, inner: &Aabb) -> bool {
    let (lo, hi) = outer.interval(Axis::Z);
    let (ilo, ihi) = inner.interval(Axis::Z);
    lo <= ilo + 1e-9 && hi >= ihi - 1e-9
}

/// Scale `solid` along Z so `bounds` grows by `below` under its bottom
/// and `above` over its top. X and Y are untouched.
fn overshoot_z(solid: &Solid, bounds: &Aabb, below: f64, above: f64) -> Solid {
    let (zmin, zmax) = bounds.interval(Axis::Z);
    let len = zmax - zmin;
    if len <= 0.0 {
        return solid.clone();
    }
    let factor = (len + below + above) / len;
    let pivot = zmin + below * len / (below + above);
    builder::scaled(solid, Point3::new(0.0, 0.0, pivot), Vector3::new(1.0, 1.0, factor))
}

impl Kernel for TruckKernel {
    #[instrument(skip(self, font_path), fields(font = %font_path.display()))]
    fn extrude_text(
        &mut self,
        text: &str,
        depth: f64,
        font_size: f64,
        font_path: &Path,
        align: VerticalAlign,
    ) -> Result<SolidHandle, KernelError> {
        if !(depth > 0.0 && font_size > 0.0) {
            return Err(KernelError::InvalidArgument {
                reason: format!("depth {} and font size {} must be positive", depth, font_size),
            });
        }

        let font_name = font_path.display().to_string();
        let contours = {
            let data = self.font_data(font_path)?;
            outline::text_contours(data, &font_name, text, font_size)?
        };

        let (v_min, v_max) = contours
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[1]), hi.max(p[1]))
            });
        let lift = match align {
            VerticalAlign::Bottom => -v_min,
            VerticalAlign::Baseline => 0.0,
            VerticalAlign::Center => -(v_min + v_max) / 2.0,
        };

        let regions = outline::group_regions(contours);
        let solid = primitives::extrude_regions(&regions, lift, depth)?;
        debug!(regions = regions.len(), "extruded text outline");
        Ok(self.store_solid(solid))
    }

    fn bounding_box(&self, solid: &SolidHandle) -> Result<Aabb, KernelError> {
        let bb = to_aabb(primitives::solid_bounds(self.get_solid(solid)?));
        if bb.is_empty() {
            return Err(KernelError::EmptyResult {
                operation: "bounding_box".to_string(),
            });
        }
        Ok(bb)
    }

    fn translate(
        &mut self,
        solid: SolidHandle,
        offset: [f64; 3],
    ) -> Result<SolidHandle, KernelError> {
        let s = self.take_solid(solid)?;
        let moved = builder::translated(&s, Vector3::new(offset[0], offset[1], offset[2]));
        Ok(self.store_solid(moved))
    }

    fn rotate(
        &mut self,
        solid: SolidHandle,
        axis_point: [f64; 3],
        axis_dir: [f64; 3],
        angle_degrees: f64,
    ) -> Result<SolidHandle, KernelError> {
        let axis = Vector3::new(axis_dir[0], axis_dir[1], axis_dir[2]);
        if axis.magnitude() < 1e-12 {
            return Err(KernelError::InvalidArgument {
                reason: "rotation axis has zero length".to_string(),
            });
        }
        let s = self.take_solid(solid)?;
        let origin = Point3::new(axis_point[0], axis_point[1], axis_point[2]);
        let turned = builder::rotated(&s, origin, axis.normalize(), Rad(angle_degrees.to_radians()));
        Ok(self.store_solid(turned))
    }

    #[instrument(skip(self))]
    fn intersect(&mut self, a: SolidHandle, b: SolidHandle) -> Result<SolidHandle, KernelError> {
        let solid_a = self.take_solid(a)?;
        let solid_b = self.take_solid(b)?;

        // truck's boolean engine has nothing to split when the operands are
        // apart; report the empty result without calling it.
        let bounds_a = to_aabb(primitives::solid_bounds(&solid_a));
        let bounds_b = to_aabb(primitives::solid_bounds(&solid_b));
        if bounds_a.intersection(&bounds_b).is_none() {
            return Err(KernelError::EmptyResult {
                operation: "intersect".to_string(),
            });
        }

        // and() gives up on coplanar faces, and glyphs extruded from the
        // same baseline always share their bottom face. Stretch the operand
        // whose Z range covers the other's so it overshoots both ends; the
        // other operand then bounds the result vertically.
        let (fixed, stretched, stretched_bounds) =
            if covers_z(&bounds_a, &bounds_b) && !covers_z(&bounds_b, &bounds_a) {
                (&solid_b, &solid_a, bounds_a)
            } else {
                (&solid_a, &solid_b, bounds_b)
            };

        let mut result = None;
        for (attempt, (below, above)) in OVERSHOOT_STEPS.iter().enumerate() {
            let candidate = overshoot_z(
                stretched,
                &stretched_bounds,
                below * BOOLEAN_TOLERANCE,
                above * BOOLEAN_TOLERANCE,
            );
            result = truck_shapeops::and(fixed, &candidate, BOOLEAN_TOLERANCE);
            if result.is_some() {
                break;
            }
            debug!(attempt, "and() failed, retrying with another overshoot");
        }
        let result = result.ok_or_else(|| KernelError::BooleanFailed {
            reason: "truck and() returned None".to_string(),
        })?;
        if result.boundaries().is_empty() {
            return Err(KernelError::EmptyResult {
                operation: "intersect".to_string(),
            });
        }
        Ok(self.store_solid(result))
    }

    fn make_box(
        &mut self,
        dims: [f64; 3],
        centered: [bool; 3],
    ) -> Result<SolidHandle, KernelError> {
        if dims.iter().any(|&d| !(d > 0.0)) {
            return Err(KernelError::InvalidArgument {
                reason: format!("box dimensions {:?} must be positive", dims),
            });
        }
        let min = [0, 1, 2].map(|i| if centered[i] { -dims[i] / 2.0 } else { 0.0 });
        Ok(self.store_solid(primitives::make_box(min, dims)))
    }

    #[instrument(skip(self))]
    fn fillet_vertical_edges(
        &mut self,
        solid: SolidHandle,
        radius: f64,
    ) -> Result<SolidHandle, KernelError> {
        let s = self.take_solid(solid)?;
        if radius < 0.0 {
            return Err(KernelError::InvalidArgument {
                reason: format!("fillet radius {} is negative", radius),
            });
        }
        let [min, max] = primitives::solid_bounds(&s);

        // Only axis-aligned boxes: eight distinct vertices, all on bbox corners.
        let mut vertex_ids = HashSet::new();
        let mut on_corners = true;
        for shell in s.boundaries() {
            for v in shell.vertex_iter() {
                vertex_ids.insert(v.id());
                let p = v.point();
                on_corners &= (0..3).all(|i| {
                    (p[i] - min[i]).abs() < 1e-9 || (p[i] - max[i]).abs() < 1e-9
                });
            }
        }
        if vertex_ids.len() != 8 || !on_corners {
            return Err(KernelError::NotSupported {
                operation: "fillet_vertical_edges on a non-box solid".to_string(),
            });
        }

        let dims = [max[0] - min[0], max[1] - min[1], max[2] - min[2]];
        let rounded = primitives::make_rounded_box(min, dims, radius)?;
        Ok(self.store_solid(rounded))
    }

    fn to_compound(&mut self, solids: Vec<SolidHandle>) -> Result<SolidHandle, KernelError> {
        let mut shells: Vec<Shell> = Vec::new();
        for handle in solids {
            let s = self.take_solid(handle)?;
            shells.extend(s.boundaries().iter().cloned());
        }
        if shells.is_empty() {
            return Err(KernelError::EmptyResult {
                operation: "to_compound".to_string(),
            });
        }
        let compound = Solid::try_new(shells).map_err(|e| KernelError::Other {
            message: format!("compound is not a valid solid: {}", e),
        })?;
        Ok(self.store_solid(compound))
    }

    #[instrument(skip(self))]
    fn export(&mut self, solid: &SolidHandle, format: OutputFormat) -> Result<Vec<u8>, KernelError> {
        let s = self.get_solid(solid)?;
        match format {
            OutputFormat::Stl => {
                let mesh = tessellation::tessellate_solid(s, self.mesh_tolerance)?;
                stl::export_binary_stl(&mesh, "dualtext")
            }
            OutputFormat::Step => step::export_step(s, "dualtext.step").map(String::into_bytes),
        }
    }

    fn mesh_stats(&mut self, solid: &SolidHandle) -> Result<MeshStats, KernelError> {
        let mesh = tessellation::tessellate_solid(self.get_solid(solid)?, self.mesh_tolerance)?;
        Ok(MeshStats {
            vertices: mesh.vertex_count(),
            triangles: mesh.triangle_count(),
        })
    }

    fn release(&mut self, solid: SolidHandle) {
        self.solids.remove(&solid.id());
    }
}
