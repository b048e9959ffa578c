//! MockKernel: deterministic test double implementing Kernel.
//!
//! Every solid is represented by its axis-aligned bounding box. Glyphs are
//! boxes whose width depends on the character, rotations re-bound the turned
//! corners, and intersections overlap boxes. Used by illusion-ops and the
//! test harness, which need predictable extents rather than real geometry.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::stl;
use crate::traits::Kernel;
use crate::types::*;

/// Segments per quarter circle when the mock "fillets" a corner.
const FILLET_SEGMENTS: usize = 8;

/// A synthetic solid: bounds plus bookkeeping for assertions.
#[derive(Debug, Clone)]
struct MockSolid {
    bounds: Aabb,
    /// Characters this solid was built from, in construction order.
    glyphs: Vec<char>,
    kind: MockKind,
    vertices: usize,
    triangles: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockKind {
    Glyph,
    Intersection,
    Box,
    Rounded,
    Compound,
}

/// Deterministic test double for the geometry kernel.
pub struct MockKernel {
    next_handle: u64,
    solids: HashMap<u64, MockSolid>,
    missing_glyphs: HashSet<char>,
    empty_pairs: HashSet<(char, char)>,
    broken_glyphs: HashSet<char>,
    failing_formats: HashSet<OutputFormat>,
    unmeshable: bool,
    calls: HashMap<&'static str, usize>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            solids: HashMap::new(),
            missing_glyphs: HashSet::new(),
            empty_pairs: HashSet::new(),
            broken_glyphs: HashSet::new(),
            failing_formats: HashSet::new(),
            unmeshable: false,
            calls: HashMap::new(),
        }
    }

    /// Pretend the font has no outline for `ch`.
    pub fn without_glyph(mut self, ch: char) -> Self {
        self.missing_glyphs.insert(ch);
        self
    }

    /// Make the intersection of glyphs `a` (first) and `b` (second) empty.
    pub fn with_empty_intersection(mut self, a: char, b: char) -> Self {
        self.empty_pairs.insert((a, b));
        self
    }

    /// Make any intersection involving `ch` fail with a non-geometric error.
    pub fn with_broken_glyph(mut self, ch: char) -> Self {
        self.broken_glyphs.insert(ch);
        self
    }

    /// Make export to `format` fail.
    pub fn failing_export(mut self, format: OutputFormat) -> Self {
        self.failing_formats.insert(format);
        self
    }

    /// Make `mesh_stats` fail as if tessellation broke down.
    pub fn without_mesh_stats(mut self) -> Self {
        self.unmeshable = true;
        self
    }

    /// Number of times the named kernel operation was called.
    pub fn call_count(&self, operation: &str) -> usize {
        self.calls.get(operation).copied().unwrap_or(0)
    }

    /// Number of solids currently alive in the kernel.
    pub fn live_solids(&self) -> usize {
        self.solids.len()
    }

    /// Width of the mock glyph for `ch` at `font_size`.
    pub fn glyph_width(ch: char, font_size: f64) -> f64 {
        font_size * (0.5 + (ch as u32 % 5) as f64 * 0.05)
    }

    /// Height of the mock glyph for `ch` at `font_size`.
    pub fn glyph_height(ch: char, font_size: f64) -> f64 {
        if ch.is_lowercase() {
            font_size * 0.5
        } else {
            font_size * 0.7
        }
    }

    fn count(&mut self, operation: &'static str) {
        *self.calls.entry(operation).or_insert(0) += 1;
    }

    fn alloc_handle(&mut self) -> SolidHandle {
        let h = SolidHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    fn store(&mut self, solid: MockSolid) -> SolidHandle {
        let handle = self.alloc_handle();
        self.solids.insert(handle.id(), solid);
        handle
    }

    fn get(&self, handle: &SolidHandle) -> Result<&MockSolid, KernelError> {
        self.solids
            .get(&handle.id())
            .ok_or(KernelError::SolidNotFound { id: handle.id() })
    }

    fn take(&mut self, handle: SolidHandle) -> Result<MockSolid, KernelError> {
        self.solids
            .remove(&handle.id())
            .ok_or(KernelError::SolidNotFound { id: handle.id() })
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotate `p` about the axis through `origin` along unit `k` (Rodrigues).
fn rotate_point(p: [f64; 3], origin: [f64; 3], k: [f64; 3], angle: f64) -> [f64; 3] {
    let v = [p[0] - origin[0], p[1] - origin[1], p[2] - origin[2]];
    let (s, c) = angle.sin_cos();
    let dot = k[0] * v[0] + k[1] * v[1] + k[2] * v[2];
    let cross = [
        k[1] * v[2] - k[2] * v[1],
        k[2] * v[0] - k[0] * v[2],
        k[0] * v[1] - k[1] * v[0],
    ];
    let mut out = [0.0; 3];
    for i in 0..3 {
        out[i] = origin[i] + v[i] * c + cross[i] * s + k[i] * dot * (1.0 - c);
    }
    out
}

impl Kernel for MockKernel {
    fn extrude_text(
        &mut self,
        text: &str,
        depth: f64,
        font_size: f64,
        _font_path: &Path,
        align: VerticalAlign,
    ) -> Result<SolidHandle, KernelError> {
        self.count("extrude_text");
        if !(depth > 0.0 && font_size > 0.0) {
            return Err(KernelError::InvalidArgument {
                reason: format!("depth {} and font size {} must be positive", depth, font_size),
            });
        }

        let mut width = 0.0;
        let mut height: f64 = 0.0;
        let mut glyphs = Vec::new();
        for ch in text.chars() {
            if ch.is_whitespace() || ch.is_control() || self.missing_glyphs.contains(&ch) {
                return Err(KernelError::GlyphRender {
                    ch,
                    reason: "no outline in mock font".to_string(),
                });
            }
            width += Self::glyph_width(ch, font_size);
            height = height.max(Self::glyph_height(ch, font_size));
            glyphs.push(ch);
        }
        if glyphs.is_empty() {
            return Err(KernelError::GlyphRender {
                ch: ' ',
                reason: "empty text".to_string(),
            });
        }

        // Mock outlines sit on the baseline, so bottom and baseline agree.
        let z0 = match align {
            VerticalAlign::Bottom | VerticalAlign::Baseline => 0.0,
            VerticalAlign::Center => -height / 2.0,
        };
        let solid = MockSolid {
            bounds: Aabb::new([0.0, -depth, z0], [width, 0.0, z0 + height]),
            glyphs,
            kind: MockKind::Glyph,
            vertices: 8,
            triangles: 12,
        };
        Ok(self.store(solid))
    }

    fn bounding_box(&self, solid: &SolidHandle) -> Result<Aabb, KernelError> {
        Ok(self.get(solid)?.bounds)
    }

    fn translate(
        &mut self,
        solid: SolidHandle,
        offset: [f64; 3],
    ) -> Result<SolidHandle, KernelError> {
        self.count("translate");
        let mut s = self.take(solid)?;
        s.bounds = s.bounds.translated(offset);
        Ok(self.store(s))
    }

    fn rotate(
        &mut self,
        solid: SolidHandle,
        axis_point: [f64; 3],
        axis_dir: [f64; 3],
        angle_degrees: f64,
    ) -> Result<SolidHandle, KernelError> {
        self.count("rotate");
        let len = (axis_dir[0] * axis_dir[0] + axis_dir[1] * axis_dir[1] + axis_dir[2] * axis_dir[2])
            .sqrt();
        if len < 1e-12 {
            return Err(KernelError::InvalidArgument {
                reason: "rotation axis has zero length".to_string(),
            });
        }
        let k = [axis_dir[0] / len, axis_dir[1] / len, axis_dir[2] / len];
        let angle = angle_degrees.to_radians();

        let mut s = self.take(solid)?;
        let turned: Vec<[f64; 3]> = s
            .bounds
            .corners()
            .iter()
            .map(|&p| rotate_point(p, axis_point, k, angle))
            .collect();
        s.bounds = Aabb::from_points(turned.iter());
        Ok(self.store(s))
    }

    fn intersect(&mut self, a: SolidHandle, b: SolidHandle) -> Result<SolidHandle, KernelError> {
        self.count("intersect");
        let sa = self.take(a)?;
        let sb = self.take(b)?;

        if let Some(&ch) = sa
            .glyphs
            .iter()
            .chain(sb.glyphs.iter())
            .find(|ch| self.broken_glyphs.contains(*ch))
        {
            return Err(KernelError::BooleanFailed {
                reason: format!("mock boolean engine rejects glyph {:?}", ch),
            });
        }

        let forced_empty = sa
            .glyphs
            .iter()
            .zip(sb.glyphs.iter())
            .any(|(&x, &y)| self.empty_pairs.contains(&(x, y)));
        let overlap = sa.bounds.intersection(&sb.bounds);
        let bounds = match overlap {
            Some(bb) if !forced_empty => bb,
            _ => {
                return Err(KernelError::EmptyResult {
                    operation: "intersect".to_string(),
                })
            }
        };

        let mut glyphs = sa.glyphs;
        glyphs.extend(sb.glyphs);
        Ok(self.store(MockSolid {
            bounds,
            glyphs,
            kind: MockKind::Intersection,
            vertices: 8,
            triangles: 12,
        }))
    }

    fn make_box(
        &mut self,
        dims: [f64; 3],
        centered: [bool; 3],
    ) -> Result<SolidHandle, KernelError> {
        self.count("make_box");
        if dims.iter().any(|&d| !(d > 0.0)) {
            return Err(KernelError::InvalidArgument {
                reason: format!("box dimensions {:?} must be positive", dims),
            });
        }
        let min = [0, 1, 2].map(|i| if centered[i] { -dims[i] / 2.0 } else { 0.0 });
        let max = [0, 1, 2].map(|i| min[i] + dims[i]);
        Ok(self.store(MockSolid {
            bounds: Aabb::new(min, max),
            glyphs: Vec::new(),
            kind: MockKind::Box,
            vertices: 8,
            triangles: 12,
        }))
    }

    fn fillet_vertical_edges(
        &mut self,
        solid: SolidHandle,
        radius: f64,
    ) -> Result<SolidHandle, KernelError> {
        self.count("fillet_vertical_edges");
        let mut s = self.take(solid)?;
        if radius < 0.0 {
            return Err(KernelError::InvalidArgument {
                reason: format!("fillet radius {} is negative", radius),
            });
        }
        if s.kind != MockKind::Box {
            return Err(KernelError::NotSupported {
                operation: "fillet_vertical_edges on a non-box solid".to_string(),
            });
        }
        let max = s.bounds.len(Axis::X).min(s.bounds.len(Axis::Y)) / 2.0;
        if radius > max + 1e-9 {
            return Err(KernelError::FilletInfeasible { radius, max });
        }
        if radius > 0.0 {
            // Each corner becomes an arc of FILLET_SEGMENTS segments, top and bottom.
            let outline = 4 * (FILLET_SEGMENTS + 1);
            s.kind = MockKind::Rounded;
            s.vertices = 2 * outline;
            s.triangles = 2 * (outline - 2) + 2 * outline;
        }
        Ok(self.store(s))
    }

    fn to_compound(&mut self, solids: Vec<SolidHandle>) -> Result<SolidHandle, KernelError> {
        self.count("to_compound");
        let mut parts = Vec::with_capacity(solids.len());
        for handle in solids {
            parts.push(self.take(handle)?);
        }
        if parts.is_empty() {
            return Err(KernelError::EmptyResult {
                operation: "to_compound".to_string(),
            });
        }
        let compound = parts.into_iter().fold(
            MockSolid {
                bounds: Aabb::empty(),
                glyphs: Vec::new(),
                kind: MockKind::Compound,
                vertices: 0,
                triangles: 0,
            },
            |mut acc, part| {
                acc.bounds = acc.bounds.union(&part.bounds);
                acc.glyphs.extend(part.glyphs);
                acc.vertices += part.vertices;
                acc.triangles += part.triangles;
                acc
            },
        );
        Ok(self.store(compound))
    }

    fn export(&mut self, solid: &SolidHandle, format: OutputFormat) -> Result<Vec<u8>, KernelError> {
        self.count("export");
        let s = self.get(solid)?;
        if self.failing_formats.contains(&format) {
            return Err(KernelError::ExportFailed {
                format,
                reason: "mock export failure".to_string(),
            });
        }
        match format {
            OutputFormat::Stl => stl::export_binary_stl(&stl::box_mesh(&s.bounds), "mock"),
            OutputFormat::Step => {
                let b = s.bounds;
                Ok(format!(
                    "ISO-10303-21;\n/* mock solid */\n/* bounds {:?} {:?} */\nEND-ISO-10303-21;\n",
                    b.min, b.max
                )
                .into_bytes())
            }
        }
    }

    fn mesh_stats(&mut self, solid: &SolidHandle) -> Result<MeshStats, KernelError> {
        let s = self.get(solid)?;
        if self.unmeshable {
            return Err(KernelError::TessellationFailed {
                reason: "mock mesher disabled".to_string(),
            });
        }
        Ok(MeshStats {
            vertices: s.vertices,
            triangles: s.triangles,
        })
    }

    fn release(&mut self, solid: SolidHandle) {
        self.solids.remove(&solid.id());
    }
}
