//! Triangulation of truck solids into flat RenderMesh buffers.

use truck_meshalgo::prelude::*;
use truck_meshalgo::tessellation::{MeshableShape, MeshedShape};
use truck_modeling::Solid;

use crate::types::{KernelError, RenderMesh};

/// Append `mesh` to `out`, re-basing its indices after the existing vertices.
fn append(out: &mut RenderMesh, mesh: &PolygonMesh) {
    let base = out.vertex_count() as u32;
    let positions = mesh.positions();
    let normals = mesh.normals();

    for p in positions {
        out.vertices.extend([p[0] as f32, p[1] as f32, p[2] as f32]);
    }
    // Per-vertex normals only when the mesh carries one per position.
    if normals.len() == positions.len() {
        for n in normals {
            out.normals.extend([n[0] as f32, n[1] as f32, n[2] as f32]);
        }
    } else {
        out.normals
            .extend(std::iter::repeat([0.0f32, 0.0, 1.0]).take(positions.len()).flatten());
    }
    out.indices.extend(
        mesh.tri_faces()
            .iter()
            .flat_map(|tri| tri.iter().map(move |v| v.pos as u32 + base)),
    );
}

/// Triangulate a solid face by face, flipping reversed faces so every
/// triangle winds outward. Falls back to the merged polygon of the whole
/// solid when no face produced triangles.
pub fn tessellate_solid(solid: &Solid, tolerance: f64) -> Result<RenderMesh, KernelError> {
    let meshed = solid.triangulation(tolerance);

    let mut out = RenderMesh::default();
    for shell in meshed.boundaries() {
        for face in shell.face_iter() {
            let Some(mut mesh) = face.surface() else {
                continue;
            };
            if !face.orientation() {
                mesh.invert();
            }
            append(&mut out, &mesh);
        }
    }

    if out.indices.is_empty() {
        out = RenderMesh::default();
        append(&mut out, &meshed.to_polygon());
    }
    if out.indices.is_empty() {
        return Err(KernelError::TessellationFailed {
            reason: "solid produced no triangles".to_string(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::make_box;

    #[test]
    fn box_tessellates_to_closed_triangle_soup() {
        let mesh = tessellate_solid(&make_box([0.0; 3], [1.0, 2.0, 3.0]), 0.01).unwrap();
        assert!(mesh.triangle_count() >= 12);
        assert_eq!(mesh.normals.len(), mesh.vertices.len());
        let n = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
    }
}
