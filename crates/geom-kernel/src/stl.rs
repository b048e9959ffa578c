//! Binary STL encoding of a RenderMesh, and a reader for the summary
//! (triangle count, bounds) of an encoded file.

use crate::types::{Aabb, KernelError, OutputFormat, RenderMesh};

const HEADER_LEN: usize = 80;
const TRIANGLE_LEN: usize = 50;

fn stl_error(reason: String) -> KernelError {
    KernelError::ExportFailed {
        format: OutputFormat::Stl,
        reason,
    }
}

/// Encode a RenderMesh as a binary STL file.
///
/// Binary STL format:
/// - 80-byte header (arbitrary text)
/// - u32 triangle count (little-endian)
/// - For each triangle: 3×f32 normal + 3×(3×f32 vertex) + u16 attribute = 50 bytes
pub fn export_binary_stl(mesh: &RenderMesh, name: &str) -> Result<Vec<u8>, KernelError> {
    let tri_count = mesh.indices.len() / 3;
    if tri_count == 0 {
        return Err(stl_error("mesh has no triangles".to_string()));
    }

    let vertex_count = mesh.vertices.len() / 3;
    if let Some(&idx) = mesh.indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(stl_error(format!(
            "index {} out of range (vertex count = {})",
            idx, vertex_count
        )));
    }

    let mut buf = Vec::with_capacity(HEADER_LEN + 4 + tri_count * TRIANGLE_LEN);

    let header = format!("binary STL: {}", name);
    let header_bytes = header.as_bytes();
    buf.extend_from_slice(&header_bytes[..header_bytes.len().min(HEADER_LEN)]);
    buf.resize(HEADER_LEN, 0u8);

    buf.extend_from_slice(&(tri_count as u32).to_le_bytes());

    for tri in mesh.indices.chunks(3) {
        let p = |k: usize| {
            let i = tri[k] as usize * 3;
            [mesh.vertices[i], mesh.vertices[i + 1], mesh.vertices[i + 2]]
        };
        let (a, b, c) = (p(0), p(1), p(2));

        // Face normal from the cross product; STL readers ignore it mostly.
        let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let n = [
            u[1] * v[2] - u[2] * v[1],
            u[2] * v[0] - u[0] * v[2],
            u[0] * v[1] - u[1] * v[0],
        ];
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        let n = if len > 1e-12 {
            [n[0] / len, n[1] / len, n[2] / len]
        } else {
            [0.0f32, 0.0, 1.0]
        };

        for value in n.iter().chain(a.iter()).chain(b.iter()).chain(c.iter()) {
            buf.extend_from_slice(&value.to_le_bytes());
        }
        buf.extend_from_slice(&0u16.to_le_bytes());
    }

    Ok(buf)
}

/// Summary of an encoded binary STL file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StlSummary {
    pub triangles: u32,
    pub bounds: Aabb,
}

/// Read the triangle count and vertex bounds of a binary STL file.
pub fn read_binary_stl_summary(bytes: &[u8]) -> Result<StlSummary, KernelError> {
    if bytes.len() < HEADER_LEN + 4 {
        return Err(stl_error("file shorter than STL header".to_string()));
    }
    let mut count = [0u8; 4];
    count.copy_from_slice(&bytes[HEADER_LEN..HEADER_LEN + 4]);
    let triangles = u32::from_le_bytes(count);

    let expected = HEADER_LEN + 4 + triangles as usize * TRIANGLE_LEN;
    if bytes.len() != expected {
        return Err(stl_error(format!(
            "expected {} bytes for {} triangles, found {}",
            expected,
            triangles,
            bytes.len()
        )));
    }

    let read_f32 = |at: usize| {
        let mut b = [0u8; 4];
        b.copy_from_slice(&bytes[at..at + 4]);
        f32::from_le_bytes(b) as f64
    };

    let mut bounds = Aabb::empty();
    for t in 0..triangles as usize {
        let base = HEADER_LEN + 4 + t * TRIANGLE_LEN + 12;
        for k in 0..3 {
            let at = base + k * 12;
            bounds = bounds.include([read_f32(at), read_f32(at + 4), read_f32(at + 8)]);
        }
    }

    Ok(StlSummary { triangles, bounds })
}

/// Axis-aligned box as a 12-triangle mesh.
pub fn box_mesh(bounds: &Aabb) -> RenderMesh {
    let c = bounds.corners();
    let vertices = c
        .iter()
        .flat_map(|p| [p[0] as f32, p[1] as f32, p[2] as f32])
        .collect();
    let indices = vec![
        0, 2, 1, 0, 3, 2, // bottom
        4, 5, 6, 4, 6, 7, // top
        0, 1, 5, 0, 5, 4, // front
        2, 3, 7, 2, 7, 6, // back
        0, 4, 7, 0, 7, 3, // left
        1, 2, 6, 1, 6, 5, // right
    ];
    RenderMesh {
        vertices,
        normals: Vec::new(),
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_stl_header_and_size() {
        let mesh = box_mesh(&Aabb::new([0.0, 0.0, 0.0], [1.0, 2.0, 3.0]));
        let bytes = export_binary_stl(&mesh, "box").unwrap();
        assert_eq!(bytes.len(), 80 + 4 + 12 * 50);
        assert!(bytes.starts_with(b"binary STL: box"));
    }

    #[test]
    fn summary_reads_back_bounds() {
        let bounds = Aabb::new([-1.0, 0.0, -0.5], [1.0, 4.0, 2.0]);
        let bytes = export_binary_stl(&box_mesh(&bounds), "b").unwrap();
        let summary = read_binary_stl_summary(&bytes).unwrap();
        assert_eq!(summary.triangles, 12);
        assert_eq!(summary.bounds, bounds);
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let err = export_binary_stl(&RenderMesh::default(), "empty").unwrap_err();
        assert!(matches!(
            err,
            KernelError::ExportFailed {
                format: OutputFormat::Stl,
                ..
            }
        ));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mesh = RenderMesh {
            vertices: vec![0.0; 9],
            normals: Vec::new(),
            indices: vec![0, 1, 3],
        };
        assert!(export_binary_stl(&mesh, "bad").is_err());
    }

    #[test]
    fn truncated_file_is_rejected() {
        let bytes = export_binary_stl(&box_mesh(&Aabb::new([0.0; 3], [1.0; 3])), "b").unwrap();
        assert!(read_binary_stl_summary(&bytes[..bytes.len() - 1]).is_err());
    }
}
