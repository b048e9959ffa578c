//! Higher-level primitive builders on top of truck's sweep API.
//!
//! truck has no built-in box or rounded plate: everything is built from
//! wires, attached planes and translational sweeps.

use std::f64::consts::FRAC_1_SQRT_2;

use truck_modeling::builder;
use truck_modeling::topology::{Edge, Face, Shell, Solid, Vertex, Wire};
use truck_modeling::{Point3, Vector3};

use crate::outline::{Contour, Region};
use crate::types::KernelError;

/// Consecutive points closer than this are treated as one vertex.
const POINT_EPSILON: f64 = 1e-9;

/// Create a box solid via successive translational sweeps.
/// One corner at `min`, extending by `dims` along +X, +Y, +Z.
pub fn make_box(min: [f64; 3], dims: [f64; 3]) -> Solid {
    let v = builder::vertex(Point3::new(min[0], min[1], min[2]));
    let edge = builder::tsweep(&v, Vector3::new(dims[0], 0.0, 0.0));
    let face = builder::tsweep(&edge, Vector3::new(0.0, dims[1], 0.0));
    builder::tsweep(&face, Vector3::new(0.0, 0.0, dims[2]))
}

/// Closed polyline wire through `points`, sharing vertices between edges.
fn polygon_wire(points: &[Point3]) -> Wire {
    let vertices: Vec<Vertex> = points.iter().map(|&p| builder::vertex(p)).collect();
    let n = vertices.len();
    (0..n)
        .map(|i| builder::line(&vertices[i], &vertices[(i + 1) % n]))
        .collect()
}

/// Planar face on the XZ plane from a glyph region; plane point (u, v)
/// maps to (u, 0, v + lift). Outer CCW in (u, v) gives a face normal of -Y.
fn region_face(region: &Region, lift: f64) -> Result<Face, KernelError> {
    let to_3d = |c: &Contour| -> Vec<Point3> {
        c.iter().map(|&[u, v]| Point3::new(u, 0.0, v + lift)).collect()
    };
    let mut wires = vec![polygon_wire(&to_3d(&region.outer))];
    wires.extend(region.holes.iter().map(|h| polygon_wire(&to_3d(h))));
    builder::try_attach_plane(&wires).map_err(|e| KernelError::Other {
        message: format!("failed to create glyph face: {}", e),
    })
}

/// Extrude glyph regions drawn on the XZ plane by `depth` along -Y.
/// All regions end up as shells of one solid.
pub fn extrude_regions(regions: &[Region], lift: f64, depth: f64) -> Result<Solid, KernelError> {
    let mut shells: Vec<Shell> = Vec::new();
    for region in regions {
        let face = region_face(region, lift)?;
        let solid: Solid = builder::tsweep(&face, Vector3::new(0.0, -depth, 0.0));
        shells.extend(solid.boundaries().iter().cloned());
    }
    Solid::try_new(shells).map_err(|e| KernelError::Other {
        message: format!("glyph solid is not closed: {}", e),
    })
}

/// Box with its four vertical edges rounded by `radius`.
///
/// The plate spans `min..min+dims`. `radius` must not exceed half of the
/// smaller horizontal dimension; at exactly half, the straight segment on
/// that side vanishes and the adjacent arcs meet.
pub fn make_rounded_box(min: [f64; 3], dims: [f64; 3], radius: f64) -> Result<Solid, KernelError> {
    let max_radius = dims[0].min(dims[1]) / 2.0;
    if radius > max_radius + POINT_EPSILON {
        return Err(KernelError::FilletInfeasible {
            radius,
            max: max_radius,
        });
    }
    if radius <= POINT_EPSILON {
        return Ok(make_box(min, dims));
    }

    let (x0, y0, z) = (min[0], min[1], min[2]);
    let (x1, y1) = (x0 + dims[0], y0 + dims[1]);
    let r = radius.min(max_radius);

    // Corner centers, counter-clockwise from bottom-right.
    let corners = [
        ([x1 - r, y0 + r], [x1 - r, y0], [x1, y0 + r]),
        ([x1 - r, y1 - r], [x1, y1 - r], [x1 - r, y1]),
        ([x0 + r, y1 - r], [x0 + r, y1], [x0, y1 - r]),
        ([x0 + r, y0 + r], [x0, y0 + r], [x0 + r, y0]),
    ];

    // Arc start/end points, merged where the straight run between arcs is empty.
    let mut points: Vec<[f64; 2]> = Vec::new();
    for (_, start, end) in &corners {
        push_distinct(&mut points, *start);
        push_distinct(&mut points, *end);
    }
    if points.len() > 1 && close(points[0], points[points.len() - 1]) {
        points.pop();
    }
    let vertices: Vec<Vertex> = points
        .iter()
        .map(|p| builder::vertex(Point3::new(p[0], p[1], z)))
        .collect();
    let index_of = |p: [f64; 2]| points.iter().position(|q| close(*q, p));

    let mut edges: Vec<Edge> = Vec::new();
    for (i, (center, start, end)) in corners.iter().enumerate() {
        let (Some(s), Some(e)) = (index_of(*start), index_of(*end)) else {
            return Err(KernelError::FilletFailed {
                reason: "rounded outline lost a corner vertex".to_string(),
            });
        };
        let mid = [
            center[0] + (start[0] + end[0] - 2.0 * center[0]) * FRAC_1_SQRT_2,
            center[1] + (start[1] + end[1] - 2.0 * center[1]) * FRAC_1_SQRT_2,
        ];
        edges.push(builder::circle_arc(
            &vertices[s],
            &vertices[e],
            Point3::new(mid[0], mid[1], z),
        ));

        let next_start = corners[(i + 1) % corners.len()].1;
        if let Some(n) = index_of(next_start) {
            if n != e {
                edges.push(builder::line(&vertices[e], &vertices[n]));
            }
        }
    }

    let wire: Wire = edges.into_iter().collect();
    let face = builder::try_attach_plane(&[wire]).map_err(|e| KernelError::FilletFailed {
        reason: format!("failed to create rounded outline: {}", e),
    })?;
    Ok(builder::tsweep(&face, Vector3::new(0.0, 0.0, dims[2])))
}

fn close(a: [f64; 2], b: [f64; 2]) -> bool {
    (a[0] - b[0]).abs() < POINT_EPSILON && (a[1] - b[1]).abs() < POINT_EPSILON
}

fn push_distinct(points: &mut Vec<[f64; 2]>, p: [f64; 2]) {
    if points.last().map_or(true, |&q| !close(q, p)) {
        points.push(p);
    }
}

/// Axis-aligned bounds of a solid from its vertices.
///
/// Exact for the solids this crate builds: planar faces, and fillet arcs
/// that never bulge past the box they round.
pub fn solid_bounds(solid: &Solid) -> [[f64; 3]; 2] {
    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    for shell in solid.boundaries() {
        for v in shell.vertex_iter() {
            let p = v.point();
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
    }
    [min, max]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_counts(solid: &Solid) -> (usize, usize, usize) {
        let shell = &solid.boundaries()[0];
        let faces = shell.face_iter().count();
        let mut edge_ids = std::collections::HashSet::new();
        for edge in shell.edge_iter() {
            edge_ids.insert(edge.id());
        }
        let mut vert_ids = std::collections::HashSet::new();
        for v in shell.vertex_iter() {
            vert_ids.insert(v.id());
        }
        (vert_ids.len(), edge_ids.len(), faces)
    }

    #[test]
    fn test_make_box_topology() {
        let solid = make_box([0.0, 0.0, 0.0], [1.0, 2.0, 3.0]);
        assert_eq!(solid.boundaries().len(), 1, "Box should have 1 shell");
        let (v, e, f) = unique_counts(&solid);
        assert_eq!((v, e, f), (8, 12, 6));
        assert_eq!(v as i64 - e as i64 + f as i64, 2, "Euler formula must hold");
    }

    #[test]
    fn test_make_box_dimensions() {
        let solid = make_box([-1.0, 0.5, -2.0], [2.0, 3.0, 4.0]);
        let [min, max] = solid_bounds(&solid);
        let eps = 1e-10;
        assert!((min[0] + 1.0).abs() < eps);
        assert!((max[1] - 3.5).abs() < eps);
        assert!((max[2] - min[2] - 4.0).abs() < eps, "Depth should be 4");
    }

    #[test]
    fn test_rounded_box_has_curved_sides() {
        let solid = make_rounded_box([0.0, 0.0, -1.0], [10.0, 20.0, 1.0], 2.0).unwrap();
        let (v, e, f) = unique_counts(&solid);
        // 8 outline segments: top + bottom + 8 sides.
        assert_eq!(f, 10);
        assert_eq!(v as i64 - e as i64 + f as i64, 2);

        let [min, max] = solid_bounds(&solid);
        assert!((max[0] - min[0] - 10.0).abs() < 1e-9);
        assert!((max[1] - min[1] - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_rounded_box_full_radius_drops_short_sides() {
        let solid = make_rounded_box([0.0, 0.0, 0.0], [4.0, 10.0, 1.0], 2.0).unwrap();
        let (_, _, f) = unique_counts(&solid);
        // Two semicircular ends split into two arcs each, two long sides.
        assert_eq!(f, 8);
    }

    #[test]
    fn test_rounded_box_rejects_oversized_radius() {
        let err = make_rounded_box([0.0, 0.0, 0.0], [4.0, 10.0, 1.0], 2.5).unwrap_err();
        assert!(matches!(err, KernelError::FilletInfeasible { max, .. } if (max - 2.0).abs() < 1e-12));
    }
}
