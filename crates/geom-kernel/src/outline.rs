//! Glyph outlines from TrueType/OpenType fonts, flattened to polygons.
//!
//! Curves are flattened with lyon_geom; the resulting closed contours are
//! grouped into filled regions (outer boundary plus holes) by nesting depth,
//! which works regardless of the winding convention the font uses.

use lyon_geom::{CubicBezierSegment, LineSegment, Point, QuadraticBezierSegment};
use ttf_parser::{Face, OutlineBuilder};

use crate::types::KernelError;

/// Maximum deviation of a flattened curve from the true outline, as a
/// fraction of the em size.
pub const FLATTEN_TOLERANCE: f64 = 0.002;

/// Points closer than this (in font units) are merged while flattening.
const MERGE_EPSILON: f64 = 1e-6;

/// A closed polygon in plane coordinates; the closing edge is implicit.
pub type Contour = Vec<[f64; 2]>;

/// One filled region of an outline.
/// The outer boundary is counter-clockwise, holes are clockwise.
#[derive(Debug, Clone)]
pub struct Region {
    pub outer: Contour,
    pub holes: Vec<Contour>,
}

struct ContourSink {
    contours: Vec<Contour>,
    current: Contour,
    tolerance: f64,
    offset_x: f64,
}

impl ContourSink {
    fn new(tolerance: f64) -> Self {
        Self {
            contours: Vec::new(),
            current: Vec::new(),
            tolerance,
            offset_x: 0.0,
        }
    }

    fn last(&self) -> Point<f64> {
        let p = self.current.last().copied().unwrap_or([self.offset_x, 0.0]);
        Point::new(p[0] - self.offset_x, p[1])
    }

    fn push(&mut self, x: f64, y: f64) {
        let p = [x + self.offset_x, y];
        if let Some(last) = self.current.last() {
            if (last[0] - p[0]).abs() < MERGE_EPSILON && (last[1] - p[1]).abs() < MERGE_EPSILON {
                return;
            }
        }
        self.current.push(p);
    }

    fn finish(&mut self) {
        let mut contour = std::mem::take(&mut self.current);
        if let (Some(first), Some(last)) = (contour.first().copied(), contour.last().copied()) {
            if contour.len() > 1
                && (first[0] - last[0]).abs() < MERGE_EPSILON
                && (first[1] - last[1]).abs() < MERGE_EPSILON
            {
                contour.pop();
            }
        }
        if contour.len() >= 3 && signed_area(&contour).abs() > MERGE_EPSILON {
            self.contours.push(contour);
        }
    }
}

impl OutlineBuilder for ContourSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.finish();
        self.push(x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(x as f64, y as f64);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let seg = QuadraticBezierSegment {
            from: self.last(),
            ctrl: Point::new(x1 as f64, y1 as f64),
            to: Point::new(x as f64, y as f64),
        };
        let tolerance = self.tolerance;
        seg.for_each_flattened(tolerance, &mut |ls: &LineSegment<f64>| {
            self.push(ls.to.x, ls.to.y);
        });
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let seg = CubicBezierSegment {
            from: self.last(),
            ctrl1: Point::new(x1 as f64, y1 as f64),
            ctrl2: Point::new(x2 as f64, y2 as f64),
            to: Point::new(x as f64, y as f64),
        };
        let tolerance = self.tolerance;
        seg.for_each_flattened(tolerance, &mut |ls: &LineSegment<f64>| {
            self.push(ls.to.x, ls.to.y);
        });
    }

    fn close(&mut self) {
        self.finish();
    }
}

/// Outline `text` with the font in `font_data`, scaled so one em equals
/// `font_size` model units. Glyphs are placed left to right by their
/// horizontal advance, baseline on y = 0.
///
/// Returns [`KernelError::GlyphRender`] for a character the font does not
/// map, or when the whole text produces no outline (e.g. only spaces).
pub fn text_contours(
    font_data: &[u8],
    font_name: &str,
    text: &str,
    font_size: f64,
) -> Result<Vec<Contour>, KernelError> {
    let face = Face::parse(font_data, 0).map_err(|e| KernelError::FontLoad {
        path: font_name.to_string(),
        reason: e.to_string(),
    })?;
    let units = face.units_per_em() as f64;
    if units <= 0.0 {
        return Err(KernelError::FontLoad {
            path: font_name.to_string(),
            reason: "font reports zero units per em".to_string(),
        });
    }
    let scale = font_size / units;

    let mut sink = ContourSink::new(units * FLATTEN_TOLERANCE);
    for ch in text.chars() {
        let gid = face.glyph_index(ch).ok_or_else(|| KernelError::GlyphRender {
            ch,
            reason: format!("not mapped by {}", font_name),
        })?;
        // Whitespace has an advance but no outline.
        let _ = face.outline_glyph(gid, &mut sink);
        sink.finish();
        sink.offset_x += face.glyph_hor_advance(gid).unwrap_or(0) as f64;
    }

    if sink.contours.is_empty() {
        let ch = text.chars().next().unwrap_or(' ');
        return Err(KernelError::GlyphRender {
            ch,
            reason: "outline is empty".to_string(),
        });
    }

    Ok(sink
        .contours
        .into_iter()
        .map(|c| c.into_iter().map(|[x, y]| [x * scale, y * scale]).collect())
        .collect())
}

/// Shoelace area; positive for counter-clockwise contours.
pub fn signed_area(contour: &[[f64; 2]]) -> f64 {
    let n = contour.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let [x0, y0] = contour[i];
        let [x1, y1] = contour[(i + 1) % n];
        area += x0 * y1 - x1 * y0;
    }
    area / 2.0
}

/// Even-odd point-in-polygon test.
pub fn contains_point(contour: &[[f64; 2]], p: [f64; 2]) -> bool {
    let n = contour.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let [xi, yi] = contour[i];
        let [xj, yj] = contour[j];
        if (yi > p[1]) != (yj > p[1]) && p[0] < (xj - xi) * (p[1] - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Group contours into filled regions by nesting depth.
///
/// A contour nested inside an even number of others is an outer boundary;
/// an odd count makes it a hole of the smallest enclosing outer boundary.
pub fn group_regions(contours: Vec<Contour>) -> Vec<Region> {
    let areas: Vec<f64> = contours.iter().map(|c| signed_area(c).abs()).collect();
    let containers: Vec<Vec<usize>> = contours
        .iter()
        .enumerate()
        .map(|(i, c)| {
            (0..contours.len())
                .filter(|&j| j != i && areas[j] > areas[i] && contains_point(&contours[j], c[0]))
                .collect()
        })
        .collect();

    let mut outer_index: Vec<Option<usize>> = vec![None; contours.len()];
    let mut regions: Vec<Region> = Vec::new();
    let mut order: Vec<usize> = (0..contours.len()).collect();
    order.sort_by(|&a, &b| areas[b].total_cmp(&areas[a]));

    for &i in &order {
        if containers[i].len() % 2 == 0 {
            let mut outer = contours[i].clone();
            if signed_area(&outer) < 0.0 {
                outer.reverse();
            }
            outer_index[i] = Some(regions.len());
            regions.push(Region {
                outer,
                holes: Vec::new(),
            });
        }
    }

    for &i in &order {
        if containers[i].len() % 2 == 1 {
            let parent = containers[i]
                .iter()
                .copied()
                .filter(|&j| outer_index[j].is_some())
                .min_by(|&a, &b| areas[a].total_cmp(&areas[b]));
            if let Some(region) = parent.and_then(|j| outer_index[j]) {
                let mut hole = contours[i].clone();
                if signed_area(&hole) > 0.0 {
                    hole.reverse();
                }
                regions[region].holes.push(hole);
            }
        }
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(x: f64, y: f64, s: f64) -> Contour {
        vec![[x, y], [x + s, y], [x + s, y + s], [x, y + s]]
    }

    #[test]
    fn signed_area_sign_follows_winding() {
        let ccw = square(0.0, 0.0, 2.0);
        let mut cw = ccw.clone();
        cw.reverse();
        assert_relative_eq!(signed_area(&ccw), 4.0);
        assert_relative_eq!(signed_area(&cw), -4.0);
    }

    #[test]
    fn nested_contour_becomes_hole() {
        // An "O": outer ring with a counter, plus an unrelated dot.
        let outer = square(0.0, 0.0, 10.0);
        let counter = square(3.0, 3.0, 4.0);
        let dot = square(20.0, 0.0, 2.0);
        let regions = group_regions(vec![counter, dot, outer]);

        assert_eq!(regions.len(), 2);
        let ring = regions.iter().find(|r| !r.holes.is_empty()).unwrap();
        assert_eq!(ring.holes.len(), 1);
        assert!(signed_area(&ring.outer) > 0.0);
        assert!(signed_area(&ring.holes[0]) < 0.0);
    }

    #[test]
    fn island_inside_hole_is_its_own_region() {
        let outer = square(0.0, 0.0, 10.0);
        let hole = square(2.0, 2.0, 6.0);
        let island = square(4.0, 4.0, 2.0);
        let regions = group_regions(vec![outer, hole, island]);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions.iter().map(|r| r.holes.len()).sum::<usize>(), 1);
    }

    #[test]
    fn invalid_font_data_is_a_font_error() {
        let err = text_contours(b"not a font", "bogus.ttf", "A", 20.0).unwrap_err();
        assert!(matches!(err, KernelError::FontLoad { .. }));
        assert!(!err.is_no_geometry());
    }
}
