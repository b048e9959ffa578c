use serde::{Deserialize, Serialize};

use crate::view::Axis;

/// Axis-aligned bounding box in model units.
///
/// `min` and `max` are inclusive corners. A box produced from no points is
/// "inverted" (`min > max` on every axis) and reports itself as empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// The identity element for [`Aabb::union`].
    pub fn empty() -> Self {
        Self {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a [f64; 3]>) -> Self {
        points.into_iter().fold(Self::empty(), |acc, p| acc.include(*p))
    }

    /// Grow the box so it contains `p`.
    pub fn include(mut self, p: [f64; 3]) -> Self {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
        self
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut out = *self;
        for i in 0..3 {
            out.min[i] = out.min[i].min(other.min[i]);
            out.max[i] = out.max[i].max(other.max[i]);
        }
        out
    }

    /// Overlap of two boxes, or `None` when they share no volume.
    /// Boxes that only touch on a face have zero volume and yield `None`.
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        let mut out = *self;
        for i in 0..3 {
            out.min[i] = self.min[i].max(other.min[i]);
            out.max[i] = self.max[i].min(other.max[i]);
            if out.max[i] <= out.min[i] {
                return None;
            }
        }
        Some(out)
    }

    pub fn translated(&self, v: [f64; 3]) -> Aabb {
        Aabb {
            min: [self.min[0] + v[0], self.min[1] + v[1], self.min[2] + v[2]],
            max: [self.max[0] + v[0], self.max[1] + v[1], self.max[2] + v[2]],
        }
    }

    /// The eight corner points.
    pub fn corners(&self) -> [[f64; 3]; 8] {
        let (a, b) = (self.min, self.max);
        [
            [a[0], a[1], a[2]],
            [b[0], a[1], a[2]],
            [b[0], b[1], a[2]],
            [a[0], b[1], a[2]],
            [a[0], a[1], b[2]],
            [b[0], a[1], b[2]],
            [b[0], b[1], b[2]],
            [a[0], b[1], b[2]],
        ]
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.max[i] < self.min[i])
    }

    /// True when the box has no extent on any horizontal axis (or is empty).
    pub fn is_degenerate(&self) -> bool {
        self.is_empty() || self.len(Axis::X) <= 0.0 || self.len(Axis::Y) <= 0.0
    }

    pub fn len(&self, axis: Axis) -> f64 {
        let i = axis.index();
        self.max[i] - self.min[i]
    }

    pub fn mid(&self, axis: Axis) -> f64 {
        let i = axis.index();
        (self.min[i] + self.max[i]) / 2.0
    }

    pub fn min_on(&self, axis: Axis) -> f64 {
        self.min[axis.index()]
    }

    pub fn max_on(&self, axis: Axis) -> f64 {
        self.max[axis.index()]
    }

    /// Interval of the box projected on `axis`.
    pub fn interval(&self, axis: Axis) -> (f64, f64) {
        (self.min_on(axis), self.max_on(axis))
    }
}
