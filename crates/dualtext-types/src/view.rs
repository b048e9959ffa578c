use serde::{Deserialize, Serialize};

/// Model axes. Z is up, Y is the layout axis letters are stacked along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// The layout axis successive letter pairs are stacked along.
    pub const LAYOUT: Axis = Axis::Y;
    /// The vertical axis glyphs stand on and rotate about.
    pub const VERTICAL: Axis = Axis::Z;

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit vector along this axis.
    pub fn unit(self) -> [f64; 3] {
        let mut v = [0.0; 3];
        v[self.index()] = 1.0;
        v
    }

    /// A vector of length `d` along this axis.
    pub fn offset(self, d: f64) -> [f64; 3] {
        let mut v = [0.0; 3];
        v[self.index()] = d;
        v
    }
}

/// One of the two complementary viewing directions of the illusion.
///
/// The first text is read looking along one diagonal, the second along the
/// other; glyphs are turned about Z so each faces its viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewAngle {
    /// Rotation applied to glyphs of the first text (45°).
    First,
    /// Rotation applied to glyphs of the second text (135°).
    Second,
}

impl ViewAngle {
    pub fn degrees(self) -> f64 {
        match self {
            ViewAngle::First => 45.0,
            ViewAngle::Second => 135.0,
        }
    }
}

/// Vertical placement of a glyph outline on its construction plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    /// Lowest point of the outline on the plane origin.
    #[default]
    Bottom,
    /// Outline baseline on the plane origin.
    Baseline,
    /// Vertical center of the outline on the plane origin.
    Center,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_angles_are_complementary() {
        assert_eq!(ViewAngle::First.degrees() + 90.0, ViewAngle::Second.degrees());
    }

    #[test]
    fn axis_offset_places_value_on_axis() {
        assert_eq!(Axis::LAYOUT.offset(3.0), [0.0, 3.0, 0.0]);
        assert_eq!(Axis::VERTICAL.unit(), [0.0, 0.0, 1.0]);
    }
}
