use geom_kernel::{Aabb, Axis, Kernel, KernelError};
use serde::Serialize;
use tracing::{info, instrument};

use crate::params::PlateParams;
use crate::types::{IllusionError, Part, PartRole};

/// Placement of the base plate under a letter envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlateGeometry {
    /// Box size along X, Y, Z.
    pub dims: [f64; 3],
    /// Corner with the smallest coordinates.
    pub min: [f64; 3],
    pub fillet_radius: f64,
}

impl PlateGeometry {
    pub fn bounds(&self) -> Aabb {
        let max = [0, 1, 2].map(|i| self.min[i] + self.dims[i]);
        Aabb::new(self.min, max)
    }
}

/// Compute the plate box for `envelope`, or `None` when the plate height is 0.
///
/// The plate spans the envelope plus `padding` on each horizontal side, its
/// top face lies on the envelope's lowest Z and it is centered on the
/// envelope's X midpoint.
pub fn plate_geometry(
    envelope: &Aabb,
    plate: &PlateParams,
) -> Result<Option<PlateGeometry>, IllusionError> {
    if envelope.is_degenerate() {
        return Err(IllusionError::EmptySequence);
    }
    if plate.height <= 0.0 {
        return Ok(None);
    }

    let p = plate.padding;
    let xlen = envelope.len(Axis::X);
    let dims = [xlen + 2.0 * p, envelope.len(Axis::Y) + 2.0 * p, plate.height];
    let min = [
        envelope.mid(Axis::X) - dims[0] / 2.0,
        envelope.min_on(Axis::Y) - p,
        envelope.min_on(Axis::Z) - plate.height,
    ];
    let fillet_radius = plate.fillet_fraction * xlen / 2.0;

    let max = dims[0].min(dims[1]) / 2.0;
    if fillet_radius > max {
        return Err(IllusionError::FilletInfeasible {
            radius: fillet_radius,
            max,
        });
    }

    Ok(Some(PlateGeometry {
        dims,
        min,
        fillet_radius,
    }))
}

/// Build the plate solid described by `geometry`.
#[instrument(skip(kernel))]
pub fn build_plate(kernel: &mut dyn Kernel, geometry: &PlateGeometry) -> Result<Part, IllusionError> {
    // Centered on X only: spans [-dx/2, dx/2] x [0, dy] x [0, h].
    let solid = kernel.make_box(geometry.dims, [true, false, false])?;
    let solid = if geometry.fillet_radius > 0.0 {
        kernel
            .fillet_vertical_edges(solid, geometry.fillet_radius)
            .map_err(|e| match e {
                KernelError::FilletInfeasible { radius, max } => {
                    IllusionError::FilletInfeasible { radius, max }
                }
                other => other.into(),
            })?
    } else {
        solid
    };

    let offset = [
        geometry.min[0] + geometry.dims[0] / 2.0,
        geometry.min[1],
        geometry.min[2],
    ];
    let handle = kernel.translate(solid, offset)?;
    info!(dims = ?geometry.dims, radius = geometry.fillet_radius, "plate built");

    Ok(Part {
        role: PartRole::Plate,
        handle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn envelope() -> Aabb {
        Aabb::new([-6.0, 0.0, 0.0], [10.0, 30.0, 14.0])
    }

    #[test]
    fn plate_pads_the_envelope() {
        let g = plate_geometry(&envelope(), &PlateParams::default())
            .unwrap()
            .unwrap();
        let b = g.bounds();
        assert_relative_eq!(b.len(Axis::X), 16.0 + 4.0);
        assert_relative_eq!(b.len(Axis::Y), 30.0 + 4.0);
        assert_relative_eq!(b.mid(Axis::X), 2.0);
        assert_relative_eq!(b.min_on(Axis::Y), -2.0);
        assert_relative_eq!(b.max_on(Axis::Z), 0.0);
        assert_relative_eq!(b.min_on(Axis::Z), -1.0);
        assert_relative_eq!(g.fillet_radius, 0.8 * 8.0);
    }

    #[test]
    fn zero_height_omits_the_plate() {
        let plate = PlateParams {
            height: 0.0,
            ..PlateParams::default()
        };
        assert!(plate_geometry(&envelope(), &plate).unwrap().is_none());
    }

    #[test]
    fn empty_envelope_is_an_empty_sequence() {
        let err = plate_geometry(&Aabb::empty(), &PlateParams::default()).unwrap_err();
        assert!(matches!(err, IllusionError::EmptySequence));
    }

    #[test]
    fn short_plate_cannot_take_a_wide_fillet() {
        // 40 wide but only 2 long: full fillet would need radius 20.
        let env = Aabb::new([0.0, 0.0, 0.0], [40.0, 2.0, 5.0]);
        let plate = PlateParams {
            height: 1.0,
            padding: 0.0,
            fillet_fraction: 1.0,
        };
        let err = plate_geometry(&env, &plate).unwrap_err();
        assert!(matches!(err, IllusionError::FilletInfeasible { .. }));
    }
}
