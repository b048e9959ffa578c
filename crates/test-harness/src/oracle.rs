//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics.
//! This lets a test collect all failures of a run in one pass.

use std::path::Path;

use geom_kernel::stl::read_binary_stl_summary;
use geom_kernel::{Aabb, Axis};
use illusion_ops::{IllusionParams, Placement, RunOutcome};

/// Absolute tolerance for coordinates computed in f64.
pub const TOLERANCE: f64 = 1e-6;

/// Tolerance for coordinates read back from an f32 STL file.
pub const STL_TOLERANCE: f64 = 1e-3;

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: Some(value),
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: Some(value),
        }
    }
}

// ── Sequence Oracles ────────────────────────────────────────────────────────

/// Exactly one placement per processed pair: min of the two text lengths.
pub fn check_pair_count(outcome: &RunOutcome, text1: &str, text2: &str) -> OracleVerdict {
    let expected = text1.chars().count().min(text2.chars().count());
    let got = outcome.placements.len();
    if got == expected && outcome.attempted_pairs == expected {
        OracleVerdict::pass_val(
            "pair_count",
            format!("{} pairs processed", got),
            got as f64,
        )
    } else {
        OracleVerdict::fail_val(
            "pair_count",
            format!(
                "expected {} pairs, got {} placements ({} attempted)",
                expected, got, outcome.attempted_pairs
            ),
            got as f64,
        )
    }
}

/// Placements appear in input pair order.
pub fn check_input_order(placements: &[Placement]) -> OracleVerdict {
    let out_of_order: Vec<(usize, usize)> = placements
        .iter()
        .enumerate()
        .filter(|(i, p)| p.index() != *i)
        .map(|(i, p)| (i, p.index()))
        .collect();
    if out_of_order.is_empty() {
        OracleVerdict::pass(
            "input_order",
            format!("{} placements in order", placements.len()),
        )
    } else {
        OracleVerdict::fail(
            "input_order",
            format!(
                "{} placements out of order (position, index): {:?}",
                out_of_order.len(),
                &out_of_order[..out_of_order.len().min(5)]
            ),
        )
    }
}

/// Consecutive solids do not overlap on the layout axis.
pub fn check_no_overlap(placements: &[Placement]) -> OracleVerdict {
    let solids: Vec<(usize, &Aabb)> = placements
        .iter()
        .filter_map(|p| p.bounds().map(|b| (p.index(), b)))
        .collect();

    let mut min_gap = f64::INFINITY;
    let mut overlaps = Vec::new();
    for w in solids.windows(2) {
        let gap = w[1].1.min_on(Axis::LAYOUT) - w[0].1.max_on(Axis::LAYOUT);
        min_gap = min_gap.min(gap);
        if gap < -TOLERANCE {
            overlaps.push((w[0].0, w[1].0, gap));
        }
    }

    if overlaps.is_empty() {
        let shown = if min_gap.is_finite() { min_gap } else { 0.0 };
        OracleVerdict::pass_val(
            "no_overlap",
            format!("{} solids, smallest gap {:.4}", solids.len(), shown),
            shown,
        )
    } else {
        OracleVerdict::fail_val(
            "no_overlap",
            format!("{} overlapping neighbours: {:?}", overlaps.len(), overlaps),
            min_gap,
        )
    }
}

// ── Plate Oracles ───────────────────────────────────────────────────────────

/// Plate extent equals the envelope plus twice the padding on X and Y, and
/// its top face touches the envelope bottom.
pub fn check_plate_extent(outcome: &RunOutcome, padding: f64) -> OracleVerdict {
    let Some(plate) = &outcome.plate else {
        return OracleVerdict::fail("plate_extent", "run produced no plate".to_string());
    };
    let env = &outcome.envelope;
    let pb = plate.bounds();

    let mut problems = Vec::new();
    for axis in [Axis::X, Axis::Y] {
        let expected = env.len(axis) + 2.0 * padding;
        if (pb.len(axis) - expected).abs() > TOLERANCE {
            problems.push(format!(
                "{:?} length {:.4}, expected {:.4}",
                axis,
                pb.len(axis),
                expected
            ));
        }
        if (pb.mid(axis) - env.mid(axis)).abs() > TOLERANCE {
            problems.push(format!(
                "{:?} midpoint {:.4}, envelope midpoint {:.4}",
                axis,
                pb.mid(axis),
                env.mid(axis)
            ));
        }
    }
    if (pb.max_on(Axis::Z) - env.min_on(Axis::Z)).abs() > TOLERANCE {
        problems.push(format!(
            "top face at {:.4}, envelope bottom at {:.4}",
            pb.max_on(Axis::Z),
            env.min_on(Axis::Z)
        ));
    }

    if problems.is_empty() {
        OracleVerdict::pass(
            "plate_extent",
            format!(
                "plate {:.3} x {:.3} x {:.3}",
                pb.len(Axis::X),
                pb.len(Axis::Y),
                pb.len(Axis::Z)
            ),
        )
    } else {
        OracleVerdict::fail("plate_extent", problems.join("; "))
    }
}

// ── Export Oracles ──────────────────────────────────────────────────────────

/// The exported model is centered on the layout axis.
pub fn check_centered(outcome: &RunOutcome) -> OracleVerdict {
    let mid = outcome.model_bounds.mid(Axis::LAYOUT);
    if mid.abs() <= TOLERANCE {
        OracleVerdict::pass_val("centered", "layout midpoint at origin".to_string(), mid)
    } else {
        OracleVerdict::fail_val(
            "centered",
            format!("layout midpoint at {:.6}", mid),
            mid,
        )
    }
}

/// A binary STL file exists, has triangles, and its vertices span `expected`.
pub fn check_stl_file(path: &Path, expected: &Aabb) -> OracleVerdict {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            return OracleVerdict::fail("stl_file", format!("{}: {}", path.display(), e))
        }
    };
    let summary = match read_binary_stl_summary(&bytes) {
        Ok(s) => s,
        Err(e) => return OracleVerdict::fail("stl_file", e.to_string()),
    };
    if summary.triangles == 0 {
        return OracleVerdict::fail("stl_file", "no triangles".to_string());
    }

    let worst = (0..3)
        .flat_map(|i| {
            [
                (summary.bounds.min[i] - expected.min[i]).abs(),
                (summary.bounds.max[i] - expected.max[i]).abs(),
            ]
        })
        .fold(0.0f64, f64::max);
    if worst <= STL_TOLERANCE {
        OracleVerdict::pass_val(
            "stl_file",
            format!("{} triangles, bounds match", summary.triangles),
            summary.triangles as f64,
        )
    } else {
        OracleVerdict::fail_val(
            "stl_file",
            format!(
                "bounds {:?}..{:?} differ from {:?}..{:?} by {:.4}",
                summary.bounds.min, summary.bounds.max, expected.min, expected.max, worst
            ),
            worst,
        )
    }
}

/// Run every oracle that applies to `outcome`.
pub fn check_all(outcome: &RunOutcome, params: &IllusionParams) -> Vec<OracleVerdict> {
    let mut verdicts = vec![
        check_pair_count(outcome, &params.text1, &params.text2),
        check_input_order(&outcome.placements),
        check_no_overlap(&outcome.placements),
        check_centered(outcome),
    ];
    if outcome.plate.is_some() {
        verdicts.push(check_plate_extent(outcome, params.plate.padding));
    }
    if outcome.export.preview.is_ok() {
        verdicts.push(check_stl_file(
            &outcome.export.preview.path,
            &outcome.model_bounds,
        ));
    }
    verdicts
}
