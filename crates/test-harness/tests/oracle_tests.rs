use geom_kernel::Aabb;
use illusion_ops::{GapReason, Placement};
use test_harness::oracle::*;
use test_harness::Scenario;

fn solid(index: usize, y0: f64, y1: f64) -> Placement {
    Placement::Solid {
        index,
        bounds: Aabb::new([-1.0, y0, 0.0], [1.0, y1, 5.0]),
    }
}

fn gap(index: usize) -> Placement {
    Placement::Gap {
        index,
        reason: GapReason::EmptyIntersection {
            detail: "test".to_string(),
        },
    }
}

#[test]
fn no_overlap_passes_for_spaced_solids() {
    let placements = vec![solid(0, 0.0, 4.0), gap(1), solid(2, 10.0, 12.0)];
    let v = check_no_overlap(&placements);
    assert!(v.passed, "{}", v.detail);
    assert_eq!(v.value, Some(6.0));
}

#[test]
fn no_overlap_fails_for_overlapping_solids() {
    let placements = vec![solid(0, 0.0, 4.0), solid(1, 3.0, 8.0)];
    let v = check_no_overlap(&placements);
    assert!(!v.passed);
    assert_eq!(v.value, Some(-1.0));
}

#[test]
fn input_order_detects_swaps() {
    assert!(check_input_order(&[solid(0, 0.0, 1.0), gap(1)]).passed);
    let v = check_input_order(&[gap(1), solid(0, 0.0, 1.0)]);
    assert!(!v.passed);
    assert!(v.detail.contains("2 placements out of order"));
}

#[test]
fn stl_oracle_reports_missing_file() {
    let v = check_stl_file(
        std::path::Path::new("/nonexistent/file_display.stl"),
        &Aabb::new([0.0; 3], [1.0; 3]),
    );
    assert!(!v.passed);
}

#[test]
fn plate_extent_checks_padding() {
    let run = Scenario::mock("AB", "CD").run().unwrap();
    assert!(check_plate_extent(&run.outcome, run.params.plate.padding).passed);
    assert!(!check_plate_extent(&run.outcome, run.params.plate.padding + 0.5).passed);
}

#[test]
fn pair_count_uses_shorter_text() {
    let run = Scenario::mock("ABC", "DE").run().unwrap();
    assert!(check_pair_count(&run.outcome, "ABC", "DE").passed);
    assert!(!check_pair_count(&run.outcome, "ABC", "DEF").passed);
}
