//! MockKernel scenario tests.

use approx::assert_relative_eq;
use geom_kernel::{Axis, MockKernel, OutputFormat};
use illusion_ops::{GapReason, IllusionError, Placement};
use test_harness::helpers::mock_pair_length;
use test_harness::{HarnessError, Scenario};

#[test]
fn test_ab_cd_two_solids_and_plate() {
    let run = Scenario::mock("AB", "CD").run().unwrap();
    run.assert_oracles().unwrap();

    assert_eq!(run.outcome.attempted_pairs, 2);
    assert_eq!(run.outcome.solid_count(), 2);
    assert_eq!(run.part_count(), 3);

    let p = &run.params;
    let letters = mock_pair_length('A', 'C', p.font_size, p.depth())
        + mock_pair_length('B', 'D', p.font_size, p.depth());
    let expected = letters + p.spacing() + 2.0 * p.plate.padding;
    assert_relative_eq!(run.outcome.model_bounds.len(Axis::Y), expected, epsilon = 1e-9);
    assert!(run.artifact_path().ends_with("file.stl"));
    assert!(run.artifact_path().is_file());
}

#[test]
fn test_single_letter_against_empty_text_is_empty_sequence() {
    let err = Scenario::mock("A", "").run().err().unwrap();
    assert!(matches!(
        err,
        HarnessError::Pipeline(IllusionError::EmptySequence)
    ));
}

#[test]
fn test_empty_intersection_leaves_gap_and_continues() {
    let kernel = MockKernel::new().with_empty_intersection('A', 'X');
    let run = Scenario::mock_with(kernel, "ABC", "XYZ").run().unwrap();
    run.assert_oracles().unwrap();

    let placements = &run.outcome.placements;
    assert!(matches!(
        placements[0],
        Placement::Gap {
            index: 0,
            reason: GapReason::EmptyIntersection { .. }
        }
    ));
    assert!(!placements[1].is_gap());
    assert!(!placements[2].is_gap());
    assert_eq!(run.outcome.gap_count(), 1);
}

#[test]
fn test_missing_glyph_leaves_gap() {
    let run = Scenario::mock("A C", "XYZ").run().unwrap();
    run.assert_oracles().unwrap();
    assert!(matches!(
        &run.outcome.placements[1],
        Placement::Gap {
            reason: GapReason::MissingGlyph { ch: ' ', .. },
            ..
        }
    ));
}

#[test]
fn test_truncation_to_shorter_text() {
    let run = Scenario::mock("HAPPY", "NEW").run().unwrap();
    run.assert_oracles().unwrap();
    assert_eq!(run.outcome.placements.len(), 3);
    assert_eq!(run.outcome.attempted_pairs, 3);
}

#[test]
fn test_defaults_render_happy_2025() {
    let run = Scenario::mock("HAPPY", "2025!").run().unwrap();
    run.assert_oracles().unwrap();
    assert_eq!(run.outcome.solid_count(), 5);
    assert_eq!(run.verdict("pair_count").unwrap().value, Some(5.0));
}

#[test]
fn test_idempotent_on_deterministic_kernel() {
    let a = Scenario::mock("DUAL", "TEXT").run().unwrap();
    let b = Scenario::mock("DUAL", "TEXT").run().unwrap();
    assert_eq!(a.outcome.model_bounds, b.outcome.model_bounds);
    assert_eq!(a.outcome.mesh_stats, b.outcome.mesh_stats);
    assert_eq!(a.outcome.placements, b.outcome.placements);
}

#[test]
fn test_export_failure_is_reported_not_fatal() {
    let kernel = MockKernel::new().failing_export(OutputFormat::Step);
    let run = Scenario::mock_with(kernel, "AB", "CD")
        .configure(|p| p.format = OutputFormat::Step)
        .run()
        .unwrap();

    assert!(run.outcome.export.preview.is_ok());
    assert!(!run.outcome.artifact_written());
    assert!(!run.artifact_path().exists());
    assert!(run.verdict("stl_file").unwrap().passed);
}

#[test]
fn test_boolean_engine_failure_is_fatal() {
    let kernel = MockKernel::new().with_broken_glyph('B');
    let err = Scenario::mock_with(kernel, "AB", "CD").run().err().unwrap();
    assert!(matches!(
        err,
        HarnessError::Pipeline(IllusionError::Kernel(_))
    ));
}

#[test]
fn test_no_plate_when_height_is_zero() {
    let run = Scenario::mock("AB", "CD")
        .configure(|p| p.plate.height = 0.0)
        .run()
        .unwrap();
    run.assert_oracles().unwrap();
    assert_eq!(run.part_count(), 2);
    assert!(run.verdict("plate_extent").is_none());
}
