//! TruckKernel scenario tests.
//!
//! These need a TrueType font: set DUALTEXT_TEST_FONT or install DejaVu.
//! Without one they return early.

use std::path::Path;

use dualtext_types::ViewAngle;
use geom_kernel::{Axis, Kernel, OutputFormat, TruckKernel, VerticalAlign};
use illusion_ops::{extrude_glyph, intersect_pair, GlyphSpec, PairResult};
use test_harness::helpers::test_font_path;
use test_harness::Scenario;

#[test]
fn test_truck_glyph_sits_on_baseline_plane() {
    let Some(font) = test_font_path() else { return };
    let mut kernel = TruckKernel::new();
    let h = kernel
        .extrude_text("H", 40.0, 20.0, &font, VerticalAlign::Bottom)
        .unwrap();
    let bb = kernel.bounding_box(&h).unwrap();

    assert!(bb.min_on(Axis::Z).abs() < 1e-6, "bottom aligned: {:?}", bb);
    assert!(bb.len(Axis::Z) > 10.0 && bb.len(Axis::Z) < 20.0);
    assert!((bb.min_on(Axis::Y) + 40.0).abs() < 1e-6);
    assert!(bb.max_on(Axis::Y).abs() < 1e-6);
}

#[test]
fn test_truck_glyph_centered_and_turned() {
    let Some(font) = test_font_path() else { return };
    let mut kernel = TruckKernel::new();
    let h = extrude_glyph(&mut kernel, 'I', &font, 20.0, 40.0, ViewAngle::First).unwrap();
    let bb = kernel.bounding_box(&h).unwrap();
    assert!(bb.mid(Axis::X).abs() < 0.5, "{:?}", bb);
    assert!(bb.mid(Axis::Y).abs() < 0.5, "{:?}", bb);
}

#[test]
fn test_truck_space_is_a_glyph_error() {
    let Some(font) = test_font_path() else { return };
    let mut kernel = TruckKernel::new();
    let glyph = GlyphSpec {
        font_path: Path::new(&font),
        font_size: 20.0,
        depth: 40.0,
    };
    let result = intersect_pair(&mut kernel, 0, ' ', 'A', &glyph).unwrap();
    assert!(matches!(result, PairResult::Gap(_)));
}

#[test]
fn test_truck_pair_intersection() {
    let Some(font) = test_font_path() else { return };
    let mut kernel = TruckKernel::new();
    let glyph = GlyphSpec {
        font_path: Path::new(&font),
        font_size: 20.0,
        depth: 40.0,
    };
    match intersect_pair(&mut kernel, 0, 'H', 'I', &glyph).unwrap() {
        PairResult::Solid(s) => {
            assert!(s.bounds.min_on(Axis::Y).abs() < 1e-6);
            assert!(s.bounds.min_on(Axis::Z).abs() < 1e-6);
            // Same cap height on both sides: the overshoot never shows up.
            let h = kernel
                .extrude_text("H", 40.0, 20.0, &font, VerticalAlign::Bottom)
                .unwrap();
            let cap = kernel.bounding_box(&h).unwrap().len(Axis::Z);
            assert!((s.bounds.len(Axis::Z) - cap).abs() < 1e-3, "{:?} vs {}", s.bounds, cap);
        }
        PairResult::Gap(reason) => panic!("unexpected gap: {}", reason),
    }
}

#[test]
fn test_truck_full_run_stl_and_step() {
    let Some(font) = test_font_path() else { return };
    for format in OutputFormat::ALL {
        let run = Scenario::truck("HI", "IH", &font)
            .configure(|p| p.format = format)
            .run()
            .unwrap();
        run.assert_oracles().unwrap();
        assert!(run.outcome.artifact_written(), "{}", run.report());
        assert!(run.artifact_path().is_file());
    }
}
