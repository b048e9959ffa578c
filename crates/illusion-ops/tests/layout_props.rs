use geom_kernel::{Axis, MockKernel};
use illusion_ops::{layout_sequence, IllusionParams, Placement};
use proptest::prelude::*;

fn run(text1: &str, text2: &str, spacing_fraction: f64, empty: &[(char, char)]) -> Vec<Placement> {
    let mut kernel = empty
        .iter()
        .fold(MockKernel::new(), |k, &(a, b)| k.with_empty_intersection(a, b));
    let mut params = IllusionParams::new(text1, text2, "mock.ttf");
    params.spacing_fraction = spacing_fraction;
    layout_sequence(&mut kernel, &params).unwrap().placements
}

proptest! {
    #[test]
    fn one_placement_per_pair_in_order(
        t1 in "[A-Z ]{0,8}",
        t2 in "[A-Z0-9]{0,8}",
        spacing in 0.0f64..2.0,
    ) {
        let placements = run(&t1, &t2, spacing, &[]);
        let expected = t1.chars().count().min(t2.chars().count());
        prop_assert_eq!(placements.len(), expected);
        for (i, p) in placements.iter().enumerate() {
            prop_assert_eq!(p.index(), i);
        }
    }

    #[test]
    fn solids_never_overlap_on_the_layout_axis(
        t1 in "[A-Z]{1,8}",
        t2 in "[A-Z]{1,8}",
        spacing in 0.0f64..2.0,
        a in proptest::char::range('A', 'Z'),
        b in proptest::char::range('A', 'Z'),
    ) {
        let placements = run(&t1, &t2, spacing, &[(a, b)]);
        let bounds: Vec<_> = placements.iter().filter_map(Placement::bounds).collect();
        for w in bounds.windows(2) {
            prop_assert!(w[0].max_on(Axis::Y) <= w[1].min_on(Axis::Y) + 1e-9);
        }
    }

    #[test]
    fn layout_is_deterministic(t1 in "[A-Z]{1,6}", t2 in "[A-Z]{1,6}") {
        prop_assert_eq!(run(&t1, &t2, 0.3, &[]), run(&t1, &t2, 0.3, &[]));
    }
}
