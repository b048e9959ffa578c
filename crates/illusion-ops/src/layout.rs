use geom_kernel::{Axis, Kernel};
use tracing::{info, instrument, warn};

use crate::pair::{intersect_pair, GlyphSpec};
use crate::params::IllusionParams;
use crate::types::{IllusionError, PairResult, PositionedSequence};

/// Advance of the running extent for a pair that produced no solid.
pub const GAP_ADVANCE: f64 = 1.5;

/// Layout-axis offset for the pair at `index`, whose solid starts at 0.
/// The first pair stays where it is; later ones go one spacing past the
/// running extent.
pub fn placement_offset(index: usize, running_max: f64, spacing: f64) -> f64 {
    if index == 0 {
        0.0
    } else {
        running_max + spacing
    }
}

/// Intersect the character pairs of both texts and stack the results
/// along the layout axis.
///
/// The texts are zipped, so the longer one is truncated. Every pair yields
/// exactly one placement, in input order.
#[instrument(skip_all, fields(pairs = params.pair_count()))]
pub fn layout_sequence(
    kernel: &mut dyn Kernel,
    params: &IllusionParams,
) -> Result<PositionedSequence, IllusionError> {
    let spacing = params.spacing();
    let glyph = GlyphSpec {
        font_path: &params.font_path,
        font_size: params.font_size,
        depth: params.depth(),
    };

    // A failed pair hands back the partial sequence so its solids can be
    // released before the error propagates.
    let folded = params
        .text1
        .chars()
        .zip(params.text2.chars())
        .enumerate()
        .try_fold(
            (PositionedSequence::default(), 0.0),
            |(mut seq, running_max),
             (index, (first, second))|
             -> Result<_, (PositionedSequence, IllusionError)> {
                let pair = match intersect_pair(kernel, index, first, second, &glyph) {
                    Ok(pair) => pair,
                    Err(e) => return Err((seq, e)),
                };
                match pair {
                    PairResult::Solid(mut solid) => {
                        let dy = placement_offset(index, running_max, spacing);
                        if dy != 0.0 {
                            let offset = Axis::LAYOUT.offset(dy);
                            solid.handle = match kernel.translate(solid.handle, offset) {
                                Ok(handle) => handle,
                                Err(e) => return Err((seq, e.into())),
                            };
                            solid.bounds = solid.bounds.translated(offset);
                        }
                        let next = solid.bounds.max_on(Axis::LAYOUT);
                        info!(
                            index,
                            %first,
                            %second,
                            y_min = solid.bounds.min_on(Axis::LAYOUT),
                            y_max = next,
                            "pair placed"
                        );
                        seq.push_solid(solid);
                        Ok((seq, next))
                    }
                    PairResult::Gap(reason) => {
                        warn!(index, %first, %second, %reason, "pair skipped");
                        seq.push_gap(index, reason);
                        Ok((seq, running_max + GAP_ADVANCE * spacing))
                    }
                }
            },
        );

    let (mut sequence, running_max) = match folded {
        Ok(done) => done,
        Err((partial, e)) => {
            partial.release(kernel);
            return Err(e);
        }
    };

    sequence.running_max = running_max;
    Ok(sequence)
}
