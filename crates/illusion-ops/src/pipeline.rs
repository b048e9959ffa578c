use std::time::Instant;

use geom_kernel::Kernel;
use tracing::{info, instrument};

use crate::export::{export_assembly, RunContext};
use crate::layout::layout_sequence;
use crate::params::IllusionParams;
use crate::plate::{build_plate, plate_geometry};
use crate::types::{Assembly, IllusionError, RunOutcome};

/// Run the whole pipeline: letter pairs, layout, plate, export.
///
/// Writes `file_display.stl` and `<export_name>.<ext>` into the context's
/// working directory.
#[instrument(skip_all, fields(text1 = %params.text1, text2 = %params.text2))]
pub fn run_illusion(
    kernel: &mut dyn Kernel,
    params: &IllusionParams,
    ctx: &RunContext,
) -> Result<RunOutcome, IllusionError> {
    let started = Instant::now();
    params.validate()?;
    ctx.prepare()?;

    let sequence = layout_sequence(kernel, params)?;
    let envelope = sequence.envelope();
    let plate = match plate_geometry(&envelope, &params.plate) {
        Ok(plate) => plate,
        Err(e) => {
            sequence.release(kernel);
            return Err(e);
        }
    };

    let placements = sequence.placements.clone();
    let mut assembly = Assembly::from_sequence(sequence);
    if let Some(geometry) = &plate {
        match build_plate(kernel, geometry) {
            Ok(part) => assembly.push(part),
            Err(e) => {
                assembly.release(kernel);
                return Err(e);
            }
        }
    }

    let exported = export_assembly(
        kernel,
        assembly,
        ctx,
        params.format,
        &params.export_name,
    )?;

    let elapsed = started.elapsed();
    info!(
        solids = placements.iter().filter(|p| !p.is_gap()).count(),
        gaps = placements.iter().filter(|p| p.is_gap()).count(),
        elapsed_s = elapsed.as_secs_f64(),
        "illusion rendered"
    );

    Ok(RunOutcome {
        attempted_pairs: params.pair_count(),
        placements,
        envelope,
        plate,
        model_bounds: exported.model_bounds,
        mesh_stats: exported.mesh_stats,
        export: exported.report,
        elapsed,
    })
}
