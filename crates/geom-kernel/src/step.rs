//! STEP export of truck solids.

use truck_modeling::Solid;
use truck_stepio::out::{CompleteStepDisplay, StepHeaderDescriptor, StepModel};

use crate::types::{KernelError, OutputFormat};

/// Serialize a solid to a STEP AP203 string.
pub fn export_step(solid: &Solid, file_name: &str) -> Result<String, KernelError> {
    if solid.boundaries().is_empty() {
        return Err(KernelError::ExportFailed {
            format: OutputFormat::Step,
            reason: "solid has no shells".to_string(),
        });
    }
    let compressed = solid.compress();
    let display = CompleteStepDisplay::new(
        StepModel::from(&compressed),
        StepHeaderDescriptor {
            file_name: file_name.to_string(),
            organization_system: "dualtext".to_string(),
            ..Default::default()
        },
    );
    Ok(display.to_string())
}
