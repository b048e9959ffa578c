use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use geom_kernel::{Aabb, Kernel, KernelError, MeshStats, SolidHandle};
use serde::Serialize;

use crate::plate::PlateGeometry;

/// Which text of the pair a character came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PairSide {
    First,
    Second,
}

/// Why a letter pair contributed no solid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum GapReason {
    /// One of the two characters has no outline in the font.
    MissingGlyph { side: PairSide, ch: char, detail: String },
    /// Both glyphs rendered but share no volume at the viewing angles.
    EmptyIntersection { detail: String },
}

impl fmt::Display for GapReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GapReason::MissingGlyph { side, ch, detail } => {
                let which = match side {
                    PairSide::First => "first",
                    PairSide::Second => "second",
                };
                write!(f, "no glyph for {:?} in the {} text ({})", ch, which, detail)
            }
            GapReason::EmptyIntersection { detail } => {
                write!(f, "intersection is empty ({})", detail)
            }
        }
    }
}

/// Intersection solid of one letter pair.
#[derive(Debug)]
pub struct PairSolid {
    /// Position of the pair in the input texts.
    pub index: usize,
    pub handle: SolidHandle,
    /// Bounds of `handle`, kept in sync as the solid moves.
    pub bounds: Aabb,
}

/// Per-pair outcome of the intersector.
#[derive(Debug)]
pub enum PairResult {
    Solid(PairSolid),
    Gap(GapReason),
}

/// One processed pair in layout order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Placement {
    Solid { index: usize, bounds: Aabb },
    Gap { index: usize, reason: GapReason },
}

impl Placement {
    pub fn index(&self) -> usize {
        match self {
            Placement::Solid { index, .. } | Placement::Gap { index, .. } => *index,
        }
    }

    pub fn bounds(&self) -> Option<&Aabb> {
        match self {
            Placement::Solid { bounds, .. } => Some(bounds),
            Placement::Gap { .. } => None,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, Placement::Gap { .. })
    }
}

/// Letter pairs placed along the layout axis.
///
/// `placements` records every processed pair; `solids` owns the kernel
/// handles of the pairs that produced geometry, in the same order.
#[derive(Debug, Default)]
pub struct PositionedSequence {
    pub placements: Vec<Placement>,
    pub solids: Vec<SolidHandle>,
    /// Layout-axis coordinate the next pair is placed after.
    pub running_max: f64,
}

impl PositionedSequence {
    pub fn push_solid(&mut self, solid: PairSolid) {
        self.placements.push(Placement::Solid {
            index: solid.index,
            bounds: solid.bounds,
        });
        self.solids.push(solid.handle);
    }

    pub fn push_gap(&mut self, index: usize, reason: GapReason) {
        self.placements.push(Placement::Gap { index, reason });
    }

    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    /// Hand every placed solid back to the kernel.
    pub fn release(self, kernel: &mut dyn Kernel) {
        for handle in self.solids {
            kernel.release(handle);
        }
    }

    /// Union of all placed solids' bounds; empty when nothing was placed.
    pub fn envelope(&self) -> Aabb {
        self.placements
            .iter()
            .filter_map(Placement::bounds)
            .fold(Aabb::empty(), |acc, b| acc.union(b))
    }
}

/// Role of a part in the final assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum PartRole {
    Letter { index: usize },
    Plate,
}

/// Solid ready to be flattened into the final model.
#[derive(Debug)]
pub struct Part {
    pub role: PartRole,
    pub handle: SolidHandle,
}

/// Everything that goes into the exported model.
#[derive(Debug, Default)]
pub struct Assembly {
    pub parts: Vec<Part>,
}

impl Assembly {
    pub fn from_sequence(sequence: PositionedSequence) -> Self {
        let indices = sequence.placements.iter().filter_map(|p| match p {
            Placement::Solid { index, .. } => Some(*index),
            Placement::Gap { .. } => None,
        });
        let parts = indices
            .zip(sequence.solids)
            .map(|(index, handle)| Part {
                role: PartRole::Letter { index },
                handle,
            })
            .collect();
        Self { parts }
    }

    pub fn push(&mut self, part: Part) {
        self.parts.push(part);
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn release(self, kernel: &mut dyn Kernel) {
        for part in self.parts {
            kernel.release(part.handle);
        }
    }
}

/// Outcome of writing one export target.
#[derive(Debug)]
pub struct TargetReport {
    pub path: PathBuf,
    /// Bytes written, or why the target could not be produced.
    pub result: Result<u64, ExportError>,
}

impl TargetReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Both export attempts of a run. Each target succeeds or fails on its own.
#[derive(Debug)]
pub struct ExportReport {
    pub preview: TargetReport,
    pub artifact: TargetReport,
}

/// Summary of a completed run. Holds no kernel handles.
#[derive(Debug)]
pub struct RunOutcome {
    /// Number of letter pairs attempted (the shorter text's length).
    pub attempted_pairs: usize,
    pub placements: Vec<Placement>,
    /// Bounds of the placed letter solids before recentering.
    pub envelope: Aabb,
    pub plate: Option<PlateGeometry>,
    /// Bounds of the exported model after recentering.
    pub model_bounds: Aabb,
    /// Size of the exported mesh; `None` when the model could not be meshed.
    pub mesh_stats: Option<MeshStats>,
    pub export: ExportReport,
    pub elapsed: Duration,
}

impl RunOutcome {
    pub fn solid_count(&self) -> usize {
        self.placements.iter().filter(|p| !p.is_gap()).count()
    }

    pub fn gap_count(&self) -> usize {
        self.placements.iter().filter(|p| p.is_gap()).count()
    }

    /// True when the user-facing artifact was written.
    pub fn artifact_written(&self) -> bool {
        self.export.artifact.is_ok()
    }
}

/// Errors from writing an export target.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal errors of an illusion run.
#[derive(Debug, thiserror::Error)]
pub enum IllusionError {
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("no letter pair produced geometry")]
    EmptySequence,

    #[error("plate fillet radius {radius:.3} exceeds the feasible maximum {max:.3}")]
    FilletInfeasible { radius: f64, max: f64 },

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("working directory {path}: {source}")]
    WorkDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
