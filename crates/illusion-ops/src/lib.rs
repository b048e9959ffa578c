pub mod export;
pub mod glyph;
pub mod layout;
pub mod pair;
pub mod params;
pub mod pipeline;
pub mod plate;
pub mod types;

pub use export::{export_assembly, write_atomically, ExportOutcome, RunContext, PREVIEW_FILE};
pub use glyph::extrude_glyph;
pub use layout::{layout_sequence, placement_offset, GAP_ADVANCE};
pub use pair::{intersect_pair, GlyphSpec};
pub use params::{IllusionParams, PlateParams};
pub use pipeline::run_illusion;
pub use plate::{build_plate, plate_geometry, PlateGeometry};
pub use types::*;
