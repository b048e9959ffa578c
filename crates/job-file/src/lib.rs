pub mod errors;
pub mod fonts;
pub mod load;
pub mod params;
pub mod save;

pub use errors::{FontError, LoadError};
pub use fonts::{FontLibrary, ResolvedFont, StyleNaming, StyleSet, DEFAULT_FAMILY};
pub use load::{load_job, load_job_file};
pub use params::{Advisory, FontChoice, RunParams};
pub use save::{save_job, FORMAT_VERSION, JOB_FORMAT};
