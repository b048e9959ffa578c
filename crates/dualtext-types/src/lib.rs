pub mod bbox;
pub mod format;
pub mod view;

pub use bbox::*;
pub use format::*;
pub use view::*;
