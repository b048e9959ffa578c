use std::path::PathBuf;

use geom_kernel::OutputFormat;
use serde::{Deserialize, Serialize};

use crate::types::IllusionError;

/// Base plate dimensions, relative to the letter envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateParams {
    /// Plate thickness. Zero omits the plate.
    pub height: f64,
    /// Margin added around the envelope on both horizontal axes.
    pub padding: f64,
    /// Corner radius as a fraction of half the envelope's X extent.
    pub fillet_fraction: f64,
}

impl Default for PlateParams {
    fn default() -> Self {
        Self {
            height: 1.0,
            padding: 2.0,
            fillet_fraction: 0.8,
        }
    }
}

/// Resolved parameters of one illusion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IllusionParams {
    pub text1: String,
    pub text2: String,
    pub font_path: PathBuf,
    pub font_size: f64,
    /// Extrusion depth; `None` means twice the font size.
    pub depth: Option<f64>,
    /// Gap between consecutive letters, as a fraction of the font size.
    pub spacing_fraction: f64,
    pub plate: PlateParams,
    pub format: OutputFormat,
    /// File stem of the user artifact.
    pub export_name: String,
}

impl IllusionParams {
    pub fn new(text1: impl Into<String>, text2: impl Into<String>, font_path: impl Into<PathBuf>) -> Self {
        Self {
            text1: text1.into(),
            text2: text2.into(),
            font_path: font_path.into(),
            font_size: 20.0,
            depth: None,
            spacing_fraction: 0.3,
            plate: PlateParams::default(),
            format: OutputFormat::Stl,
            export_name: "file".to_string(),
        }
    }

    pub fn depth(&self) -> f64 {
        self.depth.unwrap_or(2.0 * self.font_size)
    }

    /// Letter spacing in model units.
    pub fn spacing(&self) -> f64 {
        self.spacing_fraction * self.font_size
    }

    /// Number of letter pairs a run will attempt.
    pub fn pair_count(&self) -> usize {
        self.text1.chars().count().min(self.text2.chars().count())
    }

    /// Check every numeric range before any geometry is built.
    pub fn validate(&self) -> Result<(), IllusionError> {
        let size = self.font_size;
        if !(size.is_finite() && size > 0.0) {
            return Err(invalid(format!("font size must be positive, got {}", size)));
        }
        if let Some(depth) = self.depth {
            if !(depth.is_finite() && depth > 0.0) {
                return Err(invalid(format!("extrusion depth must be positive, got {}", depth)));
            }
        }
        check_range("spacing fraction", self.spacing_fraction, 0.0, 2.0)?;
        check_range("plate height", self.plate.height, 0.0, size / 2.0)?;
        check_range("plate padding", self.plate.padding, 0.0, size / 2.0)?;
        check_range("fillet fraction", self.plate.fillet_fraction, 0.0, 1.0)?;

        let name = self.export_name.trim();
        if name.is_empty() {
            return Err(invalid("export name is empty".to_string()));
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(invalid(format!("export name {:?} is not a plain file name", name)));
        }
        Ok(())
    }
}

fn invalid(reason: String) -> IllusionError {
    IllusionError::InvalidParameter { reason }
}

fn check_range(what: &str, value: f64, lo: f64, hi: f64) -> Result<(), IllusionError> {
    if value.is_finite() && value >= lo && value <= hi {
        Ok(())
    } else {
        Err(invalid(format!("{} must be in [{}, {}], got {}", what, lo, hi, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> IllusionParams {
        IllusionParams::new("HAPPY", "2025!", "font.ttf")
    }

    #[test]
    fn defaults_are_valid() {
        let p = params();
        assert!(p.validate().is_ok());
        assert_eq!(p.depth(), 40.0);
        assert!((p.spacing() - 6.0).abs() < 1e-12);
        assert_eq!(p.pair_count(), 5);
    }

    #[test]
    fn plate_limits_scale_with_font_size() {
        let mut p = params();
        p.plate.height = 10.0;
        assert!(p.validate().is_ok());
        p.plate.height = 10.5;
        assert!(matches!(p.validate(), Err(IllusionError::InvalidParameter { .. })));
    }

    #[test]
    fn rejects_bad_numbers() {
        let mut p = params();
        p.font_size = 0.0;
        assert!(p.validate().is_err());

        let mut p = params();
        p.spacing_fraction = f64::NAN;
        assert!(p.validate().is_err());

        let mut p = params();
        p.plate.fillet_fraction = 1.2;
        assert!(p.validate().is_err());

        let mut p = params();
        p.depth = Some(-1.0);
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_path_like_export_names() {
        for name in ["", "  ", "a/b", "..", "dir\\file"] {
            let mut p = params();
            p.export_name = name.to_string();
            assert!(p.validate().is_err(), "{:?}", name);
        }
    }

    #[test]
    fn pair_count_counts_chars_not_bytes() {
        let p = IllusionParams::new("ÄÖÜ", "AB", "font.ttf");
        assert_eq!(p.pair_count(), 2);
    }
}
