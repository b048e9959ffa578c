use std::fmt;
use std::path::PathBuf;

use dualtext_types::OutputFormat;
use illusion_ops::{IllusionParams, PlateParams};
use serde::{Deserialize, Serialize};

use crate::errors::FontError;
use crate::fonts::{FontLibrary, ResolvedFont, DEFAULT_FAMILY};

/// How the job names its font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontChoice {
    /// A `.ttf` file given directly.
    Path { path: PathBuf },
    /// A family of the font library; no style means the first one.
    Family {
        family: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<String>,
    },
}

impl Default for FontChoice {
    fn default() -> Self {
        FontChoice::Family {
            family: DEFAULT_FAMILY.to_string(),
            style: None,
        }
    }
}

/// User-facing run parameters as stored in a job file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunParams {
    pub text1: String,
    pub text2: String,
    pub font_size: f64,
    pub font: FontChoice,
    pub format: OutputFormat,
    pub spacing_fraction: f64,
    pub plate_height: f64,
    pub plate_padding: f64,
    pub fillet_fraction: f64,
    pub export_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            text1: "HAPPY".to_string(),
            text2: "2025!".to_string(),
            font_size: 20.0,
            font: FontChoice::default(),
            format: OutputFormat::Stl,
            spacing_fraction: 0.3,
            plate_height: 1.0,
            plate_padding: 2.0,
            fillet_fraction: 0.8,
            export_name: "file".to_string(),
            depth: None,
        }
    }
}

/// Non-fatal hints about inputs that give poor models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    UnequalLength { len1: usize, len2: usize },
    NotUppercase,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::UnequalLength { len1, len2 } => write!(
                f,
                "the texts have different lengths ({} and {}); extra letters will be dropped",
                len1, len2
            ),
            Advisory::NotUppercase => write!(
                f,
                "lower case and mixed-height letters give poor results"
            ),
        }
    }
}

/// True when `text` has at least one cased letter and none in lower case.
fn is_upper(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        cased |= c.is_uppercase();
    }
    cased
}

impl RunParams {
    pub fn advisories(&self) -> Vec<Advisory> {
        let mut out = Vec::new();
        let len1 = self.text1.chars().count();
        let len2 = self.text2.chars().count();
        if len1 != len2 {
            out.push(Advisory::UnequalLength { len1, len2 });
        }
        if !is_upper(&self.text1) || !is_upper(&self.text2) {
            out.push(Advisory::NotUppercase);
        }
        out
    }

    /// Locate the font file. Family choices need a library.
    pub fn resolve_font(&self, library: Option<&FontLibrary>) -> Result<ResolvedFont, FontError> {
        match (&self.font, library) {
            (FontChoice::Path { path }, _) => ResolvedFont::from_path(path.clone()),
            (FontChoice::Family { family, style }, Some(lib)) => {
                lib.resolve(family, style.as_deref())
            }
            (FontChoice::Family { family, .. }, None) => {
                Err(FontError::NoSuchFamily(family.clone()))
            }
        }
    }

    /// Pipeline parameters for `font`.
    pub fn to_illusion_params(&self, font: &ResolvedFont) -> IllusionParams {
        IllusionParams {
            text1: self.text1.clone(),
            text2: self.text2.clone(),
            font_path: font.path.clone(),
            font_size: self.font_size,
            depth: self.depth,
            spacing_fraction: self.spacing_fraction,
            plate: PlateParams {
                height: self.plate_height,
                padding: self.plate_padding,
                fillet_fraction: self.fillet_fraction,
            },
            format: self.format,
            export_name: self.export_name.clone(),
        }
    }

    /// Name offered for the downloaded artifact.
    pub fn download_name(&self, font: &ResolvedFont) -> String {
        format!(
            "TextTango_{}_{}_{}-{}.{}",
            self.text1,
            self.text2,
            font.family,
            font.style,
            self.format.extension()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_texts_flag_the_caseless_year() {
        // "2025!" has no cased letter, so the defaults carry the case warning.
        assert_eq!(RunParams::default().advisories(), vec![Advisory::NotUppercase]);

        let p = RunParams {
            text1: "HAPPY".to_string(),
            text2: "NEW A".to_string(),
            ..RunParams::default()
        };
        assert!(p.advisories().is_empty());
    }

    #[test]
    fn unequal_and_lowercase_texts_are_flagged() {
        let p = RunParams {
            text1: "Happy".to_string(),
            text2: "NEW".to_string(),
            ..RunParams::default()
        };
        assert_eq!(
            p.advisories(),
            vec![
                Advisory::UnequalLength { len1: 5, len2: 3 },
                Advisory::NotUppercase
            ]
        );
    }

    #[test]
    fn digits_alone_are_not_uppercase() {
        assert!(!is_upper("2025"));
        assert!(is_upper("2025!A"));
    }

    #[test]
    fn download_name_includes_font_labels() {
        let p = RunParams {
            format: OutputFormat::Step,
            ..RunParams::default()
        };
        let font = ResolvedFont {
            path: PathBuf::from("fonts/lato/Lato-Bold.ttf"),
            family: "lato".to_string(),
            style: "Bold".to_string(),
        };
        assert_eq!(p.download_name(&font), "TextTango_HAPPY_2025!_lato-Bold.step");
    }

    #[test]
    fn illusion_params_carry_plate_values() {
        let p = RunParams {
            plate_height: 0.5,
            depth: Some(12.0),
            ..RunParams::default()
        };
        let font = ResolvedFont::from_path("f/x.ttf").unwrap();
        let ip = p.to_illusion_params(&font);
        assert_eq!(ip.plate.height, 0.5);
        assert_eq!(ip.depth(), 12.0);
        assert_eq!(ip.font_path, PathBuf::from("f/x.ttf"));
        assert!(ip.validate().is_ok());
    }

    #[test]
    fn family_without_library_cannot_resolve() {
        let err = RunParams::default().resolve_font(None).unwrap_err();
        assert!(matches!(err, FontError::NoSuchFamily(_)));
    }
}
