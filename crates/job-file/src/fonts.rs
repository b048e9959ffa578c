//! Font discovery over a directory tree of families.
//!
//! ```text
//! <root>/<family>/<Prefix>-<Style>.ttf    styles are the <Style> parts
//! <root>/<family>/<name>.ttf              otherwise styles are file names
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::FontError;

/// Family offered first when the job names none.
pub const DEFAULT_FAMILY: &str = "lato";

const TTF: &str = ".ttf";

/// A font file plus the family and style labels it was chosen by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFont {
    pub path: PathBuf,
    pub family: String,
    pub style: String,
}

impl ResolvedFont {
    /// Label a font given by explicit path: family from the parent
    /// directory, style from the file stem.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, FontError> {
        let path = path.into();
        let style = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| FontError::BadPath(path.display().to_string()))?
            .to_string();
        let family = path
            .parent()
            .and_then(Path::file_name)
            .and_then(|s| s.to_str())
            .unwrap_or(style.as_str())
            .to_string();
        Ok(Self { path, family, style })
    }
}

/// How the style files of one family are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleNaming {
    /// `<prefix>-<style>.ttf`.
    Prefixed { prefix: String },
    /// Styles are the bare file names.
    Bare,
}

/// Styles available in one family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSet {
    pub naming: StyleNaming,
    /// Sorted style labels.
    pub styles: Vec<String>,
}

impl StyleSet {
    /// Group the `.ttf` file names of a family directory into styles.
    pub fn from_file_names(names: &[String]) -> Self {
        let mut ttf: Vec<&str> = names
            .iter()
            .map(String::as_str)
            .filter(|n| n.ends_with(TTF))
            .collect();
        ttf.sort_unstable();

        let prefix = ttf
            .iter()
            .find_map(|n| n.split_once('-').map(|(p, _)| p.to_string()));

        match prefix {
            Some(prefix) => {
                let lead = format!("{}-", prefix);
                let mut styles: Vec<String> = ttf
                    .iter()
                    .filter_map(|n| n.strip_prefix(&lead))
                    .filter_map(|rest| rest.strip_suffix(TTF))
                    .map(str::to_string)
                    .collect();
                styles.dedup();
                Self {
                    naming: StyleNaming::Prefixed { prefix },
                    styles,
                }
            }
            None => Self {
                naming: StyleNaming::Bare,
                styles: ttf.iter().map(|n| n.to_string()).collect(),
            },
        }
    }

    pub fn file_name(&self, style: &str) -> String {
        match &self.naming {
            StyleNaming::Prefixed { prefix } => format!("{}-{}{}", prefix, style, TTF),
            StyleNaming::Bare => style.to_string(),
        }
    }

    pub fn contains(&self, style: &str) -> bool {
        self.styles.iter().any(|s| s == style)
    }
}

/// Directory tree of font families.
#[derive(Debug, Clone)]
pub struct FontLibrary {
    root: PathBuf,
}

impl FontLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Family directories, with [`DEFAULT_FAMILY`] first when present and
    /// the rest sorted.
    pub fn families(&self) -> Result<Vec<String>, FontError> {
        let mut names: Vec<String> = list_dir(&self.root)?
            .into_iter()
            .filter(|(_, is_dir)| *is_dir)
            .map(|(name, _)| name)
            .collect();
        names.sort_unstable_by(|a, b| {
            (a != DEFAULT_FAMILY, a.as_str()).cmp(&(b != DEFAULT_FAMILY, b.as_str()))
        });
        Ok(names)
    }

    pub fn styles(&self, family: &str) -> Result<StyleSet, FontError> {
        let dir = self.root.join(family);
        if !dir.is_dir() {
            return Err(FontError::NoSuchFamily(family.to_string()));
        }
        let files: Vec<String> = list_dir(&dir)?
            .into_iter()
            .filter(|(_, is_dir)| !*is_dir)
            .map(|(name, _)| name)
            .collect();
        Ok(StyleSet::from_file_names(&files))
    }

    /// Path of `style` in `family`; with no style, the first in sort order.
    pub fn resolve(&self, family: &str, style: Option<&str>) -> Result<ResolvedFont, FontError> {
        let set = self.styles(family)?;
        let style = match style {
            Some(s) if set.contains(s) => s.to_string(),
            Some(s) => {
                return Err(FontError::NoSuchStyle {
                    family: family.to_string(),
                    style: s.to_string(),
                })
            }
            None => set
                .styles
                .first()
                .cloned()
                .ok_or_else(|| FontError::EmptyFamily(family.to_string()))?,
        };
        Ok(ResolvedFont {
            path: self.root.join(family).join(set.file_name(&style)),
            family: family.to_string(),
            style,
        })
    }
}

fn list_dir(dir: &Path) -> Result<Vec<(String, bool)>, FontError> {
    let io = |e: std::io::Error| FontError::Io {
        path: dir.display().to_string(),
        reason: e.to_string(),
    };
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io)? {
        let entry = entry.map_err(io)?;
        match entry.file_name().to_str() {
            Some(name) => out.push((name.to_string(), entry.path().is_dir())),
            None => debug!(path = %entry.path().display(), "skipping non-UTF-8 font entry"),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_entries_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let family = dir.path().join("roboto");
        std::fs::create_dir(&family).unwrap();
        std::fs::write(family.join("Roboto-Bold.ttf"), b"").unwrap();
        std::fs::write(family.join(OsStr::from_bytes(b"Roboto-\xff.ttf")), b"").unwrap();

        let lib = FontLibrary::new(dir.path());
        let font = lib.resolve("roboto", None).unwrap();
        assert_eq!(font.style, "Bold");
        assert_eq!(font.path, family.join("Roboto-Bold.ttf"));
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn prefixed_styles_strip_prefix_and_extension() {
        let set = StyleSet::from_file_names(&names(&[
            "Lato-Regular.ttf",
            "Lato-Bold.ttf",
            "OFL.txt",
        ]));
        assert_eq!(
            set.naming,
            StyleNaming::Prefixed {
                prefix: "Lato".to_string()
            }
        );
        assert_eq!(set.styles, vec!["Bold", "Regular"]);
        assert_eq!(set.file_name("Bold"), "Lato-Bold.ttf");
    }

    #[test]
    fn bare_styles_are_file_names() {
        let set = StyleSet::from_file_names(&names(&["pacifico.ttf", "README"]));
        assert_eq!(set.naming, StyleNaming::Bare);
        assert_eq!(set.styles, vec!["pacifico.ttf"]);
        assert_eq!(set.file_name("pacifico.ttf"), "pacifico.ttf");
    }

    #[test]
    fn explicit_path_is_labelled_by_directory_and_stem() {
        let font = ResolvedFont::from_path("fonts/lato/Lato-Bold.ttf").unwrap();
        assert_eq!(font.family, "lato");
        assert_eq!(font.style, "Lato-Bold");
    }
}
