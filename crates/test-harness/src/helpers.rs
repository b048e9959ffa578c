//! Helper functions: error type, test font lookup, mock glyph extents.

use std::path::PathBuf;

use geom_kernel::MockKernel;

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("pipeline error: {0}")]
    Pipeline(#[from] illusion_ops::IllusionError),

    #[error("scratch directory: {0}")]
    Scratch(#[from] std::io::Error),

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },
}

// ── Fonts ───────────────────────────────────────────────────────────────────

/// Environment variable naming a TrueType font for real-geometry tests.
pub const TEST_FONT_ENV: &str = "DUALTEXT_TEST_FONT";

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// A font usable by TruckKernel tests, if this machine has one.
pub fn test_font_path() -> Option<PathBuf> {
    if let Some(p) = std::env::var_os(TEST_FONT_ENV).map(PathBuf::from) {
        if p.is_file() {
            return Some(p);
        }
    }
    SYSTEM_FONTS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

// ── Mock glyph math ─────────────────────────────────────────────────────────

/// Layout-axis length of the MockKernel intersection of `a` and `b`.
///
/// A `w x depth` glyph footprint turned by 45° or 135° has a square bounding
/// box of side `(w + depth) / sqrt(2)`; the intersection keeps the smaller.
pub fn mock_pair_length(a: char, b: char, font_size: f64, depth: f64) -> f64 {
    let side = |ch| (MockKernel::glyph_width(ch, font_size) + depth) / 2f64.sqrt();
    side(a).min(side(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_length_uses_narrower_glyph() {
        let ab = mock_pair_length('A', 'B', 20.0, 40.0);
        let ba = mock_pair_length('B', 'A', 20.0, 40.0);
        assert_eq!(ab, ba);
        assert!((ab - 50.0 / 2f64.sqrt()).abs() < 1e-9);
    }
}
