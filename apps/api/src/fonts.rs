//! Font discovery and registration.
//!
//! Runs once at startup and produces an immutable `FontSet` that every request
//! shares read-only. Registration failures are never fatal: each failing
//! candidate is logged and skipped, and the set falls back to a generic `Sans`
//! family (any system font) or, failing that, to static metrics with no glyphs.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont};
use thiserror::Error;
use tracing::{info, warn};

use crate::layout::font_metrics::{FontDescriptor, TextMeasurer, SANS_METRICS};

pub const APP_FAMILY: &str = "AppFont";
pub const GENERIC_FAMILY: &str = "Sans";

const FONTCONFIG_DIRS: &[&str] = &["/opt/homebrew/etc/fonts", "/usr/local/etc/fonts", "/etc/fonts"];

const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/Library/Fonts/Arial Unicode.ttf",
    "/Library/Fonts/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
];

const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/System/Library/Fonts",
    "/Library/Fonts",
];

/// How deep the generic fallback scan descends below each system font dir.
const FALLBACK_SCAN_DEPTH: usize = 4;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("font file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read font {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid font data in {0}")]
    Invalid(PathBuf),
}

// ────────────────────────────────────────────────────────────────────────────
// Font set
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub enum Typeface {
    Outline {
        regular: FontArc,
        /// Dedicated bold face; bold runs are synthesized from `regular` without one.
        bold: Option<FontArc>,
    },
    /// No usable font file: widths come from a static table and nothing is drawn.
    MetricsOnly,
}

/// The registered font family plus what discovery found along the way.
#[derive(Clone)]
pub struct FontSet {
    family: String,
    source: Option<PathBuf>,
    fontconfig_dir: Option<PathBuf>,
    typeface: Typeface,
}

impl std::fmt::Debug for FontSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSet")
            .field("family", &self.family)
            .field("source", &self.source)
            .field("fontconfig_dir", &self.fontconfig_dir)
            .field("has_outlines", &self.has_outlines())
            .field("has_bold_face", &self.has_bold_face())
            .finish()
    }
}

impl FontSet {
    /// Discovers fonts using the app font dir plus the well-known system locations.
    pub fn discover(fonts_dir: &Path) -> Self {
        let mut candidates = vec![
            fonts_dir.join("NotoSans-Regular.ttf"),
            fonts_dir.join("DejaVuSans.ttf"),
        ];
        candidates.extend(SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from));

        let fallback_dirs: Vec<PathBuf> = SYSTEM_FONT_DIRS.iter().map(PathBuf::from).collect();
        let fontconfig_dirs: Vec<PathBuf> = FONTCONFIG_DIRS.iter().map(PathBuf::from).collect();

        Self::discover_from(&candidates, &fallback_dirs, &fontconfig_dirs)
    }

    /// Tries `candidates` in order, then scans `fallback_dirs` for any font.
    pub fn discover_from(
        candidates: &[PathBuf],
        fallback_dirs: &[PathBuf],
        fontconfig_dirs: &[PathBuf],
    ) -> Self {
        let fontconfig_dir = fontconfig_dirs.iter().find(|d| d.is_dir()).cloned();
        if let Some(dir) = &fontconfig_dir {
            info!(path = %dir.display(), "Found fontconfig directory");
        }

        for path in candidates {
            match load_face(path) {
                Ok(regular) => {
                    let bold = load_bold_sibling(path);
                    info!(
                        path = %path.display(),
                        bold_face = bold.is_some(),
                        "Registered font family {APP_FAMILY}"
                    );
                    return Self {
                        family: APP_FAMILY.to_string(),
                        source: Some(path.clone()),
                        fontconfig_dir,
                        typeface: Typeface::Outline { regular, bold },
                    };
                }
                Err(FontError::NotFound(_)) => {}
                Err(e) => warn!("Font registration failed: {e}"),
            }
        }

        if let Some((path, regular)) = scan_for_any_font(fallback_dirs) {
            warn!(
                path = %path.display(),
                "No preferred font registered; using generic {GENERIC_FAMILY} fallback"
            );
            return Self {
                family: GENERIC_FAMILY.to_string(),
                source: Some(path),
                fontconfig_dir,
                typeface: Typeface::Outline {
                    regular,
                    bold: None,
                },
            };
        }

        warn!("No font files found; text will be measured but not drawn");
        Self::metrics_only(fontconfig_dir)
    }

    pub fn metrics_only(fontconfig_dir: Option<PathBuf>) -> Self {
        Self {
            family: GENERIC_FAMILY.to_string(),
            source: None,
            fontconfig_dir,
            typeface: Typeface::MetricsOnly,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn fontconfig_dir(&self) -> Option<&Path> {
        self.fontconfig_dir.as_deref()
    }

    pub fn has_outlines(&self) -> bool {
        matches!(self.typeface, Typeface::Outline { .. })
    }

    pub fn has_bold_face(&self) -> bool {
        matches!(self.typeface, Typeface::Outline { bold: Some(_), .. })
    }

    /// Face and synthetic-bold offset to use for `font`.
    ///
    /// The offset is non-zero only for bold runs without a dedicated bold face.
    pub fn face_for(&self, font: &FontDescriptor) -> Option<(&FontArc, f32)> {
        match &self.typeface {
            Typeface::Outline { regular, bold } => match (font.is_bold(), bold) {
                (true, Some(bold)) => Some((bold, 0.0)),
                (true, None) => Some((regular, embolden_offset(font.size))),
                (false, _) => Some((regular, 0.0)),
            },
            Typeface::MetricsOnly => None,
        }
    }
}

impl TextMeasurer for FontSet {
    fn measure(&self, text: &str, font: &FontDescriptor) -> f32 {
        match self.face_for(font) {
            Some((face, offset)) => {
                let width = advance_width(face, text, font.size as f32);
                if text.is_empty() {
                    width
                } else {
                    width + offset
                }
            }
            None => SANS_METRICS.measure(text, font),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Glyph metrics helpers
// ────────────────────────────────────────────────────────────────────────────

/// Scale at which one em of `face` is `size_px` pixels tall.
///
/// ab_glyph scales by ascent-to-descent height, CSS font sizes are in ems.
pub fn px_scale(face: &FontArc, size_px: f32) -> PxScale {
    match face.units_per_em() {
        Some(upem) if upem > 0.0 => PxScale::from(size_px * face.height_unscaled() / upem),
        _ => PxScale::from(size_px),
    }
}

/// Horizontal advance of `text` including pair kerning.
pub fn advance_width(face: &FontArc, text: &str, size_px: f32) -> f32 {
    let scaled = face.as_scaled(px_scale(face, size_px));
    let mut width = 0.0;
    let mut prev: Option<GlyphId> = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }
    width
}

pub fn embolden_offset(size_px: u32) -> f32 {
    (size_px as f32 / 28.0).max(1.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Loading
// ────────────────────────────────────────────────────────────────────────────

fn load_face(path: &Path) -> Result<FontArc, FontError> {
    if !path.is_file() {
        return Err(FontError::NotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|source| FontError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    FontArc::try_from_vec(bytes).map_err(|_| FontError::Invalid(path.to_path_buf()))
}

fn load_bold_sibling(regular: &Path) -> Option<FontArc> {
    bold_sibling_candidates(regular)
        .into_iter()
        .find_map(|path| match load_face(&path) {
            Ok(face) => Some(face),
            Err(FontError::NotFound(_)) => None,
            Err(e) => {
                warn!("Bold face registration failed: {e}");
                None
            }
        })
}

/// Conventional file names of the bold companion of a regular face.
pub fn bold_sibling_candidates(regular: &Path) -> Vec<PathBuf> {
    let (Some(stem), Some(parent)) = (
        regular.file_stem().and_then(|s| s.to_str()),
        regular.parent(),
    ) else {
        return Vec::new();
    };
    let ext = regular
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("ttf");

    let mut names = Vec::new();
    if let Some(base) = stem.strip_suffix("-Regular") {
        names.push(format!("{base}-Bold.{ext}"));
    } else {
        names.push(format!("{stem}-Bold.{ext}"));
        names.push(format!("{stem} Bold.{ext}"));
    }
    names.into_iter().map(|n| parent.join(n)).collect()
}

fn scan_for_any_font(dirs: &[PathBuf]) -> Option<(PathBuf, FontArc)> {
    dirs.iter()
        .find_map(|dir| scan_dir(dir, FALLBACK_SCAN_DEPTH))
}

fn scan_dir(dir: &Path, depth: usize) -> Option<(PathBuf, FontArc)> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    // Directory iteration order is unspecified; sort so startup is reproducible.
    entries.sort();

    for path in &entries {
        if path.is_file() && is_font_file(path) {
            if let Ok(face) = load_face(path) {
                return Some((path.clone(), face));
            }
        }
    }
    if depth == 0 {
        return None;
    }
    entries
        .iter()
        .filter(|p| p.is_dir())
        .find_map(|p| scan_dir(p, depth - 1))
}

fn is_font_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("ttf") | Some("otf")
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

/// DejaVu Sans shipped in the workspace `fonts/` directory.
#[cfg(test)]
pub(crate) fn bundled_regular_face() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fonts/DejaVuSans.ttf")
}

#[cfg(test)]
impl FontSet {
    /// The bundled regular + bold faces, independent of what the host has installed.
    pub(crate) fn bundled() -> Self {
        Self::discover_from(&[bundled_regular_face()], &[], &[])
    }
}
