//! Typeface resolution.
//!
//! Body text (page numbers, TOC numbers, form labels) always uses the standard
//! Helvetica faces, which every PDF viewer provides. Headings prefer a serif face
//! loaded from a TrueType file and embedded into the document. Resolution is a
//! two-step affair: try the configured font and the well-known EB Garamond install
//! locations, and if none of them loads, substitute Helvetica and report that the
//! fallback was used. A missing font never fails generation.

use super::metrics::{self, FIRST_CHAR, HELVETICA_WIDTHS, LAST_CHAR};
use crate::units::Pt;
use anyhow::{anyhow, Context, Result};
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use std::path::{Path, PathBuf};

/// Where EB Garamond usually lives on Windows, macOS and Linux.
const SERIF_FONT_LOCATIONS: &[&str] = &[
    "C:\\Windows\\Fonts\\EBGaramond-Regular.ttf",
    "/Library/Fonts/EBGaramond-Regular.ttf",
    "/System/Library/Fonts/Supplemental/EBGaramond-Regular.ttf",
    "~/Library/Fonts/EBGaramond-Regular.ttf",
    "~/Library/Fonts/EBGaramond-VariableFont_wght.ttf",
    "~/.local/share/fonts/EBGaramond-Regular.ttf",
    "/usr/share/fonts/truetype/eb-garamond/EBGaramond-Regular.ttf",
    "/usr/share/fonts/truetype/ebgaramond/EBGaramond-Regular.ttf",
];

/// The three faces a notebook uses.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Face {
    Sans,
    SansOblique,
    Serif,
}

impl Face {
    /// Name of the face in each page's font resources.
    pub fn resource_name(&self) -> &'static [u8] {
        match self {
            Face::Sans => b"F1",
            Face::SansOblique => b"F2",
            Face::Serif => b"F3",
        }
    }

    pub fn all() -> &'static [Face] {
        &[Face::Sans, Face::SansOblique, Face::Serif]
    }
}

/// A TrueType font read from disk, with the metrics needed to embed it.
#[derive(Clone, Debug)]
pub struct EmbeddedFont {
    /// PostScript-safe name used as the font's `/BaseFont`
    pub base_font: String,
    pub data: Vec<u8>,
    /// Advance widths for codes 32..=126, in thousandths of an em
    pub widths: Vec<f32>,
    pub ascent: f32,
    pub descent: f32,
    pub cap_height: f32,
    pub bbox: [f32; 4],
}

impl EmbeddedFont {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<EmbeddedFont> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read font file: {}", path.display()))?;
        let face = OwnedFace::from_vec(data.clone(), 0)
            .map_err(|e| anyhow!("Failed to parse font file {}: {e}", path.display()))?;
        let face = face.as_face_ref();
        // only glyf outlines can be embedded as /FontFile2
        if face.tables().glyf.is_none() {
            return Err(anyhow!(
                "{} has no TrueType outlines (CFF and bitmap fonts can't be embedded)",
                path.display()
            ));
        }

        let units_per_em = face.units_per_em() as f32;
        let scale = |v: f32| v * 1000.0 / units_per_em;

        let widths = (FIRST_CHAR..=LAST_CHAR)
            .map(|code| {
                face.glyph_index(code as char)
                    .and_then(|gid| face.glyph_hor_advance(gid))
                    .map(|advance| scale(advance as f32))
                    .unwrap_or(0.0)
            })
            .collect();

        let bbox = face.global_bounding_box();
        let base_font = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "EmbeddedSerif".to_string())
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect::<String>();

        Ok(EmbeddedFont {
            base_font,
            widths,
            ascent: scale(face.ascender() as f32),
            descent: scale(face.descender() as f32),
            cap_height: scale(face.capital_height().unwrap_or(face.ascender()) as f32),
            bbox: [
                scale(bbox.x_min as f32),
                scale(bbox.y_min as f32),
                scale(bbox.x_max as f32),
                scale(bbox.y_max as f32),
            ],
            data,
        })
    }
}

/// Either one of the standard 14 PDF fonts or an embedded TrueType font.
#[derive(Clone, Debug)]
pub enum Typeface {
    Standard(&'static str),
    Embedded(EmbeddedFont),
}

impl Typeface {
    pub const HELVETICA: Typeface = Typeface::Standard("Helvetica");
    pub const HELVETICA_OBLIQUE: Typeface = Typeface::Standard("Helvetica-Oblique");

    pub fn name(&self) -> &str {
        match self {
            Typeface::Standard(name) => name,
            Typeface::Embedded(font) => &font.base_font,
        }
    }

    pub fn width_of_text(&self, text: &str, size: Pt) -> Pt {
        let units: f32 = metrics::encode(text)
            .into_iter()
            .map(|code| match self {
                Typeface::Standard(_) => HELVETICA_WIDTHS[metrics::width_index(code)] as f32,
                Typeface::Embedded(font) => font.widths[metrics::width_index(code)],
            })
            .sum();
        Pt(units * *size / 1000.0)
    }
}

/// The outcome of looking for the serif heading face.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    pub typeface: Typeface,
    pub used_fallback: bool,
}

/// Find and load the serif face, falling back to Helvetica.
pub fn resolve_serif(preferred: Option<&Path>) -> ResolvedFont {
    let candidates: Vec<PathBuf> = SERIF_FONT_LOCATIONS
        .iter()
        .map(|p| expand_home(p))
        .collect();
    resolve_serif_from(preferred, &candidates)
}

/// Try `preferred`, then each of `candidates` that exists.
pub fn resolve_serif_from(preferred: Option<&Path>, candidates: &[PathBuf]) -> ResolvedFont {
    if let Some(path) = preferred {
        match EmbeddedFont::load(path) {
            Ok(font) => {
                return ResolvedFont {
                    typeface: Typeface::Embedded(font),
                    used_fallback: false,
                }
            }
            Err(e) => log::warn!("{e:#}, looking for a serif font elsewhere"),
        }
    }

    for candidate in candidates.iter().filter(|c| c.exists()) {
        match EmbeddedFont::load(candidate) {
            Ok(font) => {
                log::debug!("using serif font {}", candidate.display());
                return ResolvedFont {
                    typeface: Typeface::Embedded(font),
                    used_fallback: false,
                };
            }
            Err(e) => log::warn!("{e:#}"),
        }
    }

    log::warn!("No serif font could be loaded, headings will use Helvetica");
    ResolvedFont {
        typeface: Typeface::HELVETICA,
        used_fallback: true,
    }
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

/// The faces used by a document.
#[derive(Clone, Debug)]
pub struct FontSet {
    pub sans: Typeface,
    pub sans_oblique: Typeface,
    pub serif: Typeface,
    /// Whether the serif face had to be substituted with Helvetica
    pub serif_fallback: bool,
}

impl FontSet {
    pub fn load(serif_font: Option<&Path>) -> FontSet {
        let ResolvedFont {
            typeface,
            used_fallback,
        } = resolve_serif(serif_font);
        FontSet {
            serif: typeface,
            serif_fallback: used_fallback,
            ..FontSet::standard()
        }
    }

    /// Only the standard faces, without probing the file system.
    pub fn standard() -> FontSet {
        FontSet {
            sans: Typeface::HELVETICA,
            sans_oblique: Typeface::HELVETICA_OBLIQUE,
            serif: Typeface::HELVETICA,
            serif_fallback: true,
        }
    }

    pub fn face(&self, face: Face) -> &Typeface {
        match face {
            Face::Sans => &self.sans,
            Face::SansOblique => &self.sans_oblique,
            Face::Serif => &self.serif,
        }
    }

    pub fn width_of_text(&self, text: &str, face: Face, size: Pt) -> Pt {
        self.face(face).width_of_text(text, size)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn helvetica_text_width() {
        let fonts = FontSet::standard();
        // "10" is two 556-unit digits
        let width = fonts.width_of_text("10", Face::Sans, Pt(18.0));
        assert!((*width - 2.0 * 0.556 * 18.0).abs() < 1e-4);
        assert_eq!(fonts.width_of_text("", Face::Serif, Pt(12.0)), Pt(0.0));
    }

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("assets/fonts")
            .join(name)
    }

    #[test]
    fn missing_serif_font_falls_back_silently() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let missing = dir.path().join("NoSuchFont-Regular.ttf");
        let resolved = resolve_serif_from(Some(&missing), &[dir.path().join("Other.ttf")]);
        assert!(resolved.used_fallback);
        assert_eq!(resolved.typeface.name(), "Helvetica");
    }

    #[test]
    fn serif_candidates_are_tried_in_order() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let resolved = resolve_serif_from(
            Some(&dir.path().join("NoSuchFont-Regular.ttf")),
            &[
                dir.path().join("AlsoMissing.ttf"),
                fixture("Demo-Regular.ttf"),
            ],
        );
        assert!(!resolved.used_fallback);
        assert_eq!(resolved.typeface.name(), "Demo-Regular");
    }

    #[test]
    fn truetype_font_loads_with_metrics() {
        let font = EmbeddedFont::load(fixture("Demo-Regular.ttf")).expect("can load font");
        assert_eq!(font.base_font, "Demo-Regular");
        assert!(!font.data.is_empty());
        assert_eq!(font.widths.len(), (LAST_CHAR - FIRST_CHAR + 1) as usize);
        // the font only maps "A", 540 units wide at 1000 units per em
        assert!((font.widths[metrics::width_index(b'A')] - 540.0).abs() < 1e-3);
        assert_eq!(font.widths[metrics::width_index(b'B')], 0.0);
    }

    #[test]
    fn fonts_without_truetype_outlines_are_not_embedded() {
        let bitmap = fixture("Bitmap.otb");
        assert!(EmbeddedFont::load(&bitmap).is_err());

        let resolved = resolve_serif_from(Some(&bitmap), &[]);
        assert!(resolved.used_fallback);
    }

    #[test]
    fn unparseable_font_file_is_an_error() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let bogus = dir.path().join("Bogus-Regular.ttf");
        std::fs::write(&bogus, b"definitely not a font").expect("can write file");
        assert!(EmbeddedFont::load(&bogus).is_err());
    }

    #[test]
    fn home_is_expanded() {
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(
                expand_home("~/fonts/a.ttf"),
                PathBuf::from(home).join("fonts/a.ttf")
            );
        }
        assert_eq!(expand_home("/abs/a.ttf"), PathBuf::from("/abs/a.ttf"));
    }
}
