//! Typefaces the document is measured and drawn with.
//!
//! The default family is DejaVu Serif, compiled into the binary. A directory of
//! TTFs can replace it, and the PDF core Times family is available as an
//! opt-in for tiny files. Wrapping and rendering share one `Typefaces` value,
//! so a line is measured with the exact advance widths it is drawn with.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use owned_ttf_parser::{AsFaceRef, OwnedFace};

use crate::errors::AppError;
use crate::layout::font_metrics::{get_metrics, FontStyle};

static DEJAVU_SERIF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSerif.ttf");
static DEJAVU_SERIF_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSerif-Bold.ttf");
static DEJAVU_SERIF_ITALIC: &[u8] = include_bytes!("../../assets/fonts/DejaVuSerif-Italic.ttf");

/// Where glyphs come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FontSource {
    /// DejaVu Serif regular, bold and italic, bundled with the binary.
    #[default]
    Bundled,
    /// A directory with `regular.ttf`, `bold.ttf` and `italic.ttf`.
    Directory(PathBuf),
    /// The PDF core Times family. Only printable ASCII can be drawn.
    BuiltinTimes,
}

impl FontSource {
    pub fn from_settings(dir: Option<&Path>, builtin_times: bool) -> Self {
        match (dir, builtin_times) {
            (_, true) => FontSource::BuiltinTimes,
            (Some(dir), false) => FontSource::Directory(dir.to_path_buf()),
            (None, false) => FontSource::Bundled,
        }
    }
}

/// Three TrueType faces, one per style.
#[derive(Debug)]
pub struct FaceSet {
    regular: OwnedFace,
    bold: OwnedFace,
    italic: OwnedFace,
}

impl FaceSet {
    fn get(&self, style: FontStyle) -> &OwnedFace {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

#[derive(Debug)]
pub enum Typefaces {
    BuiltinTimes,
    TrueType(FaceSet),
}

impl Typefaces {
    /// Parses the faces `source` points at.
    pub fn load(source: &FontSource) -> Result<Self, AppError> {
        match source {
            FontSource::BuiltinTimes => Ok(Typefaces::BuiltinTimes),
            FontSource::Bundled => Ok(Typefaces::TrueType(FaceSet {
                regular: parse_face("DejaVuSerif.ttf", DEJAVU_SERIF.to_vec())?,
                bold: parse_face("DejaVuSerif-Bold.ttf", DEJAVU_SERIF_BOLD.to_vec())?,
                italic: parse_face("DejaVuSerif-Italic.ttf", DEJAVU_SERIF_ITALIC.to_vec())?,
            })),
            FontSource::Directory(dir) => Ok(Typefaces::TrueType(FaceSet {
                regular: read_face(&dir.join("regular.ttf"))?,
                bold: read_face(&dir.join("bold.ttf"))?,
                italic: read_face(&dir.join("italic.ttf"))?,
            })),
        }
    }

    /// Raw font file for `style`, or `None` for the core fonts.
    pub fn font_data(&self, style: FontStyle) -> Option<&[u8]> {
        match self {
            Typefaces::BuiltinTimes => None,
            Typefaces::TrueType(faces) => Some(faces.get(style).as_slice()),
        }
    }

    /// Advance width of `c` in em units; `None` when the face cannot draw it.
    pub fn char_em(&self, c: char, style: FontStyle) -> Option<f32> {
        match self {
            Typefaces::BuiltinTimes => {
                (' '..='~').contains(&c).then(|| get_metrics(style).char_width(c))
            }
            Typefaces::TrueType(faces) => {
                let face = faces.get(style).as_face_ref();
                let glyph = face.glyph_index(c)?;
                let advance = face.glyph_hor_advance(glyph)?;
                Some(f32::from(advance) / f32::from(face.units_per_em()))
            }
        }
    }

    /// Drawn width of `s` in points.
    ///
    /// Characters without a glyph count as one em; `missing_chars` reports them.
    pub fn measure_pt(&self, s: &str, style: FontStyle, size_pt: f32) -> f32 {
        s.chars()
            .map(|c| self.char_em(c, style).unwrap_or(1.0))
            .sum::<f32>()
            * size_pt
    }

    /// Non-whitespace characters of `s` the `style` face has no glyph for.
    pub fn missing_chars(&self, s: &str, style: FontStyle) -> BTreeSet<char> {
        s.chars()
            .filter(|c| !c.is_whitespace() && self.char_em(*c, style).is_none())
            .collect()
    }

    /// Fails when any style would lose a character of `text`.
    pub fn ensure_drawable(&self, text: &str) -> Result<(), AppError> {
        let missing: BTreeSet<char> = [FontStyle::Regular, FontStyle::Bold, FontStyle::Italic]
            .into_iter()
            .flat_map(|style| self.missing_chars(text, style))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(unsupported(&missing))
        }
    }
}

/// The error for characters the configured fonts cannot draw.
pub fn unsupported(missing: &BTreeSet<char>) -> AppError {
    let chars: String = missing.iter().collect();
    AppError::Pdf(format!(
        "the configured fonts have no glyphs for {chars:?}; \
         set ENDEAVOR_FONT_DIR to a family that covers them"
    ))
}

fn read_face(path: &Path) -> Result<OwnedFace, AppError> {
    let data = std::fs::read(path)?;
    parse_face(&path.display().to_string(), data)
}

fn parse_face(name: &str, data: Vec<u8>) -> Result<OwnedFace, AppError> {
    OwnedFace::from_vec(data, 0).map_err(|e| AppError::Pdf(format!("font {name}: {e}")))
}
