//! PDF rendering of a laid-out document with `printpdf`.
//!
//! Positions come from `layout::paginate`; this module only converts them to
//! PDF coordinates (origin bottom-left) and draws the text. Every line is drawn
//! exactly as it was measured, and a line the faces cannot draw fails the
//! render instead of losing characters.

use std::collections::BTreeSet;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, Pt};

use crate::errors::AppError;
use crate::layout::typeface::unsupported;
use crate::layout::{Align, DocumentLayout, FontStyle, PageConfig, Typefaces};

const LAYER_NAME: &str = "Text";

struct FontSet {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl FontSet {
    fn load(doc: &PdfDocumentReference, faces: &Typefaces) -> Result<Self, AppError> {
        Ok(Self {
            regular: add_font(doc, faces, FontStyle::Regular, BuiltinFont::TimesRoman)?,
            bold: add_font(doc, faces, FontStyle::Bold, BuiltinFont::TimesBold)?,
            italic: add_font(doc, faces, FontStyle::Italic, BuiltinFont::TimesItalic)?,
        })
    }

    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

/// Embeds the face for `style`, or references the core font when there is none.
fn add_font(
    doc: &PdfDocumentReference,
    faces: &Typefaces,
    style: FontStyle,
    core: BuiltinFont,
) -> Result<IndirectFontRef, AppError> {
    match faces.font_data(style) {
        Some(data) => doc
            .add_external_font(data)
            .map_err(|e| AppError::Pdf(format!("embed {style:?} font: {e}"))),
        None => doc
            .add_builtin_font(core)
            .map_err(|e| AppError::Pdf(format!("builtin font: {e}"))),
    }
}

/// Renders every page of `layout` and returns the PDF bytes.
pub fn render_pdf(
    layout: &DocumentLayout,
    title: &str,
    config: &PageConfig,
    faces: &Typefaces,
) -> Result<Vec<u8>, AppError> {
    let missing: BTreeSet<char> = layout
        .lines()
        .flat_map(|line| faces.missing_chars(&line.text, line.style))
        .collect();
    if !missing.is_empty() {
        return Err(unsupported(&missing));
    }

    let width = Mm(config.page_width_mm);
    let height = Mm(config.page_height_mm);
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);
    let font_set = FontSet::load(&doc, faces)?;

    for (i, page) in layout.pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, LAYER_NAME)
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for line in &page.lines {
            let x_pt = match line.align {
                Align::Left => config.margin_pt(),
                Align::Center => {
                    let w = faces.measure_pt(&line.text, line.style, line.size_pt);
                    config.margin_pt() + ((config.text_width_pt() - w) / 2.0).max(0.0)
                }
            };
            let y_pt = config.page_height_pt() - line.baseline_pt;
            layer.use_text(
                line.text.as_str(),
                line.size_pt,
                Mm::from(Pt(x_pt)),
                Mm::from(Pt(y_pt)),
                font_set.get(line.style),
            );
        }
    }

    doc.save_to_bytes()
        .map_err(|e| AppError::Pdf(format!("serialize: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::paginate::{LayoutLine, LayoutPage};
    use crate::layout::{a4_page_config, FontSource};

    fn line(text: &str, style: FontStyle, align: Align, baseline_pt: f32) -> LayoutLine {
        LayoutLine {
            text: text.to_string(),
            style,
            size_pt: 11.0,
            align,
            baseline_pt,
        }
    }

    fn two_pages(body: &str) -> DocumentLayout {
        DocumentLayout {
            pages: vec![
                LayoutPage {
                    lines: vec![line("Proposed Endeavor", FontStyle::Bold, Align::Center, 300.0)],
                },
                LayoutPage {
                    lines: vec![
                        line("NATIONAL IMPORTANCE", FontStyle::Bold, Align::Left, 100.0),
                        line(body, FontStyle::Regular, Align::Left, 115.0),
                        line("\"Grid storage\"", FontStyle::Italic, Align::Center, 130.0),
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_render_bundled_faces_produces_pdf_bytes() {
        let faces = Typefaces::load(&FontSource::Bundled).unwrap();
        let body = "I will \u{2014} with Puerto Rico\u{2019}s utilities \u{2014} scale it.";
        let layout = two_pages(body);
        let bytes = render_pdf(&layout, "Proposed Endeavor", &a4_page_config(), &faces).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        // The three faces are embedded.
        assert!(bytes.len() > 100_000);
    }

    #[test]
    fn test_render_builtin_times_for_ascii_text() {
        let faces = Typefaces::load(&FontSource::BuiltinTimes).unwrap();
        let layout = two_pages("I will scale storage with regional partners.");
        let bytes = render_pdf(&layout, "Proposed Endeavor", &a4_page_config(), &faces).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() < 20_000);
    }

    #[test]
    fn test_builtin_times_refuses_text_it_cannot_draw() {
        let faces = Typefaces::load(&FontSource::BuiltinTimes).unwrap();
        let layout = two_pages("Puerto Rico\u{2019}s grid");
        let err = render_pdf(&layout, "t", &a4_page_config(), &faces).unwrap_err();
        assert!(matches!(err, AppError::Pdf(_)));
        assert!(err.to_string().contains('\u{2019}'));
    }

    #[test]
    fn test_uncovered_script_fails_instead_of_dropping_glyphs() {
        let faces = Typefaces::load(&FontSource::Bundled).unwrap();
        let layout = two_pages("Zhang Wei (\u{5F20}\u{4F1F})");
        let err = render_pdf(&layout, "t", &a4_page_config(), &faces).unwrap_err();
        assert!(matches!(err, AppError::Pdf(_)));
    }
}
