//! Greedy word wrap on font metrics.
//!
//! Words that are wider than the line on their own (long URLs, mostly) are
//! broken at character boundaries so that no line ever exceeds `max_width_pt`.
//! Wrapping only moves whitespace: concatenating the words of the output lines
//! reproduces the input words, with hard-broken words split across lines.
//! Lines are measured with the faces they are drawn with, so the wrapped
//! strings are exactly what the renderer places.

use crate::layout::font_metrics::FontStyle;
use crate::layout::typeface::Typefaces;

/// Wraps `text` into lines no wider than `max_width_pt`.
///
/// Runs of whitespace collapse to a single space. Empty input returns no lines.
pub fn wrap_text(
    text: &str,
    style: FontStyle,
    size_pt: f32,
    max_width_pt: f32,
    faces: &Typefaces,
) -> Vec<String> {
    let space_w = faces.measure_pt(" ", style, size_pt);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_w = faces.measure_pt(word, style, size_pt);

        if word_w > max_width_pt {
            // A long word starts on a fresh line; its last chunk stays open.
            let mut chunks = break_word(word, style, size_pt, max_width_pt, faces);
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let last = chunks.pop().unwrap_or_default();
            lines.extend(chunks);
            current_width = faces.measure_pt(&last, style, size_pt);
            current = last;
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_width = word_w;
        } else if current_width + space_w + word_w > max_width_pt {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_width = word_w;
        } else {
            current.push(' ');
            current.push_str(word);
            current_width += space_w + word_w;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Splits a single word into chunks that each fit on a line.
///
/// Every chunk holds at least one character, so even a line narrower than a
/// glyph makes progress.
fn break_word(
    word: &str,
    style: FontStyle,
    size_pt: f32,
    max_width_pt: f32,
    faces: &Typefaces,
) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut chunk = String::new();
    let mut width = 0.0_f32;

    for c in word.chars() {
        let mut buf = [0u8; 4];
        let c_w = faces.measure_pt(c.encode_utf8(&mut buf), style, size_pt);
        if !chunk.is_empty() && width + c_w > max_width_pt {
            chunks.push(std::mem::take(&mut chunk));
            width = 0.0;
        }
        chunk.push(c);
        width += c_w;
    }
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    chunks
}
