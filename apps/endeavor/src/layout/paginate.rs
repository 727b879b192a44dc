//! Pagination: turns an `EndeavorDocument` into positioned lines on pages.
//!
//! # Architecture
//! - The document is flattened into `Block`s (wrapped text runs with spacing
//!   rules), then a single top-to-bottom flow places them line by line.
//! - A line that would cross the bottom margin opens a new page.
//! - Headings are kept with the first line of the block after them, so a
//!   heading is never the last line on a page.
//! - Nothing is truncated: the flow only ever adds pages.
//!
//! Layout is CPU-bound and synchronous; async callers run it inside
//! `tokio::task::spawn_blocking`.

use chrono::NaiveDate;

use crate::layout::font_metrics::{FontStyle, PageConfig};
use crate::layout::typeface::Typefaces;
use crate::layout::wrap::wrap_text;
use crate::models::EndeavorDocument;

pub const TITLE: &str = "Proposed Endeavor";
pub const EXHIBITS_HEADING: &str = "EXHIBITS";

const TITLE_SIZE_PT: f32 = 24.0;
const NAME_SIZE_PT: f32 = 16.0;
const TOPIC_SIZE_PT: f32 = 13.0;
const DATE_SIZE_PT: f32 = 11.0;
const DOC_HEADING_SIZE_PT: f32 = 14.0;
const SECTION_HEADING_SIZE_PT: f32 = 12.0;

/// Fraction of the text height left blank above the title.
const TITLE_TOP_FRACTION: f32 = 0.30;

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// One line of text at a fixed position on its page.
#[derive(Debug, Clone)]
pub struct LayoutLine {
    pub text: String,
    pub style: FontStyle,
    pub size_pt: f32,
    pub align: Align,
    /// Distance from the top edge of the page to the text baseline.
    pub baseline_pt: f32,
}

#[derive(Debug, Clone, Default)]
pub struct LayoutPage {
    pub lines: Vec<LayoutLine>,
}

#[derive(Debug, Clone)]
pub struct DocumentLayout {
    pub pages: Vec<LayoutPage>,
}

impl DocumentLayout {
    pub fn lines(&self) -> impl Iterator<Item = &LayoutLine> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Block model
// ────────────────────────────────────────────────────────────────────────────

enum Block {
    Text(TextBlock),
    /// Vertical space that is kept even at the top of a page.
    Spacer(f32),
    PageBreak,
}

struct TextBlock {
    lines: Vec<String>,
    style: FontStyle,
    size_pt: f32,
    align: Align,
    /// Dropped when the block starts a page.
    space_before_pt: f32,
    keep_with_next: bool,
}

impl TextBlock {
    fn wrapped(
        text: &str,
        style: FontStyle,
        size_pt: f32,
        align: Align,
        ctx: &Measure<'_>,
    ) -> Self {
        Self {
            lines: wrap_text(text, style, size_pt, ctx.config.text_width_pt(), ctx.faces),
            style,
            size_pt,
            align,
            space_before_pt: 0.0,
            keep_with_next: false,
        }
    }

    fn space_before(mut self, pt: f32) -> Self {
        self.space_before_pt = pt;
        self
    }

    fn keep_with_next(mut self) -> Self {
        self.keep_with_next = true;
        self
    }
}

/// Page geometry plus the faces lines are measured with.
struct Measure<'a> {
    config: &'a PageConfig,
    faces: &'a Typefaces,
}

fn build_blocks(doc: &EndeavorDocument, prepared_on: NaiveDate, ctx: &Measure<'_>) -> Vec<Block> {
    let config = ctx.config;
    let body = config.body_size_pt;
    let mut blocks = Vec::new();

    // Title page
    blocks.push(Block::Spacer(config.text_height_pt() * TITLE_TOP_FRACTION));
    let title_lines = [
        (TITLE.to_string(), FontStyle::Bold, TITLE_SIZE_PT, 0.0),
        (doc.applicant_name.clone(), FontStyle::Regular, NAME_SIZE_PT, 24.0),
        (format!("Topic: {}", doc.topic), FontStyle::Italic, TOPIC_SIZE_PT, 18.0),
        (
            prepared_on.format("%B %-d, %Y").to_string(),
            FontStyle::Regular,
            DATE_SIZE_PT,
            36.0,
        ),
    ];
    for (text, style, size, gap) in title_lines {
        blocks.push(Block::Text(
            TextBlock::wrapped(&text, style, size, Align::Center, ctx).space_before(gap),
        ));
    }
    blocks.push(Block::PageBreak);

    // Body
    let doc_heading = format!("PROPOSED ENDEAVOR OF {}", doc.applicant_name.to_uppercase());
    blocks.push(Block::Text(
        TextBlock::wrapped(
            &doc_heading,
            FontStyle::Bold,
            DOC_HEADING_SIZE_PT,
            Align::Center,
            ctx,
        )
        .keep_with_next(),
    ));
    blocks.push(Block::Text(
        TextBlock::wrapped(
            &format!("\"{}\"", doc.topic),
            FontStyle::Italic,
            body + 1.0,
            Align::Center,
            ctx,
        )
        .space_before(6.0),
    ));

    for section in &doc.sections {
        blocks.push(Block::Text(
            TextBlock::wrapped(
                &section.heading,
                FontStyle::Bold,
                SECTION_HEADING_SIZE_PT,
                Align::Left,
                ctx,
            )
            .space_before(18.0)
            .keep_with_next(),
        ));
        for paragraph in &section.paragraphs {
            blocks.push(Block::Text(
                TextBlock::wrapped(
                    &paragraph.text,
                    FontStyle::Regular,
                    body,
                    Align::Left,
                    ctx,
                )
                .space_before(6.0),
            ));
        }
    }

    if !doc.sources.is_empty() {
        blocks.push(Block::Text(
            TextBlock::wrapped(
                EXHIBITS_HEADING,
                FontStyle::Bold,
                SECTION_HEADING_SIZE_PT,
                Align::Left,
                ctx,
            )
            .space_before(18.0)
            .keep_with_next(),
        ));
        for source in &doc.sources {
            blocks.push(Block::Text(
                TextBlock::wrapped(
                    &format!("{}: {}", source.exhibit, source.url),
                    FontStyle::Regular,
                    body,
                    Align::Left,
                    ctx,
                )
                .space_before(4.0),
            ));
        }
    }

    blocks
}

// ────────────────────────────────────────────────────────────────────────────
// Flow
// ────────────────────────────────────────────────────────────────────────────

struct Flow<'a> {
    config: &'a PageConfig,
    pages: Vec<LayoutPage>,
    current: LayoutPage,
    /// Height already used on the current page, measured from the top margin.
    cursor_pt: f32,
}

impl<'a> Flow<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            current: LayoutPage::default(),
            cursor_pt: 0.0,
        }
    }

    fn remaining_pt(&self) -> f32 {
        self.config.text_height_pt() - self.cursor_pt
    }

    fn at_page_top(&self) -> bool {
        self.current.lines.is_empty()
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor_pt = 0.0;
    }

    /// Height a block needs before its first line lands, including that line.
    fn lead_height(&self, block: &TextBlock) -> f32 {
        block.space_before_pt + self.config.line_height_pt(block.size_pt)
    }

    fn place(&mut self, block: &TextBlock, next: Option<&TextBlock>) {
        if block.lines.is_empty() {
            return;
        }

        if block.keep_with_next && !self.at_page_top() {
            let line_h = self.config.line_height_pt(block.size_pt);
            let needed = block.space_before_pt
                + line_h * block.lines.len() as f32
                + next.map(|n| self.lead_height(n)).unwrap_or(0.0);
            if needed > self.remaining_pt() {
                self.new_page();
            }
        }

        if !self.at_page_top() {
            self.cursor_pt += block.space_before_pt;
        }

        let line_h = self.config.line_height_pt(block.size_pt);
        for text in &block.lines {
            if self.cursor_pt + line_h > self.config.text_height_pt() && !self.at_page_top() {
                self.new_page();
            }
            self.current.lines.push(LayoutLine {
                text: text.clone(),
                style: block.style,
                size_pt: block.size_pt,
                align: block.align,
                baseline_pt: self.config.margin_pt() + self.cursor_pt + block.size_pt,
            });
            self.cursor_pt += line_h;
        }
    }

    fn finish(mut self) -> Vec<LayoutPage> {
        if !self.current.lines.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

/// Lays out the title page and the body pages.
pub fn layout_document(
    doc: &EndeavorDocument,
    prepared_on: NaiveDate,
    config: &PageConfig,
    faces: &Typefaces,
) -> DocumentLayout {
    let blocks = build_blocks(doc, prepared_on, &Measure { config, faces });
    let mut flow = Flow::new(config);

    for (i, block) in blocks.iter().enumerate() {
        match block {
            Block::Spacer(pt) => flow.cursor_pt += pt,
            Block::PageBreak => flow.new_page(),
            Block::Text(text_block) => {
                let next = blocks[i + 1..].iter().find_map(|b| match b {
                    Block::Text(t) if !t.lines.is_empty() => Some(t),
                    _ => None,
                });
                flow.place(text_block, next);
            }
        }
    }

    DocumentLayout {
        pages: flow.finish(),
    }
}
