//! Endeavor pipeline: orchestrates one interactive run end to end.
//!
//! Flow: load fonts → read CV → analyze (name + 5 topics) → choose topic (or regenerate)
//!       → research URLs → validate reachability → draft sections
//!       → layout + render (spawn_blocking) → atomic write → capture exhibits.
//!
//! Every stage completes before the next starts. Any stage error ends the run
//! before the PDF is written; exhibit capture failures only produce warnings.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::info;

use crate::capture::{capture_exhibits, CaptureOutcome, ChromeCapture};
use crate::drafting::draft_document;
use crate::errors::AppError;
use crate::intake::{analyze_cv, choose_topic, read_cv, CvAnalysis, MenuStyle, TopicChoice};
use crate::layout::{a4_page_config, layout_document, FontSource, Typefaces};
use crate::llm_client::TextModel;
use crate::models::{EndeavorDocument, ValidatedSource};
use crate::render::{applicant_folder, output_path, render_pdf, write_atomically};
use crate::research::{research_sources, validate_sources, ReachabilityProbe};

/// Per-run settings that do not come from the model or the user.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub output_dir: PathBuf,
    pub fonts: FontSource,
    pub menu: MenuStyle,
    /// Date printed on the title page.
    pub prepared_on: NaiveDate,
}

/// What a successful run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub document: EndeavorDocument,
    pub pdf_path: PathBuf,
    pub page_count: usize,
    pub captures: Vec<CaptureOutcome>,
}

/// Runs the whole pipeline against the given terminal streams.
///
/// `capture` is `None` when exhibit capture is disabled or no browser was found.
pub async fn run<R: BufRead, W: Write>(
    model: &dyn TextModel,
    probe: &dyn ReachabilityProbe,
    capture: Option<&ChromeCapture>,
    settings: &RunSettings,
    input: &mut R,
    output: &mut W,
) -> Result<RunSummary, AppError> {
    // Step 1: Fonts, so a bad font directory fails before any model call
    let faces = Typefaces::load(&settings.fonts)?;

    // Step 2: Intake
    let cv_text = read_cv(input, output)?;
    info!("CV received ({} chars)", cv_text.len());

    // Step 3: Topic selection, regenerating on request
    writeln!(output, "\nAnalyzing your CV...")?;
    let (analysis, topic) = select_topic(model, &cv_text, settings.menu, input, output).await?;
    let pdf_path = output_path(&settings.output_dir, &analysis.full_name)?;
    faces.ensure_drawable(&analysis.full_name)?;
    faces.ensure_drawable(&topic)?;
    writeln!(output, "\nGreat! You have selected: '{topic}'")?;

    // Step 4: Research and reachability
    writeln!(output, "Researching credible sources...")?;
    let candidates = research_sources(model, &topic).await?;
    let sources = validate_sources(probe, &candidates).await;
    info!(
        "{} of {} candidate sources are citable",
        sources.len(),
        candidates.len()
    );
    writeln!(output, "{} sources validated.", sources.len())?;

    // Step 5: Drafting
    writeln!(output, "Writing the document, section by section...")?;
    let document = draft_document(model, &analysis.full_name, &topic, &sources).await?;

    // Step 6: Layout, render and write (CPU-bound + blocking IO)
    let page_count = assemble_pdf(
        document.clone(),
        faces,
        settings.prepared_on,
        pdf_path.clone(),
    )
    .await?;
    info!("PDF written: {} ({} pages)", pdf_path.display(), page_count);

    // Step 7: Exhibit capture
    let captures = match capture {
        Some(capture) if !sources.is_empty() => {
            writeln!(output, "Capturing {} exhibits...", sources.len())?;
            let folder = applicant_folder(&settings.output_dir, &analysis.full_name)?;
            capture_exhibits(capture, &folder, &sources).await
        }
        Some(_) => Vec::new(),
        None => {
            info!("Exhibit capture skipped");
            Vec::new()
        }
    };

    Ok(RunSummary {
        document,
        pdf_path,
        page_count,
        captures,
    })
}

/// Loops analysis and selection until the user picks one of the topics.
///
/// Every rejected round adds its topics to the avoid list of the next call.
async fn select_topic<R: BufRead, W: Write>(
    model: &dyn TextModel,
    cv_text: &str,
    menu: MenuStyle,
    input: &mut R,
    output: &mut W,
) -> Result<(CvAnalysis, String), AppError> {
    let mut avoid: Vec<String> = Vec::new();
    loop {
        let analysis = analyze_cv(model, cv_text, &avoid).await?;
        match choose_topic(input, output, &analysis.topics, menu)? {
            TopicChoice::Selected(index) => {
                let topic = analysis.topics[index].clone();
                info!("Topic selected: {topic}");
                return Ok((analysis, topic));
            }
            TopicChoice::Regenerate => {
                avoid.extend(analysis.topics);
                info!("New topics requested, {} topics to avoid", avoid.len());
                writeln!(output, "\nAsking for five new topics...")?;
            }
        }
    }
}

/// Lays out, renders and writes the PDF on the blocking pool.
/// Returns the page count.
async fn assemble_pdf(
    document: EndeavorDocument,
    faces: Typefaces,
    prepared_on: NaiveDate,
    pdf_path: PathBuf,
) -> Result<usize, AppError> {
    tokio::task::spawn_blocking(move || -> Result<usize, AppError> {
        let config = a4_page_config();
        let layout = layout_document(&document, prepared_on, &config, &faces);
        let title = format!("Proposed Endeavor of {}", document.applicant_name);
        let bytes = render_pdf(&layout, &title, &config, &faces)?;
        write_atomically(&pdf_path, &bytes)?;
        Ok(layout.pages.len())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF assembly task failed: {e}")))?
}

/// The sources a summary's document cites, for the final report.
pub fn cited_sources(summary: &RunSummary) -> Vec<&ValidatedSource> {
    let cited = summary.document.cited_exhibits();
    summary
        .document
        .sources
        .iter()
        .filter(|s| cited.contains(&s.exhibit))
        .collect()
}
