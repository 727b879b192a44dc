//! Section writer: drafts each document section and validates its citations.
//!
//! Flow per section: build prompt → LLM call → strip markdown → split paragraphs
//! → scrub citations against the validated exhibits.

use std::collections::HashSet;

use tracing::info;

use crate::drafting::citations::scrub_citations;
use crate::drafting::prompts::{
    NO_SOURCES, SECTIONS, SECTION_GUIDANCE, SECTION_PROMPT_TEMPLATE, WRITER_INSTRUCTION,
};
use crate::errors::AppError;
use crate::llm_client::prompts::{system_prompt, CITATION_INSTRUCTION};
use crate::llm_client::{TextModel, ToolUse};
use crate::models::{
    CitedParagraph, DocumentSection, EndeavorDocument, ExhibitLabel, ValidatedSource,
};

/// Drafts every section in `SECTIONS` order and assembles the document.
pub async fn draft_document(
    model: &dyn TextModel,
    applicant_name: &str,
    topic: &str,
    sources: &[ValidatedSource],
) -> Result<EndeavorDocument, AppError> {
    let known: HashSet<ExhibitLabel> = sources.iter().map(|s| s.exhibit).collect();
    let sources_block = sources_block(sources);
    let system = system_prompt(WRITER_INSTRUCTION);

    let mut sections = Vec::with_capacity(SECTIONS.len());
    for (i, (title, guidance)) in SECTIONS.iter().zip(SECTION_GUIDANCE).enumerate() {
        info!("Writing section {}/{}: {}", i + 1, SECTIONS.len(), title);

        let prompt = SECTION_PROMPT_TEMPLATE
            .replace("{section_title}", title)
            .replace("{guidance}", guidance)
            .replace("{applicant_name}", applicant_name)
            .replace("{topic}", topic)
            .replace("{citation_instruction}", CITATION_INSTRUCTION)
            .replace("{sources}", &sources_block);

        let body = model
            .complete(&prompt, &system, ToolUse::None)
            .await
            .map_err(|e| AppError::Llm(format!("Drafting '{title}' failed: {e}")))?;

        let paragraphs: Vec<CitedParagraph> = split_paragraphs(&body, title)
            .iter()
            .map(|p| scrub_citations(p, &known))
            .filter(|p| !p.text.is_empty())
            .collect();

        if paragraphs.is_empty() {
            return Err(AppError::MalformedResponse(format!(
                "section '{title}' came back empty"
            )));
        }

        sections.push(DocumentSection {
            heading: title.to_uppercase(),
            paragraphs,
        });
    }

    let document = EndeavorDocument {
        applicant_name: applicant_name.to_string(),
        topic: topic.to_string(),
        sections,
        sources: sources.to_vec(),
    };
    info!(
        "Document drafted: {} paragraphs, {} of {} exhibits cited",
        document.paragraph_count(),
        document.cited_exhibits().len(),
        sources.len()
    );
    Ok(document)
}

fn sources_block(sources: &[ValidatedSource]) -> String {
    if sources.is_empty() {
        return NO_SOURCES.to_string();
    }
    sources
        .iter()
        .map(|s| format!("{}: {}", s.exhibit, s.url))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits model output into paragraphs.
///
/// Markdown heading lines, an echoed section title, and emphasis markers are
/// dropped. Blank lines separate paragraphs; list items become their own
/// paragraph prefixed with `- `.
fn split_paragraphs(body: &str, title: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<String> = Vec::new();

    let flush = |current: &mut Vec<String>, paragraphs: &mut Vec<String>| {
        if !current.is_empty() {
            paragraphs.push(current.join(" "));
            current.clear();
        }
    };

    for raw_line in body.lines() {
        let line = raw_line.replace("**", "").replace("__", "");
        let line = line.trim();

        if line.is_empty() {
            flush(&mut current, &mut paragraphs);
            continue;
        }
        if line.starts_with('#') || line.trim_end_matches(':').eq_ignore_ascii_case(title) {
            flush(&mut current, &mut paragraphs);
            continue;
        }
        if let Some(item) = ["- ", "* ", "• "]
            .iter()
            .find_map(|marker| line.strip_prefix(marker))
        {
            flush(&mut current, &mut paragraphs);
            paragraphs.push(format!("- {}", item.trim()));
            continue;
        }
        current.push(line.to_string());
    }
    flush(&mut current, &mut paragraphs);

    paragraphs
}
