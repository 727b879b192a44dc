// All LLM prompt constants for the Drafting stage.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Document sections, in order. Each is drafted by its own LLM call.
pub const SECTIONS: [&str; 6] = [
    "Introduction and Overview",
    "Substantial Merit",
    "National Importance",
    "Phased Implementation Plan",
    "Projected Economic Impact and Job Creation",
    "Broader Impacts and Conclusion",
];

pub const WRITER_INSTRUCTION: &str = "You are a brilliant writer specializing in U.S. \
    immigration petitions. Your task is to write a single, detailed section for a \
    \"Proposed Endeavor\" document.\n\
    - Write in the first person (\"I will...\", \"My endeavor...\").\n\
    - Keep the tone professional, confident, and persuasive.\n\
    - The section should be substantial and well-developed (aim for at least 800 words).\n\
    - Write plain paragraphs separated by a blank line. No markdown, no bullet lists.\n\
    - Do not write the section title itself, only the body text for that section.";

/// Per-section guidance, keyed by position in `SECTIONS`.
pub const SECTION_GUIDANCE: [&str; 6] = [
    "Introduce the applicant and the endeavor, when and where it will launch in the United \
     States, and why the applicant is well positioned to advance it.",
    "Elaborate extensively on the substantial merit of the endeavor under the first prong of \
     Matter of Dhanasar: its value in business, entrepreneurship, science, technology, culture, \
     health, or education.",
    "Elaborate on the alignment of the endeavor with U.S. national strategy and priorities. \
     Ground claims in the provided sources: White House fact sheets, executive orders, \
     congressional records, and federal agency reports.",
    "Enumerate a phased implementation plan covering the United States as a whole, starting from \
     the next calendar quarter, with concrete milestones per phase.",
    "Elaborate extensively on the economic impact of the endeavor: direct job creation, \
     workforce development, regional and national economic growth, and global competitiveness.",
    "Describe the broader impacts on regional development and industry advancement, then \
     conclude by summarizing why the endeavor merits a National Interest Waiver.",
];

/// Section prompt template.
/// Replace: {section_title}, {guidance}, {applicant_name}, {topic}, {sources}, {citation_instruction}
pub const SECTION_PROMPT_TEMPLATE: &str = r#"Write the '{section_title}' section for a Proposed Endeavor document.

The applicant's name is {applicant_name}.
The chosen topic is: '{topic}'.

Section guidance: {guidance}

{citation_instruction}

Credible sources you can cite:
{sources}"#;

/// Placeholder used in the sources block when nothing survived validation.
pub const NO_SOURCES: &str = "(none: do not cite any exhibits)";
