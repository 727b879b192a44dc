// LLM prompt constants for the Intake stage.

/// Stage instruction for CV analysis: enforces the two-key JSON shape.
pub const CV_ANALYSIS_INSTRUCTION: &str = "Read the provided CV carefully. \
    Extract the applicant's full name and brainstorm exactly 5 distinct, precise and compelling \
    proposed endeavor topics suitable for an EB-2 NIW petition. \
    Return a single JSON object with two keys: \"full_name\" (a string) and \"topics\" \
    (an array of exactly 5 strings).";

/// CV analysis prompt template.
/// Replace: {cv_text}, {avoid_block}
pub const CV_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the CV below.

When brainstorming topics, derive the applicant's industry from the CV (memberships, work
experience, scholarly articles, research papers, awards, peer reviews) and propose direct,
precise endeavors with substantial merit and national importance to the United States.
Factors to consider:
  A. benefit to millions of Americans
  B. national or global implications within a particular field
  C. employing U.S. workers in economically depressed areas
  D. substantial economic effect for the nation (regional or national economy, GDP)
  E. enhancing societal welfare or cultural or artistic enrichment
  F. impact on a matter a government entity has described as nationally important
{avoid_block}
Return JSON with this EXACT schema (no extra fields):
{
  "full_name": "Jane Q. Doe",
  "topics": ["topic 1", "topic 2", "topic 3", "topic 4", "topic 5"]
}

CV:
{cv_text}"#;

/// Fragment inserted when the user asked for fresh topics.
/// Replace: {previous_topics}
pub const AVOID_TOPICS_TEMPLATE: &str = "
The applicant rejected these earlier suggestions. Propose 5 NEW topics that differ from them:
{previous_topics}
";
