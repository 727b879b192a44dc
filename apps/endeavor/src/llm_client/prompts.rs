// Shared prompt fragments.
// Each stage that needs LLM calls defines its own prompts.rs alongside it.

/// Persona shared by every stage's system prompt.
pub const ADVISOR_PERSONA: &str = "You are an expert U.S. immigration advisor and research \
    strategist helping a professional formulate a \"Proposed Endeavor\" for an EB-2 National \
    Interest Waiver (NIW) petition under Matter of Dhanasar, 26 I&N Dec. 884 (AAO 2016).";

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Citation convention every drafted section must follow.
pub const CITATION_INSTRUCTION: &str = "\
    Cite sources inline using ONLY the exhibit labels provided, in the exact form \
    (Exhibit 1B), (Exhibit 1C), and so on. Never invent an exhibit label, never use \
    Exhibit 2 or higher, and never cite a source that is not in the provided list. \
    If no sources are provided, do not cite anything.";

/// Joins the shared persona with a stage-specific instruction.
pub fn system_prompt(stage_instruction: &str) -> String {
    format!("{ADVISOR_PERSONA}\n\n{stage_instruction}")
}
