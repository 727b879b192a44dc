// LLM prompt constants for the Research stage.

/// Maximum web searches the model may run while researching one topic.
pub const MAX_SEARCHES: u32 = 5;

pub const RESEARCH_INSTRUCTION: &str = "You are a diligent research assistant. \
    Use the web search tool to find highly credible sources. \
    Focus on U.S. government websites (ending in .gov), official publications, congressional \
    records, White House fact sheets, executive orders, or top-tier academic research. \
    Only return URLs you actually saw in search results. \
    Your final answer must be a JSON array of URL strings and nothing else.";

/// Research prompt template. Replace: {topic}
pub const RESEARCH_PROMPT_TEMPLATE: &str = r#"Find 5 highly credible sources that establish the
substantial merit and national importance to the United States of this proposed endeavor:

Topic: {topic}

Return a JSON array of 5 full URL strings, for example:
["https://www.energy.gov/...", "https://www.whitehouse.gov/..."]"#;
