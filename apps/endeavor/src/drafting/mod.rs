// Drafting stage: applicant + topic + validated exhibits in, EndeavorDocument out.
// All LLM calls go through llm_client, never directly to Anthropic.

pub mod citations;
pub mod prompts;
pub mod writer;

pub use writer::draft_document;
