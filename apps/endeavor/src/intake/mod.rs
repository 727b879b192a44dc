// Intake stage: CV text in, applicant name + chosen topic out.
// All LLM calls go through llm_client, never directly to Anthropic.

pub mod analyzer;
pub mod cv_input;
pub mod prompts;
pub mod selection;

pub use analyzer::{analyze_cv, CvAnalysis};
pub use cv_input::read_cv;
pub use selection::{choose_topic, MenuStyle, TopicChoice};
