// Research stage: topic in, validated exhibits out.
// Candidate URLs come from the model's web search; only reachable ones survive.

pub mod link_check;
pub mod prompts;
pub mod sources;

pub use link_check::{validate_sources, LinkChecker, ReachabilityProbe};
pub use sources::research_sources;
