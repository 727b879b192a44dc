//! Source discovery: asks the model (with web search enabled) for candidate URLs.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::errors::AppError;
use crate::llm_client::prompts::system_prompt;
use crate::llm_client::{complete_json, LlmError, TextModel, ToolUse};
use crate::research::prompts::{MAX_SEARCHES, RESEARCH_INSTRUCTION, RESEARCH_PROMPT_TEMPLATE};

/// Accepted answer shapes: a bare array, or an object wrapping one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UrlList {
    Bare(Vec<String>),
    Wrapped { urls: Vec<String> },
}

impl UrlList {
    fn into_vec(self) -> Vec<String> {
        match self {
            UrlList::Bare(urls) | UrlList::Wrapped { urls } => urls,
        }
    }
}

/// Returns the model's candidate source URLs for `topic`, normalized.
pub async fn research_sources(model: &dyn TextModel, topic: &str) -> Result<Vec<String>, AppError> {
    let prompt = RESEARCH_PROMPT_TEMPLATE.replace("{topic}", topic);
    let system = system_prompt(RESEARCH_INSTRUCTION);

    let list: UrlList = complete_json(
        model,
        &prompt,
        &system,
        ToolUse::WebSearch {
            max_uses: MAX_SEARCHES,
        },
    )
    .await
    .map_err(|e| match e {
        LlmError::Parse(e) => {
            AppError::MalformedResponse(format!("research answer was not a JSON URL list: {e}"))
        }
        other => AppError::Llm(format!("Source research failed: {other}")),
    })?;

    let raw = list.into_vec();
    let candidates = normalize_candidates(&raw);
    info!(
        "Research returned {} URLs ({} usable candidates)",
        raw.len(),
        candidates.len()
    );
    Ok(candidates)
}

/// Trims, drops duplicates (first occurrence wins) and drops anything that is
/// not an absolute http(s) URL. Order is preserved.
pub fn normalize_candidates(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|u| u.trim())
        .filter(|u| match Url::parse(u) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => true,
            _ => {
                debug!("Discarding unusable candidate URL: {u:?}");
                false
            }
        })
        .filter(|u| seen.insert(u.to_string()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;

    #[test]
    fn test_normalize_drops_duplicates_and_bad_schemes() {
        let raw = vec![
            " https://www.energy.gov/eere ".to_string(),
            "ftp://example.com/file".to_string(),
            "not a url".to_string(),
            "https://www.energy.gov/eere".to_string(),
            "http://www.nrel.gov/".to_string(),
            "mailto:someone@example.com".to_string(),
        ];
        assert_eq!(
            normalize_candidates(&raw),
            vec![
                "https://www.energy.gov/eere".to_string(),
                "http://www.nrel.gov/".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_research_sources_accepts_bare_array_and_enables_search() {
        let model = ScriptedModel::new([r#"["https://a.gov/", "https://b.gov/"]"#]);
        let urls = research_sources(&model, "Grid storage").await.unwrap();
        assert_eq!(urls, vec!["https://a.gov/", "https://b.gov/"]);

        let seen = model.seen.lock().unwrap();
        assert!(seen[0].0.contains("Topic: Grid storage"));
        assert_eq!(seen[0].1, ToolUse::WebSearch { max_uses: MAX_SEARCHES });
    }

    #[tokio::test]
    async fn test_research_sources_accepts_wrapped_object() {
        let model = ScriptedModel::new([r#"{"urls": ["https://a.gov/"]}"#]);
        let urls = research_sources(&model, "t").await.unwrap();
        assert_eq!(urls, vec!["https://a.gov/"]);
    }

    #[tokio::test]
    async fn test_research_sources_rejects_prose() {
        let model = ScriptedModel::new(["I found some great sources for you!"]);
        let err = research_sources(&model, "t").await.unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }
}
