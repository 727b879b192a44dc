//! CV analyzer: extracts the applicant's name and five candidate endeavor topics.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::intake::prompts::{
    AVOID_TOPICS_TEMPLATE, CV_ANALYSIS_INSTRUCTION, CV_ANALYSIS_PROMPT_TEMPLATE,
};
use crate::llm_client::prompts::{system_prompt, JSON_ONLY_SYSTEM};
use crate::llm_client::{complete_json, LlmError, TextModel, ToolUse};

/// Number of topics the analysis must produce.
pub const TOPIC_COUNT: usize = 5;

/// Validated output of the Intake stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CvAnalysis {
    pub full_name: String,
    pub topics: [String; TOPIC_COUNT],
}

/// Raw JSON shape returned by the model, before validation.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    full_name: Option<String>,
    topics: Option<Vec<String>>,
}

/// Sends the CV to the model and validates the answer.
///
/// `avoid` lists topics from an earlier round that the user rejected; it is
/// empty on the first call.
pub async fn analyze_cv(
    model: &dyn TextModel,
    cv_text: &str,
    avoid: &[String],
) -> Result<CvAnalysis, AppError> {
    if cv_text.trim().is_empty() {
        return Err(AppError::Validation("CV text cannot be empty".to_string()));
    }

    let prompt = build_prompt(cv_text, avoid);
    let system = system_prompt(&format!("{CV_ANALYSIS_INSTRUCTION}\n{JSON_ONLY_SYSTEM}"));

    let raw: RawAnalysis = complete_json(model, &prompt, &system, ToolUse::None)
        .await
        .map_err(|e| match e {
            LlmError::Parse(e) => {
                AppError::MalformedResponse(format!("CV analysis was not the expected JSON: {e}"))
            }
            other => AppError::Llm(format!("CV analysis failed: {other}")),
        })?;

    let analysis = validate(raw)?;
    info!(
        "CV analysis complete: applicant identified as {}",
        analysis.full_name
    );
    Ok(analysis)
}

fn build_prompt(cv_text: &str, avoid: &[String]) -> String {
    let avoid_block = if avoid.is_empty() {
        String::new()
    } else {
        let listed = avoid
            .iter()
            .map(|t| format!("- {t}"))
            .collect::<Vec<_>>()
            .join("\n");
        AVOID_TOPICS_TEMPLATE.replace("{previous_topics}", &listed)
    };

    CV_ANALYSIS_PROMPT_TEMPLATE
        .replace("{avoid_block}", &avoid_block)
        .replace("{cv_text}", cv_text)
}

/// Enforces exactly one non-blank name and exactly five non-blank topics.
fn validate(raw: RawAnalysis) -> Result<CvAnalysis, AppError> {
    let full_name = raw
        .full_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| {
            AppError::MalformedResponse("applicant name could not be extracted".to_string())
        })?;

    let topics: Vec<String> = raw
        .topics
        .ok_or_else(|| AppError::MalformedResponse("response has no topics".to_string()))?
        .into_iter()
        .map(|t| t.trim().to_string())
        .collect();

    if topics.iter().any(|t| t.is_empty()) {
        return Err(AppError::MalformedResponse(
            "response contains a blank topic".to_string(),
        ));
    }

    let count = topics.len();
    let topics: [String; TOPIC_COUNT] = topics.try_into().map_err(|_| {
        AppError::MalformedResponse(format!(
            "expected exactly {TOPIC_COUNT} topics, got {count}"
        ))
    })?;

    Ok(CvAnalysis { full_name, topics })
}
