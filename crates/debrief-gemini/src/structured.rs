//! Parsing and validating the model's structured feedback.

use std::collections::HashSet;

use debrief_core::models::feedback::StructuredFeedback;
use debrief_core::models::rubric::RubricItem;
use tracing::warn;

use crate::client::TextGenerator;
use crate::error::GeminiError;
use crate::prompt::repair_prompt;

/// One original request plus one repair attempt.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

// Hard limits, looser than the advisory ones in the prompt.
const MAX_FEEDBACK_CHARS: usize = 1200;
const MAX_SUMMARY_WORDS: usize = 250;
const MAX_ENCOURAGEMENT_WORDS: usize = 60;

/// Ask the model for feedback and return it once it parses and validates.
///
/// A reply that breaks the JSON contract is retried with a repair prompt
/// while attempts remain. Credential and remote errors are returned
/// immediately.
pub async fn request_structured_feedback(
    generator: &dyn TextGenerator,
    prompt: &str,
    rubric: &[RubricItem],
    max_attempts: u32,
) -> Result<StructuredFeedback, GeminiError> {
    let max_attempts = max_attempts.max(1);
    let mut next_prompt = prompt.to_string();
    let mut attempt = 1;

    loop {
        let reply = generator.generate_json_text(&next_prompt).await?;
        match parse_feedback(&reply, rubric) {
            Ok(feedback) => return Ok(feedback),
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(e) => {
                warn!(
                    attempt,
                    model = generator.model(),
                    error = %e,
                    "model reply rejected, retrying with repair prompt"
                );
                next_prompt = repair_prompt(prompt, &reply, &e.to_string());
                attempt += 1;
            }
        }
    }
}

/// Parse a reply into [`StructuredFeedback`] and validate it.
pub fn parse_feedback(reply: &str, rubric: &[RubricItem]) -> Result<StructuredFeedback, GeminiError> {
    let feedback: StructuredFeedback = serde_json::from_str(strip_code_fence(reply))
        .map_err(|e| GeminiError::ResponseFormat(format!("reply does not match schema: {e}")))?;
    validate_feedback(&feedback, rubric)?;
    Ok(feedback)
}

/// Check the bounds the narrative relies on.
///
/// Mismatched or missing criterion ids are logged but tolerated: the
/// narrative is still useful when the model relabels a criterion.
pub fn validate_feedback(
    feedback: &StructuredFeedback,
    rubric: &[RubricItem],
) -> Result<(), GeminiError> {
    if feedback.criteria_feedback.is_empty() {
        if !rubric.is_empty() {
            return Err(GeminiError::ResponseFormat(format!(
                "criteria_feedback is empty, expected {} criteria",
                rubric.len()
            )));
        }
        if feedback.summary().is_none() && feedback.encouragement().is_none() {
            return Err(GeminiError::ResponseFormat(
                "reply contains no feedback".to_string(),
            ));
        }
    }

    for (i, item) in feedback.criteria_feedback.iter().enumerate() {
        if item.label.trim().is_empty() {
            return Err(GeminiError::ResponseFormat(format!(
                "criteria_feedback[{i}] has an empty label"
            )));
        }
        if item.feedback_text.trim().is_empty() {
            return Err(GeminiError::ResponseFormat(format!(
                "criteria_feedback[{i}] ({}) has empty feedback_text",
                item.label
            )));
        }
        let chars = item.feedback_text.chars().count();
        if chars > MAX_FEEDBACK_CHARS {
            return Err(GeminiError::ResponseFormat(format!(
                "criteria_feedback[{i}] ({}) feedback_text is {chars} characters, limit {MAX_FEEDBACK_CHARS}",
                item.label
            )));
        }
    }

    if let Some(summary) = feedback.summary() {
        let words = summary.split_whitespace().count();
        if words > MAX_SUMMARY_WORDS {
            return Err(GeminiError::ResponseFormat(format!(
                "summary is {words} words, limit {MAX_SUMMARY_WORDS}"
            )));
        }
    }
    if let Some(encouragement) = feedback.encouragement() {
        let words = encouragement.split_whitespace().count();
        if words > MAX_ENCOURAGEMENT_WORDS {
            return Err(GeminiError::ResponseFormat(format!(
                "encouragement is {words} words, limit {MAX_ENCOURAGEMENT_WORDS}"
            )));
        }
    }

    let known: HashSet<&str> = rubric.iter().map(|r| r.id.as_str()).collect();
    let returned: HashSet<&str> = feedback
        .criteria_feedback
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    for id in returned.difference(&known) {
        warn!(id, "model returned feedback for an unknown criterion id");
    }
    for id in known.difference(&returned) {
        warn!(id, "model returned no feedback for criterion");
    }

    Ok(())
}

/// Strip a surrounding Markdown code fence, which models sometimes add
/// despite being asked not to.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    match body.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_fences_are_stripped() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```{}"), "```{}");
    }

    #[test]
    fn replies_without_feedback_are_rejected() {
        let rubric = vec![RubricItem::from_cells("Escalation", "", "", "", "")];

        let err = parse_feedback(r#"{"criteria_feedback":[]}"#, &rubric).unwrap_err();
        assert!(err.is_response_format());
        assert!(err.to_string().contains("expected 1 criteria"));

        let err = parse_feedback(r#"{"criteria_feedback":[]}"#, &[]).unwrap_err();
        assert!(err.to_string().contains("no feedback"));

        let summary_only = r#"{"criteria_feedback":[],"overall_commentary":{"summary":"Clear plan."}}"#;
        assert!(parse_feedback(summary_only, &[]).is_ok());
    }
}
