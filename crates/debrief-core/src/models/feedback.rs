use serde::{Deserialize, Serialize};

/// The model's structured reply. Only the narrative derived from it is
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredFeedback {
    pub criteria_feedback: Vec<CriterionFeedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_commentary: Option<OverallCommentary>,
}

/// Feedback on a single rubric criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionFeedback {
    /// Should match [`RubricItem::id`](super::rubric::RubricItem::id).
    pub id: String,
    pub label: String,
    pub feedback_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallCommentary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encouragement: Option<String>,
}

impl StructuredFeedback {
    /// Overall summary, if present and non-blank.
    pub fn summary(&self) -> Option<&str> {
        self.overall_commentary
            .as_ref()
            .and_then(|c| c.summary.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    /// Encouragement line, if present and non-blank.
    pub fn encouragement(&self) -> Option<&str> {
        self.overall_commentary
            .as_ref()
            .and_then(|c| c.encouragement.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}
