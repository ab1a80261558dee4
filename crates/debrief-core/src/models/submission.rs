use serde::{Deserialize, Serialize};

/// One row of the responses table.
///
/// `row` uses spreadsheet numbering: the header is row 1 and the first
/// submission is row 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub row: usize,
    pub email: String,
    pub patient: String,
    pub impression: String,
    pub plan: String,
    pub narrative_feedback: String,
    pub feedback_email_status: String,
}

impl SubmissionRecord {
    /// A narrative has already been written; the row must not be
    /// processed again.
    pub fn is_processed(&self) -> bool {
        !self.narrative_feedback.trim().is_empty()
    }

    /// Picked up by the sweep: there is a plan to review and no narrative.
    pub fn is_pending(&self) -> bool {
        !self.plan.trim().is_empty() && !self.is_processed()
    }

    /// Trimmed email address, if one was given.
    pub fn recipient(&self) -> Option<&str> {
        let email = self.email.trim();
        (!email.is_empty()).then_some(email)
    }
}

/// A new submission as captured by the intake form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubmission {
    #[serde(default)]
    pub email: String,
    pub patient: String,
    #[serde(default)]
    pub impression: String,
    #[serde(default)]
    pub plan: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(plan: &str, narrative: &str, email: &str) -> SubmissionRecord {
        SubmissionRecord {
            row: 2,
            email: email.to_string(),
            patient: "P001".to_string(),
            impression: "Likely UTI".to_string(),
            plan: plan.to_string(),
            narrative_feedback: narrative.to_string(),
            feedback_email_status: String::new(),
        }
    }

    #[test]
    fn whitespace_narrative_counts_as_empty() {
        assert!(!record("IV fluids", "  \n", "").is_processed());
        assert!(record("IV fluids", "• done", "").is_processed());
    }

    #[test]
    fn pending_requires_plan_and_no_narrative() {
        assert!(record("IV fluids", "", "").is_pending());
        assert!(!record("   ", "", "").is_pending());
        assert!(!record("IV fluids", "• done", "").is_pending());
    }

    #[test]
    fn recipient_is_trimmed() {
        assert_eq!(record("", "", " fy1@example.org ").recipient(), Some("fy1@example.org"));
        assert_eq!(record("", "", "  ").recipient(), None);
    }
}
