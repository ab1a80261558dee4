use debrief_core::models::feedback::StructuredFeedback;

/// Render structured feedback as the plain-text narrative.
///
/// One `• label: text` line per criterion in the order the model returned
/// them, then (when present) a blank line and `Overall:`, then
/// `Keep going:`. Absent overall fields are left out entirely.
pub fn assemble_narrative(feedback: &StructuredFeedback) -> String {
    let mut lines: Vec<String> = feedback
        .criteria_feedback
        .iter()
        .map(|c| format!("• {}: {}", c.label, c.feedback_text))
        .collect();

    if let Some(summary) = feedback.summary() {
        lines.push(String::new());
        lines.push(format!("Overall: {summary}"));
    }
    if let Some(encouragement) = feedback.encouragement() {
        lines.push(format!("Keep going: {encouragement}"));
    }

    lines.join("\n")
}
