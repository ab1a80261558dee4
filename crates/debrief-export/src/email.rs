use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use crate::error::ExportError;

/// HTML body: the escaped narrative with line breaks preserved.
const HTML_BODY_TEMPLATE: &str = "{{ narrative | escape | linebreaksbr | safe }}";

/// Subject and bodies of a feedback email, ready for a mailer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEmail {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Subject line: `<prefix> <case-id>`.
pub fn feedback_subject(prefix: &str, patient_id: &str) -> String {
    format!("{} {}", prefix.trim(), patient_id.trim())
}

/// Render the narrative as an HTML email body.
pub fn render_html_body(narrative: &str) -> Result<String, ExportError> {
    let mut context = Context::new();
    context.insert("narrative", narrative);
    Ok(Tera::one_off(HTML_BODY_TEMPLATE, &context, false)?)
}

pub fn render_feedback_email(
    subject_prefix: &str,
    patient_id: &str,
    narrative: &str,
) -> Result<RenderedEmail, ExportError> {
    let email = RenderedEmail {
        subject: feedback_subject(subject_prefix, patient_id),
        html_body: render_html_body(narrative)?,
        text_body: narrative.to_string(),
    };
    debug!(
        patient_id,
        subject = %email.subject,
        html_bytes = email.html_body.len(),
        "feedback email rendered"
    );
    Ok(email)
}
