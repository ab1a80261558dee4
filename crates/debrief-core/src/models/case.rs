use serde::{Deserialize, Serialize};

/// Rendered clinical context for one simulated case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseBrief {
    pub patient_id: String,
    pub text: String,
    /// False when the case table had no row for `patient_id` and `text` is
    /// the placeholder.
    pub catalogued: bool,
}

impl CaseBrief {
    /// Render `(field, value)` pairs as `Field: value` lines.
    pub fn from_fields<'a>(
        patient_id: &str,
        fields: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let text = fields
            .into_iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            patient_id: patient_id.trim().to_string(),
            text,
            catalogued: true,
        }
    }

    /// Stand-in used when a trainee references a case that is not in the
    /// case table yet.
    pub fn placeholder(patient_id: &str) -> Self {
        Self {
            patient_id: patient_id.trim().to_string(),
            text: format!("Patient: {patient_id} (no additional context found)"),
            catalogued: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}
