use serde::{Deserialize, Serialize};

/// One grading criterion from the rubric table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricItem {
    /// Normalised token, e.g. `"clinical_reasoning"`. The model is asked to
    /// echo this back in its feedback objects.
    pub id: String,
    pub label: String,
    pub purpose: String,
    pub look_fors: Vec<String>,
    pub pitfalls: Vec<String>,
    /// Template feedback sentences; the model adapts exactly one.
    pub stems: Vec<String>,
}

impl RubricItem {
    /// Build an item from raw cell text. Multi-entry cells are split with
    /// [`split_entries`].
    pub fn from_cells(
        criterion: &str,
        purpose: &str,
        good_evidence: &str,
        pitfalls: &str,
        stems: &str,
    ) -> Self {
        let label = criterion.trim().to_string();
        Self {
            id: criterion_id(&label),
            label,
            purpose: purpose.trim().to_string(),
            look_fors: split_entries(good_evidence),
            pitfalls: split_entries(pitfalls),
            stems: split_entries(stems),
        }
    }
}

/// Normalise a criterion label into its id: lower-cased, whitespace runs
/// collapsed into a single underscore.
pub fn criterion_id(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Split a multi-entry cell on newlines or `" | "`, trimming each entry and
/// dropping empties.
pub fn split_entries(cell: &str) -> Vec<String> {
    cell.split('\n')
        .flat_map(|line| line.split(" | "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_collapses_whitespace_runs() {
        assert_eq!(criterion_id("Escalation"), "escalation");
        assert_eq!(criterion_id("Clinical   Reasoning"), "clinical_reasoning");
        assert_eq!(criterion_id("  Safety\tnetting plan "), "safety_netting_plan");
    }

    #[test]
    fn entries_split_on_newline_and_spaced_pipe() {
        let cell = "Checks obs | Reviews bloods\n\n  Documents escalation  \r\nA|B";
        assert_eq!(
            split_entries(cell),
            vec!["Checks obs", "Reviews bloods", "Documents escalation", "A|B"]
        );
    }

    #[test]
    fn empty_cell_has_no_entries() {
        assert!(split_entries("").is_empty());
        assert!(split_entries(" \n | \n").is_empty());
    }

    #[test]
    fn from_cells_trims_label_and_derives_id() {
        let item = RubricItem::from_cells(
            "  Escalation Plan ",
            " Who and when ",
            "Names grade | States timing",
            "",
            "You escalated {x}.",
        );
        assert_eq!(item.id, "escalation_plan");
        assert_eq!(item.label, "Escalation Plan");
        assert_eq!(item.purpose, "Who and when");
        assert_eq!(item.look_fors, vec!["Names grade", "States timing"]);
        assert!(item.pitfalls.is_empty());
        assert_eq!(item.stems, vec!["You escalated {x}."]);
    }
}
