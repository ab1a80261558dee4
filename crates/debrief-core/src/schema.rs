//! Table and column names the workbook must provide.
//!
//! Lookups are by header name, so columns may be reordered freely, but a
//! renamed header is reported as missing when the table is first read.

/// Default table names.
pub mod table {
    pub const RESPONSES: &str = "documentationResponses";
    pub const RUBRIC: &str = "rubric";
    pub const CASES: &str = "caseContext";
}

/// Columns of the responses table (one row per submission).
pub mod responses {
    pub const EMAIL: &str = "Email";
    pub const PATIENT: &str = "Patient";
    pub const IMPRESSION: &str = "Impression";
    pub const PLAN: &str = "Plan";
    pub const NARRATIVE_FEEDBACK: &str = "narrativeFeedback";
    pub const FEEDBACK_EMAIL_STATUS: &str = "feedbackEmailStatus";

    pub const REQUIRED: &[&str] = &[
        EMAIL,
        PATIENT,
        IMPRESSION,
        PLAN,
        NARRATIVE_FEEDBACK,
        FEEDBACK_EMAIL_STATUS,
    ];
}

/// Columns of the rubric table (one row per criterion).
pub mod rubric {
    pub const CRITERION: &str = "Criterion";
    pub const PURPOSE: &str = "Purpose";
    pub const GOOD_EVIDENCE: &str = "Good evidence";
    pub const PITFALLS: &str = "Pitfalls";
    pub const FEEDBACK_STEMS: &str = "Feedback stems";

    pub const REQUIRED: &[&str] = &[CRITERION, PURPOSE, GOOD_EVIDENCE, PITFALLS, FEEDBACK_STEMS];
}

/// Columns of the case context table (one row per simulated patient).
pub mod cases {
    pub const PATIENT_ID: &str = "Patient ID";

    /// Fields rendered into a case brief, in output order.
    pub const BRIEF_FIELDS: &[&str] = &[
        PATIENT_ID,
        "Age/Sex",
        "Summary of bleep",
        "Obs at time of review",
        "Key examination findings",
        "Relevant results",
        "Red flags",
        "Exemplar management",
        "Expected escalation",
    ];

    pub const REQUIRED: &[&str] = BRIEF_FIELDS;
}

/// Description of one table's expected shape, checked once per read.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub required: &'static [&'static str],
}

impl TableSchema {
    pub const fn responses() -> Self {
        Self {
            required: responses::REQUIRED,
        }
    }

    pub const fn rubric() -> Self {
        Self {
            required: rubric::REQUIRED,
        }
    }

    pub const fn cases() -> Self {
        Self {
            required: cases::REQUIRED,
        }
    }
}
