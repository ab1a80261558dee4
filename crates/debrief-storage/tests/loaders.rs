use debrief_core::models::status::FeedbackStatus;
use debrief_core::models::submission::NewSubmission;
use debrief_storage::cases::load_case_brief;
use debrief_storage::error::StorageError;
use debrief_storage::json_file::JsonWorkbook;
use debrief_storage::responses;
use debrief_storage::rubric::load_rubric;
use debrief_storage::table::Table;
use debrief_storage::workbook::{MemoryWorkbook, Workbook, WorkbookData};

const CASE_HEADERS: [&str; 9] = [
    "Patient ID",
    "Age/Sex",
    "Summary of bleep",
    "Obs at time of review",
    "Key examination findings",
    "Relevant results",
    "Red flags",
    "Exemplar management",
    "Expected escalation",
];

fn rubric_table() -> Table {
    Table::new([
        "Criterion",
        "Purpose",
        "Good evidence",
        "Pitfalls",
        "Feedback stems",
    ])
    .with_row([
        "Escalation",
        "Right senior, right time",
        "Names the grade\nStates a time frame",
        "Vague 'inform seniors'",
        "You escalated to {who} | Consider escalating sooner because {why}",
    ])
    .with_row(["", "orphan purpose", "", "", ""])
    .with_row(["Clinical   Reasoning", "Links findings", "", "", ""])
}

fn case_table() -> Table {
    Table::new(CASE_HEADERS).with_row([
        " P001 ",
        "82F",
        "Bleeped for low BP",
        "BP 88/50, HR 112",
        "Dry mucous membranes",
        "Lactate 3.1",
        "Hypotension",
        "Fluids, cultures, antibiotics",
        "Registrar within 30 minutes",
    ])
}

fn responses_table() -> Table {
    Table::new([
        "Timestamp",
        "Email",
        "Patient",
        "Impression",
        "Plan",
        "narrativeFeedback",
        "feedbackEmailStatus",
    ])
    .with_row([
        "2026-01-01",
        "fy1@example.org",
        "P001",
        "Likely UTI",
        "IV fluids, senior review",
    ])
}

fn workbook() -> MemoryWorkbook {
    MemoryWorkbook::new(
        WorkbookData::default()
            .with_table("rubric", rubric_table())
            .with_table("caseContext", case_table())
            .with_table("documentationResponses", responses_table()),
    )
}

#[test]
fn rubric_yields_one_item_per_named_criterion() {
    let items = load_rubric(&workbook(), "rubric").unwrap();
    assert_eq!(items.len(), 2);

    assert_eq!(items[0].id, "escalation");
    assert_eq!(items[0].look_fors, vec!["Names the grade", "States a time frame"]);
    assert_eq!(items[0].stems.len(), 2);

    assert_eq!(items[1].id, "clinical_reasoning");
    assert_eq!(items[1].label, "Clinical   Reasoning");
}

#[test]
fn rubric_with_renamed_column_is_rejected() {
    let mut table = rubric_table();
    table.headers[3] = "Pitfall".to_string();
    let wb = MemoryWorkbook::new(WorkbookData::default().with_table("rubric", table));

    let err = load_rubric(&wb, "rubric").unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("Pitfalls"));
}

#[test]
fn case_brief_matches_trimmed_id() {
    let brief = load_case_brief(&workbook(), "caseContext", "P001").unwrap();
    assert!(brief.catalogued);
    let lines: Vec<_> = brief.text.lines().collect();
    assert_eq!(lines.len(), CASE_HEADERS.len());
    assert_eq!(lines[0], "Patient ID:  P001 ");
    assert_eq!(lines[1], "Age/Sex: 82F");
    assert_eq!(lines[8], "Expected escalation: Registrar within 30 minutes");
}

#[test]
fn unknown_case_gets_placeholder() {
    for id in ["P999", "", "p001"] {
        let brief = load_case_brief(&workbook(), "caseContext", id).unwrap();
        assert!(!brief.catalogued);
        assert!(brief.text.contains(id));
        assert!(brief.text.contains("no additional context found"));
    }
}

#[test]
fn submissions_round_trip_through_status_writes() {
    let wb = workbook();
    let record = responses::read_submission(&wb, "documentationResponses", 2).unwrap();
    assert_eq!(record.patient, "P001");
    assert!(record.is_pending());
    assert_eq!(record.narrative_feedback, "");

    responses::write_narrative(&wb, "documentationResponses", 2, "• Escalation: ok").unwrap();
    responses::write_status(&wb, "documentationResponses", 2, &FeedbackStatus::Sent).unwrap();

    let record = responses::read_submission(&wb, "documentationResponses", 2).unwrap();
    assert!(record.is_processed());
    assert_eq!(record.feedback_email_status, "SENT");

    assert!(matches!(
        responses::read_submission(&wb, "documentationResponses", 9),
        Err(StorageError::RowOutOfRange { row: 9, .. })
    ));
}

#[test]
fn appended_submission_becomes_latest_row() {
    let wb = workbook();
    let row = responses::append_submission(
        &wb,
        "documentationResponses",
        &NewSubmission {
            email: String::new(),
            patient: "P002".to_string(),
            impression: "Sepsis".to_string(),
            plan: "Sepsis six".to_string(),
        },
    )
    .unwrap();
    assert_eq!(row, 3);
    assert_eq!(
        responses::latest_row(&wb, "documentationResponses").unwrap(),
        Some(3)
    );
    let all = responses::read_submissions(&wb, "documentationResponses").unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].plan, "Sepsis six");
    assert_eq!(all[1].recipient(), None);
}

#[test]
fn json_workbook_persists_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workbook.json");
    let data = workbook().snapshot().unwrap();

    let wb = JsonWorkbook::create(&path, &data).unwrap();
    wb.write_cell("documentationResponses", 2, "feedbackEmailStatus", "READY")
        .unwrap();

    let reopened = JsonWorkbook::open(&path).unwrap();
    let record = responses::read_submission(&reopened, "documentationResponses", 2).unwrap();
    assert_eq!(record.feedback_email_status, "READY");
    assert!(!dir.path().join("workbook.json.tmp").exists());
}

#[test]
fn json_workbook_open_fails_for_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = JsonWorkbook::open(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, StorageError::Io { .. }));
}
