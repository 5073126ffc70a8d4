//! Question collection, load, and spin formatters.

use crate::cli::presentation::shared::{format_section_heading, to_pretty_json, truncate};
use crate::error::ApiError;
use crate::session::{LoadReport, LoadSource};
use crate::types::Question;
use crate::wheel::{segment_under_pointer, PickedEvent};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

const TITLE_WIDTH: usize = 60;
const DESCRIPTION_WIDTH: usize = 40;

/// Format the collection as a table with a colored read state column.
pub fn format_question_list_text(questions: &[Question]) -> String {
    if questions.is_empty() {
        return "No questions.".to_string();
    }
    let unread = questions.iter().filter(|q| !q.is_read).count();
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "State", "Title", "Description"]);
    for (i, question) in questions.iter().enumerate() {
        let state = if question.is_read {
            format!("{}", "read".dimmed())
        } else {
            format!("{}", "unread".green())
        };
        table.add_row(vec![
            (i + 1).to_string(),
            state,
            truncate(&question.title, TITLE_WIDTH),
            truncate(&question.description, DESCRIPTION_WIDTH),
        ]);
    }
    format!(
        "{}\n\n{}\n\n{} questions, {} unread",
        format_section_heading("Questions"),
        table,
        questions.len(),
        unread
    )
}

pub fn format_question_list_json(questions: &[Question]) -> Result<String, ApiError> {
    let unread = questions.iter().filter(|q| !q.is_read).count();
    to_pretty_json(&json!({
        "questions": questions,
        "total": questions.len(),
        "unread": unread,
    }))
}

pub fn format_load_report(report: &LoadReport) -> String {
    match report.source {
        LoadSource::Store => format!("Loaded {} questions from the store", report.count),
        LoadSource::Network { endpoints, failed } if failed == 0 => format!(
            "Fetched {} questions from {} endpoint(s)",
            report.count, endpoints
        ),
        LoadSource::Network { endpoints, failed } => format!(
            "Fetched {} questions from {} endpoint(s); {} failed",
            report.count,
            endpoints - failed,
            failed
        ),
        LoadSource::Empty => {
            "No questions stored and no endpoints configured".to_string()
        }
        LoadSource::Superseded => "Load superseded; nothing applied".to_string(),
    }
}

/// One progress line: rotation and the title currently at the pointer.
pub fn format_spin_frame(rotation: f64, questions: &[Question]) -> String {
    let under = questions
        .get(segment_under_pointer(rotation, questions.len()))
        .map(|q| truncate(&q.title, TITLE_WIDTH))
        .unwrap_or_default();
    format!("{:>9.1}°  {}", rotation, under)
}

pub fn format_pick(event: &PickedEvent, unread_left: usize) -> String {
    let mut out = format!(
        "{}\n\n  {}\n",
        format_section_heading("Picked"),
        event.question.title.bold()
    );
    if !event.question.description.is_empty() {
        out.push_str(&format!("\n  {}\n", event.question.description));
    }
    out.push_str(&format!("\n{} unread left", unread_left));
    out
}
