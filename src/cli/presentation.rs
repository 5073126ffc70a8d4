//! CLI presentation: text and json formatters per command family.

mod endpoints;
mod questions;
mod shared;

pub use endpoints::{format_endpoints_json, format_endpoints_text};
pub use questions::{
    format_load_report, format_pick, format_question_list_json, format_question_list_text,
    format_spin_frame,
};
pub use shared::format_section_heading;
