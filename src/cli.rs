//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the session.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, ConfigCommands, EndpointCommands};
pub use presentation::{
    format_endpoints_json, format_endpoints_text, format_load_report, format_pick,
    format_question_list_json, format_question_list_text, format_section_heading,
    format_spin_frame,
};
pub use route::RunContext;
