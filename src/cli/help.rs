//! CLI command-name contract for logging and routing.

use crate::cli::parse::{Commands, ConfigCommands, EndpointCommands};

/// Command name string for log records (e.g. "endpoints.set", "spin").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Endpoints { command } => format!("endpoints.{}", endpoint_command_name(command)),
        Commands::Load => "load".to_string(),
        Commands::Refresh => "refresh".to_string(),
        Commands::List { .. } => "list".to_string(),
        Commands::Spin { .. } => "spin".to_string(),
        Commands::Clear { .. } => "clear".to_string(),
        Commands::Config { command } => format!("config.{}", config_command_name(command)),
    }
}

pub fn endpoint_command_name(command: &EndpointCommands) -> &'static str {
    match command {
        EndpointCommands::Show { .. } => "show",
        EndpointCommands::Set { .. } => "set",
        EndpointCommands::Clear => "clear",
    }
}

pub fn config_command_name(command: &ConfigCommands) -> &'static str {
    match command {
        ConfigCommands::Show => "show",
    }
}
