//! CLI route: single route table and run context. Dispatches to the session and presentation.

use crate::cli::help::command_name;
use crate::cli::parse::{Commands, ConfigCommands, EndpointCommands};
use crate::cli::presentation::{
    format_endpoints_json, format_endpoints_text, format_load_report, format_pick,
    format_question_list_json, format_question_list_text, format_spin_frame,
};
use crate::config::{ConfigLoader, QuizConfig};
use crate::error::{ApiError, StorageError};
use crate::session::QuizSession;
use crate::source::HttpQuestionSource;
use crate::store::{QuizStore, SledQuizStore};
use crate::wheel::SpinOutcome;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::{debug, info};

/// Runtime context for CLI execution: effective config, the opened store, the HTTP source,
/// and the runtime the async core runs on.
pub struct RunContext {
    config: QuizConfig,
    store: Arc<SledQuizStore>,
    source: Arc<HttpQuestionSource>,
    runtime: Runtime,
    store_path: PathBuf,
}

impl RunContext {
    /// Create run context from an optional config path and store override. Uses
    /// ConfigLoader only.
    pub fn new(config_path: Option<PathBuf>, store_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let mut config = ConfigLoader::load(config_path.as_deref())?;
        if let Some(path) = store_path {
            config.storage.path = Some(path);
        }
        let store_path = config.storage.resolve_path()?;

        std::fs::create_dir_all(&store_path)
            .map_err(|e| ApiError::StorageError(StorageError::IoError(e)))?;
        let store = Arc::new(SledQuizStore::open(&store_path)?);
        let source = Arc::new(HttpQuestionSource::new(&config.http)?);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to start async runtime: {}", e)))?;

        debug!(store = %store_path.display(), "run context ready");
        Ok(Self {
            config,
            store,
            source,
            runtime,
            store_path,
        })
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn store_path(&self) -> &PathBuf {
        &self.store_path
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let name = command_name(command);
        info!(command = %name, "command started");
        let result = self.execute_inner(command);
        info!(
            command = %name,
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        let session = self.session(&self.config);
        match command {
            Commands::Endpoints { command } => self.handle_endpoints_command(&session, command),
            Commands::Load => {
                let report = self.runtime.block_on(session.load())?;
                Ok(format_load_report(&report))
            }
            Commands::Refresh => {
                let report = self.runtime.block_on(session.refresh())?;
                Ok(format_load_report(&report))
            }
            Commands::List { unread, format } => {
                self.runtime.block_on(session.load())?;
                let questions: Vec<_> = session
                    .questions()
                    .into_iter()
                    .filter(|q| !*unread || !q.is_read)
                    .collect();
                if format == "json" {
                    format_question_list_json(&questions)
                } else {
                    Ok(format_question_list_text(&questions))
                }
            }
            Commands::Spin { seed, quick } => self.handle_spin(*seed, *quick),
            Commands::Clear { yes } => self.handle_clear(&session, *yes),
            Commands::Config { command } => match command {
                ConfigCommands::Show => self.config.to_toml(),
            },
        }
    }

    fn session(&self, config: &QuizConfig) -> QuizSession {
        let store: Arc<dyn QuizStore> = self.store.clone();
        QuizSession::from_config(store, self.source.clone(), config)
    }

    fn handle_endpoints_command(
        &self,
        session: &QuizSession,
        command: &EndpointCommands,
    ) -> Result<String, ApiError> {
        match command {
            EndpointCommands::Show { format } => {
                let endpoints = session.endpoints()?;
                if format == "json" {
                    format_endpoints_json(&endpoints)
                } else {
                    Ok(format_endpoints_text(&endpoints))
                }
            }
            EndpointCommands::Set { urls } => {
                let report = self.runtime.block_on(session.save_endpoints(urls.as_slice()))?;
                let saved = session.endpoints()?;
                Ok(format!(
                    "Saved {} endpoint(s)\n{}",
                    saved.len(),
                    format_load_report(&report)
                ))
            }
            EndpointCommands::Clear => {
                self.runtime.block_on(session.save_endpoints::<String>(&[]))?;
                Ok("Endpoints cleared".to_string())
            }
        }
    }

    fn handle_spin(&self, seed: Option<u64>, quick: bool) -> Result<String, ApiError> {
        let session = if quick {
            let mut config = self.config.clone();
            config.wheel.duration_ms = 0;
            self.session(&config)
        } else {
            self.session(&self.config)
        };
        self.runtime.block_on(session.load())?;

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let questions = session.questions();
        let animate = !quick && std::io::stderr().is_terminal();

        let outcome = self.runtime.block_on(session.spin(&mut rng, |rotation| {
            if animate {
                let mut stderr = std::io::stderr();
                let _ = write!(stderr, "\r{}\x1b[K", format_spin_frame(rotation, &questions));
                let _ = stderr.flush();
            }
        }))?;
        if animate {
            eprintln!();
        }

        match outcome {
            SpinOutcome::Picked(event) => Ok(format_pick(&event, session.unread_count())),
            SpinOutcome::Rejected if questions.is_empty() => {
                Ok("No questions loaded. Configure endpoints with `quizwheel endpoints set`."
                    .to_string())
            }
            SpinOutcome::Rejected => Ok("Every question has been read.".to_string()),
            SpinOutcome::Cancelled => Ok("Spin cancelled".to_string()),
        }
    }

    fn handle_clear(&self, session: &QuizSession, yes: bool) -> Result<String, ApiError> {
        if !yes {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt("Delete every stored question?")
                .default(false)
                .interact()
                .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?;

            if !confirmed {
                return Ok("Clear cancelled".to_string());
            }
        }

        session.clear_questions()?;
        Ok("Questions cleared".to_string())
    }
}

impl Drop for RunContext {
    fn drop(&mut self) {
        if let Err(e) = self.store.flush() {
            tracing::warn!(error = %e, "store flush on exit failed");
        }
    }
}
