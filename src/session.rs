//! Quiz Session
//!
//! Host-side orchestration: startup loading (store first, network otherwise), settings saves,
//! spins, and write-back of picks. The in-memory collection is a working copy; every mutation
//! goes through the store first.

use crate::aggregate::Aggregator;
use crate::config::QuizConfig;
use crate::error::ApiError;
use crate::liveness::Liveness;
use crate::normalize::{IdentityScheme, Normalizer, RunToken};
use crate::source::QuestionSource;
use crate::store::QuizStore;
use crate::types::Question;
use crate::wheel::{PickedEvent, SpinDriver, SpinEngine, SpinOutcome, SpinSettings};
use parking_lot::{Mutex, RwLock};
use rand::Rng;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Where a load got its collection from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadSource {
    /// Seeded from the durable store; no network activity.
    Store,
    /// Fetched, normalized, and persisted.
    Network { endpoints: usize, failed: usize },
    /// Nothing stored and no endpoints configured.
    Empty,
    /// A newer load or a shutdown invalidated this one; nothing was applied.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub source: LoadSource,
    pub count: usize,
}

impl LoadReport {
    fn superseded() -> Self {
        Self {
            source: LoadSource::Superseded,
            count: 0,
        }
    }
}

pub struct QuizSession {
    store: Arc<dyn QuizStore>,
    aggregator: Aggregator,
    normalizer: Normalizer,
    questions: RwLock<Vec<Question>>,
    engine: Mutex<SpinEngine>,
    driver: SpinDriver,
    current_load: Mutex<Liveness>,
    current_spin: Mutex<Liveness>,
}

impl QuizSession {
    pub fn new(store: Arc<dyn QuizStore>, source: Arc<dyn QuestionSource>) -> Self {
        Self::with_parts(
            store,
            source,
            Normalizer::default(),
            SpinSettings::default(),
            DEFAULT_FRAME_INTERVAL,
        )
    }

    pub fn from_config(
        store: Arc<dyn QuizStore>,
        source: Arc<dyn QuestionSource>,
        config: &QuizConfig,
    ) -> Self {
        Self::with_parts(
            store,
            source,
            Normalizer::with_scheme(config.identity.scheme),
            config.wheel.spin_settings(),
            config.wheel.frame_interval(),
        )
    }

    pub fn with_parts(
        store: Arc<dyn QuizStore>,
        source: Arc<dyn QuestionSource>,
        normalizer: Normalizer,
        spin_settings: SpinSettings,
        frame_interval: Duration,
    ) -> Self {
        Self {
            store,
            aggregator: Aggregator::new(source),
            normalizer,
            questions: RwLock::new(Vec::new()),
            engine: Mutex::new(SpinEngine::new(spin_settings)),
            driver: SpinDriver::new(frame_interval),
            current_load: Mutex::new(Liveness::new()),
            current_spin: Mutex::new(Liveness::new()),
        }
    }

    /// Snapshot of the working collection.
    pub fn questions(&self) -> Vec<Question> {
        self.questions.read().clone()
    }

    pub fn unread_count(&self) -> usize {
        self.questions.read().iter().filter(|q| !q.is_read).count()
    }

    pub fn is_spinning(&self) -> bool {
        self.engine.lock().is_spinning()
    }

    pub fn can_spin(&self) -> bool {
        let questions = self.questions.read();
        self.engine.lock().can_spin(&questions)
    }

    pub fn endpoints(&self) -> Result<Vec<String>, ApiError> {
        Ok(self.store.get_endpoints()?)
    }

    /// Startup sequence. A populated store seeds the collection without touching the
    /// network; otherwise the configured endpoints are fetched and the result persisted.
    ///
    /// On storage failure the collection falls back to empty and the error is returned.
    pub async fn load(&self) -> Result<LoadReport, ApiError> {
        let liveness = self.begin_load();

        let stored = match self.store.get_all_questions() {
            Ok(stored) => stored,
            Err(err) => return Err(self.fail_load(&liveness, err.to_string())),
        };
        if !liveness.is_alive() {
            return Ok(LoadReport::superseded());
        }
        if !stored.is_empty() {
            let count = stored.len();
            info!(count, "collection seeded from store");
            *self.questions.write() = stored;
            return Ok(LoadReport {
                source: LoadSource::Store,
                count,
            });
        }

        match self.fetch_and_install(&liveness, false).await {
            Ok(report) => Ok(report),
            Err(err) => Err(self.fail_load(&liveness, err.to_string())),
        }
    }

    /// Re-fetch from the configured endpoints regardless of what is stored.
    ///
    /// When every endpoint fails the current collection is kept and an error is returned.
    /// Any other failure also leaves the collection untouched. Installing a new collection
    /// cancels a spin in flight.
    pub async fn refresh(&self) -> Result<LoadReport, ApiError> {
        let liveness = self.begin_load();
        self.fetch_and_install(&liveness, true).await
    }

    /// Persist a new endpoint list (which clears stored questions), then load from it.
    ///
    /// A failed save leaves persisted endpoints and the collection untouched.
    pub async fn save_endpoints<S: AsRef<str>>(&self, endpoints: &[S]) -> Result<LoadReport, ApiError> {
        let raw: Vec<String> = endpoints.iter().map(|e| e.as_ref().to_string()).collect();
        let saved = self.store.set_endpoints(&raw).map_err(|err| {
            error!(error = %err, "endpoint save failed");
            ApiError::SettingsSave(err.to_string())
        })?;
        info!(endpoints = saved.len(), "endpoints saved");

        self.abandon_spin();
        self.questions.write().clear();
        self.load().await
    }

    /// Clear the stored and in-memory collection.
    pub fn clear_questions(&self) -> Result<(), ApiError> {
        self.store.clear_questions()?;
        self.abandon_spin();
        self.questions.write().clear();
        info!("question collection cleared");
        Ok(())
    }

    /// Run one spin to completion and write the pick back through the store.
    ///
    /// Returns [`SpinOutcome::Rejected`] when a spin is already running or nothing is
    /// unread, and [`SpinOutcome::Cancelled`] when the session shut down mid-spin.
    pub async fn spin<R, F>(&self, rng: &mut R, on_frame: F) -> Result<SpinOutcome, ApiError>
    where
        R: Rng + ?Sized,
        F: FnMut(f64),
    {
        let liveness = {
            let questions = self.questions.read();
            let mut engine = self.engine.lock();
            if engine.start(&questions, rng).is_none() {
                return Ok(SpinOutcome::Rejected);
            }
            let liveness = Liveness::new();
            *self.current_spin.lock() = liveness.clone();
            liveness
        };

        let outcome = self.driver.drive(&self.engine, &liveness, on_frame).await;
        match outcome {
            SpinOutcome::Picked(event) if liveness.is_alive() => {
                self.apply_pick(&event)?;
                Ok(SpinOutcome::Picked(event))
            }
            SpinOutcome::Picked(event) => {
                debug!(question_id = %event.question.id, "pick arrived after shutdown; dropped");
                Ok(SpinOutcome::Cancelled)
            }
            other => Ok(other),
        }
    }

    /// Mark the picked question read in the store, then in the working copy.
    pub fn apply_pick(&self, event: &PickedEvent) -> Result<bool, ApiError> {
        self.mark_read(&event.question.id)
    }

    pub fn mark_read(&self, id: &str) -> Result<bool, ApiError> {
        if !self.store.mark_read(id)? {
            debug!(question_id = %id, "mark_read on unknown id ignored");
            return Ok(false);
        }
        if let Some(question) = self.questions.write().iter_mut().find(|q| q.id == id) {
            question.is_read = true;
        }
        Ok(true)
    }

    /// Invalidate in-flight loads and spins. Their results are dropped when they finish.
    pub fn shutdown(&self) {
        self.current_load.lock().invalidate();
        self.abandon_spin();
        debug!("session shut down");
    }

    fn begin_load(&self) -> Liveness {
        let fresh = Liveness::new();
        let previous = std::mem::replace(&mut *self.current_load.lock(), fresh.clone());
        previous.invalidate();
        fresh
    }

    fn abandon_spin(&self) {
        self.current_spin.lock().invalidate();
        self.engine.lock().cancel();
    }

    fn fail_load(&self, liveness: &Liveness, reason: String) -> ApiError {
        error!(error = %reason, "load failed");
        if liveness.is_alive() {
            self.questions.write().clear();
        }
        ApiError::LoadFailed(reason)
    }

    async fn fetch_and_install(
        &self,
        liveness: &Liveness,
        keep_on_total_failure: bool,
    ) -> Result<LoadReport, ApiError> {
        let endpoints = self.store.get_endpoints()?;
        if endpoints.is_empty() {
            if !liveness.is_alive() {
                return Ok(LoadReport::superseded());
            }
            self.store.replace_questions(&[])?;
            self.abandon_spin();
            self.questions.write().clear();
            debug!("no endpoints configured");
            return Ok(LoadReport {
                source: LoadSource::Empty,
                count: 0,
            });
        }

        let report = self.aggregator.fetch_all_with_report(&endpoints).await;
        if !liveness.is_alive() {
            debug!("load superseded; discarding fetched records");
            return Ok(LoadReport::superseded());
        }
        if keep_on_total_failure && report.all_failed() {
            warn!(endpoints = endpoints.len(), "every source failed; keeping current collection");
            return Err(ApiError::LoadFailed(format!(
                "all {} sources failed",
                endpoints.len()
            )));
        }

        let mut questions = self
            .normalizer
            .normalize_records(&report.records, RunToken::next());
        if self.normalizer.scheme() == IdentityScheme::Content {
            carry_read_flags(&mut questions, &self.questions.read());
        }

        self.store.replace_questions(&questions)?;
        let count = questions.len();
        self.abandon_spin();
        *self.questions.write() = questions;

        let failed = report.failed_count();
        info!(count, endpoints = endpoints.len(), failed, "collection fetched");
        Ok(LoadReport {
            source: LoadSource::Network {
                endpoints: endpoints.len(),
                failed,
            },
            count,
        })
    }
}

// Stable ids make read state meaningful across fetches.
fn carry_read_flags(fresh: &mut [Question], previous: &[Question]) {
    let read: HashSet<&str> = previous
        .iter()
        .filter(|q| q.is_read)
        .map(|q| q.id.as_str())
        .collect();
    for question in fresh.iter_mut().filter(|q| read.contains(q.id.as_str())) {
        question.is_read = true;
    }
}
