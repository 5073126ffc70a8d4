//! Selection engine state machine.
//!
//! `Idle --start--> Spinning --advance(complete)--> Idle`. The only random decisions of a run
//! are made in [`SpinEngine::start`]; everything after that is a pure function of elapsed
//! time. Completion yields exactly one [`PickedEvent`]; cancellation yields none.

use crate::types::{unread_indices, Question};
use crate::wheel::easing::{segment_under_pointer, SpinTrajectory};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Timing and energy of a spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinSettings {
    pub duration: Duration,
    pub min_extra_revolutions: u32,
    pub max_extra_revolutions: u32,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(4000),
            min_extra_revolutions: 4,
            max_extra_revolutions: 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinState {
    Idle,
    Spinning,
}

/// The result of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickedEvent {
    pub question: Question,
    pub index: usize,
    pub final_rotation: f64,
}

/// What a freshly started run is going to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    pub selected: usize,
    pub extra_revolutions: u32,
    pub trajectory: SpinTrajectory,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpinStep {
    /// Intermediate rotation sample.
    Progress(f64),
    /// Final sample; the engine is back to idle.
    Picked(PickedEvent),
}

#[derive(Debug, Clone)]
struct SpinRun {
    plan: SpinPlan,
    question: Question,
}

#[derive(Debug, Clone)]
pub struct SpinEngine {
    settings: SpinSettings,
    rotation: f64,
    run: Option<SpinRun>,
}

impl SpinEngine {
    pub fn new(settings: SpinSettings) -> Self {
        Self {
            settings,
            rotation: 0.0,
            run: None,
        }
    }

    pub fn settings(&self) -> SpinSettings {
        self.settings
    }

    pub fn state(&self) -> SpinState {
        if self.run.is_some() {
            SpinState::Spinning
        } else {
            SpinState::Idle
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.run.is_some()
    }

    /// Last sampled rotation, in degrees.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Index of the segment currently at the pointer on a wheel of `count` segments.
    pub fn segment_under_pointer(&self, count: usize) -> usize {
        segment_under_pointer(self.rotation, count)
    }

    pub fn can_spin(&self, questions: &[Question]) -> bool {
        !self.is_spinning() && questions.iter().any(|q| !q.is_read)
    }

    /// Leave `Idle` and begin a run over `questions`.
    ///
    /// Returns `None` without changing state when already spinning or when every question
    /// is read.
    pub fn start<R: Rng + ?Sized>(&mut self, questions: &[Question], rng: &mut R) -> Option<SpinPlan> {
        if self.is_spinning() {
            debug!("spin rejected: already spinning");
            return None;
        }
        let unread = unread_indices(questions);
        if unread.is_empty() {
            debug!("spin rejected: no unread questions");
            return None;
        }

        let selected = unread[rng.random_range(0..unread.len())];
        let (low, high) = (
            self.settings.min_extra_revolutions,
            self.settings.max_extra_revolutions.max(self.settings.min_extra_revolutions),
        );
        let extra_revolutions = rng.random_range(low..=high);

        let trajectory = SpinTrajectory::plan(
            self.rotation,
            selected,
            questions.len(),
            extra_revolutions,
            self.settings.duration,
        );
        let plan = SpinPlan {
            selected,
            extra_revolutions,
            trajectory,
        };
        debug!(
            selected,
            unread = unread.len(),
            total = questions.len(),
            extra_revolutions,
            "spin started"
        );
        self.run = Some(SpinRun {
            plan,
            question: questions[selected].clone(),
        });
        Some(plan)
    }

    /// Sample the run at `elapsed` since it started. `None` while idle.
    pub fn advance(&mut self, elapsed: Duration) -> Option<SpinStep> {
        let run = self.run.as_ref()?;
        let rotation = run.plan.trajectory.sample(elapsed);
        self.rotation = rotation;

        if !run.plan.trajectory.is_complete(elapsed) {
            return Some(SpinStep::Progress(rotation));
        }

        let run = self.run.take()?;
        debug!(question_id = %run.question.id, "spin completed");
        Some(SpinStep::Picked(PickedEvent {
            question: run.question,
            index: run.plan.selected,
            final_rotation: rotation,
        }))
    }

    /// Abandon the current run without an event. Returns whether a run was in flight.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.run.take().is_some();
        if cancelled {
            debug!(rotation = self.rotation, "spin cancelled");
        }
        cancelled
    }
}

impl Default for SpinEngine {
    fn default() -> Self {
        Self::new(SpinSettings::default())
    }
}
