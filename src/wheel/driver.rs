//! Frame-paced driver for the selection engine.
//!
//! Samples a running [`SpinEngine`] once per frame on a tokio interval until the run
//! completes or its liveness flag is invalidated. Dropping the driving future mid-run cancels
//! the run as well, so an abandoned spin can never surface as a pick.

use crate::liveness::Liveness;
use crate::wheel::engine::{PickedEvent, SpinEngine, SpinStep};
use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::debug;

const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, PartialEq)]
pub enum SpinOutcome {
    Picked(PickedEvent),
    /// The engine refused to start (already spinning or nothing unread).
    Rejected,
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
pub struct SpinDriver {
    frame_interval: Duration,
}

impl SpinDriver {
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            frame_interval: frame_interval.max(MIN_FRAME_INTERVAL),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Drive an already started run to its end, reporting each sampled rotation to
    /// `on_frame`. The final frame reports the exact target rotation.
    pub async fn drive<F>(
        &self,
        engine: &Mutex<SpinEngine>,
        liveness: &Liveness,
        mut on_frame: F,
    ) -> SpinOutcome
    where
        F: FnMut(f64),
    {
        let mut guard = CancelOnDrop {
            engine,
            armed: true,
        };
        let started = Instant::now();
        let mut ticker = interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if !liveness.is_alive() {
                engine.lock().cancel();
                guard.armed = false;
                return SpinOutcome::Cancelled;
            }

            let step = engine.lock().advance(started.elapsed());
            match step {
                Some(SpinStep::Progress(rotation)) => on_frame(rotation),
                Some(SpinStep::Picked(event)) => {
                    guard.armed = false;
                    on_frame(event.final_rotation);
                    return SpinOutcome::Picked(event);
                }
                None => {
                    guard.armed = false;
                    debug!("engine went idle while driven");
                    return SpinOutcome::Cancelled;
                }
            }
        }
    }
}

struct CancelOnDrop<'a> {
    engine: &'a Mutex<SpinEngine>,
    armed: bool,
}

impl Drop for CancelOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.engine.lock().cancel();
        }
    }
}
