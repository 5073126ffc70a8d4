//! Spin trajectory: deterministic mapping from elapsed time to wheel rotation.
//!
//! Rotation is in degrees. Segment `i` of `n` spans `[i * 360/n, (i + 1) * 360/n)` in wheel
//! coordinates; the pointer sits at [`POINTER_ANGLE_DEG`].

use std::time::Duration;

/// Angle of the fixed pointer, in wheel coordinates at zero rotation.
pub const POINTER_ANGLE_DEG: f64 = 90.0;

const FULL_TURN_DEG: f64 = 360.0;

/// Cubic ease-out. Strictly increasing on `[0, 1]`, `0 -> 0`, `1 -> 1`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

pub fn segment_span_deg(count: usize) -> f64 {
    FULL_TURN_DEG / count as f64
}

pub fn segment_center_deg(index: usize, count: usize) -> f64 {
    (index as f64 + 0.5) * segment_span_deg(count)
}

/// Index of the segment under the pointer for a given wheel rotation.
pub fn segment_under_pointer(rotation: f64, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let angle = (POINTER_ANGLE_DEG - rotation).rem_euclid(FULL_TURN_DEG);
    ((angle / segment_span_deg(count)) as usize).min(count - 1)
}

/// Planned motion of one spin run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinTrajectory {
    start: f64,
    delta: f64,
    target: f64,
    duration: Duration,
}

impl SpinTrajectory {
    /// Plan a spin from `start` that stops with segment `selected` of `count` centered under
    /// the pointer after `extra_revolutions` additional full turns.
    ///
    /// `extra_revolutions` must be at least 2 for the motion to stay strictly forward.
    pub fn plan(
        start: f64,
        selected: usize,
        count: usize,
        extra_revolutions: u32,
        duration: Duration,
    ) -> Self {
        let resting = POINTER_ANGLE_DEG - segment_center_deg(selected, count);
        let aligned_start = start - start.rem_euclid(FULL_TURN_DEG);
        let target = aligned_start + FULL_TURN_DEG * f64::from(extra_revolutions) + resting;
        Self {
            start,
            delta: target - start,
            target,
            duration,
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Elapsed fraction of the run in `[0, 1]`.
    pub fn fraction(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_complete(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    /// Rotation at `elapsed`. Returns the stored target verbatim once the run is complete,
    /// so the last sample carries no rounding drift.
    pub fn sample(&self, elapsed: Duration) -> f64 {
        if self.is_complete(elapsed) {
            return self.target;
        }
        self.start + self.delta * ease_out_cubic(self.fraction(elapsed))
    }
}
