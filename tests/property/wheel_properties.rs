//! Property-based tests for spin geometry

use proptest::prelude::*;
use quizwheel::wheel::{ease_out_cubic, segment_under_pointer, SpinTrajectory};
use std::time::Duration;

proptest! {
    #[test]
    fn trajectory_lands_selected_segment_under_pointer(
        count in 1usize..64,
        pick in any::<prop::sample::Index>(),
        start in -1.0e5f64..1.0e5,
        extra in 2u32..10,
    ) {
        let selected = pick.index(count);
        let duration = Duration::from_millis(4000);
        let trajectory = SpinTrajectory::plan(start, selected, count, extra, duration);

        prop_assert_eq!(trajectory.sample(duration), trajectory.target());
        prop_assert_eq!(segment_under_pointer(trajectory.target(), count), selected);
        prop_assert!(trajectory.target() > start);
    }

    #[test]
    fn motion_is_monotonic(
        count in 1usize..32,
        pick in any::<prop::sample::Index>(),
        start in -1.0e4f64..1.0e4,
        extra in 2u32..8,
        steps in 2u64..200,
    ) {
        let duration = Duration::from_millis(4000);
        let trajectory = SpinTrajectory::plan(start, pick.index(count), count, extra, duration);
        let mut last = trajectory.sample(Duration::ZERO);
        prop_assert_eq!(last, start);
        for step in 1..=steps {
            let elapsed = duration * step as u32 / steps as u32;
            let rotation = trajectory.sample(elapsed);
            prop_assert!(rotation >= last);
            last = rotation;
        }
    }

    #[test]
    fn easing_stays_in_unit_range(t in -1.0f64..2.0) {
        let eased = ease_out_cubic(t);
        prop_assert!((0.0..=1.0).contains(&eased));
    }
}
