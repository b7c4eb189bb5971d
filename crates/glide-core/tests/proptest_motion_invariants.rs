//! Property-based invariants of the motion engine
//!
//! 1. A run that hits no boundary moves exactly the requested lines
//! 2. The cursor approaches the target monotonically, never past it
//! 3. The carried fraction stays below one line
//! 4. Runs that hit a boundary end on the first or last line, idle
//! 5. Merged scroll requests add up

use glide_core::motion::{MoveMode, MoveRequest, TickOutcome};
use glide_core::{MotionConfig, MotionEngine, Surface, TextView};
use proptest::prelude::*;

const LINES: usize = 400;
const START: usize = 200;
const TICK_LIMIT: usize = 200_000;

// ── Strategies ──────────────────────────────────────────────────────────

fn config_strategy() -> impl Strategy<Value = MotionConfig> {
    (5u64..60, 5.0f64..40.0, 0.0f64..40.0, 0.1f64..1.5).prop_map(
        |(interval, constant, linear, exponent)| MotionConfig {
            update_interval_ms: interval,
            speed_constant_factor: constant,
            speed_linear_factor: linear,
            speed_exponentiation_factor: exponent,
            ..Default::default()
        },
    )
}

fn mode_strategy() -> impl Strategy<Value = MoveMode> {
    prop_oneof![Just(MoveMode::Scroll), Just(MoveMode::CursorJump)]
}

fn view() -> TextView {
    TextView::from_lines((1..=LINES).map(|n| format!("line {n}")), 30).with_cursor(START)
}

fn request(lines: i64, mode: MoveMode) -> MoveRequest {
    match mode {
        MoveMode::Scroll => MoveRequest::scroll(lines),
        MoveMode::CursorJump => MoveRequest::cursor_jump(lines),
    }
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn unobstructed_run_is_exact_and_monotonic(
        config in config_strategy(),
        mode in mode_strategy(),
        distance in -150i64..150,
    ) {
        let mut v = view();
        let mut engine = MotionEngine::new(config);
        engine.submit(&mut v, request(distance, mode));

        let target = START as i64 + distance;
        let mut previous = START as i64;
        let mut total = 0i64;
        let mut ticks = 0;
        while engine.is_active() && ticks < TICK_LIMIT {
            match engine.on_tick(&mut v) {
                TickOutcome::Stepped { lines } | TickOutcome::Arrived { lines } => total += lines,
                outcome => prop_assert!(false, "unexpected {:?}", outcome),
            }
            prop_assert!(engine.state().subline_carry.abs() < 1.0);
            let line = v.current_line() as i64;
            prop_assert!((line - previous) * distance.signum() >= 0);
            prop_assert!((target - line) * distance.signum() >= 0);
            previous = line;
            ticks += 1;
        }

        prop_assert!(!engine.is_active());
        prop_assert_eq!(total, distance);
        prop_assert_eq!(v.current_line() as i64, target);
        prop_assert!(!v.timer_active());
    }

    #[test]
    fn boundary_run_ends_on_edge(
        mode in mode_strategy(),
        overshoot in 1i64..100,
        down in any::<bool>(),
    ) {
        let mut v = view();
        let mut engine = MotionEngine::default();
        let distance = if down {
            (LINES - START) as i64 + overshoot
        } else {
            -(START as i64 - 1 + overshoot)
        };
        engine.submit(&mut v, request(distance, mode));

        let mut last = TickOutcome::Idle;
        let mut ticks = 0;
        while engine.is_active() && ticks < TICK_LIMIT {
            last = engine.on_tick(&mut v);
            ticks += 1;
        }

        prop_assert_eq!(last, TickOutcome::Blocked);
        prop_assert_eq!(v.current_line(), if down { LINES } else { 1 });
        prop_assert_eq!(engine.state().target_displacement, 0);
        prop_assert_eq!(engine.state().subline_carry, 0.0);
    }

    #[test]
    fn scroll_requests_sum(parts in prop::collection::vec(1i64..20, 1..6)) {
        let mut v = view();
        let mut engine = MotionEngine::default();
        for lines in &parts {
            engine.submit(&mut v, MoveRequest::scroll(*lines));
        }
        prop_assert_eq!(engine.state().target_displacement, parts.iter().sum::<i64>());
        engine.settle(&mut v);
        prop_assert_eq!(v.current_line() as i64, START as i64 + parts.iter().sum::<i64>());
    }
}
