//! End-to-end motion runs against an in-memory view

use std::time::Duration;

use glide_core::motion::{JumpContext, JumpKind, JumpOutcome, MoveRequest, ScrollCommand, TickOutcome};
use glide_core::{MotionConfig, MotionEngine, Surface, TextView};

fn numbered(lines: usize, height: usize) -> TextView {
    TextView::from_lines((1..=lines).map(|n| format!("  line {n}")), height)
}

#[test]
fn ten_lines_down_never_overshoots() {
    let mut view = numbered(100, 20);
    let mut engine = MotionEngine::default();
    engine.submit(&mut view, MoveRequest::scroll(10));

    let mut previous = view.current_line();
    let mut ticks = 0;
    loop {
        match engine.on_tick(&mut view) {
            TickOutcome::Stepped { lines } | TickOutcome::Arrived { lines } => {
                assert!((0..=10).contains(&lines));
            }
            TickOutcome::Idle => break,
            TickOutcome::Blocked => panic!("unexpected boundary at {}", view.current_line()),
        }
        let line = view.current_line();
        assert!(line >= previous, "moved backwards: {previous} -> {line}");
        assert!(line <= 11, "overshot to {line}");
        previous = line;
        ticks += 1;
    }
    assert!(ticks > 1);
    assert_eq!(view.current_line(), 11);
    assert!(!view.timer_active());
}

#[test]
fn boundary_clamps_and_goes_idle() {
    let mut view = numbered(100, 20).with_cursor(5);
    let mut engine = MotionEngine::default();
    engine.submit(&mut view, MoveRequest::cursor_jump(-20));
    let mut outcomes = Vec::new();
    while engine.is_active() {
        outcomes.push(engine.on_tick(&mut view));
    }
    assert_eq!(outcomes.last(), Some(&TickOutcome::Blocked));
    assert_eq!(view.current_line(), 1);
    assert_eq!(engine.state().target_displacement, 0);
    assert_eq!(engine.state().subline_carry, 0.0);
}

#[test]
fn go_to_first_line_from_middle() {
    let mut view = numbered(100, 20).with_cursor(50);
    let mut engine = MotionEngine::default();
    let outcome = engine.jump(&mut view, JumpKind::FirstLine, JumpContext::default());
    assert_eq!(outcome, JumpOutcome::Arrived);
    assert_eq!(view.current_line(), 1);
    assert_eq!(view.top_line(), 1);
    assert_eq!(view.jumplist(), &[50]);
    assert_eq!(view.cursor_col(), 2);
}

#[test]
fn go_to_end_across_fold_counts_fold_once() {
    let mut view = numbered(100, 20);
    view.add_fold(40, 60).unwrap();
    let mut engine = MotionEngine::default();

    // 99 lines minus the 20 hidden inside the fold
    let delta = glide_core::motion::jump::screen_line_delta(&view, 1, 100);
    engine.submit(&mut view, MoveRequest::cursor_jump(delta));
    assert_eq!(engine.state().target_displacement, 79);
    engine.stop(&mut view);

    let outcome = engine.jump(&mut view, JumpKind::LastLine, JumpContext::default());
    assert_eq!(outcome, JumpOutcome::Arrived);
    assert_eq!(view.current_line(), 100);
}

#[test]
fn repeated_half_pages_accumulate() {
    let mut view = numbered(300, 20);
    let mut engine = MotionEngine::default();
    engine.scroll(&mut view, ScrollCommand::HalfPageDown, None);
    engine.on_tick(&mut view);
    engine.scroll(&mut view, ScrollCommand::HalfPageDown, None);
    engine.scroll(&mut view, ScrollCommand::HalfPageDown, None);
    engine.settle(&mut view);
    assert_eq!(view.current_line(), 31);
    assert_eq!(view.top_line(), 31);
}

#[test]
fn reverse_scroll_without_break_cancels_out() {
    let mut view = numbered(300, 20).with_cursor(150);
    let mut engine = MotionEngine::default();
    engine.submit(&mut view, MoveRequest::scroll(10));
    engine.submit(&mut view, MoveRequest::scroll(-10));
    assert_eq!(engine.state().target_displacement, 0);
    engine.settle(&mut view);
    assert_eq!(view.current_line(), 150);
}

#[test]
fn page_down_shows_tail_on_top_row() {
    let mut view = numbered(30, 10).with_cursor(25);
    let mut engine = MotionEngine::default();
    engine.scroll(&mut view, ScrollCommand::PageDown, Some(5));
    engine.settle(&mut view);
    assert_eq!(view.current_line(), 30);
    assert_eq!(view.top_line(), 30);
    assert_eq!(view.current_screen_row(), 1);
}

#[test]
fn slower_curve_takes_longer() {
    let run = |config: MotionConfig| {
        let mut view = numbered(200, 20);
        let mut engine = MotionEngine::new(config);
        engine.submit(&mut view, MoveRequest::scroll(40));
        engine.settle(&mut view);
        assert_eq!(view.current_line(), 41);
        view.elapsed()
    };
    let fast = run(MotionConfig::default());
    let slow = run(MotionConfig {
        speed_linear_factor: 1.0,
        ..Default::default()
    });
    assert!(slow > fast);
    assert!(fast > Duration::ZERO);
}

#[test]
fn config_file_drives_engine() {
    let config = glide_core::AppConfig::from_toml(
        r#"
        [motion]
        enabled = false
        "#,
    )
    .unwrap();
    let mut view = numbered(100, 20);
    let mut engine = MotionEngine::new(config.motion);
    let outcome = engine.jump(&mut view, JumpKind::LastLine, JumpContext::default());
    assert_eq!(outcome, JumpOutcome::Immediate);
    assert_eq!(view.current_line(), 100);
}
