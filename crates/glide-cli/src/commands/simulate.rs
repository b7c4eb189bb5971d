use std::time::Duration;

use anyhow::{bail, Result};
use serde::Serialize;
use tracing::debug;

use glide_core::motion::{JumpContext, JumpKind, JumpStart, MoveRequest, ScrollCommand, TickOutcome};
use glide_core::{AppConfig, MotionEngine, Surface, TextView, Timer};

/// Give up on motions that never settle (e.g. zero speed factors)
const MAX_TICKS: usize = 100_000;

pub enum MotionArg {
    Scroll(i64),
    Command(ScrollCommand),
    Jump(String),
}

pub struct SimulateArgs {
    pub lines: usize,
    pub height: usize,
    pub from: usize,
    pub folds: Vec<(usize, usize)>,
    pub motion: MotionArg,
    pub count: Option<usize>,
    pub json: bool,
}

/// State after one tick
#[derive(Debug, Serialize)]
pub struct TickRecord {
    pub tick: usize,
    pub elapsed_ms: u64,
    /// Lines applied by this tick
    pub step: i64,
    /// Lines still owed after this tick
    pub remaining: i64,
    pub carry: f64,
    pub line: usize,
    pub top: usize,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub outcome: String,
    pub line: usize,
    pub top: usize,
    pub ticks: usize,
    pub elapsed_ms: u64,
    pub alerts: usize,
    pub jumplist: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub records: Vec<TickRecord>,
    pub summary: Summary,
}

/// Parse a fold range such as `40-60`
pub fn parse_fold(s: &str) -> Result<(usize, usize), String> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| format!("expected START-END, got '{s}'"))?;
    let start = start.trim().parse().map_err(|e| format!("bad fold start: {e}"))?;
    let end = end.trim().parse().map_err(|e| format!("bad fold end: {e}"))?;
    Ok((start, end))
}

/// Parse a scroll command such as `<C-f>` or `half-page-down`
pub fn parse_scroll_command(s: &str) -> Result<ScrollCommand, String> {
    s.parse().map_err(|e: glide_core::Error| e.to_string())
}

pub fn run(config: &AppConfig, args: &SimulateArgs) -> Result<()> {
    let report = simulate(config, args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
    }
    Ok(())
}

/// Build the buffer, run the motion to completion and collect every tick
pub fn simulate(config: &AppConfig, args: &SimulateArgs) -> Result<Report> {
    if args.lines == 0 {
        bail!("--lines must be at least 1");
    }
    let mut view = TextView::from_lines((1..=args.lines).map(|n| format!("line {n}")), args.height);
    for &(start, end) in &args.folds {
        view.add_fold(start, end)?;
    }
    let mut view = view.with_cursor(args.from);
    let mut engine = MotionEngine::new(config.motion.clone());
    let interval = engine.config().update_interval();

    let mut plan = None;
    let mut outcome = match &args.motion {
        MotionArg::Scroll(lines) => {
            engine.submit(&mut view, MoveRequest::scroll(*lines));
            None
        }
        MotionArg::Command(command) => {
            engine.scroll(&mut view, *command, args.count);
            None
        }
        MotionArg::Jump(name) => {
            let kind: JumpKind = name.parse()?;
            let context = JumpContext {
                count: args.count,
                operator_pending: false,
            };
            match engine.begin_jump(&mut view, kind, context) {
                JumpStart::Done(outcome) => Some(format!("{outcome:?}")),
                JumpStart::Animating(p) => {
                    plan = Some(p);
                    None
                }
            }
        }
    };
    debug!(active = engine.is_active(), "Simulation started");

    let mut records = Vec::new();
    let mut last = TickOutcome::Idle;
    while engine.is_active() {
        if records.len() >= MAX_TICKS {
            bail!("motion did not settle after {MAX_TICKS} ticks");
        }
        view.yield_for(interval);
        last = engine.on_tick(&mut view);
        let step = match last {
            TickOutcome::Stepped { lines } | TickOutcome::Arrived { lines } => lines,
            TickOutcome::Idle | TickOutcome::Blocked => 0,
        };
        records.push(TickRecord {
            tick: records.len() + 1,
            elapsed_ms: millis(view.elapsed()),
            step,
            remaining: engine.state().target_displacement,
            carry: engine.state().subline_carry,
            line: view.current_line(),
            top: view.top_line(),
        });
    }

    if let Some(plan) = plan {
        outcome = Some(format!("{:?}", engine.finish_jump(&mut view, plan)));
    }
    let outcome = outcome.unwrap_or_else(|| match last {
        TickOutcome::Blocked => "Blocked".to_string(),
        TickOutcome::Idle => "Idle".to_string(),
        _ => "Arrived".to_string(),
    });

    Ok(Report {
        summary: Summary {
            outcome,
            line: view.current_line(),
            top: view.top_line(),
            ticks: records.len(),
            elapsed_ms: millis(view.elapsed()),
            alerts: view.alert_count(),
            jumplist: view.jumplist().to_vec(),
        },
        records,
    })
}

fn millis(d: Duration) -> u64 {
    d.as_millis().try_into().unwrap_or(u64::MAX)
}

fn print_table(report: &Report) {
    println!(
        "{:>5} {:>8} {:>5} {:>9} {:>7} {:>6} {:>6}",
        "tick", "ms", "step", "remaining", "carry", "line", "top"
    );
    for r in &report.records {
        println!(
            "{:>5} {:>8} {:>5} {:>9} {:>7.3} {:>6} {:>6}",
            r.tick, r.elapsed_ms, r.step, r.remaining, r.carry, r.line, r.top
        );
    }
    let s = &report.summary;
    println!();
    println!(
        "{} at line {} (top {}) after {} ticks, {} ms",
        s.outcome, s.line, s.top, s.ticks, s.elapsed_ms
    );
    if s.alerts > 0 {
        println!("Alerts: {}", s.alerts);
    }
    if !s.jumplist.is_empty() {
        println!("Jumplist: {:?}", s.jumplist);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(motion: MotionArg) -> SimulateArgs {
        SimulateArgs {
            lines: 100,
            height: 20,
            from: 1,
            folds: Vec::new(),
            motion,
            count: None,
            json: false,
        }
    }

    #[test]
    fn test_parse_fold() {
        assert_eq!(parse_fold("40-60"), Ok((40, 60)));
        assert!(parse_fold("40").is_err());
        assert!(parse_fold("a-b").is_err());
    }

    #[test]
    fn test_named_scroll_command() {
        assert_eq!(parse_scroll_command("<C-d>"), Ok(ScrollCommand::HalfPageDown));
        assert!(parse_scroll_command("<C-x>").is_err());

        let command = parse_scroll_command("half-page-down").unwrap();
        let report = simulate(&AppConfig::default(), &args(MotionArg::Command(command))).unwrap();
        assert_eq!(report.summary.line, 11);
        assert_eq!(report.summary.top, 11);
    }

    #[test]
    fn test_huge_counts_stay_in_the_buffer() {
        let mut a = args(MotionArg::Jump("j".to_string()));
        a.from = 50;
        a.count = Some(usize::MAX);
        let report = simulate(&AppConfig::default(), &a).unwrap();
        assert_eq!(report.summary.line, 100);

        let mut a = args(MotionArg::Command(ScrollCommand::PageDown));
        a.count = Some(usize::MAX);
        let report = simulate(&AppConfig::default(), &a).unwrap();
        assert_eq!(report.summary.line, 100);
    }

    #[test]
    fn test_scroll_records_sum_to_distance() {
        let report = simulate(&AppConfig::default(), &args(MotionArg::Scroll(10))).unwrap();
        assert_eq!(report.records.iter().map(|r| r.step).sum::<i64>(), 10);
        assert_eq!(report.summary.line, 11);
        assert_eq!(report.summary.outcome, "Arrived");
        assert_eq!(report.records.last().map(|r| r.remaining), Some(0));
    }

    #[test]
    fn test_jump_over_fold() {
        let mut a = args(MotionArg::Jump("G".to_string()));
        a.folds.push((40, 60));
        let report = simulate(&AppConfig::default(), &a).unwrap();
        assert_eq!(report.summary.outcome, "Arrived");
        assert_eq!(report.summary.line, 100);
        assert_eq!(report.summary.jumplist, vec![1]);
        assert_eq!(report.records.iter().map(|r| r.step).sum::<i64>(), 79);
    }

    #[test]
    fn test_blocked_scroll() {
        let report = simulate(&AppConfig::default(), &args(MotionArg::Scroll(-5))).unwrap();
        assert_eq!(report.summary.outcome, "Blocked");
        assert_eq!(report.summary.alerts, 1);
    }

    #[test]
    fn test_unknown_jump_and_bad_fold() {
        assert!(simulate(&AppConfig::default(), &args(MotionArg::Jump("zz".to_string()))).is_err());
        let mut a = args(MotionArg::Command(ScrollCommand::PageDown));
        a.folds.push((90, 120));
        assert!(simulate(&AppConfig::default(), &a).is_err());
    }

    #[test]
    fn test_report_serializes() {
        let report = simulate(&AppConfig::default(), &args(MotionArg::Command(ScrollCommand::PageDown))).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["summary"]["line"], 19);
        assert!(json["records"].as_array().is_some_and(|r| !r.is_empty()));
    }
}
