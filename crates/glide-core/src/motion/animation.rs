//! Molecular Layer: tick-driven motion state machine
//!
//! Combines the velocity curve, the reconciler and the stepper. The host
//! schedules a periodic timer while an animation runs and calls
//! [`MotionEngine::on_tick`] each time it fires.

use tracing::debug;

use super::reconcile::merge;
use super::stepper::{is_blocked, Direction, Stepper};
use super::surface::{Surface, Timer, TimerId};
use super::velocity::{velocity, VelocityCurve};
use crate::config::MotionConfig;

/// How a single-line step is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveMode {
    /// Scroll the window, the cursor rides along
    #[default]
    Scroll,
    /// Move the cursor, the window follows only when it must
    CursorJump,
}

/// A displacement to add to the running animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    /// Signed line count, positive moves down
    pub lines: i64,
    pub mode: MoveMode,
    /// Keep scrolling the tail of the buffer up after the cursor reached the
    /// last line (full-window forward scrolls only)
    pub compensate_forward: bool,
}

impl MoveRequest {
    pub fn scroll(lines: i64) -> Self {
        Self {
            lines,
            mode: MoveMode::Scroll,
            compensate_forward: false,
        }
    }

    pub fn cursor_jump(lines: i64) -> Self {
        Self {
            lines,
            mode: MoveMode::CursorJump,
            compensate_forward: false,
        }
    }

    /// Mark the request as a forward full-window scroll
    pub fn compensated(mut self) -> Self {
        self.compensate_forward = true;
        self
    }
}

/// Observable result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing was running
    Idle,
    /// Lines applied this tick, more to come
    Stepped { lines: i64 },
    /// Lines applied this tick, displacement fully consumed
    Arrived { lines: i64 },
    /// A boundary stopped the animation
    Blocked,
}

/// Mutable animation state of one view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationState {
    /// Lines still owed, positive is down
    pub target_displacement: i64,
    /// Fraction of a line travelled but not yet applied, in (-1, 1)
    pub subline_carry: f64,
    /// Scheduled periodic tick, if any
    pub timer: Option<TimerId>,
    pub mode: MoveMode,
    pub forward_compensation: bool,
}

impl AnimationState {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }
}

/// Smooth motion controller for one view
///
/// Call [`submit`](Self::submit) (or the command helpers) to request motion
/// and [`on_tick`](Self::on_tick) from the host's periodic timer.
#[derive(Debug, Clone)]
pub struct MotionEngine {
    state: AnimationState,
    config: MotionConfig,
    curve: VelocityCurve,
}

impl Default for MotionEngine {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}

impl MotionEngine {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            state: AnimationState::default(),
            curve: VelocityCurve::from(&config),
            config,
        }
    }

    /// Replace the tunables; a running animation picks them up on its next tick
    ///
    /// A changed update interval takes effect the next time the timer is
    /// scheduled.
    pub fn set_config(&mut self, config: MotionConfig) {
        self.curve = VelocityCurve::from(&config);
        self.config = config;
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Merge a request into the running animation and start it if needed
    pub fn submit<H>(&mut self, host: &mut H, request: MoveRequest)
    where
        H: Surface + Timer + ?Sized,
    {
        let merged = merge(
            self.state.target_displacement,
            request.lines,
            request.mode,
            self.config.break_on_reverse,
        );
        if merged.stop_first {
            self.stop(host);
        }
        if request.lines != 0 {
            self.state.mode = request.mode;
            self.state.forward_compensation = request.compensate_forward;
        }
        self.state.target_displacement = merged.target;
        self.start(host);
    }

    /// Stop immediately; the step in progress (if any) has already completed
    pub fn stop<H>(&mut self, host: &mut H)
    where
        H: Timer + ?Sized,
    {
        if let Some(id) = self.state.timer.take() {
            host.cancel_periodic(id);
            debug!(
                remaining = self.state.target_displacement,
                "Motion stopped"
            );
        }
        self.state.target_displacement = 0;
        self.state.subline_carry = 0.0;
        self.state.forward_compensation = false;
    }

    fn start<H>(&mut self, host: &mut H)
    where
        H: Surface + Timer + ?Sized,
    {
        let target = self.state.target_displacement;
        if self.state.is_active() {
            return;
        }
        let Some(direction) = Direction::of(target) else {
            return;
        };

        // The animation still runs; the alert only says it will go nowhere.
        if is_blocked(&*host, direction, self.state.forward_compensation) {
            host.ring_alert();
        }

        let interval = self.config.update_interval();
        self.state.timer = Some(host.schedule_periodic(interval));
        debug!(
            target,
            mode = ?self.state.mode,
            interval_ms = self.config.update_interval_ms,
            "Motion started"
        );
    }

    /// Advance the animation by one timer interval
    pub fn on_tick<H>(&mut self, host: &mut H) -> TickOutcome
    where
        H: Surface + Timer + ?Sized,
    {
        if !self.state.is_active() {
            return TickOutcome::Idle;
        }
        let target = self.state.target_displacement;
        if target == 0 {
            self.stop(host);
            return TickOutcome::Arrived { lines: 0 };
        }

        let interval = self.config.update_interval().as_secs_f64();
        let speed = velocity(target, self.state.subline_carry, &self.curve);
        let subline_step = self.state.subline_carry + interval * speed;
        // Truncation never overshoots; the remainder is carried to the next tick.
        let step = (subline_step.trunc() as i64).clamp(target.min(0), target.max(0));

        let blocked = Stepper::new(
            &mut *host,
            self.state.mode,
            self.state.forward_compensation,
        )
        .step_many(step);

        if blocked {
            self.stop(host);
            return TickOutcome::Blocked;
        }

        self.state.target_displacement -= step;
        self.state.subline_carry = subline_step - step as f64;
        if step > 0 {
            host.request_redraw();
        }

        if self.state.target_displacement == 0 {
            self.stop(host);
            TickOutcome::Arrived { lines: step }
        } else {
            TickOutcome::Stepped { lines: step }
        }
    }

    /// Drive ticks on a host that has no timer loop of its own
    ///
    /// Yields one interval before every tick and returns the number of ticks
    /// taken.
    pub fn settle<H>(&mut self, host: &mut H) -> usize
    where
        H: Surface + Timer + ?Sized,
    {
        let mut ticks = 0;
        while self.is_active() {
            host.yield_for(self.config.update_interval());
            self.on_tick(host);
            ticks += 1;
        }
        ticks
    }

    /// Apply a request in one go, bypassing the animation
    pub(crate) fn apply_instantly<H>(&mut self, host: &mut H, request: MoveRequest)
    where
        H: Surface + Timer + ?Sized,
    {
        self.stop(host);
        if let Some(direction) = Direction::of(request.lines) {
            if is_blocked(&*host, direction, request.compensate_forward) {
                host.ring_alert();
            }
        }
        Stepper::new(&mut *host, request.mode, request.compensate_forward)
            .step_many(request.lines);
        host.request_redraw();
    }
}
