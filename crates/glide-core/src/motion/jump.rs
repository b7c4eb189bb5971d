//! Command Layer: named jumps
//!
//! A jump resolves a target line, converts the distance into screen lines
//! (a closed fold is one screen line) and animates the cursor there. The call
//! returns only once the cursor has arrived, the way a plain `G` would.

use std::str::FromStr;

use tracing::debug;

use super::animation::{MotionEngine, MoveRequest};
use super::surface::{Surface, Timer};

/// Jumps known by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// `gg`: counted line, else the first line
    FirstLine,
    /// `G`: counted line, else the last line
    LastLine,
    /// `j`: count lines down
    LinesDown,
    /// `k`: count lines up
    LinesUp,
}

impl FromStr for JumpKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "gg" => Ok(JumpKind::FirstLine),
            "G" => Ok(JumpKind::LastLine),
            "j" => Ok(JumpKind::LinesDown),
            "k" => Ok(JumpKind::LinesUp),
            other => Err(crate::Error::UnknownJump(other.to_string())),
        }
    }
}

/// What a jump does besides moving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpSpec {
    pub kind: JumpKind,
    /// Land on the first non-blank character
    pub start_of_line: bool,
    /// Remember the starting position in the jump history
    pub jumplist: bool,
}

/// Caller state at the time of the jump
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpContext {
    /// Count typed before the command
    pub count: Option<usize>,
    /// The jump is the motion of a pending operator (`dG`, `yk`, ...)
    pub operator_pending: bool,
}

impl JumpContext {
    pub fn with_count(count: usize) -> Self {
        Self {
            count: Some(count),
            operator_pending: false,
        }
    }
}

/// How a jump finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Animated to the target
    Arrived,
    /// Cursor was already on the target
    AlreadyThere,
    /// Applied without animation (motion disabled or operator pending)
    Immediate,
    /// The animation went idle before reaching the target
    Interrupted,
}

/// A jump whose animation is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpPlan {
    /// Landing line
    pub target: usize,
    /// Move to the first non-blank character on arrival
    pub start_of_line: bool,
}

/// Result of [`MotionEngine::begin_jump`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpStart {
    /// Nothing left to animate
    Done(JumpOutcome),
    Animating(JumpPlan),
}

impl JumpKind {
    pub fn spec(self) -> JumpSpec {
        let absolute = matches!(self, JumpKind::FirstLine | JumpKind::LastLine);
        JumpSpec {
            kind: self,
            start_of_line: absolute,
            jumplist: absolute,
        }
    }

    /// Unclamped target line
    fn resolve<S: Surface + ?Sized>(self, surface: &S, count: Option<usize>) -> i64 {
        let to_i64 = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);
        let current = to_i64(surface.current_line());
        let count1 = to_i64(count.unwrap_or(1).max(1));
        match self {
            JumpKind::FirstLine => count.map_or(1, to_i64),
            JumpKind::LastLine => count.map_or(to_i64(surface.last_line()), to_i64),
            JumpKind::LinesDown => current.saturating_add(count1),
            JumpKind::LinesUp => current.saturating_sub(count1),
        }
    }
}

/// Resolve the landing line: clamped to the buffer and moved to the first
/// line of a closed fold
pub fn target_line<S: Surface + ?Sized>(surface: &S, kind: JumpKind, count: Option<usize>) -> usize {
    let last = surface.last_line().max(1);
    let line = kind.resolve(surface, count).clamp(1, last as i64) as usize;
    surface.fold_start_of(line).unwrap_or(line)
}

/// Number of screen lines between `from` and `to`, negative when moving up
///
/// Each closed fold crossed counts as a single line, whichever way it is
/// traversed.
pub fn screen_line_delta<S: Surface + ?Sized>(surface: &S, from: usize, to: usize) -> i64 {
    let mut line = surface.fold_start_of(from).unwrap_or(from);
    let mut delta = 0i64;
    while line < to {
        line = surface.fold_end_of(line).unwrap_or(line) + 1;
        delta += 1;
    }
    while line > to {
        let above = line - 1;
        line = surface.fold_start_of(above).unwrap_or(above);
        delta -= 1;
    }
    delta
}

impl MotionEngine {
    /// Jump by name, see [`JumpKind::from_str`]
    ///
    /// An unknown name is reported before anything is touched.
    pub fn jump_named<H>(&mut self, host: &mut H, name: &str, context: JumpContext) -> crate::Result<JumpOutcome>
    where
        H: Surface + Timer + ?Sized,
    {
        let kind = name.parse::<JumpKind>()?;
        Ok(self.jump(host, kind, context))
    }

    /// Move the cursor to the jump's target and return once it is there
    ///
    /// Between ticks the host gets `yield_for(update_interval)`, then the tick
    /// runs. The wait ends early if the animation goes idle on its own (a
    /// boundary, or a `stop` issued from inside the host's yield).
    pub fn jump<H>(&mut self, host: &mut H, kind: JumpKind, context: JumpContext) -> JumpOutcome
    where
        H: Surface + Timer + ?Sized,
    {
        let plan = match self.begin_jump(host, kind, context) {
            JumpStart::Done(outcome) => return outcome,
            JumpStart::Animating(plan) => plan,
        };

        let interval = self.config().update_interval();
        while host.current_line() != plan.target && self.is_active() {
            host.yield_for(interval);
            self.on_tick(host);
        }
        self.finish_jump(host, plan)
    }

    /// First half of [`jump`](Self::jump): resolve the target and either
    /// finish right away or start the animation
    ///
    /// Callers that drive ticks themselves pass the plan to
    /// [`finish_jump`](Self::finish_jump) once the engine is idle.
    pub fn begin_jump<H>(&mut self, host: &mut H, kind: JumpKind, context: JumpContext) -> JumpStart
    where
        H: Surface + Timer + ?Sized,
    {
        let spec = kind.spec();
        let target = target_line(&*host, kind, context.count);
        let current = {
            let line = host.current_line();
            host.fold_start_of(line).unwrap_or(line)
        };

        // Runs even when the cursor is already on the target
        if !self.config().enabled || context.operator_pending {
            self.stop(host);
            if spec.jumplist {
                host.record_jump();
            }
            host.jump_to_line(target, context.operator_pending);
            if spec.start_of_line {
                host.move_to_first_non_blank();
            }
            return JumpStart::Done(JumpOutcome::Immediate);
        }

        if target == current {
            return JumpStart::Done(JumpOutcome::AlreadyThere);
        }

        if spec.jumplist {
            host.record_jump();
        }

        let delta = screen_line_delta(&*host, current, target);
        debug!(?kind, current, target, delta, "Jump requested");
        self.submit(host, MoveRequest::cursor_jump(delta));
        JumpStart::Animating(JumpPlan {
            target,
            start_of_line: spec.start_of_line,
        })
    }

    /// Second half of [`jump`](Self::jump), after the animation went idle
    pub fn finish_jump<H>(&mut self, host: &mut H, plan: JumpPlan) -> JumpOutcome
    where
        H: Surface + Timer + ?Sized,
    {
        self.stop(host);
        if host.current_line() != plan.target {
            debug!(line = host.current_line(), target = plan.target, "Jump interrupted");
            return JumpOutcome::Interrupted;
        }
        if plan.start_of_line {
            host.move_to_first_non_blank();
        }
        JumpOutcome::Arrived
    }
}
