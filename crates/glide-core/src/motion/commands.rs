//! Command Layer: continuous scrolls
//!
//! Half-window and full-window scrolls in both directions. They feed the
//! engine in [`MoveMode::Scroll`], so repeated presses add up instead of
//! restarting the curve.

use std::str::FromStr;

use tracing::debug;

use super::animation::{MotionEngine, MoveRequest};
use super::surface::{Surface, Timer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollCommand {
    HalfPageDown,
    HalfPageUp,
    PageDown,
    PageUp,
}

impl FromStr for ScrollCommand {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "<C-d>" | "half-page-down" => Ok(ScrollCommand::HalfPageDown),
            "<C-u>" | "half-page-up" => Ok(ScrollCommand::HalfPageUp),
            "<C-f>" | "page-down" => Ok(ScrollCommand::PageDown),
            "<C-b>" | "page-up" => Ok(ScrollCommand::PageUp),
            other => Err(crate::Error::Other(format!("unknown scroll command: {other}"))),
        }
    }
}

impl ScrollCommand {
    /// Signed displacement of the command on `surface`
    ///
    /// A count on a half-page scroll becomes the new scroll amount, as in vi;
    /// on a full-page scroll it multiplies the page.
    pub fn displacement<S: Surface + ?Sized>(self, surface: &mut S, count: Option<usize>) -> i64 {
        match self {
            ScrollCommand::HalfPageDown | ScrollCommand::HalfPageUp => {
                if let Some(count) = count.filter(|c| *c > 0) {
                    surface.set_scroll_amount(count);
                }
                let lines = i64::try_from(surface.scroll_amount()).unwrap_or(i64::MAX);
                if self == ScrollCommand::HalfPageDown {
                    lines
                } else {
                    -lines
                }
            }
            ScrollCommand::PageDown | ScrollCommand::PageUp => {
                let page = surface.window_height().saturating_sub(2).max(1);
                let lines = page.saturating_mul(count.unwrap_or(1).max(1));
                let lines = i64::try_from(lines).unwrap_or(i64::MAX);
                if self == ScrollCommand::PageDown {
                    lines
                } else {
                    -lines
                }
            }
        }
    }

    pub fn request<S: Surface + ?Sized>(self, surface: &mut S, count: Option<usize>) -> MoveRequest {
        let request = MoveRequest::scroll(self.displacement(surface, count));
        if self == ScrollCommand::PageDown {
            request.compensated()
        } else {
            request
        }
    }
}

impl MotionEngine {
    /// Run a scroll command, animated unless motion is disabled
    pub fn scroll<H>(&mut self, host: &mut H, command: ScrollCommand, count: Option<usize>)
    where
        H: Surface + Timer + ?Sized,
    {
        let request = command.request(host, count);
        debug!(?command, lines = request.lines, "Scroll requested");
        if self.config().enabled {
            self.submit(host, request);
        } else {
            self.apply_instantly(host, request);
        }
    }
}
