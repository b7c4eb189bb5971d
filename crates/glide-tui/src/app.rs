use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use glide_core::motion::{JumpContext, JumpKind, JumpOutcome, ScrollCommand};
use glide_core::{AppConfig, MotionEngine, Surface, TextView};
use ratatui::{backend::Backend, Terminal};
use tracing::{debug, info, warn};

use crate::host::TerminalHost;
use crate::input::Action;
use crate::keymap::Keymap;
use crate::theme::Theme;
use crate::ui::Chrome;

/// Largest count accepted before further digits are ignored
const MAX_COUNT: usize = 999_999;

pub struct App {
    pub view: TextView,
    pub engine: MotionEngine,
    pub keymap: Keymap,
    pub config: AppConfig,
    /// File re-read by the reload action; `None` uses the default location
    pub config_path: Option<PathBuf>,
    pub theme: Theme,
    pub title: String,
    /// First key of a two-key sequence
    pub pending_key: Option<char>,
    pub pending_count: Option<usize>,
    pub status_message: Option<String>,
    pub should_quit: bool,
    alerts_seen: usize,
    last_tick: Instant,
}

impl App {
    pub fn new(view: TextView, config: AppConfig, title: impl Into<String>) -> Self {
        Self {
            engine: MotionEngine::new(config.motion.clone()),
            keymap: Keymap::from_config(&config.keymap),
            alerts_seen: view.alert_count(),
            view,
            config,
            config_path: None,
            theme: Theme::default(),
            title: title.into(),
            pending_key: None,
            pending_count: None,
            status_message: None,
            should_quit: false,
            last_tick: Instant::now(),
        }
    }

    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Status bar inputs for the current state
    pub fn chrome(&self) -> Chrome<'_> {
        Chrome {
            title: &self.title,
            theme: &self.theme,
            line_numbers: self.config.ui.line_numbers,
            message: self.status_message.as_deref(),
            pending: self.pending_display(),
            animating: self.engine.is_active(),
        }
    }

    fn pending_display(&self) -> String {
        let mut pending = self.pending_count.map(|c| c.to_string()).unwrap_or_default();
        if let Some(key) = self.pending_key {
            pending.push(key);
        }
        pending
    }

    /// How long the event loop may block before the next motion tick is due
    pub fn poll_timeout(&self) -> Duration {
        if self.engine.is_active() {
            self.engine
                .config()
                .update_interval()
                .saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::from_millis(self.config.ui.tick_rate_ms)
        }
    }

    /// Run the motion tick if its interval has passed
    pub fn advance(&mut self) {
        if !self.engine.is_active() {
            return;
        }
        if self.last_tick.elapsed() >= self.engine.config().update_interval() {
            self.last_tick = Instant::now();
            self.engine.on_tick(&mut self.view);
        }
        self.check_alerts();
    }

    /// Terminal resized; one row belongs to the status bar
    pub fn resize(&mut self, height: u16) {
        self.view.resize(height.saturating_sub(1).max(1) as usize);
    }

    fn take_count(&mut self) -> Option<usize> {
        self.pending_count.take()
    }

    fn check_alerts(&mut self) {
        let alerts = self.view.alert_count();
        if alerts > self.alerts_seen {
            self.alerts_seen = alerts;
            self.status_message = Some(if self.view.current_line() <= 1 {
                "Already at the top".to_string()
            } else {
                "Already at the bottom".to_string()
            });
        }
    }

    pub fn handle_action<B: Backend>(&mut self, action: Action, terminal: &mut Terminal<B>) -> Result<()> {
        match action {
            Action::Count(digit) => {
                let count = self
                    .pending_count
                    .unwrap_or(0)
                    .saturating_mul(10)
                    .saturating_add(digit as usize);
                self.pending_count = Some(count.min(MAX_COUNT));
                return Ok(());
            }
            Action::Pending(key) => {
                self.pending_key = Some(key);
                return Ok(());
            }
            Action::None => {
                self.pending_key = None;
                return Ok(());
            }
            _ => {}
        }

        self.pending_key = None;
        self.status_message = None;

        match action {
            Action::Quit => self.should_quit = true,
            Action::Cancel => {
                self.pending_count = None;
                self.engine.stop(&mut self.view);
            }
            Action::HalfPageDown => self.scroll(ScrollCommand::HalfPageDown),
            Action::HalfPageUp => self.scroll(ScrollCommand::HalfPageUp),
            Action::PageDown => self.scroll(ScrollCommand::PageDown),
            Action::PageUp => self.scroll(ScrollCommand::PageUp),
            Action::JumpToTop => self.jump(JumpKind::FirstLine, terminal),
            Action::JumpToBottom => self.jump(JumpKind::LastLine, terminal),
            Action::LineDown => self.jump(JumpKind::LinesDown, terminal),
            Action::LineUp => self.jump(JumpKind::LinesUp, terminal),
            Action::ToggleFold => {
                self.pending_count = None;
                self.engine.stop(&mut self.view);
                let line = self.view.current_line();
                if !self.view.toggle_fold(line) {
                    self.status_message = Some("No fold found".to_string());
                }
            }
            Action::OpenAllFolds => {
                self.pending_count = None;
                self.engine.stop(&mut self.view);
                self.view.open_all_folds();
            }
            Action::CloseAllFolds => {
                self.pending_count = None;
                self.engine.stop(&mut self.view);
                self.view.close_all_folds();
            }
            Action::ReloadConfig => {
                self.pending_count = None;
                self.reload_config();
            }
            Action::Count(_) | Action::Pending(_) | Action::None => {}
        }
        self.check_alerts();
        Ok(())
    }

    fn scroll(&mut self, command: ScrollCommand) {
        let count = self.take_count();
        let was_active = self.engine.is_active();
        self.engine.scroll(&mut self.view, command, count);
        if !was_active {
            // First tick lands one interval from now
            self.last_tick = Instant::now();
        }
    }

    fn jump<B: Backend>(&mut self, kind: JumpKind, terminal: &mut Terminal<B>) {
        let context = JumpContext {
            count: self.take_count(),
            operator_pending: false,
        };
        let chrome = Chrome {
            title: &self.title,
            theme: &self.theme,
            line_numbers: self.config.ui.line_numbers,
            message: None,
            pending: String::new(),
            animating: true,
        };
        let mut host = TerminalHost::new(&mut self.view, terminal, chrome);
        let outcome = self.engine.jump(&mut host, kind, context);
        debug!(?kind, ?outcome, "Jump finished");
        if outcome == JumpOutcome::Interrupted {
            self.status_message = Some("Jump interrupted".to_string());
        }
    }

    /// Re-read the configuration file and apply it live
    pub fn reload_config(&mut self) {
        let path = self.config_path.clone().unwrap_or_else(AppConfig::config_path);
        match AppConfig::load_from(&path) {
            Ok(config) => {
                self.engine.set_config(config.motion.clone());
                self.keymap = Keymap::from_config(&config.keymap);
                self.config = config;
                info!("Reloaded configuration from {}", path.display());
                self.status_message = Some("Configuration reloaded".to_string());
            }
            Err(e) => {
                warn!("Failed to reload configuration: {}", e);
                self.status_message = Some(format!("Config error: {e}"));
            }
        }
    }
}
