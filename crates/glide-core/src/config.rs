use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for log files written while the pager owns the terminal
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: default_log_dir(),
        }
    }
}

/// Tunables for the motion engine.
///
/// Values are only type-checked. Out-of-range numbers are accepted and simply
/// produce an odd-feeling curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Animate motions at all; when off every command applies instantly
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Interval between animation ticks in milliseconds
    #[serde(default = "default_update_interval")]
    pub update_interval_ms: u64,
    /// Base speed in lines per second, independent of distance
    #[serde(default = "default_constant_factor")]
    pub speed_constant_factor: f64,
    /// Multiplier of the distance-dependent speed term
    #[serde(default = "default_linear_factor")]
    pub speed_linear_factor: f64,
    /// Exponent applied to the remaining distance (<= 1.0 for diminishing acceleration)
    #[serde(default = "default_exponentiation_factor")]
    pub speed_exponentiation_factor: f64,
    /// Cancel the running animation when a request points the other way
    #[serde(default)]
    pub break_on_reverse: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            update_interval_ms: default_update_interval(),
            speed_constant_factor: default_constant_factor(),
            speed_linear_factor: default_linear_factor(),
            speed_exponentiation_factor: default_exponentiation_factor(),
            break_on_reverse: false,
        }
    }
}

impl MotionConfig {
    /// Tick interval as a `Duration`
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Input poll interval in milliseconds while nothing is animating
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Show line numbers in the gutter
    #[serde(default = "default_true")]
    pub line_numbers: bool,
    /// Window height used by the headless simulator
    #[serde(default = "default_sim_height")]
    pub sim_height: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            line_numbers: default_true(),
            sim_height: default_sim_height(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "k", "<C-d>" (Ctrl+d), "G" (Shift+g), "gg" / "za" (two-key sequences)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the pager
    #[serde(default = "default_key_quit")]
    pub quit: String,

    // Continuous scrolling
    /// Scroll half a window down
    #[serde(default = "default_key_half_page_down")]
    pub half_page_down: String,
    /// Scroll half a window up
    #[serde(default = "default_key_half_page_up")]
    pub half_page_up: String,
    /// Scroll a full window down
    #[serde(default = "default_key_page_down")]
    pub page_down: String,
    /// Scroll a full window up
    #[serde(default = "default_key_page_up")]
    pub page_up: String,

    // Jumps
    /// Jump to the first line (or the counted line)
    #[serde(default = "default_key_jump_to_top")]
    pub jump_to_top: String,
    /// Jump to the last line (or the counted line)
    #[serde(default = "default_key_jump_to_bottom")]
    pub jump_to_bottom: String,
    /// Move the cursor down (count lines)
    #[serde(default = "default_key_line_down")]
    pub line_down: String,
    /// Move the cursor up (count lines)
    #[serde(default = "default_key_line_up")]
    pub line_up: String,

    // Folds
    /// Toggle the fold under the cursor
    #[serde(default = "default_key_toggle_fold")]
    pub toggle_fold: String,
    /// Open every fold
    #[serde(default = "default_key_open_all_folds")]
    pub open_all_folds: String,
    /// Close every fold
    #[serde(default = "default_key_close_all_folds")]
    pub close_all_folds: String,

    /// Re-read the configuration file
    #[serde(default = "default_key_reload_config")]
    pub reload_config: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            half_page_down: default_key_half_page_down(),
            half_page_up: default_key_half_page_up(),
            page_down: default_key_page_down(),
            page_up: default_key_page_up(),
            jump_to_top: default_key_jump_to_top(),
            jump_to_bottom: default_key_jump_to_bottom(),
            line_down: default_key_line_down(),
            line_up: default_key_line_up(),
            toggle_fold: default_key_toggle_fold(),
            open_all_folds: default_key_open_all_folds(),
            close_all_folds: default_key_close_all_folds(),
            reload_config: default_key_reload_config(),
        }
    }
}

// Default keymap values (Vim-style notation)
fn default_key_quit() -> String { "q".to_string() }
fn default_key_half_page_down() -> String { "<C-d>".to_string() }
fn default_key_half_page_up() -> String { "<C-u>".to_string() }
fn default_key_page_down() -> String { "<C-f>".to_string() }
fn default_key_page_up() -> String { "<C-b>".to_string() }
fn default_key_jump_to_top() -> String { "gg".to_string() }
fn default_key_jump_to_bottom() -> String { "G".to_string() }
fn default_key_line_down() -> String { "j".to_string() }
fn default_key_line_up() -> String { "k".to_string() }
fn default_key_toggle_fold() -> String { "za".to_string() }
fn default_key_open_all_folds() -> String { "zR".to_string() }
fn default_key_close_all_folds() -> String { "zM".to_string() }
fn default_key_reload_config() -> String { "<C-r>".to_string() }

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("glide")
}

fn default_true() -> bool {
    true
}

fn default_update_interval() -> u64 {
    20
}

fn default_constant_factor() -> f64 {
    10.0
}

fn default_linear_factor() -> f64 {
    10.0
}

fn default_exponentiation_factor() -> f64 {
    0.9
}

fn default_tick_rate() -> u64 {
    250
}

fn default_sim_height() -> usize {
    24
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default location or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;

        Ok(())
    }

    /// Render configuration as pretty TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/glide/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("glide")
            .join("config.toml")
    }

    /// Get the log directory (with tilde expansion)
    pub fn log_dir(&self) -> PathBuf {
        expand_tilde(&self.general.log_dir)
    }
}
