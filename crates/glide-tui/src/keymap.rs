use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use glide_core::config::KeymapConfig;
use tracing::warn;

use crate::input::Action;

/// Parsed key binding (key code + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn simple(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }

    /// Terminals disagree on whether an uppercase letter carries SHIFT;
    /// bindings always store it with SHIFT.
    pub fn normalized(mut self) -> Self {
        if let KeyCode::Char(c) = self.code {
            if c.is_ascii_uppercase() {
                self.modifiers |= KeyModifiers::SHIFT;
            }
        }
        self
    }

    /// The typed character, if the key is a plain (or shifted) character
    pub fn as_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c)
                if !self
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(c)
            }
            _ => None,
        }
    }
}

/// Runtime keymap for efficient key-to-action lookup
pub struct Keymap {
    /// Single-key bindings
    bindings: HashMap<KeyBinding, Action>,
    /// Two-key sequences ("gg", "za", ...), keyed by both characters
    sequences: HashMap<(char, char), Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

impl Keymap {
    /// Create a keymap from configuration
    pub fn from_config(config: &KeymapConfig) -> Self {
        let mut bindings = HashMap::new();
        let mut sequences = HashMap::new();

        let mut add_binding = |key_str: &str, action: Action| {
            if let Some(pair) = parse_sequence(key_str) {
                if let Some(existing) = sequences.get(&pair) {
                    warn!(
                        "Key conflict: '{}' already bound to {:?}, ignoring binding to {:?}",
                        key_str, existing, action
                    );
                } else {
                    sequences.insert(pair, action);
                }
                return;
            }

            if let Some(binding) = parse_key_binding(key_str) {
                if let Some(existing) = bindings.get(&binding) {
                    warn!(
                        "Key conflict: '{}' already bound to {:?}, ignoring binding to {:?}",
                        key_str, existing, action
                    );
                } else {
                    bindings.insert(binding, action);
                }
            } else {
                warn!("Invalid key binding: '{}', ignored", key_str);
            }
        };

        add_binding(&config.quit, Action::Quit);
        add_binding(&config.half_page_down, Action::HalfPageDown);
        add_binding(&config.half_page_up, Action::HalfPageUp);
        add_binding(&config.page_down, Action::PageDown);
        add_binding(&config.page_up, Action::PageUp);
        add_binding(&config.jump_to_top, Action::JumpToTop);
        add_binding(&config.jump_to_bottom, Action::JumpToBottom);
        add_binding(&config.line_down, Action::LineDown);
        add_binding(&config.line_up, Action::LineUp);
        add_binding(&config.toggle_fold, Action::ToggleFold);
        add_binding(&config.open_all_folds, Action::OpenAllFolds);
        add_binding(&config.close_all_folds, Action::CloseAllFolds);
        add_binding(&config.reload_config, Action::ReloadConfig);

        // Ctrl+C always quits
        bindings.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        // Arrow and paging keys as alternatives
        bindings.entry(KeyBinding::simple(KeyCode::Down)).or_insert(Action::LineDown);
        bindings.entry(KeyBinding::simple(KeyCode::Up)).or_insert(Action::LineUp);
        bindings.entry(KeyBinding::simple(KeyCode::PageDown)).or_insert(Action::PageDown);
        bindings.entry(KeyBinding::simple(KeyCode::PageUp)).or_insert(Action::PageUp);
        // Escape drops pending input and stops motion
        bindings.insert(KeyBinding::simple(KeyCode::Esc), Action::Cancel);

        Self {
            bindings,
            sequences,
        }
    }

    /// Get action for a key binding
    pub fn get(&self, binding: &KeyBinding) -> Option<&Action> {
        self.bindings.get(binding)
    }

    /// Whether `binding` starts a configured two-key sequence
    pub fn is_prefix(&self, binding: &KeyBinding) -> bool {
        binding
            .as_char()
            .is_some_and(|c| self.sequences.keys().any(|(first, _)| *first == c))
    }

    /// Action for the sequence `prefix` followed by `binding`
    pub fn complete(&self, prefix: char, binding: &KeyBinding) -> Option<&Action> {
        self.sequences.get(&(prefix, binding.as_char()?))
    }
}

/// Two plain characters, e.g. "gg" or "zR"
fn parse_sequence(s: &str) -> Option<(char, char)> {
    let s = s.trim();
    let mut chars = s.chars();
    let (first, second) = (chars.next()?, chars.next()?);
    if chars.next().is_some() || first == '<' || first.is_whitespace() || second.is_whitespace() {
        return None;
    }
    Some((first, second))
}

/// Parse Vim-style key notation into KeyBinding
/// Supported formats:
/// - Single char: "j", "k", "q", etc.
/// - Uppercase (Shift): "G", "N", etc.
/// - Ctrl: "<C-d>", "<C-u>", etc.
/// - Shift: "<S-Tab>", etc.
/// - Special keys: "<CR>", "<Esc>", "<Space>", "<PageDown>", ...
pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
    let s = s.trim();

    if s.starts_with('<') && s.ends_with('>') && s.len() > 2 {
        let inner = &s[1..s.len() - 1];
        return parse_special_key(inner);
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    // Uppercase letters are Shift+letter
    if c.is_ascii_uppercase() {
        return Some(KeyBinding::shift(KeyCode::Char(c)));
    }
    Some(KeyBinding::simple(KeyCode::Char(c)))
}

/// Parse special key notation (content inside <...>)
fn parse_special_key(inner: &str) -> Option<KeyBinding> {
    if let Some(rest) = inner.strip_prefix("C-") {
        let key = parse_key_name(rest)?;
        return Some(KeyBinding::ctrl(key));
    }

    if let Some(rest) = inner.strip_prefix("S-") {
        let key = parse_key_name(rest)?;
        return Some(KeyBinding::shift(key));
    }

    parse_key_name(inner).map(KeyBinding::simple)
}

/// Parse a key name (without modifiers)
fn parse_key_name(name: &str) -> Option<KeyCode> {
    match name.to_lowercase().as_str() {
        "cr" | "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "space" | "spc" => Some(KeyCode::Char(' ')),
        "bs" | "backspace" => Some(KeyCode::Backspace),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        _ => {
            // Single character after modifier (e.g., "d" in "<C-d>")
            let mut chars = name.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            Some(KeyCode::Char(c.to_ascii_lowercase()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_keys() {
        assert_eq!(
            parse_key_binding("j"),
            Some(KeyBinding::simple(KeyCode::Char('j')))
        );
        assert_eq!(
            parse_key_binding("G"),
            Some(KeyBinding::shift(KeyCode::Char('G')))
        );
        assert_eq!(parse_key_binding("gg"), None);
    }

    #[test]
    fn test_parse_ctrl_and_special_keys() {
        assert_eq!(
            parse_key_binding("<C-d>"),
            Some(KeyBinding::ctrl(KeyCode::Char('d')))
        );
        assert_eq!(
            parse_key_binding("<PageDown>"),
            Some(KeyBinding::simple(KeyCode::PageDown))
        );
        assert_eq!(parse_key_binding("<Nope>"), None);
    }

    #[test]
    fn test_parse_sequence() {
        assert_eq!(parse_sequence("gg"), Some(('g', 'g')));
        assert_eq!(parse_sequence("zR"), Some(('z', 'R')));
        assert_eq!(parse_sequence("j"), None);
        assert_eq!(parse_sequence("<C-d>"), None);
    }

    #[test]
    fn test_keymap_from_config() {
        let keymap = Keymap::default();

        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('q'))),
            Some(&Action::Quit)
        );
        assert_eq!(
            keymap.get(&KeyBinding::ctrl(KeyCode::Char('f'))),
            Some(&Action::PageDown)
        );
        assert_eq!(
            keymap.get(&KeyBinding::shift(KeyCode::Char('G'))),
            Some(&Action::JumpToBottom)
        );

        let g = KeyBinding::simple(KeyCode::Char('g'));
        assert!(keymap.is_prefix(&g));
        assert_eq!(keymap.complete('g', &g), Some(&Action::JumpToTop));
        let big_r = KeyBinding::new(KeyCode::Char('R'), KeyModifiers::NONE).normalized();
        assert_eq!(keymap.complete('z', &big_r), Some(&Action::OpenAllFolds));
        assert_eq!(keymap.complete('z', &g), None);
        assert!(!keymap.is_prefix(&KeyBinding::ctrl(KeyCode::Char('g'))));
    }

    #[test]
    fn test_custom_keymap() {
        let config = KeymapConfig {
            line_down: "n".to_string(),
            jump_to_top: "<Home>".to_string(),
            ..Default::default()
        };
        let keymap = Keymap::from_config(&config);
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('n'))),
            Some(&Action::LineDown)
        );
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Home)),
            Some(&Action::JumpToTop)
        );
        assert!(!keymap.is_prefix(&KeyBinding::simple(KeyCode::Char('g'))));
    }
}
