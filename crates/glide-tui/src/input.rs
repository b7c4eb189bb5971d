use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    HalfPageDown,
    HalfPageUp,
    PageDown,
    PageUp,
    JumpToTop,
    JumpToBottom,
    LineDown,
    LineUp,
    ToggleFold,
    OpenAllFolds,
    CloseAllFolds,
    ReloadConfig,
    Pending(char), // First key of a two-key sequence
    Count(u8),     // Count digit typed before a command
    Cancel,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    let binding = KeyBinding::new(key.code, key.modifiers).normalized();

    // Second key of a sequence; anything unknown drops the sequence
    if let Some(prefix) = app.pending_key {
        return keymap.complete(prefix, &binding).copied().unwrap_or(Action::None);
    }

    if let (KeyCode::Char(c), KeyModifiers::NONE) = (key.code, key.modifiers) {
        if let Some(digit) = c.to_digit(10) {
            // A leading zero is not a count
            if digit != 0 || app.pending_count.is_some() {
                return Action::Count(digit as u8);
            }
        }
    }

    if keymap.is_prefix(&binding) {
        if let Some(c) = binding.as_char() {
            return Action::Pending(c);
        }
    }

    keymap.get(&binding).copied().unwrap_or(Action::None)
}
