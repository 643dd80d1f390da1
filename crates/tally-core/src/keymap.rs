//! Keyboard shortcuts.
//!
//! | key                  | normal              | reset modal open |
//! |----------------------|---------------------|------------------|
//! | `ArrowUp`, `+`       | add pending         | swallowed        |
//! | `ArrowDown`, `-`     | subtract pending    | swallowed        |
//! | `c`                  | copy                | swallowed        |
//! | `r`                  | request reset       | swallowed        |
//! | `Enter`              | -                   | confirm reset    |
//! | `Escape`             | -                   | cancel reset     |
//!
//! The arithmetic keys follow the same enablement as the buttons: with an
//! empty or invalid field, or when a soft limit would be crossed, they map to
//! nothing.

use crate::state::{CounterMessage, CounterState};
use serde::{Deserialize, Serialize};

/// Keys the widget reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `c` / `C`
    C,
    /// `r` / `R`
    R,
    /// Enter
    Enter,
    /// Escape
    Escape,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(key: &str) -> Option<Self> {
        Some(match key {
            "ArrowUp" | "Up" => Self::Up,
            "ArrowDown" | "Down" => Self::Down,
            "+" => Self::Plus,
            "-" | "Subtract" => Self::Minus,
            "c" | "C" => Self::C,
            "r" | "R" => Self::R,
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            _ => return None,
        })
    }
}

/// Message a key press should dispatch, if any.
#[must_use]
pub fn key_action(key: Key, state: &CounterState) -> Option<CounterMessage> {
    if state.confirming_reset {
        return match key {
            Key::Enter => Some(CounterMessage::ConfirmReset),
            Key::Escape => Some(CounterMessage::CancelReset),
            _ => None,
        };
    }
    let pending = state.input.pending;
    match key {
        Key::Up | Key::Plus => state
            .can_add_pending()
            .then_some(CounterMessage::Add(pending)),
        Key::Down | Key::Minus => state
            .can_subtract_pending()
            .then_some(CounterMessage::Subtract(pending)),
        Key::C => Some(CounterMessage::Copy),
        Key::R => Some(CounterMessage::RequestReset),
        Key::Enter | Key::Escape => None,
    }
}
