//! Core types for the Tally counter widget.
//!
//! This crate holds everything that does not depend on a browser:
//! - Counter state and transitions: [`CounterState`], [`CounterMessage`], [`Command`]
//! - Input validation: [`parse_input`], [`InputField`]
//! - Presentation rules: [`count_color`], [`ThresholdTable`]
//! - Card animation: [`Bounce`], [`FrameClock`]
//! - Host abstraction: [`Host`], [`VirtualHost`]
//! - The controller tying it together: [`CounterWidget`]

mod bounce;
mod clock;
mod color;
mod config;
mod error;
mod geometry;
mod history;
mod host;
mod input;
mod keymap;
mod presentation;
mod random;
mod state;
pub mod widget;

pub use bounce::{Bounce, BounceConfig};
pub use clock::{FrameClock, BASELINE_FRAME_MS, DEFAULT_MAX_FRAME_RATIO};
pub use color::{Color, Hsl};
pub use config::WidgetConfig;
pub use error::{ConfigError, InputError};
pub use geometry::{Point, Size};
pub use history::{History, Operation, DEFAULT_HISTORY_CAPACITY};
pub use host::{Host, TaskId, VirtualHost};
pub use input::{parse_input, InputField};
pub use keymap::{key_action, Key};
pub use presentation::{
    count_color, default_emoji, default_messages, Threshold, ThresholdTable, DEFAULT_COLOR_RANGE,
    HIGH_HUE, LOW_HUE,
};
pub use random::SeededRng;
pub use state::{AutoMode, Command, CounterMessage, CounterSettings, CounterState, State};
pub use widget::CounterWidget;
