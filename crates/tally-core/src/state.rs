//! Counter state and its transitions.
//!
//! This module implements the Elm Architecture pattern for predictable state
//! management: `State + Message → (State, Command)`.
//!
//! Transitions never touch timers or the clipboard themselves. They describe
//! the side effects they need as a [`Command`], and the
//! [`CounterWidget`](crate::CounterWidget) carries those out against a host.
//!
//! # Examples
//!
//! ```
//! use tally_core::{CounterMessage, CounterState, State};
//!
//! let state = CounterState::default();
//! let (state, _) = state.apply(CounterMessage::InputChanged("10".into()));
//! let (state, cmd) = state.apply(CounterMessage::Add(10));
//!
//! assert_eq!(state.count, 10);
//! assert_eq!(state.history.latest(), Some("+10 → 10"));
//! assert!(cmd.is_none());
//! ```

use crate::history::{History, Operation, DEFAULT_HISTORY_CAPACITY};
use crate::input::{parse_input, InputField};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Application state trait.
///
/// Implements the Elm Architecture: State + Message → (State, Command)
pub trait State: Clone + Serialize + for<'de> Deserialize<'de> {
    /// Message type for state updates
    type Message;

    /// Update state in response to a message.
    ///
    /// Returns a command for side effects (timers, clipboard).
    fn update(&mut self, msg: Self::Message) -> Command;

    /// Pure form of [`State::update`]: consume the state, return the next one.
    fn apply(mut self, msg: Self::Message) -> (Self, Command) {
        let cmd = self.update(msg);
        (self, cmd)
    }
}

/// Commands for side effects.
///
/// Commands represent effects that should happen after a state update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Command {
    /// No command
    #[default]
    None,
    /// Execute multiple commands, in order
    Batch(Vec<Command>),
    /// Install the repeating auto-mode tick, replacing any running one
    StartAuto {
        /// Tick period
        interval_ms: u32,
    },
    /// Cancel the auto-mode tick
    StopAuto,
    /// Write text to the system clipboard, ignoring the outcome
    WriteClipboard {
        /// Text to write
        text: String,
    },
    /// Clear the copied flag after a delay, replacing any pending clear
    ScheduleCopiedClear {
        /// Delay before the flag clears
        delay_ms: u32,
    },
    /// Drop a pending copied-flag clear
    CancelCopiedClear,
}

impl Command {
    /// Create a batch of commands.
    pub fn batch(commands: impl IntoIterator<Item = Self>) -> Self {
        Self::Batch(commands.into_iter().collect())
    }

    /// Check if this is the none command.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Flatten nested batches into the leaf commands, in execution order.
    #[must_use]
    pub fn into_leaves(self) -> Vec<Self> {
        match self {
            Self::None => Vec::new(),
            Self::Batch(cmds) => cmds.into_iter().flat_map(Self::into_leaves).collect(),
            other => vec![other],
        }
    }
}

/// Auto-run mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoMode {
    /// Timer off
    #[default]
    None,
    /// Add the pending value every tick
    Up,
    /// Subtract the pending value every tick
    Down,
}

impl AutoMode {
    /// Whether a timer should be running in this mode.
    #[must_use]
    pub const fn is_running(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Settings that shape transitions. Survive a reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSettings {
    /// History entries kept
    pub history_capacity: usize,
    /// Floor enforced by the lower soft limit
    pub lower_bound: i64,
    /// Ceiling enforced by the upper soft limit
    pub upper_bound: i64,
    /// Auto-mode tick period
    pub auto_interval_ms: u32,
    /// How long the copied flag stays up
    pub copied_flash_ms: u32,
}

impl Default for CounterSettings {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            lower_bound: 0,
            upper_bound: 100,
            auto_interval_ms: 700,
            copied_flash_ms: 1200,
        }
    }
}

/// Complete logical state of the counter widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    /// Running total
    pub count: i64,
    /// Numeric input field
    pub input: InputField,
    /// Highest count reached
    pub max_count: i64,
    /// Lowest count reached
    pub min_count: i64,
    /// Applied operations, newest first
    pub history: History,
    /// Target count
    pub goal: Option<i64>,
    /// Auto-run mode
    pub auto_mode: AutoMode,
    /// Block subtracts that would go below the lower bound
    pub limit_lower: bool,
    /// Block adds that would go above the upper bound
    pub limit_upper: bool,
    /// Count was just copied
    pub copied: bool,
    /// Reset confirmation modal is open
    pub confirming_reset: bool,
    /// Transition settings
    pub settings: CounterSettings,
}

impl Default for CounterState {
    fn default() -> Self {
        Self::new(CounterSettings::default())
    }
}

/// Messages for the counter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterMessage {
    /// Numeric field text changed
    InputChanged(String),
    /// Add an amount
    Add(i64),
    /// Subtract an amount
    Subtract(i64),
    /// Goal field text changed
    SetGoal(String),
    /// Remove the goal
    ClearGoal,
    /// Switch auto-run mode
    SetAuto(AutoMode),
    /// Auto-run timer fired
    AutoTick,
    /// Toggle the lower soft limit
    SetLimitLower(bool),
    /// Toggle the upper soft limit
    SetLimitUpper(bool),
    /// Copy the count to the clipboard
    Copy,
    /// Copied flag timer fired
    CopiedExpired,
    /// Open the reset confirmation
    RequestReset,
    /// Reset everything and close the confirmation
    ConfirmReset,
    /// Close the confirmation without resetting
    CancelReset,
}

impl CounterState {
    /// Fresh state with the given settings.
    #[must_use]
    pub fn new(settings: CounterSettings) -> Self {
        Self {
            count: 0,
            input: InputField::default(),
            max_count: 0,
            min_count: 0,
            history: History::with_capacity(settings.history_capacity),
            goal: None,
            auto_mode: AutoMode::None,
            limit_lower: false,
            limit_upper: false,
            copied: false,
            confirming_reset: false,
            settings,
        }
    }

    /// Goal is set and equals the count.
    #[must_use]
    pub fn goal_reached(&self) -> bool {
        self.goal == Some(self.count)
    }

    /// Whether `Add(n)` would be applied.
    #[must_use]
    pub fn can_add(&self, n: i64) -> bool {
        self.input.is_usable()
            && self
                .count
                .checked_add(n)
                .is_some_and(|next| !(self.limit_upper && next > self.settings.upper_bound))
    }

    /// Whether `Subtract(n)` would be applied.
    #[must_use]
    pub fn can_subtract(&self, n: i64) -> bool {
        self.input.is_usable()
            && self
                .count
                .checked_sub(n)
                .is_some_and(|next| !(self.limit_lower && next < self.settings.lower_bound))
    }

    /// Whether adding the typed value is allowed. An empty field offers
    /// nothing to add.
    #[must_use]
    pub fn can_add_pending(&self) -> bool {
        !self.input.is_empty() && self.can_add(self.input.pending)
    }

    /// Whether subtracting the typed value is allowed.
    #[must_use]
    pub fn can_subtract_pending(&self) -> bool {
        !self.input.is_empty() && self.can_subtract(self.input.pending)
    }

    fn accumulate(&mut self, op: Operation, n: i64) {
        let allowed = match op {
            Operation::Add => self.can_add(n),
            Operation::Subtract => self.can_subtract(n),
        };
        if !allowed {
            debug!(?op, operand = n, count = self.count, "operation rejected");
            return;
        }
        // can_add/can_subtract already proved the arithmetic does not overflow
        self.count = match op {
            Operation::Add => self.count.wrapping_add(n),
            Operation::Subtract => self.count.wrapping_sub(n),
        };
        self.max_count = self.max_count.max(self.count);
        self.min_count = self.min_count.min(self.count);
        self.history.record(op.describe(n, self.count));
        debug!(?op, operand = n, count = self.count, "operation applied");
    }

    fn set_auto(&mut self, mode: AutoMode) -> Command {
        if mode == self.auto_mode {
            return Command::None;
        }
        let previous = std::mem::replace(&mut self.auto_mode, mode);
        debug!(?previous, ?mode, "auto mode changed");

        let start = Command::StartAuto {
            interval_ms: self.settings.auto_interval_ms,
        };
        match (previous.is_running(), mode.is_running()) {
            (_, false) => Command::StopAuto,
            (false, true) => start,
            (true, true) => Command::batch([Command::StopAuto, start]),
        }
    }

    fn confirm_reset(&mut self) -> Command {
        if !self.confirming_reset {
            return Command::None;
        }
        let was_auto = self.auto_mode.is_running();
        let was_copied = self.copied;
        *self = Self::new(self.settings.clone());
        debug!("counter reset");

        let mut cmds = Vec::new();
        if was_auto {
            cmds.push(Command::StopAuto);
        }
        if was_copied {
            cmds.push(Command::CancelCopiedClear);
        }
        match cmds.len() {
            0 => Command::None,
            _ => Command::batch(cmds),
        }
    }
}

impl State for CounterState {
    type Message = CounterMessage;

    fn update(&mut self, msg: Self::Message) -> Command {
        match msg {
            CounterMessage::InputChanged(raw) => {
                if let Err(err) = self.input.set(raw) {
                    debug!(%err, "input rejected");
                }
                Command::None
            }
            CounterMessage::Add(n) => {
                self.accumulate(Operation::Add, n);
                Command::None
            }
            CounterMessage::Subtract(n) => {
                self.accumulate(Operation::Subtract, n);
                Command::None
            }
            CounterMessage::SetGoal(text) => {
                self.goal = parse_input(&text).ok().flatten();
                Command::None
            }
            CounterMessage::ClearGoal => {
                self.goal = None;
                Command::None
            }
            CounterMessage::SetAuto(mode) => self.set_auto(mode),
            CounterMessage::AutoTick => {
                let pending = self.input.pending;
                if pending == 0 {
                    trace!("auto tick with nothing to apply");
                    return Command::None;
                }
                match self.auto_mode {
                    AutoMode::Up => self.accumulate(Operation::Add, pending),
                    AutoMode::Down => self.accumulate(Operation::Subtract, pending),
                    AutoMode::None => trace!("auto tick while stopped"),
                }
                Command::None
            }
            CounterMessage::SetLimitLower(on) => {
                self.limit_lower = on;
                Command::None
            }
            CounterMessage::SetLimitUpper(on) => {
                self.limit_upper = on;
                Command::None
            }
            CounterMessage::Copy => {
                self.copied = true;
                Command::batch([
                    Command::WriteClipboard {
                        text: self.count.to_string(),
                    },
                    Command::ScheduleCopiedClear {
                        delay_ms: self.settings.copied_flash_ms,
                    },
                ])
            }
            CounterMessage::CopiedExpired => {
                self.copied = false;
                Command::None
            }
            CounterMessage::RequestReset => {
                self.confirming_reset = true;
                Command::None
            }
            CounterMessage::ConfirmReset => self.confirm_reset(),
            CounterMessage::CancelReset => {
                self.confirming_reset = false;
                Command::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn with_input(raw: &str) -> CounterState {
        CounterState::default()
            .apply(CounterMessage::InputChanged(raw.to_string()))
            .0
    }

    #[test]
    fn test_add_ten_from_zero() {
        let (state, cmd) = CounterState::default().apply(CounterMessage::Add(10));
        assert!(cmd.is_none());
        assert_eq!(state.count, 10);
        assert_eq!(state.history.iter().collect::<Vec<_>>(), vec!["+10 → 10"]);
        assert_eq!(state.max_count, 10);
        assert_eq!(state.min_count, 0);
    }

    #[test]
    fn test_subtract_updates_min_watermark() {
        let (state, _) = CounterState::default().apply(CounterMessage::Subtract(4));
        assert_eq!(state.count, -4);
        assert_eq!(state.min_count, -4);
        assert_eq!(state.max_count, 0);
        assert_eq!(state.history.latest(), Some("-4 → -4"));
    }

    #[test]
    fn test_invalid_input_blocks_operations() {
        let state = with_input("abc");
        assert!(state.input.invalid);
        let (state, _) = state.apply(CounterMessage::Add(5));
        let (state, _) = state.apply(CounterMessage::Subtract(5));
        assert_eq!(state.count, 0);
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_upper_limit_rejects_add() {
        let mut state = CounterState::default();
        state.update(CounterMessage::Add(95));
        state.update(CounterMessage::SetLimitUpper(true));
        state.update(CounterMessage::Add(10));
        assert_eq!(state.count, 95);
        assert_eq!(state.history.len(), 1);

        state.update(CounterMessage::Add(5));
        assert_eq!(state.count, 100);
    }

    #[test]
    fn test_lower_limit_rejects_subtract() {
        let mut state = CounterState::default();
        state.update(CounterMessage::SetLimitLower(true));
        state.update(CounterMessage::Subtract(1));
        assert_eq!(state.count, 0);
        assert!(!state.can_subtract(1));
        assert!(state.can_subtract(0));
    }

    #[test]
    fn test_limits_only_guard_their_own_direction() {
        let mut state = CounterState::default();
        state.update(CounterMessage::SetLimitLower(true));
        // Adding a negative amount is governed by the upper limit only.
        state.update(CounterMessage::Add(-5));
        assert_eq!(state.count, -5);
    }

    #[test]
    fn test_overflow_is_rejected() {
        let mut state = CounterState::default();
        state.update(CounterMessage::Add(i64::MAX));
        state.update(CounterMessage::Add(1));
        assert_eq!(state.count, i64::MAX);
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_goal_reached_and_lost() {
        let mut state = CounterState::default();
        state.update(CounterMessage::SetGoal("10".to_string()));
        assert!(!state.goal_reached());

        state.update(CounterMessage::Add(10));
        assert!(state.goal_reached());

        state.update(CounterMessage::Add(1));
        assert!(!state.goal_reached());
    }

    #[test]
    fn test_goal_invalid_text_clears_goal() {
        let mut state = CounterState::default();
        state.update(CounterMessage::SetGoal("5".to_string()));
        assert_eq!(state.goal, Some(5));
        state.update(CounterMessage::SetGoal("five".to_string()));
        assert_eq!(state.goal, None);
        state.update(CounterMessage::SetGoal("0".to_string()));
        assert!(state.goal_reached());
        state.update(CounterMessage::ClearGoal);
        assert!(!state.goal_reached());
    }

    #[test]
    fn test_set_auto_commands() {
        let mut state = CounterState::default();
        assert_eq!(
            state.update(CounterMessage::SetAuto(AutoMode::Up)),
            Command::StartAuto { interval_ms: 700 }
        );
        assert_eq!(state.update(CounterMessage::SetAuto(AutoMode::Up)), Command::None);
        assert_eq!(
            state.update(CounterMessage::SetAuto(AutoMode::Down)),
            Command::batch([Command::StopAuto, Command::StartAuto { interval_ms: 700 }])
        );
        assert_eq!(
            state.update(CounterMessage::SetAuto(AutoMode::None)),
            Command::StopAuto
        );
        assert_eq!(state.auto_mode, AutoMode::None);
    }

    #[test]
    fn test_auto_tick_uses_pending_value() {
        let mut state = with_input("3");
        state.update(CounterMessage::SetAuto(AutoMode::Up));
        state.update(CounterMessage::AutoTick);
        state.update(CounterMessage::AutoTick);
        assert_eq!(state.count, 6);

        state.update(CounterMessage::SetAuto(AutoMode::Down));
        state.update(CounterMessage::AutoTick);
        assert_eq!(state.count, 3);
        assert_eq!(state.history.latest(), Some("-3 → 3"));
    }

    #[test]
    fn test_auto_tick_with_zero_operand_records_nothing() {
        let mut state = with_input("4");
        state.update(CounterMessage::SetAuto(AutoMode::Up));
        state.update(CounterMessage::AutoTick);
        state.update(CounterMessage::InputChanged(String::new()));
        state.update(CounterMessage::AutoTick);
        state.update(CounterMessage::InputChanged("0".into()));
        state.update(CounterMessage::AutoTick);
        assert_eq!(state.count, 4);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.auto_mode, AutoMode::Up);
    }

    #[test]
    fn test_pending_predicates_need_a_typed_value() {
        let mut state = CounterState::default();
        assert!(!state.can_add_pending());
        assert!(!state.can_subtract_pending());
        state.update(CounterMessage::InputChanged("0".into()));
        assert!(state.can_add_pending());
        state.update(CounterMessage::InputChanged("x".into()));
        assert!(!state.can_add_pending());
        state.update(CounterMessage::InputChanged("5".into()));
        state.update(CounterMessage::SetLimitLower(true));
        assert!(state.can_add_pending());
        assert!(!state.can_subtract_pending());
    }

    #[test]
    fn test_auto_tick_while_stopped_is_ignored() {
        let mut state = with_input("3");
        state.update(CounterMessage::AutoTick);
        assert_eq!(state.count, 0);
    }

    #[test]
    fn test_copy_commands() {
        let mut state = CounterState::default();
        state.update(CounterMessage::Add(42));
        let cmd = state.update(CounterMessage::Copy);
        assert!(state.copied);
        assert_eq!(
            cmd.into_leaves(),
            vec![
                Command::WriteClipboard {
                    text: "42".to_string()
                },
                Command::ScheduleCopiedClear { delay_ms: 1200 },
            ]
        );
        state.update(CounterMessage::CopiedExpired);
        assert!(!state.copied);
    }

    #[test]
    fn test_reset_flow_confirm() {
        let mut state = with_input("7");
        state.update(CounterMessage::Add(7));
        state.update(CounterMessage::SetGoal("7".to_string()));
        state.update(CounterMessage::SetLimitUpper(true));
        state.update(CounterMessage::SetAuto(AutoMode::Up));
        state.update(CounterMessage::Copy);

        state.update(CounterMessage::RequestReset);
        assert!(state.confirming_reset);

        let cmd = state.update(CounterMessage::ConfirmReset);
        assert_eq!(state, CounterState::default());
        assert_eq!(
            cmd.into_leaves(),
            vec![Command::StopAuto, Command::CancelCopiedClear]
        );
    }

    #[test]
    fn test_reset_keeps_settings() {
        let settings = CounterSettings {
            history_capacity: 3,
            ..CounterSettings::default()
        };
        let mut state = CounterState::new(settings.clone());
        state.update(CounterMessage::Add(1));
        state.update(CounterMessage::RequestReset);
        state.update(CounterMessage::ConfirmReset);
        assert_eq!(state, CounterState::new(settings));
        assert_eq!(state.history.capacity(), 3);
    }

    #[test]
    fn test_confirm_without_request_is_noop() {
        let mut state = CounterState::default();
        state.update(CounterMessage::Add(3));
        let cmd = state.update(CounterMessage::ConfirmReset);
        assert!(cmd.is_none());
        assert_eq!(state.count, 3);
    }

    #[test]
    fn test_cancel_reset_keeps_counters() {
        let mut state = CounterState::default();
        state.update(CounterMessage::Add(3));
        state.update(CounterMessage::RequestReset);
        let before = state.clone();

        state.update(CounterMessage::CancelReset);
        state.update(CounterMessage::CancelReset);
        assert!(!state.confirming_reset);
        assert_eq!(
            CounterState {
                confirming_reset: true,
                ..state
            },
            before
        );
    }

    #[test]
    fn test_auto_mode_names() {
        assert_eq!(serde_json::to_string(&AutoMode::Up).unwrap(), "\"up\"");
        assert_eq!(
            serde_json::from_str::<AutoMode>("\"down\"").unwrap(),
            AutoMode::Down
        );
    }

    #[test]
    fn test_command_into_leaves_flattens() {
        let cmd = Command::batch([
            Command::None,
            Command::batch([Command::StopAuto]),
            Command::CancelCopiedClear,
        ]);
        assert_eq!(
            cmd.into_leaves(),
            vec![Command::StopAuto, Command::CancelCopiedClear]
        );
        assert!(Command::default().into_leaves().is_empty());
    }

    #[test]
    fn test_state_serializes() {
        let mut state = CounterState::default();
        state.update(CounterMessage::Add(2));
        let json = serde_json::to_string(&state).unwrap();
        let parsed: CounterState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }

    fn op_strategy() -> impl Strategy<Value = CounterMessage> {
        prop_oneof![
            (-500i64..500).prop_map(CounterMessage::Add),
            (-500i64..500).prop_map(CounterMessage::Subtract),
            any::<bool>().prop_map(CounterMessage::SetLimitLower),
            any::<bool>().prop_map(CounterMessage::SetLimitUpper),
            "[0-9a-z-]{0,4}".prop_map(CounterMessage::InputChanged),
        ]
    }

    proptest! {
        #[test]
        fn prop_watermarks_bracket_count(ops in prop::collection::vec(op_strategy(), 0..200)) {
            let mut state = CounterState::default();
            for op in ops {
                state.update(op);
                prop_assert!(state.min_count <= state.count);
                prop_assert!(state.count <= state.max_count);
            }
        }

        #[test]
        fn prop_history_bounded_and_latest_first(ops in prop::collection::vec(op_strategy(), 0..200)) {
            let mut state = CounterState::default();
            for op in ops {
                let before = state.history.len();
                let was = state.count;
                state.update(op.clone());
                prop_assert!(state.history.len() <= 20);
                let applied = match op {
                    CounterMessage::Add(n) => Some(format!("+{n} → {}", state.count)),
                    CounterMessage::Subtract(n) => Some(format!("-{n} → {}", state.count)),
                    _ => None,
                };
                if let Some(expected) = applied {
                    if state.history.len() != before || state.count != was {
                        prop_assert_eq!(state.history.latest(), Some(expected.as_str()));
                    }
                }
            }
        }

        #[test]
        fn prop_limits_hold_for_successful_ops(ops in prop::collection::vec(op_strategy(), 0..200)) {
            let mut state = CounterState::default();
            for op in ops {
                let before = state.count;
                let is_add = matches!(op, CounterMessage::Add(_));
                let is_sub = matches!(op, CounterMessage::Subtract(_));
                state.update(op);
                if is_add && state.limit_upper && state.count != before {
                    prop_assert!(state.count <= 100);
                }
                if is_sub && state.limit_lower && state.count != before {
                    prop_assert!(state.count >= 0);
                }
            }
        }
    }
}
