//! Everything the widget renders, derived from its current state.
//!
//! The browser runtime never reads [`CounterState`](tally_core::CounterState)
//! directly: it builds a [`ViewModel`] and copies it into the DOM. Keeping
//! this step pure lets it run in native tests.

use serde::Serialize;
use tally_core::{AutoMode, CounterWidget, Host};

/// Inline message shown under an invalid numeric field.
pub const INVALID_INPUT_MESSAGE: &str = "Please enter numbers only.";
/// Placeholder of the numeric field.
pub const INPUT_PLACEHOLDER: &str = "Enter a number";
/// Copy button label at rest.
pub const COPY_LABEL: &str = "Copy";
/// Copy button label while the copied flag is up.
pub const COPIED_LABEL: &str = "Copied!";

/// Rendered values for one frame of UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    /// Count as text
    pub count: String,
    /// Numeric field text
    pub input: String,
    /// Inline validation message
    pub error: Option<&'static str>,
    /// Add button disabled
    pub add_disabled: bool,
    /// Subtract button disabled
    pub subtract_disabled: bool,
    /// Highest count reached
    pub max_count: i64,
    /// Lowest count reached
    pub min_count: i64,
    /// History lines, newest first
    pub history: Vec<String>,
    /// Goal line, when a goal is set
    pub goal_status: Option<String>,
    /// Goal is set and reached
    pub goal_reached: bool,
    /// Active auto mode
    pub auto_mode: AutoMode,
    /// Lower soft limit toggle
    pub limit_lower: bool,
    /// Upper soft limit toggle
    pub limit_upper: bool,
    /// Label of the lower limit toggle
    pub limit_lower_label: String,
    /// Label of the upper limit toggle
    pub limit_upper_label: String,
    /// Copy button label
    pub copy_label: &'static str,
    /// Reset confirmation visible
    pub reset_modal_open: bool,
    /// Every card control is disabled while the reset confirmation is up
    pub controls_blocked: bool,
    /// Background CSS color
    pub background: String,
    /// Text color readable on the background
    pub foreground: String,
    /// Emoji for the count
    pub emoji: String,
    /// Message for the count
    pub message: String,
    /// CSS transform of the card
    pub card_transform: String,
}

impl ViewModel {
    /// Derive the view of `widget`.
    pub fn from_widget<H: Host>(widget: &CounterWidget<H>) -> Self {
        let state = widget.state();
        let input = &state.input;
        let blocked = state.confirming_reset;
        let color = widget.color();

        let goal_status = state.goal.map(|goal| {
            if state.goal_reached() {
                format!("Goal {goal} reached!")
            } else {
                format!("Goal {goal}: {} to go", goal.abs_diff(state.count))
            }
        });

        Self {
            count: state.count.to_string(),
            input: input.raw.clone(),
            error: input.invalid.then_some(INVALID_INPUT_MESSAGE),
            add_disabled: blocked || !state.can_add_pending(),
            subtract_disabled: blocked || !state.can_subtract_pending(),
            max_count: state.max_count,
            min_count: state.min_count,
            history: state.history.iter().map(str::to_string).collect(),
            goal_status,
            goal_reached: state.goal_reached(),
            auto_mode: state.auto_mode,
            limit_lower: state.limit_lower,
            limit_upper: state.limit_upper,
            limit_lower_label: format!("Stop at {}", state.settings.lower_bound),
            limit_upper_label: format!("Stop at {}", state.settings.upper_bound),
            copy_label: if state.copied { COPIED_LABEL } else { COPY_LABEL },
            reset_modal_open: state.confirming_reset,
            controls_blocked: blocked,
            background: color.to_css(),
            foreground: color.to_color().readable_text().to_hex(),
            emoji: widget.emoji().to_string(),
            message: widget.message().to_string(),
            card_transform: card_transform(widget),
        }
    }
}

/// `translate(x px, y px) rotate(a deg)` for the card's current pose.
pub fn card_transform<H: Host>(widget: &CounterWidget<H>) -> String {
    let bounce = widget.bounce();
    let p = bounce.position();
    format!(
        "translate({:.2}px, {:.2}px) rotate({:.2}deg)",
        p.x,
        p.y,
        bounce.angle()
    )
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use tally_core::{CounterMessage, Size};

    proptest! {
        #[test]
        fn prop_enabled_buttons_always_apply(
            start in -200i64..200,
            raw in "-?[0-9]{1,3}",
            lower in any::<bool>(),
            upper in any::<bool>(),
        ) {
            let mut w = CounterWidget::virtual_default(Size::new(800.0, 600.0));
            w.dispatch(CounterMessage::Add(start));
            w.dispatch(CounterMessage::SetLimitLower(lower));
            w.dispatch(CounterMessage::SetLimitUpper(upper));
            w.dispatch(CounterMessage::InputChanged(raw));

            let view = ViewModel::from_widget(&w);
            let before = w.state().count;
            w.add_pending();
            if !view.add_disabled {
                prop_assert_eq!(w.state().count, before + w.state().input.pending);
            } else {
                prop_assert_eq!(w.state().count, before);
            }
        }
    }
}
