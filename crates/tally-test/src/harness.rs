//! Test harness for driving a counter widget the way a user would.

use tally::view::ViewModel;
use tally::{
    AutoMode, CounterMessage, CounterState, CounterWidget, Key, Size, VirtualHost, WidgetConfig,
    BASELINE_FRAME_MS,
};
use tracing::trace;

/// Clickable controls of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// `+` button
    Add,
    /// `−` button
    Subtract,
    /// Auto-up button
    AutoUp,
    /// Auto-down button
    AutoDown,
    /// Auto stop button
    AutoStop,
    /// Lower limit checkbox
    LimitLower,
    /// Upper limit checkbox
    LimitUpper,
    /// Clear-goal button
    ClearGoal,
    /// Copy button
    Copy,
    /// Reset button
    Reset,
    /// Modal confirm button
    Confirm,
    /// Modal cancel button
    Cancel,
}

/// Harness over a widget mounted on a [`VirtualHost`].
///
/// Clicks respect the rendered state: a disabled button or a control hidden
/// behind the reset modal does nothing, as in the browser.
pub struct Harness {
    widget: CounterWidget<VirtualHost>,
    frame_ms: f64,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Default config on a 1280x720 viewport.
    pub fn new() -> Self {
        Self::with_config(WidgetConfig::default())
    }

    /// Custom config on a 1280x720 viewport.
    pub fn with_config(config: WidgetConfig) -> Self {
        Self {
            widget: CounterWidget::mount(config, VirtualHost::new(), Size::new(1280.0, 720.0), 42),
            frame_ms: 0.0,
        }
    }

    /// Clipboard writes fail silently.
    #[must_use]
    pub fn failing_clipboard(self) -> Self {
        let config = self.widget.config().clone();
        Self {
            widget: CounterWidget::mount(
                config,
                VirtualHost::new().with_failing_clipboard(),
                self.widget.bounce().viewport(),
                42,
            ),
            frame_ms: 0.0,
        }
    }

    // === Interaction ===

    /// Replace the numeric field text.
    pub fn type_text(&mut self, text: &str) -> &mut Self {
        self.widget
            .dispatch(CounterMessage::InputChanged(text.to_string()));
        self
    }

    /// Replace the goal field text. Blank text clears the goal.
    pub fn type_goal(&mut self, text: &str) -> &mut Self {
        let msg = if text.trim().is_empty() {
            CounterMessage::ClearGoal
        } else {
            CounterMessage::SetGoal(text.to_string())
        };
        self.widget.dispatch(msg);
        self
    }

    /// Click a control.
    pub fn click(&mut self, control: Control) -> &mut Self {
        if !self.is_enabled(control) {
            trace!(?control, "click on disabled control ignored");
            return self;
        }
        let state = self.widget.state();
        let msg = match control {
            Control::Add => CounterMessage::Add(state.input.pending),
            Control::Subtract => CounterMessage::Subtract(state.input.pending),
            Control::AutoUp => CounterMessage::SetAuto(AutoMode::Up),
            Control::AutoDown => CounterMessage::SetAuto(AutoMode::Down),
            Control::AutoStop => CounterMessage::SetAuto(AutoMode::None),
            Control::LimitLower => CounterMessage::SetLimitLower(!state.limit_lower),
            Control::LimitUpper => CounterMessage::SetLimitUpper(!state.limit_upper),
            Control::ClearGoal => CounterMessage::ClearGoal,
            Control::Copy => CounterMessage::Copy,
            Control::Reset => CounterMessage::RequestReset,
            Control::Confirm => CounterMessage::ConfirmReset,
            Control::Cancel => CounterMessage::CancelReset,
        };
        self.widget.dispatch(msg);
        self
    }

    /// Click a control `n` times.
    pub fn click_n(&mut self, control: Control, n: usize) -> &mut Self {
        for _ in 0..n {
            self.click(control);
        }
        self
    }

    /// Press a key.
    pub fn press(&mut self, key: Key) -> &mut Self {
        self.widget.on_key(key);
        self
    }

    /// Press a key by its DOM `KeyboardEvent.key` name. Unknown names do nothing.
    pub fn press_dom(&mut self, key: &str) -> &mut Self {
        if let Some(key) = Key::from_dom(key) {
            self.press(key);
        }
        self
    }

    /// Advance virtual time, firing due timers.
    pub fn advance(&mut self, ms: u64) -> &mut Self {
        self.widget.advance(ms);
        self
    }

    /// Run `n` animation frames one baseline frame apart.
    pub fn frames(&mut self, n: usize) -> &mut Self {
        for _ in 0..n {
            self.frame_ms += BASELINE_FRAME_MS;
            self.widget.on_frame(self.frame_ms);
        }
        self
    }

    /// Run one animation frame `gap_ms` after the previous one.
    pub fn frame_after(&mut self, gap_ms: f64) -> &mut Self {
        self.frame_ms += gap_ms;
        self.widget.on_frame(self.frame_ms);
        self
    }

    /// Resize the viewport.
    pub fn resize(&mut self, width: f32, height: f32) -> &mut Self {
        self.widget.on_resize(Size::new(width, height));
        self
    }

    /// Unmount the widget.
    pub fn unmount(&mut self) -> &mut Self {
        self.widget.unmount();
        self
    }

    // === Queries ===

    /// Rendered view.
    pub fn view(&self) -> ViewModel {
        ViewModel::from_widget(&self.widget)
    }

    /// Logical state.
    pub fn state(&self) -> &CounterState {
        self.widget.state()
    }

    /// The widget.
    pub fn widget(&self) -> &CounterWidget<VirtualHost> {
        &self.widget
    }

    /// Whether a click on `control` would reach the widget.
    pub fn is_enabled(&self, control: Control) -> bool {
        let view = self.view();
        match control {
            Control::Confirm | Control::Cancel => view.reset_modal_open,
            _ if view.controls_blocked => false,
            Control::Add => !view.add_disabled,
            Control::Subtract => !view.subtract_disabled,
            _ => true,
        }
    }

    // === Assertions ===

    /// Assert the count.
    ///
    /// # Panics
    ///
    /// Panics if the count differs.
    pub fn assert_count(&self, expected: i64) -> &Self {
        let actual = self.state().count;
        assert_eq!(actual, expected, "Expected count {expected} but got {actual}");
        self
    }

    /// Assert the history lines, newest first.
    ///
    /// # Panics
    ///
    /// Panics if the history differs.
    pub fn assert_history(&self, expected: &[&str]) -> &Self {
        let actual: Vec<&str> = self.state().history.iter().collect();
        assert_eq!(actual, expected, "History mismatch");
        self
    }

    /// Assert the watermarks.
    ///
    /// # Panics
    ///
    /// Panics if either watermark differs.
    pub fn assert_watermarks(&self, max: i64, min: i64) -> &Self {
        let s = self.state();
        assert_eq!(
            (s.max_count, s.min_count),
            (max, min),
            "Expected max/min {max}/{min} but got {}/{}",
            s.max_count,
            s.min_count
        );
        self
    }

    /// Assert whether the inline input error shows.
    ///
    /// # Panics
    ///
    /// Panics if the error visibility differs.
    pub fn assert_input_error(&self, shown: bool) -> &Self {
        let view = self.view();
        assert_eq!(
            view.error.is_some(),
            shown,
            "Expected input error shown={shown}, got {:?}",
            view.error
        );
        self
    }

    /// Assert whether a control accepts clicks.
    ///
    /// # Panics
    ///
    /// Panics if the control state differs.
    pub fn assert_enabled(&self, control: Control, enabled: bool) -> &Self {
        assert_eq!(
            self.is_enabled(control),
            enabled,
            "Expected {control:?} enabled={enabled}"
        );
        self
    }

    /// Assert the copied flag.
    ///
    /// # Panics
    ///
    /// Panics if the flag differs.
    pub fn assert_copied(&self, copied: bool) -> &Self {
        assert_eq!(self.state().copied, copied, "Expected copied={copied}");
        self
    }

    /// Assert every successful clipboard write, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the writes differ.
    pub fn assert_clipboard(&self, expected: &[&str]) -> &Self {
        let actual: Vec<&str> = self
            .widget
            .host()
            .clipboard()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(actual, expected, "Clipboard mismatch");
        self
    }

    /// Assert whether the goal is reached.
    ///
    /// # Panics
    ///
    /// Panics if the goal state differs.
    pub fn assert_goal_reached(&self, reached: bool) -> &Self {
        assert_eq!(
            self.state().goal_reached(),
            reached,
            "Expected goal reached={reached} (goal {:?}, count {})",
            self.state().goal,
            self.state().count
        );
        self
    }

    /// Assert the auto mode.
    ///
    /// # Panics
    ///
    /// Panics if the mode differs.
    pub fn assert_auto(&self, mode: AutoMode) -> &Self {
        assert_eq!(self.state().auto_mode, mode, "Auto mode mismatch");
        self
    }

    /// Assert whether the reset modal is open.
    ///
    /// # Panics
    ///
    /// Panics if the modal state differs.
    pub fn assert_modal(&self, open: bool) -> &Self {
        assert_eq!(
            self.state().confirming_reset,
            open,
            "Expected reset modal open={open}"
        );
        self
    }

    /// Assert the number of live host timers.
    ///
    /// # Panics
    ///
    /// Panics if the count differs.
    pub fn assert_timers(&self, expected: usize) -> &Self {
        let actual = self.widget.host().pending();
        assert_eq!(actual, expected, "Expected {expected} timers but found {actual}");
        self
    }

    /// Assert the card lies inside the viewport.
    ///
    /// # Panics
    ///
    /// Panics if the card is outside its bounds.
    pub fn assert_card_inside(&self) -> &Self {
        let bounce = self.widget.bounce();
        let p = bounce.position();
        let max = bounce.bounds();
        assert!(
            (0.0..=max.width).contains(&p.x) && (0.0..=max.height).contains(&p.y),
            "Card at ({}, {}) outside bounds {}x{}",
            p.x,
            p.y,
            max.width,
            max.height
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_add_does_nothing() {
        let mut h = Harness::new();
        h.click(Control::Add).assert_count(0).assert_history(&[]);
        h.type_text("x").click(Control::Add).assert_count(0);
    }

    #[test]
    fn test_modal_blocks_other_controls() {
        let mut h = Harness::new();
        h.type_text("2").click(Control::Reset);
        h.assert_enabled(Control::Add, false)
            .assert_enabled(Control::Confirm, true);
        h.click(Control::Add).assert_count(0);
        h.click(Control::Cancel).click(Control::Add).assert_count(2);
    }

    #[test]
    fn test_confirm_hidden_without_modal() {
        let mut h = Harness::new();
        h.type_text("5").click(Control::Add);
        h.assert_enabled(Control::Confirm, false);
        h.click(Control::Confirm).assert_count(5);
    }

    #[test]
    fn test_checkbox_toggles() {
        let mut h = Harness::new();
        h.click(Control::LimitLower);
        assert!(h.state().limit_lower);
        h.click(Control::LimitLower);
        assert!(!h.state().limit_lower);
    }

    #[test]
    fn test_failing_clipboard_keeps_flag() {
        let mut h = Harness::new().failing_clipboard();
        h.click(Control::Copy)
            .assert_copied(true)
            .assert_clipboard(&[]);
    }

    #[test]
    fn test_press_dom_ignores_unknown() {
        let mut h = Harness::new();
        h.type_text("1").press_dom("q").press_dom("ArrowUp");
        h.assert_count(1);
    }
}
