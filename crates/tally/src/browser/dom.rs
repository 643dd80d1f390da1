//! DOM tree of the widget and the copy of a [`ViewModel`] into it.

use super::error::MountError;
use crate::view::{ViewModel, INPUT_PLACEHOLDER};
use tally_core::{AutoMode, Size, WidgetConfig};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement};

/// Handles to every element the widget updates or listens on.
pub struct Dom {
    document: Document,
    pub(crate) stage: HtmlElement,
    pub(crate) card: HtmlElement,
    emoji: Element,
    count: Element,
    message: Element,
    pub(crate) input: HtmlInputElement,
    error: HtmlElement,
    pub(crate) add: HtmlButtonElement,
    pub(crate) subtract: HtmlButtonElement,
    pub(crate) auto_down: HtmlButtonElement,
    pub(crate) auto_stop: HtmlButtonElement,
    pub(crate) auto_up: HtmlButtonElement,
    pub(crate) limit_lower: HtmlInputElement,
    limit_lower_label: Element,
    pub(crate) limit_upper: HtmlInputElement,
    limit_upper_label: Element,
    pub(crate) goal: HtmlInputElement,
    pub(crate) clear_goal: HtmlButtonElement,
    goal_status: HtmlElement,
    watermarks: Element,
    history: Element,
    pub(crate) copy: HtmlButtonElement,
    pub(crate) reset: HtmlButtonElement,
    modal: HtmlElement,
    pub(crate) confirm: HtmlButtonElement,
    pub(crate) cancel: HtmlButtonElement,
}

impl Dom {
    /// Build the tree under `root`.
    pub fn build(
        document: &Document,
        root: &Element,
        config: &WidgetConfig,
    ) -> Result<Self, MountError> {
        let b = Builder { document };

        let stage: HtmlElement = b.child(root, "div", "tally-stage")?;
        stage
            .style()
            .set_css_text("position:fixed;inset:0;overflow:hidden;transition:background 0.3s;");

        let card: HtmlElement = b.child(&stage, "div", "tally-card")?;
        card.style().set_css_text(&format!(
            "position:absolute;left:0;top:0;width:{}px;min-height:{}px;will-change:transform;",
            config.bounce.card_width, config.bounce.card_height
        ));

        let emoji: Element = b.child(&card, "div", "tally-emoji")?;
        let count: Element = b.child(&card, "div", "tally-count")?;
        let message: Element = b.child(&card, "p", "tally-message")?;

        let input: HtmlInputElement = b.child(&card, "input", "tally-input")?;
        input.set_type("text");
        input.set_placeholder(INPUT_PLACEHOLDER);
        input
            .set_attribute("autocomplete", "off")
            .map_err(|e| MountError::dom(&e))?;
        let error: HtmlElement = b.child(&card, "p", "tally-error")?;

        let ops: Element = b.child(&card, "div", "tally-ops")?;
        let subtract = b.button(&ops, "tally-subtract", "−")?;
        let add = b.button(&ops, "tally-add", "+")?;

        let auto: Element = b.child(&card, "div", "tally-auto")?;
        let auto_down = b.button(&auto, "tally-auto-down", "Auto −")?;
        let auto_stop = b.button(&auto, "tally-auto-stop", "Stop")?;
        let auto_up = b.button(&auto, "tally-auto-up", "Auto +")?;

        let limits: Element = b.child(&card, "div", "tally-limits")?;
        let (limit_lower, limit_lower_label) = b.checkbox(&limits, "tally-limit-lower")?;
        let (limit_upper, limit_upper_label) = b.checkbox(&limits, "tally-limit-upper")?;

        let goal_row: Element = b.child(&card, "div", "tally-goal")?;
        let goal: HtmlInputElement = b.child(&goal_row, "input", "tally-goal-input")?;
        goal.set_type("text");
        goal.set_placeholder("Goal");
        let clear_goal = b.button(&goal_row, "tally-goal-clear", "×")?;
        let goal_status: HtmlElement = b.child(&card, "p", "tally-goal-status")?;

        let watermarks: Element = b.child(&card, "p", "tally-watermarks")?;
        let history: Element = b.child(&card, "ul", "tally-history")?;

        let footer: Element = b.child(&card, "div", "tally-footer")?;
        let copy = b.button(&footer, "tally-copy", "Copy")?;
        let reset = b.button(&footer, "tally-reset", "Reset")?;

        let modal: HtmlElement = b.child(&stage, "div", "tally-modal")?;
        modal.style().set_css_text(
            "position:fixed;inset:0;z-index:10;display:none;flex-direction:column;\
             align-items:center;justify-content:center;background:rgba(0,0,0,0.55);",
        );
        modal.set_hidden(true);
        modal
            .set_attribute("role", "dialog")
            .map_err(|e| MountError::dom(&e))?;
        modal
            .set_attribute("aria-modal", "true")
            .map_err(|e| MountError::dom(&e))?;
        let prompt: Element = b.child(&modal, "p", "tally-modal-prompt")?;
        prompt.set_text_content(Some("Reset the counter?"));
        let confirm = b.button(&modal, "tally-confirm", "Reset")?;
        let cancel = b.button(&modal, "tally-cancel", "Cancel")?;

        Ok(Self {
            document: document.clone(),
            stage,
            card,
            emoji,
            count,
            message,
            input,
            error,
            add,
            subtract,
            auto_down,
            auto_stop,
            auto_up,
            limit_lower,
            limit_lower_label,
            limit_upper,
            limit_upper_label,
            goal,
            clear_goal,
            goal_status,
            watermarks,
            history,
            copy,
            reset,
            modal,
            confirm,
            cancel,
        })
    }

    /// Copy `view` into the tree.
    pub fn render(&self, view: &ViewModel) {
        let style = self.stage.style();
        let _ = style.set_property("background", &view.background);
        let _ = style.set_property("color", &view.foreground);
        self.render_card(&view.card_transform);

        self.emoji.set_text_content(Some(&view.emoji));
        self.count.set_text_content(Some(&view.count));
        self.message.set_text_content(Some(&view.message));

        if self.input.value() != view.input {
            self.input.set_value(&view.input);
        }
        self.error.set_hidden(view.error.is_none());
        self.error.set_text_content(view.error);
        self.add.set_disabled(view.add_disabled);
        self.subtract.set_disabled(view.subtract_disabled);
        let blocked = view.controls_blocked;
        for field in [&self.input, &self.goal, &self.limit_lower, &self.limit_upper] {
            field.set_disabled(blocked);
        }
        for button in [
            &self.auto_down,
            &self.auto_stop,
            &self.auto_up,
            &self.clear_goal,
            &self.copy,
            &self.reset,
        ] {
            button.set_disabled(blocked);
        }

        for (button, mode) in [
            (&self.auto_down, AutoMode::Down),
            (&self.auto_stop, AutoMode::None),
            (&self.auto_up, AutoMode::Up),
        ] {
            let pressed = if view.auto_mode == mode { "true" } else { "false" };
            let _ = button.set_attribute("aria-pressed", pressed);
        }

        self.limit_lower.set_checked(view.limit_lower);
        self.limit_lower_label
            .set_text_content(Some(&view.limit_lower_label));
        self.limit_upper.set_checked(view.limit_upper);
        self.limit_upper_label
            .set_text_content(Some(&view.limit_upper_label));

        self.goal_status.set_hidden(view.goal_status.is_none());
        self.goal_status
            .set_text_content(view.goal_status.as_deref());
        let _ = self
            .goal_status
            .set_attribute("data-reached", if view.goal_reached { "true" } else { "false" });

        self.watermarks.set_text_content(Some(&format!(
            "Max {} · Min {}",
            view.max_count, view.min_count
        )));
        self.history.set_text_content(None);
        for line in &view.history {
            if let Ok(item) = self.document.create_element("li") {
                item.set_text_content(Some(line));
                let _ = self.history.append_child(&item);
            }
        }

        self.copy.set_text_content(Some(view.copy_label));
        // inline display wins over the hidden attribute
        let _ = self
            .modal
            .style()
            .set_property("display", if view.reset_modal_open { "flex" } else { "none" });
        self.modal.set_hidden(!view.reset_modal_open);
    }

    /// Laid-out size of the card, before its transform.
    pub fn card_size(&self) -> Size {
        Size::new(
            self.card.offset_width() as f32,
            self.card.offset_height() as f32,
        )
    }

    /// Update only the card pose. Runs every animation frame.
    pub fn render_card(&self, transform: &str) {
        let _ = self.card.style().set_property("transform", transform);
    }

    /// Detach the tree from the document.
    pub fn remove(&self) {
        self.stage.remove();
    }
}

struct Builder<'a> {
    document: &'a Document,
}

impl Builder<'_> {
    fn child<T: JsCast>(&self, parent: &Element, tag: &str, class: &str) -> Result<T, MountError> {
        let el = self
            .document
            .create_element(tag)
            .map_err(|e| MountError::dom(&e))?;
        el.set_class_name(class);
        parent.append_child(&el).map_err(|e| MountError::dom(&e))?;
        el.dyn_into::<T>()
            .map_err(|_| MountError::Dom(format!("<{tag}> has an unexpected type")))
    }

    fn button(
        &self,
        parent: &Element,
        class: &str,
        label: &str,
    ) -> Result<HtmlButtonElement, MountError> {
        let button: HtmlButtonElement = self.child(parent, "button", class)?;
        button.set_type("button");
        button.set_text_content(Some(label));
        Ok(button)
    }

    fn checkbox(
        &self,
        parent: &Element,
        class: &str,
    ) -> Result<(HtmlInputElement, Element), MountError> {
        let label: Element = self.child(parent, "label", class)?;
        let input: HtmlInputElement = self.child(&label, "input", "tally-checkbox")?;
        input.set_type("checkbox");
        let text: Element = self.child(&label, "span", "tally-checkbox-label")?;
        Ok((input, text))
    }
}
