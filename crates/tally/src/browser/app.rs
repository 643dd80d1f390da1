//! WASM application entry point.

use super::dom::Dom;
use super::error::MountError;
use super::host::BrowserHost;
use super::logging;
use crate::view::{card_transform, ViewModel};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tally_core::{AutoMode, CounterMessage, CounterWidget, Key, Size, WidgetConfig};
use tracing::{debug, info, warn, Level};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlInputElement, KeyboardEvent, Window};

/// Widget state shared with every browser callback.
pub struct Mounted {
    pub(crate) widget: CounterWidget<BrowserHost>,
    pub(crate) dom: Dom,
    window: Window,
    frame_request: Option<i32>,
}

impl Mounted {
    /// Copy the view into the DOM, then hand the card's laid-out size back
    /// to the bounce so its edges match what is on screen.
    pub(crate) fn render(&mut self) {
        self.dom.render(&ViewModel::from_widget(&self.widget));
        let card = self.dom.card_size();
        self.widget.on_card_resize(card);
    }
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

type FrameLoop = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Counter widget mounted into the page.
#[wasm_bindgen]
pub struct CounterApp {
    mounted: Rc<RefCell<Mounted>>,
    listeners: Vec<Listener>,
    frame: FrameLoop,
}

#[wasm_bindgen]
impl CounterApp {
    /// Mount under the element with id `root_id`.
    ///
    /// `config` is an optional JSON [`WidgetConfig`]; omitted fields take
    /// their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(root_id: &str, config: Option<String>) -> Result<CounterApp, JsValue> {
        Ok(Self::mount(root_id, config.as_deref())?)
    }

    /// Current count.
    pub fn count(&self) -> i64 {
        self.mounted.borrow().widget.state().count
    }

    /// Current view as JSON.
    pub fn view_json(&self) -> Result<String, JsValue> {
        let mounted = self.mounted.borrow();
        serde_json::to_string(&ViewModel::from_widget(&mounted.widget))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Effective configuration as JSON, defaults filled in.
    pub fn config_json(&self) -> Result<String, JsValue> {
        let mounted = self.mounted.borrow();
        mounted
            .widget
            .config()
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Whether the widget is still live.
    pub fn is_mounted(&self) -> bool {
        self.mounted.borrow().widget.is_mounted()
    }

    /// Stop every timer and the animation loop, detach listeners and remove
    /// the widget from the page. Idempotent.
    pub fn unmount(&mut self) {
        if let Ok(mut mounted) = self.mounted.try_borrow_mut() {
            if !mounted.widget.is_mounted() {
                return;
            }
            mounted.widget.unmount();
            if let Some(handle) = mounted.frame_request.take() {
                let _ = mounted.window.cancel_animation_frame(handle);
            }
            mounted.dom.remove();
        }
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        self.frame.borrow_mut().take();
        info!("tally unmounted");
    }
}

impl CounterApp {
    /// Mount under `root_id` with an optional JSON config.
    pub fn mount(root_id: &str, config: Option<&str>) -> Result<Self, MountError> {
        let window = web_sys::window().ok_or(MountError::NoWindow)?;
        let document = window.document().ok_or(MountError::NoDocument)?;
        let root = document
            .get_element_by_id(root_id)
            .ok_or_else(|| MountError::RootNotFound(root_id.to_string()))?;
        let config = match config {
            Some(json) => WidgetConfig::from_json(json)?,
            None => WidgetConfig::default(),
        };

        let dom = Dom::build(&document, &root, &config)?;
        let viewport = viewport(&window);
        let seed = seed();
        debug!(seed, "seeded card placement");

        let mounted = Rc::new_cyclic(|weak: &Weak<RefCell<Mounted>>| {
            let host = BrowserHost::new(window.clone(), weak.clone());
            RefCell::new(Mounted {
                widget: CounterWidget::mount(config, host, viewport, seed),
                dom,
                window: window.clone(),
                frame_request: None,
            })
        });
        mounted.borrow_mut().render();

        let mut app = Self {
            mounted,
            listeners: Vec::new(),
            frame: Rc::new(RefCell::new(None)),
        };
        app.wire(&window)?;
        app.start_frames();
        info!(root_id, "tally mounted");
        Ok(app)
    }

    fn wire(&mut self, window: &Window) -> Result<(), MountError> {
        let (dom_input, dom_goal, buttons, limits) = {
            let m = self.mounted.borrow();
            let d = &m.dom;
            (
                d.input.clone(),
                d.goal.clone(),
                [
                    (d.add.clone(), Control::Add),
                    (d.subtract.clone(), Control::Subtract),
                    (d.auto_down.clone(), Control::Auto(AutoMode::Down)),
                    (d.auto_stop.clone(), Control::Auto(AutoMode::None)),
                    (d.auto_up.clone(), Control::Auto(AutoMode::Up)),
                    (d.clear_goal.clone(), Control::ClearGoal),
                    (d.copy.clone(), Control::Copy),
                    (d.reset.clone(), Control::RequestReset),
                    (d.confirm.clone(), Control::ConfirmReset),
                    (d.cancel.clone(), Control::CancelReset),
                ],
                [(d.limit_lower.clone(), true), (d.limit_upper.clone(), false)],
            )
        };

        self.listen(&dom_input, "input", move |m, _| {
            let raw = m.dom.input.value();
            m.widget.dispatch(CounterMessage::InputChanged(raw));
        })?;

        self.listen(&dom_goal, "input", move |m, _| {
            let raw = m.dom.goal.value();
            let msg = if raw.trim().is_empty() {
                CounterMessage::ClearGoal
            } else {
                CounterMessage::SetGoal(raw)
            };
            m.widget.dispatch(msg);
        })?;

        for (button, control) in buttons {
            self.listen(&button, "click", move |m, _| control.apply(m))?;
        }

        for (checkbox, lower) in limits {
            self.listen(&checkbox, "change", move |m, event| {
                let on = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some_and(|input| input.checked());
                let msg = if lower {
                    CounterMessage::SetLimitLower(on)
                } else {
                    CounterMessage::SetLimitUpper(on)
                };
                m.widget.dispatch(msg);
            })?;
        }

        let document = window.document().ok_or(MountError::NoDocument)?;
        self.listen(&document, "keydown", |m, event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if event.ctrl_key() || event.meta_key() || event.alt_key() {
                return;
            }
            // typing in a field is not a shortcut unless the modal is up
            let in_field = event
                .target()
                .is_some_and(|t| t.has_type::<HtmlInputElement>());
            if in_field && !m.widget.state().confirming_reset {
                return;
            }
            let Some(key) = Key::from_dom(&event.key()) else {
                return;
            };
            let confirming = key == Key::Enter && m.widget.state().confirming_reset;
            if m.widget.on_key(key) {
                event.prevent_default();
                if confirming {
                    m.dom.goal.set_value("");
                }
            }
        })?;

        self.listen(window, "resize", |m, _| {
            let size = viewport(&m.window);
            m.widget.on_resize(size);
        })?;

        Ok(())
    }

    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl Fn(&mut Mounted, &Event) + 'static,
    ) -> Result<(), MountError> {
        let app = Rc::downgrade(&self.mounted);
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(app) = app.upgrade() else {
                return;
            };
            let Ok(mut mounted) = app.try_borrow_mut() else {
                warn!(kind, "event while widget busy");
                return;
            };
            if !mounted.widget.is_mounted() {
                return;
            }
            handler(&mut mounted, &event);
            mounted.render();
        });
        target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .map_err(|e| MountError::dom(&e))?;
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(())
    }

    fn start_frames(&self) {
        let app = Rc::downgrade(&self.mounted);
        let frame = Rc::clone(&self.frame);
        *self.frame.borrow_mut() = Some(Closure::new(move |now: f64| {
            let Some(app) = app.upgrade() else {
                return;
            };
            let Ok(mut mounted) = app.try_borrow_mut() else {
                return;
            };
            if !mounted.widget.is_mounted() {
                return;
            }
            mounted.widget.on_frame(now);
            mounted.dom.render_card(&card_transform(&mounted.widget));
            mounted.frame_request = request_frame(&mounted.window, &frame);
        }));

        let mut mounted = self.mounted.borrow_mut();
        mounted.frame_request = request_frame(&mounted.window, &self.frame);
    }
}

impl Drop for CounterApp {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Clickable controls and the message each one sends.
#[derive(Debug, Clone, Copy)]
enum Control {
    Add,
    Subtract,
    Auto(AutoMode),
    ClearGoal,
    Copy,
    RequestReset,
    ConfirmReset,
    CancelReset,
}

impl Control {
    fn apply(self, m: &mut Mounted) {
        let modal_control = matches!(self, Self::ConfirmReset | Self::CancelReset);
        if m.widget.state().confirming_reset != modal_control {
            debug!(control = ?self, "control hidden behind the reset modal");
            return;
        }
        match self {
            Self::Add => m.widget.add_pending(),
            Self::Subtract => m.widget.subtract_pending(),
            Self::Auto(mode) => m.widget.dispatch(CounterMessage::SetAuto(mode)),
            Self::ClearGoal => {
                m.dom.goal.set_value("");
                m.widget.dispatch(CounterMessage::ClearGoal);
            }
            Self::Copy => m.widget.dispatch(CounterMessage::Copy),
            Self::RequestReset => m.widget.dispatch(CounterMessage::RequestReset),
            Self::ConfirmReset => {
                m.dom.goal.set_value("");
                m.widget.dispatch(CounterMessage::ConfirmReset);
            }
            Self::CancelReset => m.widget.dispatch(CounterMessage::CancelReset),
        }
    }
}

fn request_frame(window: &Window, frame: &FrameLoop) -> Option<i32> {
    let frame = frame.borrow();
    let callback = frame.as_ref()?;
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .ok()
}

fn viewport(window: &Window) -> Size {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    Size::new(dim(window.inner_width()), dim(window.inner_height()))
}

fn seed() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(err) => {
            warn!(%err, "getrandom failed, seeding from the clock");
            js_sys::Date::now().to_bits()
        }
    }
}

/// Module initialization: panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init(Level::INFO);
}
