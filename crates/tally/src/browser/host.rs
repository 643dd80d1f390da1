//! [`Host`] over `setInterval`, `setTimeout` and `navigator.clipboard`.

use super::app::Mounted;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Weak;
use tally_core::{Host, TaskId};
use tracing::{debug, trace, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

struct Interval {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

/// Browser timers and clipboard.
///
/// Timer callbacks hold only a weak reference to the mounted widget, so a
/// dropped app never sees them fire.
pub struct BrowserHost {
    window: Window,
    app: Weak<RefCell<Mounted>>,
    next_id: u64,
    intervals: HashMap<TaskId, Interval>,
    timeouts: HashMap<TaskId, i32>,
}

impl BrowserHost {
    pub(crate) fn new(window: Window, app: Weak<RefCell<Mounted>>) -> Self {
        Self {
            window,
            app,
            next_id: 0,
            intervals: HashMap::new(),
            timeouts: HashMap::new(),
        }
    }

    /// Number of live browser timers.
    pub fn pending(&self) -> usize {
        self.intervals.len() + self.timeouts.len()
    }

    /// Forget a one-shot timer that has fired.
    pub(crate) fn settle(&mut self, task: TaskId) {
        self.timeouts.remove(&task);
    }

    fn next_task(&mut self) -> TaskId {
        self.next_id += 1;
        TaskId(self.next_id)
    }
}

fn millis(ms: u32) -> i32 {
    i32::try_from(ms).unwrap_or(i32::MAX)
}

/// Deliver a fired timer to the widget, if it is still alive.
fn fire(app: &Weak<RefCell<Mounted>>, task: TaskId) {
    let Some(app) = app.upgrade() else {
        return;
    };
    let Ok(mut mounted) = app.try_borrow_mut() else {
        warn!(task = task.0, "timer fired while widget busy");
        return;
    };
    mounted.widget.host_mut().settle(task);
    if mounted.widget.on_task_fired(task) {
        mounted.render();
    }
}

impl Host for BrowserHost {
    fn schedule_repeating(&mut self, interval_ms: u32) -> TaskId {
        let task = self.next_task();
        let app = self.app.clone();
        let callback = Closure::<dyn FnMut()>::new(move || fire(&app, task));
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                millis(interval_ms.max(1)),
            ) {
            Ok(handle) => {
                trace!(task = task.0, handle, interval_ms, "interval installed");
                self.intervals.insert(
                    task,
                    Interval {
                        handle,
                        _callback: callback,
                    },
                );
            }
            Err(err) => warn!(?err, "setInterval failed"),
        }
        task
    }

    fn schedule_once(&mut self, delay_ms: u32) -> TaskId {
        let task = self.next_task();
        let app = self.app.clone();
        // freed by wasm-bindgen once invoked; a cleared timeout leaks it
        let callback = Closure::once_into_js(move || fire(&app, task));
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                millis(delay_ms),
            ) {
            Ok(handle) => {
                trace!(task = task.0, handle, delay_ms, "timeout installed");
                self.timeouts.insert(task, handle);
            }
            Err(err) => warn!(?err, "setTimeout failed"),
        }
        task
    }

    fn cancel(&mut self, task: TaskId) {
        if let Some(interval) = self.intervals.remove(&task) {
            self.window.clear_interval_with_handle(interval.handle);
        }
        if let Some(handle) = self.timeouts.remove(&task) {
            self.window.clear_timeout_with_handle(handle);
        }
    }

    fn write_clipboard(&mut self, text: &str) {
        debug!(len = text.len(), "clipboard write requested");
        // fire-and-forget
        let _ = self.window.navigator().clipboard().write_text(text);
    }
}
