//! Host services the widget needs: timers and the clipboard.
//!
//! The browser runtime implements [`Host`] over `setInterval`, `setTimeout`
//! and `navigator.clipboard`. [`VirtualHost`] implements it over a virtual
//! clock, for tests and native embedding.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u64);

/// Environment services.
///
/// When a scheduled task fires, the host must call
/// [`CounterWidget::on_task_fired`](crate::CounterWidget::on_task_fired)
/// with the id it returned here. After [`Host::cancel`] the id must never
/// fire again.
pub trait Host {
    /// Fire every `interval_ms` until cancelled.
    fn schedule_repeating(&mut self, interval_ms: u32) -> TaskId;

    /// Fire once after `delay_ms`.
    fn schedule_once(&mut self, delay_ms: u32) -> TaskId;

    /// Cancel a task. Unknown or already-finished ids are ignored.
    fn cancel(&mut self, task: TaskId);

    /// Write text to the clipboard. Fire-and-forget.
    fn write_clipboard(&mut self, text: &str);
}

#[derive(Debug, Clone)]
struct VirtualTask {
    due_ms: u64,
    interval_ms: Option<u64>,
}

/// Deterministic host driven by an explicit clock.
#[derive(Debug, Default)]
pub struct VirtualHost {
    now_ms: u64,
    next_id: u64,
    tasks: BTreeMap<TaskId, VirtualTask>,
    clipboard: Vec<String>,
    clipboard_fails: bool,
}

impl VirtualHost {
    /// Create a host at time 0 with a working clipboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every clipboard write silently fail.
    #[must_use]
    pub const fn with_failing_clipboard(mut self) -> Self {
        self.clipboard_fails = true;
        self
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of live tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Whether `task` is still scheduled.
    #[must_use]
    pub fn is_scheduled(&self, task: TaskId) -> bool {
        self.tasks.contains_key(&task)
    }

    /// Every successful clipboard write, oldest first.
    #[must_use]
    pub fn clipboard(&self) -> &[String] {
        &self.clipboard
    }

    /// Pop the earliest task due at or before `until_ms`, moving the clock to
    /// its due time. Repeating tasks are rescheduled one interval later.
    ///
    /// Ties fire in scheduling order.
    pub fn next_due(&mut self, until_ms: u64) -> Option<TaskId> {
        let (&id, task) = self
            .tasks
            .iter()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(id, t)| (t.due_ms, **id))?;
        let due_ms = task.due_ms;
        let interval_ms = task.interval_ms;

        self.now_ms = self.now_ms.max(due_ms);
        match interval_ms {
            Some(interval) => {
                if let Some(task) = self.tasks.get_mut(&id) {
                    task.due_ms = due_ms + interval;
                }
            }
            None => {
                self.tasks.remove(&id);
            }
        }
        trace!(task = id.0, now_ms = self.now_ms, "virtual task fired");
        Some(id)
    }

    /// Move the clock forward to `ms`. Never moves it back.
    pub fn set_now(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }

    fn insert(&mut self, delay_ms: u32, interval_ms: Option<u64>) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.tasks.insert(
            id,
            VirtualTask {
                due_ms: self.now_ms + u64::from(delay_ms),
                interval_ms,
            },
        );
        id
    }
}

impl Host for VirtualHost {
    fn schedule_repeating(&mut self, interval_ms: u32) -> TaskId {
        let interval_ms = interval_ms.max(1);
        self.insert(interval_ms, Some(u64::from(interval_ms)))
    }

    fn schedule_once(&mut self, delay_ms: u32) -> TaskId {
        self.insert(delay_ms, None)
    }

    fn cancel(&mut self, task: TaskId) {
        self.tasks.remove(&task);
    }

    fn write_clipboard(&mut self, text: &str) {
        if !self.clipboard_fails {
            self.clipboard.push(text.to_string());
        }
    }
}
