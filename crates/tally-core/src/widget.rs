//! The counter widget controller.
//!
//! [`CounterWidget`] owns the logical [`CounterState`], the bounce animation
//! and the handles of every task it has asked the [`Host`] to run. Each
//! host callback enters through one method:
//!
//! - UI events → [`CounterWidget::dispatch`] / [`CounterWidget::on_key`]
//! - timers → [`CounterWidget::on_task_fired`]
//! - animation frames → [`CounterWidget::on_frame`]
//! - viewport changes → [`CounterWidget::on_resize`]
//! - card layout changes → [`CounterWidget::on_card_resize`]
//!
//! Task ids the widget no longer owns are ignored, and nothing mutates the
//! widget after [`CounterWidget::unmount`].

use crate::bounce::Bounce;
use crate::clock::FrameClock;
use crate::color::Hsl;
use crate::config::WidgetConfig;
use crate::geometry::Size;
use crate::host::{Host, TaskId, VirtualHost};
use crate::keymap::{key_action, Key};
use crate::presentation::count_color;
use crate::random::SeededRng;
use crate::state::{Command, CounterMessage, CounterState, State};
use tracing::{debug, trace};

/// Counter widget bound to a host.
pub struct CounterWidget<H: Host> {
    state: CounterState,
    config: WidgetConfig,
    host: H,
    bounce: Bounce,
    clock: FrameClock,
    rng: SeededRng,
    auto_task: Option<TaskId>,
    copied_task: Option<TaskId>,
    mounted: bool,
}

impl<H: Host> CounterWidget<H> {
    /// Mount a fresh widget.
    ///
    /// `seed` drives card placement; pass a fixed value for reproducible runs.
    pub fn mount(config: WidgetConfig, host: H, viewport: Size, seed: u64) -> Self {
        let mut rng = SeededRng::new(seed);
        let bounce = Bounce::new(&config.bounce, viewport, &mut rng);
        let clock = FrameClock::new(config.bounce.max_frame_ratio);
        debug!(
            width = viewport.width,
            height = viewport.height,
            "counter widget mounted"
        );
        Self {
            state: CounterState::new(config.counter_settings()),
            config,
            host,
            bounce,
            clock,
            rng,
            auto_task: None,
            copied_task: None,
            mounted: true,
        }
    }

    /// Logical state.
    pub const fn state(&self) -> &CounterState {
        &self.state
    }

    /// Configuration the widget was mounted with.
    pub const fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Card animation state.
    pub const fn bounce(&self) -> &Bounce {
        &self.bounce
    }

    /// The host.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Whether the widget still accepts events.
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Handle of the running auto-mode task.
    pub const fn auto_task(&self) -> Option<TaskId> {
        self.auto_task
    }

    /// Handle of the pending copied-flag clear.
    pub const fn copied_task(&self) -> Option<TaskId> {
        self.copied_task
    }

    /// Apply a message and carry out the resulting command.
    pub fn dispatch(&mut self, msg: CounterMessage) {
        if !self.mounted {
            trace!(?msg, "dispatch after unmount ignored");
            return;
        }
        let cmd = self.state.update(msg);
        self.execute(cmd);
    }

    /// Add the value currently in the input field.
    pub fn add_pending(&mut self) {
        self.dispatch(CounterMessage::Add(self.state.input.pending));
    }

    /// Subtract the value currently in the input field.
    pub fn subtract_pending(&mut self) {
        self.dispatch(CounterMessage::Subtract(self.state.input.pending));
    }

    /// Route a key press. Returns whether the key mapped to a message.
    pub fn on_key(&mut self, key: Key) -> bool {
        match key_action(key, &self.state) {
            Some(msg) if self.mounted => {
                self.dispatch(msg);
                true
            }
            _ => false,
        }
    }

    /// A host task fired. Returns whether the widget owned it.
    pub fn on_task_fired(&mut self, task: TaskId) -> bool {
        if !self.mounted {
            return false;
        }
        if self.auto_task == Some(task) {
            self.dispatch(CounterMessage::AutoTick);
            true
        } else if self.copied_task == Some(task) {
            self.copied_task = None;
            self.dispatch(CounterMessage::CopiedExpired);
            true
        } else {
            debug!(task = task.0, "stale task ignored");
            false
        }
    }

    /// Animation frame at host time `now_ms`.
    pub fn on_frame(&mut self, now_ms: f64) {
        if !self.mounted {
            return;
        }
        let ratio = self.clock.tick(now_ms);
        self.bounce.step(ratio);
    }

    /// Viewport resized.
    pub fn on_resize(&mut self, viewport: Size) {
        if !self.mounted {
            return;
        }
        debug!(
            width = viewport.width,
            height = viewport.height,
            "viewport resized"
        );
        self.bounce.resize(viewport, &mut self.rng);
    }

    /// The card's rendered size changed. Sizes that are not positive and
    /// finite are ignored.
    pub fn on_card_resize(&mut self, card: Size) {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !self.mounted || !valid(card.width) || !valid(card.height) {
            return;
        }
        if card != self.bounce.card() {
            trace!(width = card.width, height = card.height, "card resized");
            self.bounce.set_card(card);
        }
    }

    /// Cancel every task and stop accepting events. Idempotent.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.cancel_auto();
        self.cancel_copied();
        self.mounted = false;
        debug!("counter widget unmounted");
    }

    /// Background color for the current count.
    pub fn color(&self) -> Hsl {
        count_color(self.state.count, self.config.color_range)
    }

    /// Emoji for the current count.
    pub fn emoji(&self) -> &str {
        self.config.emoji.select(self.state.count)
    }

    /// Message for the current count.
    pub fn message(&self) -> &str {
        self.config.messages.select(self.state.count)
    }

    fn execute(&mut self, cmd: Command) {
        for cmd in cmd.into_leaves() {
            match cmd {
                Command::StartAuto { interval_ms } => {
                    self.cancel_auto();
                    self.auto_task = Some(self.host.schedule_repeating(interval_ms));
                }
                Command::StopAuto => self.cancel_auto(),
                Command::WriteClipboard { text } => self.host.write_clipboard(&text),
                Command::ScheduleCopiedClear { delay_ms } => {
                    self.cancel_copied();
                    self.copied_task = Some(self.host.schedule_once(delay_ms));
                }
                Command::CancelCopiedClear => self.cancel_copied(),
                Command::None | Command::Batch(_) => {}
            }
        }
    }

    fn cancel_auto(&mut self) {
        if let Some(task) = self.auto_task.take() {
            self.host.cancel(task);
        }
    }

    fn cancel_copied(&mut self) {
        if let Some(task) = self.copied_task.take() {
            self.host.cancel(task);
        }
    }
}

impl<H: Host> Drop for CounterWidget<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl CounterWidget<VirtualHost> {
    /// Mount on a fresh [`VirtualHost`] with the default config.
    pub fn virtual_default(viewport: Size) -> Self {
        Self::mount(WidgetConfig::default(), VirtualHost::new(), viewport, 42)
    }

    /// Run virtual time forward by `ms`, firing every task that falls due
    /// in order.
    pub fn advance(&mut self, ms: u64) {
        let target = self.host.now_ms() + ms;
        while let Some(task) = self.host.next_due(target) {
            self.on_task_fired(task);
        }
        self.host.set_now(target);
    }
}
