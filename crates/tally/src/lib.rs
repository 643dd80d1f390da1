//! Tally: a bouncing counter widget for the browser.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { CounterApp } from './tally.js';
//!
//! async function main() {
//!     await init();
//!     const app = new CounterApp('counter', '{"auto_interval_ms": 500}');
//!     // later
//!     app.unmount();
//! }
//! ```
//!
//! Outside the browser the same widget runs on
//! [`VirtualHost`](tally_core::VirtualHost); [`view::ViewModel`] shows what
//! it would render.

#![allow(
    clippy::doc_markdown,
    clippy::missing_const_for_fn,
    clippy::needless_pass_by_value,
    clippy::future_not_send,
    unreachable_pub
)]

pub use tally_core::*;

pub mod browser;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub use browser::{CounterApp, MountError};
pub use view::ViewModel;
