//! Browser runtime for the Tally widget.
//!
//! Bridges [`CounterWidget`](tally_core::CounterWidget) to the DOM: builds
//! the element tree, installs listeners, drives the animation loop and
//! implements the core [`Host`](tally_core::Host) over browser timers.

#[cfg(target_arch = "wasm32")]
pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod error;
#[cfg(target_arch = "wasm32")]
pub mod host;
#[cfg(target_arch = "wasm32")]
pub mod logging;

#[cfg(target_arch = "wasm32")]
pub use app::CounterApp;
#[cfg(target_arch = "wasm32")]
pub use error::MountError;
#[cfg(target_arch = "wasm32")]
pub use host::BrowserHost;
