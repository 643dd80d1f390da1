//! Errors raised while mounting the widget.

use tally_core::ConfigError;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Mount failure.
#[derive(Debug, Error)]
pub enum MountError {
    /// No global `window`
    #[error("no window available")]
    NoWindow,

    /// Window has no document
    #[error("window has no document")]
    NoDocument,

    /// Root element id not found
    #[error("root element `{0}` not found")]
    RootNotFound(String),

    /// Config JSON rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A DOM call threw
    #[error("DOM error: {0}")]
    Dom(String),
}

impl MountError {
    pub(crate) fn dom(err: &JsValue) -> Self {
        Self::Dom(err.as_string().unwrap_or_else(|| format!("{err:?}")))
    }
}

impl From<MountError> for JsValue {
    fn from(err: MountError) -> Self {
        Self::from_str(&err.to_string())
    }
}
