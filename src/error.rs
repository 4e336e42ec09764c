//! Structured error types for stickyhead.
//!
//! Only construction can fail. Every recompute path degrades silently when an
//! optional element is missing, so nothing past `attach` returns these.

/// All errors that can occur while attaching a sticky header.
#[derive(Debug, thiserror::Error)]
pub enum StickyError {
    /// The table reference resolved to nothing.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// Options failed validation.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// Options JSON could not be parsed.
    #[error("options JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// No entropy for the clone token.
    #[error("entropy source unavailable: {0}")]
    Entropy(#[from] getrandom::Error),

    /// The host environment is missing a required global (window, document).
    #[error("DOM unavailable: {0}")]
    Dom(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StickyError>;

#[cfg(target_arch = "wasm32")]
impl From<StickyError> for wasm_bindgen::JsValue {
    fn from(e: StickyError) -> Self {
        js_sys::Error::new(&e.to_string()).into()
    }
}
