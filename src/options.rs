//! Attach-time options.
//!
//! Field names follow the JavaScript calling convention (`headerSelector`,
//! `zIndex`, ...) so the same struct deserializes from a JS object in the
//! browser and from JSON natively. Every field is optional.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StickyError};

/// Ancestor that, when present, stands in for the table.
pub const DEFAULT_CONTAINER_SELECTOR: &str = "[data-scroll-container]";
/// Header row locator.
pub const DEFAULT_HEADER_SELECTOR: &str = "thead";
/// Header cell locator, scoped to the header row.
pub const DEFAULT_HEADER_CELL_SELECTOR: &str = "th";
/// Stacking order of the stuck header.
pub const DEFAULT_Z_INDEX: i32 = 10;
/// Quiet period before a window resize triggers a recompute.
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u32 = 250;

/// Options for one sticky header instance. Immutable once attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StickyOptions {
    /// If the table has an ancestor matching this, the ancestor is used as the
    /// table (its box and its horizontal scroll). `None` disables the lookup.
    pub container_selector: Option<String>,
    /// Header row, looked up inside the table.
    pub header_selector: String,
    /// Header cells, looked up inside the header row.
    pub header_cell_selector: String,
    /// Already-fixed elements whose heights are reserved above the header.
    pub fixed_offset_selectors: Vec<String>,
    /// Scroll container driving the sticky decision. `None` means the window.
    pub scroll_container_selector: Option<String>,
    /// `z-index` of the stuck header.
    pub z_index: i32,
    /// Window resize debounce, in milliseconds.
    pub resize_debounce_ms: u32,
    /// Pixels reserved at the table's trailing edge before the header starts
    /// riding up with it.
    pub bottom_offset: f64,
}

impl Default for StickyOptions {
    fn default() -> Self {
        Self {
            container_selector: Some(DEFAULT_CONTAINER_SELECTOR.to_string()),
            header_selector: DEFAULT_HEADER_SELECTOR.to_string(),
            header_cell_selector: DEFAULT_HEADER_CELL_SELECTOR.to_string(),
            fixed_offset_selectors: Vec::new(),
            scroll_container_selector: None,
            z_index: DEFAULT_Z_INDEX,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            bottom_offset: 0.0,
        }
    }
}

impl StickyOptions {
    /// Parse options from a JSON object. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or the options are invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Builder-style helper for registering a fixed-offset element.
    #[must_use]
    pub fn with_fixed_offset(mut self, selector: impl Into<String>) -> Self {
        self.fixed_offset_selectors.push(selector.into());
        self
    }

    /// Builder-style helper for the scroll container.
    #[must_use]
    pub fn with_scroll_container(mut self, selector: impl Into<String>) -> Self {
        self.scroll_container_selector = Some(selector.into());
        self
    }

    /// Check the invariants `attach` relies on.
    ///
    /// # Errors
    /// Returns [`StickyError::InvalidOptions`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.header_selector.trim().is_empty() {
            return Err(StickyError::InvalidOptions(
                "headerSelector must not be empty".into(),
            ));
        }
        if self.header_cell_selector.trim().is_empty() {
            return Err(StickyError::InvalidOptions(
                "headerCellSelector must not be empty".into(),
            ));
        }
        if !self.bottom_offset.is_finite() || self.bottom_offset < 0.0 {
            return Err(StickyError::InvalidOptions(format!(
                "bottomOffset must be a non-negative number, got {}",
                self.bottom_offset
            )));
        }
        if self
            .fixed_offset_selectors
            .iter()
            .any(|s| s.trim().is_empty())
        {
            return Err(StickyError::InvalidOptions(
                "fixedOffsetSelectors must not contain empty selectors".into(),
            ));
        }
        Ok(())
    }
}
