//! Interaction timing and layout configuration

use crate::catalog::selection::ScrollPolicy;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct UiConfig {
    /// Quiet period before a search edit reaches the filter
    pub debounce_ms: u64,
    /// Delay before a narrow layout jumps to the next section
    pub scroll_delay_ms: u64,
    /// Terminal width (columns) below which sections are stacked
    pub narrow_breakpoint: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            scroll_delay_ms: 100,
            narrow_breakpoint: 100,
        }
    }
}

/// UI settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileUi {
    pub debounce_ms: Option<u64>,
    pub scroll_delay_ms: Option<u64>,
    pub narrow_breakpoint: Option<u16>,
}

impl UiConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileUi>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            debounce_ms: file.debounce_ms.unwrap_or(defaults.debounce_ms),
            scroll_delay_ms: file.scroll_delay_ms.unwrap_or(defaults.scroll_delay_ms),
            narrow_breakpoint: file.narrow_breakpoint.unwrap_or(defaults.narrow_breakpoint),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn scroll_policy(&self) -> ScrollPolicy {
        ScrollPolicy {
            breakpoint: self.narrow_breakpoint,
            delay: Duration::from_millis(self.scroll_delay_ms),
        }
    }
}
