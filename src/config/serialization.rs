//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the full config as a commented TOML document
    pub fn to_toml(&self) -> String {
        format!(
            r#"# drugstore configuration

# Dataset: http(s) URL, site-relative path (resolved against base_url),
# or a local file path
data_source = {data_source:?}

# Origin for site-relative data paths
base_url = {base_url:?}

# Theme: dark, light, nord
theme = {theme:?}

# Dataset fetching
[loader]
retries = {retries}              # extra attempts after a failure
retry_delay_ms = {retry_delay}   # doubled per retry, capped at 30s
stale_secs = {stale}             # 'r' reloads only after this
timeout_secs = {timeout}

# Interaction
[ui]
debounce_ms = {debounce}         # search settles after this long
scroll_delay_ms = {scroll_delay} # narrow layout section jump delay
narrow_breakpoint = {breakpoint} # columns; narrower terminals stack sections

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level:?}
# File logging (in addition to TUI buffer or stderr)
file_enabled = {log_file_enabled}
file_dir = {log_file_dir:?}
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = {log_file_prefix:?}
"#,
            data_source = self.data_source,
            base_url = self.base_url,
            theme = self.theme,
            retries = self.loader.retries,
            retry_delay = self.loader.retry_delay_ms,
            stale = self.loader.stale_secs,
            timeout = self.loader.timeout_secs,
            debounce = self.ui.debounce_ms,
            scroll_delay = self.ui.scroll_delay_ms,
            breakpoint = self.ui.narrow_breakpoint,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display().to_string(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
