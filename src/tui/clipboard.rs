//! Clipboard access for the `y` key
//!
//! `arboard` opens the system clipboard per copy instead of holding it for
//! the life of the app.

use super::components::Toast;
use anyhow::{Context, Result};
use arboard::Clipboard;

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
    clipboard
        .set_text(text)
        .context("Failed to set clipboard text")?;
    Ok(())
}

/// Copy `text` and turn the outcome into a toast. Failures (no display
/// server, permission denied) are logged with their cause.
pub fn copy_with_toast(text: &str, what: &str) -> Toast {
    match copy_to_clipboard(text) {
        Ok(()) => {
            tracing::debug!("Copied {} ({} bytes)", what, text.len());
            Toast::new(format!("✓ Copied {}", what))
        }
        Err(e) => {
            tracing::warn!("Clipboard copy failed: {:#}", e);
            Toast::error("✗ Failed to copy")
        }
    }
}
