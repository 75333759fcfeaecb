//! Copyable trait for components that provide clipboard content

use super::Component;

/// When the user presses `y`, the focused component's `Copyable`
/// implementation decides what goes to the clipboard.
pub trait Copyable: Component {
    /// Human-readable text, or `None` when there is nothing to copy
    fn copy_text(&self) -> Option<String>;

    /// What was copied, for the toast ("details for Amoxicillin 500mg")
    fn copy_description(&self) -> String {
        format!("{:?}", self.id()).to_lowercase()
    }
}
