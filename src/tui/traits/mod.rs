//! Component trait system for the browser
//!
//! Instead of App knowing how to render, scroll or copy for every panel,
//! components declare their own capabilities through traits.
//!
//! ```text
//!                           App
//!        (routes keys, applies intents to Selection)
//!                            │
//!     ┌──────────┬───────────┼────────────┬────────────┐
//!     ▼          ▼           ▼            ▼            ▼
//!  Search     Letters      Drugs      Subdrugs      Details
//!                            │
//!                   Implements traits:
//!                Component, Interactive,
//!                 Scrollable, Copyable
//! ```
//!
//! Panels never touch selection state. They report what the user asked for
//! as an [`Intent`] and App decides what happens.

mod component;
mod copyable;
mod interactive;
mod scrollable;

pub use component::{Component, ComponentId, RenderContext};
pub use copyable::Copyable;
pub use interactive::{Handled, Intent, Interactive, ScrollableInteractive};
pub use scrollable::Scrollable;
