//! Terminal UI components.
//!
//! - [`ClampedText`]: Ratatui widget for (clamped) content trees

mod widget;

pub use widget::ClampedText;
