//! Shared UI components
//!
//! Platform-agnostic rendering of the dashboard widgets using egui.
//! Platform-specific details (image loading, opening links) are abstracted via traits.

mod chat_panel;
mod dashboard;
mod skills_panel;

pub use chat_panel::*;
pub use dashboard::*;
pub use skills_panel::*;
