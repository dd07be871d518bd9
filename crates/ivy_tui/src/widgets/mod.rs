//! TUI widget modules.
//!
//! Each module contains a stateless rendering function that draws one panel
//! of the interface into a ratatui `Buffer`.

pub mod file_tree;
pub mod status_bar;
pub mod toolbar;
pub mod transcript;
