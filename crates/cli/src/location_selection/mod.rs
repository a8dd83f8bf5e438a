//! Interactive location picker and user input handling.
//!
//! This module provides the terminal-based user interface for relay-picker:
//! three columns (Country, City, Server) where choosing an item repopulates
//! the columns to its right, plus the confirmation prompt shown before the
//! client runs.
//!
//! # User Interface
//!
//! The interface supports:
//! - Left/right arrows (or h/l, Tab) to move between columns
//! - Up/down arrows (or vim-style j/k) to move within a column
//! - Enter or a mouse click to select an item
//! - '/' to fuzzy filter the focused column
//! - 's' to secure the connection with the current selection
//! - 'q' or Escape to quit

// Export public items from submodules
pub mod input;
pub mod types;
pub mod ui;

// Re-exports for convenience
pub use input::confirm_command_should_run;
pub use types::{PickerChoice, RunChoice};
pub use ui::prompt_for_location;
