//! Relay Picker CLI Library
//!
//! This crate provides the terminal front-end for relay-picker. It lets the
//! user choose a country, city and server in a three-column picker (or on the
//! command line) and applies the choice with the VPN client.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing and preselection
//! - [`location_selection`]: Interactive picker and confirmation prompt
//! - [`report`]: Printing of dispatch notices
//!
//! # Examples
//!
//! ```bash
//! # Interactive mode - shows the country / city / server picker
//! rp
//!
//! # Start the picker with Sweden already chosen
//! rp Sweden
//!
//! # Apply a location directly, by server identifier
//! rp Sweden Stockholm se-sto-001
//!
//! # Show the client command without running it
//! rp --dry-run Sweden Stockholm se-sto-001
//! ```

pub mod cli_args;
pub mod location_selection;
pub mod report;
