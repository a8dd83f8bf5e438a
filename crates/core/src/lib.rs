//! Relay Picker Core Library
//!
//! This crate provides the core functionality for relay-picker, a front-end
//! that lets a user pick a country, city and server from a location table and
//! applies the choice with the Mullvad VPN command-line client.
//!
//! # Key Features
//!
//! - **Location Tables**: Load and validate YAML country -> city -> server tables
//! - **Cascading Selection**: Country, city and server lists that repopulate
//!   and reset downstream whenever an upper level changes
//! - **Dispatch**: Render `mullvad relay set location <identifier>` and run it
//!   directly, capturing output and exit status
//! - **Notices**: Turn a dispatch outcome into a message for the user
//! - **Error Handling**: Error types for every failure mode
//!
//! # Examples
//!
//! Selecting a server and preparing the client invocation:
//!
//! ```
//! use relay_picker_core::dispatch::Dispatcher;
//! use relay_picker_core::file_handling::default_location_table;
//! use relay_picker_core::selection::{CascadingSelector, SelectionEvent};
//!
//! let mut selector = CascadingSelector::new(default_location_table()?);
//! selector.apply(SelectionEvent::CountrySelected("Sweden".to_string()))?;
//! selector.apply(SelectionEvent::CitySelected("Stockholm".to_string()))?;
//! selector.apply(SelectionEvent::ServerSelected("se-sto-001 (Stockholm)".to_string()))?;
//!
//! let invocation = Dispatcher::default().prepare(selector.current_selection())?;
//! assert_eq!(invocation.to_string(), "mullvad relay set location se-sto-001");
//! # Ok::<(), relay_picker_core::error::Error>(())
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod file_handling;
pub mod interpolation;
pub mod locations;
pub mod notice;
pub mod selection;
