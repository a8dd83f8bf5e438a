//! Command-line argument parsing and preselection.
//!
//! This module defines the command-line interface structure and applies
//! locations given on the command line to the selector before any UI shows.

use clap::Parser;
use relay_picker_core::dispatch::server_identifier;
use relay_picker_core::error::{Error, Result};
use relay_picker_core::selection::{CascadingSelector, Level, SelectionEvent};

/// Command-line arguments for the relay-picker CLI tool.
///
/// With a full `COUNTRY CITY SERVER` location the picker is skipped. With a
/// partial one, the interactive picker opens with those levels already chosen.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use relay_picker_cli::cli_args::Args;
///
/// let args = Args::parse_from(["rp", "--dry-run", "Sweden", "Stockholm", "se-sto-001"]);
/// assert!(args.dry_run);
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Path to the location table YAML.
    ///
    /// If not provided, `~/.relay-picker/locations.yml` is used when it exists,
    /// and the built-in table otherwise.
    #[arg(long, short = 'c')]
    pub locations_path: Option<String>,

    /// VPN client binary to invoke.
    ///
    /// If not provided, defaults to `mullvad` looked up on `PATH`.
    #[arg(long, short = 'b')]
    pub client_binary: Option<String>,

    /// Perform a dry run, which just prints out the command but does not execute it.
    #[arg(long, short = 'd', action)]
    pub dry_run: bool,

    /// Run the command without first confirming if the command should be run.
    #[arg(long, short = 'f', action)]
    pub force: bool,

    /// Country to select.
    pub country: Option<String>,

    /// City to select within the country.
    pub city: Option<String>,

    /// Server to select, either its full description or just its identifier.
    pub server: Option<String>,
}

impl Args {
    /// Locations given on the command line, top level first.
    #[must_use]
    pub fn preselection(&self) -> Vec<(Level, &str)> {
        Level::ALL
            .into_iter()
            .zip([&self.country, &self.city, &self.server])
            .map_while(|(level, value)| value.as_deref().map(|v| (level, v)))
            .collect()
    }
}

/// Finds the listed server matching `wanted` by description or identifier.
fn find_server(selector: &CascadingSelector, wanted: &str) -> Option<String> {
    selector
        .list(Level::Server)
        .items()
        .iter()
        .find(|descriptor| {
            *descriptor == wanted || server_identifier(descriptor).is_ok_and(|id| id == wanted)
        })
        .cloned()
}

/// Applies the command-line locations to the selector.
///
/// # Errors
///
/// Returns the selector's error for a location that is not in the table.
pub fn apply_preselection(selector: &mut CascadingSelector, args: &Args) -> Result<()> {
    for (level, value) in args.preselection() {
        let item = match level {
            Level::Server => find_server(selector, value).ok_or_else(|| {
                let city = selector.current_selection().city.clone().unwrap_or_default();
                Error::UnknownServer(city, value.to_string())
            })?,
            _ => value.to_string(),
        };

        selector.apply(SelectionEvent::for_level(level, item))?;
    }

    Ok(())
}
