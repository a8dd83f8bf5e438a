//! Loading of location tables.
//!
//! Tables come from a YAML file given by the user, from the default
//! configuration path, or from the copy embedded in the binary.

use std::fs::File;
use std::path::Path;

use log::{debug, info};

use crate::config;
use crate::error::{Error, Result};
use crate::locations::{LocationTable, RawLocationTable};

/// Location table shipped with the binary.
const BUILT_IN_LOCATIONS: &str = include_str!("../data/locations.yml");

/// Name used for the embedded table in error messages.
const BUILT_IN_SOURCE: &str = "built-in locations";

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    match File::open(path) {
        Ok(reader) => Ok(reader),
        Err(e) => Err(Error::io_error(
            file_description.to_string(),
            path.to_string(),
            e,
        )),
    }
}

/// Loads and validates a location table from a YAML file.
///
/// # Arguments
///
/// * `locations_path` - Path to the YAML location table
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The YAML is malformed, repeats a key, or is not a mapping of mappings of
///   sequences
/// - The table fails validation (see [`LocationTable::from_entries`])
///
/// # Examples
///
/// ```no_run
/// use relay_picker_core::file_handling::load_location_table;
///
/// let table = load_location_table("/etc/relay-picker/locations.yml")?;
/// println!("Loaded {} countries", table.country_count());
/// # Ok::<(), relay_picker_core::error::Error>(())
/// ```
pub fn load_location_table(locations_path: &str) -> Result<LocationTable> {
    let reader = get_reader("locations", locations_path)?;

    let parsing_result: serde_yaml::Result<RawLocationTable> = serde_yaml::from_reader(reader);

    let raw = parsing_result.map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "locations".to_string(),
            locations_path.to_string(),
            e,
        )
    })?;

    let table = LocationTable::from_raw(raw, locations_path)?;
    info!(
        "Loaded {} countries and {} servers from `{}`",
        table.country_count(),
        table.server_count(),
        locations_path
    );

    Ok(table)
}

/// Parses and validates a location table held in memory.
///
/// `source` names the document in error messages.
///
/// # Errors
///
/// Same as [`load_location_table`], minus the IO failures.
pub fn parse_location_table(yaml: &str, source: &str) -> Result<LocationTable> {
    let raw: RawLocationTable = serde_yaml::from_str(yaml).map_err(|e| {
        Error::yaml_error(
            "parsing".to_string(),
            "locations".to_string(),
            source.to_string(),
            e,
        )
    })?;

    LocationTable::from_raw(raw, source)
}

/// Returns the table embedded in the binary.
///
/// # Errors
///
/// Only fails if the embedded document itself is invalid.
pub fn default_location_table() -> Result<LocationTable> {
    parse_location_table(BUILT_IN_LOCATIONS, BUILT_IN_SOURCE)
}

/// Picks the location table a front-end starts with.
///
/// An explicit path must exist. Without one, the default configuration path is
/// used when a file exists there, and the embedded table otherwise.
///
/// # Errors
///
/// Returns an error if the chosen table cannot be loaded.
pub fn resolve_location_table(locations_path_arg: &Option<String>) -> Result<LocationTable> {
    let locations_path = config::get_locations_path(locations_path_arg);
    debug!("Locations path: `{}`", locations_path);

    resolve_from_path(&locations_path, locations_path_arg.is_some())
}

/// Loads `locations_path`, falling back to the embedded table when the path
/// was not given explicitly and nothing exists there.
fn resolve_from_path(locations_path: &str, is_explicit: bool) -> Result<LocationTable> {
    if is_explicit || Path::new(locations_path).exists() {
        return load_location_table(locations_path);
    }

    info!("No location table at `{locations_path}`, using {BUILT_IN_SOURCE}");
    default_location_table()
}
