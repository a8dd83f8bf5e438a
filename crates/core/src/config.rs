//! Configuration path utilities for relay-picker.
//!
//! This module resolves where the location table lives and which VPN client
//! binary is invoked, expanding shell variables like `~` in paths.

/// Default path for the location table file
const DEFAULT_LOCATIONS_PATH: &str = "~/.relay-picker/locations.yml";

/// Default VPN client binary, looked up on `PATH`
pub const DEFAULT_CLIENT_BINARY: &str = "mullvad";

/// Resolves the location table file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// location table path. Shell expansions like `~` are resolved.
///
/// # Arguments
///
/// * `locations_path_arg` - Optional custom location table file path
///
/// # Returns
///
/// The resolved path to the location table file
///
/// # Examples
///
/// ```
/// use relay_picker_core::config::get_locations_path;
///
/// // Use default path
/// let default_path = get_locations_path(&None);
///
/// // Use custom path
/// let custom_path = get_locations_path(&Some("/path/to/locations.yml".to_string()));
/// ```
pub fn get_locations_path(locations_path_arg: &Option<String>) -> String {
    let locations_path = match locations_path_arg {
        Some(locations_path) => locations_path,
        None => DEFAULT_LOCATIONS_PATH,
    };

    shellexpand::tilde(locations_path).to_string()
}

/// Resolves the VPN client binary.
///
/// A custom binary may be a bare name looked up on `PATH` or a path, in which
/// case `~` is expanded.
pub fn get_client_binary(client_binary_arg: &Option<String>) -> String {
    match client_binary_arg {
        Some(client_binary) => shellexpand::tilde(client_binary).to_string(),
        None => DEFAULT_CLIENT_BINARY.to_string(),
    }
}
