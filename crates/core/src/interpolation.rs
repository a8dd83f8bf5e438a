use std::collections::HashMap;

use leon::Template;

use crate::error::Result;

/// Placeholder replaced by the VPN client binary.
pub const CLIENT_KEY: &str = "client";
/// Placeholder replaced by the server identifier.
pub const IDENTIFIER_KEY: &str = "identifier";

/// Arguments of the relay location command, one template per argument.
///
/// Arguments are rendered one by one and handed to the process directly, so a
/// rendered value never goes through shell word splitting.
pub const RELAY_SET_LOCATION_TEMPLATE: [&str; 5] =
    ["{client}", "relay", "set", "location", "{identifier}"];

#[must_use]
pub fn build_context(client_binary: &str, identifier: &str) -> HashMap<String, String> {
    HashMap::from([
        (CLIENT_KEY.to_string(), client_binary.to_string()),
        (IDENTIFIER_KEY.to_string(), identifier.to_string()),
    ])
}

/// Parses every argument of `command` as its own template.
pub fn get_templates<'s>(command: &[&'s str]) -> Result<Vec<Template<'s>>> {
    command
        .iter()
        .map(|&argument| Template::parse(argument).map_err(Into::into))
        .collect()
}

/// Renders each template against `context`; one template yields one argument.
pub fn interpolate_command(
    context: &HashMap<String, String>,
    templates: &[Template],
) -> Result<Vec<String>> {
    templates
        .iter()
        .map(|template| template.render(context).map_err(Into::into))
        .collect()
}
