use leon::{ParseError, RenderError};
use thiserror::Error;

use crate::selection::Level;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("The client process exited with a non-success code ({}): {}", exit_code_label(.code), .stderr.trim())]
    SubProcessExit { code: Option<i32>, stderr: String },

    #[error("Error with client process: {}", _0)]
    SubProcess(#[from] std::io::Error),

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("No countries were found in the location table. Is `{}` empty?", .path)]
    EmptyLocationTable { path: String },

    #[error("Country `{}` has no cities", .0)]
    EmptyCountry(String),

    #[error("City `{}` in `{}` has no servers", .1, .0)]
    EmptyCity(String, String),

    #[error("Invalid {}: name may not be empty", .0)]
    EmptyName(Level),

    #[error("Found a non-unique server in {}, {}: `{}`", .0, .1, .2)]
    DuplicateServer(String, String, String),

    #[error("Invalid server identifier `{}`: only letters, digits, `-`, `_` and `.` are allowed", .0)]
    InvalidIdentifier(String),

    #[error("Unknown country: `{}`", .0)]
    UnknownCountry(String),

    #[error("Unknown city `{}` in {}", .1, .0)]
    UnknownCity(String, String),

    #[error("Unknown server `{}` in {}", .1, .0)]
    UnknownServer(String, String),

    #[error("A country must be selected before a city")]
    NoCountrySelected,

    #[error("A city must be selected before a server")]
    NoCitySelected,

    #[error("Selection is incomplete, missing: {}", join_levels(.missing))]
    IncompleteSelection { missing: Vec<Level> },

    #[error("Server descriptor `{}` has no identifier", .0)]
    MalformedDescriptor(String),

    #[error("Error parsing placeholder string: {}", .0)]
    Parse(#[from] ParseError),

    #[error("Error placeholder template string: {}", .0)]
    Render(#[from] RenderError),

    #[error("Misc error: {}", .0)]
    Misc(String),

    #[error("STDIO error: {}", .0)]
    Stdio(std::io::Error),
}

fn exit_code_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

fn join_levels(levels: &[Level]) -> String {
    levels
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    pub fn empty_location_table(path: String) -> Self {
        Self::EmptyLocationTable { path }
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    /// Errors caused by what the user picked rather than by the client process.
    ///
    /// A descriptor without an identifier is reported the same way as a missing
    /// level, so the user can correct the selection and retry.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::IncompleteSelection { .. } | Self::MalformedDescriptor(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_selection_lists_missing_levels() {
        let error = Error::IncompleteSelection {
            missing: vec![Level::City, Level::Server],
        };
        assert_eq!(
            error.to_string(),
            "Selection is incomplete, missing: city, server"
        );
        assert!(error.is_validation());
    }

    #[test]
    fn test_sub_process_exit_contains_stderr() {
        let error = Error::SubProcessExit {
            code: Some(1),
            stderr: "connection refused\n".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "The client process exited with a non-success code (1): connection refused"
        );
        assert!(!error.is_validation());
    }

    #[test]
    fn test_sub_process_exit_without_code() {
        let error = Error::SubProcessExit {
            code: None,
            stderr: String::new(),
        };
        assert!(error.to_string().contains("(signal)"));
    }

    #[test]
    fn test_malformed_descriptor_is_validation() {
        assert!(Error::MalformedDescriptor("   ".to_string()).is_validation());
        assert!(!Error::NoCountrySelected.is_validation());
    }
}
