//! User-facing messages produced by a dispatch attempt.

use std::fmt::{Display, Formatter};

use crate::error::{Error, Result};

pub const INCOMPLETE_SELECTION_MESSAGE: &str = "Please select a country, city, and server";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn warning(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Maps the outcome of a dispatch to what the user gets to see.
    ///
    /// Selection problems become warnings, captured output of a successful run
    /// becomes an informational notice and everything else is an error.
    #[must_use]
    pub fn from_dispatch(result: Result<String>) -> Self {
        match result {
            Ok(stdout) => {
                let body = stdout.trim();
                if body.is_empty() {
                    Self::info("Command Output", "The relay location was updated.")
                } else {
                    Self::info("Command Output", body)
                }
            }
            Err(error @ Error::MalformedDescriptor(_)) => Self::warning(
                "Error",
                format!("{INCOMPLETE_SELECTION_MESSAGE}\n\n{error}"),
            ),
            Err(error) if error.is_validation() => {
                Self::warning("Error", INCOMPLETE_SELECTION_MESSAGE)
            }
            Err(error) => Self::error("Error", format!("Command execution failed: {error}")),
        }
    }

    /// Warnings and errors have to be acknowledged before continuing.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.severity != Severity::Info
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.body)
    }
}
