//! Turns a complete selection into one run of the VPN client.
//!
//! Dispatch happens in two steps. [`Dispatcher::prepare`] validates the
//! selection and renders the command without side effects, and
//! [`Dispatcher::run`] executes a prepared [`Invocation`] through a
//! [`ProcessRunner`], blocking until the process exits.

use std::fmt::{Display, Formatter};
use std::process::{Command, Stdio};

use log::{info, warn};

use crate::config::DEFAULT_CLIENT_BINARY;
use crate::error::{Error, Result};
use crate::interpolation::{
    build_context, get_templates, interpolate_command, RELAY_SET_LOCATION_TEMPLATE,
};
use crate::selection::SelectionState;

/// Returns the leading whitespace-delimited token of a server descriptor.
///
/// # Errors
///
/// Returns [`Error::MalformedDescriptor`] if the descriptor is empty or blank.
///
/// # Examples
///
/// ```
/// use relay_picker_core::dispatch::server_identifier;
///
/// assert_eq!(server_identifier("se-sto-001 (Stockholm)").unwrap(), "se-sto-001");
/// assert!(server_identifier("   ").is_err());
/// ```
pub fn server_identifier(descriptor: &str) -> Result<&str> {
    descriptor
        .split_whitespace()
        .next()
        .ok_or_else(|| Error::MalformedDescriptor(descriptor.to_string()))
}

/// A fully rendered command, ready to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    fn from_arguments(mut arguments: Vec<String>) -> Result<Self> {
        if arguments.is_empty() {
            return Err(Error::Misc("No command to execute".to_string()));
        }

        let program = arguments.remove(0);
        Ok(Self {
            program,
            args: arguments,
        })
    }
}

impl Display for Invocation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.program)?;
        for arg in &self.args {
            write!(formatter, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Executes invocations on behalf of a [`Dispatcher`].
pub trait ProcessRunner {
    /// Runs the invocation to completion and captures its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process could not be started or waited on.
    fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessOutput>;
}

/// Runs the client binary directly on the host, without a shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessOutput> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .output()?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher<R = SystemRunner> {
    client_binary: String,
    runner: R,
}

impl Dispatcher<SystemRunner> {
    pub fn new(client_binary: impl Into<String>) -> Self {
        Self::with_runner(client_binary, SystemRunner)
    }
}

impl Default for Dispatcher<SystemRunner> {
    fn default() -> Self {
        Self::new(DEFAULT_CLIENT_BINARY)
    }
}

impl<R: ProcessRunner> Dispatcher<R> {
    pub fn with_runner(client_binary: impl Into<String>, runner: R) -> Self {
        Self {
            client_binary: client_binary.into(),
            runner,
        }
    }

    #[must_use]
    pub fn client_binary(&self) -> &str {
        &self.client_binary
    }

    /// Validates the selection and renders the relay location command.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteSelection`] if any level is unset, or
    /// [`Error::MalformedDescriptor`] if the server has no identifier.
    pub fn prepare(&self, selection: &SelectionState) -> Result<Invocation> {
        let (Some(_), Some(_), Some(server)) =
            (&selection.country, &selection.city, &selection.server)
        else {
            return Err(Error::IncompleteSelection {
                missing: selection.missing_levels(),
            });
        };

        let identifier = server_identifier(server)?;

        let templates = get_templates(&RELAY_SET_LOCATION_TEMPLATE)?;
        let context = build_context(&self.client_binary, identifier);

        Invocation::from_arguments(interpolate_command(&context, &templates)?)
    }

    /// Executes a prepared invocation and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SubProcess`] if the client could not be started and
    /// [`Error::SubProcessExit`] if it exited with a non-zero status.
    pub fn run(&self, invocation: &Invocation) -> Result<String> {
        info!("Executing `{invocation}`");

        let output = self.runner.run(invocation).inspect_err(|e| {
            warn!("Could not start `{}`: {e}", invocation.program);
        })?;

        if output.success() {
            return Ok(output.stdout);
        }

        warn!("`{invocation}` exited with {:?}", output.code);

        // Some clients report failures on stdout only.
        let stderr = if output.stderr.trim().is_empty() {
            output.stdout
        } else {
            output.stderr
        };

        Err(Error::SubProcessExit {
            code: output.code,
            stderr,
        })
    }

    /// Prepares and runs the command for `selection`.
    ///
    /// No process is started when the selection does not validate.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::prepare`] and [`Dispatcher::run`].
    pub fn dispatch(&self, selection: &SelectionState) -> Result<String> {
        let invocation = self.prepare(selection)?;
        self.run(&invocation)
    }
}
