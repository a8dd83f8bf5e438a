use std::io::{stdin, stdout, Write};

use relay_picker_core::error::{Error, Result};

use super::types::RunChoice;

/// Maps an answer to the confirmation prompt; `None` asks again.
#[must_use]
pub fn parse_run_choice(input: &str) -> Option<RunChoice> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" | "" => Some(RunChoice::Yes),
        "n" | "no" => Some(RunChoice::No),
        _ => None,
    }
}

/// Confirms with the user whether the command should be run
pub fn confirm_command_should_run() -> Result<RunChoice> {
    loop {
        print!("Are you sure you want to run? ([Y]es/[n]o): ");
        stdout().flush().map_err(Error::Stdio)?;

        // Read user input
        let mut input = String::new();
        stdin().read_line(&mut input).map_err(Error::Stdio)?;

        if let Some(choice) = parse_run_choice(&input) {
            return Ok(choice);
        }
    }
}
