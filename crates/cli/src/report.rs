//! Printing of dispatch notices and their exit codes.

use std::io::{stderr, stdout, Write};
use std::process::ExitCode;

use relay_picker_core::notice::Notice;

/// Writes a notice: blocking ones go to `err` with their title, the rest
/// only print their body to `out`.
pub fn write_notice(
    notice: &Notice,
    out: &mut impl Write,
    err: &mut impl Write,
) -> std::io::Result<()> {
    if notice.is_blocking() {
        writeln!(err, "{notice}")
    } else {
        writeln!(out, "{}", notice.body)
    }
}

/// Prints a notice and maps it to the process exit code
pub fn report(notice: &Notice) -> ExitCode {
    // Nothing left to tell the user if the terminal is gone
    let _ = write_notice(notice, &mut stdout(), &mut stderr());

    if notice.is_blocking() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
