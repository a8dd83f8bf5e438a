use std::process::ExitCode;

use clap::Parser;
use log::{debug, info};
use relay_picker_cli::cli_args::{apply_preselection, Args};
use relay_picker_cli::location_selection::{
    confirm_command_should_run, prompt_for_location, PickerChoice, RunChoice,
};
use relay_picker_cli::report::report;
use relay_picker_core::dispatch::Dispatcher;
use relay_picker_core::error::Result;
use relay_picker_core::notice::Notice;
use relay_picker_core::selection::CascadingSelector;
use relay_picker_core::{config, file_handling};

/// Load the location table and apply any command-line preselection
fn initialize_selector(args: &Args) -> Result<CascadingSelector> {
    let table = file_handling::resolve_location_table(&args.locations_path)?;
    let mut selector = CascadingSelector::new(table);

    apply_preselection(&mut selector, args)?;
    debug!("Preselected: {}", selector.current_selection());

    Ok(selector)
}

fn execute() -> Result<ExitCode> {
    let args = Args::parse();

    let mut selector = initialize_selector(&args)?;
    let dispatcher = Dispatcher::new(config::get_client_binary(&args.client_binary));

    if !selector.current_selection().is_complete()
        && prompt_for_location(&mut selector)? == PickerChoice::Quit
    {
        return Ok(ExitCode::SUCCESS);
    }

    let invocation = match dispatcher.prepare(selector.current_selection()) {
        Ok(invocation) => invocation,
        Err(e) => return Ok(report(&Notice::from_dispatch(Err(e)))),
    };

    println!("Executing command:\n{invocation}");

    if args.dry_run {
        println!("Dry run is specified, exiting without executing.");
        return Ok(ExitCode::SUCCESS);
    }

    if !args.force && confirm_command_should_run()? == RunChoice::No {
        info!("Command execution cancelled by user");
        return Ok(ExitCode::SUCCESS);
    }

    let notice = Notice::from_dispatch(dispatcher.run(&invocation));
    Ok(report(&notice))
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
