//! Tool for generating fonts whose digit glyphs draw other digits, so that numbers set in them
//! read differently from the page source, and for decoding text set in such fonts.

use std::process::ExitCode;

use action::RunCommandError;
use cli::Action;

pub mod action;
pub mod cli;

fn main() -> ExitCode {
    let arguments = cli::get_arguments();

    env_logger::Builder::new()
        .filter_level(arguments.log_level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let result = match arguments.action {
        Action::Generate(config) => action::generate::generate(config).map(|names| {
            log::info!("generated {} fonts", names.len());
        }),
        Action::Decode(config) => action::decode::decode(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error:#}");
            ExitCode::from(exit_status(&error))
        }
    }
}

/// Returns the exit status for `error`: the exit code of a failed converter, or 1.
fn exit_status(error: &anyhow::Error) -> u8 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<RunCommandError>())
        .and_then(RunCommandError::exit_code)
        .and_then(|code| u8::try_from(code).ok())
        .filter(|&code| code != 0)
        .unwrap_or(1)
}
