//! Command line parsing and [`Action`] construction.

pub mod decode;
pub mod generate;

use std::io;

use clap::{Arg, ArgAction, ArgMatches, Command};
use decode::DecodeConfiguration;
use generate::GenerateConfiguration;
use log::LevelFilter;

/// Parsed command line arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arguments {
    /// The maximum level of log messages to print.
    pub log_level: LevelFilter,
    /// The [`Action`] to carry out.
    pub action: Action,
}

/// Parses `digit-shuffle`'s arguments to construct an [`Action`].
///
/// Exits the process with status 1 if the arguments are invalid, after printing a usage message.
pub fn get_arguments() -> Arguments {
    match command_parser().try_get_matches() {
        Ok(matches) => parse_matches(&matches),
        Err(error) => {
            let printed = error.print();
            std::process::exit(usage_exit_code(&error, printed))
        }
    }
}

/// Returns the exit status after printing `error`: 0 for help and version output that was
/// printed, 1 otherwise.
fn usage_exit_code(error: &clap::Error, printed: io::Result<()>) -> i32 {
    match printed {
        Ok(()) if !error.use_stderr() => 0,
        _ => 1,
    }
}

/// Constructs [`Arguments`] from the matches of [`command_parser()`].
pub fn parse_matches(matches: &ArgMatches) -> Arguments {
    let log_level = match matches.get_count("verbose") {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let action = match matches.subcommand() {
        Some(("decode", subcommand_matches)) => {
            Action::Decode(decode::parse_arguments(subcommand_matches))
        }
        Some((subcommand_name, _)) => unreachable!("unexpected subcommand: {subcommand_name:?}"),
        None => Action::Generate(generate::parse_arguments(matches)),
    };

    Arguments { log_level, action }
}

/// Returns the command parser for all [`Action`]s.
///
/// Generating fonts takes its arguments directly, so that `digit-shuffle <FONT> <COUNT>` works
/// without a subcommand. A font file named `decode` is taken for the subcommand and has to be
/// given as `./decode`.
pub fn command_parser() -> Command {
    let verbose = Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .global(true)
        .help("Print more details; repeat for even more");

    generate::add_arguments(
        Command::new("digit-shuffle")
            .about("Generates fonts whose digit glyphs draw other digits")
            .after_help("A font file named 'decode' must be given as './decode'.")
            .arg(verbose),
    )
    .subcommand(decode::subcommand_parser())
    .args_conflicts_with_subcommands(true)
    .subcommand_negates_reqs(true)
}

/// The action to carry out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Generate fonts with shuffled digit glyphs.
    Generate(GenerateConfiguration),
    /// Decode text displayed with a generated font.
    Decode(DecodeConfiguration),
}
