//! Command line parsing and [`Action::Generate`][ag] construction.
//!
//! [ag]: crate::cli::Action::Generate

use std::{num::NonZeroUsize, path::PathBuf};

use clap::{Arg, ArgMatches, Command};

/// Description of which font to shuffle, how many fonts to generate, and where to put them.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct GenerateConfiguration {
    /// The font whose digit glyphs are shuffled.
    pub font: PathBuf,
    /// The number of fonts to generate.
    pub count: usize,
    /// The directory holding the `generated` and `tmp` directories.
    pub output: PathBuf,
    /// The `ttx` executable used to convert fonts.
    pub ttx: PathBuf,
    /// The seed of the random permutations, or `None` to seed from the operating system.
    pub seed: Option<u64>,
    /// The number of fonts compiled at once.
    pub jobs: NonZeroUsize,
}

/// Parses the arguments required to produce a valid [`GenerateConfiguration`].
#[expect(
    clippy::missing_panics_doc,
    reason = "required arguments and defaults guarantee that these are present"
)]
pub fn parse_arguments(matches: &ArgMatches) -> GenerateConfiguration {
    let font = matches
        .get_one::<PathBuf>("font")
        .cloned()
        .expect("font is a required argument");

    let count = matches
        .get_one::<usize>("count")
        .copied()
        .expect("count is a required argument");

    let output = matches
        .get_one::<PathBuf>("output")
        .cloned()
        .expect("output has a default value");

    let ttx = matches
        .get_one::<PathBuf>("ttx")
        .cloned()
        .expect("ttx has a default value");

    let seed = matches.get_one::<u64>("seed").copied();

    let jobs = matches
        .get_one::<NonZeroUsize>("jobs")
        .copied()
        .expect("jobs has a default value");

    GenerateConfiguration {
        font,
        count,
        output,
        ttx,
        seed,
        jobs,
    }
}

/// Adds the arguments of an [`Action::Generate`][ag] to `command`.
///
/// [ag]: crate::cli::Action::Generate
pub fn add_arguments(command: Command) -> Command {
    let font = Arg::new("font")
        .value_name("FONT")
        .value_parser(clap::value_parser!(PathBuf))
        .required(true)
        .help("Font containing glyphs named 'zero', 'one', 'two' .. 'nine'");

    let count = Arg::new("count")
        .value_name("COUNT")
        .value_parser(clap::value_parser!(usize))
        .required(true)
        .help("Number of fonts to generate");

    let output = Arg::new("output")
        .short('o')
        .long("output")
        .value_name("DIR")
        .value_parser(clap::value_parser!(PathBuf))
        .default_value("result")
        .help("Directory receiving the generated fonts and intermediate files");

    let ttx = Arg::new("ttx")
        .long("ttx")
        .value_name("PROGRAM")
        .value_parser(clap::value_parser!(PathBuf))
        .default_value("ttx")
        .help("fontTools `ttx` executable");

    let seed = Arg::new("seed")
        .long("seed")
        .value_parser(clap::value_parser!(u64))
        .help("Seed for reproducible permutations");

    let jobs = Arg::new("jobs")
        .short('j')
        .long("jobs")
        .value_parser(clap::value_parser!(NonZeroUsize))
        .default_value("1")
        .help("Number of fonts compiled at once");

    command
        .arg(font)
        .arg(count)
        .arg(output)
        .arg(ttx)
        .arg(seed)
        .arg(jobs)
}
