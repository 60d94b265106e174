//! Command line parsing and [`Action::Decode`][ad] construction.
//!
//! [ad]: crate::cli::Action::Decode

use std::path::Path;

use clap::{Arg, ArgMatches, Command};
use ttx::{ArtifactName, ParseArtifactNameError, Permutation};

/// Description of the text to decode and the font it is displayed with.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct DecodeConfiguration {
    /// The [`Permutation`] of the font.
    pub permutation: Permutation,
    /// The text as it appears in the page source.
    pub text: String,
}

/// Parses the arguments of the `decode` subcommand.
#[expect(
    clippy::missing_panics_doc,
    reason = "decode subcommand guarantees that these are present"
)]
pub fn parse_arguments(matches: &ArgMatches) -> DecodeConfiguration {
    let permutation = matches
        .get_one::<Permutation>("permutation")
        .copied()
        .expect("permutation is required");

    let text = matches
        .get_one::<String>("text")
        .cloned()
        .expect("text is required");

    DecodeConfiguration { permutation, text }
}

/// Returns the command parser for an [`Action::Decode`][ad].
///
/// [ad]: crate::cli::Action::Decode
pub fn subcommand_parser() -> Command {
    let permutation = Arg::new("permutation")
        .value_name("FONT")
        .value_parser(parse_permutation)
        .required(true)
        .help("Generated font, like result/generated/<hash>.<permutation>.ttf, or its permutation");

    let text = Arg::new("text")
        .value_name("TEXT")
        .required(true)
        .help("Digits as they appear in the page source");

    Command::new("decode")
        .about("Prints the digits a reader sees when TEXT is displayed with FONT")
        .arg(permutation)
        .arg(text)
}

/// Parses a bare [`Permutation`], or takes it from the name of a generated font.
fn parse_permutation(value: &str) -> Result<Permutation, ParseArtifactNameError> {
    if let Ok(permutation) = value.parse() {
        return Ok(permutation);
    }

    let file_name = Path::new(value)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(value);
    ArtifactName::from_file_name(file_name).map(|name| name.permutation())
}
