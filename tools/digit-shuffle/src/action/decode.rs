//! Decoding of text set in a generated font, given a [`DecodeConfiguration`].

use anyhow::Result;

use crate::cli::decode::DecodeConfiguration;

/// Prints the digits a reader sees when `config.text` is displayed with the font generated from
/// `config.permutation`.
///
/// # Errors
///
/// Never returns an error; the permutation was validated while parsing the arguments.
pub fn decode(config: DecodeConfiguration) -> Result<()> {
    log::debug!("decoding with permutation {}", config.permutation);
    println!("{}", config.permutation.decode(&config.text));

    Ok(())
}
