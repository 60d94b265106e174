//! Conversion between binary fonts and TTX documents.

use std::path::{Path, PathBuf};

use crate::action::{RunCommandError, run_cmd};

/// A tool that converts fonts to TTX documents and back.
pub trait Converter: Sync {
    /// Converts the binary font at `font` into a TTX document at `ttx`.
    ///
    /// # Errors
    ///
    /// Returns [`RunCommandError`] if the conversion could not be run or failed.
    fn decompile(&self, font: &Path, ttx: &Path) -> Result<(), RunCommandError>;

    /// Compiles the TTX document at `ttx` into a binary font at `font`.
    ///
    /// # Errors
    ///
    /// Returns [`RunCommandError`] if the compilation could not be run or failed.
    fn compile(&self, ttx: &Path, font: &Path) -> Result<(), RunCommandError>;
}

/// [`Converter`] backed by the fontTools `ttx` command.
///
/// `ttx` picks the direction of the conversion from the extension of its input.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Ttx {
    /// The `ttx` executable.
    program: PathBuf,
}

impl Ttx {
    /// Creates a new [`Ttx`] converter that runs `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs `ttx -o <output> <input>`.
    fn convert(&self, input: &Path, output: &Path) -> Result<(), RunCommandError> {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.arg("-o").arg(output).arg(input);

        run_cmd(cmd)
    }
}

impl Converter for Ttx {
    fn decompile(&self, font: &Path, ttx: &Path) -> Result<(), RunCommandError> {
        self.convert(font, ttx)
    }

    fn compile(&self, ttx: &Path, font: &Path) -> Result<(), RunCommandError> {
        self.convert(ttx, font)
    }
}
