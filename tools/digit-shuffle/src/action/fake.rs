//! A [`Converter`] for tests that stands in for `ttx`.

use std::{
    fs,
    path::Path,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::action::{RunCommandError, convert::Converter};

/// A TTX document defining all ten digit glyphs, each with a distinct outline.
pub static DIGITS: &str = include_str!("../../../../test-data/digits.ttx");

/// A TTX document with every digit glyph except `seven`.
pub static MISSING_SEVEN: &str = include_str!("../../../../test-data/missing-seven.ttx");

/// Decompiles every font to a fixed document and compiles by copying the document.
pub struct FakeConverter {
    /// The document written by [`Converter::decompile()`].
    source: String,
    /// Exit code returned by [`Converter::decompile()`] instead of succeeding.
    decompile_failure: Option<i32>,
    /// Exit code returned by [`Converter::compile()`] instead of succeeding.
    compile_failure: Option<i32>,
    /// Number of [`Converter::decompile()`] calls.
    decompiled: AtomicUsize,
    /// Number of [`Converter::compile()`] calls.
    compiled: AtomicUsize,
}

impl FakeConverter {
    /// Creates a [`FakeConverter`] that decompiles every font to `source`.
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_owned(),
            decompile_failure: None,
            compile_failure: None,
            decompiled: AtomicUsize::new(0),
            compiled: AtomicUsize::new(0),
        }
    }

    /// Creates a [`FakeConverter`] whose decompilation exits with `code`.
    pub fn failing(source: &str, code: i32) -> Self {
        Self {
            decompile_failure: Some(code),
            ..Self::new(source)
        }
    }

    /// Creates a [`FakeConverter`] whose compilation exits with `code`.
    pub fn failing_compile(source: &str, code: i32) -> Self {
        Self {
            compile_failure: Some(code),
            ..Self::new(source)
        }
    }

    /// Returns the number of decompilations run so far.
    pub fn decompiled(&self) -> usize {
        self.decompiled.load(Ordering::SeqCst)
    }

    /// Returns the number of compilations run so far.
    pub fn compiled(&self) -> usize {
        self.compiled.load(Ordering::SeqCst)
    }
}

impl Converter for FakeConverter {
    fn decompile(&self, _font: &Path, ttx: &Path) -> Result<(), RunCommandError> {
        self.decompiled.fetch_add(1, Ordering::SeqCst);
        if let Some(code) = self.decompile_failure {
            return Err(RunCommandError::CommandFailed { code: Some(code) });
        }

        fs::write(ttx, &self.source)?;
        Ok(())
    }

    fn compile(&self, ttx: &Path, font: &Path) -> Result<(), RunCommandError> {
        self.compiled.fetch_add(1, Ordering::SeqCst);
        if let Some(code) = self.compile_failure {
            return Err(RunCommandError::CommandFailed { code: Some(code) });
        }

        fs::copy(ttx, font)?;
        Ok(())
    }
}
