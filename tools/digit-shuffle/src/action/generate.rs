//! Generation of a batch of fonts with shuffled digit glyphs, given a
//! [`GenerateConfiguration`].

use std::{collections::HashSet, fs, num::NonZeroUsize, path::Path};

use anyhow::{Context, Result, bail};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use ttx::{ArtifactName, SourceFont};

use crate::{
    action::{
        convert::{Converter, Ttx},
        layout::OutputLayout,
        load::load_source,
    },
    cli::generate::GenerateConfiguration,
};

/// The number of permutations drawn for one artifact before giving up on finding an unused name.
pub const MAX_NAME_ATTEMPTS: usize = 16;

/// Generates the fonts described by `config` with `ttx`, returning their names.
///
/// # Errors
///
/// Returns errors when the source font cannot be converted or lacks a digit glyph, when a file
/// cannot be written, or when compiling a generated font fails.
pub fn generate(config: GenerateConfiguration) -> Result<Vec<ArtifactName>> {
    let converter = Ttx::new(config.ttx);
    let layout = OutputLayout::new(config.output);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let batch = Batch {
        converter: &converter,
        layout: &layout,
        jobs: config.jobs,
    };
    batch.run(&config.font, config.count, &mut rng)
}

/// A batch of fonts generated from one source font.
#[derive(Clone, Copy, Debug)]
pub struct Batch<'a, C> {
    /// Converts between binary fonts and TTX documents.
    pub converter: &'a C,
    /// Where the documents and fonts are written.
    pub layout: &'a OutputLayout,
    /// The number of fonts compiled at once.
    pub jobs: NonZeroUsize,
}

impl<C: Converter> Batch<'_, C> {
    /// Loads and validates `font`, then generates `count` fonts from it with permutations drawn
    /// from `rng`.
    ///
    /// Permutations are drawn and their documents written one after another, so a seeded `rng`
    /// always yields the same names. With a single job each font is compiled as soon as its
    /// document is written. With more jobs every document is written first and the fonts are
    /// then compiled in parallel, so a failure while writing leaves no font of the batch compiled.
    /// The first failure aborts the batch; fonts that were already compiled are left in place.
    ///
    /// # Errors
    ///
    /// Returns errors when loading or validating `font` fails, when a document cannot be written,
    /// or when compiling fails.
    pub fn run<R: Rng + ?Sized>(
        &self,
        font: &Path,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<ArtifactName>> {
        self.layout.create().with_context(|| {
            format!(
                "failed to create output directories in {}",
                self.layout.root().display()
            )
        })?;

        let document = load_source(self.converter, self.layout, font)?;
        let source = SourceFont::new(document)?;

        let sequential = self.jobs.get() == 1;

        let mut names = Vec::with_capacity(count);
        let mut taken = HashSet::with_capacity(count);
        for _ in 0..count {
            let name = self.prepare(&source, rng, &taken)?;
            if sequential {
                self.compile(&name)?;
            }
            taken.insert(name.clone());
            names.push(name);
        }

        if !sequential {
            self.compile_parallel(&names)?;
        }

        Ok(names)
    }

    /// Writes the document of a new permutation of `source`, returning its name.
    ///
    /// Names in `taken` or with an existing font are skipped by drawing another permutation.
    fn prepare<R: Rng + ?Sized>(
        &self,
        source: &SourceFont,
        rng: &mut R,
        taken: &HashSet<ArtifactName>,
    ) -> Result<ArtifactName> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let shuffled = source
                .shuffle(rng)
                .context("failed to serialize permuted font")?;

            let name = shuffled.name();
            if taken.contains(name) || self.layout.artifact_path(name).exists() {
                log::warn!("{name} already exists, drawing another permutation");
                continue;
            }

            let path = self.layout.intermediate_path(name);
            log::info!("writing {}", path.display());
            fs::write(&path, shuffled.text())
                .with_context(|| format!("failed to write {}", path.display()))?;

            return Ok(shuffled.into_name());
        }

        bail!("no unused font name found after {MAX_NAME_ATTEMPTS} permutations")
    }

    /// Compiles the documents of `names`, using [`Batch::jobs`] threads.
    fn compile_parallel(&self, names: &[ArtifactName]) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs.get())
            .build()
            .context("failed to start compilation threads")?;
        pool.install(|| names.par_iter().try_for_each(|name| self.compile(name)))
    }

    /// Compiles the document of `name` into its font.
    fn compile(&self, name: &ArtifactName) -> Result<()> {
        let ttx = self.layout.intermediate_path(name);
        let font = self.layout.artifact_path(name);

        log::info!("compiling {}", font.display());
        self.converter
            .compile(&ttx, &font)
            .with_context(|| format!("failed to compile {}", ttx.display()))
    }
}
