//! Locations of the files written by `digit-shuffle`.

use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

use ttx::ArtifactName;

/// The output directory tree.
///
/// ```text
/// <root>/
///     generated/<hash>.<permutation>.ttf
///     tmp/<font stem>.ttx
///     tmp/<hash>.<permutation>.ttx
/// ```
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct OutputLayout {
    /// The output root.
    root: PathBuf,
}

impl OutputLayout {
    /// Creates a new [`OutputLayout`] rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the `generated` and `tmp` directories if they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns errors when a directory cannot be created.
    pub fn create(&self) -> io::Result<()> {
        fs::create_dir_all(self.generated_dir())?;
        fs::create_dir_all(self.tmp_dir())
    }

    /// Returns the output root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directory holding the generated fonts.
    pub fn generated_dir(&self) -> PathBuf {
        self.root.join("generated")
    }

    /// Returns the directory holding TTX documents.
    pub fn tmp_dir(&self) -> PathBuf {
        self.root.join("tmp")
    }

    /// Returns the path of the cached TTX conversion of `font`.
    ///
    /// The cache is keyed by file name alone, so converting an edited font that kept its name
    /// requires removing the cached file first.
    pub fn cache_path(&self, font: &Path) -> PathBuf {
        let stem = font.file_stem().unwrap_or(font.as_os_str());
        let file_name = with_suffix(stem.to_os_string(), ".ttx");
        self.tmp_dir().join(file_name)
    }

    /// Returns the path of the permuted TTX document named `name`.
    pub fn intermediate_path(&self, name: &ArtifactName) -> PathBuf {
        self.tmp_dir().join(format!("{name}.ttx"))
    }

    /// Returns the path of the generated font named `name`.
    pub fn artifact_path(&self, name: &ArtifactName) -> PathBuf {
        self.generated_dir().join(format!("{name}.ttf"))
    }
}

/// Appends `suffix` to `name`. Artifact names and font stems may contain dots, so
/// [`Path::with_extension()`] would truncate them.
fn with_suffix(mut name: OsString, suffix: &str) -> OsString {
    name.push(suffix);
    name
}
