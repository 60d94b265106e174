//! Loading of the source font as a TTX [`Document`].

use std::{fs, path::Path};

use anyhow::{Context, Result};
use ttx::Document;

use crate::action::{convert::Converter, layout::OutputLayout};

/// Loads `font` as a TTX [`Document`], converting it with `converter` unless a cached conversion
/// already exists in `layout`.
///
/// # Errors
///
/// Returns errors when the conversion fails or the cached document cannot be read or parsed.
pub fn load_source<C: Converter>(
    converter: &C,
    layout: &OutputLayout,
    font: &Path,
) -> Result<Document> {
    let cache_path = layout.cache_path(font);

    if cache_path.exists() {
        log::debug!(
            "reusing {} for {}; remove it if the font has changed",
            cache_path.display(),
            font.display()
        );
    } else {
        log::info!("converting {} to {}", font.display(), cache_path.display());
        converter
            .decompile(font, &cache_path)
            .with_context(|| format!("failed to convert {} to TTX", font.display()))?;
    }

    let text = fs::read_to_string(&cache_path)
        .with_context(|| format!("failed to read {}", cache_path.display()))?;
    Document::parse(&text).with_context(|| format!("failed to parse {}", cache_path.display()))
}
